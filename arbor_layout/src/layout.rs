// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arbor_tree::{LayoutMode, NodeId, NodeKind, NodeOptions, Tree};

use crate::error::LayoutError;

/// Create a layout container that flows its children in `mode`.
///
/// The container must have a definite width and height; see
/// [`LayoutError::MissingDimensions`]. Everything else about `options` works
/// as for [`Tree::create`].
pub fn create_layout(
    tree: &mut Tree,
    mode: LayoutMode,
    options: NodeOptions,
) -> Result<NodeId, LayoutError> {
    let position = options.geometry.position;
    let (width, height) = (!position.has_width(), !position.has_height());
    if width || height {
        tracing::debug!(width, height, "layout without dimensions");
        return Err(LayoutError::MissingDimensions { width, height });
    }
    Ok(tree.create(NodeKind::Layout(mode), options)?)
}
