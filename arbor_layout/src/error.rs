// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arbor_tree::TreeError;

/// Failures of layout construction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A layout needs a definite width and height to flow its children into.
    ///
    /// A dimension is definite when its length is set or both of its anchors
    /// are. The flags name the missing dimensions.
    #[error("layout needs a width and a height (missing width: {width}, missing height: {height})")]
    MissingDimensions {
        /// The width is missing.
        width: bool,
        /// The height is missing.
        height: bool,
    },
    /// The underlying node could not be created.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
