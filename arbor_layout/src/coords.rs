// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate resolution: from a node's [`Geometry`] to an absolute box.
//!
//! Each axis is resolved independently against the parent's inner box:
//!
//! - Size: the explicit length if there is one; otherwise the distance
//!   between both anchors when both are set; otherwise the natural size when
//!   the node shrinks; otherwise whatever the anchors leave of the parent.
//! - Origin: the start anchor; otherwise the end anchor minus the size;
//!   otherwise the parent's origin.
//!
//! The natural size is the larger of the content hint and the extents of the
//! children (their own anchors plus natural sizes), plus border and padding.

use arbor_tree::{CellRect, Geometry, Length, NodeFlags, NodeId, Tree};

/// Whether children take part in measuring a node's natural size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Children {
    /// Measure content and children.
    #[default]
    Include,
    /// Measure content only (the dry pass of an automatic layout).
    Exclude,
}

/// Resolve the absolute box of `id` inside `parent_inner`, clipped to it.
///
/// The result may have no area; callers treat that as "not rendered".
/// Returns `None` for stale ids.
pub fn resolve(tree: &Tree, id: NodeId, parent_inner: CellRect, children: Children) -> Option<CellRect> {
    let rect = unclipped(tree, id, parent_inner, children)?;
    Some(rect.intersect(&parent_inner))
}

/// The size `id` would resolve to inside `parent_inner`, before clipping.
pub fn measure(tree: &Tree, id: NodeId, parent_inner: CellRect) -> Option<(i32, i32)> {
    let rect = unclipped(tree, id, parent_inner, Children::Include)?;
    Some((rect.width(), rect.height()))
}

/// Natural outer size of `id`: content or children, whichever is larger,
/// plus insets.
pub fn natural_size(tree: &Tree, id: NodeId, children: Children) -> (i32, i32) {
    let Some(geometry) = tree.geometry(id) else {
        return (0, 0);
    };
    let (mut width, mut height) = geometry.content.unwrap_or((0, 0));
    if children == Children::Include {
        for &child in tree.children_of(id) {
            let Some(g) = tree.geometry(child) else {
                continue;
            };
            if tree.flags(child).is_some_and(|f| f.contains(NodeFlags::HIDDEN)) {
                continue;
            }
            let (natural_w, natural_h) = natural_size(tree, child, Children::Include);
            let w = fixed(g.position.width).unwrap_or(natural_w);
            let h = fixed(g.position.height).unwrap_or(natural_h);
            width = width.max(g.position.left.unwrap_or(0) + w);
            height = height.max(g.position.top.unwrap_or(0) + h);
        }
    }
    let insets = geometry.insets();
    (width + insets.horizontal(), height + insets.vertical())
}

fn fixed(length: Option<Length>) -> Option<i32> {
    match length? {
        Length::Cells(n) => Some(n),
        Length::Percent(_) => None,
    }
}

fn unclipped(tree: &Tree, id: NodeId, parent_inner: CellRect, children: Children) -> Option<CellRect> {
    let geometry: &Geometry = tree.geometry(id)?;
    let p = geometry.position;
    let natural = geometry.shrink.then(|| natural_size(tree, id, children));

    let (left, width) = axis(
        parent_inner.width(),
        p.left,
        p.right,
        p.width,
        natural.map(|(w, _)| w),
    );
    let (top, height) = axis(
        parent_inner.height(),
        p.top,
        p.bottom,
        p.height,
        natural.map(|(_, h)| h),
    );
    Some(CellRect::from_origin_size(
        parent_inner.xi + left,
        parent_inner.yi + top,
        width,
        height,
    ))
}

/// Resolve one axis to `(offset, size)` within `extent`.
fn axis(
    extent: i32,
    start: Option<i32>,
    end: Option<i32>,
    size: Option<Length>,
    natural: Option<i32>,
) -> (i32, i32) {
    let size = match (size, start, end) {
        (Some(length), _, _) => length.resolve(extent),
        (None, Some(start), Some(end)) => extent - start - end,
        (None, _, _) => natural.unwrap_or(extent - start.unwrap_or(0) - end.unwrap_or(0)),
    };
    let offset = match (start, end) {
        (Some(start), _) => start,
        (None, Some(end)) => extent - end - size,
        (None, None) => 0,
    };
    (offset, size)
}
