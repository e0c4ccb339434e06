// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Automatic child placement for layout containers.
//!
//! A [`Placer`] decides, child by child and in index order, where each child
//! of a layout goes. Placement is strictly sequential: a child's position
//! depends on the boxes its earlier siblings resolved to, so the render pass
//! renders each child before asking for the next placement.
//!
//! [`FlowPlacer`] is the built-in row flow:
//!
//! - The first rendered child goes to the origin.
//! - Every other child starts right of the last rendered sibling. In
//!   [`LayoutMode::Grid`] the left edge is pushed to the next column boundary,
//!   columns being as wide as the widest child.
//! - A child that would cross the right edge starts a new row below the
//!   tallest child of the row just closed.
//! - In [`LayoutMode::Inline`] each child is then pulled up to sit right under
//!   the sibling of the previous row whose left edge is closest to its own.

use arbor_tree::{CellRect, LayoutMode, NodeId, Tree};

use crate::coords;

/// What a [`Placer`] sees of the container being laid out.
#[derive(Clone, Copy, Debug)]
pub struct PlacementContext<'a> {
    /// The container's inner box (after border and padding).
    pub inner: CellRect,
    /// The children, in index order, as of the start of the pass.
    pub children: &'a [NodeId],
}

/// Where a child goes, relative to the container's inner box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Render the child with its left and top anchors set to these offsets.
    At {
        /// Offset from the inner box's left edge.
        left: i32,
        /// Offset from the inner box's top edge.
        top: i32,
    },
    /// Do not render the child this pass.
    Skip,
}

/// A child placement policy.
pub trait Placer {
    /// Called once per pass, before the first [`Placer::place`].
    fn begin(&mut self, tree: &Tree, cx: &PlacementContext<'_>) {
        let _ = (tree, cx);
    }

    /// Place `cx.children[index]`. Earlier children have been rendered (or
    /// skipped) already.
    fn place(&mut self, tree: &Tree, cx: &PlacementContext<'_>, index: usize) -> Placement;
}

/// Whether `id` resolved to a box with area in the current pass.
#[must_use]
pub fn is_rendered(tree: &Tree, id: NodeId) -> bool {
    tree.lpos(id).is_some_and(|rect| rect.has_area())
}

/// The nearest sibling before `index` that is rendered.
#[must_use]
pub fn last_rendered(tree: &Tree, children: &[NodeId], index: usize) -> Option<NodeId> {
    children
        .get(..index)?
        .iter()
        .rev()
        .copied()
        .find(|&id| is_rendered(tree, id))
}

/// Row flow with row wrapping; see the module docs.
#[derive(Clone, Debug, Default)]
pub struct FlowPlacer {
    mode: LayoutMode,
    /// Top of the current row, relative to the inner box.
    row_offset: i32,
    /// Index of the first child of the current row.
    row_index: usize,
    /// Index of the first child of the previous row.
    last_row_index: usize,
    /// Widest child; the column width in grid mode.
    high_width: i32,
}

impl FlowPlacer {
    /// A placer for `mode`.
    #[must_use]
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// The mode this placer runs in.
    #[must_use]
    pub const fn mode(&self) -> LayoutMode {
        self.mode
    }
}

impl Placer for FlowPlacer {
    fn begin(&mut self, tree: &Tree, cx: &PlacementContext<'_>) {
        self.row_offset = 0;
        self.row_index = 0;
        self.last_row_index = 0;
        self.high_width = cx
            .children
            .iter()
            .filter_map(|&child| coords::measure(tree, child, cx.inner))
            .map(|(width, _)| width)
            .max()
            .unwrap_or(0);
    }

    fn place(&mut self, tree: &Tree, cx: &PlacementContext<'_>, index: usize) -> Placement {
        let Some(&child) = cx.children.get(index) else {
            return Placement::Skip;
        };
        let Some((width, _)) = coords::measure(tree, child, cx.inner) else {
            return Placement::Skip;
        };
        let inner = cx.inner;

        let (mut left, mut top) = (0, 0);
        if let Some(last) = last_rendered(tree, cx.children, index).and_then(|id| tree.lpos(id)) {
            left = last.xl - inner.xi;
            if self.mode == LayoutMode::Grid {
                left += self.high_width - last.width();
            }
            if left + width <= inner.width() {
                top = self.row_offset;
            } else {
                self.row_offset += cx
                    .children
                    .get(self.row_index..index)
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|&id| tree.lpos(id).filter(CellRect::has_area))
                    .map(|rect| rect.height())
                    .max()
                    .unwrap_or(0);
                self.last_row_index = self.row_index;
                self.row_index = index;
                left = 0;
                top = self.row_offset;
            }
        }

        if self.mode == LayoutMode::Inline {
            let mut above: Option<(i32, CellRect)> = None;
            let previous_row = cx
                .children
                .get(self.last_row_index..self.row_index)
                .unwrap_or_default();
            for &sibling in previous_row {
                let Some(rect) = tree.lpos(sibling).filter(CellRect::has_area) else {
                    continue;
                };
                let distance = (left - (rect.xi - inner.xi)).abs();
                if above.is_none_or(|(best, _)| distance < best) {
                    above = Some((distance, rect));
                }
            }
            if let Some((_, rect)) = above {
                top = rect.yl - inner.yi;
            }
        }

        tracing::trace!(?child, index, left, top, "placed");
        Placement::At { left, top }
    }
}
