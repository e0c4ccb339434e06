// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the tree: identifiers, flags, node kinds, and cell geometry.

use alloc::string::String;
use core::sync::atomic::{AtomicU64, Ordering};

/// Identifier for a node in the tree (generational).
///
/// A `NodeId` goes stale when its node is destroyed. The slot may later be
/// reused by another node, but under a newer generation, so a stale id never
/// aliases a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Process-unique, strictly increasing node number.
///
/// Unlike [`NodeId`], a `Uid` never reuses anything: two nodes created one
/// after the other, in any tree, compare in creation order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Uid(pub u64);

static NEXT_UID: AtomicU64 = AtomicU64::new(0);

impl Uid {
    pub(crate) fn next() -> Self {
        Self(NEXT_UID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How a layout container places its children.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LayoutMode {
    /// Row flow; each child is pulled up to the nearest sibling above it.
    #[default]
    Inline,
    /// Row flow on fixed columns as wide as the widest child.
    Grid,
}

/// The concrete variant of a node. Fixed at construction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// A tree root owning focus and the interactive registries.
    Screen,
    /// A plain positioned region.
    Element,
    /// A container whose children are placed automatically.
    Layout(LayoutMode),
    /// A widget specialization, identified by name (`"box"`, `"button"`, ...).
    Widget(&'static str),
}

impl NodeKind {
    /// The short name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Element => "element",
            Self::Layout(_) => "layout",
            Self::Widget(name) => name,
        }
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and input.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is hidden; it and its subtree are not rendered or focused.
        const HIDDEN    = 0b0000_0001;
        /// Node receives mouse input (listed in its screen's `clickable`).
        const CLICKABLE = 0b0000_0010;
        /// Node receives key input (listed in its screen's `keyable`).
        const KEYABLE   = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// Keyboard modifiers held during an input event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Meta / Alt.
        const META  = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// Mouse buttons held during a mouse event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        /// Left button.
        const LEFT   = 0b0000_0001;
        /// Middle button.
        const MIDDLE = 0b0000_0010;
        /// Right button.
        const RIGHT  = 0b0000_0100;
    }
}

/// An absolute rectangle in cell coordinates. `xl` and `yl` are exclusive.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CellRect {
    /// Left edge (inclusive).
    pub xi: i32,
    /// Top edge (inclusive).
    pub yi: i32,
    /// Right edge (exclusive).
    pub xl: i32,
    /// Bottom edge (exclusive).
    pub yl: i32,
}

impl CellRect {
    /// Construct from edges.
    pub const fn new(xi: i32, yi: i32, xl: i32, yl: i32) -> Self {
        Self { xi, yi, xl, yl }
    }

    /// Construct from an origin and a size.
    pub const fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Horizontal extent; may be zero or negative.
    pub const fn width(&self) -> i32 {
        self.xl - self.xi
    }

    /// Vertical extent; may be zero or negative.
    pub const fn height(&self) -> i32 {
        self.yl - self.yi
    }

    /// Whether both extents are positive.
    pub const fn has_area(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    /// Whether the cell `(x, y)` lies inside.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.xi && x < self.xl && y >= self.yi && y < self.yl
    }

    /// Shrink by `insets` on each side. The result may have no area.
    pub const fn inset(&self, insets: Insets) -> Self {
        Self::new(
            self.xi + insets.left,
            self.yi + insets.top,
            self.xl - insets.right,
            self.yl - insets.bottom,
        )
    }

    /// The overlap of two rectangles; an empty overlap has zero extent.
    pub fn intersect(&self, other: &Self) -> Self {
        let xi = self.xi.max(other.xi);
        let yi = self.yi.max(other.yi);
        Self::new(xi, yi, self.xl.min(other.xl).max(xi), self.yl.min(other.yl).max(yi))
    }
}

/// Per-side cell counts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Insets {
    /// Left.
    pub left: i32,
    /// Right.
    pub right: i32,
    /// Top.
    pub top: i32,
    /// Bottom.
    pub bottom: i32,
}

impl Insets {
    /// No insets.
    pub const ZERO: Self = Self::uniform(0);

    /// The same inset on every side.
    pub const fn uniform(n: i32) -> Self {
        Self {
            left: n,
            right: n,
            top: n,
            bottom: n,
        }
    }

    /// Left plus right.
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Top plus bottom.
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Side-wise sum.
    pub const fn plus(self, other: Self) -> Self {
        Self {
            left: self.left + other.left,
            right: self.right + other.right,
            top: self.top + other.top,
            bottom: self.bottom + other.bottom,
        }
    }
}

/// A requested size along one axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Length {
    /// A fixed number of cells.
    Cells(i32),
    /// A percentage of the parent's inner extent, rounded down.
    Percent(u16),
}

impl Length {
    /// Resolve against the parent's extent.
    pub fn resolve(self, extent: i32) -> i32 {
        match self {
            Self::Cells(n) => n,
            Self::Percent(p) => extent * i32::from(p) / 100,
        }
    }
}

/// Requested placement relative to the parent's inner box.
///
/// Unset anchors and sizes are filled in by the render pass.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Position {
    /// Offset from the parent's left edge.
    pub left: Option<i32>,
    /// Offset from the parent's right edge.
    pub right: Option<i32>,
    /// Offset from the parent's top edge.
    pub top: Option<i32>,
    /// Offset from the parent's bottom edge.
    pub bottom: Option<i32>,
    /// Requested width.
    pub width: Option<Length>,
    /// Requested height.
    pub height: Option<Length>,
}

impl Position {
    /// Whether the horizontal extent is fixed without looking at content.
    pub fn has_width(&self) -> bool {
        self.width.is_some() || (self.left.is_some() && self.right.is_some())
    }

    /// Whether the vertical extent is fixed without looking at content.
    pub fn has_height(&self) -> bool {
        self.height.is_some() || (self.top.is_some() && self.bottom.is_some())
    }
}

/// Everything the render pass needs to resolve a node's box.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Geometry {
    /// Anchors and sizes.
    pub position: Position,
    /// Draw a one-cell border on every side.
    pub border: bool,
    /// Space between the border and the content.
    pub padding: Insets,
    /// Natural content size `(width, height)`, used when shrinking.
    pub content: Option<(i32, i32)>,
    /// Size unset axes to fit content and children instead of filling.
    pub shrink: bool,
}

impl Geometry {
    /// Border plus padding.
    pub fn insets(&self) -> Insets {
        let border = if self.border { Insets::uniform(1) } else { Insets::ZERO };
        border.plus(self.padding)
    }
}

/// A decoded mouse report, as produced by an input backend.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct MouseEvent {
    /// Buttons held.
    pub buttons: MouseButtons,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Wheel deltas `(dx, dy)` for wheel events.
    pub wheel: Option<(i32, i32)>,
}

/// A decoded key press.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct KeyEvent {
    /// Key name (`"enter"`, `"tab"`, `"a"`, ...).
    pub name: String,
    /// The character produced, if any.
    pub ch: Option<char>,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uids_increase() {
        let a = Uid::next();
        let b = Uid::next();
        assert!(b > a);
    }

    #[test]
    fn rect_geometry() {
        let r = CellRect::from_origin_size(2, 3, 4, 5);
        assert_eq!(r, CellRect::new(2, 3, 6, 8));
        assert!(r.contains(2, 3));
        assert!(!r.contains(6, 3));
        assert!(r.has_area());
        assert!(!r.inset(Insets::uniform(2)).has_area());
        let clipped = r.intersect(&CellRect::new(5, 0, 20, 4));
        assert_eq!(clipped, CellRect::new(5, 3, 6, 4));
        assert!(!r.intersect(&CellRect::new(10, 10, 12, 12)).has_area());
    }

    #[test]
    fn lengths_and_insets() {
        assert_eq!(Length::Percent(50).resolve(15), 7);
        assert_eq!(Length::Cells(4).resolve(15), 4);
        let g = Geometry {
            border: true,
            padding: Insets::uniform(1),
            ..Geometry::default()
        };
        assert_eq!(g.insets(), Insets::uniform(2));
        assert_eq!(g.insets().horizontal(), 4);
    }
}
