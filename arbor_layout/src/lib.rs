// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=arbor_layout --heading-base-level=0

//! Arbor Layout: the render pass of an [`arbor_tree::Tree`].
//!
//! Rendering walks a screen top-down and resolves every visible node to an
//! absolute [`CellRect`](arbor_tree::CellRect), recorded on the node together
//! with its render index. Hit testing and drawing read those boxes back.
//!
//! - [`coords`] turns a node's [`Geometry`](arbor_tree::Geometry) into a box
//!   inside its parent: anchors, fixed and percent lengths, shrink-to-fit,
//!   border and padding.
//! - [`create_layout`] makes a container whose children need no position of
//!   their own. Its [`FlowPlacer`] packs them in rows, either tightly
//!   ([`LayoutMode::Inline`](arbor_tree::LayoutMode::Inline)) or on columns as
//!   wide as the widest child
//!   ([`LayoutMode::Grid`](arbor_tree::LayoutMode::Grid)).
//! - [`render_with_placer`] drives any other [`Placer`].
//!
//! ## Example
//!
//! ```rust
//! use arbor_layout::{create_layout, render_screen};
//! use arbor_tree::{
//!     CellRect, Geometry, LayoutMode, Length, NodeKind, NodeOptions, Position, ScreenOptions,
//!     Tree,
//! };
//!
//! let sized = |width, height| Geometry {
//!     position: Position {
//!         width: Some(Length::Cells(width)),
//!         height: Some(Length::Cells(height)),
//!         ..Position::default()
//!     },
//!     ..Geometry::default()
//! };
//!
//! let mut tree = Tree::new();
//! let screen = tree.create_screen(ScreenOptions::sized(40, 10));
//! let row = create_layout(
//!     &mut tree,
//!     LayoutMode::Inline,
//!     NodeOptions::new().parent(screen).geometry(sized(10, 10)),
//! )
//! .unwrap();
//! let cells: Vec<_> = (0..3)
//!     .map(|_| {
//!         tree.create(NodeKind::Element, NodeOptions::new().parent(row).geometry(sized(4, 2)))
//!             .unwrap()
//!     })
//!     .collect();
//!
//! render_screen(&mut tree, screen);
//! assert_eq!(tree.lpos(cells[1]), Some(CellRect::new(4, 0, 8, 2)));
//! // The third child does not fit next to the second and wraps.
//! assert_eq!(tree.lpos(cells[2]), Some(CellRect::new(0, 2, 4, 4)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod coords;
mod error;
mod flow;
mod layout;
mod render;

pub use error::LayoutError;
pub use flow::{FlowPlacer, Placement, PlacementContext, Placer, is_rendered, last_rendered};
pub use layout::create_layout;
pub use render::{inner_box, render, render_in, render_screen, render_with_placer};
