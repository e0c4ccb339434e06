// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=arbor_tree --heading-base-level=0

//! Arbor Tree: the node tree of a terminal UI.
//!
//! Arbor Tree is the structural core a terminal toolkit builds its widgets on.
//!
//! - Owns a hierarchy of screens and regions in a generational arena.
//! - Tracks which nodes are attached to their screen and announces every
//!   transition (`attach`, `detach`, `reparent`, `adopt`, `remove`, `destroy`).
//! - Carries each screen's focus history and its clickable/keyable registries.
//! - Routes decoded mouse and key input to the right node.
//!
//! ## Events
//!
//! Every node owns an [`arbor_events::Registry`]. Register with [`Tree::on`]
//! (local) or with [`Channel::element`](arbor_events::Channel::element)
//! (bubbling), and emit with [`Tree::emit`]. Listeners receive `&mut Tree`,
//! so they may restructure the tree while an event is in flight.
//!
//! ```rust
//! use arbor_events::{Channel, EventType, Outcome};
//! use arbor_tree::{NodeKind, NodeOptions, Payload, ScreenOptions, Tree, TreeEvent, TreeListener};
//!
//! let mut tree = Tree::new();
//! let screen = tree.create_screen(ScreenOptions::default());
//! let button = tree.create(NodeKind::Widget("button"), NodeOptions::new().parent(screen)).unwrap();
//!
//! // A bubbling listener on the screen sees clicks from every descendant.
//! tree.on(screen, Channel::element(EventType::Click), TreeListener::new(|tree: &mut Tree, e: &TreeEvent| {
//!     tree.set(e.target, "clicked", true);
//!     Outcome::Continue
//! }));
//!
//! assert_eq!(tree.emit(button, EventType::Click, Payload::None), Ok(true));
//! assert!(tree.get_or(button, "clicked", false));
//! ```
//!
//! ## Not a renderer
//!
//! This crate stores each node's placement request ([`Geometry`]) and the box
//! it resolved to ([`Tree::lpos`]), but never computes boxes or draws. The
//! `arbor_layout` crate runs the render pass.
//!
//! ## API overview
//!
//! - [`Tree`]: the arena. Construction with [`Tree::create_screen`] and
//!   [`Tree::create`], mutation with [`Tree::insert`] and friends,
//!   [`Tree::remove`], [`Tree::detach`], [`Tree::destroy`].
//! - [`NodeOptions`] / [`ScreenOptions`]: construction options.
//! - [`NodeId`]: generational handle; [`Uid`]: process-unique creation number.
//! - [`Payload`]: the data carried by tree events.
//! - [`TreeError`]: cross-screen moves, cycles, stale ids, screen lookup.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod events;
mod node;
mod payload;
mod screen;
mod tree;
mod types;

pub use error::TreeError;
pub use node::{Finalizer, NodeOptions};
pub use payload::{Payload, TreeEvent, TreeListener};
pub use screen::ScreenOptions;
pub use tree::Tree;
pub use types::{
    CellRect, Geometry, Insets, KeyEvent, LayoutMode, Length, Modifiers, MouseButtons, MouseEvent,
    NodeFlags, NodeId, NodeKind, Position, Uid,
};
