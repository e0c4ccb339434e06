// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node storage and construction options.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use arbor_events::Registry;
use hashbrown::HashMap;

use crate::tree::Tree;
use crate::types::{CellRect, Geometry, NodeFlags, NodeId, NodeKind, Uid};

/// Resource release hook run once per node by [`Tree::destroy`].
///
/// Any `FnMut(NodeId)` closure is a finalizer.
pub trait Finalizer {
    /// Release whatever the node holds outside the tree.
    fn free(&mut self, id: NodeId);
}

impl<F: FnMut(NodeId)> Finalizer for F {
    fn free(&mut self, id: NodeId) {
        self(id);
    }
}

/// How [`Tree::create`] should build and place a node.
///
/// The screen is resolved in this order: `screen`, the parent's screen, and
/// only if `default_screen` is set, the single live screen.
#[derive(Default)]
pub struct NodeOptions {
    /// Append the new node to this parent.
    pub parent: Option<NodeId>,
    /// The screen the node belongs to.
    pub screen: Option<NodeId>,
    /// Fall back to the only live screen when neither of the above is set.
    pub default_screen: bool,
    /// Initial flags.
    pub flags: NodeFlags,
    /// Placement request.
    pub geometry: Geometry,
    /// Existing detached nodes to append, in order.
    pub children: Vec<NodeId>,
    /// Release hook.
    pub finalizer: Option<Box<dyn Finalizer>>,
}

impl fmt::Debug for NodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeOptions")
            .field("parent", &self.parent)
            .field("screen", &self.screen)
            .field("default_screen", &self.default_screen)
            .field("flags", &self.flags)
            .field("geometry", &self.geometry)
            .field("children", &self.children)
            .field("finalizer", &self.finalizer.is_some())
            .finish()
    }
}

impl NodeOptions {
    /// Empty options: no parent and no screen.
    ///
    /// Set [`NodeOptions::parent`], [`NodeOptions::screen`] or
    /// [`NodeOptions::default_screen`] before creating the node, or
    /// [`Tree::create`](crate::Tree::create) fails with
    /// [`TreeError::NoScreen`](crate::TreeError::NoScreen).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to `parent` on creation.
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Belong to `screen`.
    pub fn screen(mut self, screen: NodeId) -> Self {
        self.screen = Some(screen);
        self
    }

    /// Allow the single-screen fallback.
    pub fn default_screen(mut self) -> Self {
        self.default_screen = true;
        self
    }

    /// Add `flags`.
    pub fn flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the placement request.
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Append `child` after creation.
    pub fn child(mut self, child: NodeId) -> Self {
        self.children.push(child);
        self
    }

    /// Run `finalizer` on destroy.
    pub fn finalizer(mut self, finalizer: impl Finalizer + 'static) -> Self {
        self.finalizer = Some(Box::new(finalizer));
        self
    }
}

pub(crate) struct Node {
    pub(crate) generation: u32,
    pub(crate) uid: Uid,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) screen: NodeId,
    pub(crate) detached: bool,
    pub(crate) destroyed: bool,
    pub(crate) flags: NodeFlags,
    pub(crate) geometry: Geometry,
    pub(crate) lpos: Option<CellRect>,
    pub(crate) render_index: Option<u32>,
    pub(crate) data: HashMap<String, Box<dyn Any>>,
    pub(crate) listeners: Registry<Tree>,
    pub(crate) finalizer: Option<Box<dyn Finalizer>>,
}

impl Node {
    pub(crate) fn new(generation: u32, kind: NodeKind, screen: NodeId) -> Self {
        Self {
            generation,
            uid: Uid::next(),
            kind,
            parent: None,
            children: Vec::new(),
            screen,
            detached: true,
            destroyed: false,
            flags: NodeFlags::empty(),
            geometry: Geometry::default(),
            lpos: None,
            render_index: None,
            data: HashMap::new(),
            listeners: Registry::new(),
            finalizer: None,
        }
    }
}
