// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event payloads carried through the tree's listeners.

use alloc::string::String;

use arbor_events::{Channel, Event, Listener};

use crate::tree::Tree;
use crate::types::{CellRect, KeyEvent, MouseEvent, NodeId};

/// Data attached to a tree event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Payload {
    /// Nothing (`attach`, `detach`, `destroy`, `show`, `hide`, `prerender`).
    #[default]
    None,
    /// A related node: the new parent for `reparent`, the child for `adopt`
    /// and `remove`, the other side of a `focus`/`blur` handoff.
    Node(Option<NodeId>),
    /// A listener and the channel it was added to or removed from. Listeners
    /// compare by identity.
    Listener(Channel, TreeListener),
    /// Mouse input.
    Mouse(MouseEvent),
    /// Key input.
    Key(KeyEvent),
    /// The box a node resolved to during `render`.
    Rect(CellRect),
    /// New screen size for `resize`.
    Resize {
        /// Columns.
        cols: u16,
        /// Rows.
        rows: u16,
    },
    /// Failure description for `error`.
    Error(String),
    /// Free-form text for custom events.
    Text(String),
}

/// An event as seen by tree listeners.
pub type TreeEvent = Event<NodeId, Payload>;

/// A listener registered on a tree node.
pub type TreeListener = Listener<Tree>;
