// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::types::NodeId;

/// Failures of tree construction and mutation.
///
/// Everything not listed here is a defined no-op: removing a non-child,
/// detaching an unparented node, or emitting to a node nobody listens to.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node belongs to another screen and must not be moved across.
    #[error("cannot switch a node's screen: {node:?} belongs to {found:?}, not {expected:?}")]
    CrossScreen {
        /// The node being inserted.
        node: NodeId,
        /// The screen of the new parent.
        expected: NodeId,
        /// The screen the node belongs to.
        found: NodeId,
    },
    /// The node would become its own ancestor.
    #[error("cannot insert {child:?} beneath itself (via {parent:?})")]
    Cycle {
        /// The would-be parent.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },
    /// The id refers to a destroyed node.
    #[error("stale node id {0:?}")]
    StaleNode(NodeId),
    /// No screen was given and none exists to default to.
    #[error("no screen to attach the node to")]
    NoScreen,
    /// No screen was given and the default is ambiguous.
    #[error("default screen is ambiguous: {count} screens exist")]
    AmbiguousScreen {
        /// Number of live screens.
        count: usize,
    },
}
