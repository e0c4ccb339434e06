// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registration and emission on tree nodes.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use arbor_events::dispatcher;
use arbor_events::{Channel, EventHost, EventType, Registry, UnhandledError};

use crate::payload::{Payload, TreeListener};
use crate::tree::Tree;
use crate::types::NodeId;

impl EventHost for Tree {
    type Key = NodeId;
    type Meta = Payload;

    fn registry(&self, node: NodeId) -> Option<&Registry<Self>> {
        self.slot(node).map(|n| &n.listeners)
    }

    fn registry_mut(&mut self, node: NodeId) -> Option<&mut Registry<Self>> {
        self.slot_mut(node).map(|n| &mut n.listeners)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        Self::parent_of(self, node)
    }

    fn is_root(&self, node: NodeId) -> bool {
        self.slot(node).is_some_and(|n| n.screen == node)
    }

    fn listener_meta(channel: &Channel, listener: &TreeListener) -> Payload {
        Payload::Listener(channel.clone(), listener.clone())
    }

    fn fault_message(meta: &Payload) -> String {
        match meta {
            Payload::Error(message) | Payload::Text(message) => message.clone(),
            other => format!("{other:?}"),
        }
    }
}

impl Tree {
    /// Register `listener` on `id`.
    ///
    /// Pass an [`EventType`] for a local listener or
    /// [`Channel::element`] for a bubbling one. Fires `newListener` on `id`.
    /// Returns `false` if `id` is stale.
    pub fn on(&mut self, id: NodeId, channel: impl Into<Channel>, listener: TreeListener) -> bool {
        dispatcher::add_listener(self, id, channel.into(), listener, false)
    }

    /// Register `listener` to run at most once.
    ///
    /// The registration can still be removed with [`Tree::off`] using the same
    /// `listener`.
    pub fn once(&mut self, id: NodeId, channel: impl Into<Channel>, listener: TreeListener) -> bool {
        dispatcher::add_listener(self, id, channel.into(), listener, true)
    }

    /// Remove the first registration of `listener`. Fires `removeListener` on
    /// success.
    pub fn off(&mut self, id: NodeId, channel: impl Into<Channel>, listener: &TreeListener) -> bool {
        dispatcher::remove_listener(self, id, &channel.into(), listener)
    }

    /// Drop every listener on `channel`, or every listener of `id` when
    /// `channel` is `None`. No notices are fired.
    pub fn remove_all_listeners(&mut self, id: NodeId, channel: Option<Channel>) {
        if let Some(node) = self.slot_mut(id) {
            node.listeners.clear(channel.as_ref());
        }
    }

    /// Listeners on `channel`, in registration order.
    pub fn listeners(&self, id: NodeId, channel: impl Into<Channel>) -> Vec<TreeListener> {
        self.slot(id)
            .map(|node| node.listeners.listeners(&channel.into()))
            .unwrap_or_default()
    }

    /// Emit `kind` on `id`: wildcard, local, then bubbling to the screen.
    ///
    /// Returns `Ok(false)` if a listener stopped propagation. Fails only for an
    /// [`EventType::Error`] nobody handles locally.
    pub fn emit(&mut self, id: NodeId, kind: EventType, payload: Payload) -> Result<bool, UnhandledError> {
        dispatcher::emit(self, id, kind, payload)
    }

    /// Emit on `id` and every descendant, in depth-first pre-order.
    ///
    /// `visit` runs on each node right before its dispatch. The node set is
    /// fixed up front; nodes destroyed along the way are skipped. Stops at the
    /// first fault.
    pub fn emit_descendants(
        &mut self,
        id: NodeId,
        kind: EventType,
        payload: Payload,
        visit: Option<&mut dyn FnMut(&mut Self, NodeId)>,
    ) -> Result<(), UnhandledError> {
        let nodes = self.descendants(id, true);
        self.emit_each(nodes, kind, payload, visit)
    }

    /// Emit on `id` and every ancestor, nearest first. Same rules as
    /// [`Tree::emit_descendants`].
    pub fn emit_ancestors(
        &mut self,
        id: NodeId,
        kind: EventType,
        payload: Payload,
        visit: Option<&mut dyn FnMut(&mut Self, NodeId)>,
    ) -> Result<(), UnhandledError> {
        let nodes = self.ancestors(id, true);
        self.emit_each(nodes, kind, payload, visit)
    }

    fn emit_each(
        &mut self,
        nodes: Vec<NodeId>,
        kind: EventType,
        payload: Payload,
        mut visit: Option<&mut dyn FnMut(&mut Self, NodeId)>,
    ) -> Result<(), UnhandledError> {
        for node in nodes {
            if !self.is_alive(node) {
                continue;
            }
            if let Some(visit) = visit.as_mut() {
                visit(self, node);
            }
            self.emit(node, kind.clone(), payload.clone())?;
        }
        Ok(())
    }

    /// Emit a lifecycle notification, for which a fault is impossible.
    ///
    /// Returns `false` if propagation was stopped or the dispatch faulted; the
    /// fault is logged rather than returned.
    pub fn notify(&mut self, id: NodeId, kind: EventType, payload: Payload) -> bool {
        match self.emit(id, kind, payload) {
            Ok(propagated) => propagated,
            Err(err) => {
                tracing::error!(?id, %err, "notification faulted");
                false
            }
        }
    }
}
