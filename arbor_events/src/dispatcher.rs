// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: run listener buckets and walk the bubbling chain.
//!
//! The dispatcher is generic over an [`EventHost`], the structure that owns
//! one [`Registry`] per node and knows each node's parent. It never holds a
//! borrow of the host while a listener runs: every bucket is copied first and
//! the host is lent to listeners mutably, so handlers may add or remove
//! listeners, emit further events, or restructure the tree.
//!
//! ## Semantics
//!
//! [`emit_local`] runs one bucket:
//!
//! - Entries run in registration order over a snapshot taken at call time.
//!   An entry removed by an earlier listener still runs in this dispatch; an
//!   entry added during the dispatch does not.
//! - A `once` entry is claimed right before it runs. It is skipped only when
//!   it was already claimed, by an earlier dispatch of the same bucket that
//!   is still in flight. Removing it with [`remove_listener`] does not count
//!   as a claim.
//! - Every entry runs; the combined result is [`Outcome::Stop`] if any entry
//!   returned it.
//! - A missing bucket yields `Ok(None)`, except for the local `error` bucket,
//!   where it yields [`UnhandledError`].
//!
//! [`emit`] is the three-tier protocol used for every public emission:
//!
//! 1. The local wildcard bucket ([`EventType::Wildcard`]) observes the event.
//! 2. The local bucket for the event type runs. On a root node the result of
//!    this step is final. Elsewhere a [`Outcome::Stop`] cancels everything
//!    after it.
//! 3. The element bucket for the event type runs on the emitting node, then on
//!    each ancestor toward the root. A [`Outcome::Stop`] ends the walk; nodes
//!    already visited are not revisited or undone.
//!
//! ## Minimal example
//!
//! ```
//! use arbor_events::{Channel, EventHost, EventType, Listener, Outcome, Registry};
//! use arbor_events::dispatcher::{add_listener, emit};
//!
//! // Two nodes: 0 is the root, 1 is its child.
//! struct Host {
//!     registries: Vec<Registry<Host>>,
//!     seen: Vec<&'static str>,
//! }
//!
//! impl EventHost for Host {
//!     type Key = usize;
//!     type Meta = ();
//!     fn registry(&self, node: usize) -> Option<&Registry<Self>> {
//!         self.registries.get(node)
//!     }
//!     fn registry_mut(&mut self, node: usize) -> Option<&mut Registry<Self>> {
//!         self.registries.get_mut(node)
//!     }
//!     fn parent_of(&self, node: usize) -> Option<usize> {
//!         (node == 1).then_some(0)
//!     }
//!     fn is_root(&self, node: usize) -> bool {
//!         node == 0
//!     }
//!     fn listener_meta(_: &Channel, _: &Listener<Self>) {}
//!     fn fault_message(_: &()) -> String {
//!         String::from("error")
//!     }
//! }
//!
//! let mut host = Host { registries: vec![Registry::new(), Registry::new()], seen: vec![] };
//! add_listener(&mut host, 1, EventType::Click.into(), Listener::new(|h: &mut Host, _| {
//!     h.seen.push("local");
//!     Outcome::Continue
//! }), false);
//! add_listener(&mut host, 0, Channel::element(EventType::Click), Listener::new(|h: &mut Host, e| {
//!     assert_eq!(e.target, 1);
//!     h.seen.push("root");
//!     Outcome::Continue
//! }), false);
//!
//! assert_eq!(emit(&mut host, 1, EventType::Click, ()).unwrap(), true);
//! assert_eq!(host.seen, ["local", "root"]);
//! ```

use alloc::string::String;

use crate::error::UnhandledError;
use crate::listener::{Listener, Registry};
use crate::types::{Channel, Event, EventType, Outcome};

/// The structure that owns per-node registries and the parent relation.
pub trait EventHost: Sized {
    /// Node handle.
    type Key: Copy + Eq + core::fmt::Debug;
    /// Payload carried by every event.
    type Meta: Clone;

    /// The registry of `node`, if the node exists.
    fn registry(&self, node: Self::Key) -> Option<&Registry<Self>>;

    /// The mutable registry of `node`, if the node exists.
    fn registry_mut(&mut self, node: Self::Key) -> Option<&mut Registry<Self>>;

    /// The parent of `node`, or `None` at the top of its chain.
    fn parent_of(&self, node: Self::Key) -> Option<Self::Key>;

    /// Whether `node` is a tree root. Roots never bubble.
    fn is_root(&self, node: Self::Key) -> bool;

    /// Payload for `newListener` / `removeListener` notices about `listener`
    /// on `channel`.
    fn listener_meta(channel: &Channel, listener: &Listener<Self>) -> Self::Meta;

    /// Human-readable form of an `error` payload, used when nobody listens.
    fn fault_message(meta: &Self::Meta) -> String;
}

/// Register `listener` on `channel` of `node`.
///
/// After the registration a local `newListener` notice is fired on `node`;
/// it does not bubble. `once` registrations remove themselves right before
/// their first invocation.
///
/// Returns `false` if `node` has no registry.
pub fn add_listener<H: EventHost>(
    host: &mut H,
    node: H::Key,
    channel: Channel,
    listener: Listener<H>,
    once: bool,
) -> bool {
    let Some(registry) = host.registry_mut(node) else {
        return false;
    };
    let meta = H::listener_meta(&channel, &listener);
    registry.push(channel, listener, once);
    notice(host, node, EventType::NewListener, meta);
    true
}

/// Remove the first registration of `listener` on `channel` of `node`.
///
/// Registrations made through `once` are found by the listener passed to it.
/// On success a local `removeListener` notice is fired. Returns whether an
/// entry was removed.
pub fn remove_listener<H: EventHost>(
    host: &mut H,
    node: H::Key,
    channel: &Channel,
    listener: &Listener<H>,
) -> bool {
    let removed = host
        .registry_mut(node)
        .is_some_and(|registry| registry.remove(channel, listener));
    if removed {
        notice(host, node, EventType::RemoveListener, H::listener_meta(channel, listener));
    }
    removed
}

/// Run the bucket for `channel` on `node` only.
///
/// Returns `Ok(None)` when there is no bucket, `Ok(Some(Outcome::Stop))` when
/// at least one listener stopped, and `Ok(Some(Outcome::Continue))` otherwise.
pub fn emit_local<H: EventHost>(
    host: &mut H,
    node: H::Key,
    channel: &Channel,
    event: &Event<H::Key, H::Meta>,
) -> Result<Option<Outcome>, UnhandledError> {
    let Some(entries) = host.registry(node).and_then(|r| r.snapshot(channel)) else {
        if *channel == Channel::Local(EventType::Error) {
            let message = H::fault_message(&event.meta);
            tracing::warn!(node = ?node, %message, "`error` emitted with no listener");
            return Err(UnhandledError { message });
        }
        return Ok(None);
    };

    let mut outcome = Outcome::Continue;
    for entry in entries {
        if let Some(claimed) = &entry.once {
            // Already claimed by a re-entrant dispatch of the same bucket.
            if claimed.replace(true) {
                continue;
            }
            let taken = host
                .registry_mut(node)
                .is_some_and(|registry| registry.take(channel, entry.serial));
            if taken {
                let meta = H::listener_meta(channel, &entry.listener);
                notice(host, node, EventType::RemoveListener, meta);
            }
        }
        if entry.listener.call(host, event) == Outcome::Stop {
            outcome = Outcome::Stop;
        }
    }
    Ok(Some(outcome))
}

/// Emit `kind` on `node` with wildcard observation and bubbling.
///
/// Returns `Ok(false)` if any step cancelled propagation, `Ok(true)`
/// otherwise. The only error is an `error` event nobody listens to locally.
pub fn emit<H: EventHost>(
    host: &mut H,
    node: H::Key,
    kind: EventType,
    meta: H::Meta,
) -> Result<bool, UnhandledError> {
    let event = Event::new(kind, node, meta);

    emit_local(host, node, &Channel::Local(EventType::Wildcard), &event)?;

    let local = emit_local(host, node, &Channel::Local(event.kind.clone()), &event)?;
    if host.is_root(node) {
        return Ok(local != Some(Outcome::Stop));
    }
    if local == Some(Outcome::Stop) {
        tracing::debug!(node = ?node, kind = %event.kind, "propagation stopped locally");
        return Ok(false);
    }

    let channel = Channel::Element(event.kind.clone());
    let mut current = Some(node);
    while let Some(at) = current {
        if emit_local(host, at, &channel, &event)? == Some(Outcome::Stop) {
            tracing::debug!(node = ?node, at = ?at, kind = %event.kind, "bubbling stopped");
            return Ok(false);
        }
        current = host.parent_of(at);
    }
    Ok(true)
}

/// Fire a local bookkeeping notice. These never use the `error` bucket, so
/// they cannot fault.
fn notice<H: EventHost>(host: &mut H, node: H::Key, kind: EventType, meta: H::Meta) {
    let channel = Channel::Local(kind.clone());
    let event = Event::new(kind, node, meta);
    if let Err(err) = emit_local(host, node, &channel, &event) {
        tracing::error!(node = ?node, %err, "listener notice faulted");
    }
}
