// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=arbor_events --heading-base-level=0

//! Arbor Events: a deterministic, `no_std` per-node event bus.
//!
//! ## Overview
//!
//! Every node of a host structure (usually an [`arbor_tree`] tree) owns a
//! [`Registry`] of listeners. A listener is registered on a [`Channel`]:
//!
//! - `Channel::Local(kind)` runs only for events emitted on that very node.
//! - `Channel::Element(kind)` runs for events emitted on the node or bubbling
//!   up from any of its descendants.
//!
//! The crate does not own the tree. The host implements [`EventHost`] to hand
//! out registries and the parent relation, and the free functions in
//! [`dispatcher`] do the rest.
//!
//! ## Dispatch
//!
//! [`dispatcher::emit`] runs, in order: the local wildcard bucket, the local
//! bucket for the event type, and then the element bucket on the node and each
//! ancestor. Listeners return an [`Outcome`]; a [`Outcome::Stop`] cancels the
//! remaining steps and makes the emit report `false`. Roots run the local
//! bucket only.
//!
//! Listeners receive `&mut H`, so they may restructure the host while an event
//! is in flight. Each bucket is snapshotted before it runs, which makes the set
//! of listeners for one dispatch fixed at call time.
//!
//! ## Faults
//!
//! Emitting [`EventType::Error`] on a node with no local `error` listener is an
//! [`UnhandledError`]. Nothing else fails.
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! [`arbor_tree`]: https://docs.rs/arbor_tree

#![no_std]

extern crate alloc;

pub mod dispatcher;
mod error;
mod listener;
pub mod types;

pub use dispatcher::EventHost;
pub use error::UnhandledError;
pub use listener::{Listener, Registry};
pub use types::{Channel, Event, EventType, Outcome};
