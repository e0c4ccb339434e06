// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// An `error` event was emitted on a node with no local `error` listener.
///
/// The failure is surfaced to the emitter instead of being dropped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unhandled error event: {message}")]
pub struct UnhandledError {
    /// Description of the failure carried by the event.
    pub message: String,
}
