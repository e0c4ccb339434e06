// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener handles and the per-node listener registry.
//!
//! A [`Registry`] maps each [`Channel`] to an ordered bucket of entries.
//! Buckets preserve registration order and are dropped as soon as they become
//! empty, so [`Registry::has_listeners`] doubles as "is there a bucket".

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::dispatcher::EventHost;
use crate::types::{Channel, Event, Outcome};

/// A reference-counted event handler.
///
/// Identity is the identity of the underlying allocation: clones of a
/// `Listener` compare equal under [`Listener::ptr_eq`], two listeners built
/// from identical closures do not. Keep a clone around if you intend to
/// remove the listener later.
pub struct Listener<H: EventHost>(Rc<dyn Fn(&mut H, &Event<H::Key, H::Meta>) -> Outcome>);

impl<H: EventHost> Listener<H> {
    /// Wrap a closure.
    pub fn new(handler: impl Fn(&mut H, &Event<H::Key, H::Meta>) -> Outcome + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Whether both handles refer to the same registered closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Invoke the handler.
    pub fn call(&self, host: &mut H, event: &Event<H::Key, H::Meta>) -> Outcome {
        (self.0)(host, event)
    }
}

impl<H: EventHost> Clone for Listener<H> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<H: EventHost> PartialEq for Listener<H> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<H: EventHost> Eq for Listener<H> {}

impl<H: EventHost> fmt::Debug for Listener<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// One registration inside a bucket.
pub(crate) struct Entry<H: EventHost> {
    pub(crate) listener: Listener<H>,
    /// Set for `once` registrations. The flag is shared by every snapshot of
    /// the entry and flips when the entry is claimed.
    pub(crate) once: Option<Rc<Cell<bool>>>,
    /// Distinguishes two registrations of the same listener.
    pub(crate) serial: u64,
}

impl<H: EventHost> Clone for Entry<H> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
            once: self.once.clone(),
            serial: self.serial,
        }
    }
}

pub(crate) type Bucket<H> = SmallVec<[Entry<H>; 2]>;

/// Point-in-time copy of a bucket, taken before any listener runs.
pub(crate) type Snapshot<H> = SmallVec<[Entry<H>; 4]>;

/// Ordered listener buckets for a single node.
pub struct Registry<H: EventHost> {
    buckets: HashMap<Channel, Bucket<H>>,
    next_serial: u64,
}

impl<H: EventHost> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: EventHost> fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (channel, bucket) in &self.buckets {
            map.entry(channel, &bucket.len());
        }
        map.finish()
    }
}

impl<H: EventHost> Registry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
            next_serial: 0,
        }
    }

    /// Listeners currently registered on `channel`, in registration order.
    pub fn listeners(&self, channel: &Channel) -> Vec<Listener<H>> {
        self.buckets
            .get(channel)
            .map(|bucket| bucket.iter().map(|e| e.listener.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of registrations on `channel`.
    pub fn listener_count(&self, channel: &Channel) -> usize {
        self.buckets.get(channel).map_or(0, |bucket| bucket.len())
    }

    /// Whether `channel` has a bucket.
    pub fn has_listeners(&self, channel: &Channel) -> bool {
        self.buckets.contains_key(channel)
    }

    /// Whether no channel has any listener.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Drop one bucket, or every bucket when `channel` is `None`.
    pub fn clear(&mut self, channel: Option<&Channel>) {
        match channel {
            Some(channel) => {
                self.buckets.remove(channel);
            }
            None => self.buckets.clear(),
        }
    }

    pub(crate) fn push(&mut self, channel: Channel, listener: Listener<H>, once: bool) {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.buckets.entry(channel).or_default().push(Entry {
            listener,
            once: once.then(Rc::default),
            serial,
        });
    }

    /// Remove the first registration of `listener` on `channel`.
    pub(crate) fn remove(&mut self, channel: &Channel, listener: &Listener<H>) -> bool {
        self.remove_where(channel, |entry| entry.listener.ptr_eq(listener))
    }

    /// Remove one specific registration; used by `once` entries to claim
    /// themselves before running.
    pub(crate) fn take(&mut self, channel: &Channel, serial: u64) -> bool {
        self.remove_where(channel, |entry| entry.serial == serial)
    }

    pub(crate) fn snapshot(&self, channel: &Channel) -> Option<Snapshot<H>> {
        self.buckets
            .get(channel)
            .map(|bucket| bucket.iter().cloned().collect())
    }

    fn remove_where(&mut self, channel: &Channel, pred: impl Fn(&Entry<H>) -> bool) -> bool {
        let Some(bucket) = self.buckets.get_mut(channel) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(pred) else {
            return false;
        };
        bucket.remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(channel);
        }
        true
    }
}
