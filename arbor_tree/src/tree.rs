// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, attachment, destruction, queries.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use arbor_events::EventType;
use hashbrown::HashMap;

use crate::error::TreeError;
use crate::node::{Node, NodeOptions};
use crate::payload::Payload;
use crate::screen::ScreenState;
use crate::types::{CellRect, Geometry, NodeFlags, NodeId, NodeKind, Uid};

/// Arena holding every node of every screen.
///
/// Children are owned by their parent (the `children` sequence is the only
/// owning edge); `parent` and `screen` are plain back references used for
/// lookup. Nodes are created detached and become attached when inserted under
/// an attached ancestor. Every structural change is announced through the
/// node's listeners (see [`Tree::on`]).
///
/// ## Example
///
/// ```rust
/// use arbor_tree::{NodeKind, NodeOptions, ScreenOptions, Tree};
///
/// let mut tree = Tree::new();
/// let screen = tree.create_screen(ScreenOptions::default());
/// let panel = tree.create(NodeKind::Element, NodeOptions::new().parent(screen)).unwrap();
/// let label = tree.create(NodeKind::Widget("text"), NodeOptions::new().screen(screen)).unwrap();
///
/// assert!(!tree.is_detached(panel));
/// assert!(tree.is_detached(label));
///
/// tree.append(panel, label).unwrap();
/// assert!(!tree.is_detached(label));
/// assert_eq!(tree.ancestors(label, false), [panel, screen]);
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// live screens in creation order
    pub(crate) screens: Vec<NodeId>,
    pub(crate) screen_state: HashMap<NodeId, ScreenState>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("screens", &self.screens)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty tree with no screens.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            screens: Vec::new(),
            screen_state: HashMap::new(),
        }
    }

    /// Create a detached node.
    ///
    /// The node is appended to `options.parent` before this returns, then the
    /// initial `options.children` are appended in order. Every id in the
    /// options is validated first (stale ids, screen mismatches, and initial
    /// children that are the parent or one of its ancestors), so a bad option
    /// leaves the tree untouched. If a listener breaks an append anyway, the
    /// new node is taken out again, its adopted children detached, and the
    /// error returned.
    pub fn create(&mut self, kind: NodeKind, options: NodeOptions) -> Result<NodeId, TreeError> {
        let NodeOptions {
            parent,
            screen,
            default_screen,
            flags,
            geometry,
            children,
            finalizer,
        } = options;

        let screen = match (screen, parent) {
            (Some(screen), _) => screen,
            (None, Some(parent)) => self.slot(parent).ok_or(TreeError::StaleNode(parent))?.screen,
            (None, None) if default_screen => self.default_screen()?,
            (None, None) => return Err(TreeError::NoScreen),
        };
        if !self.screen_state.contains_key(&screen) {
            return Err(TreeError::StaleNode(screen));
        }
        for &other in parent.iter().chain(&children) {
            let found = self.slot(other).ok_or(TreeError::StaleNode(other))?.screen;
            if found != screen {
                return Err(TreeError::CrossScreen {
                    node: other,
                    expected: screen,
                    found,
                });
            }
        }
        if let Some(parent) = parent
            && let Some(&child) = children
                .iter()
                .find(|&&child| child == parent || self.has_ancestor(parent, child))
        {
            return Err(TreeError::Cycle { parent, child });
        }

        let id = self.alloc(kind, Some(screen));
        if let Some(node) = self.slot_mut(id) {
            node.flags = flags;
            node.geometry = geometry;
            node.finalizer = finalizer;
        }
        tracing::trace!(?id, kind = kind.name(), "created node");

        if let Err(err) = self.adopt_initial(id, parent, children) {
            for child in self.children_of(id).to_vec() {
                self.remove(id, child);
            }
            self.destroy(id);
            return Err(err);
        }
        Ok(id)
    }

    fn adopt_initial(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        children: Vec<NodeId>,
    ) -> Result<(), TreeError> {
        if let Some(parent) = parent {
            self.append(parent, id)?;
        }
        for child in children {
            self.append(id, child)?;
        }
        Ok(())
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, screen: Option<NodeId>) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        self.nodes[idx] = Some(Node::new(generation, kind, screen.unwrap_or(id)));
        id
    }

    /// Insert `child` into `parent`'s children at `index`.
    ///
    /// `index` is clamped to the number of children. The child is first
    /// removed from its current parent, if any. Fires `reparent` on the child,
    /// `adopt` on the parent, then `attach` on every node of the child's
    /// subtree that becomes attached. If the screen has nothing focused yet,
    /// the child receives focus.
    pub fn insert(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), TreeError> {
        self.check_insert(parent, child)?;
        if let Some(old) = self.parent_of(child) {
            self.remove(old, child);
            // Listeners of the removal may have restructured the tree.
            self.check_insert(parent, child)?;
        }

        let (screen, detached) = {
            let p = self.slot_mut(parent).ok_or(TreeError::StaleNode(parent))?;
            let index = index.min(p.children.len());
            p.children.insert(index, child);
            (p.screen, p.detached)
        };
        if let Some(c) = self.slot_mut(child) {
            c.parent = Some(parent);
        }
        tracing::debug!(?parent, ?child, index, "inserted node");

        self.notify(child, EventType::Reparent, Payload::Node(Some(parent)));
        self.notify(parent, EventType::Adopt, Payload::Node(Some(child)));

        for id in self.descendants(child, true) {
            let Some(node) = self.slot_mut(id) else {
                continue;
            };
            let attached = node.detached && !detached;
            node.detached = detached;
            if attached {
                self.register_interactive(id);
                tracing::trace!(?id, "attached");
                self.notify(id, EventType::Attach, Payload::None);
            }
        }

        if self.focused(screen).is_none() {
            self.focus_push(screen, child);
        }
        Ok(())
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let p = self.slot(parent).ok_or(TreeError::StaleNode(parent))?;
        let c = self.slot(child).ok_or(TreeError::StaleNode(child))?;
        if c.screen != p.screen {
            return Err(TreeError::CrossScreen {
                node: child,
                expected: p.screen,
                found: c.screen,
            });
        }
        if parent == child || self.has_ancestor(parent, child) {
            return Err(TreeError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.insert(parent, child, 0)
    }

    /// Insert `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let len = self.children_of(parent).len();
        self.insert(parent, child, len)
    }

    /// Insert `child` right before `other` among `parent`'s children.
    ///
    /// Returns `Ok(false)` without doing anything if `other` is not a child of
    /// `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        other: NodeId,
    ) -> Result<bool, TreeError> {
        let Some(index) = self.position_in(parent, other) else {
            return Ok(false);
        };
        self.insert(parent, child, index).map(|()| true)
    }

    /// Insert `child` right after `other` among `parent`'s children.
    ///
    /// Returns `Ok(false)` without doing anything if `other` is not a child of
    /// `parent`.
    pub fn insert_after(
        &mut self,
        parent: NodeId,
        child: NodeId,
        other: NodeId,
    ) -> Result<bool, TreeError> {
        let Some(index) = self.position_in(parent, other) else {
            return Ok(false);
        };
        self.insert(parent, child, index + 1).map(|()| true)
    }

    fn position_in(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children_of(parent).iter().position(|&c| c == child)
    }

    /// Remove `child` from `parent`.
    ///
    /// Returns `false` if `child` is not a child of `parent`. Clears the
    /// child's resolved box, drops it from the screen's interactive
    /// registries, fires `reparent` (no parent) on it and `remove` on
    /// `parent`, then `detach` on every node of its subtree that was
    /// attached. If the child was focused, the screen rewinds focus.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent_of(child) != Some(parent) {
            return false;
        }
        let Some(p) = self.slot_mut(parent) else {
            return false;
        };
        let Some(pos) = p.children.iter().position(|&c| c == child) else {
            return false;
        };
        p.children.remove(pos);
        let screen = p.screen;
        if let Some(c) = self.slot_mut(child) {
            c.lpos = None;
            c.parent = None;
        }
        self.unregister_interactive(screen, child);
        tracing::debug!(?parent, ?child, "removed node");

        self.notify(child, EventType::Reparent, Payload::Node(None));
        self.notify(parent, EventType::Remove, Payload::Node(Some(child)));

        for id in self.descendants(child, true) {
            let Some(node) = self.slot_mut(id) else {
                continue;
            };
            let was_attached = !node.detached;
            node.detached = true;
            if was_attached {
                tracing::trace!(?id, "detached");
                self.notify(id, EventType::Detach, Payload::None);
            }
        }

        if self.focused(screen) == Some(child) {
            self.rewind_focus(screen);
        }
        true
    }

    /// Remove `id` from its parent. Returns `false` if it has none.
    pub fn detach(&mut self, id: NodeId) -> bool {
        match self.parent_of(id) {
            Some(parent) => self.remove(parent, id),
            None => false,
        }
    }

    /// Destroy `id` and its whole subtree.
    ///
    /// The node is detached first. Then, in depth-first pre-order, each node
    /// runs its finalizer, is marked destroyed, and fires `destroy`; each node
    /// is finalized exactly once. Afterwards every destroyed id is stale.
    /// Destroying a screen also drops its focus and registry state.
    ///
    /// Returns `false` if `id` was already destroyed.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if self.slot(id).is_none_or(|node| node.destroyed) {
            return false;
        }
        tracing::debug!(?id, "destroying subtree");
        self.detach(id);

        let doomed = self.descendants(id, true);
        for &node in &doomed {
            let Some(slot) = self.slot_mut(node) else {
                continue;
            };
            if slot.destroyed {
                continue;
            }
            let finalizer = slot.finalizer.take();
            if let Some(mut finalizer) = finalizer {
                finalizer.free(node);
            }
            if let Some(slot) = self.slot_mut(node) {
                slot.destroyed = true;
            }
            tracing::trace!(?node, "destroyed");
            self.notify(node, EventType::Destroy, Payload::None);
        }

        for &node in doomed.iter().rev() {
            self.release(node);
        }
        true
    }

    fn release(&mut self, id: NodeId) {
        let Some(node) = self.slot(id) else {
            return;
        };
        let screen = node.screen;
        self.forget(screen, id);
        let Some(node) = self.nodes[id.idx()].take() else {
            return;
        };
        if let Some(parent) = node.parent
            && let Some(p) = self.slot_mut(parent)
        {
            p.children.retain(|&c| c != id);
        }
        // Nodes adopted during the destroy walk survive as detached roots.
        for child in node.children {
            if let Some(c) = self.slot_mut(child) {
                c.parent = None;
                c.detached = true;
            }
        }
        self.free_list.push(id.idx());
    }

    /// Position of `id` among its siblings.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.position_in(self.parent_of(id)?, id)
    }

    /// Move `id` to `index` among its siblings without any lifecycle events.
    ///
    /// Negative indices count from the back (`-1` is the last position).
    /// Out-of-range indices are clamped. Returns `false` if `id` has no parent.
    pub fn set_index(&mut self, id: NodeId, index: isize) -> bool {
        let Some(parent) = self.parent_of(id) else {
            return false;
        };
        let Some(p) = self.slot_mut(parent) else {
            return false;
        };
        let Some(from) = p.children.iter().position(|&c| c == id) else {
            return false;
        };
        let len = p.children.len();
        let to = if index < 0 {
            len.saturating_sub(index.unsigned_abs())
        } else {
            index.unsigned_abs()
        };
        let to = to.min(len - 1);
        let node = p.children.remove(from);
        p.children.insert(to, node);
        true
    }

    /// Move `id` to the last position among its siblings (drawn on top).
    pub fn set_front(&mut self, id: NodeId) -> bool {
        self.set_index(id, -1)
    }

    /// Move `id` to the first position among its siblings.
    pub fn set_back(&mut self, id: NodeId) -> bool {
        self.set_index(id, 0)
    }
}

// --- queries ---

impl Tree {
    /// Returns true if `id` refers to a live node.
    ///
    /// A node stays live while its own `destroy` walk runs; see
    /// [`Tree::is_destroyed`].
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Whether `id` has been destroyed (or is being destroyed).
    pub fn is_destroyed(&self, id: NodeId) -> bool {
        match self.nodes.get(id.idx()) {
            Some(Some(node)) => node.generation != id.1 || node.destroyed,
            Some(None) => true,
            None => false,
        }
    }

    /// Whether `id` is unreachable from its screen's root. Stale ids are.
    pub fn is_detached(&self, id: NodeId) -> bool {
        self.slot(id).is_none_or(|node| node.detached)
    }

    /// The node's kind.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.slot(id).map(|node| node.kind)
    }

    /// The node's process-unique number.
    pub fn uid(&self, id: NodeId) -> Option<Uid> {
        self.slot(id).map(|node| node.uid)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.parent
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map_or(&[], |node| &node.children)
    }

    /// The screen the node belongs to. A screen belongs to itself.
    pub fn screen_of(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).map(|node| node.screen)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.slot(id).map(|node| node.flags)
    }

    /// The placement request of a node.
    pub fn geometry(&self, id: NodeId) -> Option<&Geometry> {
        self.slot(id).map(|node| &node.geometry)
    }

    /// Mutable placement request of a node.
    pub fn geometry_mut(&mut self, id: NodeId) -> Option<&mut Geometry> {
        self.slot_mut(id).map(|node| &mut node.geometry)
    }

    /// The box the node resolved to in the last render pass, if any.
    pub fn lpos(&self, id: NodeId) -> Option<CellRect> {
        self.slot(id)?.lpos
    }

    /// Forget the node's resolved box.
    pub fn clear_lpos(&mut self, id: NodeId) {
        if let Some(node) = self.slot_mut(id) {
            node.lpos = None;
        }
    }

    /// Record that `id` rendered to `rect`, assigning it the next render index
    /// of its screen. Returns that index.
    pub fn mark_rendered(&mut self, id: NodeId, rect: CellRect) -> Option<u32> {
        let screen = self.slot(id)?.screen;
        let index = self.next_render_index(screen);
        let node = self.slot_mut(id)?;
        node.lpos = Some(rect);
        node.render_index = Some(index);
        Some(index)
    }

    /// Order in which the node was last rendered on its screen.
    pub fn render_index(&self, id: NodeId) -> Option<u32> {
        self.slot(id)?.render_index
    }

    pub(crate) fn slot(&self, id: NodeId) -> Option<&Node> {
        let node = self.nodes.get(id.idx())?.as_ref()?;
        (node.generation == id.1).then_some(node)
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let node = self.nodes.get_mut(id.idx())?.as_mut()?;
        if node.generation != id.1 {
            return None;
        }
        Some(node)
    }
}

// --- traversal ---

impl Tree {
    /// The subtree under `id` in depth-first pre-order.
    pub fn descendants(&self, id: NodeId, include_self: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack: Vec<NodeId> = self.children_of(id).iter().rev().copied().collect();
        if include_self {
            out.push(id);
        }
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children_of(node).iter().rev());
        }
        out
    }

    /// The parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId, include_self: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        if include_self && self.is_alive(id) {
            out.push(id);
        }
        let mut current = self.parent_of(id);
        while let Some(node) = current {
            out.push(node);
            current = self.parent_of(node);
        }
        out
    }

    /// Visit the subtree under `id` in depth-first pre-order.
    ///
    /// The walk is fixed before the first visit; `visit` may restructure the
    /// tree, and nodes it destroys are skipped.
    pub fn for_descendants(
        &mut self,
        id: NodeId,
        include_self: bool,
        mut visit: impl FnMut(&mut Self, NodeId),
    ) {
        for node in self.descendants(id, include_self) {
            if self.is_alive(node) {
                visit(self, node);
            }
        }
    }

    /// Visit the parent chain of `id`, nearest first. Same snapshot rules as
    /// [`Tree::for_descendants`].
    pub fn for_ancestors(
        &mut self,
        id: NodeId,
        include_self: bool,
        mut visit: impl FnMut(&mut Self, NodeId),
    ) {
        for node in self.ancestors(id, include_self) {
            if self.is_alive(node) {
                visit(self, node);
            }
        }
    }

    /// Whether `target` is strictly below `id`.
    pub fn has_descendant(&self, id: NodeId, target: NodeId) -> bool {
        id != target && self.has_ancestor(target, id)
    }

    /// Whether `target` is strictly above `id`.
    pub fn has_ancestor(&self, id: NodeId, target: NodeId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(node) = current {
            if node == target {
                return true;
            }
            current = self.parent_of(node);
        }
        false
    }

    /// Get the next node in depth-first traversal order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }

        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.sibling(node, 1) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    /// Get the previous node in reverse depth-first traversal order.
    ///
    /// Returns `None` if no previous node exists or if the current node is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        let Some(mut node) = self.sibling(current, -1) else {
            return self.parent_of(current);
        };
        while let Some(&last_child) = self.children_of(node).last() {
            node = last_child;
        }
        Some(node)
    }

    fn sibling(&self, node: NodeId, offset: isize) -> Option<NodeId> {
        let pos = self.index_of(node)?;
        let siblings = self.children_of(self.parent_of(node)?);
        siblings.get(pos.checked_add_signed(offset)?).copied()
    }
}

// --- data store ---

impl Tree {
    /// Store `value` under `key` on `id`, replacing any previous value.
    ///
    /// Returns `false` if `id` is stale.
    pub fn set<T: Any>(&mut self, id: NodeId, key: impl Into<String>, value: T) -> bool {
        let Some(node) = self.slot_mut(id) else {
            return false;
        };
        node.data.insert(key.into(), Box::new(value));
        true
    }

    /// Borrow the value stored under `key`, if it is a `T`.
    pub fn get<T: Any>(&self, id: NodeId, key: &str) -> Option<&T> {
        self.slot(id)?.data.get(key)?.downcast_ref::<T>()
    }

    /// Mutably borrow the value stored under `key`, if it is a `T`.
    pub fn get_mut<T: Any>(&mut self, id: NodeId, key: &str) -> Option<&mut T> {
        self.slot_mut(id)?.data.get_mut(key)?.downcast_mut::<T>()
    }

    /// The value stored under `key`, or `default` when nothing (or something
    /// of another type) was stored. A stored "empty" value such as `0` or
    /// `false` is returned as is.
    pub fn get_or<T: Any + Clone>(&self, id: NodeId, key: &str, default: T) -> T {
        self.get::<T>(id, key).cloned().unwrap_or(default)
    }

    /// Whether anything is stored under `key`.
    pub fn has_data(&self, id: NodeId, key: &str) -> bool {
        self.slot(id).is_some_and(|node| node.data.contains_key(key))
    }

    /// Remove and return the value under `key` if it is a `T`; a value of
    /// another type is left in place.
    pub fn take_data<T: Any>(&mut self, id: NodeId, key: &str) -> Option<T> {
        let data = &mut self.slot_mut(id)?.data;
        let (key, value) = data.remove_entry(key)?;
        match value.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(value) => {
                data.insert(key, value);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{TreeEvent, TreeListener};
    use crate::screen::ScreenOptions;
    use alloc::rc::Rc;
    use alloc::vec;
    use arbor_events::Outcome;
    use core::cell::{Cell, RefCell};

    type Log = Rc<RefCell<Vec<(NodeId, EventType)>>>;

    fn record(tree: &mut Tree, id: NodeId, kind: EventType, log: &Log) {
        let log = Rc::clone(log);
        tree.on(
            id,
            kind,
            TreeListener::new(move |_: &mut Tree, e: &TreeEvent| {
                log.borrow_mut().push((e.target, e.kind.clone()));
                Outcome::Continue
            }),
        );
    }

    fn element(tree: &mut Tree, options: NodeOptions) -> NodeId {
        tree.create(NodeKind::Element, options).unwrap()
    }

    #[test]
    fn uids_increase_across_destroy() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = element(&mut tree, NodeOptions::new().parent(screen));
        let ua = tree.uid(a).unwrap();
        tree.destroy(a);
        let b = element(&mut tree, NodeOptions::new().parent(screen));
        // The slot is reused, the id is not.
        assert_eq!(a.idx(), b.idx());
        assert_ne!(a, b);
        assert!(tree.uid(b).unwrap() > ua);
        assert!(tree.is_destroyed(a));
        assert!(!tree.is_destroyed(b));
    }

    #[test]
    fn insert_then_remove_restores_order() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let kids: Vec<NodeId> = (0..3)
            .map(|_| element(&mut tree, NodeOptions::new().parent(screen)))
            .collect();
        let extra = element(&mut tree, NodeOptions::new().screen(screen));

        for index in 0..=3 {
            tree.insert(screen, extra, index).unwrap();
            assert_eq!(tree.index_of(extra), Some(index));
            assert!(tree.remove(screen, extra));
            assert_eq!(tree.children_of(screen), kids.as_slice());
        }

        // Past the end clamps to append.
        tree.insert(screen, extra, 99).unwrap();
        assert_eq!(tree.index_of(extra), Some(3));
    }

    #[test]
    fn attach_and_detach_cascade_once_per_node() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let top = element(&mut tree, NodeOptions::new().screen(screen));
        let mid = element(&mut tree, NodeOptions::new().parent(top));
        let leaf = element(&mut tree, NodeOptions::new().parent(mid));
        assert!(tree.is_detached(leaf));

        let log = Log::default();
        for id in [screen, top, mid, leaf] {
            for kind in [
                EventType::Attach,
                EventType::Detach,
                EventType::Reparent,
                EventType::Adopt,
                EventType::Remove,
            ] {
                record(&mut tree, id, kind, &log);
            }
        }

        tree.append(screen, top).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                (top, EventType::Reparent),
                (screen, EventType::Adopt),
                (top, EventType::Attach),
                (mid, EventType::Attach),
                (leaf, EventType::Attach),
            ]
        );
        assert!(!tree.is_detached(leaf));

        log.borrow_mut().clear();
        assert!(tree.detach(top));
        assert_eq!(
            *log.borrow(),
            vec![
                (top, EventType::Reparent),
                (screen, EventType::Remove),
                (top, EventType::Detach),
                (mid, EventType::Detach),
                (leaf, EventType::Detach),
            ]
        );

        // Removing a non-child and detaching a root are no-ops.
        log.borrow_mut().clear();
        assert!(!tree.remove(screen, leaf));
        assert!(!tree.detach(top));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn moving_within_an_attached_tree_reattaches() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = element(&mut tree, NodeOptions::new().parent(screen));
        let b = element(&mut tree, NodeOptions::new().parent(screen));
        let c = element(&mut tree, NodeOptions::new().parent(a));

        let log = Log::default();
        record(&mut tree, c, EventType::Detach, &log);
        record(&mut tree, c, EventType::Attach, &log);
        tree.append(b, c).unwrap();

        assert_eq!(tree.parent_of(c), Some(b));
        assert!(tree.children_of(a).is_empty());
        assert_eq!(*log.borrow(), vec![(c, EventType::Detach), (c, EventType::Attach)]);
    }

    #[test]
    fn cross_screen_insert_fails() {
        let mut tree = Tree::new();
        let one = tree.create_screen(ScreenOptions::default());
        let two = tree.create_screen(ScreenOptions::default());
        let node = element(&mut tree, NodeOptions::new().screen(one));

        let err = tree.append(two, node).unwrap_err();
        assert_eq!(
            err,
            TreeError::CrossScreen {
                node,
                expected: two,
                found: one
            }
        );
        assert!(tree.children_of(two).is_empty());
        assert!(tree.is_detached(node));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = element(&mut tree, NodeOptions::new().parent(screen));
        let b = element(&mut tree, NodeOptions::new().parent(a));

        assert_eq!(
            tree.append(b, a),
            Err(TreeError::Cycle {
                parent: b,
                child: a
            })
        );
        assert_eq!(
            tree.append(a, a),
            Err(TreeError::Cycle {
                parent: a,
                child: a
            })
        );
        assert_eq!(tree.parent_of(a), Some(screen));
        assert_eq!(tree.children_of(a), &[b]);
    }

    #[test]
    fn destroy_fires_once_per_node() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let freed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&freed);
        let root = element(&mut tree, NodeOptions::new().parent(screen));
        let a = element(&mut tree, NodeOptions::new().parent(root));
        let b = element(&mut tree, NodeOptions::new().parent(root));
        let c = element(
            &mut tree,
            NodeOptions::new()
                .parent(a)
                .finalizer(move |id: NodeId| sink.borrow_mut().push(id)),
        );

        // Churn part of the subtree first.
        tree.detach(a);
        tree.append(root, a).unwrap();

        let log = Log::default();
        for id in [root, a, b, c] {
            record(&mut tree, id, EventType::Destroy, &log);
        }

        assert!(tree.destroy(root));
        assert_eq!(
            *log.borrow(),
            vec![
                (root, EventType::Destroy),
                (b, EventType::Destroy),
                (a, EventType::Destroy),
                (c, EventType::Destroy),
            ]
        );
        assert_eq!(*freed.borrow(), vec![c]);
        assert!(tree.children_of(screen).is_empty());
        for id in [root, a, b, c] {
            assert!(tree.is_destroyed(id));
            assert!(!tree.is_alive(id));
        }
        assert!(!tree.destroy(root));
    }

    #[test]
    fn destroy_listener_sees_destroyed_flag() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let node = element(&mut tree, NodeOptions::new().parent(screen));
        let seen = Rc::new(Cell::new(false));
        let flag = Rc::clone(&seen);
        tree.on(
            node,
            EventType::Destroy,
            TreeListener::new(move |t: &mut Tree, e: &TreeEvent| {
                flag.set(t.is_destroyed(e.target) && t.is_detached(e.target));
                Outcome::Continue
            }),
        );
        tree.destroy(node);
        assert!(seen.get());
    }

    #[test]
    fn insert_before_and_after() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = element(&mut tree, NodeOptions::new().parent(screen));
        let b = element(&mut tree, NodeOptions::new().parent(screen));
        let x = element(&mut tree, NodeOptions::new().screen(screen));
        let y = element(&mut tree, NodeOptions::new().screen(screen));
        let stranger = element(&mut tree, NodeOptions::new().screen(screen));

        assert_eq!(tree.insert_before(screen, x, b), Ok(true));
        assert_eq!(tree.insert_after(screen, y, b), Ok(true));
        assert_eq!(tree.children_of(screen), &[a, x, b, y]);

        let z = element(&mut tree, NodeOptions::new().screen(screen));
        assert_eq!(tree.insert_after(screen, z, stranger), Ok(false));
        assert!(tree.is_detached(z));

        tree.prepend(screen, z).unwrap();
        assert_eq!(tree.index_of(z), Some(0));
    }

    #[test]
    fn z_order_helpers() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let kids: Vec<NodeId> = (0..4)
            .map(|_| element(&mut tree, NodeOptions::new().parent(screen)))
            .collect();

        assert!(tree.set_front(kids[0]));
        assert_eq!(tree.children_of(screen), &[kids[1], kids[2], kids[3], kids[0]]);
        assert!(tree.set_back(kids[0]));
        assert_eq!(tree.children_of(screen), kids.as_slice());
        assert!(tree.set_index(kids[3], -3));
        assert_eq!(tree.index_of(kids[3]), Some(1));
        assert!(tree.set_index(kids[3], 40));
        assert_eq!(tree.index_of(kids[3]), Some(3));
        assert!(!tree.set_index(screen, 0));
    }

    #[test]
    fn create_resolves_screen_explicitly() {
        let mut tree = Tree::new();
        assert_eq!(
            tree.create(NodeKind::Element, NodeOptions::new().default_screen()),
            Err(TreeError::NoScreen)
        );
        let one = tree.create_screen(ScreenOptions::default());
        let lone = tree
            .create(NodeKind::Element, NodeOptions::new().default_screen())
            .unwrap();
        assert_eq!(tree.screen_of(lone), Some(one));
        assert!(tree.is_detached(lone));
        assert_eq!(
            tree.create(NodeKind::Element, NodeOptions::new()),
            Err(TreeError::NoScreen)
        );

        tree.create_screen(ScreenOptions::default());
        assert_eq!(
            tree.create(NodeKind::Element, NodeOptions::new().default_screen()),
            Err(TreeError::AmbiguousScreen { count: 2 })
        );
    }

    #[test]
    fn create_appends_children() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = element(&mut tree, NodeOptions::new().screen(screen));
        let b = element(&mut tree, NodeOptions::new().screen(screen));
        let parent = element(&mut tree, NodeOptions::new().parent(screen).child(a).child(b));
        assert_eq!(tree.children_of(parent), &[a, b]);
        assert!(!tree.is_detached(b));
    }

    #[test]
    fn create_rejects_ancestor_children_up_front() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = element(&mut tree, NodeOptions::new().parent(screen));
        let b = element(&mut tree, NodeOptions::new().parent(a));
        let before = tree.descendants(screen, true);

        for child in [screen, a, b] {
            let err = tree.create(NodeKind::Element, NodeOptions::new().parent(b).child(child));
            assert_eq!(err, Err(TreeError::Cycle { parent: b, child }));
        }
        assert!(tree.children_of(b).is_empty());
        assert_eq!(tree.descendants(screen, true), before);
        assert_eq!(tree.focused(screen), Some(a));
    }

    #[test]
    fn traversal() {
        let mut tree = Tree::new();
        // screen -> [a -> [c, d], b]
        let screen = tree.create_screen(ScreenOptions::default());
        let a = element(&mut tree, NodeOptions::new().parent(screen));
        let b = element(&mut tree, NodeOptions::new().parent(screen));
        let c = element(&mut tree, NodeOptions::new().parent(a));
        let d = element(&mut tree, NodeOptions::new().parent(a));

        assert_eq!(tree.descendants(screen, true), [screen, a, c, d, b]);
        assert_eq!(tree.descendants(a, false), [c, d]);
        assert_eq!(tree.ancestors(d, true), [d, a, screen]);
        assert!(tree.has_descendant(screen, d));
        assert!(!tree.has_descendant(d, d));
        assert!(tree.has_ancestor(c, a));
        assert!(!tree.has_ancestor(b, a));

        let mut order = Vec::new();
        let mut node = Some(screen);
        while let Some(current) = node {
            order.push(current);
            node = tree.next_depth_first(current);
        }
        assert_eq!(order, [screen, a, c, d, b]);

        let mut back = Vec::new();
        let mut node = Some(b);
        while let Some(current) = node {
            back.push(current);
            node = tree.prev_depth_first(current);
        }
        assert_eq!(back, [b, d, c, a, screen]);

        let mut visited = Vec::new();
        tree.for_ancestors(c, false, |_, id| visited.push(id));
        assert_eq!(visited, [a, screen]);
    }

    #[test]
    fn for_descendants_skips_destroyed() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = element(&mut tree, NodeOptions::new().parent(screen));
        let b = element(&mut tree, NodeOptions::new().parent(screen));

        let mut visited = Vec::new();
        tree.for_descendants(screen, false, |t, id| {
            visited.push(id);
            if id == a {
                t.destroy(b);
            }
        });
        assert_eq!(visited, [a]);
    }

    #[test]
    fn data_store() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let n = element(&mut tree, NodeOptions::new().parent(screen));

        assert_eq!(tree.get_or(n, "count", 7_u32), 7);
        tree.set(n, "count", 0_u32);
        // A stored zero is not "unset".
        assert_eq!(tree.get_or(n, "count", 7_u32), 0);
        assert!(tree.has_data(n, "count"));
        assert_eq!(tree.get::<i64>(n, "count"), None);

        *tree.get_mut::<u32>(n, "count").unwrap() += 2;
        assert_eq!(tree.take_data::<i64>(n, "count"), None);
        assert_eq!(tree.take_data::<u32>(n, "count"), Some(2));
        assert!(!tree.has_data(n, "count"));
    }
}
