// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen roots: focus history, interactive registries, and input routing.
//!
//! A screen is the root of one tree. Besides being a node it owns:
//!
//! - a bounded focus history whose top is the focused node,
//! - the `clickable` and `keyable` registries, filled as flagged nodes attach,
//! - a render-order counter used to break overlaps in [`Tree::hit_test`].
//!
//! Drawing is not done here; a render pass (see `arbor_layout`) resolves boxes
//! and records them with [`Tree::mark_rendered`].

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use arbor_events::{EventType, UnhandledError};

use crate::error::TreeError;
use crate::payload::Payload;
use crate::tree::Tree;
use crate::types::{KeyEvent, MouseEvent, NodeFlags, NodeId, NodeKind};

/// How [`Tree::create_screen`] sets up a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenOptions {
    /// Width in cells.
    pub cols: u16,
    /// Height in cells.
    pub rows: u16,
    /// Number of focus history entries kept; the oldest is dropped first.
    pub focus_history: usize,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            focus_history: 10,
        }
    }
}

impl ScreenOptions {
    /// Default options at the given size.
    pub fn sized(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub(crate) struct ScreenState {
    cols: u16,
    rows: u16,
    history: VecDeque<NodeId>,
    history_limit: usize,
    saved_focus: Option<NodeId>,
    clickable: Vec<NodeId>,
    keyable: Vec<NodeId>,
    next_render_index: u32,
}

impl ScreenState {
    fn new(options: ScreenOptions) -> Self {
        Self {
            cols: options.cols,
            rows: options.rows,
            history: VecDeque::new(),
            history_limit: options.focus_history.max(1),
            saved_focus: None,
            clickable: Vec::new(),
            keyable: Vec::new(),
            next_render_index: 0,
        }
    }
}

// --- screen registry ---

impl Tree {
    /// Create a screen: an attached root that belongs to itself.
    pub fn create_screen(&mut self, options: ScreenOptions) -> NodeId {
        let id = self.alloc(NodeKind::Screen, None);
        if let Some(node) = self.slot_mut(id) {
            node.detached = false;
        }
        self.screen_state.insert(id, ScreenState::new(options));
        self.screens.push(id);
        tracing::debug!(?id, cols = options.cols, rows = options.rows, "created screen");
        id
    }

    /// Number of live screens.
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    /// The first screen created that is still alive.
    pub fn global_screen(&self) -> Option<NodeId> {
        self.screens.first().copied()
    }

    /// Live screens in creation order.
    pub fn screens(&self) -> &[NodeId] {
        &self.screens
    }

    /// The screen to use when none was named: only defined with exactly one.
    pub(crate) fn default_screen(&self) -> Result<NodeId, TreeError> {
        match self.screens.as_slice() {
            [] => Err(TreeError::NoScreen),
            [only] => Ok(*only),
            many => Err(TreeError::AmbiguousScreen { count: many.len() }),
        }
    }

    /// Screen size as `(cols, rows)`.
    pub fn screen_size(&self, screen: NodeId) -> Option<(u16, u16)> {
        self.screen_state.get(&screen).map(|s| (s.cols, s.rows))
    }

    /// Change the screen size and broadcast `resize` over the whole tree.
    ///
    /// Returns `false` if `screen` is not a live screen.
    pub fn resize_screen(&mut self, screen: NodeId, cols: u16, rows: u16) -> bool {
        let Some(state) = self.screen_state.get_mut(&screen) else {
            return false;
        };
        state.cols = cols;
        state.rows = rows;
        tracing::debug!(?screen, cols, rows, "resized screen");
        if let Err(err) =
            self.emit_descendants(screen, EventType::Resize, Payload::Resize { cols, rows }, None)
        {
            tracing::error!(?screen, %err, "resize broadcast faulted");
        }
        true
    }

    /// Nodes registered for mouse input, in registration order.
    pub fn clickable(&self, screen: NodeId) -> &[NodeId] {
        self.screen_state.get(&screen).map_or(&[], |s| &s.clickable)
    }

    /// Nodes registered for key input, in registration order.
    pub fn keyable(&self, screen: NodeId) -> &[NodeId] {
        self.screen_state.get(&screen).map_or(&[], |s| &s.keyable)
    }

    /// Start a new render pass: render indices restart at zero.
    pub fn reset_render_order(&mut self, screen: NodeId) {
        if let Some(state) = self.screen_state.get_mut(&screen) {
            state.next_render_index = 0;
        }
    }

    pub(crate) fn next_render_index(&mut self, screen: NodeId) -> u32 {
        let Some(state) = self.screen_state.get_mut(&screen) else {
            return 0;
        };
        let index = state.next_render_index;
        state.next_render_index = index.saturating_add(1);
        index
    }

    pub(crate) fn register_interactive(&mut self, id: NodeId) {
        let Some(node) = self.slot(id) else {
            return;
        };
        let (screen, flags) = (node.screen, node.flags);
        let Some(state) = self.screen_state.get_mut(&screen) else {
            return;
        };
        if flags.contains(NodeFlags::CLICKABLE) && !state.clickable.contains(&id) {
            state.clickable.push(id);
        }
        if flags.contains(NodeFlags::KEYABLE) && !state.keyable.contains(&id) {
            state.keyable.push(id);
        }
    }

    pub(crate) fn unregister_interactive(&mut self, screen: NodeId, id: NodeId) {
        if let Some(state) = self.screen_state.get_mut(&screen) {
            state.clickable.retain(|&n| n != id);
            state.keyable.retain(|&n| n != id);
        }
    }

    /// Drop every reference the screen holds to a released node.
    pub(crate) fn forget(&mut self, screen: NodeId, id: NodeId) {
        if screen == id {
            self.screen_state.remove(&screen);
            self.screens.retain(|&s| s != screen);
            return;
        }
        self.unregister_interactive(screen, id);
        if let Some(state) = self.screen_state.get_mut(&screen) {
            state.history.retain(|&n| n != id);
            if state.saved_focus == Some(id) {
                state.saved_focus = None;
            }
        }
    }
}

// --- visibility and input flags ---

impl Tree {
    /// Whether `id` and all its ancestors are attached and not hidden.
    pub fn is_visible(&self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(node) = current.and_then(|n| self.slot(n)) {
            if node.detached || node.flags.contains(NodeFlags::HIDDEN) {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Hide `id`: clear its box, fire `hide`, and rewind focus if it was
    /// focused. Returns `false` if it was already hidden.
    pub fn hide(&mut self, id: NodeId) -> bool {
        let Some(node) = self.slot_mut(id) else {
            return false;
        };
        if node.flags.contains(NodeFlags::HIDDEN) {
            return false;
        }
        node.flags.insert(NodeFlags::HIDDEN);
        node.lpos = None;
        let screen = node.screen;
        self.notify(id, EventType::Hide, Payload::None);
        if self.focused(screen) == Some(id) {
            self.rewind_focus(screen);
        }
        true
    }

    /// Un-hide `id` and fire `show`. Returns `false` if it was not hidden.
    pub fn show(&mut self, id: NodeId) -> bool {
        let Some(node) = self.slot_mut(id) else {
            return false;
        };
        if !node.flags.contains(NodeFlags::HIDDEN) {
            return false;
        }
        node.flags.remove(NodeFlags::HIDDEN);
        self.notify(id, EventType::Show, Payload::None);
        true
    }

    /// Let `id` receive mouse input.
    pub fn enable_mouse(&mut self, id: NodeId) -> bool {
        self.enable_input(id, NodeFlags::CLICKABLE)
    }

    /// Let `id` receive key input and take part in focus cycling.
    pub fn enable_keys(&mut self, id: NodeId) -> bool {
        self.enable_input(id, NodeFlags::KEYABLE)
    }

    fn enable_input(&mut self, id: NodeId, flag: NodeFlags) -> bool {
        let Some(node) = self.slot_mut(id) else {
            return false;
        };
        node.flags.insert(flag);
        if !node.detached {
            self.register_interactive(id);
        }
        true
    }
}

// --- focus ---

impl Tree {
    /// The focused node of `screen`: the top of its focus history.
    pub fn focused(&self, screen: NodeId) -> Option<NodeId> {
        self.screen_state.get(&screen)?.history.back().copied()
    }

    /// Focus `id` on its own screen.
    pub fn focus(&mut self, id: NodeId) -> bool {
        match self.screen_of(id) {
            Some(screen) => self.focus_push(screen, id),
            None => false,
        }
    }

    /// Push `id` onto the focus history and hand focus over to it.
    ///
    /// Fires `blur` on the previously focused node (payload: `id`) and `focus`
    /// on `id` (payload: the previous node). Focusing the node that already
    /// has focus does nothing and returns `false`.
    pub fn focus_push(&mut self, screen: NodeId, id: NodeId) -> bool {
        if self.screen_of(id) != Some(screen) {
            return false;
        }
        let Some(state) = self.screen_state.get_mut(&screen) else {
            return false;
        };
        let old = state.history.back().copied();
        if old == Some(id) {
            return false;
        }
        if state.history.len() >= state.history_limit {
            state.history.pop_front();
        }
        state.history.push_back(id);
        self.hand_focus(id, old);
        true
    }

    /// Pop the focus history, refocusing the new top if there is one.
    /// Returns the popped node.
    pub fn focus_pop(&mut self, screen: NodeId) -> Option<NodeId> {
        let state = self.screen_state.get_mut(&screen)?;
        let old = state.history.pop_back();
        if let Some(top) = state.history.back().copied() {
            self.hand_focus(top, old);
        }
        old
    }

    /// Remember the focused node for [`Tree::restore_focus`].
    pub fn save_focus(&mut self, screen: NodeId) -> Option<NodeId> {
        let focused = self.focused(screen);
        let state = self.screen_state.get_mut(&screen)?;
        state.saved_focus = focused;
        focused
    }

    /// Refocus the node remembered by [`Tree::save_focus`] and forget it.
    /// Returns the focused node afterwards.
    pub fn restore_focus(&mut self, screen: NodeId) -> Option<NodeId> {
        let saved = self.screen_state.get_mut(&screen)?.saved_focus.take()?;
        self.focus_push(screen, saved);
        self.focused(screen)
    }

    /// Give up the current focus after its node went away or was hidden.
    ///
    /// Walks the history back to the most recent node that is still attached
    /// and visible and refocuses it. If there is none, the old node only
    /// receives `blur`.
    pub fn rewind_focus(&mut self, screen: NodeId) -> Option<NodeId> {
        let old = self.screen_state.get_mut(&screen)?.history.pop_back();
        while let Some(candidate) = self
            .screen_state
            .get_mut(&screen)
            .and_then(|s| s.history.pop_back())
        {
            if self.is_visible(candidate) {
                if let Some(state) = self.screen_state.get_mut(&screen) {
                    state.history.push_back(candidate);
                }
                self.hand_focus(candidate, old);
                return Some(candidate);
            }
        }
        if let Some(old) = old {
            tracing::debug!(?screen, ?old, "focus rewound to nothing");
            self.notify(old, EventType::Blur, Payload::Node(None));
        }
        None
    }

    /// Move focus `offset` steps through the keyable nodes, wrapping around
    /// and skipping nodes that are not visible.
    ///
    /// Does nothing if `offset` is zero, nothing keyable is visible, or the
    /// focused node is not keyable.
    pub fn focus_offset(&mut self, screen: NodeId, offset: isize) -> Option<NodeId> {
        let keyable = self.keyable(screen).to_vec();
        if offset == 0 || !keyable.iter().any(|&k| self.is_visible(k)) {
            return None;
        }
        let focused = self.focused(screen)?;
        let mut i = keyable.iter().position(|&k| k == focused)?;
        let len = keyable.len();
        let mut remaining = offset.unsigned_abs();
        while remaining > 0 {
            i = if offset > 0 { (i + 1) % len } else { (i + len - 1) % len };
            if self.is_visible(keyable[i]) {
                remaining -= 1;
            }
        }
        self.focus_push(screen, keyable[i]);
        Some(keyable[i])
    }

    /// Focus the next keyable node.
    pub fn focus_next(&mut self, screen: NodeId) -> Option<NodeId> {
        self.focus_offset(screen, 1)
    }

    /// Focus the previous keyable node.
    pub fn focus_prev(&mut self, screen: NodeId) -> Option<NodeId> {
        self.focus_offset(screen, -1)
    }

    fn hand_focus(&mut self, new: NodeId, old: Option<NodeId>) {
        tracing::debug!(?new, ?old, "focus changed");
        if let Some(old) = old {
            self.notify(old, EventType::Blur, Payload::Node(Some(new)));
        }
        self.notify(new, EventType::Focus, Payload::Node(old));
    }
}

// --- input routing ---

impl Tree {
    /// The clickable node under the cell `(x, y)`.
    ///
    /// Only attached, visible nodes with a resolved box take part. Overlaps go
    /// to the node rendered last; equal render order goes to the node
    /// registered last.
    pub fn hit_test(&self, screen: NodeId, x: i32, y: i32) -> Option<NodeId> {
        self.clickable(screen)
            .iter()
            .copied()
            .filter(|&id| self.is_visible(id))
            .filter_map(|id| {
                let node = self.slot(id)?;
                node.lpos
                    .filter(|rect| rect.contains(x, y))
                    .map(|_| (id, node.render_index))
            })
            .max_by_key(|&(_, order)| order)
            .map(|(id, _)| id)
    }

    /// Route a decoded mouse event: `mouse`, then `kind`, on the node under
    /// the pointer. Returns that node.
    pub fn dispatch_mouse(
        &mut self,
        screen: NodeId,
        kind: EventType,
        event: MouseEvent,
    ) -> Result<Option<NodeId>, UnhandledError> {
        let Some(target) = self.hit_test(screen, event.x, event.y) else {
            return Ok(None);
        };
        tracing::trace!(?target, %kind, x = event.x, y = event.y, "mouse");
        self.emit(target, EventType::Mouse, Payload::Mouse(event))?;
        self.emit(target, kind, Payload::Mouse(event))?;
        Ok(Some(target))
    }

    /// Route a key press: `keypress` on the screen, then on the focused node
    /// if it is keyable and visible. Returns the focused node that received it.
    pub fn dispatch_key(&mut self, screen: NodeId, event: KeyEvent) -> Option<NodeId> {
        if !self.screen_state.contains_key(&screen) {
            return None;
        }
        self.notify(screen, EventType::Keypress, Payload::Key(event.clone()));
        let focused = self.focused(screen)?;
        let keyable = self
            .flags(focused)
            .is_some_and(|f| f.contains(NodeFlags::KEYABLE));
        if focused == screen || !keyable || !self.is_visible(focused) {
            return None;
        }
        self.notify(focused, EventType::Keypress, Payload::Key(event));
        Some(focused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeOptions;
    use crate::payload::{TreeEvent, TreeListener};
    use crate::types::{CellRect, MouseButtons};
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use arbor_events::Outcome;
    use core::cell::RefCell;

    type Log = Rc<RefCell<Vec<(NodeId, EventType, Payload)>>>;

    fn record(tree: &mut Tree, id: NodeId, kinds: &[EventType], log: &Log) {
        for kind in kinds {
            let log = Rc::clone(log);
            tree.on(
                id,
                kind.clone(),
                TreeListener::new(move |_: &mut Tree, e: &TreeEvent| {
                    log.borrow_mut().push((e.target, e.kind.clone(), e.meta.clone()));
                    Outcome::Continue
                }),
            );
        }
    }

    fn child(tree: &mut Tree, parent: NodeId, flags: NodeFlags) -> NodeId {
        tree.create(NodeKind::Element, NodeOptions::new().parent(parent).flags(flags))
            .unwrap()
    }

    #[test]
    fn screen_registry() {
        let mut tree = Tree::new();
        assert_eq!(tree.global_screen(), None);
        let one = tree.create_screen(ScreenOptions::default());
        let two = tree.create_screen(ScreenOptions::sized(100, 40));
        assert_eq!(tree.screen_count(), 2);
        assert_eq!(tree.screens(), &[one, two]);
        assert_eq!(tree.global_screen(), Some(one));
        assert_eq!(tree.screen_size(two), Some((100, 40)));
        assert!(!tree.is_detached(one));
        assert_eq!(tree.screen_of(one), Some(one));

        assert!(tree.destroy(one));
        assert_eq!(tree.screens(), &[two]);
        assert_eq!(tree.global_screen(), Some(two));
        assert_eq!(tree.screen_size(one), None);
    }

    #[test]
    fn first_insert_takes_focus() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let log = Log::default();
        let a = tree
            .create(NodeKind::Element, NodeOptions::new().screen(screen))
            .unwrap();
        record(&mut tree, a, &[EventType::Focus], &log);
        tree.append(screen, a).unwrap();
        let b = child(&mut tree, screen, NodeFlags::empty());

        assert_eq!(tree.focused(screen), Some(a));
        assert_ne!(tree.focused(screen), Some(b));
        assert_eq!(*log.borrow(), vec![(a, EventType::Focus, Payload::Node(None))]);
    }

    #[test]
    fn focus_handoff_and_history_limit() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions {
            focus_history: 2,
            ..ScreenOptions::default()
        });
        let a = child(&mut tree, screen, NodeFlags::empty());
        let b = child(&mut tree, screen, NodeFlags::empty());
        let c = child(&mut tree, screen, NodeFlags::empty());
        let log = Log::default();
        record(&mut tree, a, &[EventType::Focus, EventType::Blur], &log);
        record(&mut tree, b, &[EventType::Focus, EventType::Blur], &log);

        assert!(tree.focus(b));
        assert!(!tree.focus(b));
        assert_eq!(
            *log.borrow(),
            vec![
                (a, EventType::Blur, Payload::Node(Some(b))),
                (b, EventType::Focus, Payload::Node(Some(a))),
            ]
        );

        // History holds two entries: [b, c]; `a` fell off.
        tree.focus(c);
        assert_eq!(tree.focus_pop(screen), Some(c));
        assert_eq!(tree.focused(screen), Some(b));
        assert_eq!(tree.focus_pop(screen), Some(b));
        assert_eq!(tree.focused(screen), None);
    }

    #[test]
    fn removing_the_focused_node_rewinds() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = child(&mut tree, screen, NodeFlags::empty());
        let b = child(&mut tree, screen, NodeFlags::empty());
        let c = child(&mut tree, screen, NodeFlags::empty());
        tree.focus(b);
        tree.focus(c);
        tree.hide(b);

        let log = Log::default();
        record(&mut tree, c, &[EventType::Blur], &log);
        tree.detach(c);
        // `b` is hidden, so focus rewinds past it to `a`.
        assert_eq!(tree.focused(screen), Some(a));
        assert_eq!(*log.borrow(), vec![(c, EventType::Blur, Payload::Node(Some(a)))]);

        log.borrow_mut().clear();
        record(&mut tree, a, &[EventType::Blur], &log);
        tree.detach(a);
        assert_eq!(tree.focused(screen), None);
        assert_eq!(*log.borrow(), vec![(a, EventType::Blur, Payload::Node(None))]);
    }

    #[test]
    fn hide_and_show() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = child(&mut tree, screen, NodeFlags::empty());
        let b = child(&mut tree, screen, NodeFlags::empty());
        let inner = child(&mut tree, b, NodeFlags::empty());
        tree.focus(b);
        tree.mark_rendered(b, CellRect::new(0, 0, 4, 4));

        let log = Log::default();
        record(&mut tree, b, &[EventType::Hide, EventType::Show], &log);
        assert!(tree.hide(b));
        assert!(!tree.hide(b));
        assert!(!tree.is_visible(inner));
        assert_eq!(tree.lpos(b), None);
        assert_eq!(tree.focused(screen), Some(a));

        assert!(tree.show(b));
        assert!(!tree.show(b));
        assert!(tree.is_visible(inner));
        assert_eq!(
            *log.borrow(),
            vec![
                (b, EventType::Hide, Payload::None),
                (b, EventType::Show, Payload::None),
            ]
        );
    }

    #[test]
    fn interactive_registries_follow_attachment() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let panel = tree
            .create(NodeKind::Element, NodeOptions::new().screen(screen))
            .unwrap();
        let button = child(&mut tree, panel, NodeFlags::CLICKABLE | NodeFlags::KEYABLE);
        assert!(tree.clickable(screen).is_empty());

        tree.append(screen, panel).unwrap();
        assert_eq!(tree.clickable(screen), &[button]);
        assert_eq!(tree.keyable(screen), &[button]);

        tree.enable_keys(panel);
        assert_eq!(tree.keyable(screen), &[button, panel]);

        tree.detach(button);
        assert!(tree.clickable(screen).is_empty());
        assert_eq!(tree.keyable(screen), &[panel]);

        tree.append(panel, button).unwrap();
        assert_eq!(tree.clickable(screen), &[button]);

        tree.destroy(panel);
        assert!(tree.clickable(screen).is_empty());
        assert!(tree.keyable(screen).is_empty());
    }

    #[test]
    fn focus_cycles_through_visible_keyables() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = child(&mut tree, screen, NodeFlags::KEYABLE);
        let b = child(&mut tree, screen, NodeFlags::KEYABLE);
        let c = child(&mut tree, screen, NodeFlags::KEYABLE);
        assert_eq!(tree.focused(screen), Some(a));

        tree.hide(b);
        assert_eq!(tree.focus_next(screen), Some(c));
        assert_eq!(tree.focus_next(screen), Some(a));
        assert_eq!(tree.focus_prev(screen), Some(c));
        assert_eq!(tree.focus_offset(screen, 3), Some(a));
        assert_eq!(tree.focus_offset(screen, 0), None);
    }

    #[test]
    fn save_and_restore_focus() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = child(&mut tree, screen, NodeFlags::empty());
        let b = child(&mut tree, screen, NodeFlags::empty());
        assert_eq!(tree.save_focus(screen), Some(a));
        tree.focus(b);
        assert_eq!(tree.restore_focus(screen), Some(a));
        assert_eq!(tree.restore_focus(screen), None);
    }

    #[test]
    fn hit_test_prefers_later_render() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let back = child(&mut tree, screen, NodeFlags::CLICKABLE);
        let front = child(&mut tree, screen, NodeFlags::CLICKABLE);
        let plain = child(&mut tree, screen, NodeFlags::empty());

        tree.reset_render_order(screen);
        tree.mark_rendered(front, CellRect::new(0, 0, 5, 5));
        tree.mark_rendered(back, CellRect::new(2, 2, 10, 10));
        tree.mark_rendered(plain, CellRect::new(0, 0, 20, 20));

        assert_eq!(tree.hit_test(screen, 3, 3), Some(back));
        assert_eq!(tree.hit_test(screen, 1, 1), Some(front));
        assert_eq!(tree.hit_test(screen, 15, 15), None);

        tree.hide(back);
        assert_eq!(tree.hit_test(screen, 3, 3), Some(front));
    }

    #[test]
    fn mouse_and_key_routing() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let button = child(&mut tree, screen, NodeFlags::CLICKABLE | NodeFlags::KEYABLE);
        tree.mark_rendered(button, CellRect::new(0, 0, 4, 1));

        let log = Log::default();
        record(&mut tree, button, &[EventType::Mouse, EventType::Click, EventType::Keypress], &log);
        record(&mut tree, screen, &[EventType::Keypress], &log);

        let event = MouseEvent {
            buttons: MouseButtons::LEFT,
            x: 2,
            y: 0,
            ..MouseEvent::default()
        };
        assert_eq!(tree.dispatch_mouse(screen, EventType::Click, event), Ok(Some(button)));
        let miss = MouseEvent { y: 5, ..event };
        assert_eq!(tree.dispatch_mouse(screen, EventType::Click, miss), Ok(None));

        let key = KeyEvent {
            name: String::from("enter"),
            ..KeyEvent::default()
        };
        assert_eq!(tree.dispatch_key(screen, key.clone()), Some(button));
        assert_eq!(
            *log.borrow(),
            vec![
                (button, EventType::Mouse, Payload::Mouse(event)),
                (button, EventType::Click, Payload::Mouse(event)),
                (screen, EventType::Keypress, Payload::Key(key.clone())),
                (button, EventType::Keypress, Payload::Key(key)),
            ]
        );
    }

    #[test]
    fn resize_broadcasts() {
        let mut tree = Tree::new();
        let screen = tree.create_screen(ScreenOptions::default());
        let a = child(&mut tree, screen, NodeFlags::empty());
        let log = Log::default();
        record(&mut tree, screen, &[EventType::Resize], &log);
        record(&mut tree, a, &[EventType::Resize], &log);

        assert!(tree.resize_screen(screen, 120, 50));
        assert_eq!(tree.screen_size(screen), Some((120, 50)));
        let size = Payload::Resize {
            cols: 120,
            rows: 50,
        };
        assert_eq!(
            *log.borrow(),
            vec![
                (screen, EventType::Resize, size.clone()),
                (a, EventType::Resize, size),
            ]
        );
        assert!(!tree.resize_screen(a, 1, 1));
    }
}
