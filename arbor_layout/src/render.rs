// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render pass: resolve boxes top-down and record them on the tree.
//!
//! Every node that renders fires `prerender` before its box is resolved and
//! `render` (payload: the box) after its children are done, and receives the
//! next render index of its screen. Hidden nodes and nodes that resolve to no
//! area lose their box and render nothing below them.
//!
//! Layout containers resolve their own box in a dry pass that ignores their
//! children, then hand the children to a [`Placer`] one by one.

use alloc::vec::Vec;

use arbor_events::EventType;
use arbor_tree::{CellRect, NodeFlags, NodeId, NodeKind, Payload, Tree};

use crate::coords::{self, Children};
use crate::flow::{FlowPlacer, Placement, PlacementContext, Placer};

/// Render a whole screen. Render indices restart at zero.
pub fn render_screen(tree: &mut Tree, screen: NodeId) -> Option<CellRect> {
    let (cols, rows) = tree.screen_size(screen)?;
    tree.reset_render_order(screen);
    tracing::debug!(?screen, cols, rows, "render pass");
    render_in(
        tree,
        screen,
        CellRect::new(0, 0, i32::from(cols), i32::from(rows)),
    )
}

/// Render `id` inside its parent's last resolved inner box.
///
/// Screens render at full size. Returns `None` when the parent has no box.
pub fn render(tree: &mut Tree, id: NodeId) -> Option<CellRect> {
    if tree.screen_of(id) == Some(id) {
        return render_screen(tree, id);
    }
    let parent = tree.parent_of(id)?;
    let inner = inner_box(tree, parent)?;
    render_in(tree, id, inner)
}

/// Render `id` inside `parent_inner`, dispatching on the node's kind.
pub fn render_in(tree: &mut Tree, id: NodeId, parent_inner: CellRect) -> Option<CellRect> {
    let flags = tree.flags(id)?;
    if flags.contains(NodeFlags::HIDDEN) {
        tree.clear_lpos(id);
        return None;
    }
    match tree.kind(id)? {
        NodeKind::Layout(mode) => {
            render_with_placer(tree, id, parent_inner, &mut FlowPlacer::new(mode))
        }
        _ => render_element(tree, id, parent_inner),
    }
}

fn render_element(tree: &mut Tree, id: NodeId, parent_inner: CellRect) -> Option<CellRect> {
    tree.notify(id, EventType::Prerender, Payload::None);
    let Some(rect) = coords::resolve(tree, id, parent_inner, Children::Include)
        .filter(CellRect::has_area)
    else {
        tree.clear_lpos(id);
        return None;
    };
    tree.mark_rendered(id, rect);

    let inner = rect.inset(tree.geometry(id)?.insets());
    for child in tree.children_of(id).to_vec() {
        if tree.parent_of(child) == Some(id) {
            render_in(tree, child, inner);
        }
    }

    tree.notify(id, EventType::Render, Payload::Rect(rect));
    Some(rect)
}

/// Render a container whose children are positioned by `placer`.
///
/// The container's own box comes from a dry pass that excludes the children.
/// If its inner box has no area, neither it nor its children render. Each
/// child is made to shrink unless it has both a width and a height, placed,
/// and rendered before the next one is placed.
pub fn render_with_placer(
    tree: &mut Tree,
    id: NodeId,
    parent_inner: CellRect,
    placer: &mut dyn Placer,
) -> Option<CellRect> {
    tree.notify(id, EventType::Prerender, Payload::None);
    let rect = coords::resolve(tree, id, parent_inner, Children::Exclude)?;
    let inner = rect.inset(tree.geometry(id)?.insets());
    if !rect.has_area() || !inner.has_area() {
        tracing::trace!(?id, ?rect, "layout has no area");
        tree.clear_lpos(id);
        return None;
    }
    tree.mark_rendered(id, rect);

    let children: Vec<NodeId> = tree.children_of(id).to_vec();
    for &child in &children {
        if let Some(geometry) = tree.geometry_mut(child)
            && !(geometry.position.has_width() && geometry.position.has_height())
        {
            geometry.shrink = true;
        }
    }

    let cx = PlacementContext {
        inner,
        children: &children,
    };
    placer.begin(tree, &cx);
    for (index, &child) in children.iter().enumerate() {
        if tree.parent_of(child) != Some(id) {
            continue;
        }
        match placer.place(tree, &cx, index) {
            Placement::Skip => tree.clear_lpos(child),
            Placement::At { left, top } => {
                if let Some(geometry) = tree.geometry_mut(child) {
                    geometry.position.left = Some(left);
                    geometry.position.top = Some(top);
                }
                render_in(tree, child, inner);
            }
        }
    }

    tree.notify(id, EventType::Render, Payload::Rect(rect));
    Some(rect)
}

/// The last resolved box of `id` minus its border and padding.
#[must_use]
pub fn inner_box(tree: &Tree, id: NodeId) -> Option<CellRect> {
    let rect = tree.lpos(id)?;
    Some(rect.inset(tree.geometry(id)?.insets()))
}
