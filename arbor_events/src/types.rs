// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event names, registry channels, and the values handed to listeners.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

/// Recognized event names.
///
/// The set is closed on purpose so that a typo is a compile error rather than
/// a silently unobserved event. Names that only exist at the boundary (for
/// example widget-specific notifications) travel as [`EventType::Custom`].
/// Use [`EventType::from_name`] when converting from strings so that a known
/// name never ends up wrapped in `Custom`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A node became reachable from its screen's root.
    Attach,
    /// A node stopped being reachable from its screen's root.
    Detach,
    /// A node's parent changed (payload: the new parent, if any).
    Reparent,
    /// A node gained a child (payload: the child).
    Adopt,
    /// A node lost a child (payload: the child).
    Remove,
    /// A node was destroyed.
    Destroy,
    /// A listener was registered on this node.
    NewListener,
    /// A listener was removed from this node.
    RemoveListener,
    /// Wildcard observation channel, fired locally before every dispatch.
    Wildcard,
    /// A failure report. Emitting it with no listener is a fault.
    Error,
    /// Keyboard focus moved onto the node.
    Focus,
    /// Keyboard focus left the node.
    Blur,
    /// The node was un-hidden.
    Show,
    /// The node was hidden.
    Hide,
    /// A render pass is about to resolve the node.
    Prerender,
    /// A render pass resolved the node.
    Render,
    /// The screen changed size.
    Resize,
    /// A key was pressed.
    Keypress,
    /// Any mouse activity; fired before the specific mouse event.
    Mouse,
    /// Pointer moved with no button held.
    Move,
    /// Pointer moved with a button held.
    Drag,
    /// A mouse button went down.
    BtnDown,
    /// A mouse button went up.
    BtnUp,
    /// A press and release on the same node.
    Click,
    /// Two clicks in quick succession.
    DblClick,
    /// The wheel turned.
    MouseWheel,
    /// Any other name.
    Custom(Cow<'static, str>),
}

impl EventType {
    /// Build an event type from a static name.
    ///
    /// Known names map onto their variants, as with [`EventType::from_name`],
    /// so `custom("click")` is [`EventType::Click`].
    pub fn custom(name: &'static str) -> Self {
        match Self::from_name(name) {
            Self::Custom(_) => Self::Custom(Cow::Borrowed(name)),
            known => known,
        }
    }

    /// Parse a wire/event name, mapping known names onto their variants.
    pub fn from_name(name: &str) -> Self {
        match name {
            "attach" => Self::Attach,
            "detach" => Self::Detach,
            "reparent" => Self::Reparent,
            "adopt" => Self::Adopt,
            "remove" => Self::Remove,
            "destroy" => Self::Destroy,
            "newListener" => Self::NewListener,
            "removeListener" => Self::RemoveListener,
            "event" => Self::Wildcard,
            "error" => Self::Error,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "show" => Self::Show,
            "hide" => Self::Hide,
            "prerender" => Self::Prerender,
            "render" => Self::Render,
            "resize" => Self::Resize,
            "keypress" => Self::Keypress,
            "mouse" => Self::Mouse,
            "move" => Self::Move,
            "drag" => Self::Drag,
            "btndown" => Self::BtnDown,
            "btnup" => Self::BtnUp,
            "click" => Self::Click,
            "dblclick" => Self::DblClick,
            "mousewheel" => Self::MouseWheel,
            other => Self::Custom(Cow::Owned(String::from(other))),
        }
    }

    /// The canonical name of this event type.
    pub fn name(&self) -> &str {
        match self {
            Self::Attach => "attach",
            Self::Detach => "detach",
            Self::Reparent => "reparent",
            Self::Adopt => "adopt",
            Self::Remove => "remove",
            Self::Destroy => "destroy",
            Self::NewListener => "newListener",
            Self::RemoveListener => "removeListener",
            Self::Wildcard => "event",
            Self::Error => "error",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Prerender => "prerender",
            Self::Render => "render",
            Self::Resize => "resize",
            Self::Keypress => "keypress",
            Self::Mouse => "mouse",
            Self::Move => "move",
            Self::Drag => "drag",
            Self::BtnDown => "btndown",
            Self::BtnUp => "btnup",
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::MouseWheel => "mousewheel",
            Self::Custom(name) => &**name,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry key: which bucket of a node's listeners an event is routed to.
///
/// `Local` buckets run only for events emitted on the node itself. `Element`
/// buckets form the bubbling channel: they run for events emitted on the node
/// or on any of its descendants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Listeners for events emitted on this very node.
    Local(EventType),
    /// Listeners for events emitted on this node or bubbling up from below.
    Element(EventType),
}

impl Channel {
    /// The bubbling channel for `kind`.
    pub fn element(kind: EventType) -> Self {
        Self::Element(kind)
    }

    /// The event type this channel carries.
    pub fn kind(&self) -> &EventType {
        match self {
            Self::Local(kind) | Self::Element(kind) => kind,
        }
    }

    /// Whether this is the bubbling channel.
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

impl From<EventType> for Channel {
    fn from(kind: EventType) -> Self {
        Self::Local(kind)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(kind) => write!(f, "{kind}"),
            Self::Element(kind) => write!(f, "element {kind}"),
        }
    }
}

/// What a listener wants to happen next.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Keep propagating.
    #[default]
    Continue,
    /// Cancel propagation: remaining bubbling steps are skipped and the emit
    /// reports `false`. Other listeners in the same bucket still run.
    Stop,
}

/// The value every listener receives.
#[derive(Clone, Debug)]
pub struct Event<K, M> {
    /// Event type being dispatched.
    pub kind: EventType,
    /// The node the event was emitted on. For bubbling listeners this is the
    /// originating descendant, not the node the listener is attached to.
    pub target: K,
    /// Host-defined payload.
    pub meta: M,
}

impl<K, M> Event<K, M> {
    /// Construct an event.
    pub fn new(kind: EventType, target: K, meta: M) -> Self {
        Self { kind, target, meta }
    }
}
