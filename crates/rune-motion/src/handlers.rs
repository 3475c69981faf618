//! Host hooks invoked by the engine.
//!
//! All hooks run synchronously on the thread that called into the engine,
//! inside the call that caused them.

use std::fmt;

use super::types::{GestureKind, Owner};

/// Gesture start/end hook.
pub type GestureHook = Box<dyn FnMut() + Send>;

/// Completion hook: owner that settled and the variant label it animated to.
pub type CompleteHook = Box<dyn FnMut(Owner, Option<&str>) + Send>;

/// Callbacks a node registers for its own gestures and animations.
#[derive(Default)]
pub struct GestureHandlers {
    start: [Option<GestureHook>; GestureKind::COUNT],
    end: [Option<GestureHook>; GestureKind::COUNT],
    complete: Option<CompleteHook>,
}

impl fmt::Debug for GestureHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |hooks: &[Option<GestureHook>; GestureKind::COUNT]| {
            GestureKind::PRIORITY
                .iter()
                .filter(|k| hooks[k.index()].is_some())
                .map(|k| k.name())
                .collect::<Vec<_>>()
        };
        f.debug_struct("GestureHandlers")
            .field("start", &names(&self.start))
            .field("end", &names(&self.end))
            .field("complete", &self.complete.is_some())
            .finish()
    }
}

impl GestureHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a start hook for any gesture kind.
    pub fn on_start(mut self, kind: GestureKind, hook: impl FnMut() + Send + 'static) -> Self {
        self.start[kind.index()] = Some(Box::new(hook));
        self
    }

    /// Register an end hook for any gesture kind.
    pub fn on_end(mut self, kind: GestureKind, hook: impl FnMut() + Send + 'static) -> Self {
        self.end[kind.index()] = Some(Box::new(hook));
        self
    }

    pub fn on_hover_start(self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_start(GestureKind::Hover, hook)
    }

    pub fn on_hover_end(self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_end(GestureKind::Hover, hook)
    }

    pub fn on_tap_start(self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_start(GestureKind::Tap, hook)
    }

    pub fn on_tap_end(self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_end(GestureKind::Tap, hook)
    }

    pub fn on_drag_start(self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_start(GestureKind::Drag, hook)
    }

    pub fn on_drag_end(self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_end(GestureKind::Drag, hook)
    }

    pub fn on_focus_start(self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_start(GestureKind::Focus, hook)
    }

    pub fn on_focus_end(self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_end(GestureKind::Focus, hook)
    }

    /// Called once every task an owner started has settled.
    pub fn on_animation_complete(
        mut self,
        hook: impl FnMut(Owner, Option<&str>) + Send + 'static,
    ) -> Self {
        self.complete = Some(Box::new(hook));
        self
    }

    pub(crate) fn fire(&mut self, kind: GestureKind, started: bool) {
        let slot = if started {
            &mut self.start[kind.index()]
        } else {
            &mut self.end[kind.index()]
        };
        if let Some(hook) = slot {
            hook();
        }
    }

    pub(crate) fn fire_complete(&mut self, owner: Owner, label: Option<&str>) {
        if let Some(hook) = &mut self.complete {
            hook(owner, label);
        }
    }
}
