//! # Surface Lifecycle
//!
//! Attachment and visibility signals folded into one state machine. Only
//! entering or leaving `AttachedVisible` has a side effect, so repeated or
//! same-frame signals cannot start or stop the shimmer twice.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    #[default]
    Detached,
    AttachedHidden,
    AttachedVisible,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimmerCommand {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    state: SurfaceState,
    /// Last visibility reported, remembered while detached.
    visible: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Lifecycle {
    pub fn new(visible: bool) -> Self {
        Self {
            state: SurfaceState::Detached,
            visible,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Last visibility reported, whether or not attached.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_live(&self) -> bool {
        self.state == SurfaceState::AttachedVisible
    }

    pub fn attach(&mut self) -> Option<ShimmerCommand> {
        let next = if self.visible {
            SurfaceState::AttachedVisible
        } else {
            SurfaceState::AttachedHidden
        };
        self.transition(next)
    }

    pub fn detach(&mut self) -> Option<ShimmerCommand> {
        self.transition(SurfaceState::Detached)
    }

    pub fn set_visible(&mut self, visible: bool) -> Option<ShimmerCommand> {
        self.visible = visible;
        let next = match (self.state, visible) {
            (SurfaceState::Detached, _) => SurfaceState::Detached,
            (_, true) => SurfaceState::AttachedVisible,
            (_, false) => SurfaceState::AttachedHidden,
        };
        self.transition(next)
    }

    /// Command that brings a freshly created shimmer in line with the
    /// current state.
    pub fn sync(&self) -> ShimmerCommand {
        if self.is_live() {
            ShimmerCommand::Start
        } else {
            ShimmerCommand::Stop
        }
    }

    fn transition(&mut self, next: SurfaceState) -> Option<ShimmerCommand> {
        let was_live = self.is_live();
        self.state = next;
        match (was_live, self.is_live()) {
            (false, true) => Some(ShimmerCommand::Start),
            (true, false) => Some(ShimmerCommand::Stop),
            _ => None,
        }
    }
}
