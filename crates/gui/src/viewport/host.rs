//! Drawing-surface lifecycle.
//!
//! GPU context loss invalidates every GL-side allocation but none of the
//! CPU-side state (garment asset, design collection). The render host tracks
//! the surface state here and bumps a generation counter on restore so the
//! renderer re-uploads all bindings from CPU data.

/// State of the live drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// No frame has been presented yet
    Uninitialized,
    /// The surface is live and frames are being drawn
    Ready,
    /// The GPU context was lost; draws are skipped until restore
    Lost,
}

/// Surface state machine owned by the render host
pub struct RenderHostState {
    state: ContextState,
    /// Incremented on every restore; GPU caches keyed on an older generation
    /// are stale and must be re-acquired
    generation: u64,
}

impl RenderHostState {
    pub fn new() -> Self {
        Self {
            state: ContextState::Uninitialized,
            generation: 0,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether draw calls may be issued this frame
    pub fn should_draw(&self) -> bool {
        self.state != ContextState::Lost
    }

    /// Record a successfully presented frame
    pub fn frame_presented(&mut self) {
        if self.state == ContextState::Uninitialized {
            self.state = ContextState::Ready;
        }
    }

    /// Out-of-band context-loss signal. Never an error: rendering pauses
    /// until restore.
    pub fn context_lost(&mut self) {
        if self.state != ContextState::Lost {
            tracing::warn!("GPU context lost, pausing rendering");
            self.state = ContextState::Lost;
        }
    }

    /// Context-restore signal. GPU bindings must be re-established; CPU-side
    /// state is still valid.
    pub fn context_restored(&mut self) {
        if self.state == ContextState::Lost {
            self.generation += 1;
            self.state = ContextState::Ready;
            tracing::info!(generation = self.generation, "GPU context restored");
        }
    }
}

impl Default for RenderHostState {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw framebuffer read-back: tightly packed RGBA rows, bottom-up as
/// returned by `glReadPixels`
pub struct SnapshotPixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized_and_drawable() {
        let host = RenderHostState::new();
        assert_eq!(host.state(), ContextState::Uninitialized);
        assert!(host.should_draw());
    }

    #[test]
    fn first_frame_makes_ready() {
        let mut host = RenderHostState::new();
        host.frame_presented();
        assert_eq!(host.state(), ContextState::Ready);
    }

    #[test]
    fn loss_pauses_drawing_until_restore() {
        let mut host = RenderHostState::new();
        host.frame_presented();
        host.context_lost();
        assert_eq!(host.state(), ContextState::Lost);
        assert!(!host.should_draw());

        host.context_restored();
        assert_eq!(host.state(), ContextState::Ready);
        assert!(host.should_draw());
    }

    #[test]
    fn restore_bumps_generation_exactly_once() {
        let mut host = RenderHostState::new();
        host.frame_presented();
        assert_eq!(host.generation(), 0);

        host.context_lost();
        host.context_lost();
        host.context_restored();
        host.context_restored();
        assert_eq!(host.generation(), 1);

        host.context_lost();
        host.context_restored();
        assert_eq!(host.generation(), 2);
    }

    #[test]
    fn restore_without_loss_is_ignored() {
        let mut host = RenderHostState::new();
        host.frame_presented();
        host.context_restored();
        assert_eq!(host.generation(), 0);
        assert_eq!(host.state(), ContextState::Ready);
    }
}
