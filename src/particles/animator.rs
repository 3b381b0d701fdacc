// Cursor particle animator
//
// Owns the particle field and the pointer, and drives both from the frame
// tick. Nothing runs until `mount` is given a live viewport; `unmount`
// cancels the pending frame request and the idle deadline so nothing keeps
// ticking after the field goes away.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    frame_steps, Particle, ParticleConfig, ParticleField, PointerState, Viewport, FRAME_INTERVAL,
};
use crate::error::AnimatorError;

/// State that only exists while mounted
#[derive(Debug, Clone)]
struct Mounted {
    viewport: Viewport,
    field: ParticleField,
    pointer: PointerState,
    last_frame: Instant,
    next_frame: Option<Instant>,
}

pub struct CursorAnimator<R = ChaCha8Rng> {
    config: ParticleConfig,
    rng: R,
    mounted: Option<Mounted>,
    paused: bool,
}

impl CursorAnimator<ChaCha8Rng> {
    /// Animator seeded from OS entropy
    pub fn new(config: ParticleConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> CursorAnimator<R> {
    /// Animator with an explicit RNG (deterministic in tests)
    pub fn with_rng(config: ParticleConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            mounted: None,
            paused: false,
        }
    }

    /// Start animating into `viewport`
    ///
    /// Seeds particles for the current theme, centers the pointer and
    /// requests the first frame. Mounting again re-seeds from scratch.
    pub fn mount(
        &mut self,
        viewport: Viewport,
        is_dark: bool,
        now: Instant,
    ) -> Result<(), AnimatorError> {
        if viewport.is_empty() {
            return Err(AnimatorError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let field = ParticleField::seed(&self.config, viewport, is_dark, &mut self.rng);
        let (cx, cy) = viewport.center();
        self.mounted = Some(Mounted {
            viewport,
            field,
            pointer: PointerState::new(cx, cy),
            last_frame: now,
            next_frame: Some(now),
        });

        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            particles = self.config.particle_count,
            is_dark,
            "Cursor animator mounted"
        );
        Ok(())
    }

    /// Stop animating and release the particles
    pub fn unmount(&mut self) {
        // Dropping the mounted state drops the frame request and idle deadline with it.
        if self.mounted.take().is_some() {
            tracing::debug!("Cursor animator unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Adapt to a new drawing area
    ///
    /// The old origins are meaningless in a different area, so the field is
    /// re-seeded. An empty area unmounts.
    pub fn resize(&mut self, viewport: Viewport, now: Instant) {
        let Some(is_dark) = self.mounted.as_ref().map(|m| m.field.is_dark()) else {
            return;
        };
        if let Err(e) = self.mount(viewport, is_dark, now) {
            tracing::debug!(error = %e, "Viewport collapsed, unmounting cursor animator");
            self.unmount();
        }
    }

    /// Feed a pointer-move event (ignored while unmounted)
    pub fn on_pointer_move(&mut self, x: f32, y: f32, now: Instant) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.pointer.on_move(x, y, now);
        }
    }

    /// The pointer left the drawing area: stop attracting right away
    pub fn on_pointer_leave(&mut self) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.pointer.cancel_idle();
        }
    }

    /// Run one animation frame
    ///
    /// Re-seeds first if the resolved theme differs from the one the field
    /// was seeded for, then eases the pointer and advances particles by the
    /// elapsed time and requests the next frame.
    ///
    /// # Returns
    /// `true` if the field was re-seeded
    pub fn frame(&mut self, now: Instant, is_dark: bool) -> bool {
        let reseeded = self.sync_theme(is_dark);
        let Some(mounted) = self.mounted.as_mut() else {
            return false;
        };

        mounted.pointer.poll_idle(now);

        let dt = frame_steps(now.saturating_duration_since(mounted.last_frame));
        mounted.last_frame = now;
        mounted.pointer.ease(dt);
        if !self.paused {
            mounted.field.step(&mounted.pointer, &self.config, dt, &mut self.rng);
        }

        mounted.next_frame = Some(now + FRAME_INTERVAL);
        reseeded
    }

    /// Re-seed right away if the field was seeded for the other theme
    ///
    /// # Returns
    /// `true` if the field was re-seeded
    pub fn sync_theme(&mut self, is_dark: bool) -> bool {
        let Some(mounted) = self.mounted.as_mut() else {
            return false;
        };
        if mounted.field.is_dark() == is_dark {
            return false;
        }
        mounted.field = ParticleField::seed(&self.config, mounted.viewport, is_dark, &mut self.rng);
        tracing::debug!(is_dark, "Theme flipped, particles re-seeded");
        true
    }

    /// When the next frame wants to run, `None` if nothing is scheduled
    pub fn next_frame_due(&self) -> Option<Instant> {
        self.mounted.as_ref().and_then(|m| m.next_frame)
    }

    /// Freeze particle motion (frames keep running)
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Live particles; empty while unmounted
    pub fn particles(&self) -> &[Particle] {
        self.mounted
            .as_ref()
            .map(|m| m.field.particles())
            .unwrap_or(&[])
    }

    /// Particles ordered far to near
    pub fn draw_order(&self) -> Vec<&Particle> {
        self.mounted.as_ref().map_or_else(Vec::new, |m| m.field.draw_order())
    }

    pub fn pointer(&self) -> Option<&PointerState> {
        self.mounted.as_ref().map(|m| &m.pointer)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.mounted.as_ref().map(|m| m.viewport)
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::pointer::IDLE_DELAY;
    use std::time::Duration;

    fn animator() -> CursorAnimator<ChaCha8Rng> {
        CursorAnimator::with_rng(ParticleConfig::default(), ChaCha8Rng::seed_from_u64(42))
    }

    fn viewport() -> Viewport {
        Viewport::new(100.0, 30.0)
    }

    #[test]
    fn test_nothing_runs_before_mount() {
        let mut animator = animator();
        let now = Instant::now();

        assert!(!animator.frame(now, true));
        animator.on_pointer_move(3.0, 3.0, now);

        assert!(animator.particles().is_empty());
        assert_eq!(animator.next_frame_due(), None);
        assert!(animator.pointer().is_none());
    }

    #[test]
    fn test_mount_rejects_empty_viewport() {
        let mut animator = animator();
        let result = animator.mount(Viewport::new(0.0, 0.0), false, Instant::now());
        assert_eq!(
            result,
            Err(AnimatorError::EmptyViewport {
                width: 0.0,
                height: 0.0
            })
        );
        assert!(!animator.is_mounted());
    }

    #[test]
    fn test_mount_seeds_and_requests_frame() {
        let mut animator = animator();
        let now = Instant::now();
        animator.mount(viewport(), false, now).unwrap();

        assert_eq!(animator.particles().len(), animator.config().particle_count);
        assert_eq!(animator.next_frame_due(), Some(now));
        assert_eq!(animator.pointer().map(|p| p.position()), Some((50.0, 15.0)));
    }

    #[test]
    fn test_theme_flip_reseeds_with_dark_palette() {
        let mut animator = animator();
        let now = Instant::now();
        animator.mount(viewport(), false, now).unwrap();

        let light = animator.config().light_palette.clone();
        let dark = animator.config().dark_palette.clone();
        let count = animator.particles().len();
        assert!(animator.particles().iter().all(|p| light.contains(&p.color)));

        // Same theme: no reseed
        assert!(!animator.frame(now + FRAME_INTERVAL, false));

        // Light -> dark
        assert!(animator.frame(now + FRAME_INTERVAL * 2, true));
        assert_eq!(animator.particles().len(), count);
        assert!(animator.particles().iter().all(|p| dark.contains(&p.color)));

        // Stays dark: no further reseed
        assert!(!animator.frame(now + FRAME_INTERVAL * 3, true));
    }

    #[test]
    fn test_pointer_catches_up_after_single_move() {
        let mut animator = animator();
        let now = Instant::now();
        animator.mount(viewport(), true, now).unwrap();
        let radius = animator.config().max_attraction_distance;

        // One flick from the center to the left edge, then no more events
        animator.on_pointer_move(2.0, 10.0, now);
        let distance_from_cursor = |a: &CursorAnimator<ChaCha8Rng>| {
            let (x, y) = a.pointer().unwrap().position();
            (x - 2.0).hypot(y - 10.0)
        };
        assert!(distance_from_cursor(&animator) > radius);

        for i in 1..=8 {
            animator.frame(now + FRAME_INTERVAL * i, true);
        }
        assert!(distance_from_cursor(&animator) < radius);

        for i in 9..=80 {
            animator.frame(now + FRAME_INTERVAL * i, true);
        }
        assert!(distance_from_cursor(&animator) < 0.01);
    }

    #[test]
    fn test_sync_theme_reseeds_without_frame() {
        let mut animator = animator();
        assert!(!animator.sync_theme(true));

        let now = Instant::now();
        animator.mount(viewport(), false, now).unwrap();
        let dark = animator.config().dark_palette.clone();

        assert!(!animator.sync_theme(false));
        assert!(animator.sync_theme(true));
        assert!(animator.particles().iter().all(|p| dark.contains(&p.color)));
        // Already dark: the next frame leaves the field alone
        assert!(!animator.frame(now + FRAME_INTERVAL, true));
        assert_eq!(animator.next_frame_due(), Some(now + FRAME_INTERVAL * 2));
    }

    #[test]
    fn test_frame_reschedules() {
        let mut animator = animator();
        let now = Instant::now();
        animator.mount(viewport(), true, now).unwrap();

        let later = now + Duration::from_millis(40);
        animator.frame(later, true);
        assert_eq!(animator.next_frame_due(), Some(later + FRAME_INTERVAL));
    }

    #[test]
    fn test_frame_expires_pointer_idle() {
        let mut animator = animator();
        let now = Instant::now();
        animator.mount(viewport(), true, now).unwrap();

        animator.on_pointer_move(10.0, 10.0, now);
        assert!(animator.pointer().unwrap().is_moving());

        animator.frame(now + IDLE_DELAY, true);
        assert!(!animator.pointer().unwrap().is_moving());
        assert_eq!(animator.pointer().unwrap().idle_deadline(), None);
    }

    #[test]
    fn test_pointer_leave_stops_attraction() {
        let mut animator = animator();
        let now = Instant::now();
        animator.mount(viewport(), true, now).unwrap();
        animator.on_pointer_move(10.0, 10.0, now);

        animator.on_pointer_leave();
        let pointer = animator.pointer().unwrap();
        assert!(!pointer.is_moving());
        assert_eq!(pointer.idle_deadline(), None);
    }

    #[test]
    fn test_unmount_cancels_frame_and_idle_timer() {
        let mut animator = animator();
        let now = Instant::now();
        animator.mount(viewport(), true, now).unwrap();
        animator.on_pointer_move(20.0, 5.0, now);
        animator.frame(now + FRAME_INTERVAL, true);
        assert!(animator.next_frame_due().is_some());
        assert!(animator.pointer().unwrap().idle_deadline().is_some());

        animator.unmount();

        assert!(!animator.is_mounted());
        assert_eq!(animator.next_frame_due(), None);
        assert!(animator.pointer().is_none());
        assert!(animator.particles().is_empty());
        assert!(!animator.frame(now + FRAME_INTERVAL * 2, false));
        assert_eq!(animator.next_frame_due(), None);
    }

    #[test]
    fn test_resize_reseeds_inside_new_bounds() {
        let mut animator = animator();
        let now = Instant::now();
        animator.mount(viewport(), true, now).unwrap();

        animator.resize(Viewport::new(10.0, 5.0), now);
        assert_eq!(animator.viewport(), Some(Viewport::new(10.0, 5.0)));
        assert!(animator
            .particles()
            .iter()
            .all(|p| p.origin_x < 10.0 && p.origin_y < 5.0));

        animator.resize(Viewport::new(0.0, 5.0), now);
        assert!(!animator.is_mounted());
    }

    #[test]
    fn test_pause_freezes_particles() {
        let mut animator = animator();
        let now = Instant::now();
        animator.mount(viewport(), true, now).unwrap();
        animator.toggle_pause();
        assert!(animator.is_paused());

        let before = animator.particles().to_vec();
        animator.frame(now + FRAME_INTERVAL * 3, true);
        assert_eq!(animator.particles(), before.as_slice());
        assert!(animator.next_frame_due().is_some());
    }
}
