// Pointer tracking
//
// Smoothed pointer position plus a debounced "is moving" flag. The smoothed
// position keeps easing toward the last raw target on every frame, so it
// catches up with the cursor even after move events stop. Each move
// replaces the single idle deadline instead of queueing another timer, so
// a burst of moves ends in exactly one transition back to idle.

use std::time::{Duration, Instant};

/// Fraction of the gap to the raw pointer closed per move event and per frame
pub const POINTER_SMOOTHING: f32 = 0.2;

/// Quiet time after the last move before the pointer counts as idle
pub const IDLE_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    x: f32,
    y: f32,
    target: (f32, f32),
    moving: bool,
    idle_deadline: Option<Instant>,
    idle_delay: Duration,
}

impl PointerState {
    /// Resting pointer at a position
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            target: (x, y),
            moving: false,
            idle_deadline: None,
            idle_delay: IDLE_DELAY,
        }
    }

    /// Override the idle debounce delay
    #[cfg(test)]
    pub fn with_idle_delay(mut self, idle_delay: Duration) -> Self {
        self.idle_delay = idle_delay;
        self
    }

    /// Handle a raw pointer-move event
    pub fn on_move(&mut self, x: f32, y: f32, now: Instant) {
        self.target = (x, y);
        self.approach(POINTER_SMOOTHING);
        self.moving = true;
        self.idle_deadline = Some(now + self.idle_delay);
    }

    /// Ease toward the last raw target over `dt` frame steps
    ///
    /// Compounds the per-frame smoothing, so a long frame covers the same
    /// ground as several short ones.
    pub fn ease(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.approach(1.0 - (1.0 - POINTER_SMOOTHING).powf(dt));
    }

    fn approach(&mut self, fraction: f32) {
        self.x += (self.target.0 - self.x) * fraction;
        self.y += (self.target.1 - self.y) * fraction;
    }

    /// Expire the idle deadline if it has passed
    ///
    /// # Returns
    /// `true` on the single call that flips the pointer to idle
    pub fn poll_idle(&mut self, now: Instant) -> bool {
        match self.idle_deadline {
            Some(deadline) if now >= deadline => {
                self.idle_deadline = None;
                self.moving = false;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending idle deadline and stop moving
    pub fn cancel_idle(&mut self) {
        self.idle_deadline = None;
        self.moving = false;
    }

    /// Smoothed position that particles track
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Last raw position reported by a move event
    pub fn target(&self) -> (f32, f32) {
        self.target
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn idle_deadline(&self) -> Option<Instant> {
        self.idle_deadline
    }
}
