// Application state management
//
// AppState ties the theme manager and the cursor animator to the terminal.
// It forwards input to them, drives both from the tick and remembers the
// area the particle field was last drawn into.

pub mod config;
pub mod event;

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::particles::{CursorAnimator, Viewport};
use crate::theme::{ColorSchemeSource, PreferenceStore, ThemeManager, ThemePhase, ThemePreference};
use config::{ProfileSettings, MAX_EVENT_WAIT, NOTICE_DURATION};

/// Theme manager with the collaborators chosen at startup
pub type AppTheme = ThemeManager<Box<dyn PreferenceStore>, Box<dyn ColorSchemeSource>>;

/// Short-lived message shown in the status bar
#[derive(Debug, Clone)]
struct Notice {
    text: String,
    expires: Instant,
}

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// Theme preference, resolution and OS watch
    pub theme: AppTheme,

    /// Particle field following the mouse
    pub animator: CursorAnimator,

    /// Banner text
    pub profile: ProfileSettings,

    /// Area the particle field occupied on the last draw
    pub field_area: Rect,

    notice: Option<Notice>,
}

impl AppState {
    /// Create the app state; the animator mounts after the first draw
    pub fn new(theme: AppTheme, animator: CursorAnimator, profile: ProfileSettings) -> Self {
        Self {
            running: true,
            theme,
            animator,
            profile,
            field_area: Rect::default(),
            notice: None,
        }
    }

    /// Advance timers: OS watch, animation frame, notice expiry
    pub fn on_tick(&mut self, now: Instant) {
        if self.theme.poll_system(now) {
            self.sync_animator_theme();
            let shown = if self.theme.is_dark() { "dark" } else { "light" };
            self.set_notice(format!("System scheme changed, now {shown}"), now);
        }

        if self.animator.next_frame_due().is_some_and(|due| now >= due) {
            self.animator.frame(now, self.theme.is_dark());
        }

        if self.notice.as_ref().is_some_and(|n| now >= n.expires) {
            self.notice = None;
        }
    }

    /// Mount or resize the animator to match `field_area`
    ///
    /// Call after each draw. Nothing mounts until the theme is resolved and
    /// the field has a non-empty area.
    pub fn sync_viewport(&mut self, now: Instant) {
        let ThemePhase::Ready { is_dark } = self.theme.phase() else {
            return;
        };
        let viewport = Viewport::new(
            f32::from(self.field_area.width),
            f32::from(self.field_area.height),
        );

        if self.animator.is_mounted() {
            if self.animator.viewport() != Some(viewport) {
                self.animator.resize(viewport, now);
            }
        } else if !viewport.is_empty() {
            if let Err(e) = self.animator.mount(viewport, is_dark, now) {
                tracing::warn!(error = %e, "Failed to mount cursor animator");
            }
        }
    }

    /// Mouse moved to a terminal cell
    ///
    /// Cells inside the field become field-relative pointer positions
    /// (cell centers). Anything outside counts as the pointer leaving.
    pub fn on_mouse_move(&mut self, column: u16, row: u16, now: Instant) {
        let area = self.field_area;
        let inside = column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height);

        if inside {
            let x = f32::from(column - area.x) + 0.5;
            let y = f32::from(row - area.y) + 0.5;
            self.animator.on_pointer_move(x, y, now);
        } else {
            self.animator.on_pointer_leave();
        }
    }

    /// Flip the theme and persist the new preference
    pub fn toggle_theme(&mut self) {
        let preference = self.theme.toggle();
        self.sync_animator_theme();
        self.set_notice(format!("Theme: {preference}"), Instant::now());
    }

    /// Select an explicit preference and persist it
    pub fn set_theme(&mut self, preference: ThemePreference) {
        self.theme.set_preference(preference);
        self.sync_animator_theme();
        self.set_notice(format!("Theme: {preference}"), Instant::now());
    }

    /// Freeze or resume particle motion
    pub fn toggle_pause(&mut self) {
        self.animator.toggle_pause();
        let text = if self.animator.is_paused() {
            "Particles paused"
        } else {
            "Particles resumed"
        };
        self.set_notice(text.to_string(), Instant::now());
    }

    /// How long the event loop may block before the next timer is due
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        let mut wait = MAX_EVENT_WAIT;
        if let Some(due) = self.animator.next_frame_due() {
            wait = wait.min(due.saturating_duration_since(now));
        }
        if let Some(notice) = &self.notice {
            wait = wait.min(notice.expires.saturating_duration_since(now));
        }
        wait
    }

    /// Current status notice, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    /// Tear down the animation and the OS watch before exit
    pub fn shutdown(&mut self) {
        self.animator.unmount();
        self.theme.dispose();
        tracing::debug!("App shut down");
    }

    /// Re-seed particles as soon as the resolved theme flips, so the next
    /// draw never shows old-palette particles on the new surface
    fn sync_animator_theme(&mut self) {
        self.animator.sync_theme(self.theme.is_dark());
    }

    fn set_notice(&mut self, text: String, now: Instant) {
        self.notice = Some(Notice {
            text,
            expires: now + NOTICE_DURATION,
        });
    }
}
