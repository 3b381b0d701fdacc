// Theme manager
//
// Single source of truth for the theme preference and the resolved dark
// flag. Owns the preference store, the OS color-scheme source and the
// visual root marker. The app holds one instance and passes it to whatever
// needs the resolved flag; there is no global theme state.
//
// Lifecycle:
//   new()        -> Pending (nothing read yet, UI renders neutral)
//   initialize() -> Ready(is_dark), root marker applied
//   dispose()    -> OS watch torn down for good

use std::time::{Duration, Instant};

use super::{
    apply_root_marker, resolve, toggled, ColorSchemeSource, PreferenceStore, ThemePreference,
    VisualRoot, THEME_KEY,
};

/// How often the OS signal is re-read while following the system scheme
pub const SYSTEM_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Resolution state of the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePhase {
    /// The OS signal has not been read yet
    Pending,
    /// Theme resolved and applied to the visual root
    Ready { is_dark: bool },
}

/// Active subscription to OS color-scheme changes
#[derive(Debug, Clone, Copy)]
struct SystemWatch {
    next_poll: Instant,
}

pub struct ThemeManager<S, O> {
    store: S,
    source: O,
    preference: ThemePreference,
    os_prefers_dark: bool,
    phase: ThemePhase,
    root: VisualRoot,
    watch: Option<SystemWatch>,
    poll_interval: Duration,
    disposed: bool,
}

impl<S: PreferenceStore, O: ColorSchemeSource> ThemeManager<S, O> {
    /// Create a manager in the `Pending` phase
    pub fn new(store: S, source: O) -> Self {
        Self {
            store,
            source,
            preference: ThemePreference::System,
            os_prefers_dark: false,
            phase: ThemePhase::Pending,
            root: VisualRoot::default(),
            watch: None,
            poll_interval: SYSTEM_POLL_INTERVAL,
            disposed: false,
        }
    }

    /// Override the OS watch poll interval
    #[cfg(test)]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Read the stored preference and the OS signal, then apply the result
    ///
    /// Call before anything themed is drawn. Calling it again re-reads both
    /// inputs.
    ///
    /// # Returns
    /// The resolved dark flag
    pub fn initialize(&mut self) -> bool {
        self.preference = self.load_preference();
        self.os_prefers_dark = self.query_os();
        let is_dark = self.reapply();
        self.sync_watch(Instant::now());

        tracing::info!(
            preference = %self.preference,
            os_prefers_dark = self.os_prefers_dark,
            is_dark,
            "Theme initialized"
        );
        is_dark
    }

    /// Read the persisted preference
    ///
    /// Unset, unrecognized or unreadable values all yield `System`.
    pub fn load_preference(&self) -> ThemePreference {
        match self.store.load(THEME_KEY) {
            Ok(Some(raw)) => ThemePreference::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Ignoring unrecognized stored theme preference");
                ThemePreference::System
            }),
            Ok(None) => ThemePreference::System,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read theme preference, using system");
                ThemePreference::System
            }
        }
    }

    /// Current in-memory preference
    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    /// Persist a preference and apply it immediately
    ///
    /// A storage failure is logged; the session still switches to the new
    /// preference, it just won't survive a restart.
    pub fn set_preference(&mut self, preference: ThemePreference) {
        if self.phase == ThemePhase::Pending {
            self.initialize();
        }

        if let Err(e) = self.store.save(THEME_KEY, preference.as_str()) {
            tracing::warn!(error = %e, %preference, "Failed to persist theme preference");
        }

        let entering_system =
            preference == ThemePreference::System && self.preference != ThemePreference::System;
        self.preference = preference;
        if entering_system {
            // The OS value may be stale while nothing was watching it.
            self.os_prefers_dark = self.query_os();
        }

        let is_dark = self.reapply();
        self.sync_watch(Instant::now());
        tracing::debug!(%preference, is_dark, "Theme preference set");
    }

    /// Switch to the preference that visibly flips the theme
    ///
    /// # Returns
    /// The new preference
    pub fn toggle(&mut self) -> ThemePreference {
        if self.phase == ThemePhase::Pending {
            self.initialize();
        }
        let next = toggled(self.preference, self.is_dark());
        self.set_preference(next);
        next
    }

    /// Cached resolved flag; `false` while pending
    pub fn is_dark(&self) -> bool {
        matches!(self.phase, ThemePhase::Ready { is_dark: true })
    }

    pub fn phase(&self) -> ThemePhase {
        self.phase
    }

    /// Visual root carrying the presentation marker
    pub fn root(&self) -> &VisualRoot {
        &self.root
    }

    /// Whether OS color-scheme changes are currently being followed
    pub fn is_watching_system(&self) -> bool {
        self.watch.is_some()
    }

    /// Re-read the OS signal if the watch is due
    ///
    /// # Returns
    /// `true` if the resolved flag changed
    pub fn poll_system(&mut self, now: Instant) -> bool {
        let Some(watch) = self.watch.as_mut() else {
            return false;
        };
        if now < watch.next_poll {
            return false;
        }
        watch.next_poll = now + self.poll_interval;

        let os_prefers_dark = self.query_os();
        if os_prefers_dark == self.os_prefers_dark {
            return false;
        }

        let was_dark = self.is_dark();
        self.os_prefers_dark = os_prefers_dark;
        let is_dark = self.reapply();
        tracing::info!(os_prefers_dark, is_dark, "OS color scheme changed");
        is_dark != was_dark
    }

    /// Stop following the OS signal permanently
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.watch = None;
    }

    /// Backing preference store
    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn query_os(&self) -> bool {
        match self.source.prefers_dark() {
            Ok(dark) => dark,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to query OS color scheme, assuming light");
                false
            }
        }
    }

    fn reapply(&mut self) -> bool {
        let is_dark = resolve(self.preference, self.os_prefers_dark);
        self.phase = ThemePhase::Ready { is_dark };
        apply_root_marker(&mut self.root, is_dark);
        is_dark
    }

    fn sync_watch(&mut self, now: Instant) {
        let wanted = !self.disposed && self.preference == ThemePreference::System;
        match (wanted, self.watch.is_some()) {
            (true, false) => {
                self.watch = Some(SystemWatch {
                    next_poll: now + self.poll_interval,
                });
            }
            (false, true) => self.watch = None,
            _ => {}
        }
    }
}
