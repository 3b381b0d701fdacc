// Theme module - preference model, resolution rules and the visual root
//
// The preference is tri-state (light/dark/system). What actually gets drawn
// is a single boolean derived from the preference and the OS color-scheme
// signal. Nothing stores that boolean independently: the manager caches
// it, but always recomputes it from its two inputs.

pub mod manager;
pub mod palette;
pub mod store;
pub mod system;

use std::fmt;
use std::str::FromStr;

pub use manager::{ThemeManager, ThemePhase, SYSTEM_POLL_INTERVAL};
pub use palette::*;
pub use store::{FileStore, MemoryStore, PreferenceStore};
pub use system::{BackgroundColorScheme, ColorSchemeSource, SystemColorScheme};

/// Storage key under which the preference is persisted
pub const THEME_KEY: &str = "theme";

/// User-selected theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemePreference {
    /// Always light
    Light,
    /// Always dark
    Dark,
    /// Follow the OS color scheme (default)
    #[default]
    System,
}

impl ThemePreference {
    /// Every preference value, in display order
    pub const ALL: [ThemePreference; 3] = [
        ThemePreference::Light,
        ThemePreference::Dark,
        ThemePreference::System,
    ];

    /// Persisted string form
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    /// Parse a persisted value, returning `None` for anything unrecognized
    ///
    /// Only the exact lowercase forms written by `as_str` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pref| pref.as_str() == raw)
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    /// Lenient form for command-line input: surrounding whitespace and case are ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|pref| pref.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("expected light, dark or system, got {s:?}"))
    }
}

/// Resolve a preference against the OS signal
///
/// Returns `true` when the dark presentation should be rendered.
pub fn resolve(preference: ThemePreference, os_prefers_dark: bool) -> bool {
    preference == ThemePreference::Dark
        || (preference == ThemePreference::System && os_prefers_dark)
}

/// Preference that a toggle switches to
///
/// From `System` the result is the explicit opposite of what is currently
/// shown, so a toggle always produces a visible change.
pub fn toggled(preference: ThemePreference, resolved_dark: bool) -> ThemePreference {
    match preference {
        ThemePreference::System => {
            if resolved_dark {
                ThemePreference::Light
            } else {
                ThemePreference::Dark
            }
        }
        ThemePreference::Dark => ThemePreference::Light,
        ThemePreference::Light => ThemePreference::Dark,
    }
}

/// Presentation marker on the root of the rendered frame
///
/// Styling keys off `marker()`: `None` until the theme has been resolved,
/// then the dark flag. Only `apply_root_marker` writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisualRoot {
    dark: Option<bool>,
}

impl VisualRoot {
    /// Current marker, `None` before the first apply
    pub fn marker(&self) -> Option<bool> {
        self.dark
    }

    /// Whether the dark marker is present
    #[cfg(test)]
    pub fn has_dark_marker(&self) -> bool {
        self.dark == Some(true)
    }
}

/// Apply the resolved theme to the visual root
pub fn apply_root_marker(root: &mut VisualRoot, is_dark: bool) {
    root.dark = Some(is_dark);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_preference() -> impl Strategy<Value = ThemePreference> {
        prop_oneof![
            Just(ThemePreference::Light),
            Just(ThemePreference::Dark),
            Just(ThemePreference::System),
        ]
    }

    proptest! {
        /// **Property: resolve truth table**
        ///
        /// For every preference and OS signal, the resolved flag is dark
        /// exactly when the preference is dark, or system with a dark OS.
        #[test]
        fn prop_resolve_matches_definition(pref in any_preference(), os_dark in any::<bool>()) {
            let expected = pref == ThemePreference::Dark
                || (pref == ThemePreference::System && os_dark);
            prop_assert_eq!(resolve(pref, os_dark), expected);
        }

        /// **Property: toggle always changes what is shown**
        #[test]
        fn prop_toggle_flips_resolved(pref in any_preference(), os_dark in any::<bool>()) {
            let before = resolve(pref, os_dark);
            let after = resolve(toggled(pref, before), os_dark);
            prop_assert_ne!(before, after);
        }

        /// **Property: persisted form parses back**
        #[test]
        fn prop_preference_string_form_parses(pref in any_preference()) {
            prop_assert_eq!(ThemePreference::parse(pref.as_str()), Some(pref));
        }
    }

    #[test]
    fn test_toggle_from_system_goes_explicit() {
        assert_eq!(toggled(ThemePreference::System, true), ThemePreference::Light);
        assert_eq!(toggled(ThemePreference::System, false), ThemePreference::Dark);
        assert_eq!(toggled(ThemePreference::Dark, true), ThemePreference::Light);
        assert_eq!(toggled(ThemePreference::Light, false), ThemePreference::Dark);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert_eq!(ThemePreference::parse(""), None);
        assert_eq!(ThemePreference::parse("sepia"), None);
        assert_eq!(ThemePreference::parse("DARK"), None);
        assert_eq!(ThemePreference::parse(" dark\n"), None);
        assert_eq!(ThemePreference::parse("dark"), Some(ThemePreference::Dark));
        assert!("midnight".parse::<ThemePreference>().is_err());
    }

    #[test]
    fn test_from_str_is_lenient() {
        assert_eq!(" Dark\n".parse::<ThemePreference>(), Ok(ThemePreference::Dark));
        assert_eq!("SYSTEM".parse::<ThemePreference>(), Ok(ThemePreference::System));
    }

    #[test]
    fn test_root_marker_starts_unset() {
        let mut root = VisualRoot::default();
        assert_eq!(root.marker(), None);
        assert!(!root.has_dark_marker());

        apply_root_marker(&mut root, true);
        assert!(root.has_dark_marker());

        apply_root_marker(&mut root, false);
        assert_eq!(root.marker(), Some(false));
    }
}
