// OS color-scheme detection
//
// Answers "does the OS prefer dark?" by trying, in order:
// 1. the FOLIO_COLOR_SCHEME override (light/dark)
// 2. the desktop setting (GNOME gsettings, macOS AppleInterfaceStyle,
//    Windows AppsUseLightTheme)
// 3. the terminal background reported through COLORFGBG
//
// The desktop probes spawn helper processes, which can stall on a slow
// D-Bus reply. `BackgroundColorScheme` runs them on a helper thread and
// answers from the latest result, so the event loop never waits on them.

use std::cell::RefCell;
use std::env;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::error::ThemeError;

/// Environment variable that forces the OS signal
pub const SCHEME_OVERRIDE_VAR: &str = "FOLIO_COLOR_SCHEME";

/// Source of the OS-level "prefers dark" signal
pub trait ColorSchemeSource {
    /// Query the current OS preference
    fn prefers_dark(&self) -> Result<bool, ThemeError>;
}

impl<T: ColorSchemeSource + ?Sized> ColorSchemeSource for Box<T> {
    fn prefers_dark(&self) -> Result<bool, ThemeError> {
        (**self).prefers_dark()
    }
}

/// Probe the real environment
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemColorScheme;

impl ColorSchemeSource for SystemColorScheme {
    fn prefers_dark(&self) -> Result<bool, ThemeError> {
        if let Ok(value) = env::var(SCHEME_OVERRIDE_VAR) {
            return scheme_from_override(&value);
        }

        if let Some(dark) = detect_desktop_dark_mode() {
            return Ok(dark);
        }

        env::var("COLORFGBG")
            .ok()
            .and_then(|value| scheme_from_colorfgbg(&value))
            .ok_or(ThemeError::SchemeUnavailable)
    }
}

/// Re-runs another source on a helper thread and caches its answer
///
/// The first query happens on the calling thread, so the answer is real
/// from the start. After that the helper re-queries every `interval` and
/// `prefers_dark` returns the newest result without blocking. Dropping the
/// source stops the helper.
pub struct BackgroundColorScheme {
    latest: RefCell<Result<bool, ThemeError>>,
    results: Receiver<Result<bool, ThemeError>>,
    _stop: Sender<()>,
}

impl BackgroundColorScheme {
    /// Query `source` once, then keep it refreshed in the background
    pub fn spawn<S>(source: S, interval: Duration) -> io::Result<Self>
    where
        S: ColorSchemeSource + Send + 'static,
    {
        let initial = source.prefers_dark();
        let (result_tx, results) = mpsc::channel();
        let (stop, stop_rx) = mpsc::channel::<()>();

        thread::Builder::new()
            .name("folio-color-scheme".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if result_tx.send(source.prefers_dark()).is_err() {
                            break;
                        }
                    }
                    // Stop requested or the owner is gone
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(Self {
            latest: RefCell::new(initial),
            results,
            _stop: stop,
        })
    }
}

impl ColorSchemeSource for BackgroundColorScheme {
    fn prefers_dark(&self) -> Result<bool, ThemeError> {
        let mut latest = self.latest.borrow_mut();
        if let Some(result) = self.results.try_iter().last() {
            *latest = result;
        }
        latest.clone()
    }
}

/// Fixed answer, for tests outside this module
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedColorScheme(pub bool);

#[cfg(test)]
impl ColorSchemeSource for FixedColorScheme {
    fn prefers_dark(&self) -> Result<bool, ThemeError> {
        Ok(self.0)
    }
}

/// Interpret the override variable
pub fn scheme_from_override(value: &str) -> Result<bool, ThemeError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "dark" => Ok(true),
        "light" => Ok(false),
        _ => Err(ThemeError::InvalidScheme(value.to_string())),
    }
}

/// Interpret COLORFGBG (`fg;bg` or `fg;default;bg`)
///
/// Background indices below 8 are the dark half of the ANSI palette.
pub fn scheme_from_colorfgbg(value: &str) -> Option<bool> {
    let bg = value.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    if value.split(';').count() < 2 {
        return None;
    }
    Some(bg < 8)
}

/// Interpret `gsettings get org.gnome.desktop.interface color-scheme`
pub fn scheme_from_gnome_color_scheme(output: &str) -> Option<bool> {
    let scheme = output.trim().trim_matches('\'');
    match scheme {
        "prefer-dark" => Some(true),
        "prefer-light" | "default" => Some(false),
        _ => None,
    }
}

#[cfg(target_os = "linux")]
fn detect_desktop_dark_mode() -> Option<bool> {
    use std::process::Command;

    let gsettings = |key: &str| -> Option<String> {
        let output = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", key])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).to_string())
    };

    // A dark GTK theme wins even when color-scheme is left at "default".
    if let Some(theme) = gsettings("gtk-theme") {
        if theme.to_lowercase().contains("dark") {
            return Some(true);
        }
    }

    gsettings("color-scheme").and_then(|scheme| scheme_from_gnome_color_scheme(&scheme))
}

#[cfg(target_os = "macos")]
fn detect_desktop_dark_mode() -> Option<bool> {
    use std::process::Command;

    let output = Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    // The key is absent (non-zero exit) in light mode.
    if !output.status.success() {
        return Some(false);
    }
    let style = String::from_utf8_lossy(&output.stdout).to_lowercase();
    Some(style.contains("dark"))
}

#[cfg(target_os = "windows")]
fn detect_desktop_dark_mode() -> Option<bool> {
    use winreg::enums::HKEY_CURRENT_USER;
    use winreg::RegKey;

    let personalize = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        .ok()?;
    // AppsUseLightTheme: 0 = dark mode, 1 = light mode
    let value: u32 = personalize.get_value("AppsUseLightTheme").ok()?;
    Some(value == 0)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn detect_desktop_dark_mode() -> Option<bool> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    /// Answer shared with the test, optionally slow to respond
    #[derive(Clone, Default)]
    struct SharedScheme {
        dark: Arc<Mutex<Option<bool>>>,
        delay_ms: Arc<AtomicU64>,
        queries: Arc<AtomicUsize>,
    }

    impl SharedScheme {
        fn set(&self, dark: Option<bool>) {
            *self.dark.lock().unwrap() = dark;
        }
    }

    impl ColorSchemeSource for SharedScheme {
        fn prefers_dark(&self) -> Result<bool, ThemeError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(self.delay_ms.load(Ordering::SeqCst)));
            (*self.dark.lock().unwrap()).ok_or(ThemeError::SchemeUnavailable)
        }
    }

    fn wait_for(mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_background_scheme_answers_immediately() {
        let shared = SharedScheme::default();
        shared.set(Some(true));
        let source = BackgroundColorScheme::spawn(shared.clone(), Duration::from_secs(60)).unwrap();
        assert!(source.prefers_dark().unwrap());
        assert_eq!(shared.queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_background_scheme_picks_up_changes() {
        let shared = SharedScheme::default();
        shared.set(Some(false));
        let source =
            BackgroundColorScheme::spawn(shared.clone(), Duration::from_millis(10)).unwrap();
        assert!(!source.prefers_dark().unwrap());

        shared.set(Some(true));
        assert!(wait_for(|| source.prefers_dark().unwrap_or(false)));

        shared.set(None);
        assert!(wait_for(|| source.prefers_dark().is_err()));
    }

    #[test]
    fn test_slow_desktop_query_does_not_block() {
        let shared = SharedScheme::default();
        shared.set(Some(false));
        let source =
            BackgroundColorScheme::spawn(shared.clone(), Duration::from_millis(10)).unwrap();

        // Every query from now on hangs for half a second
        shared.delay_ms.store(500, Ordering::SeqCst);
        assert!(wait_for(|| shared.queries.load(Ordering::SeqCst) >= 2));

        let started = Instant::now();
        assert!(!source.prefers_dark().unwrap());
        assert!(started.elapsed() < Duration::from_millis(250));
    }

    #[test]
    fn test_dropping_background_scheme_stops_queries() {
        let shared = SharedScheme::default();
        shared.set(Some(false));
        let source =
            BackgroundColorScheme::spawn(shared.clone(), Duration::from_millis(5)).unwrap();
        assert!(wait_for(|| shared.queries.load(Ordering::SeqCst) >= 3));

        drop(source);
        thread::sleep(Duration::from_millis(50));
        let settled = shared.queries.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(shared.queries.load(Ordering::SeqCst), settled);
    }

    #[test]
    fn test_override_values() {
        assert!(scheme_from_override("dark").unwrap());
        assert!(!scheme_from_override(" Light ").unwrap());
        assert!(matches!(
            scheme_from_override("dusk"),
            Err(ThemeError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_colorfgbg() {
        assert_eq!(scheme_from_colorfgbg("15;0"), Some(true));
        assert_eq!(scheme_from_colorfgbg("0;15"), Some(false));
        assert_eq!(scheme_from_colorfgbg("15;default;0"), Some(true));
        assert_eq!(scheme_from_colorfgbg("15"), None);
        assert_eq!(scheme_from_colorfgbg("15;default"), None);
    }

    #[test]
    fn test_gnome_color_scheme() {
        assert_eq!(scheme_from_gnome_color_scheme("'prefer-dark'\n"), Some(true));
        assert_eq!(scheme_from_gnome_color_scheme("'default'\n"), Some(false));
        assert_eq!(scheme_from_gnome_color_scheme(""), None);
    }
}
