//! # Screens and back-navigation
//!
//! A [`Navigator`] owns a name-keyed registry of [`Screen`]s, tracks which
//! one is current, and keeps the back history as a stack of names. The host
//! toolkit supplies the screens; the navigator only decides which one should
//! be visible and when it should rebuild.
//!
//! ```rust
//! use casement_core::TickQueue;
//! use casement_navigation::{Navigator, Screen};
//! use std::rc::Rc;
//!
//! struct Page(&'static str);
//! impl Screen for Page {
//!     fn name(&self) -> &str {
//!         self.0
//!     }
//!     fn activate(&self) {
//!         log::debug!("{} is now visible", self.0);
//!     }
//! }
//!
//! let ticks = TickQueue::new();
//! let nav = Navigator::new(ticks.clone());
//! nav.add_screen(Rc::new(Page("home")))?;
//! nav.add_screen(Rc::new(Page("settings")))?;
//!
//! nav.set_screen("home")?;
//! nav.set_screen("settings")?;
//! assert!(nav.go_back()); // lands on "home", history is empty again
//! # Ok::<(), casement_navigation::NavError>(())
//! ```
//!
//! Screens are registered for the lifetime of the navigator, so a name that
//! ever reached the history can always be resolved again.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use casement_core::TickQueue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One navigable view owned by the host toolkit.
///
/// `activate` brings the screen's surface to the front; it runs on every
/// navigation to the screen, including repeats. `rebuild` re-synthesizes the
/// content and is only ever called through the deferred autoreload path.
pub trait Screen {
    fn name(&self) -> &str;
    fn activate(&self);
    fn rebuild(&self) {}
    fn autoreload(&self) -> bool {
        false
    }
}

pub type ScreenRef = Rc<dyn Screen>;

/// Host hook run after a screen is registered, e.g. to add its surface to a
/// stacked container. Applies to registrations made after the hook is set.
pub type AttachHook = Rc<dyn Fn(&ScreenRef)>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("screen has no name")]
    UnnamedScreen,
    #[error("screen '{0}' is already registered")]
    DuplicateScreen(String),
    #[error("no screen named '{0}'")]
    UnknownScreen(String),
}

struct NavState {
    registry: HashMap<String, ScreenRef>,
    current: Option<String>,
    history: Vec<String>,
    attach: Option<AttachHook>,
}

#[derive(Clone)]
pub struct Navigator {
    inner: Rc<RefCell<NavState>>,
    ticks: TickQueue,
}

impl Navigator {
    pub fn new(ticks: TickQueue) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NavState {
                registry: HashMap::new(),
                current: None,
                history: Vec::new(),
                attach: None,
            })),
            ticks,
        }
    }

    pub fn set_attach_hook(&self, hook: Option<AttachHook>) {
        self.inner.borrow_mut().attach = hook;
    }

    /// Registers `screen` under its own name. Names must be non-empty and
    /// unique; the registry never shrinks, which keeps every name in the
    /// back history resolvable.
    pub fn add_screen(&self, screen: ScreenRef) -> Result<(), NavError> {
        if screen.name().is_empty() {
            return Err(NavError::UnnamedScreen);
        }
        let name = screen.name().to_string();
        let attach = {
            let mut s = self.inner.borrow_mut();
            if s.registry.contains_key(&name) {
                return Err(NavError::DuplicateScreen(name));
            }
            s.registry.insert(name.clone(), Rc::clone(&screen));
            s.attach.clone()
        };
        log::debug!("registered screen '{name}'");
        // host callback runs with the registry borrow released
        if let Some(attach) = attach {
            attach(&screen);
        }
        Ok(())
    }

    /// Makes `name` the current screen. The screen that was current goes on
    /// the back history; navigating to the already-current screen
    /// re-activates it without touching the history.
    pub fn set_screen(&self, name: &str) -> Result<(), NavError> {
        let screen = {
            let mut s = self.inner.borrow_mut();
            let Some(screen) = s.registry.get(name).cloned() else {
                return Err(NavError::UnknownScreen(name.to_string()));
            };
            if s.current.as_deref() != Some(name)
                && let Some(prev) = s.current.replace(name.to_string())
            {
                s.history.push(prev);
            }
            screen
        };
        log::debug!("showing screen '{name}'");
        screen.activate();
        self.schedule_autoreload(&screen);
        Ok(())
    }

    /// Pops one step of history and activates the screen it names. A pop is
    /// consumed for good: going back never re-pushes the screen being left.
    /// Returns `false` without any effect when the history is empty.
    pub fn go_back(&self) -> bool {
        let screen = {
            let mut s = self.inner.borrow_mut();
            let Some(prev) = s.history.pop() else {
                return false;
            };
            s.current = Some(prev.clone());
            // registered names never leave the registry, so this resolves
            s.registry.get(&prev).cloned()
        };
        if let Some(screen) = screen {
            log::debug!("back to screen '{}'", screen.name());
            screen.activate();
            self.schedule_autoreload(&screen);
        }
        true
    }

    fn schedule_autoreload(&self, screen: &ScreenRef) {
        if !screen.autoreload() {
            return;
        }
        let inner = Rc::clone(&self.inner);
        let screen = Rc::clone(screen);
        // rebuild once the visibility change has settled, and only if the
        // screen was not left again in the meantime
        self.ticks.defer(move || {
            if inner.borrow().current.as_deref() == Some(screen.name()) {
                screen.rebuild();
            }
        });
    }

    pub fn current(&self) -> Option<String> {
        self.inner.borrow().current.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.inner.borrow().history.clone()
    }

    pub fn screen(&self, name: &str) -> Option<ScreenRef> {
        self.inner.borrow().registry.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().registry.contains_key(name)
    }

    /// Number of registered screens.
    pub fn len(&self) -> usize {
        self.inner.borrow().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().registry.is_empty()
    }

    pub fn snapshot(&self) -> NavSnapshot {
        let s = self.inner.borrow();
        NavSnapshot {
            current: s.current.clone(),
            history: s.history.clone(),
        }
    }

    /// Replaces current and history from a snapshot, then activates the
    /// restored current screen. Every snapshot name must already be
    /// registered; on error nothing changes. History screens are not
    /// activated.
    pub fn restore(&self, snap: &NavSnapshot) -> Result<(), NavError> {
        let screen = {
            let mut s = self.inner.borrow_mut();
            for name in snap.history.iter().chain(&snap.current) {
                if !s.registry.contains_key(name) {
                    return Err(NavError::UnknownScreen(name.clone()));
                }
            }
            s.history = snap.history.clone();
            s.current = snap.current.clone();
            snap.current
                .as_ref()
                .and_then(|name| s.registry.get(name).cloned())
        };
        if let Some(screen) = screen {
            screen.activate();
            self.schedule_autoreload(&screen);
        }
        Ok(())
    }
}

/// Where the user is and how they got there, detached from the screens
/// themselves. Meant for in-process state transfer, e.g. rebuilding a
/// navigator after the host recreates its window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSnapshot {
    pub current: Option<String>,
    pub history: Vec<String>,
}

impl NavSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or("{}".into())
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct TestScreen {
        name: String,
        autoreload: bool,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl TestScreen {
        fn new(name: &str, log: &Rc<RefCell<Vec<String>>>) -> Rc<Self> {
            Rc::new(Self {
                name: name.to_string(),
                autoreload: false,
                log: log.clone(),
            })
        }

        fn autoreloading(name: &str, log: &Rc<RefCell<Vec<String>>>) -> Rc<Self> {
            Rc::new(Self {
                name: name.to_string(),
                autoreload: true,
                log: log.clone(),
            })
        }
    }

    impl Screen for TestScreen {
        fn name(&self) -> &str {
            &self.name
        }
        fn activate(&self) {
            self.log.borrow_mut().push(format!("show {}", self.name));
        }
        fn rebuild(&self) {
            self.log.borrow_mut().push(format!("rebuild {}", self.name));
        }
        fn autoreload(&self) -> bool {
            self.autoreload
        }
    }

    fn fixture() -> (Navigator, TickQueue, Rc<RefCell<Vec<String>>>) {
        let ticks = TickQueue::new();
        let nav = Navigator::new(ticks.clone());
        let log = Rc::new(RefCell::new(Vec::new()));
        (nav, ticks, log)
    }

    #[test]
    fn register_and_navigate() {
        let (nav, _ticks, log) = fixture();
        nav.add_screen(TestScreen::new("home", &log)).unwrap();
        nav.add_screen(TestScreen::new("settings", &log)).unwrap();
        assert_eq!(nav.len(), 2);

        nav.set_screen("home").unwrap();
        assert_eq!(nav.current().as_deref(), Some("home"));
        assert!(nav.history().is_empty());
        assert_eq!(*log.borrow(), vec!["show home"]);
    }

    #[test]
    fn registration_errors() {
        let (nav, _ticks, log) = fixture();
        assert_eq!(
            nav.add_screen(TestScreen::new("", &log)),
            Err(NavError::UnnamedScreen)
        );
        nav.add_screen(TestScreen::new("home", &log)).unwrap();
        assert_eq!(
            nav.add_screen(TestScreen::new("home", &log)),
            Err(NavError::DuplicateScreen("home".into()))
        );
        assert_eq!(nav.len(), 1);
    }

    #[test]
    fn unknown_screen_errors() {
        let (nav, _ticks, _log) = fixture();
        assert_eq!(
            nav.set_screen("nowhere"),
            Err(NavError::UnknownScreen("nowhere".into()))
        );
        assert_eq!(nav.current(), None);
    }

    #[test]
    fn history_grows_per_visit_and_pops_one_per_back() {
        let (nav, _ticks, log) = fixture();
        nav.add_screen(TestScreen::new("a", &log)).unwrap();
        nav.add_screen(TestScreen::new("b", &log)).unwrap();

        nav.set_screen("a").unwrap();
        nav.set_screen("b").unwrap();
        nav.set_screen("a").unwrap();
        nav.set_screen("b").unwrap();
        assert_eq!(nav.history(), vec!["a", "b", "a"]);

        assert!(nav.go_back());
        assert_eq!(nav.current().as_deref(), Some("a"));
        assert_eq!(nav.history(), vec!["a", "b"]);

        assert!(nav.go_back());
        assert_eq!(nav.current().as_deref(), Some("b"));
        assert_eq!(nav.history(), vec!["a"]);
    }

    #[test]
    fn go_back_activates_the_restored_screen() {
        let (nav, _ticks, log) = fixture();
        nav.add_screen(TestScreen::new("home", &log)).unwrap();
        nav.add_screen(TestScreen::new("detail", &log)).unwrap();

        nav.set_screen("home").unwrap();
        nav.set_screen("detail").unwrap();
        log.borrow_mut().clear();

        assert!(nav.go_back());
        assert_eq!(*log.borrow(), vec!["show home"]);
        // the screen that was left is not re-pushed
        assert!(nav.history().is_empty());
    }

    #[test]
    fn go_back_on_empty_history_is_a_noop() {
        let (nav, _ticks, log) = fixture();
        nav.add_screen(TestScreen::new("home", &log)).unwrap();
        nav.set_screen("home").unwrap();
        log.borrow_mut().clear();

        assert!(!nav.go_back());
        assert_eq!(nav.current().as_deref(), Some("home"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn revisiting_the_current_screen_skips_history() {
        let (nav, _ticks, log) = fixture();
        nav.add_screen(TestScreen::new("home", &log)).unwrap();

        nav.set_screen("home").unwrap();
        nav.set_screen("home").unwrap();
        assert!(nav.history().is_empty());
        // it still re-activates
        assert_eq!(*log.borrow(), vec!["show home", "show home"]);
    }

    #[test]
    fn autoreload_rebuild_waits_for_the_tick() {
        let (nav, ticks, log) = fixture();
        nav.add_screen(TestScreen::autoreloading("form", &log))
            .unwrap();

        nav.set_screen("form").unwrap();
        assert_eq!(*log.borrow(), vec!["show form"]);

        ticks.tick();
        assert_eq!(*log.borrow(), vec!["show form", "rebuild form"]);
    }

    #[test]
    fn plain_screens_never_rebuild() {
        let (nav, ticks, log) = fixture();
        nav.add_screen(TestScreen::new("home", &log)).unwrap();

        nav.set_screen("home").unwrap();
        assert_eq!(ticks.tick(), 0);
        assert_eq!(*log.borrow(), vec!["show home"]);
    }

    #[test]
    fn autoreload_skipped_when_screen_left_before_the_tick() {
        let (nav, ticks, log) = fixture();
        nav.add_screen(TestScreen::autoreloading("form", &log))
            .unwrap();
        nav.add_screen(TestScreen::new("home", &log)).unwrap();

        nav.set_screen("form").unwrap();
        nav.set_screen("home").unwrap();
        ticks.run_until_idle();

        assert_eq!(*log.borrow(), vec!["show form", "show home"]);
    }

    #[test]
    fn attach_hook_runs_for_later_registrations() {
        let (nav, _ticks, log) = fixture();
        nav.add_screen(TestScreen::new("early", &log)).unwrap();

        let attached = Rc::new(RefCell::new(Vec::new()));
        let attached_clone = attached.clone();
        nav.set_attach_hook(Some(Rc::new(move |screen: &ScreenRef| {
            attached_clone.borrow_mut().push(screen.name().to_string());
        })));

        nav.add_screen(TestScreen::new("late", &log)).unwrap();
        assert_eq!(*attached.borrow(), vec!["late"]);
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let (nav, _ticks, log) = fixture();
        nav.add_screen(TestScreen::new("a", &log)).unwrap();
        nav.add_screen(TestScreen::new("b", &log)).unwrap();
        nav.set_screen("a").unwrap();
        nav.set_screen("b").unwrap();

        let snap = nav.snapshot();
        let parsed = NavSnapshot::from_json(&snap.to_json()).unwrap();
        assert_eq!(parsed, snap);
        assert_eq!(parsed.current.as_deref(), Some("b"));
        assert_eq!(parsed.history, vec!["a"]);
    }

    #[test]
    fn restore_validates_and_activates() {
        let (nav, _ticks, log) = fixture();
        nav.add_screen(TestScreen::new("a", &log)).unwrap();
        nav.add_screen(TestScreen::new("b", &log)).unwrap();

        let bad = NavSnapshot {
            current: Some("ghost".into()),
            history: vec!["a".into()],
        };
        assert_eq!(
            nav.restore(&bad),
            Err(NavError::UnknownScreen("ghost".into()))
        );
        assert_eq!(nav.current(), None);
        assert!(nav.history().is_empty());

        let good = NavSnapshot {
            current: Some("b".into()),
            history: vec!["a".into()],
        };
        nav.restore(&good).unwrap();
        assert_eq!(nav.current().as_deref(), Some("b"));
        assert_eq!(nav.history(), vec!["a"]);
        assert_eq!(*log.borrow(), vec!["show b"]);
    }
}
