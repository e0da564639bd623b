//! # Named windows and their lifecycle
//!
//! A [`WindowManager`] keeps at most one open window per name. The host
//! toolkit supplies each window as a [`WindowSurface`]; the manager decides
//! when it gets configured, shown, focused, and forgotten.
//!
//! Closing splits in two on purpose. [`close_window`](WindowManager::close_window)
//! is the programmatic path and removes the entry synchronously. A
//! user-driven close instead reaches the manager through the hook installed
//! on the surface, and that hook defers the removal one tick so code
//! running inside the close event can still look the window up.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bitflags::bitflags;
use casement_core::{Rect, TickQueue};
use thiserror::Error;

#[cfg(feature = "desktop")]
pub mod desktop;
pub mod toast;

bitflags! {
    /// Frame capabilities requested for a window.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WindowStyle: u8 {
        const RESIZABLE = 1 << 0;
        const MAXIMIZABLE = 1 << 1;
    }
}

impl Default for WindowStyle {
    fn default() -> Self {
        Self::RESIZABLE | Self::MAXIMIZABLE
    }
}

/// What a caller asks for. `create_window` resolves it into a
/// [`WindowConfig`] or says which field is missing. Names and titles
/// must be non-empty.
#[derive(Clone, Debug, Default)]
pub struct WindowSpec {
    name: Option<String>,
    title: Option<String>,
    geometry: Option<Rect>,
    style: WindowStyle,
}

impl WindowSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn geometry(mut self, geometry: Rect) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn style(mut self, style: WindowStyle) -> Self {
        self.style = style;
        self
    }

    // name first, the other messages want a window to blame; a blank
    // string counts as missing, same as an unnamed screen
    fn resolve(&self) -> Result<WindowConfig, WindowError> {
        let name = self
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or(WindowError::MissingName)?;
        let title = self
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| WindowError::MissingTitle(name.clone()))?;
        let geometry = self
            .geometry
            .ok_or_else(|| WindowError::MissingGeometry(name.clone()))?;
        Ok(WindowConfig {
            name,
            title,
            geometry,
            style: self.style,
        })
    }
}

/// A fully specified window, ready to hand to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub name: String,
    pub title: String,
    pub geometry: Rect,
    pub style: WindowStyle,
}

/// Invoked by the host when its close event fires for the window.
pub type CloseHook = Rc<dyn Fn()>;

/// Host-side window capabilities the manager drives.
pub trait WindowSurface {
    fn configure(&self, config: &WindowConfig);
    fn show(&self);
    /// Raise and focus.
    fn activate(&self);
    fn close(&self);
    /// The manager installs its bookkeeping here; hosts run the installed
    /// hook from their close event.
    fn set_close_hook(&self, hook: Option<CloseHook>);
}

pub type SurfaceRef = Rc<dyn WindowSurface>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("window spec has no name")]
    MissingName,
    #[error("window '{0}' has no title")]
    MissingTitle(String),
    #[error("window '{0}' has no geometry")]
    MissingGeometry(String),
    #[error("no open window named '{0}'")]
    UnknownWindow(String),
}

/// Whether `create_window` actually opened anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    /// The name was already open; the request was ignored.
    AlreadyOpen,
}

struct WindowEntry {
    surface: SurfaceRef,
    config: WindowConfig,
}

#[derive(Clone)]
pub struct WindowManager {
    inner: Rc<RefCell<HashMap<String, WindowEntry>>>,
    ticks: TickQueue,
}

impl WindowManager {
    pub fn new(ticks: TickQueue) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HashMap::new())),
            ticks,
        }
    }

    /// Opens a window for `spec`, backed by `surface`. An incomplete spec
    /// is an error; a name that is already open is reported and ignored,
    /// leaving the existing window untouched.
    pub fn create_window(
        &self,
        spec: &WindowSpec,
        surface: SurfaceRef,
    ) -> Result<OpenOutcome, WindowError> {
        let config = spec.resolve()?;
        if self.inner.borrow().contains_key(&config.name) {
            log::warn!("window '{}' is already open", config.name);
            return Ok(OpenOutcome::AlreadyOpen);
        }

        surface.set_close_hook(Some(self.removal_hook(config.name.clone(), &surface)));
        self.inner.borrow_mut().insert(
            config.name.clone(),
            WindowEntry {
                surface: Rc::clone(&surface),
                config: config.clone(),
            },
        );
        log::debug!("opened window '{}'", config.name);
        surface.configure(&config);
        surface.show();
        Ok(OpenOutcome::Opened)
    }

    // Removal is deferred one tick so the closing turn can still resolve
    // the window by name. The task evicts only the surface it was armed
    // for; the name may belong to a newer window by the time it runs.
    fn removal_hook(&self, name: String, surface: &SurfaceRef) -> CloseHook {
        let inner = Rc::clone(&self.inner);
        let ticks = self.ticks.clone();
        // held weakly, the hook lives on the surface it points at
        let closing = Rc::downgrade(surface);
        Rc::new(move || {
            log::debug!("window '{name}' close reported");
            let inner = Rc::clone(&inner);
            let name = name.clone();
            let closing = closing.clone();
            ticks.defer(move || {
                let mut windows = inner.borrow_mut();
                if let Some(entry) = windows.get(&name)
                    && let Some(closing) = closing.upgrade()
                    && Rc::ptr_eq(&entry.surface, &closing)
                {
                    windows.remove(&name);
                }
            });
        })
    }

    /// Raises and focuses the window.
    pub fn set_window(&self, name: &str) -> Result<(), WindowError> {
        let surface = self
            .inner
            .borrow()
            .get(name)
            .map(|e| Rc::clone(&e.surface))
            .ok_or_else(|| WindowError::UnknownWindow(name.to_string()))?;
        surface.activate();
        Ok(())
    }

    /// Closes the window and removes it immediately, unlike the user-driven
    /// path through the close hook.
    pub fn close_window(&self, name: &str) -> Result<(), WindowError> {
        let entry = self
            .inner
            .borrow_mut()
            .remove(name)
            .ok_or_else(|| WindowError::UnknownWindow(name.to_string()))?;
        // the entry is gone already, a hook firing during close would only
        // queue a useless removal
        entry.surface.set_close_hook(None);
        entry.surface.close();
        log::debug!("closed window '{name}'");
        Ok(())
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.inner.borrow().contains_key(name)
    }

    pub fn open_count(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn surface(&self, name: &str) -> Option<SurfaceRef> {
        self.inner.borrow().get(name).map(|e| Rc::clone(&e.surface))
    }

    pub fn config(&self, name: &str) -> Option<WindowConfig> {
        self.inner.borrow().get(name).map(|e| e.config.clone())
    }
}
