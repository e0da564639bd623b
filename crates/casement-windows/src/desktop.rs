//! Desktop surfaces backed by winit windows.
//!
//! The host keeps its own `EventLoop` and `ApplicationHandler`; this module
//! only adapts a created window to the [`WindowSurface`] contract. Route
//! `WindowEvent::CloseRequested` for the window to
//! [`WinitSurface::handle_close_requested`].

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use winit::dpi::{LogicalPosition, LogicalSize};
use winit::window::{Window, WindowButtons};

use crate::{CloseHook, WindowConfig, WindowStyle, WindowSurface};

pub struct WinitSurface {
    // dropping the handle is what destroys a winit window
    window: RefCell<Option<Arc<Window>>>,
    hook: RefCell<Option<CloseHook>>,
}

impl WinitSurface {
    pub fn new(window: Arc<Window>) -> Rc<Self> {
        Rc::new(Self {
            window: RefCell::new(Some(window)),
            hook: RefCell::new(None),
        })
    }

    pub fn window(&self) -> Option<Arc<Window>> {
        self.window.borrow().clone()
    }

    /// Host entry point for `WindowEvent::CloseRequested`: runs the
    /// manager's hook, then closes.
    pub fn handle_close_requested(&self) {
        log::info!("window close requested");
        let hook = self.hook.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
        self.close();
    }
}

impl WindowSurface for WinitSurface {
    fn configure(&self, config: &WindowConfig) {
        let Some(window) = self.window() else {
            return;
        };
        window.set_title(&config.title);
        window.set_outer_position(LogicalPosition::new(
            config.geometry.x as f64,
            config.geometry.y as f64,
        ));
        let _ = window.request_inner_size(LogicalSize::new(
            config.geometry.w as f64,
            config.geometry.h as f64,
        ));
        window.set_resizable(config.style.contains(WindowStyle::RESIZABLE));
        let mut buttons = WindowButtons::CLOSE | WindowButtons::MINIMIZE;
        if config.style.contains(WindowStyle::MAXIMIZABLE) {
            buttons |= WindowButtons::MAXIMIZE;
        }
        window.set_enabled_buttons(buttons);
    }

    fn show(&self) {
        if let Some(window) = self.window() {
            window.set_visible(true);
        }
    }

    fn activate(&self) {
        if let Some(window) = self.window() {
            window.focus_window();
        }
    }

    fn close(&self) {
        if let Some(window) = self.window.borrow_mut().take() {
            window.set_visible(false);
        }
    }

    fn set_close_hook(&self, hook: Option<CloseHook>) {
        *self.hook.borrow_mut() = hook;
    }
}
