//! Headless walkthrough of the casement runtime: screens with back
//! navigation, a managed popup window, session storage, and a store.
//!
//! Run with `RUST_LOG=debug cargo run -p login_flow` to see the full
//! transition log.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use casement_core::{Rect, Size, TickQueue, create_store, listener, session};
use casement_navigation::{Navigator, Screen};
use casement_windows::toast::{ToastCounters, toast_anchor};
use casement_windows::{
    CloseHook, OpenOutcome, WindowConfig, WindowManager, WindowSpec, WindowSurface,
};

struct ConsoleScreen {
    name: &'static str,
    autoreload: bool,
    visits: Cell<u32>,
}

impl ConsoleScreen {
    fn new(name: &'static str, autoreload: bool) -> Rc<Self> {
        Rc::new(Self {
            name,
            autoreload,
            visits: Cell::new(0),
        })
    }
}

impl Screen for ConsoleScreen {
    fn name(&self) -> &str {
        self.name
    }
    fn activate(&self) {
        self.visits.set(self.visits.get() + 1);
        log::info!(
            "[screen] {} visible (visit {})",
            self.name,
            self.visits.get()
        );
    }
    fn rebuild(&self) {
        log::info!("[screen] {} rebuilt with fresh data", self.name);
    }
    fn autoreload(&self) -> bool {
        self.autoreload
    }
}

struct ConsolePane {
    hook: RefCell<Option<CloseHook>>,
}

impl ConsolePane {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            hook: RefCell::new(None),
        })
    }

    // stands in for the toolkit delivering a close event
    fn request_close(&self) {
        let hook = self.hook.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl WindowSurface for ConsolePane {
    fn configure(&self, config: &WindowConfig) {
        log::info!(
            "[window] {} configured at {:?} titled '{}'",
            config.name,
            config.geometry,
            config.title
        );
    }
    fn show(&self) {
        log::info!("[window] shown");
    }
    fn activate(&self) {
        log::info!("[window] raised and focused");
    }
    fn close(&self) {
        log::info!("[window] closed");
    }
    fn set_close_hook(&self, hook: Option<CloseHook>) {
        *self.hook.borrow_mut() = hook;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ticks = TickQueue::new();
    let nav = Navigator::new(ticks.clone());
    let windows = WindowManager::new(ticks.clone());

    nav.add_screen(ConsoleScreen::new("login", false))?;
    nav.add_screen(ConsoleScreen::new("dashboard", true))?;
    nav.add_screen(ConsoleScreen::new("settings", false))?;

    // a store for state that belongs to no single screen
    let (attempts, set_attempts, watch_attempts) = create_store(0u32);
    watch_attempts(&listener(|n: &u32| {
        log::info!("[store] login attempts: {n}");
    }));

    nav.set_screen("login")?;
    ticks.tick();

    // the user signs in
    set_attempts(attempts() + 1);
    session().set_item("user", String::from("ada"));
    nav.set_screen("dashboard")?;
    ticks.tick(); // the dashboard autoreloads one tick after showing

    if let Some(user) = session().get_item::<String>("user") {
        log::info!("[session] signed in as {user}");
    }

    // a popup window, opened once; the second call is refused
    let about = WindowSpec::new()
        .name("about")
        .title("About this app")
        .geometry(Rect::new(200.0, 160.0, 420.0, 300.0));
    let pane = ConsolePane::new();
    windows.create_window(&about, pane.clone())?;
    let retry = windows.create_window(&about, ConsolePane::new())?;
    assert_eq!(retry, OpenOutcome::AlreadyOpen);
    windows.set_window("about")?;

    // toast placement over the popup
    let toasts = ToastCounters::default();
    let parent = windows
        .config("about")
        .map(|c| c.geometry)
        .unwrap_or_default();
    for message in ["saved", "synced"] {
        if let Some(slot) = toasts.acquire("about") {
            let at = toast_anchor(
                parent,
                Size {
                    width: 180.0,
                    height: 48.0,
                },
                slot,
            );
            log::info!("[toast] '{message}' at ({}, {})", at.x, at.y);
        }
    }
    toasts.release("about");
    toasts.release("about");

    // the user closes the popup; the entry survives until the next tick
    pane.request_close();
    log::info!("[window] about still tracked: {}", windows.is_open("about"));
    ticks.tick();
    log::info!("[window] about still tracked: {}", windows.is_open("about"));

    nav.set_screen("settings")?;
    nav.go_back(); // lands on the dashboard again
    ticks.run_until_idle();

    log::info!("[nav] finished on '{}'", nav.current().unwrap_or_default());
    Ok(())
}
