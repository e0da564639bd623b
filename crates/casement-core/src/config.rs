//! Typed ambient configuration.
//!
//! A host installs its config value once at startup and any layer reads it
//! back by type:
//!
//! ```rust
//! use casement_core::*;
//!
//! #[derive(Clone)]
//! struct AppConfig {
//!     app_name: String,
//! }
//!
//! install_config(AppConfig { app_name: "demo".into() });
//! assert_eq!(config::<AppConfig>().unwrap().app_name, "demo");
//! ```
//!
//! `with_config` overrides a value for the duration of a closure, innermost
//! override winning, which keeps tests and previews hermetic.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    // frame 0 is the install_config base and is never popped
    static CONFIG_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> =
        RefCell::new(vec![HashMap::new()]);
}

/// Installs `config` as the base value for its type.
pub fn install_config<C: 'static>(config: C) {
    CONFIG_STACK.with(|st| {
        st.borrow_mut()[0].insert(TypeId::of::<C>(), Box::new(config));
    });
}

/// Overrides the config of type `C` while `f` runs, restoring the outer
/// value afterwards (also on unwind).
pub fn with_config<C: 'static, R>(config: C, f: impl FnOnce() -> R) -> R {
    with_config_frame(|| {
        set_config_boxed(TypeId::of::<C>(), Box::new(config));
        f()
    })
}

/// Reads the innermost config of type `C`, or `None` when none is installed.
pub fn config<C: Clone + 'static>() -> Option<C> {
    CONFIG_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<C>())
                && let Some(c) = v.downcast_ref::<C>()
            {
                return Some(c.clone());
            }
        }
        None
    })
}

fn with_config_frame<R>(f: impl FnOnce() -> R) -> R {
    // frame guard, pops on unwind too
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            CONFIG_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    CONFIG_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_config_boxed(t: TypeId, v: Box<dyn Any>) {
    CONFIG_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        }
    });
}
