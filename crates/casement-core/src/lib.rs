//! # Cells, stores, and deferred ticks
//!
//! Casement's core is a small set of single-threaded primitives the higher
//! crates build on:
//!
//! - `Observable<T>` — equality-gated observable value.
//! - `create_store` — a `(get, set, subscribe)` triple over one cell.
//! - `session()` — process-wide key-value scratch space.
//! - `install_config` / `config` — typed ambient configuration.
//! - `TickQueue` — run work on the host's next loop turn.
//!
//! ## Observables
//!
//! `Observable<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use casement_core::*;
//!
//! let title = observable(String::from("Home"));
//! let seen = listener(|t: &String| log::debug!("title changed to {t}"));
//! title.subscribe(&seen);
//! title.set("Settings".into()); // notifies
//! title.set("Settings".into()); // equal value, listeners stay quiet
//! ```
//!
//! Listeners run in subscription order and each one is isolated: a listener
//! that panics is logged and the rest of the pass still runs. Writes made
//! from inside a listener are queued and delivered in a fresh pass once the
//! current one finishes, so every listener of a pass sees the same value.
//!
//! ## Stores
//!
//! `create_store` packages one cell as three closures, handy for hosts that
//! pass capabilities around instead of the cell itself:
//!
//! ```rust
//! use casement_core::*;
//!
//! let (logged_in, set_logged_in, _watch) = create_store(false);
//! set_logged_in(true);
//! assert!(logged_in());
//! ```
//!
//! ## Ticks
//!
//! Anything that must wait for the current event to finish delivering goes
//! through a [`TickQueue`]:
//!
//! ```rust
//! use casement_core::*;
//!
//! let ticks = TickQueue::new();
//! ticks.defer(|| log::debug!("runs on the next turn"));
//! assert_eq!(ticks.tick(), 1);
//! ```

pub mod config;
pub mod geometry;
pub mod observable;
pub mod prelude;
pub mod session;
pub mod store;
pub mod tick;

pub use config::*;
pub use geometry::*;
pub use observable::*;
pub use prelude::*;
pub use session::*;
pub use store::*;
pub use tick::*;
