pub use crate::config::{config, install_config, with_config};
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::observable::{Listener, Observable, listener, observable};
pub use crate::session::{SessionStore, session};
pub use crate::store::create_store;
pub use crate::tick::TickQueue;
