use crate::observable::{Listener, Observable};

/// Builds an isolated store and returns its `(get, set, subscribe)` triple.
///
/// Each call creates a fresh cell; two stores never share state unless the
/// caller hands the same triple around. The setter is equality-gated like
/// [`Observable::set`].
///
/// ```rust
/// use casement_core::*;
///
/// let (count, set_count, watch_count) = create_store(0);
/// watch_count(&listener(|v: &i32| log::debug!("count is now {v}")));
/// set_count(1);
/// assert_eq!(count(), 1);
/// ```
pub fn create_store<T: Clone + PartialEq + 'static>(
    initial: T,
) -> (
    impl Fn() -> T + Clone,
    impl Fn(T) + Clone,
    impl Fn(&Listener<T>) + Clone,
) {
    let cell = Observable::new(initial);
    let get = {
        let cell = cell.clone();
        move || cell.get()
    };
    let set = {
        let cell = cell.clone();
        move |value| cell.set(value)
    };
    let subscribe = move |l: &Listener<T>| cell.subscribe(l);
    (get, set, subscribe)
}
