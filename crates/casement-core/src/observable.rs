use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use smallvec::SmallVec;

/// A change listener. Identity is the `Rc` allocation: subscribing the same
/// handle twice keeps one entry, and `unsubscribe` removes exactly that entry.
pub type Listener<T> = Rc<dyn Fn(&T)>;

/// Wraps a closure into a [`Listener`] handle that can later be unsubscribed.
pub fn listener<T>(f: impl Fn(&T) + 'static) -> Listener<T> {
    Rc::new(f)
}

/// A cloneable handle to an observable value.
///
/// Writes are equality-gated: `set` with a value equal to the current one
/// does nothing. A real change notifies listeners in subscription order,
/// each isolated from the others' failures. Writes made from inside a
/// listener are queued and delivered as a fresh pass once the current pass
/// finishes, so every listener of a pass sees the same value.
pub struct Observable<T: 'static> {
    inner: Rc<RefCell<Inner<T>>>,
}

struct Inner<T> {
    value: T,
    listeners: SmallVec<[Listener<T>; 2]>,
    notifying: bool,
    queued: VecDeque<T>,
}

// A derived Clone would demand T: Clone of the handle itself.
impl<T: 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                listeners: SmallVec::new(),
                notifying: false,
                queued: VecDeque::new(),
            })),
        }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.borrow().value.clone()
    }

    /// Registers `l` unless the same handle is already registered.
    pub fn subscribe(&self, l: &Listener<T>) {
        let mut inner = self.inner.borrow_mut();
        if inner.listeners.iter().any(|e| Rc::ptr_eq(e, l)) {
            return;
        }
        inner.listeners.push(Rc::clone(l));
    }

    /// Removes `l` by handle identity. No-op when it was never subscribed.
    pub fn unsubscribe(&self, l: &Listener<T>) {
        let mut inner = self.inner.borrow_mut();
        if let Some(i) = inner.listeners.iter().position(|e| Rc::ptr_eq(e, l)) {
            inner.listeners.remove(i);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Stores `value` and notifies listeners, unless it equals the current
    /// value. Never panics on a listener failure; the failure is logged and
    /// the remaining listeners still run.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value.clone();
            inner.queued.push_back(value);
            // a reentrant write lands on the queue of the pass in progress
            if inner.notifying {
                return;
            }
            inner.notifying = true;
        }
        self.drain();
    }

    /// Mutates a copy in place and stores it through [`set`](Self::set),
    /// so an update that ends on the same value stays silent.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.inner.borrow().value.clone();
        f(&mut next);
        self.set(next);
    }

    fn drain(&self) {
        loop {
            // snapshot per pass: listeners added or removed mid-pass take
            // effect from the next pass
            let (value, snapshot) = {
                let mut inner = self.inner.borrow_mut();
                match inner.queued.pop_front() {
                    Some(v) => (v, inner.listeners.clone()),
                    None => {
                        inner.notifying = false;
                        return;
                    }
                }
            };
            for l in &snapshot {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| l(&value))) {
                    let message = if let Some(s) = payload.downcast_ref::<String>() {
                        s.clone()
                    } else if let Some(s) = payload.downcast_ref::<&str>() {
                        s.to_string()
                    } else {
                        "Unknown panic".to_string()
                    };
                    log::error!("observable listener panicked: {message}");
                }
            }
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Observable")
                .field("value", &inner.value)
                .field("listeners", &inner.listeners.len())
                .finish(),
            Err(_) => f.write_str("Observable { .. }"),
        }
    }
}

pub fn observable<T>(value: T) -> Observable<T> {
    Observable::new(value)
}
