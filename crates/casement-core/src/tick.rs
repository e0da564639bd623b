//! Deferred work for single-threaded hosts.
//!
//! Some transitions must not run while the current event is still being
//! delivered: a window removing itself from inside its own close handler,
//! or a screen rebuilding right after being shown. `TickQueue` holds that
//! work until the host pumps [`tick`](TickQueue::tick) on its next loop
//! turn, after the current call stack has unwound.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Task = Box<dyn FnOnce()>;

#[derive(Clone, Default)]
pub struct TickQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` on a later tick, never during the current call stack.
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Runs the tasks queued before this call, in FIFO order. Tasks deferred
    /// while one runs go to the next tick. Returns how many ran.
    pub fn tick(&self) -> usize {
        let batch = std::mem::take(&mut *self.tasks.borrow_mut());
        let count = batch.len();
        for task in batch {
            task();
        }
        count
    }

    /// Ticks until no work remains and returns the total task count. Hosts
    /// with a real event loop pump [`tick`](Self::tick) once per turn
    /// instead.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.tick();
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }
}
