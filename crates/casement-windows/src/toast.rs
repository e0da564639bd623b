//! Per-parent toast budgeting and placement.
//!
//! Rendering toasts is the host's business; this module only answers two
//! questions: may another toast open over this parent, and where does slot
//! `n` go. Counters live in an explicit registry and the entry is evicted
//! the moment a parent's count returns to zero.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use casement_core::{Rect, Size, Vec2};

/// Horizontal inset from the parent's right edge.
pub const TOAST_MARGIN_X: f32 = 20.0;
/// Distance from the parent's top edge to the first slot.
pub const TOAST_TOP_OFFSET: f32 = 40.0;
/// Vertical distance between slots.
pub const TOAST_STRIDE_Y: f32 = 80.0;
/// Active toasts allowed per parent before `acquire` refuses.
pub const DEFAULT_TOAST_LIMIT: usize = 7;

#[derive(Clone)]
pub struct ToastCounters {
    counts: Rc<RefCell<HashMap<String, usize>>>,
    limit: usize,
}

impl Default for ToastCounters {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_LIMIT)
    }
}

impl ToastCounters {
    pub fn new(limit: usize) -> Self {
        Self {
            counts: Rc::new(RefCell::new(HashMap::new())),
            limit,
        }
    }

    /// Claims the next slot over `parent`, or `None` when the parent is at
    /// its limit. A refused acquire does not count.
    pub fn acquire(&self, parent: &str) -> Option<usize> {
        let mut counts = self.counts.borrow_mut();
        let active = counts.get(parent).copied().unwrap_or(0);
        if active >= self.limit {
            log::debug!("toast limit reached over '{parent}'");
            return None;
        }
        counts.insert(parent.to_string(), active + 1);
        Some(active)
    }

    /// Releases one slot. No-op for an unknown parent.
    pub fn release(&self, parent: &str) {
        let mut counts = self.counts.borrow_mut();
        let Some(active) = counts.get_mut(parent) else {
            return;
        };
        *active -= 1;
        if *active == 0 {
            counts.remove(parent);
        }
    }

    pub fn active(&self, parent: &str) -> usize {
        self.counts.borrow().get(parent).copied().unwrap_or(0)
    }

    /// Drops the counter no matter its value, for hosts tearing the parent
    /// window down with toasts still up.
    pub fn forget(&self, parent: &str) {
        self.counts.borrow_mut().remove(parent);
    }

    pub fn tracked_parents(&self) -> usize {
        self.counts.borrow().len()
    }
}

/// Top-left corner for the toast in `slot` over `parent`: right-aligned
/// with a fixed margin, stacking downwards from below the title area.
pub fn toast_anchor(parent: Rect, toast: Size, slot: usize) -> Vec2 {
    Vec2 {
        x: parent.x + parent.w - toast.width - TOAST_MARGIN_X,
        y: parent.y + TOAST_TOP_OFFSET + slot as f32 * TOAST_STRIDE_Y,
    }
}
