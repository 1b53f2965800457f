//! Trail-based [`StateManager`]: lazily logs a cell's old value at most once
//! per save frame. "An optimized version of `Copier`" per the reference
//! implementation it's ported from — cells that never change between two
//! `save_state` calls cost nothing to restore.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{StateInt, StateIntCell, StateManager};

trait TrailEntry {
    fn restore(&self);
}

struct IntEntry {
    cell: Rc<Cell<i32>>,
    old: i32,
}

impl TrailEntry for IntEntry {
    fn restore(&self) {
        self.cell.set(self.old);
    }
}

struct Inner {
    /// Entries written since the last `save_state`.
    current: RefCell<Vec<Box<dyn TrailEntry>>>,
    /// One entry-log per open frame, oldest first.
    prior: RefCell<Vec<Vec<Box<dyn TrailEntry>>>>,
    /// Bumped on every save and every restore; a cell only needs to push an
    /// undo entry the first time it sees a new magic value.
    magic: Cell<u64>,
    on_restore: RefCell<Vec<Box<dyn Fn()>>>,
}

impl fmt::Debug for Inner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inner")
            .field("level", &(self.prior.borrow().len() as i64 - 1))
            .field("magic", &self.magic.get())
            .finish()
    }
}

/// Trail-based [`StateManager`]. This is the default strategy for deep
/// search trees: `save_state`/`restore_state` cost is proportional to the
/// number of cells actually *written* in the frame, not the number of cells
/// that exist.
#[derive(Debug, Clone)]
pub struct Trailer(Rc<Inner>);

struct IntCell {
    inner: Rc<Inner>,
    value: Rc<Cell<i32>>,
    last_magic: Cell<u64>,
}

impl fmt::Debug for IntCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.get())
    }
}

impl StateIntCell for IntCell {
    fn value(&self) -> i32 {
        self.value.get()
    }

    fn set_value(&self, v: i32) -> i32 {
        if v != self.value.get() {
            let magic = self.inner.magic.get();
            if self.last_magic.get() != magic {
                self.last_magic.set(magic);
                self.inner.current.borrow_mut().push(Box::new(IntEntry {
                    cell: self.value.clone(),
                    old: self.value.get(),
                }));
            }
            self.value.set(v);
        }
        v
    }
}

impl Trailer {
    pub fn new() -> Self {
        Self(Rc::new(Inner {
            current: RefCell::new(Vec::new()),
            prior: RefCell::new(Vec::new()),
            magic: Cell::new(0),
            on_restore: RefCell::new(Vec::new()),
        }))
    }
}

impl Default for Trailer {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager for Trailer {
    fn save_state(&self) {
        let mut prior = self.0.prior.borrow_mut();
        let fresh = Vec::new();
        let finished = std::mem::replace(&mut *self.0.current.borrow_mut(), fresh);
        prior.push(finished);
        self.0.magic.set(self.0.magic.get() + 1);
    }

    fn restore_state(&self) {
        {
            let entries = self.0.current.borrow();
            // LIFO: later writes in the frame must restore first so the
            // earliest-recorded (pre-frame) value wins.
            for entry in entries.iter().rev() {
                entry.restore();
            }
        }
        let prior_frame = self
            .0
            .prior
            .borrow_mut()
            .pop()
            .expect("restore_state called with no saved frame");
        *self.0.current.borrow_mut() = prior_frame;
        self.0.magic.set(self.0.magic.get() + 1);
        for listener in self.0.on_restore.borrow().iter() {
            listener();
        }
    }

    fn restore_state_until(&self, level: i64) {
        while self.get_level() > level {
            self.restore_state();
        }
    }

    fn get_level(&self) -> i64 {
        self.0.prior.borrow().len() as i64 - 1
    }

    fn on_restore(&self, listener: Box<dyn Fn()>) {
        self.0.on_restore.borrow_mut().push(listener);
    }

    fn make_state_int(&self, initial: i32) -> StateInt {
        Rc::new(IntCell {
            inner: self.0.clone(),
            value: Rc::new(Cell::new(initial)),
            last_magic: Cell::new(self.0.magic.get().wrapping_sub(1)),
        })
    }
}
