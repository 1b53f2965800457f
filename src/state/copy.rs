//! Copy-based [`StateManager`]: every registered cell snapshots its value on
//! every `save_state`, regardless of whether it changes before the matching
//! `restore_state`. Simpler and more predictable than the trail strategy,
//! at O(registered cells) cost per frame instead of O(cells written).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{StateInt, StateIntCell, StateManager};

trait Snapshotable {
    fn push_snapshot(&self);
    fn pop_snapshot(&self);
}

struct Inner {
    registered: RefCell<Vec<Rc<dyn Snapshotable>>>,
    level: Cell<i64>,
    on_restore: RefCell<Vec<Box<dyn Fn()>>>,
}

impl fmt::Debug for Inner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inner").field("level", &self.level.get()).finish()
    }
}

/// Copy-based [`StateManager`].
#[derive(Debug, Clone)]
pub struct Copier(Rc<Inner>);

struct IntCell {
    value: Cell<i32>,
    snapshots: RefCell<Vec<i32>>,
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
        self.value.set(v);
        v
    }
}

impl Snapshotable for IntCell {
    fn push_snapshot(&self) {
        self.snapshots.borrow_mut().push(self.value.get());
    }

    fn pop_snapshot(&self) {
        let v = self
            .snapshots
            .borrow_mut()
            .pop()
            .expect("pop_snapshot called with no saved snapshot");
        self.value.set(v);
    }
}

impl Copier {
    pub fn new() -> Self {
        Self(Rc::new(Inner {
            registered: RefCell::new(Vec::new()),
            level: Cell::new(-1),
            on_restore: RefCell::new(Vec::new()),
        }))
    }
}

impl Default for Copier {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager for Copier {
    fn save_state(&self) {
        for cell in self.0.registered.borrow().iter() {
            cell.push_snapshot();
        }
        self.0.level.set(self.0.level.get() + 1);
    }

    fn restore_state(&self) {
        for cell in self.0.registered.borrow().iter() {
            cell.pop_snapshot();
        }
        self.0.level.set(self.0.level.get() - 1);
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
        self.0.level.get()
    }

    fn on_restore(&self, listener: Box<dyn Fn()>) {
        self.0.on_restore.borrow_mut().push(listener);
    }

    fn make_state_int(&self, initial: i32) -> StateInt {
        let cell = Rc::new(IntCell {
            value: Cell::new(initial),
            snapshots: RefCell::new(Vec::new()),
        });
        self.0.registered.borrow_mut().push(cell.clone());
        cell
    }
}
