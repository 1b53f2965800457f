//! Integer domains with event-driven propagation.
//!
//! [`SparseSetDomain`] wraps a [`StateSparseSet`] and fires [`DomainListener`]
//! callbacks in the fixed order documented on each method: `empty` before
//! `fix`, `fix` before `change`, `change` before the bound-change callbacks.
//! Getting this order right matters because constraints react differently
//! to "domain narrowed" versus "domain fixed" versus "a bound moved".

use crate::error::{Error, Result};
use crate::state::{StateManager, StateSparseSet};

/// Receives domain-mutation events in the fixed order fired by
/// [`SparseSetDomain`]'s mutators. `empty` is the only callback that can
/// abort propagation: returning `Err` from it (or having it bubble up from
/// `Error::Inconsistency`) is how a wiped-out domain turns into a branch
/// failure.
pub trait DomainListener {
    fn empty(&self) -> Result<()> {
        Ok(())
    }
    fn fix(&self) {}
    fn change(&self) {}
    fn change_min(&self) {}
    fn change_max(&self) {}
}

/// A listener that does nothing; useful for tests that mutate a domain
/// without caring about propagation.
#[derive(Debug, Default)]
pub struct NullListener;
impl DomainListener for NullListener {}

pub trait IntDomain {
    fn min(&self) -> i32;
    fn max(&self) -> i32;
    fn size(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
    fn is_fixed(&self) -> bool {
        self.size() == 1
    }
    fn contains(&self, v: i32) -> bool;
    fn fill_array(&self, dest: &mut [i32]) -> usize;
    fn to_array(&self) -> Vec<i32>;

    fn remove(&mut self, v: i32, l: &dyn DomainListener) -> Result<()>;
    fn remove_all_but(&mut self, v: i32, l: &dyn DomainListener) -> Result<()>;
    fn remove_below(&mut self, v: i32, l: &dyn DomainListener) -> Result<()>;
    fn remove_above(&mut self, v: i32, l: &dyn DomainListener) -> Result<()>;
}

/// [`IntDomain`] backed by a [`StateSparseSet`].
#[derive(Debug)]
pub struct SparseSetDomain {
    set: StateSparseSet,
}

impl SparseSetDomain {
    pub fn new(sm: &dyn StateManager, min: i32, max: i32) -> Self {
        debug_assert!(min <= max);
        Self {
            set: StateSparseSet::new(sm, (max - min + 1) as usize, min),
        }
    }
}

impl IntDomain for SparseSetDomain {
    fn min(&self) -> i32 {
        self.set.min()
    }

    fn max(&self) -> i32 {
        self.set.max()
    }

    fn size(&self) -> usize {
        self.set.size()
    }

    fn contains(&self, v: i32) -> bool {
        self.set.contains(v)
    }

    fn fill_array(&self, dest: &mut [i32]) -> usize {
        self.set.fill_array(dest)
    }

    fn to_array(&self) -> Vec<i32> {
        self.set.to_array()
    }

    fn remove(&mut self, v: i32, l: &dyn DomainListener) -> Result<()> {
        if !self.set.contains(v) {
            return Ok(());
        }
        let max_changes = self.set.max() == v;
        let min_changes = self.set.min() == v;
        self.set.remove(v);
        if self.set.is_empty() {
            l.empty()?;
        }
        l.change();
        if max_changes {
            l.change_max();
        }
        if min_changes {
            l.change_min();
        }
        if self.set.size() == 1 {
            l.fix();
        }
        Ok(())
    }

    fn remove_all_but(&mut self, v: i32, l: &dyn DomainListener) -> Result<()> {
        if !self.set.contains(v) {
            self.set.remove_all();
            l.empty()?;
            return Ok(());
        }
        let size_before = self.set.size();
        let min_before = self.set.min();
        let max_before = self.set.max();
        if size_before == 1 {
            return Ok(());
        }
        self.set.remove_all_but(v);
        l.fix();
        if size_before > 1 {
            l.change();
        }
        if min_before != v {
            l.change_min();
        }
        if max_before != v {
            l.change_max();
        }
        Ok(())
    }

    fn remove_below(&mut self, v: i32, l: &dyn DomainListener) -> Result<()> {
        if self.set.max() < v {
            self.set.remove_all();
            l.empty()?;
            return Ok(());
        }
        if self.set.min() >= v {
            return Ok(());
        }
        self.set.remove_below(v);
        if self.set.is_empty() {
            l.empty()?;
            return Ok(());
        }
        if self.set.size() == 1 {
            l.fix();
        }
        l.change();
        l.change_min();
        Ok(())
    }

    fn remove_above(&mut self, v: i32, l: &dyn DomainListener) -> Result<()> {
        if self.set.min() > v {
            self.set.remove_all();
            l.empty()?;
            return Ok(());
        }
        if self.set.max() <= v {
            return Ok(());
        }
        self.set.remove_above(v);
        if self.set.is_empty() {
            l.empty()?;
            return Ok(());
        }
        if self.set.size() == 1 {
            l.fix();
        }
        l.change();
        l.change_max();
        Ok(())
    }
}

/// Sentinel used by listeners that must signal infeasibility explicitly
/// rather than via a `Result`-returning callback (kept for symmetry with
/// the reference implementation's exception-based `empty()`).
pub fn inconsistent<T>() -> Result<T> {
    Err(Error::Inconsistency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Trailer;

    #[derive(Default)]
    struct Counting {
        empty: std::cell::Cell<u32>,
        fix: std::cell::Cell<u32>,
        change: std::cell::Cell<u32>,
        change_min: std::cell::Cell<u32>,
        change_max: std::cell::Cell<u32>,
    }
    impl DomainListener for Counting {
        fn empty(&self) -> Result<()> {
            self.empty.set(self.empty.get() + 1);
            inconsistent()
        }
        fn fix(&self) {
            self.fix.set(self.fix.get() + 1);
        }
        fn change(&self) {
            self.change.set(self.change.get() + 1);
        }
        fn change_min(&self) {
            self.change_min.set(self.change_min.get() + 1);
        }
        fn change_max(&self) {
            self.change_max.set(self.change_max.get() + 1);
        }
    }

    #[test]
    fn remove_fires_change_and_bound_events() {
        let sm = Trailer::new();
        let mut d = SparseSetDomain::new(&sm, 0, 9);
        let l = Counting::default();
        d.remove(9, &l).unwrap();
        assert_eq!(l.change.get(), 1);
        assert_eq!(l.change_max.get(), 1);
        assert_eq!(l.change_min.get(), 0);
        assert_eq!(l.fix.get(), 0);
    }

    #[test]
    fn remove_to_singleton_fires_fix() {
        let sm = Trailer::new();
        let mut d = SparseSetDomain::new(&sm, 0, 1);
        let l = Counting::default();
        d.remove(0, &l).unwrap();
        assert_eq!(l.fix.get(), 1);
    }

    #[test]
    fn remove_last_value_fires_empty_and_propagates_inconsistency() {
        let sm = Trailer::new();
        let mut d = SparseSetDomain::new(&sm, 5, 5);
        let l = Counting::default();
        let result = d.remove(5, &l);
        assert!(result.is_err());
        assert_eq!(l.empty.get(), 1);
    }

    #[test]
    fn double_remove_is_idempotent() {
        let sm = Trailer::new();
        let mut d = SparseSetDomain::new(&sm, 0, 9);
        let l = Counting::default();
        d.remove(3, &l).unwrap();
        d.remove(3, &l).unwrap();
        assert_eq!(l.change.get(), 1);
        assert!(!d.contains(3));
    }
}
