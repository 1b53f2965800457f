//! Reversible sparse set over a contiguous integer range.
//!
//! Classic trick: `values`/`indices` are plain, non-reversible arrays. Only
//! `size`, `min`, and `max` are backed by [`StateInt`] cells. `remove`
//! swaps the removed value to the tail of the live region and shrinks
//! `size`; because later operations only ever touch positions `< size`,
//! restoring `size` to an earlier value automatically restores the set's
//! logical contents without needing to undo the swaps themselves.

use super::{StateInt, StateManager};

#[derive(Debug)]
pub struct StateSparseSet {
    /// `values[i]` is the value stored at dense position `i`.
    values: Vec<i32>,
    /// `indices[v - offset]` is the dense position of value `v`.
    indices: Vec<usize>,
    offset: i32,
    n: usize,
    size: StateInt,
    min: StateInt,
    max: StateInt,
}

impl StateSparseSet {
    /// Creates a set over `{offset, offset + 1, ..., offset + n - 1}`, fully
    /// populated.
    pub fn new(sm: &dyn StateManager, n: usize, offset: i32) -> Self {
        let values: Vec<i32> = (0..n as i32).map(|i| i + offset).collect();
        let indices: Vec<usize> = (0..n).collect();
        Self {
            values,
            indices,
            offset,
            n,
            size: sm.make_state_int(n as i32),
            min: sm.make_state_int(0),
            max: sm.make_state_int(n as i32 - 1),
        }
    }

    fn pos_of(&self, val: i32) -> usize {
        (val - self.offset) as usize
    }

    fn exchange_positions(&mut self, val1: i32, val2: i32) {
        let i1 = self.pos_of(val1);
        let i2 = self.pos_of(val2);
        self.values.swap(i1, i2);
        self.indices[self.pos_of(val1)] = i2;
        self.indices[self.pos_of(val2)] = i1;
    }

    fn check_val(&self, val: i32) -> bool {
        val >= self.offset && val < self.offset + self.n as i32
    }

    pub fn to_array(&self) -> Vec<i32> {
        self.values[..self.size()].to_vec()
    }

    pub fn fill_array(&self, dest: &mut [i32]) -> usize {
        let size = self.size();
        dest[..size].copy_from_slice(&self.values[..size]);
        size
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn size(&self) -> usize {
        self.size.value() as usize
    }

    pub fn min(&self) -> i32 {
        self.min.value()
    }

    pub fn max(&self) -> i32 {
        self.max.value()
    }

    fn internal_contains(&self, val: i32) -> bool {
        if !self.check_val(val) {
            return false;
        }
        self.indices[self.pos_of(val)] < self.size()
    }

    pub fn contains(&self, val: i32) -> bool {
        if !self.check_val(val) {
            return false;
        }
        self.internal_contains(val)
    }

    fn update_max_val_removed(&mut self, val: i32) {
        if self.max() == val {
            let mut v = val - 1;
            while v >= self.min() && !self.internal_contains(v) {
                v -= 1;
            }
            self.max.set_value(v);
        }
    }

    fn update_min_val_removed(&mut self, val: i32) {
        if self.min() == val {
            let mut v = val + 1;
            while v <= self.max() && !self.internal_contains(v) {
                v += 1;
            }
            self.min.set_value(v);
        }
    }

    /// Removes `val`. Returns `true` iff it was present.
    pub fn remove(&mut self, val: i32) -> bool {
        if !self.check_val(val) || !self.internal_contains(val) {
            return false;
        }
        if self.min() == val && self.max() == val {
            self.size.set_value(0);
            return true;
        }
        self.update_min_val_removed(val);
        self.update_max_val_removed(val);
        let size = self.size();
        let last = self.values[size - 1];
        self.exchange_positions(val, last);
        self.size.decrement();
        true
    }

    /// Restricts the set to `{v}`. Requires `v` present.
    pub fn remove_all_but(&mut self, v: i32) {
        debug_assert!(self.internal_contains(v));
        let first = self.values[0];
        self.exchange_positions(v, first);
        self.size.set_value(1);
        self.min.set_value(v);
        self.max.set_value(v);
    }

    pub fn remove_all(&mut self) {
        self.size.set_value(0);
    }

    pub fn remove_below(&mut self, value: i32) {
        if self.max() < value {
            self.remove_all();
        } else {
            let mut v = self.min();
            while v < value {
                self.remove(v);
                v += 1;
            }
        }
    }

    pub fn remove_above(&mut self, value: i32) {
        if self.min() > value {
            self.remove_all();
        } else {
            let mut v = self.max();
            while v > value {
                self.remove(v);
                v -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Trailer;
    use pretty_assertions::assert_eq;

    #[test]
    fn remove_shrinks_and_tracks_bounds() {
        let sm = Trailer::new();
        let mut s = StateSparseSet::new(&sm, 10, 0);
        assert_eq!(s.size(), 10);
        assert!(s.remove(5));
        assert!(!s.contains(5));
        assert_eq!(s.size(), 9);
        assert!(!s.remove(5));
    }

    #[test]
    fn removing_min_or_max_updates_bound() {
        let sm = Trailer::new();
        let mut s = StateSparseSet::new(&sm, 5, 0);
        s.remove(0);
        assert_eq!(s.min(), 1);
        s.remove(4);
        assert_eq!(s.max(), 3);
    }

    #[test]
    fn remove_all_but_leaves_singleton() {
        let sm = Trailer::new();
        let mut s = StateSparseSet::new(&sm, 5, 0);
        s.remove_all_but(2);
        assert_eq!(s.size(), 1);
        assert_eq!(s.min(), 2);
        assert_eq!(s.max(), 2);
        assert!(s.contains(2));
        assert!(!s.contains(0));
    }

    #[test]
    fn remove_below_and_above() {
        let sm = Trailer::new();
        let mut s = StateSparseSet::new(&sm, 10, 0);
        s.remove_below(3);
        assert_eq!(s.min(), 3);
        s.remove_above(7);
        assert_eq!(s.max(), 7);
        assert_eq!(s.size(), 5);
    }

    #[test]
    fn save_restore_round_trips() {
        let sm = Trailer::new();
        let mut s = StateSparseSet::new(&sm, 10, 0);
        sm.save_state();
        s.remove(3);
        s.remove(4);
        assert_eq!(s.size(), 8);
        sm.restore_state();
        assert_eq!(s.size(), 10);
        assert!(s.contains(3));
        assert!(s.contains(4));
    }

    #[test]
    fn offset_universe() {
        let sm = Trailer::new();
        let mut s = StateSparseSet::new(&sm, 5, -2);
        assert_eq!(s.min(), -2);
        assert_eq!(s.max(), 2);
        assert!(s.contains(-2));
        assert!(!s.contains(3));
        s.remove(-2);
        assert_eq!(s.min(), -1);
    }
}
