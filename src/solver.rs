//! The solver: owns every variable and constraint by index (breaking the
//! variable/constraint reference cycle the reference implementation has —
//! there, a variable's subscriber stack holds constraint objects and a
//! constraint holds variable objects directly), runs the FIFO fix-point,
//! and exposes `post`/`schedule` to the rest of the crate.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::constraint::Constraint;
use crate::domain::{inconsistent, DomainListener, IntDomain, SparseSetDomain};
use crate::error::{Error, Result};
use crate::state::{Copier, ReversibleVec, StateManager, Trailer};

pub type VarId = usize;
pub type ConstraintId = usize;

struct VarData {
    domain: RefCell<SparseSetDomain>,
    on_domain_change: ReversibleVec<ConstraintId>,
    on_fix: ReversibleVec<ConstraintId>,
    on_bound_change: ReversibleVec<ConstraintId>,
}

enum Subscription {
    Domain,
    Fix,
    Bound,
}

struct SolverData {
    state: Rc<dyn StateManager>,
    vars: RefCell<Vec<VarData>>,
    constraints: RefCell<Vec<Rc<dyn Constraint>>>,
    queue: RefCell<VecDeque<ConstraintId>>,
    fix_point_listeners: RefCell<Vec<Box<dyn Fn() -> Result<()>>>>,
}

impl fmt::Debug for SolverData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverData")
            .field("vars", &self.vars.borrow().len())
            .field("constraints", &self.constraints.borrow().len())
            .finish()
    }
}

/// A constraint-programming solver. Cheap to clone: it is a handle
/// (`Rc`-backed) to the shared variable/constraint arena and propagation
/// queue, so variables, views, and constraints can all hold their own
/// clone without creating reference cycles.
#[derive(Clone, Debug)]
pub struct Solver(Rc<SolverData>);

struct VarEventListener {
    solver: Solver,
    id: VarId,
}

impl DomainListener for VarEventListener {
    fn empty(&self) -> Result<()> {
        inconsistent()
    }
    fn fix(&self) {
        self.solver.schedule_subscribers(self.id, Subscription::Fix);
    }
    fn change(&self) {
        self.solver.schedule_subscribers(self.id, Subscription::Domain);
    }
    fn change_min(&self) {
        self.solver.schedule_subscribers(self.id, Subscription::Bound);
    }
    fn change_max(&self) {
        self.solver.schedule_subscribers(self.id, Subscription::Bound);
    }
}

impl Solver {
    /// Creates a solver. `by_copy` selects the [`Copier`] strategy;
    /// otherwise the [`Trailer`] strategy is used.
    pub fn new(by_copy: bool) -> Self {
        let state: Rc<dyn StateManager> = if by_copy {
            Rc::new(Copier::new())
        } else {
            Rc::new(Trailer::new())
        };
        Self(Rc::new(SolverData {
            state,
            vars: RefCell::new(Vec::new()),
            constraints: RefCell::new(Vec::new()),
            queue: RefCell::new(VecDeque::new()),
            fix_point_listeners: RefCell::new(Vec::new()),
        }))
    }

    pub fn state_manager(&self) -> &Rc<dyn StateManager> {
        &self.0.state
    }

    pub(crate) fn new_var(&self, min: i32, max: i32) -> Result<VarId> {
        if min == i32::MIN {
            return Err(Error::Misuse("domain min must be > i32::MIN".into()));
        }
        if max == i32::MAX {
            return Err(Error::Misuse("domain max must be < i32::MAX".into()));
        }
        if min > max {
            return Err(Error::Misuse(format!("empty domain: min {min} > max {max}")));
        }
        let domain = SparseSetDomain::new(self.0.state.as_ref(), min, max);
        let data = VarData {
            domain: RefCell::new(domain),
            on_domain_change: ReversibleVec::new(self.0.state.as_ref()),
            on_fix: ReversibleVec::new(self.0.state.as_ref()),
            on_bound_change: ReversibleVec::new(self.0.state.as_ref()),
        };
        let mut vars = self.0.vars.borrow_mut();
        vars.push(data);
        Ok(vars.len() - 1)
    }

    pub(crate) fn domain_min(&self, id: VarId) -> i32 {
        self.0.vars.borrow()[id].domain.borrow().min()
    }
    pub(crate) fn domain_max(&self, id: VarId) -> i32 {
        self.0.vars.borrow()[id].domain.borrow().max()
    }
    pub(crate) fn domain_size(&self, id: VarId) -> usize {
        self.0.vars.borrow()[id].domain.borrow().size()
    }
    pub(crate) fn domain_contains(&self, id: VarId, v: i32) -> bool {
        self.0.vars.borrow()[id].domain.borrow().contains(v)
    }
    pub(crate) fn domain_fill_array(&self, id: VarId, dest: &mut [i32]) -> usize {
        self.0.vars.borrow()[id].domain.borrow().fill_array(dest)
    }
    pub(crate) fn domain_to_array(&self, id: VarId) -> Vec<i32> {
        self.0.vars.borrow()[id].domain.borrow().to_array()
    }

    pub(crate) fn domain_remove(&self, id: VarId, v: i32) -> Result<()> {
        let listener = VarEventListener { solver: self.clone(), id };
        let vars = self.0.vars.borrow();
        vars[id].domain.borrow_mut().remove(v, &listener)
    }
    pub(crate) fn domain_remove_all_but(&self, id: VarId, v: i32) -> Result<()> {
        let listener = VarEventListener { solver: self.clone(), id };
        let vars = self.0.vars.borrow();
        vars[id].domain.borrow_mut().remove_all_but(v, &listener)
    }
    pub(crate) fn domain_remove_below(&self, id: VarId, v: i32) -> Result<()> {
        let listener = VarEventListener { solver: self.clone(), id };
        let vars = self.0.vars.borrow();
        vars[id].domain.borrow_mut().remove_below(v, &listener)
    }
    pub(crate) fn domain_remove_above(&self, id: VarId, v: i32) -> Result<()> {
        let listener = VarEventListener { solver: self.clone(), id };
        let vars = self.0.vars.borrow();
        vars[id].domain.borrow_mut().remove_above(v, &listener)
    }

    pub(crate) fn subscribe(&self, id: VarId, which: Subscription, c: ConstraintId) {
        let vars = self.0.vars.borrow();
        match which {
            Subscription::Domain => vars[id].on_domain_change.push(c),
            Subscription::Fix => vars[id].on_fix.push(c),
            Subscription::Bound => vars[id].on_bound_change.push(c),
        }
    }

    pub(crate) fn propagate_on_fix(&self, id: VarId, c: ConstraintId) {
        self.subscribe(id, Subscription::Fix, c);
    }
    pub(crate) fn propagate_on_domain_change(&self, id: VarId, c: ConstraintId) {
        self.subscribe(id, Subscription::Domain, c);
    }
    pub(crate) fn propagate_on_bound_change(&self, id: VarId, c: ConstraintId) {
        self.subscribe(id, Subscription::Bound, c);
    }

    fn schedule_subscribers(&self, id: VarId, which: Subscription) {
        let snapshot = {
            let vars = self.0.vars.borrow();
            match which {
                Subscription::Domain => vars[id].on_domain_change.snapshot(),
                Subscription::Fix => vars[id].on_fix.snapshot(),
                Subscription::Bound => vars[id].on_bound_change.snapshot(),
            }
        };
        for c in snapshot {
            self.schedule(c);
        }
    }

    /// Schedules `c` for propagation iff it is active and not already
    /// queued — a constraint is never duplicated in the propagation queue.
    pub fn schedule(&self, c: ConstraintId) {
        let constraint = self.0.constraints.borrow()[c].clone();
        if constraint.is_active() && !constraint.is_scheduled() {
            constraint.set_scheduled(true);
            self.0.queue.borrow_mut().push_back(c);
            trace!(constraint = c, "scheduled");
        }
    }

    /// Registers a listener invoked at the start of every `fix_point` call.
    /// Used by [`crate::search::Minimize`] to enforce its primal bound.
    pub fn on_fix_point(&self, listener: Box<dyn Fn() -> Result<()>>) {
        self.0.fix_point_listeners.borrow_mut().push(listener);
    }

    /// Posts a constraint: calls its `post`, optionally running `fix_point`
    /// immediately afterwards.
    pub fn post(&self, constraint: Rc<dyn Constraint>, enforce_fix_point: bool) -> Result<ConstraintId> {
        let id = {
            let mut cs = self.0.constraints.borrow_mut();
            cs.push(constraint.clone());
            cs.len() - 1
        };
        debug!(constraint = id, ?constraint, "posting constraint");
        constraint.post(self, id)?;
        if enforce_fix_point {
            self.fix_point()?;
        }
        Ok(id)
    }

    /// Forces a boolean variable true, then runs the fix-point.
    pub fn post_true(&self, b: &crate::var::BoolVar) -> Result<()> {
        b.fix(true)?;
        self.fix_point()
    }

    /// Drains the propagation queue to a fix-point. On `Inconsistency`, the
    /// queue is cleared (clearing every drained constraint's scheduled
    /// flag) before the error is re-raised, so a subsequent `post` starts
    /// from a clean queue.
    pub fn fix_point(&self) -> Result<()> {
        let listeners_result = (|| {
            let listeners = self.0.fix_point_listeners.borrow();
            for listener in listeners.iter() {
                listener()?;
            }
            Ok(())
        })();
        if let Err(e) = listeners_result {
            self.drain_queue();
            return Err(e);
        }

        loop {
            let next = self.0.queue.borrow_mut().pop_front();
            let Some(c) = next else { break };
            let constraint = self.0.constraints.borrow()[c].clone();
            constraint.set_scheduled(false);
            if constraint.is_active() {
                trace!(constraint = c, "propagating");
                if let Err(e) = constraint.propagate(self) {
                    self.drain_queue();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn drain_queue(&self) {
        let mut queue = self.0.queue.borrow_mut();
        while let Some(c) = queue.pop_front() {
            self.0.constraints.borrow()[c].set_scheduled(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::IntVarLike;

    #[test]
    fn new_var_rejects_boundary_values() {
        let s = Solver::new(false);
        assert!(s.new_var(i32::MIN, 5).is_err());
        assert!(s.new_var(0, i32::MAX).is_err());
        assert!(s.new_var(5, 0).is_err());
    }

    #[test]
    fn schedule_does_not_duplicate() {
        let s = Solver::new(false);
        let x = crate::var::make_int_var(&s, 0, 9).unwrap();
        assert_eq!(x.size(), 10);
    }
}
