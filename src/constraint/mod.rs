//! The constraint trait and the shared active/scheduled bookkeeping every
//! concrete constraint embeds.

pub mod all_different_binary;
pub mod element2d;
pub mod equal;
pub mod is_equal;
pub mod is_less_or_equal;
pub mod less_or_equal;
pub mod not_equal;
pub mod sum;

use std::cell::Cell;
use std::fmt;

use crate::error::Result;
use crate::solver::{ConstraintId, Solver};
use crate::state::ReversibleBool;

/// A propagator. `post` runs once, at the moment the constraint joins the
/// solver, to perform initial filtering and to subscribe to the variables
/// it cares about (`var.propagate_on_fix(id)` and friends). `propagate`
/// runs every time the solver's fix-point loop dequeues this constraint.
pub trait Constraint: fmt::Debug {
    fn post(&self, solver: &Solver, id: ConstraintId) -> Result<()>;
    fn propagate(&self, solver: &Solver) -> Result<()>;

    /// Reversible: an inactive constraint survives backtracking as
    /// reactivated, matching the search tree it was deactivated under.
    fn is_active(&self) -> bool;
    fn set_active(&self, active: bool);

    /// Not reversible: whether the constraint currently sits in the
    /// propagation queue. Cleared unconditionally once dequeued.
    fn is_scheduled(&self) -> bool;
    fn set_scheduled(&self, scheduled: bool);
}

/// Active/scheduled bookkeeping shared by every concrete constraint.
/// Embed as a field and forward the four `Constraint` flag methods to it.
#[derive(Debug)]
pub struct ConstraintState {
    active: ReversibleBool,
    scheduled: Cell<bool>,
}

impl ConstraintState {
    pub fn new(solver: &Solver) -> Self {
        Self {
            active: ReversibleBool::new(solver.state_manager().as_ref(), true),
            scheduled: Cell::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }
    pub fn is_scheduled(&self) -> bool {
        self.scheduled.get()
    }
    pub fn set_scheduled(&self, scheduled: bool) {
        self.scheduled.set(scheduled);
    }
}

/// Forwards the four bookkeeping methods of [`Constraint`] to a `state:
/// ConstraintState` field. Every concrete constraint in this module calls
/// this macro instead of hand-writing the same four methods.
macro_rules! impl_constraint_state {
    () => {
        fn is_active(&self) -> bool {
            self.state.is_active()
        }
        fn set_active(&self, active: bool) {
            self.state.set_active(active);
        }
        fn is_scheduled(&self) -> bool {
            self.state.is_scheduled()
        }
        fn set_scheduled(&self, scheduled: bool) {
            self.state.set_scheduled(scheduled);
        }
    };
}
pub(crate) use impl_constraint_state;
