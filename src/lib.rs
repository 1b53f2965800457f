//! Plico is a reversible-state, finite-domain constraint programming
//! engine: reversible variables over integer domains, propagators
//! subscribed to the domain events that matter to them, a FIFO fix-point,
//! and depth-first search with branch-and-bound.
//!
//! # Core Concepts
//!
//! - **[`state::StateManager`]**: the reversible-state backbone —
//!   [`state::Trailer`] or [`state::Copier`] — everything else is built on.
//! - **[`var::Var`]**: a handle to a variable or a view over one
//!   (`plus`/`minus`/`mul`/`opposite`), all implementing [`var::IntVarLike`].
//! - **[`constraint::Constraint`]**: a propagator. `post` subscribes to the
//!   domain events it cares about; `propagate` narrows domains when one
//!   fires.
//! - **[`solver::Solver`]**: owns every variable and constraint, runs the
//!   propagation queue to a fix-point.
//! - **[`search::DfSearch`]**: depth-first search over a [`search::Branching`],
//!   optionally driven by a [`search::Objective`] for branch-and-bound.
//!
//! # Example
//!
//! ```
//! use plico::factory;
//! use plico::search::first_fail;
//! use plico::IntVarLike;
//!
//! let solver = factory::make_solver(false);
//! let x = factory::make_int_var(&solver, 1, 2).unwrap();
//! let y = factory::make_int_var(&solver, 1, 1).unwrap();
//! factory::not_equal(&solver, x.clone(), y.clone()).unwrap();
//!
//! // The NotEqual propagator already deduced x != 1 at post time.
//! assert_eq!(x.min(), 2);
//!
//! let search = factory::make_dfs(&solver, first_fail(vec![x, y]));
//! let stats = search.solve(None).unwrap();
//! assert_eq!(stats.solutions(), 1);
//! ```

pub mod config;
pub mod constraint;
pub mod domain;
pub mod error;
pub mod factory;
pub mod search;
pub mod solver;
pub mod state;
pub mod var;

pub use error::{Error, Result};
pub use solver::Solver;
pub use var::{BoolVar, IntVarLike, Var};
