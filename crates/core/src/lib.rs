//! Domain types and decision rules for the complexity report front end.
//!
//! Everything here is synchronous and free of I/O: the backend payload
//! model, default substitution into view models, the notation comparator,
//! recurrence synthesis and submission validation.

pub mod compare;
pub mod equation;
pub mod error;
pub mod health;
pub mod model;
pub mod submission;
pub mod view;
