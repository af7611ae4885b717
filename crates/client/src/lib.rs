//! Client side of the complexity analysis backend.
//!
//! Provides the HTTP adapter for the backend endpoints, the
//! [`AnalysisBackend`](backend::AnalysisBackend) seam used by the web
//! layer, and the single-slot analysis session that owns the currently
//! displayed result.

pub mod api;
pub mod backend;
pub mod session;
