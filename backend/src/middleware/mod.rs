//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns such
//! as tracing and cross-origin access.

pub mod cors;
pub mod trace;

pub use cors::Cors;
pub use trace::Trace;
