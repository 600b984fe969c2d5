//! Raw syntax definitions
//!
//! Syntax as parsed from the source text, with spans and variable names.

pub mod assignment;
pub use assignment::{AssignmentSite, locate};

pub mod expr;
pub use expr::{ExprR, ExprRInner, expr};
