//! The repository contains a compiler from a single HDL boolean assignment to a Grover search circuit.
//! Given an assignment such as `out <= a and (b xor c);`, the compiler:
//! - extracts the right-hand side and its sorted free variables
//! - evaluates the expression over every assignment to build a diagonal phase oracle
//! - chooses the optimal number of Grover iterations for the solution count
//! - assembles the circuit, and runs it on an ideal state-vector engine.
//!
//! ## Running
//!
//! A file containing the assignment can be run using:
//!
//! ```bash
//! cargo run -- <FILENAME>
//! ```
//!
//! or passed in through stdin. For all options see:
//! ```bash
//! cargo run -- --help
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` or `--verbose`.

pub mod circuit;
pub mod engine;
pub mod eval;
pub mod extract;
pub mod iterations;
pub mod lexer;
pub mod oracle;
pub mod pipeline;
pub mod raw_syntax;
pub mod report;
pub mod text;
pub mod typed_syntax;
pub mod unitary;
pub mod variables;
