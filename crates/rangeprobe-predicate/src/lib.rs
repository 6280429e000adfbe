//! Textual range predicates compiled into oracles.
//!
//! Accepts comparisons, chained comparisons, `BETWEEN`, `AND`, `OR` and
//! parentheses over integer attributes, closes every clause against its
//! attribute's domain, and evaluates the result by walking the tree.

pub mod bound;
pub mod compile;
pub mod eval;
pub mod expr;
pub mod parse;

pub use compile::{compile, compile_predicate, CompileError, CompiledPredicate};
pub use eval::{eval_predicate, EvalError};
pub use expr::{CmpOp, Predicate};
pub use parse::{parse_predicate, ParseError};
