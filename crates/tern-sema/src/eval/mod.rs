//! Literal evaluation and constant folding arithmetic.

pub mod constant;
pub mod literal;

pub use literal::eval_literal;
