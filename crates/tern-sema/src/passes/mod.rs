//! Unit-level passes.
//!
//! - [`registration`]: declare every global name, then resolve signatures,
//!   struct fields, enum values and global variables
//! - [`analysis`]: order structs and check every function body

pub mod analysis;
pub mod registration;

pub use analysis::{AnalysisOutput, Analyzer};
pub use registration::{Registration, RegistrationPass};
