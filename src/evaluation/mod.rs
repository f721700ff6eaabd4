//! Feasibility checking for constructed and improved path sets.

mod validator;

pub use validator::{check, validate, Violation, ViolationType};
