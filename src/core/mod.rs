//! Certificate generation engine: dates, field scanning, column checks,
//! substitution and the per-row driver

pub mod dates;
pub mod generator;
pub mod scanner;
pub mod substitution;
pub mod validator;

pub use generator::Generator;
