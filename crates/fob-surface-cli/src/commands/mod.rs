//! Command implementations for `fob-surface`.
//!
//! - [`run`] - Analyze a package and write its surface report

pub mod run;

pub use run::execute as run_execute;
