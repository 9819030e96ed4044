//! Pipeline entry points for watcher operations.
//!
//! - `run_check`: Fetch, decide, notify and persist for one scheduled run
//! - `run_parse`: Fetch and extract only
//! - `run_validate`: Load and validate the config file
//! - `run_status`: Show the stored marker and last runtime report

pub mod check;
pub mod decide;
pub mod parse;
pub mod report;
pub mod status;
pub mod validate;

pub use check::{CheckOutcome, run_check};
pub use decide::decide;
pub use parse::run_parse;
pub use report::write_report;
pub use status::run_status;
pub use validate::run_validate;
