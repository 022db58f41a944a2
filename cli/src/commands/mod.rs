pub mod check;
pub mod run;

pub use check::check_entries;
pub use run::{RunArgs, run_automount};
