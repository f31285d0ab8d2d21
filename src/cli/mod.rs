mod entry;
mod root;

pub use entry::{DialogEntry, Outcome, Status};
pub use root::Cli;
