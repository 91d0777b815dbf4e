mod clean;
mod prereqs;
mod stage;

pub use clean::cmd_clean;
pub use prereqs::cmd_prereqs;
pub use stage::cmd_stage;
