//! CLI command implementations.

mod config;
mod convert;
mod doctor;
mod setup;
mod update;
mod watch;

pub use config::run_config;
pub use convert::run_convert;
pub use doctor::run_doctor;
pub use setup::run_setup;
pub use update::run_update;
pub use watch::run_watch;
