//! Subcommand implementations

pub mod precompute;
pub mod route;
pub mod serve;
