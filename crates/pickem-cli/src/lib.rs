// Library root: exposes config, week and results loading, and command
// orchestration so integration tests can drive the same code paths as the
// binary.

pub mod app;
pub mod config;
pub mod results;
pub mod week;
