// Library root: re-exports the service modules so integration tests and the
// binary share one API.

pub mod config;
pub mod handler;
pub mod server;
