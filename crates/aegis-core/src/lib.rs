pub mod config;
pub mod logging;

pub mod billing;
pub mod cache;
pub mod retry;
pub mod session;
pub mod transport;
