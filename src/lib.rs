// MiniDB Console - terminal client for the MiniDB relational data service
// Library exports

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod session;
