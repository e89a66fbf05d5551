pub mod config;
pub mod options;
pub mod pattern;
pub mod session;
