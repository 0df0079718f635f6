pub mod config;
pub mod digest;
pub mod fetch;
pub mod parse;
pub mod persist;
