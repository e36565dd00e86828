pub mod macros;

pub mod app;
pub mod config;
pub mod events;
pub mod store;
pub mod sys;
pub mod wheel;
