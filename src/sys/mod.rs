pub mod animation;
pub mod runtime;
pub mod server;
