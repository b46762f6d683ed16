pub mod config;
pub mod engine;
pub mod media;
pub mod waiver;
