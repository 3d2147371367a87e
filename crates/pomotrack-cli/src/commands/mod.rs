pub mod config;
pub mod project;
pub mod task;
pub mod timer;
