pub mod actions;
pub mod answers;
pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod cv;
pub mod dispatch;
pub mod env;
pub mod jobs;
pub mod output;
pub mod rehearse;
pub mod runtime;
