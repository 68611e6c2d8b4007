pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod locators;
pub mod run;
pub mod runtime;

pub use app::run;
