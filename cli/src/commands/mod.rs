//! Command implementations

pub mod catalog;
pub mod config;
pub mod dev_env;
pub mod info;
pub mod install;
pub mod list;
pub mod registry;
pub mod run;
