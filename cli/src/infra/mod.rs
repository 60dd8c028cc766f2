//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! container engine CLI, registry and catalog HTTP clients, and the on-disk
//! collection and configuration stores.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod catalog;
pub mod command_runner;
pub mod config;
pub mod docker;
pub mod http;
pub mod registry;
pub mod store;
