//! Unit tests for the dem CLI
//!
//! These tests use fake ports and run fast without a container engine or
//! network access. The infra tests talk to local mock servers only.

mod architecture;
mod infra_store;
mod install_service;
mod property_tests;
mod uninstall_service;
