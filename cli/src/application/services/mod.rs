//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod availability;
pub mod catalog_set;
pub mod platform;
pub mod registry_aggregator;

pub use availability::{AvailabilityIndex, KnownImage, Refresh, Scope};
pub use catalog_set::{Catalog, CatalogSet};
pub use platform::{HealthReport, InstallReport, Platform, UninstallReport};
pub use registry_aggregator::{list_all_repos, list_registry_repos};
