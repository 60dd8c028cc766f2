//! Wire types shared by every `dem` component that reads or writes a
//! DevEnv document: the local `dev_env.json` and remote catalog documents.

pub mod types;
pub mod version;

pub use types::*;
pub use version::{CURRENT_VERSION, DocumentVersion, SUPPORTED_MAJOR, VersionParseError};
