//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

use crate::domain::{AvailabilityStatus, DevEnvState};

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Success messages (green)
    pub success: Style,
    /// Warning messages (yellow)
    pub warning: Style,
    /// Error messages (red)
    pub error: Style,
    /// Info messages (blue)
    pub info: Style,
    /// Dimmed/secondary text
    pub dim: Style,
    /// Bold text
    pub bold: Style,
    /// Headers/section titles
    pub header: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.bold = Style::new().bold();
        self.header = Style::new().bold().cyan();
    }

    #[must_use]
    pub fn availability(&self, status: AvailabilityStatus) -> Style {
        match status {
            AvailabilityStatus::LocalAndRegistry | AvailabilityStatus::LocalOnly => self.success,
            AvailabilityStatus::RegistryOnly => self.info,
            AvailabilityStatus::NotAvailable => self.error,
        }
    }

    #[must_use]
    pub fn state(&self, state: DevEnvState) -> Style {
        match state {
            DevEnvState::Installed => self.success,
            DevEnvState::Stale => self.warning,
            DevEnvState::Uninstalled => self.dim,
        }
    }
}
