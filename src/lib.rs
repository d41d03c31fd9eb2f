//! stampnav library exports for testing

use clap::ValueEnum;

pub mod catalogue;
pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Which catalogue backend to browse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// JSON fixture file, or the built-in sample catalogue.
    #[default]
    Fixture,
    /// Remote catalogue API.
    Http,
}

impl ProviderKind {
    /// Name used in the config file and `STAMPNAV_PROVIDER`.
    pub fn config_name(self) -> &'static str {
        match self {
            ProviderKind::Fixture => "fixture",
            ProviderKind::Http => "http",
        }
    }
}
