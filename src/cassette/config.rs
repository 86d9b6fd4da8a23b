//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a cassette path panic if
/// called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the contacts port cassette file.
    pub contacts: Option<PathBuf>,
    /// Path to the response plans port cassette file.
    pub plans: Option<PathBuf>,
    /// Path to the identity port cassette file.
    pub identity: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the contacts port.
    pub contacts: Option<CassetteReplayer>,
    /// Replayer for the response plans port.
    pub plans: Option<CassetteReplayer>,
    /// Replayer for the identity port.
    pub identity: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where all port paths are `None`.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Picks up `<port>.cassette.yaml` files from a recording session
    /// directory. Missing files leave the port unconfigured.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let find = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.is_file().then_some(path)
        };
        Self { contacts: find("contacts"), plans: find("plans"), identity: find("identity") }
    }

    /// Ports that have no cassette path.
    #[must_use]
    pub fn missing_ports(&self) -> Vec<&'static str> {
        [("contacts", &self.contacts), ("plans", &self.plans), ("identity", &self.identity)]
            .into_iter()
            .filter_map(|(port, path)| path.is_none().then_some(port))
            .collect()
    }

    /// Reads and parses one cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read_cassette(path: &Path) -> Result<Cassette, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Load a single cassette file and create a replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        Self::read_cassette(path).map(|cassette| CassetteReplayer::new(&cassette))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            contacts: self.contacts.as_deref().map(Self::load_port_cassette).transpose()?,
            plans: self.plans.as_deref().map(Self::load_port_cassette).transpose()?,
            identity: self.identity.as_deref().map(Self::load_port_cassette).transpose()?,
        })
    }
}
