use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tl_remote::RemoteConfig;
use tl_server::ServerConfig;
use tl_sync::SyncConfig;

/// Everything the `tl` binary can be configured with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub server: ServerConfig,
}

impl CliConfig {
    /// Read `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Command-line flags win over the file.
    pub fn override_remote(&mut self, base_url: Option<String>, ledger: Option<String>) {
        if let Some(base_url) = base_url {
            self.remote.base_url = base_url;
        }
        if let Some(ledger) = ledger {
            self.remote.ledger = ledger;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tl_sync::DispatchPolicy;

    #[test]
    fn missing_path_gives_defaults() {
        let c = CliConfig::load(None).unwrap();
        assert_eq!(c.remote.ledger, "todomvc");
        assert_eq!(c.sync.policy, DispatchPolicy::Reconcile);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[remote]\nledger = \"groceries\"\n\n[sync]\npolicy = \"exclusive\"\n\n[server]\nbind_addr = \"0.0.0.0:9000\""
        )
        .unwrap();

        let c = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(c.remote.ledger, "groceries");
        assert_eq!(c.remote.base_url, "http://localhost:58090/fluree");
        assert_eq!(c.sync.policy, DispatchPolicy::Exclusive);
        assert!(c.sync.bootstrap_on_load);
        assert_eq!(c.server.bind_addr.port(), 9000);
    }

    #[test]
    fn unreadable_or_invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CliConfig::load(Some(&dir.path().join("nope.toml"))).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[remote\nledger =").unwrap();
        assert!(CliConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn flags_override_file() {
        let mut c = CliConfig::default();
        c.override_remote(Some("http://ledger:8090/fluree".into()), None);
        assert_eq!(c.remote.base_url, "http://ledger:8090/fluree");
        assert_eq!(c.remote.ledger, "todomvc");
    }
}
