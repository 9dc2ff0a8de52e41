//! Server configuration, loaded from YAML.
//!
//! ```yaml
//! instance_name: orders-dev
//! read_only: false
//! ring_buffer_capacity: 5000
//! access:
//!   map:
//!     allow: ["*"]
//!     deny: ["secrets"]
//!   queue:
//!     allow: ["jobs"]
//! vector:
//!   enabled: true
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use kvgrid_store::DEFAULT_RING_BUFFER_CAPACITY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::Target;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config{}: {source}", origin(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

fn origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" file {}", path.display()),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Name reported to clients and used for the grid.
    pub instance_name: String,
    /// Deny every write operation.
    pub read_only: bool,
    pub access: AccessConfig,
    pub ring_buffer_capacity: usize,
    pub vector: VectorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            instance_name: "kvgrid".to_string(),
            read_only: false,
            access: AccessConfig::default(),
            ring_buffer_capacity: DEFAULT_RING_BUFFER_CAPACITY,
            vector: VectorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServerConfig =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: Some(path.to_path_buf()),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or use defaults when there is none.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = serde_yaml::from_str(text)
            .map_err(|source| ConfigError::Parse { path: None, source })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ring_buffer_capacity == 0 {
            return Err(ConfigError::Invalid(
                "ring_buffer_capacity must be at least 1".to_string(),
            ));
        }
        if self.instance_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "instance_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Allow and deny lists for one kind of structure.
///
/// `*` matches every name. An empty allow list allows everything not denied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessRule {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    pub map: AccessRule,
    pub queue: AccessRule,
    pub list: AccessRule,
    pub set: AccessRule,
    pub multimap: AccessRule,
    pub counter: AccessRule,
    pub topic: AccessRule,
    pub ringbuffer: AccessRule,
    pub vector: AccessRule,
}

impl AccessConfig {
    pub fn rule(&self, target: Target) -> &AccessRule {
        use kvgrid_store::StructureKind::*;
        match target {
            Target::Structure(Map) => &self.map,
            Target::Structure(Queue) => &self.queue,
            Target::Structure(List) => &self.list,
            Target::Structure(Set) => &self.set,
            Target::Structure(MultiMap) => &self.multimap,
            Target::Structure(Counter) => &self.counter,
            Target::Structure(Topic) => &self.topic,
            Target::Structure(RingBuffer) => &self.ringbuffer,
            Target::VectorCollection => &self.vector,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VectorConfig {
    /// When false the vector module is never probed.
    pub enabled: bool,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ServerConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.ring_buffer_capacity, 10_000);
        assert!(config.vector.enabled);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = ServerConfig::from_yaml(
            "read_only: true\naccess:\n  map:\n    deny: [secrets]\nvector:\n  enabled: false\n",
        )
        .unwrap();
        assert!(config.read_only);
        assert_eq!(config.access.map.deny, vec!["secrets"]);
        assert!(config.access.map.allow.is_empty());
        assert!(!config.vector.enabled);
        assert_eq!(config.instance_name, "kvgrid");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ServerConfig::from_yaml("read_onyl: true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let err = ServerConfig::from_yaml("ring_buffer_capacity: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "instance_name: staging").unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.instance_name, "staging");
    }

    #[test]
    fn errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        let err = ServerConfig::load(&missing).unwrap_err();
        assert!(err.to_string().contains("absent.yaml"));

        let bad = dir.path().join("bad.yaml");
        fs::write(&bad, "access: [not, a, map]").unwrap();
        let err = ServerConfig::load(&bad).unwrap_err();
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(
            ServerConfig::load_or_default(None).unwrap(),
            ServerConfig::default()
        );
    }
}
