//! Access policy for tool calls.

use std::fmt;

use kvgrid_store::StructureKind;
use tracing::debug;

use crate::config::{AccessConfig, AccessRule, ServerConfig};
use crate::error::{Result, ToolError};

/// What a tool operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Structure(StructureKind),
    VectorCollection,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Structure(kind) => write!(f, "{}", kind),
            Target::VectorCollection => f.write_str("vector collection"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::Read => "read",
            Access::Write => "write",
        })
    }
}

const WILDCARD: &str = "*";

/// Decides whether a tool may touch a named structure.
///
/// For each kind the deny list is checked first, then the allow list. In
/// read-only mode every write is denied regardless of the lists.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    read_only: bool,
    rules: AccessConfig,
}

impl AccessPolicy {
    /// A policy that allows everything.
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            read_only: config.read_only,
            rules: config.access.clone(),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_allowed(&self, target: Target, name: &str, access: Access) -> bool {
        if self.read_only && access == Access::Write {
            return false;
        }
        let rule = self.rules.rule(target);
        if matches(&rule.deny, name) {
            return false;
        }
        rule.allow.is_empty() || matches(&rule.allow, name)
    }

    pub fn check(&self, target: Target, name: &str, access: Access) -> Result<()> {
        if self.is_allowed(target, name, access) {
            return Ok(());
        }
        debug!(%target, name, %access, "access denied");
        Err(ToolError::AccessDenied {
            target,
            name: name.to_string(),
            access,
        })
    }
}

fn matches(patterns: &[String], name: &str) -> bool {
    patterns.iter().any(|p| p == WILDCARD || p == name)
}

impl From<&AccessRule> for AccessPolicy {
    /// The same rule for every kind. Mostly useful in tests.
    fn from(rule: &AccessRule) -> Self {
        Self {
            read_only: false,
            rules: AccessConfig {
                map: rule.clone(),
                queue: rule.clone(),
                list: rule.clone(),
                set: rule.clone(),
                multimap: rule.clone(),
                counter: rule.clone(),
                topic: rule.clone(),
                ringbuffer: rule.clone(),
                vector: rule.clone(),
            },
        }
    }
}
