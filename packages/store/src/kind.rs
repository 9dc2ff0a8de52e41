use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kinds of structure a grid can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Map,
    Queue,
    List,
    Set,
    MultiMap,
    Counter,
    Topic,
    RingBuffer,
}

impl StructureKind {
    pub const ALL: [StructureKind; 8] = [
        StructureKind::Map,
        StructureKind::Queue,
        StructureKind::List,
        StructureKind::Set,
        StructureKind::MultiMap,
        StructureKind::Counter,
        StructureKind::Topic,
        StructureKind::RingBuffer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StructureKind::Map => "map",
            StructureKind::Queue => "queue",
            StructureKind::List => "list",
            StructureKind::Set => "set",
            StructureKind::MultiMap => "multimap",
            StructureKind::Counter => "counter",
            StructureKind::Topic => "topic",
            StructureKind::RingBuffer => "ringbuffer",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StructureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StructureKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown structure kind '{}'", s))
    }
}
