//! Tool definitions, one module per structure kind.
//!
//! | Module | Tools |
//! |--------|-------|
//! | `map` | 10 |
//! | `queue` | 5 |
//! | `list` | 7 |
//! | `set` | 6 |
//! | `multimap` | 6 |
//! | `counter` | 6 |
//! | `topic` | 1 |
//! | `ringbuffer` | 4 |
//! | `vector` | 4 |

mod counter;
mod list;
mod map;
mod multimap;
mod queue;
mod ringbuffer;
mod set;
mod topic;
mod vector;

use crate::registry::{Tool, ToolRegistry};

/// Every tool this crate provides.
pub fn all_tools() -> Vec<Tool> {
    [
        map::tools(),
        queue::tools(),
        list::tools(),
        set::tools(),
        multimap::tools(),
        counter::tools(),
        topic::tools(),
        ringbuffer::tools(),
        vector::tools(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// A registry holding every tool.
pub fn register_all_tools() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in all_tools() {
        registry.register(tool);
    }
    registry
}
