//! Access policy applied to tool calls.

mod common;

use common::Harness;
use kvgrid_tools::{AccessPolicy, ServerConfig};
use serde_json::json;

fn harness(yaml: &str) -> Harness {
    let config = ServerConfig::from_yaml(yaml).unwrap();
    Harness::build(AccessPolicy::from_config(&config), true)
}

#[test]
fn read_only_blocks_writes_but_not_reads() {
    let h = harness("read_only: true");

    assert_eq!(
        h.err("map_put", json!({"name": "m", "key": "k", "value": 1})),
        "access denied: write access to map 'm' is not permitted"
    );
    assert_eq!(
        h.err("queue_poll", json!({"name": "q"})),
        "access denied: write access to queue 'q' is not permitted"
    );
    assert_eq!(
        h.err("vector_put", json!({"name": "d", "key": "k", "value": 1, "vector": [1.0]})),
        "access denied: write access to vector collection 'd' is not permitted"
    );

    h.ok("map_get", json!({"name": "m", "key": "k"}));
    h.ok("counter_get", json!({"name": "c"}));
}

#[test]
fn deny_list_hides_named_structures() {
    let h = harness("access:\n  map:\n    deny: [secrets]\n");

    assert!(h
        .err("map_get", json!({"name": "secrets", "key": "k"}))
        .starts_with("access denied: read access to map 'secrets'"));
    h.ok("map_get", json!({"name": "public", "key": "k"}));
    // deny lists are per kind
    h.ok("queue_size", json!({"name": "secrets"}));
}

#[test]
fn allow_list_limits_a_kind_to_named_structures() {
    let h = harness("access:\n  counter:\n    allow: [hits]\n");

    h.ok("counter_increment", json!({"name": "hits"}));
    assert!(h.err("counter_increment", json!({"name": "misses"})).contains("denied"));
}

#[test]
fn denied_calls_do_not_create_structures() {
    let h = harness("access:\n  list:\n    deny: ['*']\n");
    h.err("list_add", json!({"name": "l", "value": 1}));
    assert_eq!(h.context.grid.kind_of("l"), None);
}
