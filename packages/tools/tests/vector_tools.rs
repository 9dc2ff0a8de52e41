//! Vector tools with and without the vector module.

mod common;

use common::Harness;
use kvgrid_capability::UNAVAILABLE_MESSAGE;
use kvgrid_tools::AccessPolicy;
use serde_json::json;

#[test]
fn put_get_search_delete() {
    let h = Harness::new();
    h.ok(
        "vector_put",
        json!({"name": "docs", "key": "a", "value": {"title": "A"}, "vector": [1.0, 0.0]}),
    );
    h.ok(
        "vector_put",
        json!({"name": "docs", "key": "b", "value": {"title": "B"}, "vector": [0.0, 1.0]}),
    );

    assert_eq!(
        h.ok("vector_get", json!({"name": "docs", "key": "a"})),
        json!({"found": true, "value": {"title": "A"}})
    );

    let found = h.ok(
        "vector_search",
        json!({"name": "docs", "vector": [1.0, 0.0], "top_k": 1, "include_vectors": true}),
    );
    assert_eq!(
        found,
        json!({"results": [{"key": "a", "score": 1.0, "value": {"title": "A"}, "vector": [1.0, 0.0]}]})
    );

    assert_eq!(
        h.ok("vector_delete", json!({"name": "docs", "key": "a"})),
        json!({"deleted": true})
    );
    assert_eq!(
        h.ok("vector_get", json!({"name": "docs", "key": "a"})),
        json!({"found": false, "value": null})
    );
}

#[test]
fn search_can_leave_out_values() {
    let h = Harness::new();
    h.ok(
        "vector_put",
        json!({"name": "docs", "key": "a", "value": 1, "vector": [1.0, 2.0]}),
    );
    let found = h.ok(
        "vector_search",
        json!({"name": "docs", "vector": [1.0, 2.0], "include_value": false}),
    );
    let hit = &found["results"][0];
    assert_eq!(hit["key"], "a");
    assert!(hit.get("value").is_none());
    assert!(hit.get("vector").is_none());
}

#[test]
fn module_errors_are_reported_with_the_operation() {
    let h = Harness::new();
    h.ok(
        "vector_put",
        json!({"name": "docs", "key": "a", "value": 1, "vector": [1.0, 2.0]}),
    );
    let err = h.err("vector_search", json!({"name": "docs", "vector": [1.0]}));
    assert!(err.starts_with("vector search failed: dimension mismatch"), "{}", err);
}

#[test]
fn every_vector_tool_reports_unavailable_without_the_module() {
    let h = Harness::build(AccessPolicy::permissive(), false);

    let calls = [
        ("vector_search", json!({"name": "docs", "vector": [1.0, 2.0, 3.0], "top_k": 5})),
        ("vector_put", json!({"name": "docs", "key": "a", "value": 1, "vector": [1.0]})),
        ("vector_get", json!({"name": "docs", "key": "a"})),
        ("vector_delete", json!({"name": "docs", "key": "a"})),
    ];
    for (tool, args) in calls {
        assert_eq!(h.err(tool, args), UNAVAILABLE_MESSAGE, "{}", tool);
    }

    // the rest of the server keeps working
    h.ok("map_put", json!({"name": "m", "key": "k", "value": 1}));
}

#[test]
fn vector_arguments_are_validated() {
    let h = Harness::new();
    assert!(h
        .err("vector_search", json!({"name": "docs", "vector": "nope"}))
        .contains("array of numbers"));
    assert!(h
        .err("vector_search", json!({"name": "docs", "vector": [1.0], "top_k": 0}))
        .contains("'top_k' must be at least 1"));
}

#[test]
fn large_magnitude_vectors_keep_finite_scores() {
    let h = Harness::new();
    h.ok(
        "vector_put",
        json!({"name": "docs", "key": "same", "value": 1, "vector": [1e20, 1e20]}),
    );
    h.ok(
        "vector_put",
        json!({"name": "docs", "key": "orth", "value": 2, "vector": [1e20, -1e20]}),
    );

    let found = h.ok("vector_search", json!({"name": "docs", "vector": [1e20, 1e20]}));
    let results = found["results"].as_array().unwrap();
    assert_eq!(results[0]["key"], "same");
    assert_eq!(results[0]["score"], 1.0);
    assert_eq!(results[1]["key"], "orth");
    assert!(results[1]["score"].as_f64().unwrap().abs() < 1e-6);
}
