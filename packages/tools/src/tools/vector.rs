//! Vector collection tools, backed by the vector capability.

use kvgrid_bridge::{json_to_value, value_to_json};
use kvgrid_capability::{Outcome, SearchHit, SearchRequest};
use serde_json::{json, Map, Value as JsonValue};

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::{Result, ToolError};
use crate::registry::{Param, Schema, Tool};

const TARGET: Target = Target::VectorCollection;

const DEFAULT_TOP_K: usize = 10;

pub(super) fn tools() -> Vec<Tool> {
    let schema = || Schema::named("vector collection");
    let keyed = || schema().required("key", Param::String, "Document key");

    vec![
        Tool::new(
            "vector_search",
            "Find the documents whose vectors are most similar to a query vector.",
            TARGET,
            Access::Read,
            schema()
                .required("vector", Param::Vector, "Query vector")
                .optional("top_k", Param::Integer, "Number of results, default 10")
                .optional("include_value", Param::Boolean, "Return document values, default true")
                .optional("include_vectors", Param::Boolean, "Return document vectors, default false"),
            search,
        ),
        Tool::new(
            "vector_put",
            "Store a document value with its vector.",
            TARGET,
            Access::Write,
            keyed()
                .required("value", Param::Any, "JSON document value")
                .required("vector", Param::Vector, "Document vector"),
            put,
        ),
        Tool::new(
            "vector_get",
            "Read a document value by key.",
            TARGET,
            Access::Read,
            keyed(),
            get,
        ),
        Tool::new(
            "vector_delete",
            "Delete a document by key.",
            TARGET,
            Access::Write,
            keyed(),
            delete,
        ),
    ]
}

fn done<T>(outcome: Outcome<T>) -> Result<T> {
    match outcome {
        Outcome::Done(value) => Ok(value),
        Outcome::Unavailable(unavailable) => Err(ToolError::Unavailable(unavailable.message)),
    }
}

fn search(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let top_k = args.opt_usize("top_k")?.unwrap_or(DEFAULT_TOP_K);
    if top_k == 0 {
        return Err(ToolError::invalid("'top_k' must be at least 1"));
    }
    let request = SearchRequest::new(args.name()?, args.vector("vector")?, top_k)
        .include_value(args.opt_bool("include_value")?.unwrap_or(true))
        .include_vectors(args.opt_bool("include_vectors")?.unwrap_or(false));

    let hits = done(ctx.vectors.search(&request)?)?;
    let results = hits.iter().map(hit_json).collect::<Result<Vec<_>>>()?;
    Ok(json!({ "results": results }))
}

/// Fields the module could not provide are left out.
fn hit_json(hit: &SearchHit) -> Result<JsonValue> {
    let mut fields = Map::new();
    if let Some(key) = &hit.key {
        fields.insert("key".to_string(), value_to_json(key)?);
    }
    if let Some(score) = hit.score {
        fields.insert("score".to_string(), json!(widen(score)));
    }
    if let Some(value) = &hit.value {
        fields.insert("value".to_string(), value_to_json(value)?);
    }
    if let Some(vector) = &hit.vector {
        let widened: Vec<f64> = vector.iter().copied().map(widen).collect();
        fields.insert("vector".to_string(), json!(widened));
    }
    Ok(JsonValue::Object(fields))
}

/// Widen through the shortest decimal text so 0.1f32 reads as 0.1.
fn widen(f: f32) -> f64 {
    f.to_string().parse().unwrap_or(f as f64)
}

fn put(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let value = json_to_value(args.value("value")?.clone());
    let vector = args.vector("vector")?;
    done(ctx.vectors.put(args.name()?, args.str("key")?, &value, &vector)?)?;
    Ok(json!({ "stored": true }))
}

fn get(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let found = done(ctx.vectors.get(args.name()?, args.str("key")?)?)?;
    let value = match &found {
        Some(value) => value_to_json(value)?,
        None => JsonValue::Null,
    };
    Ok(json!({ "found": found.is_some(), "value": value }))
}

fn delete(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    done(ctx.vectors.delete(args.name()?, args.str("key")?)?)?;
    Ok(json!({ "deleted": true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_keeps_short_decimals() {
        assert_eq!(widen(0.1), 0.1);
        assert_eq!(widen(-2.5), -2.5);
    }

    #[test]
    fn missing_hit_fields_are_omitted() {
        let hit = SearchHit {
            key: Some(kvgrid_value::Value::from("a")),
            score: None,
            value: None,
            vector: None,
        };
        assert_eq!(hit_json(&hit).unwrap(), json!({"key": "a"}));
    }
}
