use kvgrid_store::StructureKind;
use serde_json::{json, Value as JsonValue};

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::Result;
use crate::registry::{Param, Schema, Tool};

const TARGET: Target = Target::Structure(StructureKind::Map);

pub(super) fn tools() -> Vec<Tool> {
    let schema = || Schema::named("map");
    let keyed = || schema().required("key", Param::String, "Entry key");
    let valued = || keyed().required("value", Param::Any, "JSON value to store");

    vec![
        Tool::new(
            "map_put",
            "Store a value under a key in a map. Returns the value it replaced.",
            TARGET,
            Access::Write,
            valued(),
            put,
        ),
        Tool::new(
            "map_put_if_absent",
            "Store a value only if the key is not already present.",
            TARGET,
            Access::Write,
            valued(),
            put_if_absent,
        ),
        Tool::new("map_get", "Read the value stored under a key.", TARGET, Access::Read, keyed(), get),
        Tool::new(
            "map_remove",
            "Remove a key from a map, returning its value.",
            TARGET,
            Access::Write,
            keyed(),
            remove,
        ),
        Tool::new(
            "map_contains_key",
            "Check whether a key is present.",
            TARGET,
            Access::Read,
            keyed(),
            contains_key,
        ),
        Tool::new("map_size", "Number of entries in a map.", TARGET, Access::Read, schema(), size),
        Tool::new("map_keys", "All keys of a map, sorted.", TARGET, Access::Read, schema(), keys),
        Tool::new("map_values", "All values of a map, in key order.", TARGET, Access::Read, schema(), values),
        Tool::new(
            "map_entries",
            "All key/value pairs of a map, in key order.",
            TARGET,
            Access::Read,
            schema(),
            entries,
        ),
        Tool::new("map_clear", "Remove every entry from a map.", TARGET, Access::Write, schema(), clear),
    ]
}

fn put(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let map = ctx.grid.map(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    let previous = map.put(args.str("key")?, value);
    Ok(json!({ "previous": ctx.decode_opt(previous)? }))
}

fn put_if_absent(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let map = ctx.grid.map(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    let existing = map.put_if_absent(args.str("key")?, value);
    Ok(json!({
        "stored": existing.is_none(),
        "existing": ctx.decode_opt(existing)?,
    }))
}

fn get(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let map = ctx.grid.map(args.name()?)?;
    let value = map.get(args.str("key")?);
    Ok(json!({
        "found": value.is_some(),
        "value": ctx.decode_opt(value)?,
    }))
}

fn remove(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let map = ctx.grid.map(args.name()?)?;
    let removed = map.remove(args.str("key")?);
    Ok(json!({ "removed": ctx.decode_opt(removed)? }))
}

fn contains_key(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let map = ctx.grid.map(args.name()?)?;
    Ok(json!({ "contains": map.contains_key(args.str("key")?) }))
}

fn size(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    Ok(json!({ "size": ctx.grid.map(args.name()?)?.size() }))
}

fn keys(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    Ok(json!({ "keys": ctx.grid.map(args.name()?)?.keys() }))
}

fn values(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let values = ctx.grid.map(args.name()?)?.values();
    Ok(json!({ "values": ctx.decode_all(&values)? }))
}

fn entries(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let entries = ctx
        .grid
        .map(args.name()?)?
        .entries()
        .into_iter()
        .map(|(key, value)| -> Result<JsonValue> {
            Ok(json!({ "key": key, "value": ctx.decode(&value)? }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(json!({ "entries": entries }))
}

fn clear(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    ctx.grid.map(args.name()?)?.clear();
    Ok(json!({ "cleared": true }))
}
