use kvgrid_store::StructureKind;
use serde_json::{json, Value as JsonValue};

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::Result;
use crate::registry::{Param, Schema, Tool};

const TARGET: Target = Target::Structure(StructureKind::MultiMap);

pub(super) fn tools() -> Vec<Tool> {
    let schema = || Schema::named("multimap");
    let keyed = || schema().required("key", Param::String, "Entry key");

    vec![
        Tool::new(
            "multimap_put",
            "Add a value under a key. A key holds each distinct value once.",
            TARGET,
            Access::Write,
            keyed().required("value", Param::Any, "JSON value to add"),
            put,
        ),
        Tool::new(
            "multimap_get",
            "Every value stored under a key.",
            TARGET,
            Access::Read,
            keyed(),
            get,
        ),
        Tool::new(
            "multimap_remove",
            "Remove one value from under a key.",
            TARGET,
            Access::Write,
            keyed().required("value", Param::Any, "JSON value to remove"),
            remove,
        ),
        Tool::new(
            "multimap_remove_all",
            "Remove a key and every value under it.",
            TARGET,
            Access::Write,
            keyed(),
            remove_all,
        ),
        Tool::new("multimap_keys", "All keys, sorted.", TARGET, Access::Read, schema(), keys),
        Tool::new(
            "multimap_size",
            "Total number of key/value pairs, or the number of values under `key`.",
            TARGET,
            Access::Read,
            schema().optional("key", Param::String, "Count only this key"),
            size,
        ),
    ]
}

fn put(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let multimap = ctx.grid.multimap(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    Ok(json!({ "added": multimap.put(args.str("key")?, value) }))
}

fn get(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let values = ctx.grid.multimap(args.name()?)?.get(args.str("key")?);
    Ok(json!({ "values": ctx.decode_all(&values)? }))
}

fn remove(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let multimap = ctx.grid.multimap(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    Ok(json!({ "removed": multimap.remove_entry(args.str("key")?, &value) }))
}

fn remove_all(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let removed = ctx.grid.multimap(args.name()?)?.remove_all(args.str("key")?);
    Ok(json!({ "removed": ctx.decode_all(&removed)? }))
}

fn keys(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    Ok(json!({ "keys": ctx.grid.multimap(args.name()?)?.keys() }))
}

fn size(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let multimap = ctx.grid.multimap(args.name()?)?;
    let size = match args.opt_str("key")? {
        Some(key) => multimap.value_count(key),
        None => multimap.size(),
    };
    Ok(json!({ "size": size }))
}
