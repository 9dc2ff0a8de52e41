use kvgrid_store::StructureKind;
use serde_json::{json, Value as JsonValue};

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::Result;
use crate::registry::{Param, Schema, Tool};

const TARGET: Target = Target::Structure(StructureKind::Set);

pub(super) fn tools() -> Vec<Tool> {
    let schema = || Schema::named("set");
    let valued = || schema().required("value", Param::Any, "JSON value");

    vec![
        Tool::new(
            "set_add",
            "Add a value to a set. Reports false if it was already present.",
            TARGET,
            Access::Write,
            valued(),
            add,
        ),
        Tool::new("set_remove", "Remove a value from a set.", TARGET, Access::Write, valued(), remove),
        Tool::new(
            "set_contains",
            "Check whether a set holds a value.",
            TARGET,
            Access::Read,
            valued(),
            contains,
        ),
        Tool::new("set_size", "Number of values in a set.", TARGET, Access::Read, schema(), size),
        Tool::new("set_all", "Every value in a set.", TARGET, Access::Read, schema(), all),
        Tool::new("set_clear", "Remove every value from a set.", TARGET, Access::Write, schema(), clear),
    ]
}

fn add(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let set = ctx.grid.set(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    Ok(json!({ "added": set.add(value) }))
}

fn remove(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let set = ctx.grid.set(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    Ok(json!({ "removed": set.remove(&value) }))
}

fn contains(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let set = ctx.grid.set(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    Ok(json!({ "contains": set.contains(&value) }))
}

fn size(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    Ok(json!({ "size": ctx.grid.set(args.name()?)?.size() }))
}

fn all(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let items = ctx.grid.set(args.name()?)?.all();
    Ok(json!({ "items": ctx.decode_all(&items)? }))
}

fn clear(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    ctx.grid.set(args.name()?)?.clear();
    Ok(json!({ "cleared": true }))
}
