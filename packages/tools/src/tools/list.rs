use kvgrid_store::StructureKind;
use serde_json::{json, Value as JsonValue};

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::Result;
use crate::registry::{Param, Schema, Tool};

const TARGET: Target = Target::Structure(StructureKind::List);

pub(super) fn tools() -> Vec<Tool> {
    let schema = || Schema::named("list");
    let indexed = || schema().required("index", Param::Integer, "Zero-based position");

    vec![
        Tool::new(
            "list_add",
            "Append a value to a list, or insert it at `index`.",
            TARGET,
            Access::Write,
            schema()
                .required("value", Param::Any, "JSON value to add")
                .optional("index", Param::Integer, "Insert position; appends when omitted"),
            add,
        ),
        Tool::new("list_get", "Read the item at an index.", TARGET, Access::Read, indexed(), get),
        Tool::new(
            "list_set",
            "Replace the item at an index, returning the old item.",
            TARGET,
            Access::Write,
            indexed().required("value", Param::Any, "Replacement JSON value"),
            set,
        ),
        Tool::new(
            "list_remove",
            "Remove the item at an index, returning it.",
            TARGET,
            Access::Write,
            indexed(),
            remove,
        ),
        Tool::new("list_size", "Number of items in a list.", TARGET, Access::Read, schema(), size),
        Tool::new("list_all", "Every item of a list, in order.", TARGET, Access::Read, schema(), all),
        Tool::new("list_clear", "Remove every item from a list.", TARGET, Access::Write, schema(), clear),
    ]
}

fn add(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let list = ctx.grid.list(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    match args.opt_usize("index")? {
        Some(index) => list.add_at(index, value)?,
        None => list.add(value),
    }
    Ok(json!({ "size": list.size() }))
}

fn get(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let item = ctx.grid.list(args.name()?)?.get(args.usize("index")?)?;
    Ok(json!({ "value": ctx.decode(&item)? }))
}

fn set(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let list = ctx.grid.list(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    let previous = list.set(args.usize("index")?, value)?;
    Ok(json!({ "previous": ctx.decode(&previous)? }))
}

fn remove(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let removed = ctx.grid.list(args.name()?)?.remove_at(args.usize("index")?)?;
    Ok(json!({ "removed": ctx.decode(&removed)? }))
}

fn size(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    Ok(json!({ "size": ctx.grid.list(args.name()?)?.size() }))
}

fn all(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let items = ctx.grid.list(args.name()?)?.all();
    Ok(json!({ "items": ctx.decode_all(&items)? }))
}

fn clear(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    ctx.grid.list(args.name()?)?.clear();
    Ok(json!({ "cleared": true }))
}
