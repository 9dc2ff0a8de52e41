use kvgrid_store::StructureKind;
use serde_json::{json, Value as JsonValue};

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::Result;
use crate::registry::{Param, Schema, Tool};

const TARGET: Target = Target::Structure(StructureKind::Counter);

pub(super) fn tools() -> Vec<Tool> {
    let schema = || Schema::named("counter");
    vec![
        Tool::new("counter_get", "Current value of a counter.", TARGET, Access::Read, schema(), get),
        Tool::new(
            "counter_set",
            "Set a counter to a value.",
            TARGET,
            Access::Write,
            schema().required("value", Param::Integer, "New value"),
            set,
        ),
        Tool::new(
            "counter_add",
            "Add a delta to a counter and return the new value.",
            TARGET,
            Access::Write,
            schema().required("delta", Param::Integer, "Amount to add, may be negative"),
            add,
        ),
        Tool::new(
            "counter_increment",
            "Add one to a counter and return the new value.",
            TARGET,
            Access::Write,
            schema(),
            increment,
        ),
        Tool::new(
            "counter_decrement",
            "Subtract one from a counter and return the new value.",
            TARGET,
            Access::Write,
            schema(),
            decrement,
        ),
        Tool::new(
            "counter_compare_and_set",
            "Set a counter to `update` only if it currently equals `expected`.",
            TARGET,
            Access::Write,
            schema()
                .required("expected", Param::Integer, "Value the counter must hold")
                .required("update", Param::Integer, "Value to store"),
            compare_and_set,
        ),
    ]
}

fn get(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    Ok(json!({ "value": ctx.grid.counter(args.name()?)?.get() }))
}

fn set(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let counter = ctx.grid.counter(args.name()?)?;
    let value = args.i64("value")?;
    counter.set(value);
    Ok(json!({ "value": value }))
}

fn add(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let counter = ctx.grid.counter(args.name()?)?;
    Ok(json!({ "value": counter.add_and_get(args.i64("delta")?) }))
}

fn increment(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    Ok(json!({ "value": ctx.grid.counter(args.name()?)?.increment_and_get() }))
}

fn decrement(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    Ok(json!({ "value": ctx.grid.counter(args.name()?)?.decrement_and_get() }))
}

fn compare_and_set(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let counter = ctx.grid.counter(args.name()?)?;
    let updated = counter.compare_and_set(args.i64("expected")?, args.i64("update")?);
    Ok(json!({ "updated": updated, "value": counter.get() }))
}
