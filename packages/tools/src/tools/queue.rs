use kvgrid_store::StructureKind;
use serde_json::{json, Value as JsonValue};

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::Result;
use crate::registry::{Param, Schema, Tool};

const TARGET: Target = Target::Structure(StructureKind::Queue);

pub(super) fn tools() -> Vec<Tool> {
    let schema = || Schema::named("queue");
    vec![
        Tool::new(
            "queue_offer",
            "Append a value to the tail of a queue.",
            TARGET,
            Access::Write,
            schema().required("value", Param::Any, "JSON value to append"),
            offer,
        ),
        Tool::new(
            "queue_poll",
            "Remove and return the head of a queue.",
            TARGET,
            Access::Write,
            schema(),
            poll,
        ),
        Tool::new(
            "queue_peek",
            "Return the head of a queue without removing it.",
            TARGET,
            Access::Read,
            schema(),
            peek,
        ),
        Tool::new("queue_size", "Number of items in a queue.", TARGET, Access::Read, schema(), size),
        Tool::new("queue_clear", "Remove every item from a queue.", TARGET, Access::Write, schema(), clear),
    ]
}

fn offer(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let queue = ctx.grid.queue(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    Ok(json!({ "offered": queue.offer(value) }))
}

fn poll(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let head = ctx.grid.queue(args.name()?)?.poll();
    Ok(json!({ "found": head.is_some(), "value": ctx.decode_opt(head)? }))
}

fn peek(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let head = ctx.grid.queue(args.name()?)?.peek();
    Ok(json!({ "found": head.is_some(), "value": ctx.decode_opt(head)? }))
}

fn size(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    Ok(json!({ "size": ctx.grid.queue(args.name()?)?.size() }))
}

fn clear(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    ctx.grid.queue(args.name()?)?.clear();
    Ok(json!({ "cleared": true }))
}
