use kvgrid_store::StructureKind;
use serde_json::{json, Value as JsonValue};

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::{Result, ToolError};
use crate::registry::{Param, Schema, Tool};

const TARGET: Target = Target::Structure(StructureKind::RingBuffer);

const DEFAULT_READ_MAX: usize = 100;

pub(super) fn tools() -> Vec<Tool> {
    let schema = || Schema::named("ring buffer");
    vec![
        Tool::new(
            "ringbuffer_add",
            "Append a value to a ring buffer, overwriting the oldest when full. Returns its sequence.",
            TARGET,
            Access::Write,
            schema().required("value", Param::Any, "JSON value to append"),
            add,
        ),
        Tool::new(
            "ringbuffer_read",
            "Read the item at a sequence.",
            TARGET,
            Access::Read,
            schema().required("sequence", Param::Integer, "Sequence to read"),
            read,
        ),
        Tool::new(
            "ringbuffer_read_many",
            "Read consecutive items starting at a sequence.",
            TARGET,
            Access::Read,
            schema()
                .required("start", Param::Integer, "First sequence to read")
                .optional("max", Param::Integer, "Most items to return, default 100"),
            read_many,
        ),
        Tool::new(
            "ringbuffer_info",
            "Head and tail sequences, size and capacity of a ring buffer.",
            TARGET,
            Access::Read,
            schema(),
            info,
        ),
    ]
}

fn add(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let ring = ctx.grid.ringbuffer(args.name()?)?;
    let value = ctx.encode(args.value("value")?)?;
    Ok(json!({ "sequence": ring.add(value) }))
}

fn read(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let ring = ctx.grid.ringbuffer(args.name()?)?;
    let sequence = args.i64("sequence")?;
    let item = ring.read_one(sequence)?;
    Ok(json!({ "sequence": sequence, "value": ctx.decode(&item)? }))
}

fn read_many(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let ring = ctx.grid.ringbuffer(args.name()?)?;
    let start = args.i64("start")?;
    let max = args.opt_usize("max")?.unwrap_or(DEFAULT_READ_MAX);
    if max == 0 {
        return Err(ToolError::invalid("'max' must be at least 1"));
    }
    let items = ring.read_many(start, max)?;
    Ok(json!({
        "start": start,
        "next": start + items.len() as i64,
        "items": ctx.decode_all(&items)?,
    }))
}

fn info(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let ring = ctx.grid.ringbuffer(args.name()?)?;
    Ok(json!({
        "head": ring.head_sequence(),
        "tail": ring.tail_sequence(),
        "size": ring.size(),
        "capacity": ring.capacity(),
    }))
}
