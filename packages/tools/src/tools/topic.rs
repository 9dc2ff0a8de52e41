use kvgrid_store::StructureKind;
use serde_json::{json, Value as JsonValue};

use crate::access::{Access, Target};
use crate::args::Args;
use crate::context::ToolContext;
use crate::error::Result;
use crate::registry::{Param, Schema, Tool};

pub(super) fn tools() -> Vec<Tool> {
    vec![Tool::new(
        "topic_publish",
        "Publish a message to a topic. Returns how many subscribers received it.",
        Target::Structure(StructureKind::Topic),
        Access::Write,
        Schema::named("topic").required("message", Param::Any, "JSON message"),
        publish,
    )]
}

fn publish(ctx: &ToolContext, args: &Args<'_>) -> Result<JsonValue> {
    let topic = ctx.grid.topic(args.name()?)?;
    let message = ctx.encode(args.value("message")?)?;
    Ok(json!({ "receivers": topic.publish(message) }))
}
