use crate::error::ToolError;
use crate::present::{Presented, format_system};
use crate::system::probe;
use crate::tools::{Tool, ToolContext, parse_input, to_output};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde_json::{Value, json};

pub const SYSTEM_METRICS_TOOL_ID: &str = "get_system_metrics";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SystemMetricsInput {}

pub struct SystemMetricsTool;

impl Tool for SystemMetricsTool {
    fn id(&self) -> &'static str {
        SYSTEM_METRICS_TOOL_ID
    }

    fn description(&self) -> &'static str {
        "Report CPU, memory, swap, uptime and process count for the machine running the agent."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "host_name": { "type": ["string", "null"] },
                "os_name": { "type": ["string", "null"] },
                "uptime_secs": { "type": "integer" },
                "cpu_count": { "type": "integer" },
                "cpu_usage_percent": { "type": "number" },
                "total_memory_bytes": { "type": "integer" },
                "used_memory_bytes": { "type": "integer" },
                "process_count": { "type": "integer" },
                "formatted": { "type": "string" }
            },
            "required": ["uptime_secs", "cpu_count", "total_memory_bytes", "formatted"]
        })
    }

    fn invoke<'a>(
        &'a self,
        _ctx: &'a ToolContext,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, ToolError>> {
        async move {
            let _: SystemMetricsInput = parse_input(SYSTEM_METRICS_TOOL_ID, input)?;
            let snapshot = probe().await;
            to_output(&Presented::new(snapshot, format_system))
        }
        .boxed()
    }
}
