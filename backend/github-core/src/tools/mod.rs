//! Tool adapters for an agent framework.
//!
//! A [`Tool`] declares an id, a description and JSON schemas for its input
//! and output, and turns a JSON input into a JSON result. The
//! [`ToolRegistry`] owns the adapters and dispatches by id.
//!
//! Tool ids and output field names are a stable public interface.

pub mod github;
pub mod system;

pub use github::{GetRepositoryTool, GetUserTool, ListIssuesTool, SearchGithubTool};
pub use system::SystemMetricsTool;

use crate::client::GithubClient;
use crate::error::{OperationError, ToolError};

use common::RedactedToken;

use std::collections::BTreeMap;

use futures_util::future::BoxFuture;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Per-invocation state handed to every tool.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    credential: Option<RedactedToken>,
}

impl ToolContext {
    pub fn new(credential: Option<RedactedToken>) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> Option<&RedactedToken> {
        self.credential.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub id: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
}

pub trait Tool: Send + Sync {
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn input_schema(&self) -> Value;

    fn output_schema(&self) -> Value;

    /// Run the tool. The result is the presented record (data fields plus
    /// `formatted`) as JSON.
    fn invoke<'a>(
        &'a self,
        ctx: &'a ToolContext,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, ToolError>>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            id: self.id().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
            output_schema: self.output_schema(),
        }
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in tool.
    pub fn with_defaults(client: GithubClient) -> Self {
        let mut registry = Self::new();
        registry.register(SearchGithubTool::new(client.clone()));
        registry.register(GetRepositoryTool::new(client.clone()));
        registry.register(ListIssuesTool::new(client.clone()));
        registry.register(GetUserTool::new(client));
        registry.register(SystemMetricsTool);
        registry
    }

    /// Add a tool, replacing any tool already registered under its id.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let id = tool.id();
        if self.tools.insert(id, Box::new(tool)).is_some() {
            debug!("Replaced tool registration for '{id}'");
        }
    }

    pub fn get(&self, id: &str) -> Option<&dyn Tool> {
        self.tools.get(id).map(|tool| tool.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Dispatch to the tool registered under `id`.
    ///
    /// # Errors
    ///
    /// * [`ToolError::UnknownTool`] - nothing registered under `id`
    /// * anything the tool itself returns
    pub async fn invoke(
        &self,
        id: &str,
        ctx: &ToolContext,
        input: Value,
    ) -> Result<Value, ToolError> {
        let tool = self.get(id).ok_or_else(|| ToolError::unknown_tool(id))?;

        debug!(
            "Invoking tool '{id}' ({})",
            if ctx.credential().is_some() { "authenticated" } else { "anonymous" }
        );

        tool.invoke(ctx, input).await
    }
}

// ============================================
// ADAPTER HELPERS
// ============================================

/// Decode a tool input. A missing (`null`) input reads as `{}`.
#[track_caller]
pub(crate) fn parse_input<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, ToolError> {
    let input = match input {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    serde_json::from_value(input)
        .map_err(|e| ToolError::invalid_input(format!("{tool}: {e}")))
}

/// Parameter validation failures surface as tool input errors.
#[track_caller]
pub(crate) fn input_error(tool: &str, error: OperationError) -> ToolError {
    match error {
        OperationError::InvalidInput { message, .. } => {
            ToolError::invalid_input(format!("{tool}: {message}"))
        }
        other => ToolError::Operation(other),
    }
}

#[track_caller]
pub(crate) fn to_output<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::output(e.to_string()))
}
