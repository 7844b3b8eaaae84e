//! MCP Server Implementation
//!
//! A protocol server owns the tools and resources registered on it and answers
//! JSON-RPC messages one at a time. Instances are cheap and are built fresh for
//! every HTTP request; nothing here is shared between connections.

use super::errors::McpError;
use super::helpers::rpc_success;
use super::models::*;
use futures_util::future::{self, BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use tracing::{debug, info};

/// Boxed future returned by registered handlers
pub type HandlerFuture<T> = BoxFuture<'static, Result<T, McpError>>;

type ToolFn = Box<dyn Fn(Value) -> HandlerFuture<CallToolResult> + Send + Sync>;
type ResourceFn = Box<dyn Fn(String) -> HandlerFuture<ReadResourceResult> + Send + Sync>;

/// Typed tool arguments, validated before the handler runs.
pub trait ToolInput: Sized + Send + 'static {
    /// JSON Schema advertised in `tools/list`.
    fn input_schema() -> Value;

    /// Parses and validates raw call arguments. The error string is reported
    /// to the client verbatim.
    fn from_arguments(arguments: Value) -> Result<Self, String>;
}

/// Static description of a tool, minus its input schema
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    pub title: Option<String>,
    pub description: Option<String>,
    pub meta: Option<Value>,
}

/// Static description of a resource
#[derive(Debug, Clone, Default)]
pub struct ResourceMetadata {
    pub description: Option<String>,
    pub mime_type: Option<String>,
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: ToolFn,
}

struct RegisteredResource {
    descriptor: ResourceDescriptor,
    handler: ResourceFn,
}

/// MCP server state and configuration
pub struct McpServer {
    info: Implementation,
    tools: Vec<RegisteredTool>,
    resources: Vec<RegisteredResource>,
}

impl McpServer {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: Implementation {
                name: name.into(),
                version: version.into(),
            },
            tools: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn info(&self) -> &Implementation {
        &self.info
    }

    /// Registers a resource served at a fixed `uri`.
    pub fn register_resource<F, Fut>(
        &mut self,
        name: &str,
        uri: &str,
        metadata: ResourceMetadata,
        handler: F,
    ) where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ReadResourceResult, McpError>> + Send + 'static,
    {
        let descriptor = ResourceDescriptor {
            name: name.to_string(),
            uri: uri.to_string(),
            description: metadata.description,
            mime_type: metadata.mime_type,
        };

        self.resources.retain(|r| r.descriptor.uri != uri);
        self.resources.push(RegisteredResource {
            descriptor,
            handler: Box::new(move |uri: String| -> HandlerFuture<ReadResourceResult> {
                handler(uri).boxed()
            }),
        });
        debug!("Registered resource: {}", uri);
    }

    /// Registers a tool whose arguments are parsed into `I` before `handler`
    /// is invoked. Arguments that fail validation never reach the handler.
    pub fn register_tool<I, F, Fut>(&mut self, name: &str, config: ToolConfig, handler: F)
    where
        I: ToolInput,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, McpError>> + Send + 'static,
    {
        let descriptor = ToolDescriptor {
            name: name.to_string(),
            title: config.title,
            description: config.description,
            input_schema: I::input_schema(),
            meta: config.meta,
        };

        let tool_name = name.to_string();
        let invoke = move |arguments: Value| -> HandlerFuture<CallToolResult> {
            match I::from_arguments(arguments) {
                Ok(input) => handler(input).boxed(),
                Err(message) => future::ready(Err(McpError::InvalidToolArguments {
                    tool: tool_name.clone(),
                    message,
                }))
                .boxed(),
            }
        };

        self.tools.retain(|t| t.descriptor.name != name);
        self.tools.push(RegisteredTool {
            descriptor,
            handler: Box::new(invoke),
        });
        debug!("Registered tool: {}", name);
    }

    /// Handles one message. Requests produce a response envelope; notifications
    /// and client responses produce nothing.
    pub async fn handle_message(&self, message: JsonRpcMessage) -> Option<Value> {
        match message {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(note) => {
                debug!("MCP notification: {}", note.method);
                None
            }
            JsonRpcMessage::Response(_) => {
                debug!("Ignoring client response");
                None
            }
        }
    }

    async fn handle_request(&self, req: JsonRpcRequest) -> Value {
        let JsonRpcRequest { id, method, params } = req;
        let params = params.unwrap_or(Value::Null);

        info!("MCP Call: {} (id: {})", method, id);

        match self.dispatch(&method, params).await {
            Ok(result) => rpc_success(id, result),
            Err(e) => e.to_response(id),
        }
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, McpError> {
        match method {
            "initialize" => self.handle_initialize(params),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tool_descriptors() })),
            "tools/call" => self.handle_tool_call(params).await,
            "resources/list" => Ok(json!({ "resources": self.resource_descriptors() })),
            "resources/templates/list" => Ok(json!({ "resourceTemplates": [] })),
            "resources/read" => self.handle_resource_read(params).await,
            _ => Err(McpError::MethodNotFound {
                method: method.to_string(),
            }),
        }
    }

    /// Handles `initialize` request (Handshake).
    fn handle_initialize(&self, params: Value) -> Result<Value, McpError> {
        let params: InitializeParams = if params.is_null() {
            InitializeParams::default()
        } else {
            serde_json::from_value(params)?
        };

        if let Some(client) = &params.client_info {
            info!("Client connected: {} {}", client.name, client.version);
        }

        let protocol_version = params
            .protocol_version
            .as_deref()
            .filter(|v| is_supported_protocol_version(v))
            .unwrap_or(LATEST_PROTOCOL_VERSION);

        Ok(json!({
            "protocolVersion": protocol_version,
            "capabilities": self.capabilities(),
            "serverInfo": self.info,
        }))
    }

    fn capabilities(&self) -> Value {
        let mut caps = json!({});
        if !self.tools.is_empty() {
            caps["tools"] = json!({ "listChanged": true });
        }
        if !self.resources.is_empty() {
            caps["resources"] = json!({ "listChanged": true });
        }
        caps
    }

    fn tool_descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(|t| &t.descriptor).collect()
    }

    fn resource_descriptors(&self) -> Vec<&ResourceDescriptor> {
        self.resources.iter().map(|r| &r.descriptor).collect()
    }

    /// Handles `tools/call` request.
    async fn handle_tool_call(&self, params: Value) -> Result<Value, McpError> {
        let params: CallToolParams = serde_json::from_value(params)?;

        let tool = self
            .tools
            .iter()
            .find(|t| t.descriptor.name == params.name)
            .ok_or_else(|| McpError::ToolNotFound {
                name: params.name.clone(),
            })?;

        let arguments = params.arguments.map(Value::Object).unwrap_or(Value::Null);
        let result = (tool.handler)(arguments).await?;
        to_result(result)
    }

    /// Handles `resources/read` request.
    async fn handle_resource_read(&self, params: Value) -> Result<Value, McpError> {
        let params: ReadResourceParams = serde_json::from_value(params)?;

        let resource = self
            .resources
            .iter()
            .find(|r| r.descriptor.uri == params.uri)
            .ok_or_else(|| McpError::ResourceNotFound {
                uri: params.uri.clone(),
            })?;

        let result = (resource.handler)(params.uri).await?;
        to_result(result)
    }

    /// Drops every registration; later calls see an empty server.
    pub fn close(&mut self) {
        self.tools.clear();
        self.resources.clear();
        debug!("MCP server {} closed", self.info.name);
    }
}

fn to_result<T: Serialize>(value: T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::Internal {
        message: e.to_string(),
    })
}
