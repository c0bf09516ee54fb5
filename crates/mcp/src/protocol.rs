// Protocol types for the line-delimited JSON tool channel

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const METHOD_LIST_TOOLS: &str = "tools/list";
pub const METHOD_CALL_TOOL: &str = "tools/call";

/// One request line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Methods the server understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    ListTools,
    CallTool,
    Unknown(Option<String>),
}

impl Request {
    pub fn method(&self) -> Method {
        match self.method.as_deref() {
            Some(METHOD_LIST_TOOLS) => Method::ListTools,
            Some(METHOD_CALL_TOOL) => Method::CallTool,
            other => Method::Unknown(other.map(str::to_string)),
        }
    }
}

/// Call tool request params.
///
/// Read loosely: a call with a missing or malformed name still goes to the
/// dispatcher and is answered as an unknown tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallToolParams {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl CallToolParams {
    /// Anything other than a JSON object reads as empty params.
    pub fn from_params(params: Option<Value>) -> Self {
        params
            .and_then(|params| serde_json::from_value(params).ok())
            .unwrap_or_default()
    }

    /// Tool name as dispatched; a missing name reads as `null`.
    pub fn tool_name(&self) -> String {
        match &self.name {
            Some(Value::String(name)) => name.clone(),
            None | Some(Value::Null) => "null".to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// Arguments object; absent or `null` arguments are empty.
    pub fn into_arguments(self) -> Result<Map<String, Value>, String> {
        match self.arguments {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(arguments)) => Ok(arguments),
            Some(other) => Err(format!("Invalid arguments: expected an object, got {}", other)),
        }
    }
}

/// JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

/// Advertised as `{type, description}`; nothing else goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub kind: ParamType,
    pub description: String,
}

/// Tool definition as advertised by `tools/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ParameterSpec>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add an optional parameter
    pub fn param(mut self, name: &str, kind: ParamType, description: &str) -> Self {
        self.parameters.insert(
            name.to_string(),
            ParameterSpec {
                kind,
                description: description.to_string(),
            },
        );
        self
    }

    /// Add a required parameter. The requirement is stated in the description.
    pub fn required_param(self, name: &str, kind: ParamType, description: &str) -> Self {
        self.param(name, kind, &format!("{} (required)", description))
    }
}

/// List tools response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolDefinition>,
}

/// Call tool response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResponse {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Protocol-level error, for lines that never reach a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Anything written back on the output channel
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Tools(ListToolsResult),
    Tool(ToolResponse),
    Error(ErrorResponse),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_method_routing() {
        let list: Request = serde_json::from_value(json!({"method": "tools/list"})).unwrap();
        let call: Request = serde_json::from_value(json!({"method": "tools/call", "params": {}})).unwrap();
        let other: Request = serde_json::from_value(json!({"method": "initialize"})).unwrap();
        let missing: Request = serde_json::from_value(json!({})).unwrap();

        assert_eq!(list.method(), Method::ListTools);
        assert_eq!(call.method(), Method::CallTool);
        assert_eq!(other.method(), Method::Unknown(Some("initialize".to_string())));
        assert_eq!(missing.method(), Method::Unknown(None));
    }

    #[test]
    fn test_tool_response_shapes() {
        let ok = serde_json::to_value(ToolResponse::success(json!({"n": 1}))).unwrap();
        let failed = serde_json::to_value(ToolResponse::failure("boom")).unwrap();

        assert_eq!(ok, json!({"success": true, "data": {"n": 1}}));
        assert_eq!(failed, json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn test_tool_definition_serialization() {
        let definition = ToolDefinition::new("analyze", "Analyze a job")
            .required_param("job_id", ParamType::String, "Job ID")
            .param("days", ParamType::Integer, "Days to analyze");

        assert_eq!(
            serde_json::to_value(definition).unwrap(),
            json!({
                "name": "analyze",
                "description": "Analyze a job",
                "parameters": {
                    "days": {"type": "integer", "description": "Days to analyze"},
                    "job_id": {"type": "string", "description": "Job ID (required)"}
                }
            })
        );
    }

    #[test]
    fn test_call_params_default_arguments() {
        let params = CallToolParams::from_params(Some(json!({"name": "list_jobs"})));
        assert_eq!(params.tool_name(), "list_jobs");
        assert_eq!(params.into_arguments(), Ok(Map::new()));
    }

    #[test]
    fn test_call_params_read_loosely() {
        assert_eq!(CallToolParams::from_params(None).tool_name(), "null");
        assert_eq!(CallToolParams::from_params(Some(json!({}))).tool_name(), "null");
        assert_eq!(CallToolParams::from_params(Some(json!([1, 2]))).tool_name(), "null");
        assert_eq!(CallToolParams::from_params(Some(json!({"name": 5}))).tool_name(), "5");

        let params = CallToolParams::from_params(Some(json!({"name": "list_jobs", "arguments": [1]})));
        assert_eq!(
            params.into_arguments(),
            Err("Invalid arguments: expected an object, got [1]".to_string())
        );
    }
}
