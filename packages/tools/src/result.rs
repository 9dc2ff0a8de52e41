use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One piece of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// The result of a tool call, as sent to the client.
///
/// ```json
/// { "content": [{ "type": "text", "text": "..." }], "isError": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result carrying `data` as compact JSON text.
    pub fn success(data: &JsonValue) -> Self {
        Self {
            content: vec![Content::Text {
                text: data.to_string(),
            }],
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// The text of the first content item.
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(Content::Text { text }) => text,
            None => "",
        }
    }

    /// Parse the text back into JSON. Used by clients and tests.
    pub fn json(&self) -> Option<JsonValue> {
        serde_json::from_str(self.text()).ok()
    }
}
