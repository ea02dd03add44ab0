use serde::{Deserialize, Serialize};

/// Tool definition exposed to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's parameters.
    pub parameters: serde_json::Value,
}

/// Who authored a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One part of a content block (provider-agnostic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Part {
    #[serde(rename = "text")]
    Text { text: String },

    /// A function invocation requested by the model.
    #[serde(rename = "function_call")]
    FunctionCall {
        name: String,
        args: serde_json::Value,
    },

    /// The result of a dispatched function, fed back to the model.
    #[serde(rename = "function_response")]
    FunctionResponse { name: String, response: String },
}

impl Part {
    /// The text this part carries, if any. Function calls and responses
    /// carry no answer text.
    pub fn text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// A structured content block in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// Concatenated text of all text parts, in order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            if let Some(t) = part.text() {
                out.push_str(t);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_has_single_text_part() {
        let content = Content::user_text("hello");
        assert_eq!(content.role, Role::User);
        assert_eq!(content.text(), "hello");
    }

    #[test]
    fn text_skips_function_parts() {
        let content = Content {
            role: Role::Model,
            parts: vec![
                Part::Text { text: "a".into() },
                Part::FunctionCall {
                    name: "get_usage_stats".into(),
                    args: serde_json::json!({ "format": "gen9ou" }),
                },
                Part::Text { text: "b".into() },
            ],
        };
        assert_eq!(content.text(), "ab");
    }
}
