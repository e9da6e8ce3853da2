use serde_json::{Map, Value};

/// Outcome of reading JSON out of free model text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// The whole text was JSON.
    Direct(Value),
    /// JSON was found between the first `{` and the last `}`.
    Recovered(Value),
    /// Nothing to parse.
    Empty,
    /// Text was present but no JSON could be read from it.
    Unparseable,
}

impl ParsedResponse {
    /// Collapses the outcome to a value, `{}` when nothing was read.
    pub fn into_value(self) -> Value {
        match self {
            ParsedResponse::Direct(value) | ParsedResponse::Recovered(value) => value,
            ParsedResponse::Empty | ParsedResponse::Unparseable => Value::Object(Map::new()),
        }
    }
}

pub fn parse_llm_json(text: &str) -> ParsedResponse {
    let text = text.trim();
    if text.is_empty() {
        return ParsedResponse::Empty;
    }

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return ParsedResponse::Direct(value);
    }

    // 模型常把 JSON 包在 markdown 或說明文字中
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => {
            match serde_json::from_str::<Value>(&text[start..=end]) {
                Ok(value) => ParsedResponse::Recovered(value),
                Err(_) => ParsedResponse::Unparseable,
            }
        }
        _ => ParsedResponse::Unparseable,
    }
}
