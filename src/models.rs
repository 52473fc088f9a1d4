use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

const DEFAULT_REVIEW_COUNT: &str = "50";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewListRequest {
    #[serde(default)]
    pub count: Option<Value>,
}

impl ReviewListRequest {
    /// Page size for the upstream query. Zero, empty and non-scalar values mean the default.
    pub fn count(&self) -> String {
        match &self.count {
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => DEFAULT_REVIEW_COUNT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddReviewRequest {
    #[serde(default)]
    pub review: Option<NewReview>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewReview {
    /// Rewrites every characteristic rating as an integer; unparsable ones become `null`.
    pub fn coerce_characteristics(&mut self) {
        if let Some(Value::Object(characteristics)) = self.characteristics.as_mut() {
            for value in characteristics.values_mut() {
                *value = parse_int(value);
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub images: Value,
}

impl UploadRequest {
    pub fn images(&self) -> &[Value] {
        match &self.images {
            Value::Array(items) => items.as_slice(),
            _ => &[],
        }
    }
}

/// Base-10 integer prefix of the value's text form, `null` when there is none.
pub fn parse_int(value: &Value) -> Value {
    let text = scalar_text(value);
    let trimmed = text.trim_start();

    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Value::Null;
    }
    let digits = &rest[..digits_len];

    if let Ok(n) = digits.parse::<i64>() {
        return Value::Number(Number::from(if negative { -n } else { n }));
    }

    // Beyond i64: keep the magnitude as a float
    digits
        .parse::<f64>()
        .ok()
        .and_then(|f| Number::from_f64(if negative { -f } else { f }))
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => scalar_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Null | Value::Object(_) => String::new(),
    }
}
