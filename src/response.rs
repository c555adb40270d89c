use serde::Deserialize;
use serde_json::Value;

/// Error body the backend sends with every non-success status.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Value,
}

impl ErrorBody {
    /// The message to show the user. String details are returned verbatim;
    /// validation lists (`[{"msg": ...}]`) are joined.
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }
}

/// Extracts the user-facing detail from a raw error body, if there is one.
pub fn error_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_verbatim() {
        let body = r#"{"detail":"Смена уже открыта"}"#;
        assert_eq!(error_detail(body.as_bytes()).as_deref(), Some("Смена уже открыта"));
    }

    #[test]
    fn validation_messages_are_joined() {
        let body = r#"{"detail":[{"loc":["query","reason"],"msg":"field required"},{"msg":"bad id"}]}"#;
        assert_eq!(
            error_detail(body.as_bytes()).as_deref(),
            Some("field required; bad id")
        );
    }

    #[test]
    fn non_json_body_has_no_detail() {
        assert_eq!(error_detail(b"<html>502</html>"), None);
        assert_eq!(error_detail(br#"{"error":"x"}"#), None);
    }
}
