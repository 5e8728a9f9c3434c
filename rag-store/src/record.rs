//! Core data models used by the library.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single retrieval hit returned to the chat pipeline and to clients.
///
/// `text`, `title` and `url` are omitted from JSON when the stored point has none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Passage {
    /// Builds a passage from a search hit payload.
    ///
    /// Text is read from `text`, falling back to `snippet`.
    pub fn from_payload(score: f32, payload: &Value) -> Self {
        let str_field = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };

        Self {
            score,
            text: str_field("text").or_else(|| str_field("snippet")),
            title: str_field("title"),
            url: str_field("url"),
        }
    }
}

/// One article in an ingest file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Article {
    /// Free-form source identifier, kept for logging only.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_fields_are_picked_up() {
        let p = Passage::from_payload(
            0.91,
            &json!({"title": "Rates", "url": "https://x.test/a", "text": "Rates rose."}),
        );
        assert_eq!(p.text.as_deref(), Some("Rates rose."));
        assert_eq!(p.title.as_deref(), Some("Rates"));
        assert_eq!(p.url.as_deref(), Some("https://x.test/a"));
    }

    #[test]
    fn snippet_is_used_when_text_is_absent() {
        let p = Passage::from_payload(0.5, &json!({"snippet": "short"}));
        assert_eq!(p.text.as_deref(), Some("short"));
        assert!(p.title.is_none());
    }

    #[test]
    fn missing_optionals_are_not_serialized() {
        let p = Passage::from_payload(0.5, &json!({"text": "t"}));
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("title").is_none());
        assert!(v.get("url").is_none());
        assert_eq!(v["text"], "t");
    }

    #[test]
    fn textless_hit_omits_the_text_field() {
        let p = Passage::from_payload(0.4, &json!({"title": "Headline only"}));
        assert!(p.text.is_none());
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("text").is_none());
        assert_eq!(v["title"], "Headline only");
        assert_eq!(v["score"], 0.4_f32 as f64);
    }

    #[test]
    fn article_tolerates_sparse_entries() {
        let a: Article = serde_json::from_str(r#"{"text":"body"}"#).unwrap();
        assert_eq!(a.text, "body");
        assert!(a.title.is_none() && a.url.is_none() && a.id.is_none());
    }
}
