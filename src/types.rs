use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    Chat,
    Docs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

/// A single transcript bubble. The body is an HTML fragment rendered
/// verbatim; the server is trusted to produce well-formed markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub html: String,
    pub error: bool,
}

impl Message {
    pub fn user(html: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            html: html.into(),
            error: false,
        }
    }

    pub fn assistant(html: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            html: html.into(),
            error: false,
        }
    }

    pub fn error(html: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            html: html.into(),
            error: true,
        }
    }
}

/// Gate for outgoing chat input: whitespace-only input is a silent no-op.
/// Accepted input passes through untrimmed, exactly as typed.
pub fn outgoing_message(raw: &str) -> Option<&str> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw)
    }
}

/// Device coordinates as reported by the geolocation API. Doubles as the
/// request body for `POST /get_city`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Location state reconstructed from the three cookies. Values stay as the
/// raw cookie strings; nothing downstream needs them parsed back to floats.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedLocation {
    pub city: String,
    pub lat: String,
    pub lon: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct CityResponse {
    #[serde(default = "unknown_city", deserialize_with = "city_or_unknown")]
    pub city: String,
}

fn unknown_city() -> String {
    "Unknown".to_string()
}

/// Missing, null, and empty-string cities all collapse to "Unknown".
fn city_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let city = Option::<String>::deserialize(deserializer)?;
    Ok(match city {
        Some(city) if !city.is_empty() => city,
        _ => unknown_city(),
    })
}

/// `POST /upload` and `DELETE /delete/{filename}` both answer with a
/// single human-readable message.
#[derive(Debug, Deserialize)]
pub struct ActionResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_shape() {
        let body = serde_json::to_value(ChatRequest { message: "hello" }).unwrap();
        assert_eq!(body, json!({ "message": "hello" }));
    }

    #[test]
    fn test_coordinates_shape() {
        let body = serde_json::to_value(Coordinates {
            lat: 51.5,
            lon: -0.12,
        })
        .unwrap();
        assert_eq!(body, json!({ "lat": 51.5, "lon": -0.12 }));
    }

    #[test]
    fn test_city_response_defaults_to_unknown() {
        let resp: CityResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.city, "Unknown");

        let resp: CityResponse = serde_json::from_str(r#"{"city": "Lisbon"}"#).unwrap();
        assert_eq!(resp.city, "Lisbon");
    }

    #[test]
    fn test_city_response_empty_and_null_become_unknown() {
        let resp: CityResponse = serde_json::from_str(r#"{"city": ""}"#).unwrap();
        assert_eq!(resp.city, "Unknown");

        let resp: CityResponse = serde_json::from_str(r#"{"city": null}"#).unwrap();
        assert_eq!(resp.city, "Unknown");
    }

    #[test]
    fn test_outgoing_message_rejects_blank_input() {
        assert_eq!(outgoing_message(""), None);
        assert_eq!(outgoing_message("   "), None);
        assert_eq!(outgoing_message("\t\n"), None);
    }

    #[test]
    fn test_outgoing_message_passes_text_untrimmed() {
        assert_eq!(outgoing_message("hello"), Some("hello"));
        assert_eq!(outgoing_message("  hello  "), Some("  hello  "));
    }

    #[test]
    fn test_message_constructors() {
        let msg = Message::user("hi");
        assert_eq!(msg.sender, Sender::User);
        assert!(!msg.error);

        let msg = Message::error("<p>failed</p>");
        assert_eq!(msg.sender, Sender::Assistant);
        assert!(msg.error);
    }
}
