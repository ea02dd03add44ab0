//! Usage-statistics lookup.

use serde_json::Value;

use crate::client::DataClient;
use crate::formats::normalize_format;

/// Summarize a stats document: the first 20 keys in file order (the host
/// writes them ranked by usage).
pub(crate) fn summarize_usage(data: &Value) -> Option<String> {
    let object = data.as_object()?;
    let top: Vec<&str> = object.keys().take(20).map(|k| k.as_str()).collect();
    if top.is_empty() {
        return None;
    }
    Some(format!("Top 20 Usage: {}", top.join(", ")))
}

/// Fetch usage statistics for a battle format.
///
/// Any failure — network, non-2xx, malformed JSON, unexpected shape —
/// yields the fixed not-found string. This function never errors past its
/// boundary.
pub async fn usage_stats(client: &DataClient, format: &str) -> String {
    let fmt = normalize_format(format);
    match client.get_json(&format!("/stats/{fmt}.json")).await {
        Ok(data) => match summarize_usage(&data) {
            Some(summary) => summary,
            None => {
                tracing::debug!(format = %fmt, "stats document had no usable keys");
                format!("Stats not found for {fmt}.")
            }
        },
        Err(e) => {
            tracing::debug!(format = %fmt, error = %e, "usage stats lookup failed");
            format!("Stats not found for {fmt}.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_lists_keys_in_file_order() {
        let data = json!({
            "Kingambit": { "usage": 0.42 },
            "Great Tusk": { "usage": 0.38 },
            "Gholdengo": { "usage": 0.31 },
        });
        let summary = summarize_usage(&data).unwrap();
        assert_eq!(summary, "Top 20 Usage: Kingambit, Great Tusk, Gholdengo");
    }

    #[test]
    fn summary_caps_at_twenty() {
        let mut map = serde_json::Map::new();
        for i in 0..30 {
            map.insert(format!("mon{i}"), json!({}));
        }
        let summary = summarize_usage(&Value::Object(map)).unwrap();
        assert_eq!(summary.matches(',').count(), 19);
        assert!(summary.contains("mon0"));
        assert!(!summary.contains("mon25"));
    }

    #[test]
    fn non_object_yields_none() {
        assert!(summarize_usage(&json!(["not", "an", "object"])).is_none());
        assert!(summarize_usage(&json!({})).is_none());
    }
}
