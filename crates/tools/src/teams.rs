//! Sample-team lookup.

use serde_json::Value;

use crate::client::DataClient;
use crate::formats::normalize_format;

/// Summarize a teams document: the first two entries, serialized.
pub(crate) fn summarize_teams(data: &Value) -> Option<String> {
    let teams = data.as_array()?;
    if teams.is_empty() {
        return None;
    }
    let sample: Vec<&Value> = teams.iter().take(2).collect();
    let json = serde_json::to_string(&sample).ok()?;
    Some(format!("Sample Teams: {json}"))
}

/// Fetch sample teams for a battle format. Failures of any kind yield the
/// fixed not-found string; this function never errors past its boundary.
pub async fn sample_teams(client: &DataClient, format: &str) -> String {
    let fmt = normalize_format(format);
    match client.get_json(&format!("/teams/{fmt}.json")).await {
        Ok(data) => match summarize_teams(&data) {
            Some(summary) => summary,
            None => {
                tracing::debug!(format = %fmt, "teams document had no entries");
                format!("No samples for {fmt}.")
            }
        },
        Err(e) => {
            tracing::debug!(format = %fmt, error = %e, "sample teams lookup failed");
            format!("No samples for {fmt}.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn takes_first_two_entries() {
        let data = json!([
            { "name": "rain" },
            { "name": "sun" },
            { "name": "stall" },
        ]);
        let summary = summarize_teams(&data).unwrap();
        assert!(summary.starts_with("Sample Teams: "));
        assert!(summary.contains("rain"));
        assert!(summary.contains("sun"));
        assert!(!summary.contains("stall"));
    }

    #[test]
    fn single_entry_is_fine() {
        let summary = summarize_teams(&json!([{ "name": "ho" }])).unwrap();
        assert!(summary.contains("ho"));
    }

    #[test]
    fn empty_or_wrong_shape_yields_none() {
        assert!(summarize_teams(&json!([])).is_none());
        assert!(summarize_teams(&json!({ "not": "an array" })).is_none());
    }
}
