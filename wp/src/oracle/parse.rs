//! Best-effort JSON recovery from oracle text
//!
//! The oracle sometimes wraps its JSON in explanatory prose or markdown code
//! fences. The heuristic here is a load-bearing contract with that behavior:
//! strip a leading fence (with optional language tag) and trailing fence,
//! slice from the first `{` to the last `}`, then parse. A response with no
//! braces at all fails cleanly with the raw text preserved.

use serde_json::Value;
use tracing::debug;

use super::OracleError;

/// Recover a JSON object from raw oracle text
pub fn recover_json(text: &str) -> Result<Value, OracleError> {
    debug!(text_len = text.len(), "recover_json: called");
    let mut t = text.trim();

    if t.is_empty() {
        return Err(OracleError::Malformed { raw: text.to_string() });
    }

    // Strip ```/```json fences if the whole response is fenced
    if t.starts_with("```") {
        t = t.trim_matches('`');
        t = t.trim_start();
        if let Some(rest) = t.strip_prefix("json") {
            t = rest;
        }
        t = t.trim();
    }

    // Slice to the outermost braces - recovers JSON embedded in prose
    let sliced = match (t.find('{'), t.rfind('}')) {
        (Some(start), Some(end)) if end > start => &t[start..=end],
        _ => {
            debug!("recover_json: no brace span found");
            return Err(OracleError::Malformed { raw: text.to_string() });
        }
    };

    serde_json::from_str(sliced).map_err(|e| {
        debug!(error = %e, "recover_json: parse failed after slicing");
        OracleError::Malformed { raw: text.to_string() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_json_passes_through() {
        let value = recover_json(r#"{"tasks":[{"title":"x"}]}"#).unwrap();
        assert_eq!(value, json!({"tasks":[{"title":"x"}]}));
    }

    #[test]
    fn test_fenced_json_with_language_tag() {
        let text = "```json\n{\"tasks\":[{\"title\":\"x\"}]}\n```";
        let value = recover_json(text).unwrap();
        assert_eq!(value, json!({"tasks":[{"title":"x"}]}));
    }

    #[test]
    fn test_fenced_json_without_language_tag() {
        let text = "```\n{\"tasks\":[]}\n```";
        assert_eq!(recover_json(text).unwrap(), json!({"tasks":[]}));
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let text = "Here is the JSON:\n```json\n{\"tasks\":[{\"title\":\"x\"}]}\n```\nHope that helps!";
        let value = recover_json(text).unwrap();
        assert_eq!(value, json!({"tasks":[{"title":"x"}]}));
    }

    #[test]
    fn test_prose_without_fences() {
        let text = "Sure! The answer is {\"weekly_plan\":[],\"changes\":[],\"conflicts\":[]} as requested.";
        let value = recover_json(text).unwrap();
        assert_eq!(value["changes"], json!([]));
    }

    #[test]
    fn test_no_braces_is_malformed_and_preserves_raw() {
        let text = "I cannot help with that.";
        match recover_json(text) {
            Err(OracleError::Malformed { raw }) => assert_eq!(raw, text),
            other => panic!("expected Malformed, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unparseable_slice_preserves_raw() {
        let text = "result: {not valid json}";
        match recover_json(text) {
            Err(OracleError::Malformed { raw }) => assert_eq!(raw, text),
            other => panic!("expected Malformed, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_text_is_malformed() {
        assert!(matches!(recover_json(""), Err(OracleError::Malformed { .. })));
        assert!(matches!(recover_json("   \n"), Err(OracleError::Malformed { .. })));
    }
}
