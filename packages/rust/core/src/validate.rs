//! Rule schema validation.
//!
//! Every rule must carry a complete metadata block and a body that shows
//! both the anti-pattern and the fix, with at least one code example.
//! Checks run independently so one report lists everything wrong with a
//! rule, not just the first problem.

use rulebook_shared::{Fragment, Impact};

/// Check one fragment against the required schema.
///
/// Returns every violation found, in check order; an empty list means the
/// fragment is valid. A missing `impact` and an invalid `impact` are
/// mutually exclusive findings.
pub fn validate_fragment(fragment: &Fragment) -> Vec<String> {
    let mut violations = Vec::new();

    if fragment.title().is_none_or(str::is_empty) {
        violations.push("Missing title".to_string());
    }

    match fragment.impact() {
        None => violations.push("Missing impact".to_string()),
        Some(value) => {
            if value.parse::<Impact>().is_err() {
                violations.push(format!(
                    "Invalid impact \"{value}\". Must be one of: {}",
                    Impact::valid_values()
                ));
            }
        }
    }

    if fragment.impact_description().is_none_or(str::is_empty) {
        violations.push("Missing impactDescription".to_string());
    }

    match fragment.tags() {
        Some(tags) if !tags.is_empty() => {}
        _ => violations.push("Missing or invalid tags array".to_string()),
    }

    if !fragment.body.contains("**Incorrect") {
        violations.push("Missing **Incorrect** section".to_string());
    }
    if !fragment.body.contains("**Correct") {
        violations.push("Missing **Correct** section".to_string());
    }
    if !fragment.body.contains("```") {
        violations.push("Missing code examples".to_string());
    }

    violations
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn fragment(meta: &[(&str, serde_json::Value)], body: &str) -> Fragment {
        let meta: BTreeMap<String, serde_json::Value> = meta
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Fragment {
            id: "model-test".into(),
            meta,
            body: body.into(),
        }
    }

    fn valid_meta() -> Vec<(&'static str, serde_json::Value)> {
        vec![
            ("title", serde_json::json!("Embed related data")),
            ("impact", serde_json::json!("CRITICAL")),
            ("impactDescription", serde_json::json!("removes joins")),
            ("tags", serde_json::json!(["modeling"])),
        ]
    }

    const VALID_BODY: &str = "**Incorrect (split):**\n```json\n{}\n```\n\n**Correct (embedded):**\n```json\n{}\n```";

    #[test]
    fn valid_fragment_has_no_violations() {
        let f = fragment(&valid_meta(), VALID_BODY);
        assert!(validate_fragment(&f).is_empty());
    }

    #[test]
    fn missing_title() {
        let mut meta = valid_meta();
        meta.retain(|(k, _)| *k != "title");
        let violations = validate_fragment(&fragment(&meta, VALID_BODY));
        assert_eq!(violations, vec!["Missing title"]);
    }

    #[test]
    fn empty_title_is_missing() {
        let mut meta = valid_meta();
        meta[0].1 = serde_json::json!("");
        let violations = validate_fragment(&fragment(&meta, VALID_BODY));
        assert_eq!(violations, vec!["Missing title"]);
    }

    #[test]
    fn missing_impact_never_reports_invalid_impact() {
        let mut meta = valid_meta();
        meta.retain(|(k, _)| *k != "impact");
        let violations = validate_fragment(&fragment(&meta, VALID_BODY));
        assert_eq!(violations, vec!["Missing impact"]);
        assert!(!violations.iter().any(|v| v.contains("Invalid impact")));
    }

    #[test]
    fn invalid_impact_names_value_and_valid_set() {
        let mut meta = valid_meta();
        meta[1].1 = serde_json::json!("SEVERE");
        let violations = validate_fragment(&fragment(&meta, VALID_BODY));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("\"SEVERE\""));
        assert!(violations[0].contains("CRITICAL, HIGH, MEDIUM-HIGH, MEDIUM, LOW-MEDIUM, LOW"));
    }

    #[test]
    fn empty_tags_array_is_invalid() {
        let mut meta = valid_meta();
        meta[3].1 = serde_json::json!([]);
        let violations = validate_fragment(&fragment(&meta, VALID_BODY));
        assert_eq!(violations, vec!["Missing or invalid tags array"]);
    }

    #[test]
    fn tags_must_be_an_array() {
        let mut meta = valid_meta();
        meta[3].1 = serde_json::json!("modeling");
        let violations = validate_fragment(&fragment(&meta, VALID_BODY));
        assert_eq!(violations, vec!["Missing or invalid tags array"]);
    }

    #[test]
    fn body_markers_checked_independently() {
        let f = fragment(&valid_meta(), "just prose, no markers");
        let violations = validate_fragment(&f);
        assert_eq!(
            violations,
            vec![
                "Missing **Incorrect** section",
                "Missing **Correct** section",
                "Missing code examples"
            ]
        );
    }

    #[test]
    fn all_violations_reported_together() {
        let f = fragment(&[], "");
        let violations = validate_fragment(&f);
        assert_eq!(violations.len(), 7);
    }
}
