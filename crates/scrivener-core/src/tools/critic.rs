//! Report critic: does the report mention every snippet?
//!
//! A snippet counts as covered when the first word of its title occurs
//! anywhere in the report text. This is a plain substring test, so a
//! short token can match inside an unrelated word.

use super::context::extract_snippets;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub ok: bool,
    /// Full titles of uncovered snippets, in context order
    pub missing: Vec<String>,
    /// Covered fraction, rounded to 2 decimals
    pub score: f64,
}

pub fn critique(report_package: Option<&Value>, context: Option<&Value>) -> Verdict {
    let report = report_package
        .and_then(|pkg| pkg.get("report"))
        .and_then(Value::as_str)
        .unwrap_or("");
    let snippets = extract_snippets(context);

    let missing: Vec<String> = snippets
        .iter()
        .filter_map(|s| {
            let title = s.title?;
            let token = title.split_whitespace().next()?;
            (!report.contains(token)).then(|| title.to_string())
        })
        .collect();

    let total = snippets.len().max(1) as f64;
    let score = round2(1.0 - missing.len() as f64 / total);

    Verdict {
        ok: missing.is_empty(),
        missing,
        score,
    }
}

/// Round the stored binary value to 2 places, ties to even
fn round2(x: f64) -> f64 {
    format!("{:.2}", x).parse::<f64>().unwrap_or(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn package(report: &str) -> Value {
        json!({"status": "success", "report": report, "final_message": ""})
    }

    #[test]
    fn test_half_missing() {
        let ctx = json!({"snippets": [{"title": "Alpha study"}, {"title": "Beta trial"}]});
        let verdict = critique(Some(&package("We discuss Alpha at length.")), Some(&ctx));
        assert_eq!(
            verdict,
            Verdict {
                ok: false,
                missing: vec!["Beta trial".to_string()],
                score: 0.5,
            }
        );
    }

    #[test]
    fn test_no_snippets_is_perfect() {
        for ctx in [None, Some(json!({})), Some(json!({"snippets": []}))] {
            let verdict = critique(Some(&package("anything")), ctx.as_ref());
            assert!(verdict.ok);
            assert!(verdict.missing.is_empty());
            assert_eq!(verdict.score, 1.0);
        }
    }

    #[test]
    fn test_idempotent() {
        let ctx = json!({"snippets": [{"title": "Alpha"}, {"title": "Gamma"}]});
        let pkg = package("Alpha only");
        assert_eq!(critique(Some(&pkg), Some(&ctx)), critique(Some(&pkg), Some(&ctx)));
    }

    #[test]
    fn test_blank_or_absent_titles_never_missing() {
        let ctx = json!({"snippets": [{"title": ""}, {"title": "   "}, {"snippet": "x"}, "junk", {"title": "Zed"}]});
        let verdict = critique(Some(&package("")), Some(&ctx));
        assert_eq!(verdict.missing, vec!["Zed".to_string()]);
        assert_eq!(verdict.score, 0.8);
        assert!(!verdict.ok);
    }

    #[test]
    fn test_substring_match_counts_as_present() {
        let ctx = json!({"snippets": [{"title": "cat facts"}]});
        let verdict = critique(Some(&package("A concatenated report")), Some(&ctx));
        assert!(verdict.ok);
    }

    #[test]
    fn test_missing_report_reads_as_empty() {
        let ctx = json!({"snippets": [{"title": "One"}, {"title": "Two"}, {"title": "Three"}]});
        let verdict = critique(None, Some(&ctx));
        assert_eq!(verdict.missing.len(), 3);
        assert_eq!(verdict.score, 0.0);

        let verdict = critique(Some(&json!({"report": 5})), Some(&ctx));
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn test_score_rounded_to_two_places() {
        let ctx = json!({"snippets": [{"title": "One"}, {"title": "Two"}, {"title": "Three"}]});
        let verdict = critique(Some(&package("One")), Some(&ctx));
        assert_eq!(verdict.score, 0.33);
    }

    fn titled(n: usize) -> Value {
        let snippets: Vec<Value> = (0..n).map(|i| json!({"title": format!("T{i:02}x")})).collect();
        json!({ "snippets": snippets })
    }

    fn report_covering(n: usize) -> Value {
        let words: Vec<String> = (0..n).map(|i| format!("T{i:02}x")).collect();
        package(&words.join(" "))
    }

    #[test]
    fn test_score_rounding_matches_stored_value() {
        // 3 of 8 missing: 0.625 is an exact tie, goes to even
        let verdict = critique(Some(&report_covering(5)), Some(&titled(8)));
        assert_eq!(verdict.missing.len(), 3);
        assert_eq!(verdict.score, 0.62);

        // 7 of 8 missing: 0.125 -> 0.12
        let verdict = critique(Some(&report_covering(1)), Some(&titled(8)));
        assert_eq!(verdict.score, 0.12);

        // 1 of 40 missing: 0.975 is stored just below the tie
        let verdict = critique(Some(&report_covering(39)), Some(&titled(40)));
        assert_eq!(verdict.missing, vec!["T39x".to_string()]);
        assert_eq!(verdict.score, 0.97);
    }
}
