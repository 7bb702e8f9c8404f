//! JSON reporter
//!
//! Outputs the full review as pretty-printed JSON for machine consumption,
//! piping to jq, or the HTTP layer hosting this crate.

use crate::models::Review;
use anyhow::Result;

/// Render a review as JSON
pub fn render(review: &Review) -> Result<String> {
    Ok(serde_json::to_string_pretty(review)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_review;

    #[test]
    fn test_json_render_valid() {
        let review = test_review();
        let json_str = render(&review).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["scores"]["security"], 75);
        assert_eq!(
            parsed["findings"].as_array().expect("findings array").len(),
            2
        );
        assert_eq!(parsed["findings"][0]["tool"], "security");
        assert_eq!(parsed["findings"][0]["severity"], "error");
    }
}
