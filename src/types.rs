use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::errors::ScreeningError;

/// Outcome label attached to a screened candidate.
///
/// The service speaks `PASS`, `REVIEW` and `FAIL`; anything else (including
/// the `ERROR` rows it emits for unreadable files) is kept verbatim in
/// `Other` so it can still be displayed and sorted on its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Pass,
    Review,
    Fail,
    Other(String),
}

impl Recommendation {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PASS" => Self::Pass,
            "REVIEW" => Self::Review,
            "FAIL" => Self::Fail,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pass => "PASS",
            Self::Review => "REVIEW",
            Self::Fail => "FAIL",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl Default for Recommendation {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Recommendation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|r| Self::parse(&r)).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreeningResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub file_name: String,
    /// `None` when the service sent something that is not a finite number.
    #[serde(default, deserialize_with = "lenient_score")]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub recommendation: Recommendation,
    #[serde(default, deserialize_with = "skill_list")]
    pub matched_skills: Vec<String>,
    #[serde(default, deserialize_with = "skill_list")]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub ai_powered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScreeningResult {
    /// Score used for ordering: absent or non-numeric scores count as zero.
    pub fn sort_score(&self) -> f64 {
        self.match_score.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchScreeningResult {
    pub results: Vec<ScreeningResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_powered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_processed: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BatchScreeningResult {
    pub fn is_ai_powered(&self) -> bool {
        self.ai_powered
            .unwrap_or_else(|| self.results.iter().any(|r| r.ai_powered))
    }
}

/// A decoded, shape-checked body returned by the upload endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ScreeningResponse {
    Single(ScreeningResult),
    Batch(BatchScreeningResult),
}

impl ScreeningResponse {
    pub fn decode(body: &str) -> Result<Self, ScreeningError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ScreeningError::MalformedResponse(format!("body is not JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ScreeningError> {
        let Some(object) = value.as_object() else {
            return Err(ScreeningError::MalformedResponse(
                "expected a JSON object".to_string(),
            ));
        };
        let batch = object.get("results").map(Value::is_array);
        let single = object.contains_key("match_score") && object.contains_key("recommendation");

        match (batch, single) {
            (Some(true), _) => serde_json::from_value(value)
                .map(Self::Batch)
                .map_err(|e| ScreeningError::MalformedResponse(format!("batch result: {e}"))),
            (Some(false), _) => Err(ScreeningError::MalformedResponse(
                "`results` is not an array".to_string(),
            )),
            (None, true) => serde_json::from_value(value)
                .map(Self::Single)
                .map_err(|e| ScreeningError::MalformedResponse(format!("single result: {e}"))),
            (None, false) => Err(ScreeningError::MalformedResponse(
                "body matches neither the single nor the batch result shape".to_string(),
            )),
        }
    }

    pub fn rows(&self) -> &[ScreeningResult] {
        match self {
            Self::Single(result) => std::slice::from_ref(result),
            Self::Batch(batch) => &batch.results,
        }
    }

    pub fn is_ai_powered(&self) -> bool {
        match self {
            Self::Single(result) => result.ai_powered,
            Self::Batch(batch) => batch.is_ai_powered(),
        }
    }
}

/// One stored screening as returned by the history endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub result: ScreeningResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screened_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryPage {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub screenings: Vec<HistoryEntry>,
}

impl HistoryPage {
    pub fn into_batch(self) -> BatchScreeningResult {
        let total = self.total.max(self.screenings.len());
        BatchScreeningResult {
            results: self.screenings.into_iter().map(|e| e.result).collect(),
            ai_powered: Some(false),
            total_processed: Some(total),
            message: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub ai_model_loaded: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(score_from_value))
}

fn score_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillsRepr {
    List(Vec<String>),
    Joined(String),
}

// Live responses carry arrays; stored history rows carry ", "-joined text
// with "None" standing in for an empty list.
fn skill_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<SkillsRepr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(SkillsRepr::List(list)) => list,
        Some(SkillsRepr::Joined(text)) => split_joined_skills(&text),
    })
}

pub fn split_joined_skills(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_single_result_shape() {
        let body = json!({
            "candidate_name": "Alice",
            "file_name": "alice.pdf",
            "match_score": 92,
            "recommendation": "PASS",
            "matched_skills": ["Python", "SQL"],
            "missing_skills": [],
            "ai_powered": true
        })
        .to_string();

        let response = ScreeningResponse::decode(&body).expect("single shape");
        let ScreeningResponse::Single(result) = &response else {
            panic!("expected single shape, got {response:?}");
        };
        assert_eq!(result.match_score, Some(92.0));
        assert_eq!(result.recommendation, Recommendation::Pass);
        assert!(response.is_ai_powered());
        assert_eq!(response.rows().len(), 1);
    }

    #[test]
    fn decodes_batch_shape_with_service_extras() {
        let body = json!({
            "total_processed": 2,
            "message": "Successfully processed 2 resume(s)!",
            "results": [
                {"id": 7, "candidate_name": "Alice", "file_name": "a.pdf", "match_score": 81.5,
                 "recommendation": "PASS", "matched_skills": ["Rust"], "missing_skills": [],
                 "ai_powered": true},
                {"file_name": "b.docx", "candidate_name": "Error", "match_score": 0,
                 "recommendation": "ERROR", "error": "Only PDF files are supported",
                 "matched_skills": [], "missing_skills": [], "ai_powered": false}
            ]
        })
        .to_string();

        let response = ScreeningResponse::decode(&body).expect("batch shape");
        let ScreeningResponse::Batch(batch) = &response else {
            panic!("expected batch shape");
        };
        assert_eq!(batch.total_processed, Some(2));
        assert_eq!(batch.results[0].id, Some(7));
        assert_eq!(
            batch.results[1].recommendation,
            Recommendation::Other("ERROR".to_string())
        );
        assert_eq!(
            batch.results[1].error.as_deref(),
            Some("Only PDF files are supported")
        );
        // No batch-level flag: derived from the rows.
        assert!(batch.is_ai_powered());
    }

    #[test]
    fn rejects_bodies_matching_neither_shape() {
        for body in ["[1, 2]", "{\"status\": \"ok\"}", "{\"results\": 3}", "not json"] {
            let err = ScreeningResponse::decode(body).expect_err("should be malformed");
            assert!(
                matches!(err, ScreeningError::MalformedResponse(_)),
                "{body} -> {err:?}"
            );
        }
    }

    #[test]
    fn tolerates_unknown_recommendation_and_odd_scores() {
        let body = json!({
            "candidate_name": "Carol",
            "file_name": "carol.pdf",
            "match_score": "73.5",
            "recommendation": "MAYBE"
        })
        .to_string();
        let response = ScreeningResponse::decode(&body).expect("tolerated");
        let row = &response.rows()[0];
        assert_eq!(row.match_score, Some(73.5));
        assert_eq!(row.recommendation.as_str(), "MAYBE");
        assert!(row.matched_skills.is_empty());

        let odd = json!({"match_score": "n/a", "recommendation": null}).to_string();
        let response = ScreeningResponse::decode(&odd).expect("tolerated");
        assert_eq!(response.rows()[0].match_score, None);
        assert_eq!(response.rows()[0].sort_score(), 0.0);
        assert_eq!(response.rows()[0].recommendation.as_str(), "");
    }

    #[test]
    fn history_entries_accept_joined_skill_text() {
        let page: HistoryPage = serde_json::from_value(json!({
            "total": 1,
            "screenings": [{
                "id": 3,
                "candidate_name": "Dana",
                "file_name": "dana.pdf",
                "match_score": "64.20",
                "matched_skills": "python, docker",
                "missing_skills": "None",
                "recommendation": "REVIEW",
                "screened_at": "2026-01-12T10:00:00",
                "job_title": "Backend Engineer"
            }]
        }))
        .expect("history page");

        let entry = &page.screenings[0];
        assert_eq!(entry.result.matched_skills, vec!["python", "docker"]);
        assert!(entry.result.missing_skills.is_empty());
        assert_eq!(entry.job_title.as_deref(), Some("Backend Engineer"));

        let batch = page.into_batch();
        assert_eq!(batch.total_processed, Some(1));
        assert!(!batch.is_ai_powered());
    }

    #[test]
    fn recommendation_serializes_to_raw_text() {
        let value = serde_json::to_value(Recommendation::parse("MAYBE")).expect("serialize");
        assert_eq!(value, json!("MAYBE"));
        assert_eq!(Recommendation::parse("REVIEW").to_string(), "REVIEW");
    }
}
