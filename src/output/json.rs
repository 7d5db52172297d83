use anyhow::{Context, Result};
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed serializing output as JSON")
}

#[cfg(test)]
mod tests {
    use super::render_json;
    use crate::types::ScreeningResponse;

    #[test]
    fn decoded_response_renders_back_to_its_wire_shape() {
        let body = r#"{"candidate_name":"Ann","file_name":"ann.pdf","match_score":70,"recommendation":"REVIEW","matched_skills":[],"missing_skills":["Go"],"ai_powered":false}"#;
        let response = ScreeningResponse::decode(body).expect("decode");
        let rendered = render_json(&response).expect("json");
        let again = ScreeningResponse::decode(&rendered).expect("decode again");
        assert_eq!(again, response);
        assert!(!rendered.contains("\"results\""));
    }
}
