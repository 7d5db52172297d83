use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::config::DisplayConfig;
use crate::types::{
    BatchScreeningResult, HealthStatus, HistoryEntry, ScreeningResponse, ScreeningResult,
};
use crate::view::{
    badge_for, format_score, preview_skills, score_bar, BadgeTone, SortColumn, SortState,
};

const AI_BADGE: &str = "🤖 Powered by AI Semantic Matching";

fn tone_color(tone: BadgeTone) -> Color {
    match tone {
        BadgeTone::Green => Color::Green,
        BadgeTone::Amber => Color::Yellow,
        BadgeTone::Red => Color::Red,
        BadgeTone::Neutral => Color::Grey,
    }
}

fn recommendation_cell(result: &ScreeningResult) -> Cell {
    let badge = badge_for(&result.recommendation);
    Cell::new(format!("{} {}", badge.icon, result.recommendation)).fg(tone_color(badge.tone))
}

fn score_text(result: &ScreeningResult, bar_width: usize) -> String {
    format!(
        "{} {}",
        score_bar(result.match_score, bar_width),
        format_score(result.match_score)
    )
}

pub fn render_response(
    response: &ScreeningResponse,
    sort: &SortState,
    display: &DisplayConfig,
) -> String {
    match response {
        ScreeningResponse::Single(result) => render_result_card(result, display),
        ScreeningResponse::Batch(batch) => render_batch_table(batch, sort, display),
    }
}

/// Detail view for one candidate.
pub fn render_result_card(result: &ScreeningResult, display: &DisplayConfig) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["🎯 Screening Result", ""]);

    table.add_row(vec!["Name", result.candidate_name.as_str()]);
    table.add_row(vec!["File", result.file_name.as_str()]);
    table.add_row(vec![
        "Match Score".to_string(),
        score_text(result, display.bar_width),
    ]);
    table.add_row(Row::from(vec![
        Cell::new("Recommendation"),
        recommendation_cell(result),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("✅ Matched Skills"),
        skill_list_cell(&result.matched_skills, "No matched skills", Color::Green),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("❌ Missing Skills"),
        skill_list_cell(&result.missing_skills, "No missing skills", Color::Red),
    ]));
    if let Some(error) = &result.error {
        table.add_row(Row::from(vec![
            Cell::new("Error"),
            Cell::new(error).fg(Color::Red),
        ]));
    }

    let mut out = table.to_string();
    if result.ai_powered {
        out.push('\n');
        out.push_str(AI_BADGE);
    }
    out
}

fn skill_list_cell(skills: &[String], empty: &str, color: Color) -> Cell {
    if skills.is_empty() {
        Cell::new(empty).fg(Color::Grey)
    } else {
        Cell::new(skills.join(", ")).fg(color)
    }
}

/// Sortable multi-candidate table; skill columns are truncated to the
/// configured preview length.
pub fn render_batch_table(
    batch: &BatchScreeningResult,
    sort: &SortState,
    display: &DisplayConfig,
) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let mut header: Vec<String> = SortColumn::ALL
        .iter()
        .map(|column| sort.header_label(*column))
        .collect();
    header.push("Matched Skills".to_string());
    header.push("Missing Skills".to_string());
    table.set_header(header);

    for result in sort.apply(&batch.results) {
        let matched = preview_skills(&result.matched_skills, display.skill_preview);
        let missing = preview_skills(&result.missing_skills, display.skill_preview);
        let file = match &result.error {
            Some(error) => format!("{}\n({error})", result.file_name),
            None => result.file_name.clone(),
        };
        table.add_row(Row::from(vec![
            Cell::new(&result.candidate_name),
            Cell::new(file),
            Cell::new(score_text(result, display.bar_width)),
            recommendation_cell(result),
            Cell::new(matched.render("None")).fg(Color::Green),
            Cell::new(missing.render("None")).fg(Color::Red),
        ]));
    }

    let mut out = format!(
        "📊 Screening Results    Total: {} candidate(s)\n{table}",
        batch.results.len()
    );
    if let Some(message) = &batch.message {
        out.push('\n');
        out.push_str(message);
    }
    if batch.is_ai_powered() {
        out.push('\n');
        out.push_str(AI_BADGE);
    }
    out
}

pub fn render_history_entry(entry: &HistoryEntry, display: &DisplayConfig) -> String {
    let mut out = render_result_card(&entry.result, display);
    if let Some(id) = entry.result.id {
        out.push_str(&format!("\nScreening #{id}"));
    }
    if let Some(title) = &entry.job_title {
        out.push_str(&format!("\nJob: {title}"));
    }
    if let Some(at) = &entry.screened_at {
        out.push_str(&format!("\nScreened at: {at}"));
    }
    out
}

pub fn render_health(health: &HealthStatus) -> String {
    let model = if health.ai_model_loaded {
        "AI model loaded"
    } else {
        "AI model not loaded (keyword matching)"
    };
    let mut out = format!("{} [{}] - {model}", health.message, health.status);
    if let Some(ts) = &health.timestamp {
        out.push_str(&format!(" @ {ts}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Recommendation;
    use crate::view::SortOrder;

    fn result(name: &str, score: f64, rec: &str, matched: &[&str]) -> ScreeningResult {
        ScreeningResult {
            id: None,
            candidate_name: name.to_string(),
            file_name: format!("{}.pdf", name.to_lowercase()),
            match_score: Some(score),
            recommendation: Recommendation::parse(rec),
            matched_skills: matched.iter().map(|s| s.to_string()).collect(),
            missing_skills: Vec::new(),
            ai_powered: false,
            error: None,
        }
    }

    #[test]
    fn card_shows_empty_states_and_neutral_badge() {
        let card = render_result_card(&result("Mia", 61.0, "MAYBE", &[]), &DisplayConfig::default());
        assert!(card.contains("Mia"));
        assert!(card.contains("61%"));
        assert!(card.contains("📊 MAYBE"));
        assert!(card.contains("No matched skills"));
        assert!(card.contains("No missing skills"));
        assert!(!card.contains(AI_BADGE));
    }

    #[test]
    fn batch_table_orders_rows_and_truncates_skills() {
        let batch = BatchScreeningResult {
            results: vec![
                result("Bob", 55.0, "REVIEW", &[]),
                result("Alice", 92.0, "PASS", &["Python", "SQL", "Go", "Rust"]),
            ],
            ai_powered: Some(true),
            total_processed: Some(2),
            message: None,
        };
        let rendered = render_batch_table(
            &batch,
            &SortState::new(SortColumn::MatchScore, SortOrder::Desc),
            &DisplayConfig::default(),
        );
        assert!(rendered.contains("Total: 2 candidate(s)"));
        assert!(rendered.contains("Score ↓"));
        assert!(rendered.contains("+1 more"));
        assert!(rendered.contains(AI_BADGE));
        let alice = rendered.find("Alice").expect("alice row");
        let bob = rendered.find("Bob").expect("bob row");
        assert!(alice < bob);
    }

    #[test]
    fn health_line_reports_model_state() {
        let line = render_health(&HealthStatus {
            message: "Resume Screening System API".to_string(),
            status: "running".to_string(),
            ai_model_loaded: true,
            timestamp: None,
        });
        assert_eq!(line, "Resume Screening System API [running] - AI model loaded");
    }
}
