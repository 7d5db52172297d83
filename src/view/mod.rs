pub mod badge;
pub mod skills;

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use crate::types::ScreeningResult;

pub use badge::{badge_for, Badge, BadgeTone};
pub use skills::{preview_skills, SkillPreview};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    CandidateName,
    FileName,
    MatchScore,
    Recommendation,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::CandidateName,
        SortColumn::FileName,
        SortColumn::MatchScore,
        SortColumn::Recommendation,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Self::CandidateName => "Candidate",
            Self::FileName => "File",
            Self::MatchScore => "Score",
            Self::Recommendation => "Recommendation",
        }
    }

    fn compare(&self, a: &ScreeningResult, b: &ScreeningResult) -> Ordering {
        match self {
            Self::CandidateName => a.candidate_name.cmp(&b.candidate_name),
            Self::FileName => a.file_name.cmp(&b.file_name),
            Self::MatchScore => a.sort_score().total_cmp(&b.sort_score()),
            Self::Recommendation => a.recommendation.as_str().cmp(b.recommendation.as_str()),
        }
    }
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let slug = match self {
            Self::CandidateName => "name",
            Self::FileName => "file",
            Self::MatchScore => "score",
            Self::Recommendation => "recommendation",
        };
        write!(f, "{slug}")
    }
}

#[derive(Debug, Error)]
#[error("unknown sort column: {0} (expected name, file, score or recommendation)")]
pub struct ColumnParseError(pub String);

impl FromStr for SortColumn {
    type Err = ColumnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "name" | "candidate" | "candidate_name" => Ok(Self::CandidateName),
            "file" | "file_name" => Ok(Self::FileName),
            "score" | "match_score" => Ok(Self::MatchScore),
            "recommendation" | "rec" => Ok(Self::Recommendation),
            _ => Err(ColumnParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown sort order: {0} (expected asc or desc)")]
pub struct OrderParseError(pub String);

impl FromStr for SortOrder {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(OrderParseError(s.to_string())),
        }
    }
}

/// View-local ordering of a result table. Never mutates the rows it sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::MatchScore,
            order: SortOrder::Desc,
        }
    }
}

impl SortState {
    pub fn new(column: SortColumn, order: SortOrder) -> Self {
        Self { column, order }
    }

    /// Header click: the active column flips direction, any other column
    /// becomes active in descending order.
    pub fn select(&mut self, column: SortColumn) {
        if self.column == column {
            self.order = self.order.flipped();
        } else {
            self.column = column;
            self.order = SortOrder::Desc;
        }
    }

    /// Row indices in display order. Equal keys keep their original relative
    /// order in both directions.
    pub fn order_indices(&self, rows: &[ScreeningResult]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        indices.sort_by(|&a, &b| {
            let primary = self.column.compare(&rows[a], &rows[b]);
            let primary = match self.order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary.then(a.cmp(&b))
        });
        indices
    }

    pub fn apply<'a>(&self, rows: &'a [ScreeningResult]) -> Vec<&'a ScreeningResult> {
        self.order_indices(rows)
            .into_iter()
            .map(|i| &rows[i])
            .collect()
    }

    pub fn header_label(&self, column: SortColumn) -> String {
        if self.column == column {
            format!("{} {}", column.header(), self.order.arrow())
        } else {
            column.header().to_string()
        }
    }
}

/// Score text as shown in cards and tables: whole numbers without decimals.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        None => "-".to_string(),
        Some(s) if s.fract() == 0.0 => format!("{s:.0}%"),
        Some(s) => {
            let text = format!("{s:.2}");
            format!("{}%", text.trim_end_matches('0').trim_end_matches('.'))
        }
    }
}

/// Proportional bar: the score clamped to 0..=100 and mapped linearly onto
/// `width` cells.
pub fn score_bar(score: Option<f64>, width: usize) -> String {
    let pct = score.unwrap_or(0.0).clamp(0.0, 100.0);
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
