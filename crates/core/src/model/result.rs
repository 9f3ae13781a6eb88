use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed percentage bands mapped to Austrian school grades.
///
/// Serialized as the full display label so the persisted history stays
/// readable and compatible with what earlier app versions wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeBand {
    #[serde(rename = "Note 1 (Sehr Gut)")]
    Note1,
    #[serde(rename = "Note 2 (Gut)")]
    Note2,
    #[serde(rename = "Note 3 (Befriedigend)")]
    Note3,
    #[serde(rename = "Note 4 (Genügend)")]
    Note4,
    #[serde(rename = "Note 5 (Nicht Genügend)")]
    Note5,
}

impl GradeBand {
    /// Maps a percentage to its band. Lower bounds are inclusive.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 91.0 {
            GradeBand::Note1
        } else if percentage >= 81.0 {
            GradeBand::Note2
        } else if percentage >= 67.0 {
            GradeBand::Note3
        } else if percentage >= 50.0 {
            GradeBand::Note4
        } else {
            GradeBand::Note5
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            GradeBand::Note1 => "Note 1 (Sehr Gut)",
            GradeBand::Note2 => "Note 2 (Gut)",
            GradeBand::Note3 => "Note 3 (Befriedigend)",
            GradeBand::Note4 => "Note 4 (Genügend)",
            GradeBand::Note5 => "Note 5 (Nicht Genügend)",
        }
    }

    /// Encouragement line shown next to the grade on the results screen.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            GradeBand::Note1 => "Hervorragend!",
            GradeBand::Note2 => "Starke Leistung!",
            GradeBand::Note3 => "Gut gemacht.",
            GradeBand::Note4 => "Bestanden, aber da ist noch Luft nach oben.",
            GradeBand::Note5 => "Das war leider nichts. Nutze den Lernmodus!",
        }
    }
}

/// Immutable outcome of one finished test session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub date: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub grade: GradeBand,
}

impl ExamResult {
    /// Builds a result from a raw score. Percentage is rounded to two
    /// decimals; an empty session counts as 0 percent.
    #[must_use]
    pub fn new(date: DateTime<Utc>, score: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            (f64::from(score) * 10_000.0 / f64::from(total)).round() / 100.0
        };
        Self {
            date,
            score,
            total,
            percentage,
            grade: GradeBand::from_percentage(percentage),
        }
    }
}
