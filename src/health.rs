//! Typed view of the pre-computed health assessment.
//!
//! The score is produced upstream; nothing here recomputes or adjusts it.
//! Values are only sorted into presentation tones.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Good,
    Fair,
    Weak,
    Poor,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    #[serde(default)]
    pub liquidity_score: Option<f64>,
    #[serde(default)]
    pub profitability_score: Option<f64>,
    #[serde(default)]
    pub solvency_score: Option<f64>,
    #[serde(default)]
    pub efficiency_score: Option<f64>,
    #[serde(default)]
    pub growth_score: Option<f64>,
    #[serde(default)]
    pub taxpayer_rating_score: Option<f64>,
}

impl ComponentScores {
    /// Labelled components that were reported, in display order.
    pub fn reported(&self) -> Vec<(&'static str, f64)> {
        [
            ("Liquidity", self.liquidity_score),
            ("Profitability", self.profitability_score),
            ("Solvency", self.solvency_score),
            ("Efficiency", self.efficiency_score),
            ("Growth", self.growth_score),
            ("Taxpayer Rating", self.taxpayer_rating_score),
        ]
        .into_iter()
        .filter_map(|(label, score)| score.map(|s| (label, s)))
        .collect()
    }
}

/// `GET /api/financial/{reg}/health-score` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub registration_number: String,
    #[serde(default)]
    pub assessment_date: Option<String>,
    pub health_score: f64,
    pub health_grade: String,
    pub risk_level: RiskLevel,
    #[serde(flatten)]
    pub components: ComponentScores,
    #[serde(default)]
    pub bankruptcy_risk: Option<f64>,
    #[serde(default)]
    pub altman_z_score: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub trend_direction: Option<String>,
    #[serde(default)]
    pub years_analyzed: u32,
}

impl HealthAssessment {
    pub fn score_tone(&self) -> Tone {
        score_tone(self.health_score)
    }

    pub fn grade_tone(&self) -> Tone {
        grade_tone(&self.health_grade)
    }

    pub fn risk_tone(&self) -> Tone {
        risk_tone(self.risk_level)
    }
}

pub fn score_tone(score: f64) -> Tone {
    if score >= 80.0 {
        Tone::Good
    } else if score >= 60.0 {
        Tone::Fair
    } else if score >= 40.0 {
        Tone::Weak
    } else {
        Tone::Poor
    }
}

pub fn grade_tone(grade: &str) -> Tone {
    match grade.trim().chars().next() {
        Some('A') => Tone::Good,
        Some('B') => Tone::Fair,
        Some('C') => Tone::Weak,
        Some('D') | Some('F') => Tone::Poor,
        _ => Tone::Neutral,
    }
}

pub fn risk_tone(risk: RiskLevel) -> Tone {
    match risk {
        RiskLevel::Low => Tone::Good,
        RiskLevel::Medium => Tone::Fair,
        RiskLevel::High => Tone::Weak,
        RiskLevel::Critical => Tone::Poor,
        RiskLevel::Unknown => Tone::Neutral,
    }
}
