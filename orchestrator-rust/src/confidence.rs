use regex::Regex;
use std::sync::LazyLock;

/// Percentages, dollar amounts, and "N million/billion" figures.
static FIGURES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:\.\d+)?\s*%|\$\s*\d|\d+(?:\.\d+)?\s*(?:million|billion)\b")
        .expect("figures regex is valid")
});

/// Heuristic quality score for generated text. Not a calibrated
/// probability: the result is a per-backend baseline plus fixed bonuses for
/// surface features, clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceScorer {
    /// Texts longer than this many characters earn `length_bonus`.
    pub length_threshold: usize,
    pub length_bonus: f64,
    /// Bonus for bullet markers (`•` or `-`).
    pub bullet_bonus: f64,
    /// Bonus for concrete figures (`20%`, `$10B`, `3 million`).
    pub figures_bonus: f64,
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self {
            length_threshold: 100,
            length_bonus: 0.05,
            bullet_bonus: 0.05,
            figures_bonus: 0.05,
        }
    }
}

impl ConfidenceScorer {
    #[must_use]
    pub fn score(&self, text: &str, baseline: f64) -> f64 {
        let mut score = baseline;

        if text.chars().count() > self.length_threshold {
            score += self.length_bonus;
        }
        if text.contains('•') || text.contains('-') {
            score += self.bullet_bonus;
        }
        if FIGURES.is_match(text) {
            score += self.figures_bonus;
        }

        score.clamp(0.0, 1.0)
    }
}
