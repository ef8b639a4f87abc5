//! Longitudinal metrics over an analysis history
//!
//! All functions take the history ordered by recency, newest first, and
//! are pure recomputations. Expected history sizes are tens to low
//! hundreds of records, so nothing here is incremental or cached.

use shared_types::{Analysis, SkillScore, Trend};
use std::collections::HashMap;

/// Window size for the recent/old trend comparison
const TREND_WINDOW: usize = 3;

/// Minimum history length before a trend is classified; below this the
/// signal is insufficient and the trend is always stable.
const MIN_TREND_HISTORY: usize = 4;

/// Score-point gap between the recent and old windows required to call a
/// direction.
const TREND_BAND: f64 = 5.0;

/// Skills at or above this score present as "strong"; below it,
/// "developing". Fixed policy constant, not configurable per user.
pub const STRONG_SKILL_THRESHOLD: u8 = 85;

fn mean(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64
}

/// Classify the direction of a newest-first score sequence.
///
/// Compares the mean of the up-to-3 most recent scores against the mean of
/// the up-to-3 oldest. A gap above 5 points in either direction calls the
/// trend; anything else, or a history shorter than 4, is stable.
pub fn classify_trend(scores: &[u8]) -> Trend {
    if scores.len() < MIN_TREND_HISTORY {
        return Trend::Stable;
    }
    let recent = mean(&scores[..TREND_WINDOW.min(scores.len())]);
    let old = mean(&scores[scores.len().saturating_sub(TREND_WINDOW)..]);

    if recent - old > TREND_BAND {
        Trend::Improving
    } else if old - recent > TREND_BAND {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Arithmetic mean of all compliance scores, rounded to nearest integer.
/// An empty portfolio is a valid state and averages to 0.
pub fn average_compliance(history: &[Analysis]) -> u8 {
    if history.is_empty() {
        return 0;
    }
    mean(&scores_of(history)).round() as u8
}

/// Compliance scores of a history, newest first
pub fn scores_of(history: &[Analysis]) -> Vec<u8> {
    history.iter().map(|a| a.compliance_score).collect()
}

/// Overall compliance trend across the full history
pub fn compliance_trend(history: &[Analysis]) -> Trend {
    classify_trend(&scores_of(history))
}

/// Aggregate per-skill proficiency across the history.
///
/// For each distinct skill name appearing in `skills_demonstrated`:
/// `total_instances` counts the analyses naming it, `score` is a
/// recency-weighted average of those analyses' compliance scores (linear
/// weights, newest heaviest), and `trend` applies the trend classifier to
/// the skill's own score sub-sequence. Output is sorted by descending
/// score, then name, for stable presentation.
pub fn aggregate_skills(history: &[Analysis]) -> Vec<SkillScore> {
    // Skill name -> newest-first compliance scores of analyses naming it
    let mut sub_scores: HashMap<String, Vec<u8>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for analysis in history {
        let mut seen_here: std::collections::HashSet<&str> = std::collections::HashSet::new();
        for evidence in &analysis.skills_demonstrated {
            let name = evidence.skill.trim();
            if name.is_empty() || !seen_here.insert(name) {
                continue;
            }
            let entry = sub_scores.entry(name.to_string()).or_default();
            if entry.is_empty() {
                order.push(name.to_string());
            }
            entry.push(analysis.compliance_score);
        }
    }

    let mut skills: Vec<SkillScore> = order
        .into_iter()
        .map(|name| {
            let scores = &sub_scores[&name];
            SkillScore {
                score: recency_weighted(scores),
                total_instances: scores.len() as u32,
                trend: classify_trend(scores),
                skill_name: name,
            }
        })
        .collect();

    skills.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.skill_name.cmp(&b.skill_name))
    });
    skills
}

/// Linear recency weighting over a newest-first score sequence: with n
/// entries the newest carries weight n and the oldest weight 1.
fn recency_weighted(scores: &[u8]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let n = scores.len();
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (i, &score) in scores.iter().enumerate() {
        let weight = (n - i) as f64;
        weighted += weight * f64::from(score);
        total += weight;
    }
    (weighted / total).round() as u8
}

/// Strong/developing partition at the fixed threshold
pub fn is_strong(skill: &SkillScore) -> bool {
    skill.score >= STRONG_SKILL_THRESHOLD
}
