//! Trust-boundary decode of inference findings and Analysis construction
//!
//! The vision model returns loosely structured JSON. Everything crossing
//! into the engine goes through a strict serde decode that fails closed
//! with `EngineError::UpstreamParse` on any shape mismatch, instead of
//! picking optional fields out of a raw value downstream.

use chrono::Utc;
use serde::Deserialize;
use shared_types::{Analysis, Severity, SkillEvidence, Violation};
use uuid::Uuid;

use crate::error::EngineError;

/// Raw findings payload for a single photo, as produced by the inference
/// collaborator. Field names follow the inference wire contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFindings {
    pub violations: Vec<RawViolation>,
    #[serde(default)]
    pub correct_items: Vec<String>,
    #[serde(default)]
    pub skills_demonstrated: Vec<RawSkill>,
    /// Integer-ish; may fall slightly out of [0,100] due to rounding
    pub compliance_score: i64,
    /// The model's own verdict. Decoded for contract completeness but the
    /// engine recomputes compliance from violation severity.
    #[serde(default)]
    pub is_compliant: Option<bool>,
    pub overall_assessment: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawViolation {
    pub description: String,
    pub code_section: String,
    pub severity: Severity,
    pub fix_instruction: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSkill {
    pub skill: String,
    #[serde(default)]
    pub evidence: Option<String>,
}

/// Caller-supplied context for one analysis request
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub jurisdiction: String,
    pub work_type: String,
    pub photo_url: String,
}

/// Decode a raw inference response, failing closed on shape mismatch
pub fn decode_findings(value: serde_json::Value) -> Result<RawFindings, EngineError> {
    serde_json::from_value(value).map_err(|e| EngineError::UpstreamParse(e.to_string()))
}

/// Clamp an untrusted score into [0,100]. Out-of-range values are clamped,
/// not rejected.
pub fn clamp_score(score: i64) -> u8 {
    score.clamp(0, 100) as u8
}

/// Build an Analysis from decoded findings.
///
/// `work_type` must be non-empty (caller input). The assessment text and
/// every violation's description/code section must be non-empty (payload
/// contract). `is_compliant` is always recomputed from violation severity;
/// the payload's own flag is never trusted, because downstream consumers
/// gate on this derived field.
pub fn build_analysis(ctx: AnalysisContext, raw: RawFindings) -> Result<Analysis, EngineError> {
    if ctx.work_type.trim().is_empty() {
        return Err(EngineError::Validation("workType is required".to_string()));
    }
    if raw.overall_assessment.trim().is_empty() {
        return Err(EngineError::UpstreamParse(
            "overallAssessment is empty".to_string(),
        ));
    }

    let mut violations = Vec::with_capacity(raw.violations.len());
    for v in raw.violations {
        if v.description.trim().is_empty() || v.code_section.trim().is_empty() {
            return Err(EngineError::UpstreamParse(
                "violation with empty description or code section".to_string(),
            ));
        }
        violations.push(Violation {
            description: v.description,
            code_section: v.code_section,
            severity: v.severity,
            fix_instruction: v.fix_instruction,
        });
    }

    let is_compliant = !violations.iter().any(Violation::is_critical);

    Ok(Analysis {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        jurisdiction: ctx.jurisdiction,
        work_type: ctx.work_type,
        photo_url: ctx.photo_url,
        violations,
        correct_items: raw.correct_items,
        skills_demonstrated: raw
            .skills_demonstrated
            .into_iter()
            .map(|s| SkillEvidence {
                skill: s.skill,
                evidence: s.evidence,
            })
            .collect(),
        compliance_score: clamp_score(raw.compliance_score),
        is_compliant,
        overall_assessment: raw.overall_assessment,
        fixed_photo_url: None,
        fix_verified: None,
        fix_compliance_score: None,
        fix_analysis: None,
    })
}
