use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a single code violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Moderate,
    Critical,
}

/// One non-conformance found in a work photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// What is wrong, in plain language
    pub description: String,
    /// Code section identifier, e.g. "NEC 210.8(A)" (opaque to this system)
    pub code_section: String,
    pub severity: Severity,
    /// How to fix it, in plain language
    pub fix_instruction: String,
}

impl Violation {
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// A skill the photo demonstrated, with optional supporting evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEvidence {
    pub skill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

/// One compliance assessment of a photographed work item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub jurisdiction: String,
    pub work_type: String,
    pub photo_url: String,
    pub violations: Vec<Violation>,
    pub correct_items: Vec<String>,
    pub skills_demonstrated: Vec<SkillEvidence>,
    /// 0-100, clamped at the decode boundary
    pub compliance_score: u8,
    /// Derived: true iff no critical violation. Never trusted from upstream.
    pub is_compliant: bool,
    pub overall_assessment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_compliance_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_analysis: Option<RecheckResult>,
}

impl Analysis {
    /// Whether any critical violation is present in the original findings
    pub fn has_critical(&self) -> bool {
        self.violations.iter().any(Violation::is_critical)
    }
}

/// Resolution state of one original violation after a recheck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Resolved,
    Unresolved,
    PartiallyResolved,
}

/// Per-violation outcome of a recheck, keyed by the original description text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationStatus {
    pub description: String,
    pub status: ResolutionStatus,
}

/// Outcome of reconciling an original analysis against a follow-up photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecheckResult {
    /// Exactly one entry per original violation, in the original order
    pub original_violation_status: Vec<ViolationStatus>,
    /// Issues absent from the original list, verbatim from the follow-up
    pub new_violations_found: Vec<String>,
    /// Computed fresh from the follow-up photo, independent of the original
    pub compliance_score: u8,
    pub is_compliant: bool,
}

impl RecheckResult {
    pub fn all_resolved(&self) -> bool {
        self.original_violation_status
            .iter()
            .all(|s| s.status == ResolutionStatus::Resolved)
    }
}

/// Direction of a compliance or skill metric over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Stable => write!(f, "stable"),
            Trend::Declining => write!(f, "declining"),
        }
    }
}

/// Aggregate proficiency for one named skill across the analysis history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillScore {
    pub skill_name: String,
    pub score: u8,
    pub total_instances: u32,
    pub trend: Trend,
}

/// Expert-authored guidance note, retrievable by keyword relevance.
/// Immutable curated reference data, not user-generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeClip {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub task_type: String,
    pub trigger_keywords: Vec<String>,
}

/// Tradesperson profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub trade: String,
    pub primary_jurisdiction: String,
}

/// Shareable snapshot of a user's compliance track record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub total_analyses: u32,
    pub average_compliance: u8,
    pub trend: Trend,
    pub strong_skills: Vec<String>,
    pub developing_skills: Vec<String>,
    pub qualified_jurisdictions: Vec<String>,
}
