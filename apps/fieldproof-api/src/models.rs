//! Request/response models for the FieldProof API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Analysis, CredentialSummary, RecheckResult, SkillScore, Trend, Violation};

use crate::error::ApiError;

/// Whether an analysis covered one photo or a before/after pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Single,
    BeforeAfter,
}

/// Request to analyze a work photo (or before/after pair)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub before_image: Option<String>,
    #[serde(default)]
    pub after_image: Option<String>,
    pub work_type: String,
    #[serde(default)]
    pub user_description: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

impl AnalyzeRequest {
    /// Resolve the submitted images into a mode, rejecting ambiguous or
    /// incomplete combinations.
    pub fn mode(&self) -> Result<AnalysisMode, ApiError> {
        match (&self.image, &self.before_image, &self.after_image) {
            (Some(_), None, None) => Ok(AnalysisMode::Single),
            (None, Some(_), Some(_)) => Ok(AnalysisMode::BeforeAfter),
            _ => Err(ApiError::InvalidRequest(
                "provide either image, or both beforeImage and afterImage".to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.work_type.trim().is_empty() {
            return Err(ApiError::InvalidRequest("workType is required".to_string()));
        }
        self.mode().map(|_| ())
    }
}

/// Response for a completed analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub mode: AnalysisMode,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: Analysis,
}

/// Request to recheck remediated work against the original violations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecheckRequest {
    pub original_image: String,
    pub fixed_image: String,
    /// The violation list being reconciled; must be non-empty
    pub original_violations: Vec<Violation>,
    /// When set, the recheck result is merged into this stored analysis
    #[serde(default)]
    pub analysis_id: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub user_description: Option<String>,
}

impl RecheckRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.original_image.trim().is_empty() || self.fixed_image.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "originalImage and fixedImage are required".to_string(),
            ));
        }
        if self.original_violations.is_empty() {
            return Err(ApiError::InvalidRequest(
                "originalViolations must be a non-empty array".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response for a completed recheck
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecheckResponse {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub jurisdiction: String,
    #[serde(flatten)]
    pub reconciliation: RecheckResult,
}

/// Dashboard aggregates derived from the full history at read time
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_analyses: u32,
    pub average_compliance: u8,
    pub trend: Trend,
    pub skills: Vec<SkillScore>,
}

/// Credential snapshot for sharing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    pub name: String,
    pub trade: String,
    #[serde(flatten)]
    pub summary: CredentialSummary,
}

/// Request to create or replace the profile
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: String,
    pub trade: String,
    pub primary_jurisdiction: String,
}

/// Query for the knowledge library
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub task_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_mode_resolution() {
        let single = AnalyzeRequest {
            image: Some("img".to_string()),
            before_image: None,
            after_image: None,
            work_type: "electrical".to_string(),
            user_description: None,
            jurisdiction: None,
        };
        assert_eq!(single.mode().unwrap(), AnalysisMode::Single);

        let pair = AnalyzeRequest {
            image: None,
            before_image: Some("b".to_string()),
            after_image: Some("a".to_string()),
            ..single.clone()
        };
        assert_eq!(pair.mode().unwrap(), AnalysisMode::BeforeAfter);

        let missing_after = AnalyzeRequest {
            image: None,
            before_image: Some("b".to_string()),
            after_image: None,
            ..single.clone()
        };
        assert!(missing_after.mode().is_err());

        let ambiguous = AnalyzeRequest {
            image: Some("img".to_string()),
            before_image: Some("b".to_string()),
            after_image: Some("a".to_string()),
            ..single
        };
        assert!(ambiguous.mode().is_err());
    }

    #[test]
    fn test_recheck_requires_violations() {
        let req = RecheckRequest {
            original_image: "before".to_string(),
            fixed_image: "after".to_string(),
            original_violations: vec![],
            analysis_id: None,
            jurisdiction: None,
            user_description: None,
        };
        assert!(req.validate().is_err());
    }
}
