pub mod credential;
pub mod error;
pub mod findings;
pub mod metrics;
pub mod patterns;
pub mod recheck;
pub mod relevance;

pub use error::EngineError;
pub use findings::{AnalysisContext, RawFindings};
pub use recheck::{RawReconciliation, RecheckOutcome};

use shared_types::{
    Analysis, CredentialSummary, KnowledgeClip, Profile, RecheckResult, SkillScore, Trend,
    Violation,
};

/// AssessmentEngine entry point
///
/// Synchronous, pure-function transformations over in-memory values: the
/// analysis lifecycle, recheck reconciliation, and the derived metrics a
/// dashboard or credential reads. Persistence and the vision-model calls
/// live with the caller.
pub struct AssessmentEngine;

impl AssessmentEngine {
    pub fn new() -> Self {
        Self
    }

    /// Decode a raw findings payload and construct the Analysis record
    pub fn analyze_findings(
        &self,
        ctx: AnalysisContext,
        payload: serde_json::Value,
    ) -> Result<Analysis, EngineError> {
        let raw = findings::decode_findings(payload)?;
        findings::build_analysis(ctx, raw)
    }

    /// Reconcile an original violation list against a recheck payload
    pub fn reconcile_recheck(
        &self,
        original: &[Violation],
        payload: serde_json::Value,
    ) -> Result<RecheckOutcome, EngineError> {
        let raw = recheck::decode_reconciliation(payload)?;
        recheck::reconcile(original, raw)
    }

    /// Merge a recheck result into its parent Analysis, replacing any
    /// prior recheck. The caller persists the updated record.
    pub fn merge_recheck(
        &self,
        analysis: &mut Analysis,
        result: RecheckResult,
        fixed_photo_url: Option<String>,
    ) {
        recheck::merge_recheck(analysis, result, fixed_photo_url)
    }

    /// Overall compliance trend over a newest-first history
    pub fn compliance_trend(&self, history: &[Analysis]) -> Trend {
        metrics::compliance_trend(history)
    }

    pub fn average_compliance(&self, history: &[Analysis]) -> u8 {
        metrics::average_compliance(history)
    }

    pub fn skill_scores(&self, history: &[Analysis]) -> Vec<SkillScore> {
        metrics::aggregate_skills(history)
    }

    pub fn build_credential(
        &self,
        profile: &Profile,
        history: &[Analysis],
        skills: &[SkillScore],
    ) -> CredentialSummary {
        credential::build_credential(profile, history, skills)
    }

    /// Clips relevant to an analysis context, in corpus order
    pub fn relevant_clips<'a>(
        &self,
        work_type: &str,
        violations: &[Violation],
        corpus: &'a [KnowledgeClip],
    ) -> Vec<&'a KnowledgeClip> {
        let keywords = relevance::context_keywords(work_type, violations);
        relevance::matching_clips(keywords, corpus).collect()
    }
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self::new()
    }
}
