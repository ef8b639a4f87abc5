//! Recheck reconciliation
//!
//! Maps an original violation list plus a follow-up photo's reconciliation
//! payload into per-violation resolution status and a fresh compliance
//! score. The join key is the literal description text: an original with
//! no matching entry defaults to unresolved (absence of evidence is not
//! evidence of resolution), and entries matching no original are discarded
//! with a warning signal for the caller to log.

use serde::Deserialize;
use shared_types::{
    Analysis, RecheckResult, ResolutionStatus, Violation, ViolationStatus,
};
use std::collections::HashMap;

use crate::error::EngineError;
use crate::findings::clamp_score;
use crate::patterns::contains_critical_language;

/// Raw reconciliation payload from the recheck inference call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReconciliation {
    pub original_violation_status: Vec<RawStatusEntry>,
    #[serde(default)]
    pub new_violations_found: Vec<String>,
    pub compliance_score: i64,
    /// The model's compliance verdict for the follow-up photo. When present
    /// it is authoritative; the engine only derives a fallback.
    #[serde(default)]
    pub is_compliant: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatusEntry {
    pub original_description: String,
    pub status: ResolutionStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Reconciliation output: the result to merge plus any payload entries
/// that matched no original violation (upstream contract mismatch, to be
/// logged by the boundary layer).
#[derive(Debug, Clone)]
pub struct RecheckOutcome {
    pub result: RecheckResult,
    pub discarded_entries: Vec<String>,
}

/// Decode a raw recheck response, failing closed on shape mismatch
pub fn decode_reconciliation(value: serde_json::Value) -> Result<RawReconciliation, EngineError> {
    serde_json::from_value(value).map_err(|e| EngineError::UpstreamParse(e.to_string()))
}

/// Reconcile the original violations against a follow-up payload.
///
/// The output status list is a total reconciliation: exactly one entry per
/// original violation, in the original order. A count mismatch is a
/// data-integrity fault and is signalled, never silently truncated.
pub fn reconcile(
    original: &[Violation],
    raw: RawReconciliation,
) -> Result<RecheckOutcome, EngineError> {
    let mut by_description: HashMap<&str, ResolutionStatus> = HashMap::new();
    for entry in &raw.original_violation_status {
        // First entry wins on duplicate descriptions
        by_description
            .entry(entry.original_description.as_str())
            .or_insert(entry.status);
    }

    let statuses: Vec<ViolationStatus> = original
        .iter()
        .map(|v| ViolationStatus {
            description: v.description.clone(),
            status: by_description
                .get(v.description.as_str())
                .copied()
                .unwrap_or(ResolutionStatus::Unresolved),
        })
        .collect();

    if statuses.len() != original.len() {
        return Err(EngineError::ReconciliationMismatch {
            expected: original.len(),
            actual: statuses.len(),
        });
    }

    let known: std::collections::HashSet<&str> =
        original.iter().map(|v| v.description.as_str()).collect();
    let discarded_entries: Vec<String> = raw
        .original_violation_status
        .iter()
        .filter(|e| !known.contains(e.original_description.as_str()))
        .map(|e| e.original_description.clone())
        .collect();

    let all_resolved = statuses
        .iter()
        .all(|s| s.status == ResolutionStatus::Resolved);

    // Upstream verdict is authoritative when supplied; otherwise require
    // every original resolved and no critical-sounding new finding.
    let is_compliant = raw.is_compliant.unwrap_or_else(|| {
        all_resolved
            && !raw
                .new_violations_found
                .iter()
                .any(|d| contains_critical_language(d))
    });

    Ok(RecheckOutcome {
        result: RecheckResult {
            original_violation_status: statuses,
            new_violations_found: raw.new_violations_found,
            compliance_score: clamp_score(raw.compliance_score),
            is_compliant,
        },
        discarded_entries,
    })
}

/// Produce the complete replacement values for an Analysis's recheck
/// fields. The caller performs the write; a single write keeps the merge
/// atomic with respect to readers of the same record. A new recheck
/// replaces any prior one.
pub fn merge_recheck(
    analysis: &mut Analysis,
    result: RecheckResult,
    fixed_photo_url: Option<String>,
) {
    analysis.fix_verified = Some(result.is_compliant);
    analysis.fix_compliance_score = Some(result.compliance_score);
    if fixed_photo_url.is_some() {
        analysis.fixed_photo_url = fixed_photo_url;
    }
    analysis.fix_analysis = Some(result);
}
