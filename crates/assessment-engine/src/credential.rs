//! Credential summary builder
//!
//! Pure fold over (profile, history, skill scores) into a shareable
//! snapshot. No state; empty inputs produce zeroed output.

use shared_types::{Analysis, CredentialSummary, Profile, SkillScore};

use crate::metrics::{average_compliance, compliance_trend, is_strong};

/// Build the presentable credential snapshot.
///
/// The user's declared primary jurisdiction is always the qualified
/// jurisdiction; there is no cross-jurisdiction code-equivalence logic.
pub fn build_credential(
    profile: &Profile,
    history: &[Analysis],
    skills: &[SkillScore],
) -> CredentialSummary {
    let (strong, developing): (Vec<&SkillScore>, Vec<&SkillScore>) =
        skills.iter().partition(|s| is_strong(s));

    CredentialSummary {
        total_analyses: history.len() as u32,
        average_compliance: average_compliance(history),
        trend: compliance_trend(history),
        strong_skills: strong.iter().map(|s| s.skill_name.clone()).collect(),
        developing_skills: developing.iter().map(|s| s.skill_name.clone()).collect(),
        qualified_jurisdictions: vec![profile.primary_jurisdiction.clone()],
    }
}
