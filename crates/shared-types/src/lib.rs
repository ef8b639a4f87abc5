pub mod types;

pub use types::{
    Analysis, CredentialSummary, KnowledgeClip, Profile, RecheckResult, ResolutionStatus,
    Severity, SkillEvidence, SkillScore, Trend, Violation, ViolationStatus,
};
