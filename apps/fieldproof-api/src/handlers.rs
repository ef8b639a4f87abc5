//! HTTP handlers for the FieldProof API

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use assessment_engine::{AnalysisContext, AssessmentEngine};
use shared_types::{Analysis, KnowledgeClip, Profile, Violation};

use crate::error::ApiError;
use crate::inference::{AnalyzeCall, RecheckCall};
use crate::knowledge::builtin_clips;
use crate::models::*;
use crate::state::AppState;
use crate::store;

const DEFAULT_JURISDICTION: &str = "unspecified";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "fieldproof-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn resolve_jurisdiction(
    state: &AppState,
    requested: Option<String>,
) -> Result<String, ApiError> {
    if let Some(j) = requested.filter(|j| !j.trim().is_empty()) {
        return Ok(j);
    }
    Ok(store::get_profile(&state.db)
        .await?
        .map(|p| p.primary_jurisdiction)
        .unwrap_or_else(|| DEFAULT_JURISDICTION.to_string()))
}

/// Handler: POST /api/analyze
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    req.validate()?;
    let mode = req.mode()?;
    let jurisdiction = resolve_jurisdiction(&state, req.jurisdiction.clone()).await?;

    let (images, photo_url, fixed_photo_url) = match mode {
        AnalysisMode::Single => {
            let image = req.image.clone().unwrap_or_default();
            (vec![image.clone()], image, None)
        }
        AnalysisMode::BeforeAfter => {
            let before = req.before_image.clone().unwrap_or_default();
            let after = req.after_image.clone().unwrap_or_default();
            (vec![before.clone(), after.clone()], before, Some(after))
        }
    };

    let payload = state
        .inference
        .analyze(AnalyzeCall {
            images,
            work_type: req.work_type.clone(),
            user_description: req.user_description.clone(),
            jurisdiction: jurisdiction.clone(),
        })
        .await?;

    let engine = AssessmentEngine::new();
    let mut analysis = engine.analyze_findings(
        AnalysisContext {
            jurisdiction,
            work_type: req.work_type,
            photo_url,
        },
        payload,
    )?;
    analysis.fixed_photo_url = fixed_photo_url;

    store::insert_analysis(&state.db, &analysis).await?;

    tracing::info!(
        "Created analysis {} ({} violations, score {})",
        analysis.id,
        analysis.violations.len(),
        analysis.compliance_score
    );

    Ok(Json(AnalyzeResponse {
        mode,
        timestamp: analysis.created_at,
        analysis,
    }))
}

/// Handler: POST /api/recheck
pub async fn recheck(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecheckRequest>,
) -> Result<Json<RecheckResponse>, ApiError> {
    req.validate()?;
    let jurisdiction = resolve_jurisdiction(&state, req.jurisdiction.clone()).await?;

    // When a stored analysis is referenced, its violation list is the
    // authoritative one; the request copy only covers detached clients.
    let stored: Option<Analysis> = match &req.analysis_id {
        Some(id) => Some(
            store::get_analysis(&state.db, id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("analysis {}", id)))?,
        ),
        None => None,
    };
    let original: &[Violation] = stored
        .as_ref()
        .map(|a| a.violations.as_slice())
        .unwrap_or(&req.original_violations);

    let payload = state
        .inference
        .recheck(RecheckCall {
            original_violations: original.to_vec(),
            original_image: req.original_image.clone(),
            fixed_image: req.fixed_image.clone(),
            user_description: req.user_description.clone(),
            jurisdiction: jurisdiction.clone(),
        })
        .await?;

    let engine = AssessmentEngine::new();
    let outcome = engine.reconcile_recheck(original, payload)?;

    for entry in &outcome.discarded_entries {
        tracing::warn!(
            "Recheck entry matched no original violation, discarding: {:?}",
            entry
        );
    }

    if let Some(mut analysis) = stored {
        engine.merge_recheck(
            &mut analysis,
            outcome.result.clone(),
            Some(req.fixed_image.clone()),
        );
        store::update_analysis(&state.db, &analysis).await?;
        tracing::info!(
            "Merged recheck into analysis {} (fix score {})",
            analysis.id,
            outcome.result.compliance_score
        );
    }

    Ok(Json(RecheckResponse {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        jurisdiction,
        reconciliation: outcome.result,
    }))
}

/// Handler: GET /api/analyses
pub async fn list_analyses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Analysis>>, ApiError> {
    Ok(Json(store::list_analyses(&state.db).await?))
}

/// Handler: GET /api/analyses/:id
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Analysis>, ApiError> {
    store::get_analysis(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("analysis {}", id)))
}

/// Handler: GET /api/analyses/:id/clips
///
/// Knowledge clips relevant to one analysis's work type and violations.
pub async fn analysis_clips(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<KnowledgeResponse>, ApiError> {
    let analysis = store::get_analysis(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("analysis {}", id)))?;

    let corpus = builtin_clips();
    let engine = AssessmentEngine::new();
    let clips: Vec<KnowledgeClip> = engine
        .relevant_clips(&analysis.work_type, &analysis.violations, &corpus)
        .into_iter()
        .cloned()
        .collect();

    let count = clips.len();
    Ok(Json(KnowledgeResponse { clips, count }))
}

/// Handler: GET /api/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let history = store::list_analyses(&state.db).await?;
    let engine = AssessmentEngine::new();

    Ok(Json(DashboardResponse {
        total_analyses: history.len() as u32,
        average_compliance: engine.average_compliance(&history),
        trend: engine.compliance_trend(&history),
        skills: engine.skill_scores(&history),
    }))
}

/// Handler: GET /api/credential
pub async fn credential(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CredentialResponse>, ApiError> {
    let profile = store::get_profile(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile".to_string()))?;

    let history = store::list_analyses(&state.db).await?;
    let engine = AssessmentEngine::new();
    let skills = engine.skill_scores(&history);
    let summary = engine.build_credential(&profile, &history, &skills);

    Ok(Json(CredentialResponse {
        name: profile.name,
        trade: profile.trade,
        summary,
    }))
}

/// Handler: GET /api/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<Profile>>, ApiError> {
    Ok(Json(store::get_profile(&state.db).await?))
}

/// Handler: PUT /api/profile
pub async fn put_profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    if req.name.trim().is_empty() || req.primary_jurisdiction.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "name and primaryJurisdiction are required".to_string(),
        ));
    }

    let existing = store::get_profile(&state.db).await?;
    let profile = Profile {
        id: existing
            .map(|p| p.id)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        name: req.name,
        trade: req.trade,
        primary_jurisdiction: req.primary_jurisdiction,
    };
    store::put_profile(&state.db, &profile).await?;

    Ok(Json(profile))
}

/// Knowledge library response
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeResponse {
    pub clips: Vec<KnowledgeClip>,
    pub count: usize,
}

/// Handler: GET /api/knowledge
pub async fn knowledge(
    Query(query): Query<KnowledgeQuery>,
) -> Result<Json<KnowledgeResponse>, ApiError> {
    let corpus = builtin_clips();

    let narrowed: Vec<KnowledgeClip> = match &query.task_type {
        Some(task_type) => assessment_engine::relevance::for_task_type(&corpus, task_type)
            .cloned()
            .collect(),
        None => corpus,
    };

    let clips: Vec<KnowledgeClip> = match &query.q {
        Some(q) if !q.trim().is_empty() => {
            let keywords: Vec<String> = q
                .split_whitespace()
                .map(|w| w.to_lowercase())
                .collect();
            assessment_engine::relevance::matching_clips(keywords, &narrowed)
                .cloned()
                .collect()
        }
        _ => narrowed,
    };

    let count = clips.len();
    Ok(Json(KnowledgeResponse { clips, count }))
}
