use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use std::{sync::Arc, time::Instant};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{BuildQuery, BuildResponse, CandidateSet, CompatibilityCheck, Recommendation, UsageProfile},
    routes::AppState,
    services::{ExplanationRequest, TemplateExplainer},
};

/// Handler for build recommendations
pub async fn recommend_build(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<BuildQuery>,
) -> AppResult<Json<BuildResponse>> {
    let budget = query.budget;
    state.validate_budget(budget)?;

    let usage = match query.usage.parse::<UsageProfile>() {
        Ok(usage) => usage,
        Err(e) => {
            tracing::info!(request_id = %request_id, error = %e, "Falling back to gaming profile");
            UsageProfile::default()
        }
    };

    tracing::info!(
        request_id = %request_id,
        budget,
        usage = %usage,
        "Processing build request"
    );

    let started = Instant::now();
    let recommender = state.recommender.clone();
    let task = tokio::task::spawn_blocking(move || recommender.recommend(budget, usage));

    let Recommendation { build, candidates } =
        match tokio::time::timeout(state.recommend_timeout, task).await {
            Ok(joined) => joined
                .map_err(|e| AppError::Internal(format!("Recommendation task failed: {}", e)))?,
            Err(_) => {
                tracing::error!(request_id = %request_id, budget, "Recommendation timed out");
                return Err(AppError::Timeout(state.recommend_timeout.as_millis()));
            }
        };

    let elapsed_ms = started.elapsed().as_millis() as u64;

    let Some(build) = build else {
        tracing::info!(
            request_id = %request_id,
            budget,
            missing = ?candidates.missing_types(),
            elapsed_ms,
            "No build fits the budget"
        );
        return Err(no_build_error(budget, &candidates));
    };

    tracing::info!(
        request_id = %request_id,
        total_cost = build.total_price(),
        score = build.score,
        combinations = candidates.combination_count(),
        elapsed_ms,
        "Build selected"
    );

    let request = ExplanationRequest {
        budget,
        usage,
        build,
    };
    let explained = tokio::time::timeout(state.explain_timeout, state.explainer.explain(&request))
        .await
        .unwrap_or_else(|_| Err(AppError::Timeout(state.explain_timeout.as_millis())));

    let explanation = match explained {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                explainer = state.explainer.name(),
                error = %e,
                "Explanation failed, using template"
            );
            TemplateExplainer::render(&request)
        }
    };

    let build = request.build;
    Ok(Json(BuildResponse {
        compatibility: CompatibilityCheck::from(&build),
        total_cost: build.total_price(),
        score: build.score,
        build: build.parts,
        explanation,
        usage,
        budget,
        candidates,
        generated_at: Utc::now(),
    }))
}

fn no_build_error(budget: f64, candidates: &CandidateSet) -> AppError {
    let missing = candidates.missing_types();
    if missing.is_empty() {
        return AppError::NoBuild(format!(
            "No compatible build fits a budget of ${:.2}; try a higher budget",
            budget
        ));
    }

    let labels: Vec<&str> = missing.iter().map(|t| t.label()).collect();
    AppError::NoBuild(format!(
        "No compatible build fits a budget of ${:.2}: nothing affordable for {}; try a higher budget",
        budget,
        labels.join(", ")
    ))
}
