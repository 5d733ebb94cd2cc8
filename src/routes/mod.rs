use axum::{extract::State, http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{Explainer, Recommender},
};

pub mod build;
pub mod components;

// No complete build in the reference dataset costs less than $798
pub const DEFAULT_MIN_BUDGET: f64 = 800.0;
pub const DEFAULT_MAX_BUDGET: f64 = 10_000.0;
pub const DEFAULT_RECOMMEND_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_EXPLAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub explainer: Arc<dyn Explainer>,
    pub min_budget: f64,
    pub max_budget: f64,
    pub recommend_timeout: Duration,
    /// Deadline for the explanation; on expiry the template text is used
    pub explain_timeout: Duration,
}

impl AppState {
    pub fn new(recommender: Recommender, explainer: Arc<dyn Explainer>) -> Self {
        Self {
            recommender,
            explainer,
            min_budget: DEFAULT_MIN_BUDGET,
            max_budget: DEFAULT_MAX_BUDGET,
            recommend_timeout: DEFAULT_RECOMMEND_TIMEOUT,
            explain_timeout: DEFAULT_EXPLAIN_TIMEOUT,
        }
    }

    /// State with budget bounds and timeouts taken from the configuration
    pub fn from_config(
        config: &Config,
        recommender: Recommender,
        explainer: Arc<dyn Explainer>,
    ) -> Self {
        Self {
            min_budget: config.min_budget,
            max_budget: config.max_budget,
            recommend_timeout: config.recommend_timeout(),
            explain_timeout: config.explain_timeout(),
            ..Self::new(recommender, explainer)
        }
    }

    pub fn with_budget_range(mut self, min_budget: f64, max_budget: f64) -> Self {
        self.min_budget = min_budget;
        self.max_budget = max_budget;
        self
    }

    pub fn with_recommend_timeout(mut self, timeout: Duration) -> Self {
        self.recommend_timeout = timeout;
        self
    }

    pub fn with_explain_timeout(mut self, timeout: Duration) -> Self {
        self.explain_timeout = timeout;
        self
    }

    /// Rejects budgets that are not finite or fall outside the accepted range
    pub fn validate_budget(&self, budget: f64) -> AppResult<()> {
        if !budget.is_finite() {
            return Err(AppError::InvalidInput(
                "Budget must be a finite number".to_string(),
            ));
        }
        if budget < self.min_budget || budget > self.max_budget {
            return Err(AppError::InvalidInput(format!(
                "Budget must be between ${:.0} and ${:.0}",
                self.min_budget, self.max_budget
            )));
        }
        Ok(())
    }
}

/// Creates the application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/build", get(build::recommend_build))
        .route("/components/:part_type", get(components::component_options))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "PC build recommender: GET /v1/build?budget=<amount>&usage=<profile>",
        "version": "v1",
    }))
}

/// Health check endpoint, with the size of the loaded catalog
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "catalog_parts": state.recommender.catalog().len(),
        })),
    )
}
