use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{ComponentOptionsQuery, ComponentOptionsResponse, PartType},
    routes::AppState,
    services::recommender::DEFAULT_OPTIONS_LIMIT,
};

const MAX_OPTIONS_LIMIT: usize = 50;

/// Handler listing the best-scoring parts of one type
pub async fn component_options(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(part_type): Path<String>,
    Query(query): Query<ComponentOptionsQuery>,
) -> AppResult<Json<ComponentOptionsResponse>> {
    let component_type: PartType = part_type
        .parse()
        .map_err(|e: crate::models::UnknownPartType| AppError::InvalidInput(e.to_string()))?;

    if let Some(max_price) = query.max_price {
        if !max_price.is_finite() || max_price < 0.0 {
            return Err(AppError::InvalidInput(
                "max_price must be a non-negative number".to_string(),
            ));
        }
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_OPTIONS_LIMIT)
        .clamp(1, MAX_OPTIONS_LIMIT);

    let options = state
        .recommender
        .component_options(component_type, query.max_price, limit);

    tracing::debug!(
        request_id = %request_id,
        component_type = %component_type,
        count = options.len(),
        "Listed component options"
    );

    Ok(Json(ComponentOptionsResponse {
        component_type,
        max_price: query.max_price,
        options,
    }))
}
