use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use pricing_core::ProductKey;
use pricing_infra::pricing_service::PriceLookup;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:store_id/:article_id", get(get_prices))
}

/// `GET /pricing/v1/prices/{store_id}/{article_id}?page=&size=`
///
/// - `200`: price envelope with the resolved timeline (`page`/`size` echoed in `meta`)
/// - `400`: blank store/article id, or non-integer `page`/`size`
/// - `404`: unknown product, or a product with no price records
/// - `500`: store failure, invalid stored row, or a strict-policy rejection
pub async fn get_prices(
    Extension(services): Extension<Arc<AppServices>>,
    Path((store_id, article_id)): Path<(String, String)>,
    query: Result<Query<dto::PriceQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    let key = match ProductKey::parse(&store_id, &article_id) {
        Ok(k) => k,
        Err(e) => return errors::bad_request(e.to_string()),
    };

    tracing::info!(
        store = %key.store_id,
        article = %key.article_id,
        page = query.page,
        size = query.size,
        "price request"
    );

    match services.get_prices(&key).await {
        Ok(PriceLookup::Found(sheet)) => (
            StatusCode::OK,
            Json(dto::price_envelope(&key, query, sheet, Utc::now())),
        )
            .into_response(),
        Ok(PriceLookup::NoPrices) => {
            tracing::warn!(store = %key.store_id, article = %key.article_id, "no prices found");
            errors::prices_not_found()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
