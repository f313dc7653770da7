use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use super::cache::RatingCache;
use super::service::FacilityAssessmentService;
use crate::error::AppError;
use crate::facility::{coerce, FacilityCsvImporter, FacilityProfile};
use crate::pricing::PricingPreferences;

#[derive(Debug, Deserialize)]
pub(crate) struct RatingRequest {
    #[serde(flatten)]
    pub profile: FacilityProfile,
    #[serde(default, deserialize_with = "coerce::optional_date")]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PriceEstimateRequest {
    pub profile: FacilityProfile,
    #[serde(default)]
    pub preferences: PricingPreferences,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentRequest {
    pub profile: FacilityProfile,
    #[serde(default)]
    pub preferences: Option<PricingPreferences>,
    #[serde(default, deserialize_with = "coerce::optional_date")]
    pub as_of: Option<NaiveDate>,
}

/// Router builder exposing the rating, pricing and batch listing endpoints.
pub fn assessment_router<C>(service: Arc<FacilityAssessmentService<C>>) -> Router
where
    C: RatingCache + 'static,
{
    Router::new()
        .route("/api/v1/facilities/rating", post(rating_handler::<C>))
        .route(
            "/api/v1/facilities/price-estimate",
            post(price_estimate_handler::<C>),
        )
        .route("/api/v1/facilities/assessment", post(assessment_handler::<C>))
        .route("/api/v1/facilities/ratings/batch", post(batch_handler::<C>))
        .with_state(service)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) async fn rating_handler<C>(
    State(service): State<Arc<FacilityAssessmentService<C>>>,
    axum::Json(request): axum::Json<RatingRequest>,
) -> Response
where
    C: RatingCache + 'static,
{
    let as_of = request.as_of.unwrap_or_else(today);
    let rating = service.rate(&request.profile, Some(as_of));
    (StatusCode::OK, axum::Json(rating)).into_response()
}

pub(crate) async fn price_estimate_handler<C>(
    State(service): State<Arc<FacilityAssessmentService<C>>>,
    axum::Json(request): axum::Json<PriceEstimateRequest>,
) -> Response
where
    C: RatingCache + 'static,
{
    let estimate = service.estimate(&request.profile, &request.preferences);
    (StatusCode::OK, axum::Json(estimate)).into_response()
}

pub(crate) async fn assessment_handler<C>(
    State(service): State<Arc<FacilityAssessmentService<C>>>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    C: RatingCache + 'static,
{
    let as_of = request.as_of.unwrap_or_else(today);
    let assessment = service.assess(
        &request.profile,
        request.preferences.as_ref(),
        Some(as_of),
    );
    (StatusCode::OK, axum::Json(assessment)).into_response()
}

pub(crate) async fn batch_handler<C>(
    State(service): State<Arc<FacilityAssessmentService<C>>>,
    body: String,
) -> Result<Response, AppError>
where
    C: RatingCache + 'static,
{
    let profiles = FacilityCsvImporter::from_reader(body.as_bytes())?;
    let rows = service.rate_listing(&profiles, Some(today()));
    Ok((StatusCode::OK, axum::Json(rows)).into_response())
}
