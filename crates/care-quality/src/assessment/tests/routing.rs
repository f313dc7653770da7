use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::assessment::router::{batch_handler, price_estimate_handler, PriceEstimateRequest};
use crate::assessment::NoCache;
use crate::pricing::{AgeGroup, PricingPreferences};

fn json_request(uri: &str, payload: serde_json::Value) -> Request<axum::body::Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&payload).expect("serialize payload"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn rating_route_accepts_loose_profiles() {
    let payload = json!({
        "facility_id": "1490372",
        "name": "Little Oaks Learning Center",
        "high_risk": "1",
        "low_risk": -3,
        "medium_risk": null,
        "reviews": [{ "rating_value": 4.0 }, { "rating_value": "not a number" }],
        "as_of": "2025-06-01"
    });

    let response = router()
        .oneshot(json_request("/api/v1/facilities/rating", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["facility_id"], "1490372");
    assert_eq!(body["component_scores"]["review_count"], 1);
    assert_eq!(body["component_scores"]["violations"]["high_risk"], 1);
    assert_eq!(body["component_scores"]["violations"]["low_risk"], 0);
    assert!(body["stars"].as_str().is_some());
}

#[tokio::test]
async fn assessment_route_returns_rating_and_price() {
    let payload = json!({
        "profile": {
            "facility_id": "88213",
            "name": "Sunrise Kids Academy",
            "city": "Austin",
            "total_capacity": 60
        },
        "preferences": { "age_group": "preschool", "child_count": 3 }
    });

    let response = router()
        .oneshot(json_request("/api/v1/facilities/assessment", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["facility_id"], "88213");
    assert_eq!(body["rating"]["score"], 3.0);
    assert_eq!(body["price"]["final_price"], 3570);
}

#[tokio::test]
async fn assessment_route_omits_price_without_preferences() {
    let payload = json!({ "profile": { "facility_id": "88213", "name": "Sunrise Kids Academy" } });

    let response = router()
        .oneshot(json_request("/api/v1/facilities/assessment", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert!(body.get("price").is_none());
}

#[tokio::test]
async fn price_estimate_handler_applies_preferences() {
    let service = Arc::new(uncached_service());
    let request = PriceEstimateRequest {
        profile: profile("88213", "Sunrise Kids Academy"),
        preferences: PricingPreferences {
            age_group: Some(AgeGroup::Preschool),
            days_per_week: Some(3),
            ..PricingPreferences::default()
        },
    };

    let response = price_estimate_handler::<NoCache>(State(service), axum::Json(request)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["final_price"], 880);
    assert_eq!(body["adjustments"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn batch_handler_ranks_registry_rows() {
    let service = Arc::new(uncached_service());
    let export = "\
Operation ID,Operation Name,City,High Risk,Low Risk
100,Average Acres,Austin,1,0
,Missing Id,Austin,0,0
200,Top Tots,Dallas,0,0
";

    let response = batch_handler::<NoCache>(State(service), export.to_string())
        .await
        .expect("batch import succeeds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let rows = body.as_array().expect("array payload");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["facility_id"], "200");
    assert_eq!(rows[1]["facility_id"], "100");
    assert_eq!(rows[1]["total_violations"], 1);
}

#[tokio::test]
async fn batch_route_accepts_plain_text_bodies() {
    let response = router()
        .oneshot(
            Request::post("/api/v1/facilities/ratings/batch")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(axum::body::Body::from("Operation ID,Operation Name\n9,Solo\n"))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body[0]["name"], "Solo");
}

#[tokio::test]
async fn rating_route_rates_numeric_ids_and_null_lists() {
    let payload = json!({
        "facility_id": 1490372,
        "name": null,
        "programs_provided": "Montessori, Meals",
        "reviews": null
    });

    let response = router()
        .oneshot(json_request("/api/v1/facilities/rating", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["facility_id"], "1490372");
    assert_eq!(body["score"], 3.0);
}
