//! End-to-end tests over the in-memory store: the full router, middleware
//! included, exercised with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use api_rest::auth::{DEV_FALLBACK_USER, USER_ID_HEADER};
use api_rest::{app, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use medrec_core::repositories::MemoryStore;
use medrec_core::Profile;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn dev_app() -> Router {
    app(AppState::from_store(Arc::new(MemoryStore::new()), Profile::Dev))
}

fn prod_app() -> Router {
    app(AppState::from_store(Arc::new(MemoryStore::new()), Profile::Prod))
}

fn get(uri: &str, caller: Option<Uuid>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(caller) = caller {
        builder = builder.header(USER_ID_HEADER, caller.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, caller: Option<Uuid>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(caller) = caller {
        builder = builder.header(USER_ID_HEADER, caller.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn patient_body() -> Value {
    json!({
        "firstName": "Marie",
        "lastName": "Curie",
        "dateOfBirth": "1980-11-07",
        "gender": "FEMALE",
        "email": "Marie.Curie@example.org"
    })
}

async fn create_patient(app: &Router, caller: Uuid) -> Value {
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/patients", Some(caller), &patient_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn health_is_public() {
    let response = prod_app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "UP" }));
}

#[tokio::test]
async fn prod_rejects_headerless_requests() {
    let response = prod_app().oneshot(get("/api/patients", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_user_header_is_rejected_even_in_dev() {
    let request = Request::builder()
        .uri("/api/patients")
        .header(USER_ID_HEADER, "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = dev_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dev_falls_back_to_the_seed_identity() {
    let app = dev_app();
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/patients", None, &patient_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["createdBy"], json!(DEV_FALLBACK_USER.to_string()));
    // Email is normalized on the way in.
    assert_eq!(created["email"], json!("marie.curie@example.org"));
    assert_eq!(created["status"], json!("active"));
}

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let app = dev_app();
    let caller = Uuid::new_v4();
    let created = create_patient(&app, caller).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(get(&format!("/api/patients/{id}"), Some(caller)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["firstName"], json!("Marie"));
    assert_eq!(fetched["gender"], json!("FEMALE"));
}

#[tokio::test]
async fn foreign_caller_gets_403_on_an_owned_patient() {
    let app = dev_app();
    let owner = Uuid::new_v4();
    let created = create_patient(&app, owner).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(get(&format!("/api/patients/{id}"), Some(Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bad_gender_reports_400_naming_the_field() {
    let mut body = patient_body();
    body["gender"] = json!("UNSPECIFIED");
    let response = dev_app()
        .oneshot(send_json("POST", "/api/patients", None, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["field"], json!("gender"));
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = dev_app();
    create_patient(&app, DEV_FALLBACK_USER).await;
    let mut second = patient_body();
    second["firstName"] = json!("Pierre");
    let response = app
        .oneshot(send_json("POST", "/api/patients", None, &second))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn deactivate_flips_status_without_deleting() {
    let app = dev_app();
    let caller = Uuid::new_v4();
    let created = create_patient(&app, caller).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            &format!("/api/patients/{id}/deactivate"),
            Some(caller),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deactivated = body_json(response).await;
    assert_eq!(deactivated["active"], json!(false));
    assert_eq!(deactivated["status"], json!("inactive"));

    let response = app
        .oneshot(get(&format!("/api/patients/{id}"), Some(caller)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn bmi_is_derived_from_weight_and_height() {
    let app = dev_app();
    let caller = Uuid::new_v4();
    let created = create_patient(&app, caller).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(send_json(
            "POST",
            &format!("/api/vital-signs/patients/{id}"),
            Some(caller),
            &json!({
                "measurementDate": "2025-03-01 09:30:00",
                "weight": 70.0,
                "height": 175.0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let vitals = body_json(response).await;
    assert_eq!(vitals["bmi"], json!(22.86));
}

#[tokio::test]
async fn child_records_on_an_unknown_patient_are_404() {
    let unknown = Uuid::new_v4();
    let response = dev_app()
        .oneshot(send_json(
            "POST",
            &format!("/api/consultations/patients/{unknown}"),
            None,
            &json!({
                "consultationDate": "2025-03-01 10:00:00",
                "reasonForVisit": "Routine check"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn alert_resolution_is_a_one_way_transition() {
    let app = dev_app();
    let caller = Uuid::new_v4();
    let created = create_patient(&app, caller).await;
    let pid = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/api/patients/{pid}/alerts"),
            Some(caller),
            &json!({ "alertType": "ANAPHYLAXIS_RISK", "severityLevel": "CRITICAL" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let alert = body_json(response).await;
    assert_eq!(alert["status"], json!("active"));
    let alert_id = alert["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/alerts/{alert_id}/resolve"),
            Some(caller),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let resolved = body_json(response).await;
    assert_eq!(resolved["status"], json!("resolved"));
    assert!(resolved["resolutionDate"].is_string());

    // Dismissing an already resolved alert conflicts.
    let response = app
        .oneshot(send_json(
            "PUT",
            &format!("/api/alerts/{alert_id}/dismiss"),
            Some(caller),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn chat_append_and_duplicate_session() {
    let app = dev_app();
    let caller = Uuid::new_v4();
    let created = create_patient(&app, caller).await;
    let pid = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/api/conversations/patients/{pid}"),
            Some(caller),
            &json!({ "sessionId": "sess-42" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let conversation = body_json(response).await;
    assert_eq!(conversation["title"], json!("Nouvelle conversation"));
    assert_eq!(conversation["messageCount"], json!(0));
    let cid = conversation["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/api/conversations/{cid}/messages"),
            Some(caller),
            &json!({ "role": "user", "content": "J'ai mal à la tête" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["messageCount"], json!(1));
    assert_eq!(updated["title"], json!("J'ai mal à la tête"));

    // The session identifier is globally unique.
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/api/conversations/patients/{pid}"),
            Some(caller),
            &json!({ "sessionId": "sess-42" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(get("/api/conversations/session/sess-42", Some(caller)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn consultations_list_newest_first() {
    let app = dev_app();
    let caller = Uuid::new_v4();
    let created = create_patient(&app, caller).await;
    let pid = created["id"].as_str().unwrap();

    for date in ["2025-01-10 09:00:00", "2025-02-10 09:00:00"] {
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                &format!("/api/consultations/patients/{pid}"),
                Some(caller),
                &json!({ "consultationDate": date, "reasonForVisit": "Follow-up" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(get(&format!("/api/consultations/patients/{pid}"), Some(caller)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let dates: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["consultationDate"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-02-10 09:00:00", "2025-01-10 09:00:00"]);
}

#[tokio::test]
async fn deleting_a_patient_takes_the_children_with_it() {
    let app = dev_app();
    let caller = Uuid::new_v4();
    let created = create_patient(&app, caller).await;
    let pid = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/api/treatments/patients/{pid}"),
            Some(caller),
            &json!({
                "medicationName": "Paracetamol",
                "dosage": "500mg",
                "startDate": "2025-01-01"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let treatment = body_json(response).await;
    assert_eq!(treatment["routeOfAdministration"], json!("ORAL"));
    let tid = treatment["id"].as_str().unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/patients/{pid}"))
        .header(USER_ID_HEADER, caller.to_string())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/api/treatments/{tid}"), Some(caller)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn date_range_is_inclusive_and_newest_first() {
    let app = dev_app();
    let caller = Uuid::new_v4();
    let created = create_patient(&app, caller).await;
    let pid = created["id"].as_str().unwrap();

    // One consultation before the window, one inside, one exactly on the
    // end boundary.
    for date in [
        "2025-01-05 08:00:00",
        "2025-02-15 09:00:00",
        "2025-03-31 10:00:00",
    ] {
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                &format!("/api/consultations/patients/{pid}"),
                Some(caller),
                &json!({ "consultationDate": date, "reasonForVisit": "Follow-up" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(get(
            &format!(
                "/api/consultations/patients/{pid}/date-range?startDate=2025-02-01%2000:00:00&endDate=2025-03-31%2010:00:00"
            ),
            Some(caller),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let dates: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["consultationDate"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-03-31 10:00:00", "2025-02-15 09:00:00"]);
}

#[tokio::test]
async fn bad_date_range_parameter_is_400() {
    let app = dev_app();
    let caller = Uuid::new_v4();
    let created = create_patient(&app, caller).await;
    let pid = created["id"].as_str().unwrap();

    let response = app
        .oneshot(get(
            &format!("/api/consultations/patients/{pid}/date-range?startDate=nonsense&endDate=2025-01-01"),
            Some(caller),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_is_served_without_auth() {
    let response = prod_app()
        .oneshot(get("/api-docs/openapi.json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/api/patients"].is_object());
}
