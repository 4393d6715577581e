//! End-to-end API tests over the in-memory store and mock payment gateway.
//!
//! Each test builds a fresh server, drives it through the public HTTP
//! surface, and asserts on the wire-level responses.

use axum_test::TestServer;
use doctors_portal::auth::TokenSigner;
use doctors_portal::server::{AppState, build_router};
use doctors_portal::store::MemoryStore;
use doctors_portal::types::{Role, TreatmentOption, UserId};
use serde_json::{Value, json};

fn catalog() -> Vec<TreatmentOption> {
    vec![
        TreatmentOption {
            name: "Teeth Cleaning".to_string(),
            price: 30,
            slots: vec![
                "8:00 AM - 9:00 AM".to_string(),
                "9:00 AM - 10:00 AM".to_string(),
                "10:00 AM - 11:00 AM".to_string(),
            ],
        },
        TreatmentOption {
            name: "Cavity Protection".to_string(),
            price: 20,
            slots: vec![
                "8:00 AM - 9:00 AM".to_string(),
                "9:00 AM - 10:00 AM".to_string(),
            ],
        },
    ]
}

fn server_with_store() -> (TestServer, MemoryStore) {
    let store = MemoryStore::with_catalog(catalog());
    let signer = TokenSigner::new("test-secret".to_string(), chrono::Duration::days(1));
    let app = build_router(AppState::in_memory(store.clone(), signer));
    (
        TestServer::new(app).expect("test server"),
        store,
    )
}

/// Fetch a bearer credential through the issuance endpoint.
async fn token_for(server: &TestServer, email: &str) -> String {
    let response = server.get("/jwt").add_query_param("email", email).await;
    assert_eq!(response.status_code(), 200);
    response.json::<Value>()["accessToken"]
        .as_str()
        .expect("token string")
        .to_string()
}

async fn book(server: &TestServer, email: &str, treatment: &str, date: &str, slot: &str) -> Value {
    let response = server
        .post("/bookings")
        .json(&json!({
            "treatment": treatment,
            "appointmentDate": date,
            "email": email,
            "slot": slot,
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    response.json::<Value>()
}

// ============================================================================
// Availability
// ============================================================================

#[tokio::test]
async fn availability_subtracts_booked_slots_per_treatment_and_date() {
    let (server, _store) = server_with_store();

    book(
        &server,
        "a@x.com",
        "Teeth Cleaning",
        "2024-05-20",
        "9:00 AM - 10:00 AM",
    )
    .await;

    let options = server
        .get("/appointmentOptions")
        .add_query_param("date", "2024-05-20")
        .await
        .json::<Vec<TreatmentOption>>();

    let cleaning = options
        .iter()
        .find(|option| option.name == "Teeth Cleaning")
        .expect("cleaning present");
    assert_eq!(
        cleaning.slots,
        vec!["8:00 AM - 9:00 AM", "10:00 AM - 11:00 AM"]
    );

    // Other treatments on the same date are untouched.
    let cavity = options
        .iter()
        .find(|option| option.name == "Cavity Protection")
        .expect("cavity present");
    assert_eq!(cavity.slots.len(), 2);

    // Other dates see the full master list.
    let other_day = server
        .get("/appointmentOptions")
        .add_query_param("date", "2024-05-21")
        .await
        .json::<Vec<TreatmentOption>>();
    assert_eq!(other_day[0].slots.len(), 3);
}

#[tokio::test]
async fn specialty_list_is_catalog_names_only() {
    let (server, _store) = server_with_store();

    let response = server.get("/appointmentSpecialty").await;
    assert_eq!(response.status_code(), 200);
    let specialties = response.json::<Vec<Value>>();
    assert_eq!(specialties[0]["name"], "Teeth Cleaning");
    assert_eq!(specialties[1]["name"], "Cavity Protection");
}

// ============================================================================
// Booking conflict guard
// ============================================================================

#[tokio::test]
async fn duplicate_booking_is_acknowledged_false_with_dated_message() {
    let (server, _store) = server_with_store();

    let first = book(
        &server,
        "a@x.com",
        "Teeth Cleaning",
        "2024-05-20",
        "8:00 AM - 9:00 AM",
    )
    .await;
    assert_eq!(first["acknowledged"], true);
    assert!(first["insertedId"].is_string());

    // Same triple, different slot: still a duplicate.
    let second = book(
        &server,
        "a@x.com",
        "Teeth Cleaning",
        "2024-05-20",
        "9:00 AM - 10:00 AM",
    )
    .await;
    assert_eq!(second["acknowledged"], false);
    assert_eq!(
        second["message"],
        "You already have a booking on 2024-05-20"
    );

    // Different treatment or date is fine.
    let other_treatment = book(
        &server,
        "a@x.com",
        "Cavity Protection",
        "2024-05-20",
        "8:00 AM - 9:00 AM",
    )
    .await;
    assert_eq!(other_treatment["acknowledged"], true);

    let other_date = book(
        &server,
        "a@x.com",
        "Teeth Cleaning",
        "2024-05-21",
        "8:00 AM - 9:00 AM",
    )
    .await;
    assert_eq!(other_date["acknowledged"], true);
}

#[tokio::test]
async fn unknown_booking_lookup_is_not_found() {
    let (server, _store) = server_with_store();

    let response = server
        .get(&format!("/bookings/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), 404);
}

// ============================================================================
// Credential issuance and the two-stage gate
// ============================================================================

#[tokio::test]
async fn token_issuance_requires_registration() {
    let (server, store) = server_with_store();

    let refused = server
        .get("/jwt")
        .add_query_param("email", "stranger@x.com")
        .await;
    assert_eq!(refused.status_code(), 403);
    assert_eq!(refused.json::<Value>()["accessToken"], "");

    store.seed_user("a@x.com", Role::User);
    let token = token_for(&server, "a@x.com").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn booking_list_requires_matching_credential() {
    let (server, store) = server_with_store();
    store.seed_user("a@x.com", Role::User);
    let token = token_for(&server, "a@x.com").await;

    book(
        &server,
        "a@x.com",
        "Teeth Cleaning",
        "2024-05-20",
        "8:00 AM - 9:00 AM",
    )
    .await;

    // No credential at all.
    let missing = server.get("/bookings").add_query_param("email", "a@x.com").await;
    assert_eq!(missing.status_code(), 401);
    assert_eq!(missing.json::<Value>()["message"], "unauthorized access");

    // A forged credential.
    let forged = server
        .get("/bookings")
        .add_query_param("email", "a@x.com")
        .authorization_bearer("not-a-real-token")
        .await;
    assert_eq!(forged.status_code(), 403);

    // A valid credential for somebody else's email.
    let mismatched = server
        .get("/bookings")
        .add_query_param("email", "b@x.com")
        .authorization_bearer(&token)
        .await;
    assert_eq!(mismatched.status_code(), 403);

    // The happy path.
    let listed = server
        .get("/bookings")
        .add_query_param("email", "a@x.com")
        .authorization_bearer(&token)
        .await;
    assert_eq!(listed.status_code(), 200);
    let bookings = listed.json::<Vec<Value>>();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["treatment"], "Teeth Cleaning");
    assert_eq!(bookings[0]["paid"], false);
}

// ============================================================================
// Payment reconciliation
// ============================================================================

#[tokio::test]
async fn payment_intent_amount_is_price_in_minor_units() {
    let (server, _store) = server_with_store();

    let response = server
        .post("/create-payment-intent")
        .json(&json!({ "price": 300 }))
        .await;
    assert_eq!(response.status_code(), 200);
    let secret = response.json::<Value>()["clientSecret"]
        .as_str()
        .expect("client secret")
        .to_string();
    // The mock gateway embeds the minor-unit amount in the secret.
    assert!(secret.ends_with("_secret_30000"), "got {secret}");
}

#[tokio::test]
async fn settlement_marks_the_booking_paid() {
    let (server, _store) = server_with_store();

    let ack = book(
        &server,
        "a@x.com",
        "Teeth Cleaning",
        "2024-05-20",
        "8:00 AM - 9:00 AM",
    )
    .await;
    let booking_id = ack["insertedId"].as_str().expect("booking id").to_string();

    let settled = server
        .post("/payments")
        .json(&json!({
            "bookingId": booking_id,
            "transactionId": "txn_123",
            "amount": 3000,
        }))
        .await;
    assert_eq!(settled.status_code(), 200);
    let settle_ack = settled.json::<Value>();
    assert_eq!(settle_ack["acknowledged"], true);
    assert!(settle_ack["insertedId"].is_string());

    let booking = server
        .get(&format!("/bookings/{booking_id}"))
        .await
        .json::<Value>();
    assert_eq!(booking["paid"], true);
    assert_eq!(booking["transactionId"], "txn_123");
}

#[tokio::test]
async fn settlement_refuses_an_orphan_payment() {
    let (server, _store) = server_with_store();

    let response = server
        .post("/payments")
        .json(&json!({
            "bookingId": uuid::Uuid::new_v4(),
            "transactionId": "txn_orphan",
            "amount": 3000,
        }))
        .await;
    assert_eq!(response.status_code(), 404);
}

// ============================================================================
// Users and role administration
// ============================================================================

#[tokio::test]
async fn registration_acknowledges_and_rejects_duplicate_email() {
    let (server, _store) = server_with_store();

    let created = server
        .post("/users")
        .json(&json!({ "email": "a@x.com", "name": "Ada" }))
        .await;
    assert_eq!(created.status_code(), 200);
    assert_eq!(created.json::<Value>()["acknowledged"], true);

    let duplicate = server
        .post("/users")
        .json(&json!({ "email": "a@x.com", "name": "Ada again" }))
        .await;
    assert_eq!(duplicate.status_code(), 409);
}

#[tokio::test]
async fn admin_status_reflects_role() {
    let (server, store) = server_with_store();
    store.seed_user("boss@x.com", Role::Admin);
    store.seed_user("a@x.com", Role::User);

    let admin = server.get("/users/admin/boss@x.com").await.json::<Value>();
    assert_eq!(admin["isAdmin"], true);

    let ordinary = server.get("/users/admin/a@x.com").await.json::<Value>();
    assert_eq!(ordinary["isAdmin"], false);

    let unknown = server.get("/users/admin/nobody@x.com").await.json::<Value>();
    assert_eq!(unknown["isAdmin"], false);
}

#[tokio::test]
async fn elevation_is_admin_gated_and_idempotent() {
    let (server, store) = server_with_store();
    store.seed_user("boss@x.com", Role::Admin);
    store.seed_user("peer@x.com", Role::User);
    let target: UserId = store.seed_user("a@x.com", Role::User);

    let admin_token = token_for(&server, "boss@x.com").await;
    let peer_token = token_for(&server, "peer@x.com").await;

    // An ordinary user cannot elevate, and the target stays ordinary.
    let refused = server
        .put(&format!("/users/admin/{target}"))
        .authorization_bearer(&peer_token)
        .await;
    assert_eq!(refused.status_code(), 403);
    let status = server.get("/users/admin/a@x.com").await.json::<Value>();
    assert_eq!(status["isAdmin"], false);

    // An administrator can, and doing it twice is a no-op success.
    for _ in 0..2 {
        let elevated = server
            .put(&format!("/users/admin/{target}"))
            .authorization_bearer(&admin_token)
            .await;
        assert_eq!(elevated.status_code(), 200);
        assert_eq!(elevated.json::<Value>()["acknowledged"], true);
    }
    let status = server.get("/users/admin/a@x.com").await.json::<Value>();
    assert_eq!(status["isAdmin"], true);

    // Elevating a nonexistent id is an error, not an upsert.
    let unknown = server
        .put(&format!("/users/admin/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(unknown.status_code(), 404);
}

// ============================================================================
// Practitioner administration
// ============================================================================

#[tokio::test]
async fn doctor_routes_are_doubly_gated() {
    let (server, store) = server_with_store();
    store.seed_user("boss@x.com", Role::Admin);
    store.seed_user("peer@x.com", Role::User);
    let admin_token = token_for(&server, "boss@x.com").await;
    let peer_token = token_for(&server, "peer@x.com").await;

    let doctor = json!({
        "name": "Dr. Caroline",
        "specialty": "Teeth Cleaning",
        "slots": ["8:00 AM - 9:00 AM"],
    });

    // Missing credential is unauthenticated, valid non-admin is forbidden.
    let missing = server.post("/doctors").json(&doctor).await;
    assert_eq!(missing.status_code(), 401);
    let forbidden = server
        .post("/doctors")
        .authorization_bearer(&peer_token)
        .json(&doctor)
        .await;
    assert_eq!(forbidden.status_code(), 403);

    // Neither refused attempt mutated the roster.
    let listed = server
        .get("/doctors")
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(listed.status_code(), 200);
    assert!(listed.json::<Vec<Value>>().is_empty());

    // Admin create, list, delete.
    let created = server
        .post("/doctors")
        .authorization_bearer(&admin_token)
        .json(&doctor)
        .await;
    assert_eq!(created.status_code(), 200);
    let doctor_id = created.json::<Value>()["insertedId"]
        .as_str()
        .expect("doctor id")
        .to_string();

    let listed = server
        .get("/doctors")
        .authorization_bearer(&admin_token)
        .await
        .json::<Vec<Value>>();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Dr. Caroline");

    let deleted = server
        .delete(&format!("/doctors/{doctor_id}"))
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(deleted.status_code(), 200);
    assert_eq!(deleted.json::<Value>()["deletedCount"], 1);
}

// ============================================================================
// Liveness
// ============================================================================

#[tokio::test]
async fn liveness_endpoints_respond() {
    let (server, _store) = server_with_store();

    let root = server.get("/").await;
    assert_eq!(root.status_code(), 200);
    assert_eq!(root.text(), "Doctors portal server is running");

    let health = server.get("/health").await;
    assert_eq!(health.status_code(), 200);
    let report = health.json::<Value>();
    assert_eq!(report["status"], "ok");
    assert_eq!(report["service"], "doctors-portal");
    assert_eq!(report["version"], env!("CARGO_PKG_VERSION"));
}
