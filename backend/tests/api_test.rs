use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use foodshare_backend::auth::TokenIssuer;
use foodshare_backend::config::{BackendKind, StorageConfig};
use foodshare_backend::services;
use foodshare_backend::state::AppState;
use foodshare_backend::storage::{DonationLog, Storage, DONATIONS_FILE};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn state_for(config: StorageConfig) -> AppState {
    let log = DonationLog::new(config.data_dir.join(DONATIONS_FILE));
    let storage = Storage::open(&config, log.clone()).unwrap();
    AppState::new(
        storage,
        TokenIssuer::new("test-secret", chrono::Duration::hours(24)),
        log,
    )
}

fn file_state(dir: &TempDir) -> AppState {
    state_for(StorageConfig::file(dir.path().join("data")))
}

fn relational_state(dir: &TempDir) -> AppState {
    let mut config = StorageConfig::file(dir.path().join("data"));
    config.backend = BackendKind::Relational;
    config.database_path = dir.path().join("foodshare.sqlite");
    config.pool_size = 2;
    state_for(config)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(services::configure),
        )
        .await
    };
}

fn registration(email: &str) -> Value {
    json!({
        "name": "A",
        "email": email,
        "phone": "1",
        "password": "p",
        "userType": "donor"
    })
}

fn post(path: &str, body: Value, token: Option<&str>) -> test::TestRequest {
    let req = test::TestRequest::post().uri(path).set_json(body);
    match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {}", token))),
        None => req,
    }
}

async fn json_of<B: MessageBody>(resp: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

macro_rules! call {
    ($app:expr, $req:expr) => {
        json_of(test::call_service(&$app, $req.to_request()).await).await
    };
}

macro_rules! login_token {
    ($app:expr, $email:expr) => {{
        let req = post("/api/login", json!({"email": $email, "password": "p"}), None);
        let (status, body) = call!($app, req);
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn registering_the_same_email_twice_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(file_state(&dir));

    let (status, body) = call!(app, post("/api/register", registration("a@x.com"), None));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"success": true, "message": "Registration successful"}));

    let (status, body) = call!(app, post("/api/register", registration("a@x.com"), None));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "message": "Email already registered"})
    );
}

#[actix_web::test]
async fn login_returns_token_and_user_without_hash() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(file_state(&dir));
    call!(app, post("/api/register", registration("a@x.com"), None));

    let (status, body) = call!(
        app,
        post("/api/login", json!({"email": "a@x.com", "password": "p"}), None)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["user_type"], "donor");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = call!(
        app,
        post("/api/login", json!({"email": "a@x.com", "password": "nope"}), None)
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"success": false, "message": "Invalid credentials"}));
}

#[actix_web::test]
async fn business_donation_requires_a_valid_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(file_state(&dir));
    let donation = json!({"businessName": "Bakery", "foodType": "bread"});

    let (status, body) = call!(app, post("/api/business-donation", donation.clone(), None));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");

    let (status, body) = call!(
        app,
        post("/api/business-donation", donation, Some("not-a-token"))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid or expired token");

    let log = fs::read_to_string(dir.path().join("data").join(DONATIONS_FILE)).unwrap();
    assert_eq!(log.lines().count(), 1, "only the header expected: {}", log);
    let profiles = fs::read_to_string(dir.path().join("data").join("donor_profiles.json")).unwrap();
    assert_eq!(profiles, "[]");
}

#[actix_web::test]
async fn business_donation_is_listed_for_its_owner() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(relational_state(&dir));
    call!(app, post("/api/register", registration("biz@x.com"), None));
    let token = login_token!(app, "biz@x.com");

    let donation = json!({
        "businessName": "Bakery",
        "businessType": "retail",
        "businessAddress": "9 Baker St",
        "foodType": "bread",
        "foodQuantity": "20 loaves",
        "pickupDate": "2024-05-01",
        "pickupTime": "17:00",
        "businessNotes": "side door"
    });
    let (status, body) = call!(app, post("/api/business-donation", donation, Some(&token)));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Business donation submitted successfully",
            "persisted": true
        })
    );

    let req = test::TestRequest::get()
        .uri("/api/donations")
        .insert_header(("Authorization", format!("Bearer {}", token)));
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::OK);
    let donations = body["donations"].as_array().unwrap();
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0]["food_type"], "bread");
    assert_eq!(donations[0]["pickup_address"], "9 Baker St");
    assert_eq!(donations[0]["status"], "available");
}

#[actix_web::test]
async fn individual_donation_creates_donor_and_donation() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(file_state(&dir));

    let donation = json!({
        "individualName": "Jo",
        "individualEmail": "jo@x.com",
        "individualPhone": "9",
        "individualAddress": "5 Oak Ave",
        "donationType": "canned",
        "individualFoodDescription": "3 boxes",
        "individualPickupDate": "2024-07-01",
        "individualPickupTime": "10:00",
        "individualNotes": ""
    });
    let (status, body) = call!(app, post("/api/individual-donation", donation, None));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["persisted"], true);

    let users: Value = serde_json::from_slice(
        &fs::read(dir.path().join("data").join("users.json")).unwrap(),
    )
    .unwrap();
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "jo@x.com");

    let rows = DonationLog::new(dir.path().join("data").join(DONATIONS_FILE))
        .read_all()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "jo@x.com");
    assert_eq!(rows[0].donation_type, "individual");

    // The implicit donor cannot log in.
    let (status, _) = call!(
        app,
        post("/api/login", json!({"email": "jo@x.com", "password": ""}), None)
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn financial_donation_accepts_text_amounts() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(relational_state(&dir));

    let pledge = json!({
        "donorName": "Kim",
        "donorEmail": "kim@x.com",
        "donorPhone": "3",
        "donationAmount": "25.00",
        "donationFrequency": "monthly",
        "paymentMethod": "card",
        "comments": "",
        "anonymous": true
    });
    let (status, body) = call!(app, post("/api/financial-donation", pledge, None));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Financial donation submitted successfully");
}

#[actix_web::test]
async fn unlisted_frequency_is_still_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(file_state(&dir));

    let pledge = json!({
        "donorName": "Kim",
        "donorEmail": "kim@x.com",
        "donationAmount": 5,
        "donationFrequency": "weekly"
    });
    let (status, body) = call!(app, post("/api/financial-donation", pledge, None));
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["persisted"], true);

    let pledges =
        fs::read_to_string(dir.path().join("data").join("financial_donations.csv")).unwrap();
    assert!(pledges.contains("weekly"), "{}", pledges);
}

#[actix_web::test]
async fn unlisted_user_type_is_stored_as_given() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(relational_state(&dir));

    let mut request = registration("shop@x.com");
    request["userType"] = json!("business");
    let (status, body) = call!(app, post("/api/register", request, None));
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, body) = call!(
        app,
        post("/api/login", json!({"email": "shop@x.com", "password": "p"}), None)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["user_type"], "business");
}

#[actix_web::test]
async fn users_file_with_unlisted_user_type_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    let legacy = json!([{
        "user_id": 1,
        "user_type": "business",
        "name": "Old Shop",
        "email": "old@x.com",
        "phone": "",
        "password_hash": "placeholder_hash",
        "created_at": "2023-01-01T00:00:00Z"
    }]);
    fs::write(data.join("users.json"), legacy.to_string()).unwrap();
    let app = app!(file_state(&dir));

    let (status, body) = call!(app, post("/api/register", registration("new@x.com"), None));
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    login_token!(app, "new@x.com");

    let users: Value = serde_json::from_slice(&fs::read(data.join("users.json")).unwrap()).unwrap();
    assert_eq!(users[0]["user_type"], "business");
    assert_eq!(users[1]["user_id"], 2);
}

#[actix_web::test]
async fn bearer_scheme_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(file_state(&dir));
    call!(app, post("/api/register", registration("a@x.com"), None));
    let token = login_token!(app, "a@x.com");

    let req = test::TestRequest::get()
        .uri("/api/donations")
        .insert_header(("Authorization", format!("bearer {}", token)));
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["donations"], json!([]));
}

#[actix_web::test]
async fn donate_appends_a_quoted_row_to_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(relational_state(&dir));
    call!(app, post("/api/register", registration("a@x.com"), None));
    let token = login_token!(app, "a@x.com");

    let donation = json!({
        "donationType": "food",
        "name": "A",
        "email": "a@x.com",
        "address": "12 \"Old\" Mill Rd",
        "foodType": "fruit",
        "quantity": "1 crate",
        "notes": "gate code, 1234"
    });
    let (status, body) = call!(app, post("/api/donate", donation.clone(), None));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, body) = call!(app, post("/api/donate", donation, Some(&token)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Donation submitted successfully"})
    );

    let path = dir.path().join("data").join(DONATIONS_FILE);
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains(r#""12 ""Old"" Mill Rd""#), "{}", raw);

    let rows = DonationLog::new(path).read_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].address, r#"12 "Old" Mill Rd"#);
    assert_eq!(rows[0].notes, "gate code, 1234");
}

#[actix_web::test]
async fn malformed_body_is_a_json_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(file_state(&dir));

    let req = test::TestRequest::post()
        .uri("/api/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json");
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn registration_without_password_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(file_state(&dir));

    let (status, body) = call!(
        app,
        post("/api/register", json!({"email": "a@x.com"}), None)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required field: password");
}
