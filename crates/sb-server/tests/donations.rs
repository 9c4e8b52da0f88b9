mod common;

use actix_web::App;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test;
use actix_web::test::TestRequest;
use common::*;
use sb_auth::ACCESS_COOKIE;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";

fn listing(food: &str) -> serde_json::Value {
    serde_json::json!({
        "food_item": food,
        "description": "fresh this morning",
        "quantity": "6 loaves",
        "pickup_location_lat": 52.52,
        "pickup_location_lon": 13.405,
        "allergens": ["gluten"],
        "is_perishable": true,
    })
}

macro_rules! app {
    ($harness:expr) => {{
        let backend = $harness.backend();
        test::init_service(App::new().configure(move |cfg| backend.configure(cfg))).await
    }};
}

macro_rules! signup {
    ($app:expr, $email:expr) => {{
        let credentials = serde_json::json!({ "email": $email, "password": "pw" });
        let res = test::call_service(
            &$app,
            TestRequest::post()
                .uri("/auth/register")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let res = test::call_service(
            &$app,
            TestRequest::post()
                .uri("/auth/login")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        cookies(&res)[ACCESS_COOKIE].clone()
    }};
}

fn authed(req: TestRequest, access: &Cookie<'static>) -> TestRequest {
    req.cookie(access.clone())
}

#[actix_web::test]
async fn listings_require_a_session() {
    let harness = Harness::new();
    let app = app!(harness);
    for req in [
        TestRequest::get().uri("/donations"),
        TestRequest::post().uri("/donations").set_json(listing("bread")),
        TestRequest::get().uri("/donations/mine"),
        TestRequest::post()
            .uri("/donations/upload-image")
            .insert_header((header::CONTENT_TYPE, "image/png"))
            .set_payload(PNG),
    ] {
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn donor_lists_edits_and_withdraws() {
    let harness = Harness::new();
    let app = app!(harness);
    let donor = signup!(app, "donor@example.com");
    let other = signup!(app, "other@example.com");

    let res = test::call_service(
        &app,
        authed(TestRequest::post().uri("/donations"), &donor)
            .set_json(listing("bread"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let created = json(res).await;
    assert_eq!(created["status"], "available");
    assert_eq!(created["claimant_id"], serde_json::Value::Null);
    assert_eq!(created["allergens"], serde_json::json!(["gluten"]));
    let id = created["id"].as_str().unwrap().to_string();

    let res = test::call_service(
        &app,
        authed(TestRequest::get().uri(&format!("/donations/{}", id)), &other).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json(res).await["food_item"], "bread");

    let res = test::call_service(
        &app,
        authed(TestRequest::get().uri("/donations/mine"), &donor).to_request(),
    )
    .await;
    assert_eq!(json(res).await.as_array().map(Vec::len), Some(1));
    let res = test::call_service(
        &app,
        authed(TestRequest::get().uri("/donations/mine"), &other).to_request(),
    )
    .await;
    assert_eq!(json(res).await.as_array().map(Vec::len), Some(0));

    let patch = serde_json::json!({ "quantity": "2 loaves" });
    let res = test::call_service(
        &app,
        authed(TestRequest::put().uri(&format!("/donations/{}", id)), &other)
            .set_json(&patch)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let res = test::call_service(
        &app,
        authed(TestRequest::put().uri(&format!("/donations/{}", id)), &donor)
            .set_json(&patch)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = json(res).await;
    assert_eq!(updated["quantity"], "2 loaves");
    assert_eq!(updated["food_item"], "bread");
    assert!(updated["updated_at"].is_string());

    let res = test::call_service(
        &app,
        authed(TestRequest::put().uri(&format!("/donations/{}", id)), &donor)
            .set_json(serde_json::json!({ "description": null }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = json(res).await;
    assert_eq!(cleared["description"], serde_json::Value::Null);
    assert_eq!(cleared["quantity"], "2 loaves");

    let res = test::call_service(
        &app,
        authed(TestRequest::delete().uri(&format!("/donations/{}", id)), &other).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let res = test::call_service(
        &app,
        authed(TestRequest::delete().uri(&format!("/donations/{}", id)), &donor).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = test::call_service(
        &app,
        authed(TestRequest::get().uri(&format!("/donations/{}", id)), &donor).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(res).await["detail"], "Donation not found");
}

#[actix_web::test]
async fn claims_happen_once_and_never_by_the_donor() {
    let harness = Harness::new();
    let app = app!(harness);
    let donor = signup!(app, "donor@example.com");
    let first = signup!(app, "first@example.com");
    let second = signup!(app, "second@example.com");

    let res = test::call_service(
        &app,
        authed(TestRequest::post().uri("/donations"), &donor)
            .set_json(listing("apples"))
            .to_request(),
    )
    .await;
    let id = json(res).await["id"].as_str().unwrap().to_string();
    let claim = |access: &Cookie<'static>| {
        authed(TestRequest::post().uri(&format!("/donations/{}/claim", id)), access).to_request()
    };

    let res = test::call_service(&app, claim(&donor)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(res).await["detail"], "Cannot claim your own donation");

    let res = test::call_service(&app, claim(&first)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let claimed = json(res).await;
    assert_eq!(claimed["status"], "claimed");
    assert!(claimed["claimant_id"].is_string());

    let res = test::call_service(&app, claim(&second)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(res).await["detail"], "Donation is not available for claiming");

    let res = test::call_service(
        &app,
        authed(TestRequest::put().uri(&format!("/donations/{}", id)), &donor)
            .set_json(serde_json::json!({ "quantity": "3kg" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let edited = json(res).await;
    assert_eq!(edited["quantity"], "3kg");
    assert_eq!(edited["status"], "claimed");
    assert_eq!(edited["claimant_id"], claimed["claimant_id"]);

    let res = test::call_service(
        &app,
        authed(TestRequest::get().uri("/donations/claimed"), &first).to_request(),
    )
    .await;
    assert_eq!(json(res).await.as_array().map(Vec::len), Some(1));
    let res = test::call_service(
        &app,
        authed(TestRequest::get().uri("/donations/claimed"), &second).to_request(),
    )
    .await;
    assert_eq!(json(res).await.as_array().map(Vec::len), Some(0));

    let missing = format!("/donations/{}/claim", sb_core::ID::<sb_donations::Donation>::default());
    let res = test::call_service(
        &app,
        authed(TestRequest::post().uri(&missing), &first).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn listing_pages_are_clamped() {
    let harness = Harness::new();
    let app = app!(harness);
    let donor = signup!(app, "donor@example.com");
    for food in ["a", "b", "c"] {
        let res = test::call_service(
            &app,
            authed(TestRequest::post().uri("/donations"), &donor)
                .set_json(listing(food))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
    for (query, expected) in [("", 3), ("?skip=1", 2), ("?limit=0", 1), ("?skip=1&limit=1000", 2)] {
        let res = test::call_service(
            &app,
            authed(TestRequest::get().uri(&format!("/donations{}", query)), &donor).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json(res).await.as_array().map(Vec::len), Some(expected), "{}", query);
    }
}

#[actix_web::test]
async fn invalid_listings_are_rejected() {
    let harness = Harness::new();
    let app = app!(harness);
    let donor = signup!(app, "donor@example.com");
    let mut blank = listing(" ");
    let mut off_map = listing("pears");
    off_map["pickup_location_lat"] = serde_json::json!(123.0);
    blank["quantity"] = serde_json::json!("1");
    for body in [blank, off_map] {
        let res = test::call_service(
            &app,
            authed(TestRequest::post().uri("/donations"), &donor)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn uploads_accept_only_real_images() {
    let harness = Harness::new();
    let app = app!(harness);
    let donor = signup!(app, "donor@example.com");
    let upload = |content_type: &str, body: &'static [u8]| {
        authed(
            TestRequest::post().uri("/donations/upload-image?filename=loaf.png"),
            &donor,
        )
        .insert_header((header::CONTENT_TYPE, content_type.to_string()))
        .set_payload(body)
        .to_request()
    };

    let res = test::call_service(&app, upload("image/png", PNG)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json(res).await;
    let filename = body["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".png"));
    assert_eq!(body["url"], format!("/minio/food-images/{}", filename));
    let stored = std::fs::read(harness.storage.path().join("food-images").join(&filename)).unwrap();
    assert_eq!(stored, PNG);

    let res = test::call_service(&app, upload("image/gif", b"GIF89a")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(res).await["detail"], "invalid image type");

    let res = test::call_service(&app, upload("image/jpeg", PNG)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(res).await["detail"], "invalid image file");

    let res = test::call_service(&app, upload("image/png", b"")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

fn form(content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"--XBOUNDARY\r\n");
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"loaf.png\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");
    body
}

#[actix_web::test]
async fn uploads_accept_form_files() {
    let harness = Harness::new();
    let app = app!(harness);
    let donor = signup!(app, "donor@example.com");
    let upload = |body: Vec<u8>| {
        authed(TestRequest::post().uri("/donations/upload-image"), &donor)
            .insert_header((header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY"))
            .set_payload(body)
            .to_request()
    };

    let res = test::call_service(&app, upload(form("image/png", PNG))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json(res).await;
    let filename = body["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".png"));
    let stored = std::fs::read(harness.storage.path().join("food-images").join(&filename)).unwrap();
    assert_eq!(stored, PNG);

    let res = test::call_service(&app, upload(form("image/gif", b"GIF89a"))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(res).await["detail"], "invalid image type");

    let res = test::call_service(&app, upload(form("image/jpeg", PNG))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(res).await["detail"], "invalid image file");

    let res = test::call_service(&app, upload(b"--XBOUNDARY--\r\n".to_vec())).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
