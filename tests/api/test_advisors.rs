//! Advisor management against the fixture store.

use actix_web::{http::StatusCode, test};
use homeroom_lib::store::FixtureStore;
use serde_json::{Value, json};

use super::test_helpers::*;

fn fixture() -> FixtureStore {
    let mut previous_year = advisor("old-1", "ครูสมศรี เก่งมาก", "ปวส. 1", "1/1", "การตลาด");
    previous_year.year = 2567;
    FixtureStore::new(
        vec![
            advisor("1", "ครูสมชาย ใจดี", "ปวช. 1", "1/1", "เทคโนโลยีสารสนเทศ"),
            advisor("2", "ครูนิภา รักเรียน", "ปวช. 2", "1/2", "เทคโนโลยีสารสนเทศ"),
            previous_year,
        ],
        Vec::new(),
    )
}

#[actix_rt::test]
async fn test_list_filters_by_year() {
    let ctx = TestContext::with_fixture(fixture(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/advisors?year=2568")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Vec<Value> = test::read_body_json(resp).await;
    let ids: Vec<&str> = body.iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(body[0]["classLevel"], "ปวช. 1");

    let req = test::TestRequest::get().uri("/api/v1/advisors").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.len(), 3);
}

#[actix_rt::test]
async fn test_malformed_year_is_rejected() {
    let ctx = TestContext::with_fixture(fixture(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/advisors?year=last")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_error_code(&body, "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_create_derives_id_and_lists_new_advisor() {
    let ctx = TestContext::with_fixture(fixture(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/advisors")
        .set_json(json!({
            "name": "  ครูใหม่ ทดสอบ ",
            "classLevel": "ปวช. 2",
            "room": "2/1",
            "department": "บัญชี",
            "year": 2568
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["id"], "ครูใหม่-ทดสอบ-ปวช.-2-2/1");
    assert_eq!(created["name"], "ครูใหม่ ทดสอบ");

    let req = test::TestRequest::get()
        .uri("/api/v1/advisors?year=2568")
        .to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.len(), 3);
    assert_eq!(body[2]["department"], "บัญชี");
}

#[actix_rt::test]
async fn test_create_requires_name_room_and_department() {
    let ctx = TestContext::with_fixture(fixture(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/advisors")
        .set_json(json!({
            "name": "ครูใหม่",
            "classLevel": "ปวช. 1",
            "room": " ",
            "department": ""
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_error_code(&body, "INVALID_INPUT");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("room") && message.contains("department"));
}

#[actix_rt::test]
async fn test_update_and_delete_ids_containing_slashes() {
    let ctx = TestContext::with_fixture(
        FixtureStore::new(
            vec![advisor(
                "ครูสมชาย-ใจดี-ปวช.-1-1/1",
                "ครูสมชาย ใจดี",
                "ปวช. 1",
                "1/1",
                "เทคโนโลยีสารสนเทศ",
            )],
            Vec::new(),
        ),
        None,
    );
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::put()
        .uri(&format!(
            "/api/v1/advisors/{}",
            encode_id("ครูสมชาย-ใจดี-ปวช.-1-1/1")
        ))
        .set_json(json!({
            "name": "ครูสมชาย ใจดี",
            "classLevel": "ปวช. 1",
            "room": "1/2",
            "department": "เทคโนโลยีสารสนเทศ",
            "year": 2568
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"], "ครูสมชาย-ใจดี-ปวช.-1-1/2");

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/api/v1/advisors/{}",
            encode_id("ครูสมชาย-ใจดี-ปวช.-1-1/2")
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/v1/advisors").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(body.is_empty());
}

#[actix_rt::test]
async fn test_unknown_advisor_is_not_found() {
    let ctx = TestContext::with_fixture(fixture(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::delete()
        .uri("/api/v1/advisors/missing")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_error_code(&body, "NOT_FOUND");

    let req = test::TestRequest::put()
        .uri("/api/v1/advisors/missing")
        .set_json(json!({
            "name": "ครูใหม่",
            "classLevel": "ปวช. 1",
            "room": "1/1",
            "department": "บัญชี"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_health_reports_fixture_mode() {
    let ctx = TestContext::with_fixture(fixture(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/ready").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["store"], "fixture");
}
