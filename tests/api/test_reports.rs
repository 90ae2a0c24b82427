//! Report saving, history and photo listing against the fixture store.

use actix_web::{http::StatusCode, test};
use homeroom_lib::store::FixtureStore;
use serde_json::{Value, json};

use super::test_helpers::*;

fn co_advised_fixture() -> FixtureStore {
    FixtureStore::new(
        vec![
            advisor("1", "ครูสมชาย ใจดี", "ปวช. 1", "1/1", "เทคโนโลยีสารสนเทศ"),
            advisor("2", "ครูนิภา รักเรียน", "ปวช. 1", "1/1", "เทคโนโลยีสารสนเทศ"),
            advisor("3", "ครูวิชัย สอนเก่ง", "ปวช. 2", "1/2", "บัญชี"),
        ],
        Vec::new(),
    )
}

#[actix_rt::test]
async fn test_save_merges_co_advisors_and_history_matches_either_name() {
    let ctx = TestContext::with_fixture(co_advised_fixture(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/reports")
        .set_json(json!({
            "term": "2",
            "academicYear": "2568",
            "week": 3,
            "date": "2025-11-17",
            "advisorName": "ครูนิภา รักเรียน",
            "department": "เทคโนโลยีสารสนเทศ",
            "classLevel": "ปวช. 1",
            "room": "1/1",
            "topic": "การแต่งกาย",
            "totalStudents": 30,
            "presentStudents": 27,
            "absentStudents": 3
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let saved: Value = test::read_body_json(resp).await;
    assert_eq!(saved["advisorName"], "ครูสมชาย ใจดี และ ครูนิภา รักเรียน");
    assert!(!saved["id"].as_str().unwrap().is_empty());

    for name in ["ครูสมชาย", "ครูนิภา รักเรียน"] {
        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/v1/reports?term=2&academicYear=2568&advisorName={}",
                q(name)
            ))
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1, "advisor fragment {}", name);
        assert_eq!(body[0]["id"], saved["id"]);
        assert_eq!(body[0]["presentStudents"], 27);
        assert!(body[0]["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
    }
}

#[actix_rt::test]
async fn test_single_advisor_keeps_submitted_name() {
    let ctx = TestContext::with_fixture(co_advised_fixture(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/reports")
        .set_json(json!({
            "term": "2",
            "academicYear": "2568",
            "week": "1",
            "advisorName": "ครูวิชัย สอนเก่ง",
            "department": "บัญชี",
            "classLevel": "ปวช. 2",
            "room": "1/2",
            "totalStudents": "25",
            "presentStudents": "25",
            "absentStudents": "0"
        }))
        .to_request();
    let saved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved["advisorName"], "ครูวิชัย สอนเก่ง");
}

#[actix_rt::test]
async fn test_save_requires_term_year_and_advisor() {
    let ctx = TestContext::with_fixture(co_advised_fixture(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/reports")
        .set_json(json!({ "term": "2", "academicYear": "2568", "week": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_error_code(&body, "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_history_orders_by_week_for_one_advisor_and_by_date_otherwise() {
    let fixture = FixtureStore::new(
        Vec::new(),
        vec![
            report("w3", "ครูสมชาย ใจดี", "2", 3, "2025-11-17"),
            report("w1", "ครูสมชาย ใจดี", "2", 1, "2025-11-03"),
            report("other", "ครูนิภา รักเรียน", "2", 2, "2025-11-20"),
            report("w2", "ครูสมชาย ใจดี", "2", 2, "2025-11-10"),
            report("term1", "ครูสมชาย ใจดี", "1", 9, "2025-07-01"),
        ],
    );
    let ctx = TestContext::with_fixture(fixture, None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/reports?term=2&academicYear=2568&advisorName={}",
            q("ครูสมชาย ใจดี")
        ))
        .to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = body.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["w1", "w2", "w3"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/reports?term=2&academicYear=2568")
        .to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = body.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["other", "w3", "w2", "w1"]);
}

#[actix_rt::test]
async fn test_history_requires_term_and_year() {
    let ctx = TestContext::with_fixture(FixtureStore::empty(), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/reports?term=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_error_code(&body, "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_photos_are_flattened_and_normalized() {
    let mut first = report("w1", "ครูสมชาย ใจดี", "2", 1, "2025-11-03");
    first.photo_url = Some(
        "https://drive.google.com/file/d/abc123/view?usp=sharing, https://drive.google.com/uc?export=view&id=def456"
            .to_string(),
    );
    let mut second = report("w2", "ครูสมชาย ใจดี", "2", 2, "2025-11-10");
    second.photo_url = Some(" , https://lh3.googleusercontent.com/d/ghi789".to_string());
    let mut other = report("x", "ครูนิภา รักเรียน", "2", 1, "2025-11-03");
    other.photo_url = Some("https://example.com/other.jpg".to_string());

    let ctx = TestContext::with_fixture(FixtureStore::new(Vec::new(), vec![first, second, other]), None);
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/reports/photos?term=2&academicYear=2568&advisorName={}",
            q("ครูสมชาย")
        ))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["photos"],
        json!([
            "https://lh3.googleusercontent.com/d/abc123",
            "https://lh3.googleusercontent.com/d/def456",
            "https://lh3.googleusercontent.com/d/ghi789"
        ])
    );
}
