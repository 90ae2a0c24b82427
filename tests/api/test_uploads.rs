//! Photo uploads through the mock Apps Script endpoint.

use actix_web::{http::StatusCode, test};
use homeroom_lib::store::FixtureStore;
use serde_json::Value;

use super::mock_apps_script::MockAppsScript;
use super::test_helpers::*;

const BOUNDARY: &str = "----homeroom-test-boundary";

enum Part<'a> {
    File {
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}",
                        name, value
                    )
                    .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(parts: &[Part<'_>]) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/api/v1/uploads")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(parts))
        .to_request()
}

fn photo<'a>(file_name: &'a str, data: &'a [u8]) -> Part<'a> {
    Part::File {
        file_name,
        content_type: "image/jpeg",
        data,
    }
}

#[actix_rt::test]
async fn test_partial_failure_keeps_successful_urls_in_order() {
    let mock = MockAppsScript::start(&["week3_2.jpg"]).await;
    let ctx = TestContext::with_fixture(FixtureStore::empty(), Some(mock.url.clone()));
    let app = create_test_app(&ctx).await;

    let req = upload_request(&[
        Part::Text {
            name: "namePrefix",
            value: "week3",
        },
        photo("IMG_0001.jpg", b"first-photo"),
        photo("IMG_0002.jpg", b"second-photo"),
        photo("IMG_0003.jpg", b"third-photo"),
    ]);
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["uploaded"], 2);
    assert_eq!(body["failed"], 1);
    let urls: Vec<&str> = body["urls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u.as_str().unwrap())
        .collect();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].ends_with("id=week3_1.jpg"));
    assert!(urls[1].ends_with("id=week3_3.jpg"));

    let received = mock.received();
    let names: Vec<&str> = received.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["week3_1.jpg", "week3_2.jpg", "week3_3.jpg"]);
    assert_eq!(received[0].data, b"first-photo");
    assert_eq!(received[2].mime_type, "image/jpeg");
}

#[actix_rt::test]
async fn test_original_names_kept_without_prefix() {
    let mock = MockAppsScript::start(&[]).await;
    let ctx = TestContext::with_fixture(FixtureStore::empty(), Some(mock.url.clone()));
    let app = create_test_app(&ctx).await;

    let req = upload_request(&[photo("activity.png", b"png-bytes")]);
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["uploaded"], 1);
    assert_eq!(mock.received()[0].file_name, "activity.png");
}

#[actix_rt::test]
async fn test_every_file_failing_is_an_upload_error() {
    let mock = MockAppsScript::start(&["a.jpg", "b.jpg"]).await;
    let ctx = TestContext::with_fixture(FixtureStore::empty(), Some(mock.url.clone()));
    let app = create_test_app(&ctx).await;

    let req = upload_request(&[photo("a.jpg", b"a"), photo("b.jpg", b"b")]);
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_error_code(&body, "UPLOAD_ERROR");
}

#[actix_rt::test]
async fn test_unconfigured_endpoint_uploads_nothing() {
    let ctx = TestContext::with_fixture(FixtureStore::empty(), None);
    let app = create_test_app(&ctx).await;

    let req = upload_request(&[photo("a.jpg", b"a")]);
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_rt::test]
async fn test_request_without_files_is_rejected() {
    let ctx = TestContext::with_fixture(FixtureStore::empty(), None);
    let app = create_test_app(&ctx).await;

    let req = upload_request(&[Part::Text {
        name: "namePrefix",
        value: "week1",
    }]);
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_error_code(&body, "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_oversized_upload_is_rejected() {
    let mock = MockAppsScript::start(&[]).await;
    let ctx = TestContext::with_fixture(FixtureStore::empty(), Some(mock.url.clone()));
    let app = create_test_app(&ctx).await;

    let big = vec![0xFFu8; TEST_MAX_UPLOAD_SIZE + 1];
    let req = upload_request(&[photo("big.jpg", &big)]);
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(mock.received().is_empty());
}
