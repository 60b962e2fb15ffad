//! Upload integration tests.
//!
//! Tests verify:
//! - JPEG and PNG uploads are stored under the sanitized filename
//! - Unsupported declared content types are rejected before anything is written
//! - Undecodable payloads are removed again
//! - Every outcome is reported with HTTP 200

use axum::body::Body;
use axum::http::{Request, StatusCode};
use image::ImageFormat;

use image_transformer::RouterConfig;

use super::test_utils::{
    body_json, create_test_image, create_test_jpeg, multipart_request, TestApp,
};

// =============================================================================
// Successful Uploads
// =============================================================================

#[tokio::test]
async fn test_upload_jpeg() {
    let app = TestApp::new().await;
    let jpeg = create_test_jpeg();

    let json = app.upload("test_image.jpg", "image/jpeg", &jpeg).await;
    assert_eq!(
        json["info"],
        "Image 'test_image.jpg' uploaded successfully"
    );
    assert!(json.get("error").is_none());

    let stored = app.images.read("test_image.jpg").await.unwrap();
    assert_eq!(stored.as_ref(), jpeg.as_slice());
}

#[tokio::test]
async fn test_upload_png() {
    let app = TestApp::new().await;
    let png = create_test_image(32, 16, ImageFormat::Png);

    let json = app.upload("pixel.png", "image/png", &png).await;
    assert_eq!(json["info"], "Image 'pixel.png' uploaded successfully");
    assert!(app.images.contains("pixel.png").await.unwrap());
}

#[tokio::test]
async fn test_upload_without_trailing_slash() {
    let app = TestApp::new().await;
    let jpeg = create_test_jpeg();

    let mut request = multipart_request("image", "a.jpg", "image/jpeg", &jpeg);
    *request.uri_mut() = "/upload".parse().unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["info"], "Image 'a.jpg' uploaded successfully");
}

#[tokio::test]
async fn test_upload_overwrites_existing_file() {
    let app = TestApp::new().await;
    let small = create_test_image(10, 10, ImageFormat::Png);
    let large = create_test_image(50, 50, ImageFormat::Png);

    app.upload("same.png", "image/png", &small).await;
    app.upload("same.png", "image/png", &large).await;

    let stored = app.images.read("same.png").await.unwrap();
    assert_eq!(stored.as_ref(), large.as_slice());
}

// =============================================================================
// Rejected Uploads
// =============================================================================

#[tokio::test]
async fn test_upload_invalid_content_type() {
    let app = TestApp::new().await;

    let json = app.upload("test.txt", "text/plain", b"Not an image").await;
    assert_eq!(
        json["error"],
        "Invalid image format. Only JPEG and PNG are supported."
    );
    assert!(!app.images.contains("test.txt").await.unwrap());
}

#[tokio::test]
async fn test_upload_valid_image_with_wrong_content_type() {
    let app = TestApp::new().await;
    let jpeg = create_test_jpeg();

    let json = app.upload("photo.gif", "image/gif", &jpeg).await;
    assert_eq!(
        json["error"],
        "Invalid image format. Only JPEG and PNG are supported."
    );
    assert!(!app.images.contains("photo.gif").await.unwrap());
}

#[tokio::test]
async fn test_upload_corrupt_image_removed() {
    let app = TestApp::new().await;

    let json = app.upload("fake.jpg", "image/jpeg", b"Not an image").await;
    assert_eq!(json["error"], "Uploaded file is not a valid image");
    assert!(!app.images.contains("fake.jpg").await.unwrap());
}

#[tokio::test]
async fn test_upload_truncated_png_removed() {
    let app = TestApp::new().await;
    let png = create_test_image(64, 64, ImageFormat::Png);

    let json = app
        .upload("half.png", "image/png", &png[..png.len() / 2])
        .await;
    assert_eq!(json["error"], "Uploaded file is not a valid image");
    assert!(!app.images.contains("half.png").await.unwrap());
}

#[tokio::test]
async fn test_upload_missing_image_field() {
    let app = TestApp::new().await;
    let jpeg = create_test_jpeg();

    let response = app
        .send(multipart_request("file", "a.jpg", "image/jpeg", &jpeg))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["error"], "No image file provided");
}

#[tokio::test]
async fn test_upload_non_multipart_body() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/upload/")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to upload image: "));
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let app = TestApp::with_config(
        RouterConfig::default()
            .with_tracing(false)
            .with_max_upload_size(1024),
    )
    .await;
    let payload = vec![0u8; 8 * 1024];

    let json = app.upload("big.png", "image/png", &payload).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to upload image: "));
    assert!(!app.images.contains("big.png").await.unwrap());
}

// =============================================================================
// Path Traversal
// =============================================================================

#[tokio::test]
async fn test_upload_strips_directories() {
    let app = TestApp::new().await;
    let jpeg = create_test_jpeg();

    let json = app.upload("../../escape.jpg", "image/jpeg", &jpeg).await;
    assert_eq!(
        json["info"],
        "Image '../../escape.jpg' uploaded successfully"
    );

    assert!(app.images.contains("escape.jpg").await.unwrap());
    assert!(!app.dir.path().join("escape.jpg").exists());
    assert!(!app.dir.path().parent().unwrap().join("escape.jpg").exists());
}

#[tokio::test]
async fn test_upload_empty_filename_rejected() {
    let app = TestApp::new().await;
    let jpeg = create_test_jpeg();

    let json = app.upload("uploads/", "image/jpeg", &jpeg).await;
    assert_eq!(
        json["error"],
        "Failed to upload image: invalid filename 'uploads/'"
    );
}
