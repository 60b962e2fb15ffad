//! Transform integration tests.
//!
//! Tests verify:
//! - Each transform endpoint returns the image as an attachment named after
//!   the transform and its parameters
//! - Output dimensions and color type per transform
//! - Missing images and unsupported filters answered with 200 + error JSON
//! - Sanitized lookups and deterministic overwrite of derived files

use axum::http::StatusCode;
use image::{ColorType, GenericImageView, ImageFormat};

use image_transformer::transform::rotated_bounds;

use super::test_utils::{
    body_bytes, body_json, content_disposition, create_test_image, create_test_jpeg, decode,
    is_valid_jpeg, TestApp,
};

async fn app_with_test_image() -> TestApp {
    let app = TestApp::new().await;
    let json = app
        .upload("test_image.jpg", "image/jpeg", &create_test_jpeg())
        .await;
    assert_eq!(
        json["info"],
        "Image 'test_image.jpg' uploaded successfully"
    );
    app
}

// =============================================================================
// Rotate
// =============================================================================

#[tokio::test]
async fn test_upload_then_rotate_end_to_end() {
    let app = app_with_test_image().await;

    let response = app.get("/rotate/test_image.jpg?degrees=90").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&response),
        "attachment; filename=\"rotated_90_test_image.jpg\""
    );
    assert_eq!(response.headers().get("content-type").unwrap(), "image/jpeg");

    let body = body_bytes(response).await;
    assert!(is_valid_jpeg(&body), "Response should be a valid JPEG");
    assert_eq!(decode(&body).dimensions(), (100, 100));

    // Same bytes persisted in the derived store
    let stored = app.processed.read("rotated_90_test_image.jpg").await.unwrap();
    assert_eq!(stored, body);
}

#[tokio::test]
async fn test_rotate_default_degrees() {
    let app = app_with_test_image().await;

    let response = app.get("/rotate/test_image.jpg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&response),
        "attachment; filename=\"rotated_90_test_image.jpg\""
    );
}

#[tokio::test]
async fn test_rotate_non_square_swaps_dimensions() {
    let app = TestApp::new().await;
    let png = create_test_image(40, 20, ImageFormat::Png);
    app.upload("wide.png", "image/png", &png).await;

    let response = app.get("/rotate/wide.png?degrees=90").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");

    let body = body_bytes(response).await;
    assert_eq!(decode(&body).dimensions(), (20, 40));
}

#[tokio::test]
async fn test_rotate_arbitrary_angle_expands() {
    let app = TestApp::new().await;
    let png = create_test_image(100, 50, ImageFormat::Png);
    app.upload("wide.png", "image/png", &png).await;

    let response = app.get("/rotate/wide.png?degrees=45").await;
    assert_eq!(
        content_disposition(&response),
        "attachment; filename=\"rotated_45_wide.png\""
    );

    let body = body_bytes(response).await;
    assert_eq!(decode(&body).dimensions(), rotated_bounds(100, 50, 45));
}

#[tokio::test]
async fn test_rotate_invalid_degrees_rejected() {
    let app = app_with_test_image().await;

    let response = app.get("/rotate/test_image.jpg?degrees=ninety").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Grayscale
// =============================================================================

#[tokio::test]
async fn test_grayscale() {
    let app = app_with_test_image().await;

    let response = app.get("/grayscale/test_image.jpg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&response),
        "attachment; filename=\"grayscale_test_image.jpg\""
    );

    let body = body_bytes(response).await;
    let image = decode(&body);
    assert_eq!(image.color(), ColorType::L8);
    assert_eq!(image.dimensions(), (100, 100));
}

// =============================================================================
// Resize
// =============================================================================

#[tokio::test]
async fn test_resize() {
    let app = app_with_test_image().await;

    let response = app.get("/resize/test_image.jpg?width=30&height=60").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&response),
        "attachment; filename=\"resized_30x60_test_image.jpg\""
    );

    let body = body_bytes(response).await;
    assert_eq!(decode(&body).dimensions(), (30, 60));
}

#[tokio::test]
async fn test_resize_missing_parameters_rejected() {
    let app = app_with_test_image().await;

    let response = app.get("/resize/test_image.jpg?width=30").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resize_zero_dimension() {
    let app = app_with_test_image().await;

    let response = app.get("/resize/test_image.jpg?width=0&height=10").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid dimensions"));
    assert!(!app
        .processed
        .contains("resized_0x10_test_image.jpg")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_resize_over_pixel_budget() {
    let app = app_with_test_image().await;

    let response = app
        .get("/resize/test_image.jpg?width=1000000&height=1000000")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid dimensions: 1000000x1000000"));
    assert!(!app
        .processed
        .contains("resized_1000000x1000000_test_image.jpg")
        .await
        .unwrap());

    // The server keeps answering afterwards
    let response = app.get("/resize/test_image.jpg?width=30&height=60").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(is_valid_jpeg(&body_bytes(response).await));
}

// =============================================================================
// Crop
// =============================================================================

#[tokio::test]
async fn test_crop() {
    let app = app_with_test_image().await;

    let response = app
        .get("/crop/test_image.jpg?left=10&top=20&right=60&bottom=50")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&response),
        "attachment; filename=\"cropped_test_image.jpg\""
    );

    let body = body_bytes(response).await;
    assert_eq!(decode(&body).dimensions(), (50, 30));
}

#[tokio::test]
async fn test_crop_out_of_range_clamped() {
    let app = app_with_test_image().await;

    let response = app
        .get("/crop/test_image.jpg?left=-5&top=-5&right=500&bottom=80")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_bytes(response).await;
    assert_eq!(decode(&body).dimensions(), (100, 80));
}

#[tokio::test]
async fn test_crop_empty_box() {
    let app = app_with_test_image().await;

    let response = app
        .get("/crop/test_image.jpg?left=60&top=0&right=10&bottom=50")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Crop box"));
}

// =============================================================================
// Filter
// =============================================================================

#[tokio::test]
async fn test_filter_default_blur() {
    let app = app_with_test_image().await;

    let response = app.get("/filter/test_image.jpg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&response),
        "attachment; filename=\"blur_test_image.jpg\""
    );

    let body = body_bytes(response).await;
    assert_eq!(decode(&body).dimensions(), (100, 100));
}

#[tokio::test]
async fn test_filter_sharpen_keeps_requested_case() {
    let app = app_with_test_image().await;

    let response = app.get("/filter/test_image.jpg?filter_type=Sharpen").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&response),
        "attachment; filename=\"Sharpen_test_image.jpg\""
    );
    assert!(app
        .processed
        .contains("Sharpen_test_image.jpg")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_filter_unsupported_type() {
    let app = app_with_test_image().await;

    let response = app.get("/filter/test_image.jpg?filter_type=emboss").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Unsupported filter type: emboss");
}

// =============================================================================
// Missing Images
// =============================================================================

#[tokio::test]
async fn test_image_not_found_all_transforms() {
    let app = TestApp::new().await;

    for uri in [
        "/rotate/non_existent_image.jpg?degrees=90",
        "/grayscale/non_existent_image.jpg",
        "/resize/non_existent_image.jpg?width=10&height=10",
        "/crop/non_existent_image.jpg?left=0&top=0&right=10&bottom=10",
        "/filter/non_existent_image.jpg?filter_type=blur",
        "/filter/non_existent_image.jpg?filter_type=emboss",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Image not found", "{}", uri);
    }
}

// =============================================================================
// Path Traversal
// =============================================================================

#[tokio::test]
async fn test_lookup_cannot_escape_store() {
    let app = TestApp::new().await;

    // A valid image next to, not inside, the source store
    let png = create_test_image(8, 8, ImageFormat::Png);
    std::fs::write(app.dir.path().join("secret.png"), &png).unwrap();

    let response = app.get("/grayscale/..%2Fsecret.png").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Image not found");
}

#[tokio::test]
async fn test_lookup_uses_basename() {
    let app = app_with_test_image().await;

    let response = app.get("/grayscale/..%2F..%2Ftest_image.jpg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&response),
        "attachment; filename=\"grayscale_test_image.jpg\""
    );
}

#[tokio::test]
async fn test_derived_name_too_long() {
    let app = TestApp::new().await;

    let name = format!("{}.jpg", "a".repeat(250));
    let json = app.upload(&name, "image/jpeg", &create_test_jpeg()).await;
    assert!(json.get("info").is_some());

    let response = app.get(&format!("/grayscale/{}", name)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Derived filename is too long"));
}

// =============================================================================
// Determinism
// =============================================================================

#[tokio::test]
async fn test_repeat_request_overwrites_same_file() {
    let app = app_with_test_image().await;

    let first = body_bytes(app.get("/resize/test_image.jpg?width=20&height=20").await).await;
    let second = body_bytes(app.get("/resize/test_image.jpg?width=20&height=20").await).await;
    assert_eq!(first, second);

    let entries: Vec<_> = std::fs::read_dir(app.processed.root())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("resized_20x20_test_image.jpg")]);
}

#[tokio::test]
async fn test_source_image_unchanged_by_transforms() {
    let app = app_with_test_image().await;
    let before = app.images.read("test_image.jpg").await.unwrap();

    app.get("/rotate/test_image.jpg?degrees=180").await;
    app.get("/grayscale/test_image.jpg").await;

    let after = app.images.read("test_image.jpg").await.unwrap();
    assert_eq!(before, after);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}
