//! Thumbnail upload integration tests, one group per storage strategy.
//!
//! Run with: `cargo test -p tubely-api --test thumbnails_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::auth::TestUser;
use helpers::fixtures::{fake_png, thumbnail_form};
use helpers::{setup_test_app, TestAppBuilder, PUBLIC_BASE_URL};
use tubely_core::ThumbnailStrategy;
use uuid::Uuid;

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_memory_thumbnail_roundtrip() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.seed_video(user.id).await;

    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(fake_png(), "cover.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let expected_url = format!("{}/thumbnails/{}", PUBLIC_BASE_URL, video.id);
    let body: serde_json::Value = response.json();
    assert_eq!(body["thumbnail_url"], expected_url);
    assert_eq!(
        app.stored_video(video.id).await.thumbnail_url.as_deref(),
        Some(expected_url.as_str())
    );

    let served = app
        .client()
        .get(&format!("/thumbnails/{}", video.id))
        .await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.header("content-type"), "image/png");
    assert_eq!(served.as_bytes().as_ref(), fake_png().as_ref());
}

#[tokio::test]
async fn test_memory_thumbnail_missing() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&format!("/thumbnails/{}", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_gif_thumbnail_rejected() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.seed_video(user.id).await;

    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(
            bytes::Bytes::from_static(b"GIF89a"),
            "cover.gif",
            "image/gif",
        ))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");

    assert_eq!(app.stored_video(video.id).await, video);
    let served = app
        .client()
        .get(&format!("/thumbnails/{}", video.id))
        .await;
    assert_eq!(served.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_user_cannot_set_thumbnail() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let intruder = TestUser::new();
    let video = app.seed_video(owner.id).await;

    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .add_header("Authorization", intruder.bearer())
        .multipart(thumbnail_form(fake_png(), "cover.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.stored_video(video.id).await, video);
}

#[tokio::test]
async fn test_data_url_thumbnail() {
    let app = TestAppBuilder::default()
        .thumbnail_strategy(ThumbnailStrategy::DataUrl)
        .build()
        .await;
    let user = TestUser::new();
    let video = app.seed_video(user.id).await;

    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(
            bytes::Bytes::from_static(b"abc"),
            "cover.jpg",
            "image/jpeg",
        ))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["thumbnail_url"], "data:image/jpeg;base64,YWJj");

    // No in-memory route with this strategy
    let served = app
        .client()
        .get(&format!("/thumbnails/{}", video.id))
        .await;
    assert_eq!(served.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filesystem_thumbnail() {
    let app = TestAppBuilder::default()
        .thumbnail_strategy(ThumbnailStrategy::Filesystem)
        .build()
        .await;
    let user = TestUser::new();
    let video = app.seed_video(user.id).await;

    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(fake_png(), "../../cover.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let url = body["thumbnail_url"].as_str().unwrap().to_string();
    let file_name = url
        .strip_prefix(&format!("{}/assets/", PUBLIC_BASE_URL))
        .expect("thumbnail URL should point under /assets");
    assert!(file_name.ends_with(".png"));
    assert!(!file_name.contains("cover"));
    assert!(!file_name.contains('/'));

    let on_disk = std::fs::read(app.assets_dir().join(file_name)).unwrap();
    assert_eq!(on_disk, fake_png().to_vec());

    let served = app
        .client()
        .get(&format!("/assets/{}", file_name))
        .await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.as_bytes().as_ref(), fake_png().as_ref());
}

#[tokio::test]
async fn test_oversize_thumbnail_rejected() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.seed_video(user.id).await;

    // Default test ceiling is 64 KiB
    let data = bytes::Bytes::from(vec![0u8; 65 * 1024]);
    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(data, "cover.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(app.stored_video(video.id).await.thumbnail_url.is_none());
}

#[tokio::test]
async fn test_thumbnail_after_other_fields() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.seed_video(user.id).await;

    let form = MultipartForm::new()
        .add_text("caption", "ignored")
        .add_text("alt", "ignored")
        .add_part(
            "thumbnail",
            Part::bytes(fake_png()).file_name("cover.png").mime_type("image/png"),
        );
    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        app.stored_video(video.id).await.thumbnail_url,
        Some(format!("{}/thumbnails/{}", PUBLIC_BASE_URL, video.id))
    );
}

#[tokio::test]
async fn test_missing_thumbnail_field() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.seed_video(user.id).await;

    let form = MultipartForm::new().add_text("caption", "no file here");
    let response = app
        .client()
        .post(&format!("/videos/{}/thumbnail", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_FORM");
}
