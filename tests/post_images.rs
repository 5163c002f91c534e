mod common;

use common::{png_upload, spawn_app};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_post_without_images_is_not_found() {
    let (app, _) = spawn_app().await;

    let response = app
        .client
        .get(format!("{}/api/posts/p404/image", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No image found for post");
}

#[tokio::test]
async fn test_post_without_images_lists_nothing() {
    let (app, _) = spawn_app().await;

    let response = app
        .client
        .get(format!("{}/api/posts/p404/images", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_latest_upload_is_the_post_image() {
    let (app, _) = spawn_app().await;

    let first: Value = app
        .upload(Some("u1"), png_upload("p1"))
        .await
        .json()
        .await
        .unwrap();
    let second: Value = app
        .upload(Some("u1"), png_upload("p1"))
        .await
        .json()
        .await
        .unwrap();
    // Another post must not leak in
    app.upload(Some("u1"), png_upload("p2")).await;

    let image: Value = app
        .client
        .get(format!("{}/api/posts/p1/image", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(image["post_id"], "p1");
    assert_eq!(image["user_id"], "u1");
    assert_eq!(image["path"], second["path"]);
    assert_eq!(image["thumbnail_path"], second["thumbnail_path"]);
    assert!(image["id"].as_str().is_some());
    assert!(image["created_at"].as_str().is_some());

    let images: Vec<Value> = app
        .client
        .get(format!("{}/api/posts/p1/images", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let paths: Vec<&Value> = images.iter().map(|image| &image["path"]).collect();
    assert_eq!(paths, vec![&second["path"], &first["path"]]);
}
