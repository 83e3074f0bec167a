//! Integration tests for the admin console: pages, import and JSON mutations.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, body_text, build_test_app};
use serde_json::json;

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[tokio::test]
async fn import_is_idempotent() {
    let app = build_test_app();
    app.add_photo("weddings/first_dance.png");
    app.add_photo("portrait.png");
    std::fs::write(app.data_dir.path().join("readme.txt"), "not a photo").unwrap();

    let first = app.import().await;
    assert_eq!(
        first,
        json!({ "success": true, "imported": 2, "skipped": 0, "total_found": 2 })
    );

    let second = app.import().await;
    assert_eq!(second["imported"], 0);
    assert_eq!(second["skipped"], second["total_found"]);
    assert_eq!(second["total_found"], 2);
}

#[tokio::test]
async fn import_picks_up_new_files_only() {
    let app = build_test_app();
    app.add_photo("one.png");
    app.import().await;
    app.add_photo("two.png");

    let summary = app.import().await;
    assert_eq!(summary["imported"], 1);
    assert_eq!(summary["skipped"], 1);
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_image_keeps_file() {
    let app = build_test_app();
    app.add_photo("keep.png");
    app.import().await;
    let id = app.published().await[0]["id"].as_i64().unwrap();

    let response = app
        .send(Method::DELETE, &format!("/admin/api/images/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.published().await.is_empty());
    assert!(app.data_dir.path().join("keep.png").exists());

    let again = app
        .send(Method::DELETE, &format!("/admin/api/images/{id}"), None)
        .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(again).await,
        json!({ "success": false, "error": "Image not found" })
    );
}

#[tokio::test]
async fn delete_category_removes_its_images() {
    let app = build_test_app();
    app.add_photo("a.png");
    app.add_photo("b.png");
    app.import().await;
    let portraits = app.category_id("portraits").await;

    let response = app
        .send(
            Method::DELETE,
            &format!("/admin/api/categories/{portraits}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.published().await.is_empty());

    let categories = body_json(app.get("/api/categories").await).await;
    assert_eq!(categories.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_targets_are_404() {
    let app = build_test_app();
    app.add_photo("a.png");
    app.import().await;
    let id = app.published().await[0]["id"].as_i64().unwrap();

    let cases = [
        (Method::POST, "/admin/api/images/999/featured".to_string(), None),
        (
            Method::POST,
            "/admin/api/images/999".to_string(),
            Some(json!({ "title": "x", "description": "", "alt_text": "", "is_published": true })),
        ),
        (
            Method::POST,
            format!("/admin/api/images/{id}/category"),
            Some(json!({ "category_id": 999 })),
        ),
        (Method::DELETE, "/admin/api/categories/999".to_string(), None),
    ];
    for (method, uri, body) in cases {
        let response = app.send(method, &uri, body).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_json(response).await["success"], false);
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_shows_stats() {
    let app = build_test_app();
    app.add_photo("a.png");
    app.import().await;

    let response = app.get("/admin").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains("Test Studio"));
    assert!(html.contains("<div class=\"stat-number\">1</div><div>Total Images</div>"));
    assert!(html.contains("<span>Portraits</span><span>1 images</span>"));
    assert!(html.contains("href=\"/admin/featured\""));
}

#[tokio::test]
async fn admin_pages_render() {
    let app = build_test_app();
    app.add_photo("street/<night>.png");
    app.import().await;

    for uri in [
        "/admin/import",
        "/admin/portfolio",
        "/admin/categories",
        "/admin/featured",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let html = body_text(response).await;
        assert!(html.starts_with("<!DOCTYPE html>"), "{uri}");
        assert!(!html.contains("<night>"), "{uri} leaks unescaped text");
    }

    let portfolio = body_text(app.get("/admin/portfolio").await).await;
    assert!(portfolio.contains("&lt;Night&gt;"));
}

#[tokio::test]
async fn featured_page_shows_current_choice() {
    let app = build_test_app();
    app.add_photo("hero.png");
    app.import().await;
    let id = app.published().await[0]["id"].as_i64().unwrap();

    let before = body_text(app.get("/admin/featured").await).await;
    assert!(before.contains("No featured image set"));
    assert!(before.contains(&format!("/admin/api/images/{id}/featured")));

    app.send(Method::POST, &format!("/admin/api/images/{id}/featured"), None)
        .await;
    let after = body_text(app.get("/admin/featured").await).await;
    assert!(after.contains("Current Featured Image"));
    assert!(after.contains("Hero"));
}
