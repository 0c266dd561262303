//! 照片 API 集成测试

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{
    create_photo, create_test_app, register_and_login, register_user, send, send_raw,
};

#[tokio::test]
async fn test_end_to_end_ownership() {
    let app = create_test_app();

    // 注册 ana，邮箱统一为小写
    let response = send(
        &app,
        "POST",
        "/users/register",
        None,
        None,
        Some(json!({"username": "ana", "email": "ANA@x.com", "password": "secret1", "age": 20})),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["email"], "ana@x.com");

    // 登录拿到 access_token Cookie
    let response = send(
        &app,
        "POST",
        "/users/login",
        None,
        None,
        Some(json!({"email": "ana@x.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let ana_cookie = response.cookie("access_token").expect("access_token cookie");
    let ana_cookie = ana_cookie.split(';').next().unwrap().to_string();

    // bob 拥有一张照片
    let (_, bob_token) = register_and_login(&app, "bob").await;
    let photo_id = create_photo(&app, &bob_token, "bob's photo").await;

    // ana 修改 bob 的照片被拒绝
    let response = send(
        &app,
        "PUT",
        &format!("/photos/{}", photo_id),
        None,
        Some(&ana_cookie),
        Some(json!({"title": "mine now", "photo_url": "https://img.example.com/x.jpg"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"]["code"], 403);
}

#[tokio::test]
async fn test_create_and_get_photo() {
    let app = create_test_app();
    let (user_id, token) = register_and_login(&app, "ana").await;

    let response = send(
        &app,
        "POST",
        "/photos",
        Some(&token),
        None,
        Some(json!({
            "title": "sunset",
            "caption": "at the beach",
            "photo_url": "https://img.example.com/sunset.jpg"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let data = &response.body["data"];
    assert_eq!(data["title"], "sunset");
    assert_eq!(data["caption"], "at the beach");
    assert_eq!(data["user_id"], user_id);
    let id = data["id"].as_i64().unwrap();

    let response = send(&app, "GET", &format!("/photos/{}", id), Some(&token), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], id);
    assert_eq!(response.body["data"]["user"]["username"], "ana");
    assert_eq!(response.body["data"]["user"]["email"], "ana@example.com");
}

#[tokio::test]
async fn test_create_photo_validation() {
    let app = create_test_app();
    let (_, token) = register_and_login(&app, "ana").await;

    let cases = [
        json!({"title": "", "photo_url": "https://img.example.com/a.jpg"}),
        json!({"title": "a", "photo_url": "not a url"}),
        json!({"title": "a"}),
        json!({"title": "   ", "photo_url": "https://img.example.com/a.jpg"}),
        json!({"title": "a", "photo_url": "https://img.example.com/a.jpg", "caption": "x".repeat(201)}),
    ];

    for body in cases {
        let response = send(&app, "POST", "/photos", Some(&token), None, Some(body.clone())).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {}", body);
    }

    let response = send_raw(&app, "POST", "/photos", &token, "{not json").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_photos_paginates() {
    let app = create_test_app();
    let (_, token) = register_and_login(&app, "ana").await;
    for i in 0..12 {
        create_photo(&app, &token, &format!("photo {}", i)).await;
    }

    let response = send(&app, "GET", "/photos", Some(&token), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let photos = response.body["data"].as_array().unwrap();
    assert_eq!(photos.len(), 10);
    assert_eq!(photos[0]["title"], "photo 0");
    assert_eq!(photos[0]["user"]["username"], "ana");

    let response = send(&app, "GET", "/photos?page=2&limit=10", Some(&token), None, None).await;
    let photos = response.body["data"].as_array().unwrap();
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0]["title"], "photo 10");

    let response = send(&app, "GET", "/photos?page=0", Some(&token), None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/photos?limit=abc", Some(&token), None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_photos_rejects_huge_page() {
    let app = create_test_app();
    let (_, token) = register_and_login(&app, "ana").await;

    let response = send(
        &app,
        "GET",
        "/photos?page=9223372036854775807&limit=10",
        Some(&token),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // 上限页码合法，只是没有数据
    let response = send(&app, "GET", "/photos?page=1000000&limit=100", Some(&token), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_photo_by_owner() {
    let app = create_test_app();
    let (_, token) = register_and_login(&app, "ana").await;
    let id = create_photo(&app, &token, "before").await;

    let response = send(
        &app,
        "PUT",
        &format!("/photos/{}", id),
        Some(&token),
        None,
        Some(json!({"title": "after", "photo_url": "https://img.example.com/after.jpg"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], "after");
    assert!(response.body["data"]["caption"].is_null());

    let response = send(
        &app,
        "PUT",
        &format!("/photos/{}", id),
        Some(&token),
        None,
        Some(json!({"title": "   ", "photo_url": "https://img.example.com/after.jpg"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_owner_forbidden_regardless_of_payload() {
    let app = create_test_app();
    let (_, owner_token) = register_and_login(&app, "ana").await;
    let (_, other_token) = register_and_login(&app, "bob").await;
    let id = create_photo(&app, &owner_token, "ana's").await;
    let uri = format!("/photos/{}", id);

    // 非法请求体
    let response = send(&app, "PUT", &uri, Some(&other_token), None, Some(json!({"title": ""}))).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = send_raw(&app, "PUT", &uri, &other_token, "{broken").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = send(&app, "DELETE", &uri, Some(&other_token), None, None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // 照片仍然存在
    let response = send(&app, "GET", &uri, Some(&owner_token), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], "ana's");
}

#[tokio::test]
async fn test_missing_photo_not_found() {
    let app = create_test_app();
    let (_, token) = register_and_login(&app, "ana").await;

    let response = send(&app, "GET", "/photos/9999", Some(&token), None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = send(
        &app,
        "PUT",
        "/photos/9999",
        Some(&token),
        None,
        Some(json!({"title": "x", "photo_url": "https://img.example.com/x.jpg"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", "/photos/9999", Some(&token), None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/photos/abc", Some(&token), None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_photo_removes_comments() {
    let app = create_test_app();
    let (_, token) = register_and_login(&app, "ana").await;
    let id = create_photo(&app, &token, "temp").await;

    let response = send(
        &app,
        "POST",
        "/comments",
        Some(&token),
        None,
        Some(json!({"message": "first", "photo_id": id})),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let comment_id = response.body["data"]["id"].as_i64().unwrap();

    let response = send(&app, "DELETE", &format!("/photos/{}", id), Some(&token), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "success"}));

    let response = send(
        &app,
        "GET",
        &format!("/comments/{}", comment_id),
        Some(&token),
        None,
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_delete_cascades_photos() {
    let app = create_test_app();
    let (_, ana_token) = register_and_login(&app, "ana").await;
    let (_, bob_token) = register_and_login(&app, "bob").await;
    let id = create_photo(&app, &ana_token, "ana's").await;

    let response = send(&app, "DELETE", "/users", Some(&ana_token), None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(&app, "GET", &format!("/photos/{}", id), Some(&bob_token), None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // 邮箱释放后可以重新注册
    register_user(&app, "ana", "ana@example.com", "secret1").await;
}
