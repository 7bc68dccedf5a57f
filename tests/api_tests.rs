use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use warden::config::Config;

/// Matches the bootstrap credential from the default config.
const PRIMARY_EMAIL: &str = "aaryabpandey@gmail.com";
const BOOTSTRAP_PASSWORD: &str = "pandeyaarya254";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    config.oidc.enabled = false;

    let state = warden::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    warden::api::router(state)
        .await
        .expect("Failed to build router")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Log in with the bootstrap credential and return the session cookie.
async fn login(app: &Router) -> String {
    let payload = serde_json::json!({
        "email": PRIMARY_EMAIL,
        "password": BOOTSTRAP_PASSWORD,
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_catalog_is_public() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/games")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let games = body_json(response).await;
    let games = games.as_array().expect("games should be an array");
    assert_eq!(games.len(), 6);
    assert!(games[0]["imageUrl"].is_string());
}

#[tokio::test]
async fn test_catalog_filters() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/games?category=Android")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let games = body_json(response).await;
    assert_eq!(games.as_array().unwrap().len(), 1);
    assert_eq!(games[0]["title"], "Minecraft Pocket Edition");

    // The "All" sentinel disables the category filter.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/games?category=All")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let games = body_json(response).await;
    assert_eq!(games.as_array().unwrap().len(), 6);

    // Search is a case-insensitive substring match on the title.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/games?search=last")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let games = body_json(response).await;
    let titles: Vec<&str> = games
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.iter().all(|t| t.contains("Last of Us")));
}

#[tokio::test]
async fn test_get_unknown_game_is_404() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/games/9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Game 9999 not found");
}

#[tokio::test]
async fn test_catalog_mutations_require_admin_session() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "title": "Test Game",
        "imageUrl": "https://example.com/cover.jpg",
        "downloadUrl": "https://example.com/game",
        "category": "PC",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/games")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/games/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "email": PRIMARY_EMAIL,
        "password": "wrong-password",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");

    // Unknown emails get the same generic rejection.
    let payload = serde_json::json!({
        "email": "nobody@example.com",
        "password": "whatever",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_create_and_fetch_game() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let payload = serde_json::json!({
        "title": "Cyber Runner",
        "imageUrl": "https://example.com/cover.jpg",
        "downloadUrl": "https://example.com/game",
        "category": "PC",
        "developer": "Indie Studio",
        "youtubeUrl": "",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/games")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["title"], "Cyber Runner");
    // Empty youtubeUrl is normalized away rather than stored.
    assert!(created["youtubeUrl"].is_null());
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/games/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["downloadUrl"], "https://example.com/game");
    assert_eq!(fetched["developer"], "Indie Studio");
}

#[tokio::test]
async fn test_create_game_rejects_invalid_image_url() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let payload = serde_json::json!({
        "title": "Broken Game",
        "imageUrl": "not-a-url",
        "downloadUrl": "https://example.com/game",
        "category": "PC",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/games")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid imageUrl: must be a valid URL");
}

#[tokio::test]
async fn test_update_and_delete_game() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let patch = serde_json::json!({ "title": "Grand Theft Auto V" });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/games/1")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&patch).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Grand Theft Auto V");
    // Untouched fields survive a partial update.
    assert_eq!(updated["category"], "PC");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/games/1")
                .header("Cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/games/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reorder_controls_listing_order() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let payload = serde_json::json!({
        "orders": [
            { "id": 5, "order": 100 },
            { "id": 2, "order": 50 },
        ]
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/games/reorder")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/games")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let games = body_json(response).await;
    let games = games.as_array().unwrap();

    // Highest order first.
    assert_eq!(games[0]["id"], 5);
    assert_eq!(games[1]["id"], 2);
}

#[tokio::test]
async fn test_admin_roster_management() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    // No credential rows exist yet; the bootstrap principal is not stored.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/list")
                .header("Cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    let payload = serde_json::json!({
        "email": "second@example.com",
        "password": "hunter22",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admins")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["email"], "second@example.com");

    // The roster never exposes password hashes.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/list")
                .header("Cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let admins = body_json(response).await;
    let admins = admins.as_array().unwrap();
    assert_eq!(admins.len(), 1);
    assert!(admins[0].get("passwordHash").is_none());

    // The new credential works for login.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "second@example.com",
                        "password": "hunter22",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_promote_requires_password_for_new_admin() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let payload = serde_json::json!({ "email": "newcomer@example.com" });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/promote")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Password required for new admin");

    // With a password the promotion creates the credential.
    let payload = serde_json::json!({
        "email": "newcomer@example.com",
        "password": "secret99",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/promote")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bootstrap_login_survives_credential_row() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    // Give the primary admin a real credential row with a different password.
    let payload = serde_json::json!({
        "email": PRIMARY_EMAIL,
        "password": "rotated-pass1",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/promote")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The stored credential works.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": PRIMARY_EMAIL,
                        "password": "rotated-pass1",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The bootstrap password keeps working alongside it.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": PRIMARY_EMAIL,
                        "password": BOOTSTRAP_PASSWORD,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_patch_clears_trailer_url() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let payload = serde_json::json!({
        "title": "Trailer Park",
        "imageUrl": "https://example.com/cover.jpg",
        "downloadUrl": "https://example.com/game",
        "category": "PC",
        "youtubeUrl": "https://youtu.be/abc123",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/games")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["youtubeUrl"], "https://youtu.be/abc123");

    // A patch that omits youtubeUrl leaves the stored trailer alone.
    let patch = serde_json::json!({ "title": "Trailer Park Deluxe" });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/games/{id}"))
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&patch).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let updated = body_json(response).await;
    assert_eq!(updated["youtubeUrl"], "https://youtu.be/abc123");

    // An explicit empty string clears it.
    let patch = serde_json::json!({ "youtubeUrl": "" });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/games/{id}"))
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&patch).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let cleared = body_json(response).await;
    assert!(cleared["youtubeUrl"].is_null());
}

#[tokio::test]
async fn test_primary_admin_cannot_be_removed() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let payload = serde_json::json!({ "email": PRIMARY_EMAIL });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/remove")
                .header("Content-Type", "application/json")
                .header("Cookie", &cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Cannot remove primary admin");
}

#[tokio::test]
async fn test_admin_routes_reject_anonymous() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/list")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user_endpoint() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&app).await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/user")
                .header("Cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], PRIMARY_EMAIL);
    assert_eq!(body["isSuperAdmin"], true);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/logout")
                .header("Cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/user")
                .header("Cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
