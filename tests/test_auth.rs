mod common;

use lap_cms::auth::models::Role;

#[tokio::test]
async fn login_success_sets_cookie() {
    let env = common::TestEnv::start().await;
    env.add_staff("Ada", "ada@example.com", "secret1", Role::Admin)
        .await;
    let server = env.server();

    let response = common::login(&server, "ada@example.com", "secret1").await;
    response.assert_status_ok();

    let cookie = response.cookie("token");
    assert!(cookie.http_only().unwrap_or(false));
    assert_eq!(cookie.path(), Some("/"));

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"].as_str(), Some("Login successful"));
    assert_eq!(body["user"]["email"].as_str(), Some("ada@example.com"));
    assert_eq!(body["user"]["role"].as_str(), Some("admin"));
}

#[tokio::test]
async fn login_is_case_insensitive_on_email() {
    let env = common::TestEnv::start().await;
    env.add_staff("Ada", "ada@example.com", "secret1", Role::Manager)
        .await;
    let server = env.server();

    common::login(&server, "  ADA@Example.com ", "secret1")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn login_wrong_password() {
    let env = common::TestEnv::start().await;
    env.add_staff("Ada", "ada@example.com", "secret1", Role::Admin)
        .await;
    let server = env.server_permissive();

    let response = common::login(&server, "ada@example.com", "nope-nope").await;
    response.assert_status_unauthorized();

    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"].as_str(),
        Some("Incorrect password. Please try again.")
    );
}

#[tokio::test]
async fn login_unknown_user() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = common::login(&server, "ghost@example.com", "whatever").await;
    response.assert_status_unauthorized();

    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"].as_str(),
        Some("No account found with this email address.")
    );
}

#[tokio::test]
async fn login_invalid_email() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = common::login(&server, "not-an-email", "whatever").await;
    response.assert_status_bad_request();

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"].as_str(), Some("The email address is invalid."));
}

#[tokio::test]
async fn repeated_failures_lock_the_account() {
    let env = common::TestEnv::start().await;
    env.add_staff("Ada", "ada@example.com", "secret1", Role::Admin)
        .await;
    let server = env.server_permissive();

    for _ in 0..4 {
        common::login(&server, "ada@example.com", "wrong-one")
            .await
            .assert_status_unauthorized();
    }
    common::login(&server, "ada@example.com", "wrong-one")
        .await
        .assert_status(axum::http::StatusCode::TOO_MANY_REQUESTS);

    // Locked: even the right password is refused.
    let response = common::login(&server, "ada@example.com", "secret1").await;
    response.assert_status(axum::http::StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"].as_str(),
        Some("Too many failed attempts. Please try again later.")
    );
}

#[tokio::test]
async fn login_without_staff_profile_is_forbidden() {
    let env = common::TestEnv::start().await;
    env.identity
        .create_account("reader@example.com", "secret1")
        .await
        .unwrap();
    let server = env.server_permissive();

    let response = common::login(&server, "reader@example.com", "secret1").await;
    response.assert_status_forbidden();
    assert!(response.maybe_cookie("token").is_none());
}

#[tokio::test]
async fn me_with_valid_cookie() {
    let env = common::TestEnv::start().await;
    let (server, author) = env.signed_in(Role::Super).await;

    let response = server.get("/api/auth/me").await;
    response.assert_status_ok();

    let user: serde_json::Value = response.json();
    assert_eq!(user["uid"].as_str(), Some(author.uid.as_str()));
    assert_eq!(user["role"].as_str(), Some("super"));
}

#[tokio::test]
async fn me_without_cookie() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = server.get("/api/auth/me").await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn me_with_forged_cookie() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let forged = lap_cms::auth::session::SessionKeys::new("some-other-secret", 3600)
        .issue(&lap_cms::auth::identity::Identity {
            uid: "uid-x".into(),
            email: "x@example.com".into(),
        })
        .unwrap();

    let response = server
        .get("/api/auth/me")
        .add_cookie(cookie::Cookie::new("token", forged))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn role_revoked_after_login_is_denied() {
    let env = common::TestEnv::start().await;
    let (server, author) = env.signed_in(Role::Manager).await;

    env.authors.delete(&author.id).await.unwrap();

    let response = server.get("/api/auth/me").await;
    response.assert_status_forbidden();
}

#[tokio::test]
async fn logout_clears_cookie() {
    let env = common::TestEnv::start().await;
    let (server, _) = env.signed_in(Role::Admin).await;

    server.get("/api/auth/me").await.assert_status_ok();

    server.post("/api/auth/logout").expect_success().await;

    let response = server.get("/api/auth/me").await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn admin_paths_redirect_without_session() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    for path in ["/admin", "/admin/articles", "/admin/team/new"] {
        let response = server.get(path).await;
        response.assert_status(axum::http::StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/auth/login");
    }
}

#[tokio::test]
async fn admin_paths_pass_with_session() {
    let env = common::TestEnv::start().await;
    let (server, _) = env.signed_in(Role::Manager).await;

    // The REST router has no page routes, so a passing guard yields 404.
    let response = server.get("/admin").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn change_password() {
    let env = common::TestEnv::start().await;
    let (server, _) = env.signed_in(Role::Manager).await;

    server
        .post("/api/auth/password")
        .json(&serde_json::json!({ "new_password": "brand-new-pw" }))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    let fresh = env.server_permissive();
    common::login(&fresh, "manager@example.com", "password1")
        .await
        .assert_status_unauthorized();
    common::login(&fresh, "manager@example.com", "brand-new-pw")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn change_password_rejects_weak_password() {
    let env = common::TestEnv::start().await;
    let (server, _) = env.signed_in(Role::Admin).await;

    let response = server
        .post("/api/auth/password")
        .json(&serde_json::json!({ "new_password": "123" }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"].as_str(),
        Some("Password should be at least 6 characters.")
    );
}

#[tokio::test]
async fn robots_txt_disallows_everything() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let response = server.get("/robots.txt").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "User-agent: *\nDisallow: /\n");
}
