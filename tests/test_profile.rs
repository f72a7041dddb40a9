mod common;

use lap_cms::auth::models::Role;

#[tokio::test]
async fn get_own_profile() {
    let env = common::TestEnv::start().await;
    let (server, author) = env.signed_in(Role::Manager).await;

    let profile: serde_json::Value = server.get("/api/v1/profile").await.json();
    assert_eq!(profile["_id"].as_str(), Some(author.id.as_str()));
    assert_eq!(profile["email"].as_str(), Some("manager@example.com"));
}

#[tokio::test]
async fn profile_edit_never_changes_role() {
    let env = common::TestEnv::start().await;
    let (server, author) = env.signed_in(Role::Manager).await;

    let updated: serde_json::Value = server
        .put("/api/v1/profile")
        .json(&serde_json::json!({
            "name": "Max Manager",
            "city": "Rome",
            "job": "Writer",
            "biography": { "summary": "Hi", "body": "" },
            "slug": "max",
            "role": "super"
        }))
        .await
        .json();

    assert_eq!(updated["name"].as_str(), Some("Max Manager"));
    assert_eq!(updated["slug"].as_str(), Some("max"));
    assert_eq!(updated["role"].as_str(), Some("manager"));
    assert_eq!(updated["biography"]["summary"].as_str(), Some("Hi"));

    let stored = env.authors.find_by_id(&author.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Some(Role::Manager));
    assert_eq!(stored.city, "Rome");
}

#[tokio::test]
async fn profile_name_is_required() {
    let env = common::TestEnv::start().await;
    let (server, _) = env.signed_in(Role::Admin).await;

    let response = server
        .put("/api/v1/profile")
        .json(&serde_json::json!({ "name": " " }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"].as_str(), Some("Name is required."));
}

#[tokio::test]
async fn empty_password_change_is_rejected() {
    let env = common::TestEnv::start().await;
    let (server, _) = env.signed_in(Role::Admin).await;

    let response = server
        .post("/api/auth/password")
        .json(&serde_json::json!({ "new_password": "" }))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"].as_str(), Some("New password is required."));
}
