//! Organization API integration tests

use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{AcmeFixture, OrganizationFactory, TestApp, UserFactory};

#[tokio::test]
async fn test_create_returns_organization_and_admin_membership() {
    let app = TestApp::new().await;
    let alice = app.create_user(Some("Alice"), "alice@example.com").await;

    let response = app
        .post_json(
            "/api/v1/organizations",
            OrganizationFactory::named("Acme"),
            alice.token(),
        )
        .await;
    response.assert_created();

    let org: Value = response.json();
    assert_eq!(org["name"], "Acme");
    assert_eq!(org["description"], Value::Null);
    assert_eq!(org["owner_id"], alice.id.to_string());
    assert_eq!(org["created_at"], org["updated_at"]);

    let listed: Vec<Value> = app
        .get("/api/v1/organizations", alice.token())
        .await
        .json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Acme");
    assert_eq!(listed[0]["user_role"], "ADMIN");
    assert_eq!(listed[0]["member_count"], 1);
}

#[tokio::test]
async fn test_create_with_generated_payload() {
    let app = TestApp::new().await;
    let user = UserFactory::new().create(&app).await;
    let body = OrganizationFactory::body();

    let response = app
        .post_json("/api/v1/organizations", body.clone(), user.token())
        .await;
    response.assert_created();

    let org: Value = response.json();
    assert_eq!(org["name"], body["name"]);
    assert_eq!(org["description"], body["description"]);
}

#[tokio::test]
async fn test_create_accepts_boundary_lengths() {
    let app = TestApp::new().await;
    let alice = app.create_user(None, "alice@example.com").await;

    let body = json!({ "name": "n".repeat(100), "description": "d".repeat(500) });
    app.post_json("/api/v1/organizations", body, alice.token())
        .await
        .assert_created();
}

#[rstest]
#[case::empty_name(json!({ "name": "" }), "Organization name is required")]
#[case::long_name(
    json!({ "name": "n".repeat(101) }),
    "Organization name must be less than 100 characters"
)]
#[case::long_description(
    json!({ "name": "Acme", "description": "d".repeat(501) }),
    "Description must be less than 500 characters"
)]
#[tokio::test]
async fn test_create_rejects_invalid_input(#[case] body: Value, #[case] message: &str) {
    let app = TestApp::new().await;
    let alice = app.create_user(None, "alice@example.com").await;

    let response = app
        .post_json("/api/v1/organizations", body, alice.token())
        .await;
    response.assert_unprocessable();

    let json: Value = response.json();
    assert_eq!(json["error"], "validation_error");
    assert_eq!(json["message"], message);

    let listed: Vec<Value> = app
        .get("/api/v1/organizations", alice.token())
        .await
        .json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_create_without_name_is_a_validation_error() {
    let app = TestApp::new().await;
    let alice = app.create_user(None, "alice@example.com").await;

    let response = app
        .post_json(
            "/api/v1/organizations",
            json!({ "description": "no name" }),
            alice.token(),
        )
        .await;
    response.assert_unprocessable();
}

#[tokio::test]
async fn test_list_is_empty_without_memberships() {
    let app = TestApp::new().await;
    let carol = app.create_user(None, "carol@example.com").await;

    let listed: Vec<Value> = app
        .get("/api/v1/organizations", carol.token())
        .await
        .json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_list_orders_newest_first_with_member_counts() {
    let app = TestApp::new().await;
    let acme = AcmeFixture::seed(&app).await;
    let other = app.create_organization(&acme.bob, "Bob's Books").await;

    let listed: Vec<Value> = app
        .get("/api/v1/organizations", acme.bob.token())
        .await
        .json();

    let ids: Vec<&str> = listed.iter().map(|o| o["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![other.to_string(), acme.org_id.to_string()]);

    assert_eq!(listed[0]["user_role"], "ADMIN");
    assert_eq!(listed[0]["member_count"], 1);
    assert_eq!(listed[1]["user_role"], "MEMBER");
    assert_eq!(listed[1]["member_count"], 3);
}

#[tokio::test]
async fn test_get_by_id_for_member() {
    let app = TestApp::new().await;
    let acme = AcmeFixture::seed(&app).await;

    let response = app.get(&acme.org_uri(), acme.bob.token()).await;
    response.assert_ok();

    let detail: Value = response.json();
    assert_eq!(detail["id"], acme.org_id.to_string());
    assert_eq!(detail["name"], "Acme");
    assert_eq!(detail["owner"]["id"], acme.alice.id.to_string());
    assert_eq!(detail["owner"]["email"], "alice@example.com");
    assert_eq!(detail["member_count"], 3);
    assert_eq!(detail["user_role"], "MEMBER");
}

#[tokio::test]
async fn test_get_by_id_denies_non_member() {
    let app = TestApp::new().await;
    let acme = AcmeFixture::seed(&app).await;

    app.get(&acme.org_uri(), acme.carol.token())
        .await
        .assert_forbidden("access_denied");
}

#[tokio::test]
async fn test_get_by_id_unknown_and_malformed_ids() {
    let app = TestApp::new().await;
    let alice = app.create_user(None, "alice@example.com").await;

    let response = app
        .get(
            &format!("/api/v1/organizations/{}", Uuid::new_v4()),
            alice.token(),
        )
        .await;
    response.assert_not_found();
    assert_eq!(response.error_type(), "not_found");

    let response = app
        .get("/api/v1/organizations/not-a-uuid", alice.token())
        .await;
    response.assert_bad_request();
    let json: Value = response.json();
    assert_eq!(json["message"], "Invalid organization ID");
}

#[tokio::test]
async fn test_list_members_in_join_order() {
    let app = TestApp::new().await;
    let acme = AcmeFixture::seed(&app).await;

    let response = app.get(&acme.members_uri(), acme.bob.token()).await;
    response.assert_ok();

    let members: Vec<Value> = response.json();
    let emails: Vec<&str> = members
        .iter()
        .map(|m| m["user"]["email"].as_str().unwrap())
        .collect();
    assert_eq!(
        emails,
        vec!["alice@example.com", "bob@example.com", "dave@example.com"]
    );
    assert_eq!(members[0]["role"], "ADMIN");
    assert_eq!(members[1]["role"], "MEMBER");
    assert_eq!(members[2]["user"]["name"], Value::Null);

    app.get(&acme.members_uri(), acme.carol.token())
        .await
        .assert_forbidden("access_denied");
}

#[tokio::test]
async fn test_remove_member_requires_admin() {
    let app = TestApp::new().await;
    let acme = AcmeFixture::seed(&app).await;

    app.delete(&acme.member_uri(acme.dave.id), acme.bob.token())
        .await
        .assert_forbidden("permission_denied");
    app.delete(&acme.member_uri(acme.bob.id), acme.carol.token())
        .await
        .assert_forbidden("permission_denied");

    let members: Vec<Value> = app.get(&acme.members_uri(), acme.bob.token()).await.json();
    assert_eq!(members.len(), 3);
}

#[rstest]
#[case::by_owner(true)]
#[case::by_second_admin(false)]
#[tokio::test]
async fn test_owner_cannot_be_removed(#[case] as_owner: bool) {
    let app = TestApp::new().await;
    let acme = AcmeFixture::seed(&app).await;
    let caller = if as_owner { &acme.alice } else { &acme.dave };

    let response = app
        .delete(&acme.member_uri(acme.alice.id), caller.token())
        .await;
    response.assert_bad_request();

    let json: Value = response.json();
    assert_eq!(json["message"], "Cannot remove the organization owner");
}

#[tokio::test]
async fn test_admin_removes_member() {
    let app = TestApp::new().await;
    let acme = AcmeFixture::seed(&app).await;

    let response = app
        .delete(&acme.member_uri(acme.bob.id), acme.dave.token())
        .await;
    response.assert_ok();

    let removed: Value = response.json();
    assert_eq!(removed["user_id"], acme.bob.id.to_string());
    assert_eq!(removed["organization_id"], acme.org_id.to_string());

    let members: Vec<Value> = app
        .get(&acme.members_uri(), acme.alice.token())
        .await
        .json();
    assert_eq!(members.len(), 2);

    // The removed member loses access on the very next request.
    app.get(&acme.org_uri(), acme.bob.token())
        .await
        .assert_forbidden("access_denied");
}

#[tokio::test]
async fn test_remove_non_member_is_not_found() {
    let app = TestApp::new().await;
    let acme = AcmeFixture::seed(&app).await;

    let response = app
        .delete(&acme.member_uri(acme.carol.id), acme.alice.token())
        .await;
    response.assert_not_found();

    let response = app
        .delete(
            &format!("{}/members/not-a-uuid", acme.org_uri()),
            acme.alice.token(),
        )
        .await;
    response.assert_bad_request();
    let json: Value = response.json();
    assert_eq!(json["message"], "Invalid user ID");
}

#[tokio::test]
async fn test_navigation_is_role_gated() {
    let app = TestApp::new().await;
    let acme = AcmeFixture::seed(&app).await;
    let nav_uri = format!("{}/navigation", acme.org_uri());

    let admin_nav: Value = app.get(&nav_uri, acme.alice.token()).await.json();
    assert_eq!(admin_nav["organization_name"], "Acme");
    assert_eq!(admin_nav["items"].as_array().unwrap().len(), 5);

    let uri = format!(
        "{}?current_path=/org/{}/expenses",
        nav_uri, acme.org_id
    );
    let member_nav: Value = app.get(&uri, acme.bob.token()).await.json();
    let items = member_nav["items"].as_array().unwrap();
    let names: Vec<&str> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Dashboard", "Expenses"]);
    assert_eq!(items[1]["current"], true);
    assert_eq!(member_nav["user_role"], "MEMBER");
    assert_eq!(member_nav["organizations"].as_array().unwrap().len(), 1);

    app.get(&nav_uri, acme.carol.token())
        .await
        .assert_forbidden("access_denied");
}
