//! Test fixtures for common test data
//!
//! The Acme fixture seeds the cast used throughout the organization tests:
//! an owner, a plain member, a second admin and an outsider.

use uuid::Uuid;

use orgdesk::models::MemberRole;

use super::test_app::TestApp;

/// A seeded user together with an access token for it
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn token(&self) -> Option<&str> {
        Some(&self.token)
    }
}

/// Organization "Acme" owned by alice
pub struct AcmeFixture {
    pub org_id: Uuid,
    /// Owner and first ADMIN
    pub alice: TestUser,
    /// MEMBER
    pub bob: TestUser,
    /// Not a member
    pub carol: TestUser,
    /// Second ADMIN, not the owner
    pub dave: TestUser,
}

impl AcmeFixture {
    pub async fn seed(app: &TestApp) -> Self {
        let alice = app.create_user(Some("Alice"), "alice@example.com").await;
        let bob = app.create_user(Some("Bob"), "bob@example.com").await;
        let carol = app.create_user(Some("Carol"), "carol@example.com").await;
        let dave = app.create_user(None, "dave@example.com").await;

        let org_id = app.create_organization(&alice, "Acme").await;
        app.add_member(org_id, bob.id, MemberRole::Member).await;
        app.add_member(org_id, dave.id, MemberRole::Admin).await;

        Self {
            org_id,
            alice,
            bob,
            carol,
            dave,
        }
    }

    pub fn org_uri(&self) -> String {
        format!("/api/v1/organizations/{}", self.org_id)
    }

    pub fn members_uri(&self) -> String {
        format!("{}/members", self.org_uri())
    }

    pub fn member_uri(&self, user_id: Uuid) -> String {
        format!("{}/members/{}", self.org_uri(), user_id)
    }
}
