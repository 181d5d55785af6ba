//! Common step definitions used across features

use cucumber::{given, then};

use crate::features::support::TestWorld;

#[given(expr = "a user {string}")]
async fn a_user(world: &mut TestWorld, name: String) {
    world.create_user(&name).await;
}

#[then(expr = "the response status should be {int}")]
async fn response_status(world: &mut TestWorld, status: u16) {
    let response = world.response();
    assert_eq!(response.status, status, "Body: {}", response.body);
}

#[then(expr = "the error should be {string}")]
async fn error_type(world: &mut TestWorld, error: String) {
    assert_eq!(world.response().body["error"], error.as_str());
}

#[then(expr = "the error message should be {string}")]
async fn error_message(world: &mut TestWorld, message: String) {
    assert_eq!(world.response().body["message"], message.as_str());
}
