//! Data models

mod member;
mod navigation;
mod organization;
mod user;

pub use member::*;
pub use navigation::*;
pub use organization::*;
pub use user::*;
