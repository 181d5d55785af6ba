//! Build script for orgdesk
//!
//! `sqlx::migrate!` embeds the migrations directory at compile time, so cargo
//! has to rebuild whenever a migration is added or edited.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
