//! Build script for the server crate.
//!
//! Migrations are embedded at compile time by `sqlx::migrate!`, which does not
//! track new files on its own. Re-run the build whenever the directory changes.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
