//! Build script for tunehub-storage.
//!
//! Migrations are embedded with `sqlx::migrate!`, so the crate must be rebuilt
//! whenever one is added or edited.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
