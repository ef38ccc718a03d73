/// Per-category schema statistics command.
pub mod info;
/// Linked item listing command.
pub mod types;
/// Single linked item inspection command.
pub mod show;
/// Derived wire command listing.
pub mod wire;
/// Derived fuzz harness command listing.
pub mod fuzz;

mod util;
