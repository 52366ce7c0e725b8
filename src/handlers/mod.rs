// handlers/mod.rs - HTTP handlers
//
// root: liveness/readiness at the top level
// tabs: the /api/tabs document endpoints

pub mod root;
pub mod tabs;

pub use root::{health, root};
