//! MacroTrack Tools module
//!
//! MCP tool implementations. Each returns `Result<_, String>` with a
//! message ready to hand back to the client.

pub mod food_log;
pub mod foods;
pub mod profile;
pub mod status;
