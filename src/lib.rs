//! MacroTrack Library
//!
//! Calorie and macronutrient targets, a day-keyed food log, and food
//! catalog lookup.

pub mod build_info;
pub mod config;
pub mod db;
pub mod lookup;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod scanner;
pub mod store;
pub mod tools;
pub mod tracker;
