//! MacroTrack MCP Server Implementation
//!
//! Implements the MCP server with all MacroTrack tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::db::Database;
use crate::lookup::{FoodLookup, SqliteCatalog};
use crate::models::{FoodEntry, FoodEntryCreate, FoodProductCreate};
use crate::store::SqliteStore;
use crate::tools::food_log::{self, ProductRef};
use crate::tools::foods;
use crate::tools::profile::{self, UserStatsInput};
use crate::tools::status::StatusTracker;
use crate::tracker::Tracker;

/// MacroTrack MCP Service
#[derive(Clone)]
pub struct MacroTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    config: Arc<AppConfig>,
    tracker: Arc<Tracker<SqliteStore>>,
    catalog: SqliteCatalog,
    /// Backend for name and barcode searches (local catalog or remote)
    lookup: Arc<dyn FoodLookup>,
    tool_router: ToolRouter<MacroTrackService>,
}

impl MacroTrackService {
    pub fn new(config: AppConfig, database: Database, lookup: Arc<dyn FoodLookup>) -> Self {
        let backend = if config.lookup.is_some() { "remote" } else { "local" };
        let database_path: PathBuf = config.database_path.clone();

        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, backend))),
            config: Arc::new(config),
            tracker: Arc::new(Tracker::new(SqliteStore::new(database.clone()))),
            catalog: SqliteCatalog::new(database),
            lookup,
            tool_router: Self::tool_router(),
        }
    }

    fn tracker(&self) -> &Tracker<SqliteStore> {
        &self.tracker
    }

    /// Run a lookup-backed tool off the async runtime
    async fn blocking<F, T>(f: F) -> Result<T, McpError>
    where
        F: FnOnce() -> Result<T, String> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| McpError::internal_error(format!("Lookup task failed: {}", e), None))?
            .map_err(|e| McpError::internal_error(e, None))
    }
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetUserStatsParams {
    /// Age in years
    pub age: u32,
    /// "male" or "female"
    pub gender: String,
    /// Body weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
    /// sedentary, light, moderate, very, extreme
    pub activity_level: String,
    /// cut, maintain, bulk
    #[serde(default = "default_goal")]
    pub goal: String,
    /// balanced, high-protein, low-carb, high-carb, custom
    #[serde(default = "default_macro_split")]
    pub macro_split: String,
}

fn default_goal() -> String { "maintain".to_string() }
fn default_macro_split() -> String { "balanced".to_string() }

// ============================================================================
// Food Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Whole kilocalories
    pub calories: u32,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
}

fn default_quantity() -> f64 { 1.0 }
fn default_unit() -> String { "serving".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogProductParams {
    /// Local catalog product id
    pub product_id: Option<i64>,
    /// Product barcode, used when product_id is not given
    pub barcode: Option<String>,
    /// Amount eaten in grams
    pub grams: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDayParams {
    /// Date in YYYY-MM-DD format
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFoodEntryParams {
    /// Date the entry was logged on (YYYY-MM-DD)
    pub date: String,
    /// Entry id (UUID)
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDaysParams {
    #[serde(default = "default_days_limit")]
    pub limit: usize,
}

fn default_days_limit() -> usize { 30 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportEntriesParams {
    /// Array of food entries as returned by get_day
    pub entries: serde_json::Value,
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Text matched against product name and brand
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupBarcodeParams {
    /// EAN-8, UPC-A, EAN-13 or GTIN-14 digits
    pub barcode: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodProductParams {
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub calories_per_100g: f64,
    #[serde(default)]
    pub protein_per_100g: f64,
    #[serde(default)]
    pub carbs_per_100g: f64,
    #[serde(default)]
    pub fat_per_100g: f64,
    pub category: Option<String>,
    pub store: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MacroTrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the MacroTrack service including build info, database status, lookup backend and process information")]
    async fn macrotrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for setting up targets and logging food. Call this when starting a new logging session or when unsure how to use the tools.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOGGING_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "List the available macro splits with their protein/carbs/fats percentages")]
    fn list_macro_splits(&self) -> Result<CallToolResult, McpError> {
        let result = profile::list_macro_splits();
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Save the user's body stats, goal and macro split. Returns BMR, TDEE and the daily calorie and macro targets.")]
    fn set_user_stats(&self, Parameters(p): Parameters<SetUserStatsParams>) -> Result<CallToolResult, McpError> {
        let input = UserStatsInput {
            age: p.age, gender: p.gender, weight: p.weight, height: p.height,
            activity_level: p.activity_level, goal: p.goal, macro_split: p.macro_split,
        };
        let result = profile::set_user_stats(self.tracker(), &input).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the saved user stats and the daily calorie and macro targets derived from them")]
    fn get_targets(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_targets(self.tracker()).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(report) => serde_json::to_string_pretty(&report),
            None => Ok(r#"{"error": "No user stats set", "hint": "Call set_user_stats first"}"#.to_string()),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Food Log ---

    #[tool(description = "Log a food with explicit calories and macros (grams) under today's date. Returns the entry and the updated day summary.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodEntryCreate {
            name: p.name, quantity: p.quantity, unit: p.unit,
            calories: p.calories, protein: p.protein, carbs: p.carbs, fats: p.fats,
        };
        let result = food_log::log_food(self.tracker(), data, self.config.now()).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Log grams of a catalog product (by local product_id or barcode) under today's date. Nutrition is scaled from per-100g values.")]
    async fn log_product(&self, Parameters(p): Parameters<LogProductParams>) -> Result<CallToolResult, McpError> {
        let product_ref = match (p.product_id, p.barcode) {
            (Some(id), _) => ProductRef::Id(id),
            (None, Some(code)) => ProductRef::Barcode(code),
            (None, None) => {
                return Err(McpError::invalid_params("Either product_id or barcode is required", None));
            }
        };

        let catalog = self.catalog.clone();
        let lookup = Arc::clone(&self.lookup);
        let product = Self::blocking(move || food_log::resolve_product(&catalog, lookup.as_ref(), &product_ref)).await?;

        let result = food_log::log_product(self.tracker(), &product, p.grams, self.config.now())
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get a day's entries, totals, targets, remaining amounts and percent progress")]
    fn get_day(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let result = food_log::get_day(self.tracker(), &p.date).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get today's entries, totals, targets, remaining amounts and percent progress")]
    fn get_today(&self) -> Result<CallToolResult, McpError> {
        let result = food_log::get_today(self.tracker(), self.config.now()).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a food entry by the date it was logged on and its id")]
    fn delete_food_entry(&self, Parameters(p): Parameters<DeleteFoodEntryParams>) -> Result<CallToolResult, McpError> {
        let deleted = food_log::delete_food_entry(self.tracker(), &p.date, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({"success": deleted, "date": p.date, "id": p.id}).to_string();
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List the most recent days that have entries, newest first, with totals and entry counts")]
    fn list_days(&self, Parameters(p): Parameters<ListDaysParams>) -> Result<CallToolResult, McpError> {
        let result = food_log::list_days(self.tracker(), p.limit).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Import food entries (with ids and timestamps) exported from another log. Entries whose id already exists are skipped.")]
    fn import_entries(&self, Parameters(p): Parameters<ImportEntriesParams>) -> Result<CallToolResult, McpError> {
        let entries: Vec<FoodEntry> = serde_json::from_value(p.entries)
            .map_err(|e| McpError::invalid_params(format!("Invalid entries: {}", e), None))?;
        let result = food_log::import_entries(self.tracker(), entries).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Catalog ---

    #[tool(description = "Search the food catalog by name or brand (case-insensitive, up to 20 results)")]
    async fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let lookup = Arc::clone(&self.lookup);
        let result = Self::blocking(move || foods::search_foods(lookup.as_ref(), &p.query)).await?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Validate a barcode and look it up in the food catalog")]
    async fn lookup_barcode(&self, Parameters(p): Parameters<LookupBarcodeParams>) -> Result<CallToolResult, McpError> {
        let lookup = Arc::clone(&self.lookup);
        let result = Self::blocking(move || foods::lookup_barcode(lookup.as_ref(), &p.barcode)).await?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Add a product to the local food catalog with nutrition per 100g")]
    fn add_food_product(&self, Parameters(p): Parameters<AddFoodProductParams>) -> Result<CallToolResult, McpError> {
        let data = FoodProductCreate {
            name: p.name, brand: p.brand, barcode: p.barcode,
            calories_per_100g: p.calories_per_100g, protein_per_100g: p.protein_per_100g,
            carbs_per_100g: p.carbs_per_100g, fat_per_100g: p.fat_per_100g,
            category: p.category, store: p.store,
        };
        let result = foods::add_food_product(&self.catalog, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MacroTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "macrotrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("MacroTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MacroTrack - daily calorie and macronutrient tracking. \
                 IMPORTANT: Call logging_instructions before the first log of a session. \
                 Profile: set_user_stats/get_targets, list_macro_splits. \
                 Log: log_food (explicit macros), log_product (catalog product + grams). \
                 Review: get_today/get_day/list_days, delete_food_entry, import_entries. \
                 Catalog: search_foods, lookup_barcode, add_food_product. \
                 Entries always go under the current day in the server's time zone."
                    .into(),
            ),
        }
    }
}
