//! Utility to set the user's body stats and print the derived targets
//!
//! Usage: set_user_stats <age> <male|female> <weight_kg> <height_cm> <activity> [goal] [macro_split]

use macrotrack::config::AppConfig;
use macrotrack::store::SqliteStore;
use macrotrack::tools::profile::{self, UserStatsInput};
use macrotrack::tracker::Tracker;

const USAGE: &str = "Usage: set_user_stats <age> <male|female> <weight_kg> <height_cm> \
<sedentary|light|moderate|very|extreme> [cut|maintain|bulk] [macro_split]";

fn parse_args(args: &[String]) -> Result<UserStatsInput, String> {
    if args.len() < 5 {
        return Err(USAGE.to_string());
    }
    let number = |name: &str, value: &str| -> Result<f64, String> {
        value
            .parse::<f64>()
            .map_err(|_| format!("{} must be a number, got '{}'", name, value))
    };

    Ok(UserStatsInput {
        age: args[0]
            .parse::<u32>()
            .map_err(|_| format!("age must be a whole number, got '{}'", args[0]))?,
        gender: args[1].clone(),
        weight: number("weight", &args[2])?,
        height: number("height", &args[3])?,
        activity_level: args[4].clone(),
        goal: args.get(5).cloned().unwrap_or_else(|| "maintain".to_string()),
        macro_split: args.get(6).cloned().unwrap_or_else(|| "balanced".to_string()),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = parse_args(&args)?;

    let config = AppConfig::from_env()?;
    let db_path = config.database_path;
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = macrotrack::db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        macrotrack::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let tracker = Tracker::new(SqliteStore::new(database));
    let response = profile::set_user_stats(&tracker, &input)?;
    let report = &response.report;

    println!("User stats set:");
    println!("  BMR:      {:.0} kcal", report.bmr);
    println!("  TDEE:     {:.0} kcal", report.tdee);
    println!("  Split:    {} ({}/{}/{})", report.split.name, report.split.protein, report.split.carbs, report.split.fats);
    println!("  Calories: {} kcal", report.targets.calories);
    println!("  Protein:  {} g", report.targets.protein);
    println!("  Carbs:    {} g", report.targets.carbs);
    println!("  Fats:     {} g", report.targets.fats);
    if let Some(warning) = response.warning {
        println!("Warning: {}", warning);
    }

    Ok(())
}
