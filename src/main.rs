//! Command-line check of a stored submission payload.
//!
//! Usage: `rocklabel <payload.json>`. Prints one polygon literal per geometry.

use std::process::ExitCode;

use rocklabel::{AppConfig, SubmissionPayload};

fn main() -> ExitCode {
    // Read before the logger exists so its level can come from the file;
    // any failure is reported once logging is up.
    let path = AppConfig::default_path();
    let loaded = path.as_deref().map(AppConfig::read_from).transpose();
    let config = match &loaded {
        Ok(Some(Some(config))) => config.clone(),
        _ => AppConfig::default(),
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.to_level_filter().as_str()),
    )
    .init();
    match loaded {
        Ok(Some(Some(_))) => log::debug!("Loaded configuration from {:?}", path),
        Ok(_) => log::debug!("No config file, using defaults"),
        Err(e) => log::warn!("Ignoring config file {:?}: {}", path, e),
    }

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: rocklabel <payload.json>");
        return ExitCode::from(2);
    };

    match run(&path) {
        Ok(literals) => {
            for literal in literals {
                println!("{literal}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let payload: SubmissionPayload = serde_json::from_str(&json)?;
    log::debug!(
        "Read {} geometries for quadrant {}",
        payload.geometries.len(),
        payload.quadrant.quadrant_number
    );
    Ok(payload.to_wkt()?)
}
