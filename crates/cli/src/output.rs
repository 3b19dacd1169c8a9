//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use openrouting_drivers::{Capabilities, DriverDescriptor};
use serde_json::json;

/// Print error in JSON format
pub fn print_error_json(error: &Error, exit_code: i32) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "exit_code": exit_code
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {error}", "Error:".red().bold());

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {err}", "Caused by:".yellow());
        source = err.source();
    }
}

/// Print the registered driver families
pub fn print_driver_list(descriptors: &[DriverDescriptor], json: bool, locale: &str) {
    if json {
        let output = json!({
            "success": true,
            "data": descriptors
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format driver list as JSON: {e}"),
        }
        return;
    }

    if descriptors.is_empty() {
        println!("{}", "No drivers registered".yellow());
        return;
    }

    for descriptor in descriptors {
        let (title, manufacturer) = descriptor
            .metadata_for(locale)
            .map(|m| (m.title.as_str(), m.manufacturer.as_str()))
            .unwrap_or(("(untitled)", "unknown"));
        println!(
            "{}  {title} ({})",
            descriptor.family_id.bold(),
            manufacturer.dimmed()
        );
        println!(
            "  capabilities: {}",
            format_capabilities(descriptor.capabilities)
        );
    }
}

fn format_capabilities(capabilities: Capabilities) -> String {
    let mut names = Vec::new();
    if capabilities.contains(Capabilities::MULTIPLE_OUTPUTS) {
        names.push("multiple outputs");
    }
    if capabilities.contains(Capabilities::DECOUPLED_AUDIO_OUTPUT) {
        names.push("decoupled audio");
    }
    if names.is_empty() {
        "single output".to_string()
    } else {
        names.join(", ")
    }
}

/// Print success message
pub fn print_success(message: &str, json: bool) {
    if json {
        let output = json!({
            "success": true,
            "message": message
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format success message as JSON: {e}"),
        }
    } else {
        println!("{} {message}", "✓".green());
    }
}
