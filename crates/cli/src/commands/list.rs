//! `routectl list`

use anyhow::Result;
use openrouting_drivers::DriverRegistry;

use crate::output;

pub fn execute(registry: &DriverRegistry, json: bool, locale: &str) -> Result<()> {
    output::print_driver_list(&registry.list(), json, locale);
    Ok(())
}
