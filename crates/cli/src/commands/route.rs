//! `routectl tie` and `routectl power`: open a driver, send one command, close.

use anyhow::Result;
use openrouting_drivers::{Driver, DriverRegistry};
use tracing::{info, warn};

use crate::commands::PowerState;
use crate::output;

/// Route `input` to the `video` and `audio` outputs.
pub async fn tie(
    registry: &DriverRegistry,
    family: &str,
    address: &str,
    input: u32,
    video: u32,
    audio: u32,
    json: bool,
) -> Result<()> {
    let driver = registry.load(family, address).await?;
    let result = driver.activate(input, video, audio).await;
    finish(driver.as_ref(), result).await?;

    info!(family, address, input, video, audio, "tie sent");
    output::print_success(
        &format!("Input {input} tied to video {video}, audio {audio} on {address}"),
        json,
    );
    Ok(())
}

/// Switch the device on or off.
pub async fn power(
    registry: &DriverRegistry,
    family: &str,
    address: &str,
    state: PowerState,
    json: bool,
) -> Result<()> {
    let driver = registry.load(family, address).await?;
    let result = match state {
        PowerState::On => driver.power_on().await,
        PowerState::Off => driver.power_off().await,
    };
    finish(driver.as_ref(), result).await?;

    let word = match state {
        PowerState::On => "on",
        PowerState::Off => "off",
    };
    output::print_success(&format!("Power {word} sent to {address}"), json);
    Ok(())
}

/// Close the driver after an operation, reporting the operation's error first.
async fn finish(driver: &dyn Driver, result: openrouting_errors::Result<()>) -> Result<()> {
    let closed = driver.close().await;
    result?;
    if let Err(e) = closed {
        warn!(error = %e, "close after command failed");
    }
    Ok(())
}
