//! `bouncer toggle`, `bouncer block`, `bouncer unblock`.

use serde::Serialize;

use bouncer_core::{CommandStatus, DeviceAction, DeviceGateway};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct ToggleOutcome {
    device_id: String,
    previous: CommandStatus,
    current: CommandStatus,
    label: &'static str,
}

#[derive(Serialize)]
struct ActionOutcome<'a> {
    device_id: &'a str,
    action: &'static str,
}

/// Read the device, toggle it, and print the new command status. The new
/// status is not confirmed by a second read.
pub async fn handle(gateway: &DeviceGateway, global: &GlobalOpts) -> Result<(), CliError> {
    let device = gateway.fetch_configured_device().await?;
    let previous = gateway.command_for(&device);
    let current = gateway.toggle_device_status(previous).await?;

    let vocabulary = gateway.vocabulary();
    let outcome = ToggleOutcome {
        device_id: device.id,
        previous,
        current,
        label: vocabulary.label(current),
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &outcome,
        |o| {
            format!(
                "{} -> {}",
                vocabulary.label(o.previous),
                output::paint_status(o.label, o.current, color)
            )
        },
        |o| o.label.to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Send `action` regardless of the device's current state.
pub async fn force(
    gateway: &DeviceGateway,
    action: DeviceAction,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    gateway.set_device_status(action).await?;

    let outcome = ActionOutcome {
        device_id: gateway.device_id(),
        action: action.as_str(),
    };
    let out = output::render_single(
        &global.output,
        &outcome,
        |o| format!("Sent {} to {}", o.action, o.device_id),
        |o| o.action.to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
