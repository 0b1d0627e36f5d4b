//! `bouncer status`: the configured device and what pressing toggle will do.

use bouncer_core::{DeviceGateway, DeviceView};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(gateway: &DeviceGateway, global: &GlobalOpts) -> Result<(), CliError> {
    let device = gateway.fetch_configured_device().await?;
    let command = gateway.command_for(&device);
    let view = DeviceView {
        device,
        command,
        label: gateway.vocabulary().label(command),
    };

    let color = output::should_color(&global.color);
    let describe = gateway.vocabulary().describe(command);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, describe, color),
        |v| v.label.to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(view: &DeviceView, describe: &str, color: bool) -> String {
    let d = &view.device;
    let name = if d.nickname.is_empty() { "-" } else { &d.nickname };
    [
        format!("ID:        {}", d.id),
        format!("Name:      {name}"),
        format!(
            "Status:    {}  ({})",
            output::paint_status(view.label, view.command, color),
            d.status
        ),
        format!("           {describe}"),
        format!(
            "Battery:   {}",
            d.battery_volts()
                .map_or_else(|| "N/A".into(), |v| format!("{v:.2} V"))
        ),
        format!("Location:  {}", d.location.as_deref().unwrap_or("-")),
        format!("Firmware:  {}", d.firmware_version.as_deref().unwrap_or("-")),
        format!("Last seen: {}", d.last_connection.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}
