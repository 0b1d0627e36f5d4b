//! `bouncer devices`: every device on the account.

use tabled::Tabled;

use bouncer_core::{Device, DeviceGateway, Vocabulary};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Location")]
    location: String,
}

fn row(d: &Device, vocabulary: Vocabulary, configured: &str, color: bool) -> DeviceRow {
    let command = vocabulary.map(&d.status);
    let marker = if d.id == configured { " *" } else { "" };
    DeviceRow {
        id: format!("{}{marker}", d.id),
        name: d.nickname.clone(),
        status: d.status.to_string(),
        command: output::paint_status(vocabulary.label(command), command, color),
        battery: d
            .battery_volts()
            .map_or_else(|| "N/A".into(), |v| format!("{v:.2} V")),
        location: d.location.clone().unwrap_or_default(),
    }
}

pub async fn handle(gateway: &DeviceGateway, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = gateway.fetch_device_list().await?;
    let color = output::should_color(&global.color);
    let vocabulary = gateway.vocabulary();

    let out = output::render_list(
        &global.output,
        &devices,
        |d| row(d, vocabulary, gateway.device_id(), color),
        |d| d.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
