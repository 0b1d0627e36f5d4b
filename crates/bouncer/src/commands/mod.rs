//! Command handlers.

pub mod config_cmd;
pub mod devices;
pub mod legend;
pub mod status;
pub mod toggle;
pub mod watch;

use bouncer_core::{DeviceAction, DeviceGateway, GatewayConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a backend command to its handler.
pub async fn dispatch(
    cmd: Command,
    config: GatewayConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Watch(args) => watch::handle(&args, config, global).await,
        cmd => {
            let gateway = connect(&config).await?;
            match cmd {
                Command::Status => status::handle(&gateway, global).await,
                Command::Devices => devices::handle(&gateway, global).await,
                Command::Toggle => toggle::handle(&gateway, global).await,
                Command::Block => toggle::force(&gateway, DeviceAction::Block, global).await,
                Command::Unblock => toggle::force(&gateway, DeviceAction::Unblock, global).await,
                other => Err(CliError::Internal(format!(
                    "command {other:?} does not use a backend session"
                ))),
            }
        }
    }
}

/// Build the gateway and log in. One-shot commands fail fast on a bad
/// login; there is no background refresh for them.
async fn connect(config: &GatewayConfig) -> Result<DeviceGateway, CliError> {
    let gateway = DeviceGateway::new(config)?;
    gateway.login().await?;
    Ok(gateway)
}
