//! `bouncer watch`: mount a device screen and stream its activity log.
//!
//! Stdin commands: Enter or `t` toggles, `r` reloads, `q` quits. Ctrl-C
//! also quits. The screen is torn down on every exit path.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Interval, MissedTickBehavior};

use bouncer_core::{DeviceGateway, DeviceScreen, GatewayConfig, ScreenOptions};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

/// How often new activity-log entries are flushed to stdout.
const FLUSH_INTERVAL: Duration = Duration::from_millis(500);

pub async fn handle(
    args: &WatchArgs,
    config: GatewayConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut options = ScreenOptions::from(&config);
    if let Some(secs) = args.refresh_interval {
        options.refresh_interval = Duration::from_secs(secs);
    }

    let gateway = Arc::new(DeviceGateway::new(&config)?);
    let screen = DeviceScreen::mount(gateway, options).await;

    if !global.quiet {
        eprintln!("Watching {} -- Enter toggles, r reloads, q quits", config.device_id);
    }

    let result = run(&screen, args, global).await;
    screen.teardown().await;
    result
}

async fn run(screen: &DeviceScreen, args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut seen = flush(screen, 0, global);

    let mut poll = match args.poll {
        Some(secs) if secs > 0 => Some(ticker(Duration::from_secs(secs)).await),
        _ => None,
    };
    let mut flush_tick = ticker(FLUSH_INTERVAL).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res?;
                tracing::info!("received interrupt, shutting down");
                break;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match line.trim() {
                    "" | "t" => {
                        let _ = screen.toggle().await;
                    }
                    "r" => {
                        let _ = screen.reload().await;
                    }
                    "q" => break,
                    other => eprintln!("unknown input '{other}' (Enter/t, r, q)"),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin closed");
                    stdin_open = false;
                }
            },
            () = next_poll(poll.as_mut()) => {
                let _ = screen.reload().await;
            }
            _ = flush_tick.tick() => {}
        }
        seen = flush(screen, seen, global);
    }

    flush(screen, seen, global);
    Ok(())
}

/// Print log entries appended since `seen`; returns the new high-water mark.
fn flush(screen: &DeviceScreen, seen: usize, global: &GlobalOpts) -> usize {
    let fresh = screen.log().chronological_since(seen);
    for entry in &fresh {
        let line = match global.output {
            OutputFormat::Json | OutputFormat::JsonCompact => {
                serde_json::to_string(entry).unwrap_or_else(|_| entry.to_string())
            }
            _ => entry.to_string(),
        };
        output::print_output(&line, global.quiet);
    }
    seen + fresh.len()
}

/// An interval whose immediate first tick has already been consumed.
async fn ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;
    interval
}

async fn next_poll(poll: Option<&mut Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
