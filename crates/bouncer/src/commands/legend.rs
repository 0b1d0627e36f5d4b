//! `bouncer legend`: operational status guide for the active vocabulary.

use serde::Serialize;
use tabled::Tabled;

use bouncer_core::{CommandStatus, Vocabulary};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct LegendEntry {
    status: CommandStatus,
    label: &'static str,
    description: &'static str,
    toggleable: bool,
}

#[derive(Tabled)]
struct LegendRow {
    #[tabled(rename = "Status")]
    label: String,
    #[tabled(rename = "Meaning")]
    description: &'static str,
    #[tabled(rename = "Toggle")]
    toggleable: &'static str,
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let vocabulary = crate::config::vocabulary(global)?;
    let entries = entries(vocabulary);
    let color = output::should_color(&global.color);

    let out = output::render_list(
        &global.output,
        &entries,
        |e| LegendRow {
            label: output::paint_status(e.label, e.status, color),
            description: e.description,
            toggleable: if e.toggleable { "yes" } else { "no" },
        },
        |e| e.label.to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn entries(vocabulary: Vocabulary) -> Vec<LegendEntry> {
    vocabulary
        .legend()
        .into_iter()
        .map(|(status, label, description)| LegendEntry {
            status,
            label,
            description,
            toggleable: status.is_toggleable(),
        })
        .collect()
}
