//! Config subcommand handlers.

use std::collections::BTreeMap;

use serde::Serialize;

use bouncer_config::Profile;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Shaped like the config file so the output can be pasted back into it.
#[derive(Serialize)]
struct ShownProfile {
    profiles: BTreeMap<String, Profile>,
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = bouncer_config::config_path();
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let resolved = crate::config::resolve(global)?;
            let shown = ShownProfile {
                profiles: BTreeMap::from([(resolved.profile_name, resolved.profile.redacted())]),
            };
            let out = match global.output {
                OutputFormat::Table => toml::to_string_pretty(&shown)?,
                _ => output::render_single(&global.output, &shown, |_| String::new(), |s| {
                    s.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
                }),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }
    }
}
