//! Command dispatch for the `matrix-tree` binary.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::Visual;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, OutputFormat, Settings};
use crate::domain::{visual_transform, ArenaScene};
use crate::infrastructure::SnapshotLoader;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Render {
            snapshots,
            format,
            each,
            stats,
        }) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let format = format.unwrap_or(settings.output.format);
            let stats = *stats || settings.output.stats;
            cmd_render(&settings, snapshots, format, *each, stats)
        }
        Some(Commands::Model { snapshot }) => cmd_model(snapshot),
        Some(Commands::Enumerate { snapshot, object }) => {
            let settings = Settings::load(cli.config.as_deref())?;
            cmd_enumerate(&settings, snapshot, object)
        }
        Some(Commands::Config { command }) => cmd_config(cli.config.as_deref(), command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "matrix-tree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `matrix-tree --help`".to_string(),
        )),
    }
}

#[instrument(skip(settings))]
fn cmd_render(
    settings: &Settings,
    snapshots: &[PathBuf],
    format: OutputFormat,
    each: bool,
    stats: bool,
) -> CliResult<()> {
    let loader = SnapshotLoader::default();
    let updates = loader.load_all(snapshots)?;
    let mut visual = Visual::new(ArenaScene::new(), settings.visual.clone());

    for (i, (path, update)) in snapshots.iter().zip(&updates).enumerate() {
        let counters = visual.update(update)?;
        debug!(path = %path.display(), %counters, "applied update");

        let last = i + 1 == updates.len();
        if each || last {
            if each {
                output::header(&format!("update {}: {}", i + 1, path.display()));
            }
            print_scene(visual.scene(), format)?;
        }
        if stats {
            output::action("stats", &counters);
        }
    }

    if visual.scene().is_empty() {
        output::warning("no data rendered");
    }
    Ok(())
}

fn print_scene(scene: &ArenaScene, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Tree => output::info(&scene.to_tree_string()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&scene.snapshot())
                .map_err(|e| CliError::Output(e.to_string()))?;
            output::info(&json);
        }
    }
    Ok(())
}

#[instrument]
fn cmd_model(snapshot: &Path) -> CliResult<()> {
    let update = SnapshotLoader::default().load(snapshot)?;
    let view_model = visual_transform(update.data_views.as_deref());
    output::info(&view_model.to_tree_string());
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_enumerate(settings: &Settings, snapshot: &Path, object: &str) -> CliResult<()> {
    let update = SnapshotLoader::default().load(snapshot)?;
    let mut visual = Visual::new(ArenaScene::new(), settings.visual.clone());
    visual.update(&update)?;

    let instances = visual.enumerate_object_instances(object);
    if instances.is_empty() {
        output::warning(&format!("unknown settings object: {}", object));
    }
    let json =
        serde_json::to_string_pretty(&instances).map_err(|e| CliError::Output(e.to_string()))?;
    output::info(&json);
    Ok(())
}

fn cmd_config(local: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(local)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".into());
            output::action("global", &global);
            if let Some(local) = local {
                output::action("local", &local.display());
            }
        }
    }
    Ok(())
}
