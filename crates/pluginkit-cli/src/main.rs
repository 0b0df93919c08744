mod config;
mod project;
mod scaffold;
mod templates;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use pluginkit_core::SubtopicKeys;

use crate::scaffold::{FileStatus, GenerateOptions, Outcome};

#[derive(Parser)]
#[command(
    name = "pluginkit",
    version,
    about = "Scaffold commands for CLI plugin projects"
)]
struct Cli {
    /// Plugin project directory (defaults to the current directory)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate project files
    Generate {
        #[command(subcommand)]
        command: GenerateCommands,
    },

    /// Print the topic entries a new command would add, without writing anything
    Topics {
        /// Command name, colon-delimited (e.g. do:awesome:stuff)
        name: String,

        /// Saved `sf commands --json` output used to detect external topics
        #[arg(long)]
        commands_file: Option<PathBuf>,

        /// How subtopic entries are keyed
        #[arg(long)]
        subtopic_keys: Option<CliSubtopicKeys>,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum GenerateCommands {
    /// Add a command: topics in package.json plus source, messages and tests
    Command {
        /// Command name, colon-delimited (e.g. do:awesome:stuff)
        #[arg(short, long)]
        name: String,

        /// Also generate a NUT (non-unit test)
        #[arg(long)]
        nuts: bool,

        /// Also generate a unit test
        #[arg(long)]
        unit: bool,

        /// Overwrite files that already exist
        #[arg(long)]
        force: bool,

        /// Saved `sf commands --json` output used to detect external topics
        #[arg(long)]
        commands_file: Option<PathBuf>,

        /// How subtopic entries are keyed
        #[arg(long)]
        subtopic_keys: Option<CliSubtopicKeys>,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum CliSubtopicKeys {
    /// Key subtopics by their full dotted path (do.awesome)
    FullPath,
    /// Key subtopics by their own segment (awesome)
    Segment,
}

impl From<CliSubtopicKeys> for SubtopicKeys {
    fn from(val: CliSubtopicKeys) -> Self {
        match val {
            CliSubtopicKeys::FullPath => SubtopicKeys::FullPath,
            CliSubtopicKeys::Segment => SubtopicKeys::Segment,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let cfg = config::load_config()?;
    let project_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to get current directory")?,
    };

    match cli.command {
        Commands::Generate { command } => match command {
            GenerateCommands::Command {
                name,
                nuts,
                unit,
                force,
                commands_file,
                subtopic_keys,
                dry_run,
            } => {
                let opts = GenerateOptions {
                    name,
                    nuts: nuts || cfg.generate.nuts,
                    unit: unit || cfg.generate.unit,
                    force,
                    dry_run,
                    commands_file: commands_file
                        .or_else(|| cfg.known_commands.file.map(PathBuf::from)),
                    subtopic_keys: subtopic_keys.map_or(cfg.topics.subtopic_keys, Into::into),
                    templates_dir: cfg.generate.templates_dir.map(PathBuf::from),
                    copyright_holder: cfg.generate.copyright_holder,
                    year: None,
                };
                cmd_generate_command(&project_dir, &opts)
            }
        },
        Commands::Topics {
            name,
            commands_file,
            subtopic_keys,
        } => {
            let commands_file =
                commands_file.or_else(|| cfg.known_commands.file.map(PathBuf::from));
            let keys = subtopic_keys.map_or(cfg.topics.subtopic_keys, Into::into);
            cmd_topics(&project_dir, &name, commands_file, keys)
        }
        Commands::Config => cmd_config(),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_generate_command(project_dir: &std::path::Path, opts: &GenerateOptions) -> Result<()> {
    let outcome = scaffold::generate_command(project_dir, opts)?;
    print_outcome(&outcome, opts.dry_run);
    Ok(())
}

fn print_outcome(outcome: &Outcome, dry_run: bool) {
    let kind = if outcome.internal {
        "internal"
    } else {
        "third-party"
    };
    println!("Command {} ({kind} plugin)", outcome.command);

    if outcome.topics_patch.is_empty() {
        println!("  topics: none (top-level command)");
    } else if dry_run {
        println!("  topics to add to package.json:");
        println!("{}", outcome.topics_patch);
    } else {
        let names: Vec<&str> = outcome.topics_patch.keys().collect();
        println!("  topics: updated {} in package.json", names.join(", "));
    }

    for (path, status) in &outcome.files {
        let label = match status {
            FileStatus::Created => "create",
            FileStatus::Overwritten => "force",
            FileStatus::Skipped => "skip",
            FileStatus::Planned => "would create",
        };
        println!("  {label:<12} {}", path.display());
    }

    if !outcome.follow_ups.is_empty() {
        println!();
        println!("Next, run:");
        for cmd in &outcome.follow_ups {
            println!("  {cmd}");
        }
    }
}

fn cmd_topics(
    project_dir: &std::path::Path,
    name: &str,
    commands_file: Option<PathBuf>,
    keys: SubtopicKeys,
) -> Result<()> {
    let patch = scaffold::preview_topics(project_dir, name, commands_file.as_deref(), keys)?;
    println!("{patch}");
    Ok(())
}

fn cmd_config() -> Result<()> {
    let cfg = config::load_config()?;
    println!("Config: {}", config::show_config_path());
    println!();
    println!("[topics]");
    println!("  subtopic_keys = {}", cfg.topics.subtopic_keys);
    println!();
    println!("[generate]");
    println!("  nuts = {}", cfg.generate.nuts);
    println!("  unit = {}", cfg.generate.unit);
    println!(
        "  templates_dir = {}",
        cfg.generate
            .templates_dir
            .as_deref()
            .unwrap_or("(built-in templates)")
    );
    println!("  copyright_holder = {}", cfg.generate.copyright_holder);
    println!();
    println!("[known_commands]");
    println!(
        "  file = {}",
        cfg.known_commands.file.as_deref().unwrap_or("(none)")
    );
    Ok(())
}
