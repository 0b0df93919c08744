//! `generate command`: topic registration plus stub files for one command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use pluginkit_core::manifest::{DEPRECATION_POLICY_SCRIPT, JSON_SCHEMA_SCRIPT};
use pluginkit_core::{
    add_topics_with, render, CommandId, KnownCommands, Manifest, SubtopicKeys, TopicTree, Vars,
};
use tracing::{debug, info, warn};

use crate::project;
use crate::templates::{TemplateKind, TemplateSet, COPYRIGHT_HEADER};

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub name: String,
    pub nuts: bool,
    pub unit: bool,
    pub force: bool,
    pub dry_run: bool,
    pub commands_file: Option<PathBuf>,
    pub subtopic_keys: SubtopicKeys,
    pub templates_dir: Option<PathBuf>,
    pub copyright_holder: String,
    /// Copyright year; the current year when unset.
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Created,
    Overwritten,
    Skipped,
    Planned,
}

#[derive(Debug)]
pub struct PlannedFile {
    pub kind: TemplateKind,
    /// Relative to the project directory.
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug)]
pub struct Outcome {
    pub command: CommandId,
    pub internal: bool,
    pub topics_patch: TopicTree,
    pub files: Vec<(PathBuf, FileStatus)>,
    /// Commands the user should run next; nothing is executed for them.
    pub follow_ups: Vec<String>,
}

pub fn generate_command(project_dir: &Path, opts: &GenerateOptions) -> Result<Outcome> {
    let command = CommandId::parse(&opts.name)?;
    let mut manifest = project::load_manifest(project_dir)?;
    let internal = manifest.is_internal_plugin();

    let known = known_commands(internal, opts.commands_file.as_deref())?;
    let mut topics = manifest.topics()?;
    let patch = add_topics_with(&command.to_string(), &topics, &known, opts.subtopic_keys);
    debug!("topic patch for {command}: {patch}");

    // Render every stub before anything is written.
    let planned = plan_files(&command, &manifest, internal, opts)?;

    if !opts.dry_run && !patch.is_empty() {
        topics.apply_patch(patch.clone());
        manifest.set_topics(&topics)?;
        project::save_manifest(project_dir, &manifest)?;
    }

    let files = if opts.dry_run {
        planned
            .into_iter()
            .map(|f| (f.path, FileStatus::Planned))
            .collect()
    } else {
        write_files(project_dir, planned, opts.force)?
    };

    Ok(Outcome {
        command,
        internal,
        topics_patch: patch,
        files,
        follow_ups: follow_ups(&manifest),
    })
}

/// Topic patch only, for `pluginkit topics`.
pub fn preview_topics(
    project_dir: &Path,
    name: &str,
    commands_file: Option<&Path>,
    keys: SubtopicKeys,
) -> Result<TopicTree> {
    let command = CommandId::parse(name)?;
    let manifest = project::load_manifest(project_dir)?;
    let known = known_commands(manifest.is_internal_plugin(), commands_file)?;
    Ok(add_topics_with(
        &command.to_string(),
        &manifest.topics()?,
        &known,
        keys,
    ))
}

/// Only internal plugins share topics with other plugins; third-party ones
/// own every topic they declare.
fn known_commands(internal: bool, commands_file: Option<&Path>) -> Result<KnownCommands> {
    match (internal, commands_file) {
        (true, Some(path)) => project::load_known_commands(path),
        (true, None) => {
            warn!("internal plugin without a command listing; all topics are treated as owned by this plugin");
            Ok(KnownCommands::default())
        }
        (false, Some(path)) => {
            debug!("ignoring command listing {} for a third-party plugin", path.display());
            Ok(KnownCommands::default())
        }
        (false, None) => Ok(KnownCommands::default()),
    }
}

pub fn plan_files(
    command: &CommandId,
    manifest: &Manifest,
    internal: bool,
    opts: &GenerateOptions,
) -> Result<Vec<PlannedFile>> {
    let templates = TemplateSet::load(opts.templates_dir.as_deref())?;
    let vars = template_vars(command, manifest, internal, opts)?;

    let mut kinds = vec![TemplateKind::Command, TemplateKind::Message];
    if opts.nuts {
        kinds.push(TemplateKind::Nut);
    }
    if opts.unit {
        kinds.push(TemplateKind::UnitTest);
    }

    kinds
        .into_iter()
        .map(|kind| -> Result<PlannedFile> {
            let path = match kind {
                TemplateKind::Command => command.source_path(),
                TemplateKind::Message => command.message_path(),
                TemplateKind::Nut => command.nut_path(),
                TemplateKind::UnitTest => command.unit_test_path(),
            };
            let contents = templates
                .render(kind, &vars)
                .with_context(|| format!("rendering {} template", kind.label()))?;
            Ok(PlannedFile {
                kind,
                path,
                contents,
            })
        })
        .collect()
}

fn template_vars(
    command: &CommandId,
    manifest: &Manifest,
    internal: bool,
    opts: &GenerateOptions,
) -> Result<Vars> {
    let year = opts
        .year
        .unwrap_or_else(|| chrono::Local::now().year())
        .to_string();
    let copyright = if internal {
        let header_vars: Vars = [
            ("year".to_string(), year.clone()),
            ("holder".to_string(), opts.copyright_holder.clone()),
        ]
        .into_iter()
        .collect();
        render(COPYRIGHT_HEADER, &header_vars)?
    } else {
        String::new()
    };
    let plugin_name = manifest.name().context("manifest has no name")?;

    let vars = [
        ("name", command.to_string()),
        ("cmd", command.display_name()),
        ("className", command.class_name()),
        ("returnType", command.result_type()),
        ("messageFile", command.message_file()),
        ("pluginName", plugin_name.to_string()),
        ("commandPath", slash_path(&command.source_path())),
        ("importPath", command.unit_test_import()),
        ("year", year),
        ("copyright", copyright),
    ];
    Ok(vars.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

/// Forward-slash form for paths embedded in generated source.
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_files(
    project_dir: &Path,
    files: Vec<PlannedFile>,
    force: bool,
) -> Result<Vec<(PathBuf, FileStatus)>> {
    let mut statuses = Vec::with_capacity(files.len());
    for file in files {
        let target = project_dir.join(&file.path);
        let existed = target.exists();
        if existed && !force {
            warn!("{} exists, skipping (use --force to overwrite)", file.path.display());
            statuses.push((file.path, FileStatus::Skipped));
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        std::fs::write(&target, &file.contents)
            .with_context(|| format!("cannot write {}", target.display()))?;
        info!("wrote {} {}", file.kind.label(), file.path.display());
        let status = if existed {
            FileStatus::Overwritten
        } else {
            FileStatus::Created
        };
        statuses.push((file.path, status));
    }
    Ok(statuses)
}

fn follow_ups(manifest: &Manifest) -> Vec<String> {
    let dev = if cfg!(windows) { "bin\\dev.cmd" } else { "bin/dev" };
    let mut out = Vec::new();
    if manifest.has_script(DEPRECATION_POLICY_SCRIPT) {
        out.push(format!("{dev} snapshot:generate"));
    }
    if manifest.has_script(JSON_SCHEMA_SCRIPT) {
        out.push(format!("{dev} schema:generate"));
    }
    out
}
