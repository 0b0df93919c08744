//! Reading and writing the plugin project on disk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use pluginkit_core::{KnownCommands, Manifest};
use tracing::{debug, info};

pub const MANIFEST_FILE: &str = "package.json";

pub fn manifest_path(project_dir: &Path) -> PathBuf {
    project_dir.join(MANIFEST_FILE)
}

/// Load `package.json`. The manifest must exist and carry a `name`.
pub fn load_manifest(project_dir: &Path) -> Result<Manifest> {
    let path = manifest_path(project_dir);
    if !path.is_file() {
        bail!(
            "no {MANIFEST_FILE} in {} (run this inside a plugin project or pass --dir)",
            project_dir.display()
        );
    }
    let content =
        std::fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))?;
    let manifest = Manifest::from_json(&content)
        .with_context(|| format!("invalid manifest {}", path.display()))?;
    if manifest.name().is_none() {
        bail!("{} has no \"name\" field", path.display());
    }
    debug!("loaded manifest {}", path.display());
    Ok(manifest)
}

pub fn save_manifest(project_dir: &Path, manifest: &Manifest) -> Result<()> {
    let path = manifest_path(project_dir);
    let output = manifest.to_json_string()?;
    std::fs::write(&path, output).with_context(|| format!("cannot write {}", path.display()))?;
    info!("updated {}", path.display());
    Ok(())
}

/// Read a saved command listing (`sf commands --json` output).
pub fn load_known_commands(path: &Path) -> Result<KnownCommands> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read command listing {}", path.display()))?;
    let known = KnownCommands::from_listing_json(&content)
        .with_context(|| format!("invalid command listing {}", path.display()))?;
    debug!("{} known commands from {}", known.len(), path.display());
    Ok(known)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_manifest_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path()).unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn test_load_manifest_requires_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(manifest_path(dir.path()), r#"{ "version": "1.0.0" }"#).unwrap();
        let err = load_manifest(dir.path()).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(manifest_path(dir.path()), r#"{"name":"demo","version":"1.0.0"}"#).unwrap();
        let manifest = load_manifest(dir.path()).unwrap();
        save_manifest(dir.path(), &manifest).unwrap();

        let written = std::fs::read_to_string(manifest_path(dir.path())).unwrap();
        assert_eq!(written, "{\n  \"name\": \"demo\",\n  \"version\": \"1.0.0\"\n}\n");
        assert_eq!(load_manifest(dir.path()).unwrap(), manifest);
    }

    #[test]
    fn test_load_known_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.json");
        std::fs::write(&path, r#"[{"id": "org:list"}, {"id": "org display"}]"#).unwrap();
        let known = load_known_commands(&path).unwrap();
        assert_eq!(known.len(), 2);
        assert!(known.claims("org"));
    }

    #[test]
    fn test_load_known_commands_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_known_commands(&dir.path().join("nope.json")).is_err());
    }
}
