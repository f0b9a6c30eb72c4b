//! Installing qdbg into `$QDBG_HOME` from local files.
//!
//! The lib directory is replaced with a backup/rollback sequence: the old
//! `lib` is moved to `lib-backup`, the new one is built in place, and the
//! backup is put back if building fails. `lib-backup` never survives a run.

use crate::error::{QdbgError, Result};
use crate::home::QdbgHome;
use crate::i18n::I18n;
use crate::release::{select_release, Selection, Version};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

const BINARY_NAME: &str = "qdbg";
const VERSION_FILE: &str = "VERSION";
const RELEASE_PREFIX: &str = "qdbg-";

/// Where the files to install come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallSource {
    /// A single qdbg executable. `version` is `None` for an unlabelled offline file.
    Binary { path: PathBuf, version: Option<String> },
    /// A directory of `qdbg-<version>` executables to choose from.
    Releases { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReport {
    Installed { version: Option<String> },
    UpToDate { version: String },
    AlreadyPresent,
    VersionMissing(String),
    NoRelease,
}

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub requested: Option<String>,
    pub preview: bool,
    pub force: bool,
}

pub struct Installer<'a> {
    home: QdbgHome,
    options: InstallOptions,
    i18n: &'a I18n,
}

impl<'a> Installer<'a> {
    pub fn new(home: QdbgHome, options: InstallOptions, i18n: &'a I18n) -> Self {
        Self { home, options, i18n }
    }

    pub fn home(&self) -> &QdbgHome {
        &self.home
    }

    /// Version recorded by the last install, if it can be read.
    pub fn current_version(&self) -> Option<String> {
        let lib = self.home.lib();
        if !lib.exists() {
            return None;
        }
        let version = fs::read_to_string(lib.join(VERSION_FILE))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if version.is_none() {
            println!("{}", self.i18n.t("install_current_unknown").yellow());
        }
        version
    }

    pub fn run(&self, source: &InstallSource) -> Result<InstallReport> {
        let current = self.current_version();

        let (binary, version) = match source {
            InstallSource::Binary { path, version: None } => {
                if self.home.lib().join(BINARY_NAME).exists() && !self.options.force {
                    println!("{}", self.i18n.t("install_already_present"));
                    return Ok(InstallReport::AlreadyPresent);
                }
                let shown = path.display().to_string().green().to_string();
                println!("{}", self.i18n.t_format("install_from_file", &[shown.as_str()]));
                (path.clone(), None)
            }
            InstallSource::Binary { path, version: Some(version) } => (path.clone(), Some(version.clone())),
            InstallSource::Releases { dir } => {
                let releases = scan_releases(dir)?;
                let versions: Vec<Version> = releases.iter().map(|(v, _)| v.clone()).collect();
                match select_release(&versions, self.options.requested.as_deref(), self.options.preview) {
                    Selection::Install(chosen) => {
                        let path = releases
                            .iter()
                            .find(|(v, _)| *v == chosen)
                            .map(|(_, p)| p.clone())
                            .ok_or_else(|| QdbgError::Install(format!("release {} vanished", chosen)))?;
                        (path, Some(chosen.to_string()))
                    }
                    Selection::Missing(requested) => {
                        println!("{}", self.i18n.t_format("install_version_missing", &[requested.as_str()]).red());
                        return Ok(InstallReport::VersionMissing(requested));
                    }
                    Selection::NoneAvailable => {
                        println!(
                            "{}",
                            self.i18n.t_format("install_no_release", &[dir.display().to_string().as_str()]).red()
                        );
                        return Ok(InstallReport::NoRelease);
                    }
                }
            }
        };

        if let Some(version) = &version {
            if let Some(report) = self.compare_with_current(version, current.as_deref()) {
                return Ok(report);
            }
            let shown = version.green().to_string();
            println!("{}", self.i18n.t_format("install_version", &[shown.as_str()]));
        }

        self.install(&binary, version.as_deref())?;
        Ok(InstallReport::Installed { version })
    }

    fn compare_with_current(&self, target: &str, current: Option<&str>) -> Option<InstallReport> {
        let current = current?;
        let (target_v, current_v) = (Version::parse(target), Version::parse(current));
        let same = match (&target_v, &current_v) {
            (Some(t), Some(c)) => t == c,
            _ => target == current,
        };
        if same && !self.options.force {
            println!("{}", self.i18n.t("install_already_latest"));
            return Some(InstallReport::UpToDate {
                version: current.to_string(),
            });
        }
        if let (Some(t), Some(c)) = (target_v, current_v) {
            if t < c {
                println!("{}", self.i18n.t_format("install_downgrade", &[current, target]).yellow());
            }
        }
        None
    }

    fn install(&self, binary: &Path, version: Option<&str>) -> Result<()> {
        fs::create_dir_all(self.home.root())
            .map_err(|e| QdbgError::io("failed to create qdbg home", self.home.root(), e))?;
        make_lib(&self.home, |lib| populate_lib(lib, binary, version))?;
        make_bin(&self.home)?;
        make_env(&self.home)?;
        tracing::info!(home = %self.home.root().display(), ?version, "installed");
        Ok(())
    }
}

/// Every `qdbg-<version>` file in `dir`, oldest first.
pub fn scan_releases(dir: &Path) -> Result<Vec<(Version, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| QdbgError::io("failed to read release directory", dir, e))?;
    let mut releases = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| QdbgError::io("failed to read release directory", dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        match name.strip_prefix(RELEASE_PREFIX).and_then(Version::parse) {
            Some(version) => releases.push((version, path)),
            None => tracing::debug!(file = %name, "not a release, skipping"),
        }
    }
    releases.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(releases)
}

/// Rebuild `lib` with `build`, restoring the previous `lib` if it fails.
pub fn make_lib<F>(home: &QdbgHome, build: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let lib = home.lib();
    let backup = home.lib_backup();

    if backup.exists() {
        fs::remove_dir_all(&backup).map_err(|e| QdbgError::io("failed to remove stale backup", &backup, e))?;
    }

    if lib.exists() {
        fs::rename(&lib, &backup).map_err(|e| QdbgError::io("failed to back up lib", &lib, e))?;
    }

    let built = fs::create_dir_all(&lib)
        .map_err(|e| QdbgError::io("failed to create lib", &lib, e))
        .and_then(|_| build(&lib));

    if let Err(err) = built {
        if lib.exists() {
            if let Err(e) = fs::remove_dir_all(&lib) {
                tracing::warn!("could not remove partial lib {}: {}", lib.display(), e);
            }
        }
        if backup.exists() {
            if let Err(e) = fs::rename(&backup, &lib) {
                tracing::error!("could not restore {} from backup: {}", lib.display(), e);
            }
        }
        return Err(err);
    }

    if backup.exists() {
        fs::remove_dir_all(&backup).map_err(|e| QdbgError::io("failed to remove backup", &backup, e))?;
    }
    Ok(())
}

fn populate_lib(lib: &Path, binary: &Path, version: Option<&str>) -> Result<()> {
    let target = lib.join(BINARY_NAME);
    fs::copy(binary, &target).map_err(|e| QdbgError::io("failed to copy qdbg binary", binary, e))?;
    set_executable(&target)?;
    if let Some(version) = version {
        let version_file = lib.join(VERSION_FILE);
        fs::write(&version_file, format!("{}\n", version))
            .map_err(|e| QdbgError::io("failed to record version", &version_file, e))?;
    }
    Ok(())
}

/// Write the `bin/qdbg` launcher that execs the installed binary.
pub fn make_bin(home: &QdbgHome) -> Result<PathBuf> {
    let bin = home.bin();
    fs::create_dir_all(&bin).map_err(|e| QdbgError::io("failed to create bin", &bin, e))?;

    let launcher = bin.join(BINARY_NAME);
    let script = format!(
        "#!/bin/sh\nexec {} \"$@\"\n",
        shell_quote(&home.lib().join(BINARY_NAME).to_string_lossy())
    );
    fs::write(&launcher, script).map_err(|e| QdbgError::io("failed to write launcher", &launcher, e))?;
    set_executable(&launcher)?;
    Ok(launcher)
}

/// Write the `env` file that puts `bin` on `PATH` when sourced.
pub fn make_env(home: &QdbgHome) -> Result<PathBuf> {
    let env_file = home.env_file();
    fs::write(&env_file, export_string(&home.bin()))
        .map_err(|e| QdbgError::io("failed to write env file", &env_file, e))?;
    Ok(env_file)
}

pub fn export_string(bin: &Path) -> String {
    let bin = bin.to_string_lossy();
    let home = dirs::home_dir().map(|h| h.to_string_lossy().into_owned());
    let shown = match home.as_deref().and_then(|h| bin.strip_prefix(h)) {
        Some(rest) if rest.starts_with('/') => format!("$HOME{}", escape_double_quoted(rest)),
        _ => escape_double_quoted(&bin),
    };
    format!("export PATH=\"{}:$PATH\"\n", shown)
}

/// Remove the whole installation. Returns `false` when there was nothing to remove.
pub fn uninstall(home: &QdbgHome) -> Result<bool> {
    let root = home.root();
    if !root.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(root).map_err(|e| QdbgError::io("failed to remove qdbg home", root, e))?;
    Ok(true)
}

fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

fn escape_double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '$' | '`' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)
        .map_err(|e| QdbgError::io("failed to stat", path, e))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).map_err(|e| QdbgError::io("failed to make executable", path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
