//! Installs qdbg into `$QDBG_HOME` (default `~/.qdbg`) and writes the
//! launcher and env file that put it on `PATH`.

use anyhow::{bail, Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use colored::*;
use std::path::PathBuf;

use qdbg::config::Config;
use qdbg::home::QdbgHome;
use qdbg::i18n::I18n;
use qdbg::install::{self, InstallOptions, InstallReport, InstallSource, Installer};

#[derive(Parser, Debug)]
#[command(name = "get-qdbg", disable_version_flag = true)]
#[command(about = "Install, upgrade or remove qdbg in $QDBG_HOME")]
struct Args {
    /// Install the named version
    #[arg(long = "version", env = "QDBG_VERSION")]
    version: Option<String>,
    /// Allow pre-release versions
    #[arg(
        long,
        env = "QDBG_PREVIEW",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    preview: bool,
    /// Install on top of an existing installation of the same version
    #[arg(short, long)]
    force: bool,
    /// Remove qdbg and everything under $QDBG_HOME
    #[arg(
        long,
        env = "QDBG_UNINSTALL",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    uninstall: bool,
    /// A qdbg binary, or a directory of qdbg-<version> binaries, to install from
    #[arg(long)]
    file: Option<PathBuf>,
    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    if !cfg!(unix) {
        bail!("qdbg is not supported on Windows");
    }

    let args = Args::parse();
    qdbg::logging::init(args.verbose);

    let home = QdbgHome::from_env();
    let i18n = I18n::new(&Config::default().get_effective_language());
    let root = home.root().display().to_string();

    if args.uninstall {
        if install::uninstall(&home)? {
            println!("{}", i18n.t_format("uninstall_done", &[root.as_str()]).green());
        } else {
            println!("{}", i18n.t_format("uninstall_nothing", &[root.as_str()]));
        }
        return Ok(());
    }

    let source = match args.file {
        Some(path) if path.is_dir() => InstallSource::Releases { dir: path },
        Some(path) => InstallSource::Binary {
            path,
            version: args.version.clone(),
        },
        None => {
            let bundled = env!("CARGO_PKG_VERSION");
            if let Some(requested) = args.version.as_deref().filter(|v| *v != bundled) {
                println!("{}", i18n.t_format("install_version_missing", &[requested]).red());
                std::process::exit(1);
            }
            InstallSource::Binary {
                path: bundled_binary()?,
                version: Some(bundled.to_string()),
            }
        }
    };

    let options = InstallOptions {
        requested: args.version,
        preview: args.preview,
        force: args.force,
    };
    let installer = Installer::new(home, options, &i18n);

    match installer.run(&source) {
        Ok(InstallReport::Installed { version }) => {
            let label = version.unwrap_or_else(|| "offline file".to_string());
            println!();
            println!("{}", i18n.t_format("install_done", &[label.as_str()]).green().bold());
            println!(
                "{}",
                i18n.t_format(
                    "install_path_hint",
                    &[
                        installer.home().bin().display().to_string().as_str(),
                        installer.home().env_file().display().to_string().as_str(),
                    ],
                )
            );
            Ok(())
        }
        Ok(InstallReport::UpToDate { .. }) | Ok(InstallReport::AlreadyPresent) => Ok(()),
        Ok(InstallReport::VersionMissing(_)) | Ok(InstallReport::NoRelease) => std::process::exit(1),
        Err(e) => {
            tracing::debug!("install failed: {:?}", e);
            eprintln!("{}", i18n.t_format("install_failed", &[e.to_string().as_str()]).red());
            std::process::exit(e.exit_code());
        }
    }
}

/// The `qdbg` executable shipped next to this installer.
fn bundled_binary() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running installer")?;
    let binary = exe.with_file_name(format!("qdbg{}", std::env::consts::EXE_SUFFIX));
    if !binary.is_file() {
        bail!(
            "no qdbg binary next to {}; pass --file to install from elsewhere",
            exe.display()
        );
    }
    Ok(binary)
}
