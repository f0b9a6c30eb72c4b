use clap::Parser;
use colored::*;
use std::io;

use qdbg::config::Config;
use qdbg::error::EXIT_FAILURE;
use qdbg::home::QdbgHome;
use qdbg::i18n::I18n;
use qdbg::runner::{Outcome, Runner};
use qdbg::search::{ScanDirection, SearchEngine};

#[derive(Parser, Debug)]
#[command(name = "qdbg", version)]
#[command(about = "Run a command; if it fails, search the web for its error")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Search for the first non-empty stderr line instead of the last
    #[arg(long)]
    from_top: bool,
    /// Search site host [default: from config, else you.com]
    #[arg(long, env = "QDBG_SEARCH_PROVIDER")]
    provider: Option<String>,
    /// Command to run, followed by its arguments
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    qdbg::logging::init(cli.verbose);

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let home = QdbgHome::from_env();
    let config = match Config::new(&home) {
        Ok(config) => config,
        Err(e) => {
            let i18n = I18n::new(&Config::default().get_effective_language());
            eprintln!("{}", i18n.describe(&e).red());
            std::process::exit(EXIT_FAILURE);
        }
    };
    let i18n = I18n::new(&config.get_effective_language());

    let engine = cli
        .provider
        .map(SearchEngine::new)
        .unwrap_or_else(|| config.search_engine());
    let direction = if cli.from_top {
        ScanDirection::FromTop
    } else {
        config.scan_direction()
    };

    let runner = Runner::system().with_search(engine, direction);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match runner.run(cli.command, &mut out) {
        Ok(outcome) => {
            if let Outcome::SearchOpened { exit_code, .. } = &outcome {
                let code = exit_code.to_string();
                eprintln!("{}", i18n.t_format("search_opened", &[code.as_str()]).dimmed());
            }
            std::process::exit(outcome.exit_code());
        }
        Err(e) => {
            tracing::debug!("qdbg failed: {:?}", e);
            eprintln!("{}", i18n.describe(&e).red());
            std::process::exit(e.exit_code());
        }
    }
}
