mod api;
mod config;
mod logging;
mod metrics;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let overrides = config::Overrides::take_from(&mut args)?;
    let config = config::Config::load(overrides)?;

    let tui = args.len() == 1;
    logging::init(&config, tui)?;

    let api = api::HttpBackend::new(&config).context("Failed to set up the HTTP client")?;
    let mut app = ui::app::App::new(config.currency.clone());

    match args.len() {
        1 => run::as_tui(&mut app, &api),
        2.. => {
            let stdout = std::io::stdout();
            let stdin = std::io::stdin();
            run::as_cli(&args, &mut app, &api, &mut stdout.lock(), &mut stdin.lock())
        }
        _ => {
            eprintln!("Usage: budgetview [command]");
            Ok(())
        }
    }
}
