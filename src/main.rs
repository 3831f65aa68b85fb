//! icongen - local icon component and font bundle from an icon-font stylesheet.

mod cli;
mod codegen;
mod config;
mod embed;
mod error;
mod font;
mod logger;
mod utils;

use clap::{ColorChoice, Parser};
use cli::{
    Cli,
    generate::{CommandFormatter, generate},
};
use config::GenConfig;
use font::HttpTransport;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    if let Err(e) = run(&cli) {
        log!("error"; "{:#}", e);
        if cli.url.is_none() {
            log!("usage"; "icongen [OPTIONS] <URL>, e.g. icongen //at.alicdn.com/t/font_123.css");
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = GenConfig::load(cli)?;
    match &config.config_path {
        Some(path) => debug!("config"; "loaded {}", path.display()),
        None => debug!("config"; "no {}, using defaults", crate::config::CONFIG_FILE),
    }

    let transport = HttpTransport::new(config.http.timeout(), config.http.insecure);
    let formatter = CommandFormatter::new(config.format.command.clone(), &config.root);

    let report = generate(cli.url.as_deref(), &config, &transport, &formatter)?;
    log!("done"; "{}", report);
    Ok(())
}
