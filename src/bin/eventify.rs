use anyhow::Result;
use clap::Parser;
use eventify::cli::{self, Cli};
use eventify::config::Config;
use eventify::context::StandardContext;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::io;

fn main() -> Result<()> {
    let args = Cli::parse();
    let ctx = StandardContext::from_env(args.root.clone());
    let config = Config::load_or_default(&ctx)?;

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.log_level_filter()
    };
    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if let Err(e) = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    if let Some(root) = ctx.override_root() {
        log::debug!("Using root directory {:?}", root);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli::run(args, &ctx, &config, &mut out)
}
