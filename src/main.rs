use clap::Parser;
use clickthrough::cli::commands::{cmd_links, cmd_run};
use clickthrough::cli::config::{Cli, Commands, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            spec,
            base_url,
            format,
            output,
            no_javascript,
        } => {
            let all_passed = cmd_run(
                &spec,
                base_url.as_deref(),
                format.as_deref(),
                output.as_deref(),
                no_javascript,
                &config,
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Links { url, base_url } => {
            cmd_links(&url, base_url.as_deref(), &config)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from warn.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
