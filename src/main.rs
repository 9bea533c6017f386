mod cli;
mod client;
mod commands;
mod config;
mod error;
mod factory;
mod fs;
mod output;
mod projects;
mod types;

use std::error::Error;
use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use client::SdkClientCreator;
use config::MiaContext;
use error::{CliError, Result};
use factory::{CommandContext, Factory};
use fs::Fs;
use output::Renderer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "miactl", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let verbose = cli.verbose > 0;
    let json = cli.json;

    let ctx = match setup(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            report(&Renderer::stdio(json), &e, verbose);
            return ExitCode::from(e.exit_code());
        }
    };

    match commands::run(&ctx, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match ctx.factory() {
                Ok(f) => report(f.renderer(), &e, verbose),
                Err(_) => report(&Renderer::stdio(json), &e, verbose),
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build the factory and resolve connection options from flags and the
/// optional saved context.
fn setup(cli: &Cli) -> Result<CommandContext> {
    let factory = Factory::builder()
        .renderer(Renderer::stdio(cli.json))
        .fs(Fs::os())
        .client_creator(SdkClientCreator)
        .home_dir(config::home_dir()?)
        .build()?;

    let mut options = cli.connection.clone().into_options();
    if let Some(name) = &cli.context {
        MiaContext::load(factory.fs(), factory.home_dir(), name)?.apply_to(&mut options);
    }

    Ok(CommandContext::new(options).with_factory(factory))
}

fn report(renderer: &Renderer, err: &CliError, verbose: bool) {
    renderer.error(err);

    // Show error chain if verbose flag was passed
    if verbose {
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("Caused by: {cause}");
            source = cause.source();
        }
    }
}
