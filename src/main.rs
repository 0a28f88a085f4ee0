use anyhow::Result;
use clap::Parser;

use mnctl::DefaultPaths;
use mnctl::cli::Cli;
use mnctl::commands::AppContext;
use mnctl::router::{Router, RouterSettings};
use mnctl::storage::SqliteNoteStore;
use mnctl::utils::error::{AppError, report_error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<AppError>() {
            Some(app_err) => {
                report_error(app_err);
                std::process::exit(app_err.exit_code());
            }
            None => return Err(err),
        }
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let defaults = match &cli.home {
        Some(home) => DefaultPaths::rooted(home),
        None => DefaultPaths::standard(),
    };

    let settings = RouterSettings {
        config_path: cli.config.clone(),
        explicit: None,
        defaults,
        stream_override: cli.stream.then_some(true),
    };

    let router = Router::new(settings, Box::new(SqliteNoteStore::new()))?;
    let mut ctx = AppContext::new(router, cli.yes);

    if cli.command.wants_setup() {
        ctx.setup()?;
    }

    ctx.logger().debug("Command dispatched");
    cli.command.execute(&mut ctx).await?;
    Ok(())
}
