//! Vitrina command line entry point

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use thiserror::Error;
use tracing::{error, info};

use vitrina::{
    binder::{BindError, Binder, FormState, ProductSelection},
    catalog::{Catalog, CatalogError},
    config::{Command, Config},
    observability::init_subscriber,
    promotions::PromotionKind,
    render::{Render, RenderError, TableRenderer, write_catalog},
    session::{HELP, Session, SessionError},
};

/// Errors surfaced by the CLI
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn main() -> ExitCode {
    let config = Config::load().unwrap_or_else(|err| err.exit());

    if let Err(err) = init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {err}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");

            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), CliError> {
    let catalog = config.catalog()?;

    info!(products = catalog.len(), "catalog ready");

    let stdout = io::stdout();
    let colors = config.color && stdout.is_terminal();

    match &config.command {
        Command::Catalog => write_catalog(&mut stdout.lock(), &catalog)?,
        Command::Quote {
            promotion,
            product,
            quantity,
        } => {
            let form = FormState {
                promotion: *promotion,
                product: ProductSelection::parse(product, &catalog),
                quantity: quantity.clone(),
            };

            Binder::new(&catalog, renderer(stdout.lock(), colors)).refresh(&form)?;
        }
        Command::Session { promotion } => {
            session(&catalog, *promotion, colors)?;
        }
    }

    Ok(())
}

fn session(catalog: &Catalog, promotion: PromotionKind, colors: bool) -> Result<(), CliError> {
    let mut out = io::stdout().lock();

    write_catalog(&mut out, catalog)?;

    let mut renderer = renderer(out, colors);
    renderer.render_prompt(HELP)?;

    Session::new(Binder::new(catalog, renderer), promotion).run(io::stdin().lock())?;

    Ok(())
}

fn renderer<W: io::Write>(out: W, colors: bool) -> TableRenderer<W> {
    TableRenderer::new(out).with_colors(colors)
}
