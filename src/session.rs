//! Session
//!
//! Line-oriented stand-in for the promotions page: every command that changes the product, the
//! quantity or the promotion re-runs the binder, the way the page recalculates on each change
//! event.

use std::{io::BufRead, str::FromStr};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    binder::{BindError, Binder, FormState, ProductSelection},
    promotions::{PromotionKind, UnknownPromotion},
    render::{Render, RenderError},
};

/// Help text listing the session commands.
pub const HELP: &str = "\
Comandos:
  producto <n|nombre>   elegir producto (0 = ninguno)
  cantidad <n>          cambiar cantidad
  promocion <tipo>      threshold-bonus | first-purchase | buy-two-get-one-bowl
  mostrar               recalcular
  ayuda                 esta ayuda
  salir                 terminar";

/// Session Errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading input failed
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Refreshing the form failed
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Writing a notice failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A single session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select a product by position, label or name
    Product(String),

    /// Set the raw quantity input
    Quantity(String),

    /// Switch promotion
    Promotion(PromotionKind),

    /// Recalculate without changing anything
    Show,

    /// Print the command list
    Help,

    /// End the session
    Quit,
}

/// Command parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The command word is not recognised
    #[error("Comando desconocido: {0}")]
    Unknown(String),

    /// The promotion name is not recognised
    #[error("Promoción desconocida: {0}")]
    Promotion(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word.to_lowercase().as_str() {
            "producto" | "product" | "p" => Ok(Command::Product(rest.to_string())),
            "cantidad" | "quantity" | "q" => Ok(Command::Quantity(rest.to_string())),
            "promocion" | "promoción" | "promotion" => rest
                .parse()
                .map(Command::Promotion)
                .map_err(|UnknownPromotion(name)| CommandError::Promotion(name)),
            "mostrar" | "show" | "" => Ok(Command::Show),
            "ayuda" | "help" | "?" => Ok(Command::Help),
            "salir" | "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// Interactive form driven by text commands.
#[derive(Debug)]
pub struct Session<'c, R> {
    binder: Binder<'c, R>,
    form: FormState,
}

impl<'c, R: Render> Session<'c, R> {
    /// Start a session with an empty form for `promotion`.
    pub fn new(binder: Binder<'c, R>, promotion: PromotionKind) -> Self {
        Self {
            binder,
            form: FormState::new(promotion),
        }
    }

    /// Return the current form.
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Consume the session, returning the binder.
    pub fn into_binder(self) -> Binder<'c, R> {
        self.binder
    }

    /// Apply one command. Returns `false` once the session should end.
    ///
    /// # Errors
    ///
    /// Returns an error if refreshing the form or writing output fails.
    pub fn apply(&mut self, command: Command) -> Result<bool, SessionError> {
        match command {
            Command::Product(input) => {
                self.form.product = ProductSelection::parse(&input, self.binder.catalog());
            }
            Command::Quantity(input) => self.form.quantity = input,
            Command::Promotion(kind) => self.form.promotion = kind,
            Command::Show => {}
            Command::Help => {
                self.binder.renderer_mut().render_prompt(HELP)?;

                return Ok(true);
            }
            Command::Quit => return Ok(false),
        }

        self.binder.refresh(&self.form)?;

        Ok(true)
    }

    /// Read commands line by line until `salir` or end of input.
    ///
    /// Unrecognised commands are reported through the renderer and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input, refreshing the form or writing output fails.
    pub fn run(&mut self, input: impl BufRead) -> Result<(), SessionError> {
        info!(promotion = %self.form.promotion, "session started");

        for line in input.lines() {
            let line = line?;

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    debug!(%err, %line, "rejected command");
                    self.binder.renderer_mut().render_prompt(&err.to_string())?;
                    continue;
                }
            };

            if !self.apply(command)? {
                break;
            }
        }

        info!("session ended");

        Ok(())
    }
}
