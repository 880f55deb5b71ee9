//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    catalog::{Catalog, CatalogError},
    promotions::PromotionKind,
};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Vitrina promotions calculator
#[derive(Debug, Parser)]
#[command(name = "vitrina", about = "Storefront promotions calculator", long_about = None)]
pub struct Config {
    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// YAML catalog to use instead of the built-in storefront products
    #[arg(long, env = "VITRINA_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Highlight discounts with ANSI colours
    #[arg(long, env = "VITRINA_COLOR", global = true)]
    pub color: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the catalog products with their selector numbers
    Catalog,

    /// Calculate one promotion
    Quote {
        /// Promotion to apply
        #[arg(short, long, value_enum)]
        promotion: PromotionKind,

        /// Product selector number, label or name (0 = no selection)
        #[arg(long)]
        product: String,

        /// Quantity
        #[arg(short, long, allow_hyphen_values = true)]
        quantity: String,
    },

    /// Fill in a promotion form interactively from standard input
    Session {
        /// Promotion to start with
        #[arg(short, long, value_enum, default_value_t = PromotionKind::ThresholdBonus)]
        promotion: PromotionKind,
    },
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Build the catalog: the file given by `--catalog`, or the storefront default.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be loaded.
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        self.catalog
            .as_ref()
            .map_or_else(|| Ok(Catalog::default()), Catalog::load)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_quote_with_page_key() -> TestResult {
        let config = Config::try_parse_from([
            "vitrina",
            "quote",
            "--promotion",
            "bowls",
            "--product",
            "4",
            "--quantity",
            "3",
        ])?;

        let Command::Quote {
            promotion,
            product,
            quantity,
        } = config.command
        else {
            return Err("expected quote command".into());
        };

        assert_eq!(promotion, PromotionKind::BuyTwoGetOneBowl);
        assert_eq!(product, "4");
        assert_eq!(quantity, "3");

        Ok(())
    }

    #[test]
    fn quote_accepts_negative_quantity_as_raw_input() -> TestResult {
        let config = Config::try_parse_from([
            "vitrina",
            "quote",
            "-p",
            "first-purchase",
            "--product",
            "1",
            "-q",
            "-2",
        ])?;

        assert!(matches!(config.command, Command::Quote { quantity, .. } if quantity == "-2"));

        Ok(())
    }

    #[test]
    fn session_defaults_to_threshold_bonus() -> TestResult {
        let config = Config::try_parse_from(["vitrina", "session"])?;

        assert!(matches!(
            config.command,
            Command::Session {
                promotion: PromotionKind::ThresholdBonus
            }
        ));
        assert_eq!(config.logging.log_format, LogFormat::Compact);

        Ok(())
    }

    #[test]
    fn default_catalog_without_path() -> TestResult {
        let config = Config::try_parse_from(["vitrina", "catalog"])?;

        assert_eq!(config.catalog()?.len(), 5);

        Ok(())
    }

    #[test]
    fn rejects_unknown_promotion() {
        let result = Config::try_parse_from([
            "vitrina", "quote", "-p", "3x2", "--product", "1", "-q", "1",
        ]);

        assert!(result.is_err());
    }
}
