//! Catalog
//!
//! The fixed table of products shown on the promotions page, keyed by display label. A catalog
//! is built once (either the built-in storefront table or a YAML file) and never mutated.

use std::{fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::money::{MINOR_PER_MAJOR, from_whole_units};

/// Products on the storefront, as `(label, whole-unit price)`.
const STOREFRONT: [(&str, i64); 5] = [
    ("Florero Pop Amarillo ($15.500)", 15_500),
    ("Lámpara de Escritorio ($28.900)", 28_900),
    ("Manta de Algodón ($45.000)", 45_000),
    ("Bowls Mamushka ($25.800)", 25_800),
    ("Servilletas de lino ($10.500)", 10_500),
];

/// Label shown for the "no selection" sentinel (value `0`).
pub const NO_SELECTION_LABEL: &str = "--- Selecciona un Producto ---";

/// Catalog Errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Prices must be strictly positive
    #[error("Price for {0} must be positive")]
    NonPositivePrice(String),

    /// The same label appears more than once
    #[error("Duplicate product label: {0}")]
    DuplicateLabel(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products defined
    #[error("Catalog has no products")]
    Empty,
}

/// A single product on sale.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    label: String,
    unit_price: Money<'static, Currency>,
}

impl CatalogEntry {
    /// Create a catalog entry.
    pub fn new(label: impl Into<String>, unit_price: Money<'static, Currency>) -> Self {
        Self {
            label: label.into(),
            unit_price,
        }
    }

    /// Return the display label, e.g. `Bowls Mamushka ($25.800)`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Return the product name without the price suffix.
    pub fn name(&self) -> &str {
        product_name(&self.label)
    }

    /// Return the unit price.
    pub fn unit_price(&self) -> &Money<'static, Currency> {
        &self.unit_price
    }
}

/// Strip the parenthesised price suffix from a display label.
///
/// `"Bowls Mamushka ($25.800)"` becomes `"Bowls Mamushka"`.
pub fn product_name(label: &str) -> &str {
    label
        .split_once('(')
        .map_or(label, |(name, _price)| name)
        .trim()
}

/// Fixed product label -> unit price table.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_label: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from a list of entries, preserving their order.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Empty`]: no entries were given.
    /// - [`CatalogError::DuplicateLabel`]: two entries share a label.
    /// - [`CatalogError::NonPositivePrice`]: an entry is priced at zero or less.
    /// - [`CatalogError::CurrencyMismatch`]: entries are priced in different currencies.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let first = entries.first().ok_or(CatalogError::Empty)?;
        let currency = first.unit_price.currency();

        let mut by_label = FxHashMap::default();

        for (idx, entry) in entries.iter().enumerate() {
            if entry.unit_price.to_minor_units() <= 0 {
                return Err(CatalogError::NonPositivePrice(entry.label.clone()));
            }

            if entry.unit_price.currency() != currency {
                return Err(CatalogError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    entry.unit_price.currency().iso_alpha_code.to_string(),
                ));
            }

            if by_label.insert(entry.label.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateLabel(entry.label.clone()));
            }
        }

        Ok(Self { entries, by_label })
    }

    /// Parse a catalog from YAML.
    ///
    /// ```yaml
    /// products:
    ///   - label: "Bowls Mamushka ($25.800)"
    ///     price: "25800 ARS"
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a price is malformed, or the entries fail
    /// the checks in [`Catalog::new`].
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(contents)?;

        let entries = file
            .products
            .into_iter()
            .map(CatalogEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(entries)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`Catalog::from_yaml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&contents)?;

        debug!(path = %path.display(), products = catalog.len(), "loaded catalog");

        Ok(catalog)
    }

    /// Look up the unit price for a label.
    pub fn lookup(&self, label: &str) -> Option<&Money<'static, Currency>> {
        self.entry(label).map(CatalogEntry::unit_price)
    }

    /// Look up the entry for a label.
    pub fn entry(&self, label: &str) -> Option<&CatalogEntry> {
        let idx = *self.by_label.get(label)?;

        self.entries.get(idx)
    }

    /// Return the entry at a selector position. Position `0` is the "no selection" sentinel
    /// and always returns `None`; products are numbered from `1` in catalog order.
    pub fn select(&self, position: usize) -> Option<&CatalogEntry> {
        let idx = position.checked_sub(1)?;

        self.entries.get(idx)
    }

    /// Find an entry by its label, or failing that by its product name (case-insensitive).
    pub fn resolve(&self, query: &str) -> Option<&CatalogEntry> {
        let query = query.trim();

        self.entry(query).or_else(|| {
            let query = query.to_lowercase();

            self.entries
                .iter()
                .find(|entry| entry.name().to_lowercase() == query)
        })
    }

    /// Return all entries in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Return all labels in catalog order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(CatalogEntry::label)
    }

    /// Return the number of products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the catalog has no products. Always `false` for a built catalog.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    /// The storefront catalog, priced in Argentine pesos.
    fn default() -> Self {
        let entries: Vec<CatalogEntry> = STOREFRONT
            .iter()
            .map(|&(label, units)| {
                CatalogEntry::new(label, Money::from_minor(units * MINOR_PER_MAJOR, iso::ARS))
            })
            .collect();

        let by_label = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.label.clone(), idx))
            .collect();

        Self { entries, by_label }
    }
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<CatalogEntryFile>,
}

/// Catalog entry as written in YAML
#[derive(Debug, Deserialize)]
struct CatalogEntryFile {
    label: String,

    /// Whole-unit price with currency, e.g. `"25800 ARS"`
    price: String,
}

impl TryFrom<CatalogEntryFile> for CatalogEntry {
    type Error = CatalogError;

    fn try_from(file: CatalogEntryFile) -> Result<Self, Self::Error> {
        let unit_price = parse_price(&file.price)?;

        Ok(CatalogEntry::new(file.label, unit_price))
    }
}

/// Parse a whole-unit price string (e.g. `"25800 ARS"`) into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is not
/// a whole number, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if !amount.fract().is_zero() {
        return Err(CatalogError::InvalidPrice(format!(
            "Prices are whole units, got: {s}"
        )));
    }

    let currency = match currency_code {
        "ARS" => iso::ARS,
        "USD" => iso::USD,
        "EUR" => iso::EUR,
        "GBP" => iso::GBP,
        other => return Err(CatalogError::UnknownCurrency(other.to_string())),
    };

    amount
        .to_i64()
        .and_then(|units| from_whole_units(units, currency))
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))
}
