//! Rendering
//!
//! The binder never writes output itself; it hands results to a [`Render`] implementation.
//! [`TableRenderer`] draws them as terminal tables.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Cell, Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, NO_SELECTION_LABEL},
    evaluator::CalculationResult,
    money::format_amount,
    promotions::PromotionKind,
};

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to write output
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Receives the binder's output.
pub trait Render {
    /// Overwrite the displayed subtotal, discount, total and message.
    ///
    /// # Errors
    ///
    /// Returns an error if the output could not be written.
    fn render_result(
        &mut self,
        promotion: PromotionKind,
        product_label: &str,
        result: &CalculationResult<'_>,
    ) -> Result<(), RenderError>;

    /// Show a message without touching the displayed amounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the output could not be written.
    fn render_prompt(&mut self, message: &str) -> Result<(), RenderError>;
}

impl<R: Render + ?Sized> Render for &mut R {
    fn render_result(
        &mut self,
        promotion: PromotionKind,
        product_label: &str,
        result: &CalculationResult<'_>,
    ) -> Result<(), RenderError> {
        (**self).render_result(promotion, product_label, result)
    }

    fn render_prompt(&mut self, message: &str) -> Result<(), RenderError> {
        (**self).render_prompt(message)
    }
}

/// Renders results as tables to any writer.
#[derive(Debug)]
pub struct TableRenderer<W> {
    out: W,
    colors: bool,
}

impl<W: io::Write> TableRenderer<W> {
    /// Create a renderer without colours.
    pub fn new(out: W) -> Self {
        Self { out, colors: false }
    }

    /// Highlight discounted results with ANSI colours.
    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Render for TableRenderer<W> {
    fn render_result(
        &mut self,
        promotion: PromotionKind,
        product_label: &str,
        result: &CalculationResult<'_>,
    ) -> Result<(), RenderError> {
        let mut builder = Builder::default();

        builder.push_record([promotion.title().to_string(), product_label.to_string()]);
        builder.push_record(["Sin descuento".to_string(), format_amount(result.subtotal())]);
        builder.push_record(["Descuento".to_string(), format_amount(result.discount())]);
        builder.push_record(["Total final".to_string(), format_amount(result.total())]);

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..), Alignment::right());

        if self.colors {
            table.modify(Rows::first(), Color::BOLD);

            if result.has_discount() {
                table.modify(Cell::new(2, 1), Color::FG_GREEN);
                table.modify(Cell::new(3, 1), Color::BOLD);
            }
        }

        writeln!(self.out, "{table}")?;
        writeln!(self.out, "{}", result.message())?;

        Ok(())
    }

    fn render_prompt(&mut self, message: &str) -> Result<(), RenderError> {
        writeln!(self.out, "{message}")?;

        Ok(())
    }
}

/// Write the catalog as a numbered table, including the `0` "no selection" row.
///
/// # Errors
///
/// Returns an error if the output could not be written.
pub fn write_catalog(out: &mut impl io::Write, catalog: &Catalog) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Producto", "Precio"]);
    builder.push_record(["0", NO_SELECTION_LABEL, ""]);

    for (idx, entry) in catalog.entries().iter().enumerate() {
        builder.push_record([
            (idx + 1).to_string(),
            entry.label().to_string(),
            format_amount(entry.unit_price()),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}
