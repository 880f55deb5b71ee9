//! View Binder
//!
//! Holds the form the shopper is filling in for one promotion, decides whether it is complete,
//! and pushes either a fresh result or a prompt to the injected [`Render`]er.
//!
//! A form is incomplete when no product is selected, the selected label is not in the
//! catalog, or the quantity is not a positive whole number. Incomplete forms always produce
//! the same prompt and never reach the evaluator.

use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::Catalog,
    evaluator::{CalculationInput, EvaluationError, evaluate},
    promotions::PromotionKind,
    render::{Render, RenderError},
};

/// Prompt shown while the form is incomplete.
pub const INCOMPLETE_PROMPT: &str = "Por favor, selecciona un producto y una cantidad válida.";

/// Binder Errors
#[derive(Debug, Error)]
pub enum BindError {
    /// Promotion evaluation failed
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Output could not be written
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The product selector's current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProductSelection {
    /// The "no selection" sentinel (value `0`)
    #[default]
    None,

    /// A catalog label
    Label(String),
}

impl ProductSelection {
    /// Interpret user input as a selector value.
    ///
    /// A number picks a catalog position (`0` is the sentinel). Anything else is matched against
    /// labels and then product names; unmatched text is kept as-is and will be treated as
    /// incomplete.
    pub fn parse(input: &str, catalog: &Catalog) -> Self {
        let input = input.trim();

        if input.is_empty() {
            return ProductSelection::None;
        }

        if let Ok(position) = input.parse::<usize>() {
            return catalog
                .select(position)
                .map_or(ProductSelection::None, |entry| {
                    ProductSelection::Label(entry.label().to_string())
                });
        }

        let label = catalog
            .resolve(input)
            .map_or(input, |entry| entry.label());

        ProductSelection::Label(label.to_string())
    }

    /// Return the selected label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            ProductSelection::None => None,
            ProductSelection::Label(label) => Some(label),
        }
    }
}

/// One promotion's form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// Promotion this form calculates
    pub promotion: PromotionKind,

    /// Product selector value
    pub product: ProductSelection,

    /// Raw quantity input
    pub quantity: String,
}

impl FormState {
    /// Create an empty form for a promotion.
    pub fn new(promotion: PromotionKind) -> Self {
        Self {
            promotion,
            product: ProductSelection::None,
            quantity: String::new(),
        }
    }

    /// Parse the quantity input. Returns `None` unless it is a positive whole number.
    pub fn quantity(&self) -> Option<u32> {
        self.quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&quantity| quantity > 0)
    }

    /// Build the evaluator input, or `None` if the form is incomplete.
    pub fn input<'c>(
        &self,
        catalog: &'c Catalog,
    ) -> Option<(CalculationInput<'static>, &'c str)> {
        let label = self.product.label()?;
        let entry = catalog.entry(label)?;
        let quantity = self.quantity()?;

        CalculationInput::new(self.promotion, *entry.unit_price(), quantity)
            .map(|input| (input, entry.label()))
    }
}

/// What a refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// A result was rendered
    Rendered,

    /// The form was incomplete and the prompt was shown
    Incomplete,
}

/// Connects a catalog, the evaluator and a renderer.
#[derive(Debug)]
pub struct Binder<'c, R> {
    catalog: &'c Catalog,
    renderer: R,
}

impl<'c, R: Render> Binder<'c, R> {
    /// Create a binder.
    pub fn new(catalog: &'c Catalog, renderer: R) -> Self {
        Self { catalog, renderer }
    }

    /// Return the catalog.
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Return the renderer mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consume the binder, returning the renderer.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Recalculate the form and render the outcome.
    ///
    /// # Errors
    ///
    /// - [`BindError::Evaluation`]: the evaluator could not represent the amounts.
    /// - [`BindError::Render`]: the renderer failed to write.
    pub fn refresh(&mut self, form: &FormState) -> Result<Refresh, BindError> {
        let Some((input, label)) = form.input(self.catalog) else {
            debug!(
                promotion = %form.promotion,
                product = ?form.product,
                quantity = %form.quantity,
                "form incomplete"
            );

            self.renderer.render_prompt(INCOMPLETE_PROMPT)?;

            return Ok(Refresh::Incomplete);
        };

        let result = evaluate(&input, label)?;

        self.renderer.render_result(form.promotion, label, &result)?;

        Ok(Refresh::Rendered)
    }
}
