//! Vitrina
//!
//! Vitrina computes the storefront's promotion totals: given a product from the [`catalog`], a
//! quantity and a [`promotions::PromotionKind`], the [`evaluator`] derives the subtotal, the
//! discount and the final total. The [`binder`] turns raw form input into evaluations and hands
//! the results to a [`render::Render`] implementation.

pub mod binder;
pub mod catalog;
pub mod config;
pub mod discounts;
pub mod evaluator;
pub mod money;
pub mod observability;
pub mod promotions;
pub mod render;
pub mod session;
