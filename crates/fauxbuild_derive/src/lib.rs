//! Attribute macros for synthesized builders.
//!
//! - `contract`: turns a trait of writers, readers and one `#[terminal]` method into a builder contract, implemented
//!   for `fauxbuild::BuilderProxy`.

use proc_macro::TokenStream;

mod contract;

/// Synthesizes a builder for the annotated trait.
///
/// Every method of the trait is classified when the macro expands, under the naming convention given as argument
/// (`getter-setter` when omitted):
/// - writer: `fn name(&mut self, value: T) -> Result<&mut Self, E>` where `T: fauxbuild::SlotValue`;
/// - reader: `fn name(&self) -> R` where `R: fauxbuild::FromSlot`;
/// - terminal: `#[terminal] fn name(&mut self) -> Result<Product, E>`, exactly once.
///
/// `#[writer(slot = "...")]` and `#[reader(slot = "...")]` pin the slot of a method whose name does not follow the
/// convention. A method that is none of the above is rejected with a compile error naming it.
///
/// Alongside the trait the macro emits `<Trait>Contract`, a unit struct implementing `fauxbuild::ContractShape`, and
/// `impl Trait for fauxbuild::BuilderProxy<Product, E, <Trait>Contract>` routing every method through the dispatcher.
/// Only builders made from `<Trait>Contract` carry that marker, so the trait never applies to another contract.
///
/// # Example
/// ```ignore
/// #[contract(convention = "simple-setter")]
/// trait PointBuilder {
///     fn set_x(&mut self, x: i32) -> Result<&mut Self, BuilderError>;
///     fn x(&self) -> i32;
///     #[terminal]
///     fn build(&mut self) -> Result<Point, BuilderError>;
/// }
///
/// let mut builder = PointBuilderContract::create(|b| Ok(Point { x: b.x() }))?;
/// let point = builder.set_x(3)?.build()?;
/// ```
#[proc_macro_attribute]
pub fn contract(attr: TokenStream, item: TokenStream) -> TokenStream {
    contract::expand(attr.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
