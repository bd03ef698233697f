//! Shared, pure vocabulary for synthesized builders.
//!
//! This crate holds everything the runtime dispatcher and the `#[contract]` macro must agree on:
//! - slot values and their runtime type descriptors ([`value`]),
//! - the zero values unwritten primitive slots read as ([`defaults`]),
//! - naming conventions that classify operations ([`convention`]),
//! - contract descriptions and the role tables registered from them ([`contract`]),
//! - the error taxonomy ([`errors`]).
//!
//! ## Notes
//!
//! - No IO and no global mutable state; every table here is a `const`.
//! - The macro crate links this crate at compile time, so a trait is classified by exactly the rules the dispatcher
//!   applies at run time.

#![deny(clippy::unwrap_used)]

pub mod contract;
pub mod convention;
pub mod defaults;
pub mod errors;
pub mod value;

pub use contract::{Contract, ContractDescription, Operation, ReturnShape, Role, SlotId};
pub use convention::NamingConvention;
pub use errors::{BuilderError, ContractError};
pub use value::{FromSlot, ObjectRef, SlotValue, Value, ValueDesc, ValueType};

/// A contract described at compile time.
///
/// Implemented by the unit structs `#[contract]` generates next to the annotated trait.
pub trait ContractShape {
    /// Convention the trait was classified under.
    const CONVENTION: NamingConvention;

    fn description() -> ContractDescription;
}
