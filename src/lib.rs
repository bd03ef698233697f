#![forbid(unsafe_code)]
//! Synthesized builders for arbitrary builder contracts.
//!
//! A caller describes a contract (which operations write a slot, which read one, which one is the terminal) and
//! supplies a callback that turns the populated builder into the product. [`create`] returns a [`BuilderProxy`] that
//! answers every operation of the contract as a hand-written builder would: writers store and chain, readers answer
//! the stored value or the type's zero, the terminal runs the callback.
//!
//! - [`proxy`]: the dispatcher and its slot store
//! - [`factory`]: `create`, `create_reflective` and the configurable [`BuilderFactory`]
//! - [`reflective`]: constructor discovery for reflectively built products
//! - [`contract`]: attribute macro generating a typed trait implementation over [`BuilderProxy`]
//! - [`demo`]: the example product used by the CLI
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module and
//!   `fauxbuild_core` enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: Registry lookups that can only fail on a programming error use `.expect("... missing")`.

// `#[contract]` expands to `::fauxbuild::...` paths, including inside this crate.
extern crate self as fauxbuild;

pub mod cli;
pub mod config;
pub mod demo;
pub mod factory;
pub mod proxy;
pub mod reflective;

pub use fauxbuild_core::{
    BuilderError, Contract, ContractDescription, ContractError, ContractShape, FromSlot, NamingConvention, ObjectRef,
    Operation, ReturnShape, Role, SlotId, SlotValue, Value, ValueDesc, ValueType,
};
pub use fauxbuild_derive::contract;

pub use config::FactoryConfig;
pub use factory::{BuilderFactory, create, create_reflective};
pub use proxy::{BuilderProxy, InstanceId, Lifecycle, Reply, SlotStore, TerminalCallback, TerminalPolicy, Untyped};
pub use reflective::{Constructible, Constructor};
