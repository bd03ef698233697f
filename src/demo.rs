//! Demonstration product and its three builders.
//!
//! [`Example`] has one mandatory field fixed at construction and two optional fields. It can be built:
//! - by hand, through [`ManualBuilder`] (the baseline the synthesized builders are measured against);
//! - dynamically, through [`Example::builder`]: a simple-convention contract described at run time, finished by the
//!   discovered [`Constructible`] constructor;
//! - through the typed [`ExampleBuilder`] trait, synthesized by `#[contract]`.

use std::fmt;

use fauxbuild_core::{BuilderError, ContractDescription, ContractError, NamingConvention, Value, ValueType};

use crate::contract;
use crate::factory::BuilderFactory;
use crate::proxy::BuilderProxy;
use crate::reflective::{Constructible, Constructor};

/// Name of the dynamic contract's terminal.
pub const TERMINAL: &str = "build";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    mandatory: String,
    optional1: i32,
    optional2: char,
}

impl Example {
    pub fn new(mandatory: impl Into<String>, optional1: i32, optional2: char) -> Self {
        Self {
            mandatory: mandatory.into(),
            optional1,
            optional2,
        }
    }

    pub fn mandatory(&self) -> &str {
        &self.mandatory
    }

    pub fn optional1(&self) -> i32 {
        self.optional1
    }

    pub fn optional2(&self) -> char {
        self.optional2
    }

    /// Synthesized builder over [`example_contract`], with `mandatory` fixed.
    ///
    /// ## Errors
    /// - [`BuilderError::NoMatchingConstructor`] if [`Example`] stops exposing a builder-and-text constructor.
    pub fn builder(mandatory: &str) -> Result<BuilderProxy<Example>, BuilderError> {
        BuilderFactory::new(NamingConvention::Simple).create_reflective(example_contract(), vec![Value::from(mandatory)])
    }

    /// Synthesized builder implementing [`ExampleBuilder`], with `mandatory` fixed.
    pub fn typed_builder(
        mandatory: &str,
    ) -> Result<BuilderProxy<Example, BuilderError, ExampleBuilderContract>, ContractError> {
        let mandatory = mandatory.to_string();
        ExampleBuilderContract::create(move |b| Ok(Example::new(mandatory.clone(), b.optional1(), b.optional2())))
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Example[optional1={}, optional2={}, mandatory={}]",
            self.optional1, self.optional2, self.mandatory
        )
    }
}

impl Constructible for Example {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("with_mandatory", &[ValueType::Text], |builder, args| {
            let mandatory = args.first().and_then(Value::as_text).unwrap_or_default();
            Ok(Example::new(mandatory, builder.get("optional1")?, builder.get("optional2")?))
        })]
    }
}

/// Writers and readers share a name under the simple convention; arity tells them apart.
pub fn example_contract() -> ContractDescription {
    ContractDescription::new("ExampleBuilder", "Example")
        .writer("optional1", ValueType::Int)
        .writer("optional2", ValueType::Char)
        .reader("optional1", ValueType::Int)
        .reader("optional2", ValueType::Char)
        .terminal(TERMINAL)
}

#[contract(convention = "simple-setter")]
pub trait ExampleBuilder {
    fn set_optional1(&mut self, value: i32) -> Result<&mut Self, BuilderError>;
    fn optional1(&self) -> i32;
    fn set_optional2(&mut self, value: char) -> Result<&mut Self, BuilderError>;
    fn optional2(&self) -> char;
    #[terminal]
    fn build(&mut self) -> Result<Example, BuilderError>;
}

/// Hand-written builder for [`Example`].
#[derive(Debug, Clone, Default)]
pub struct ManualBuilder {
    mandatory: String,
    optional1: i32,
    optional2: char,
}

impl ManualBuilder {
    pub fn new(mandatory: impl Into<String>) -> Self {
        Self {
            mandatory: mandatory.into(),
            ..Self::default()
        }
    }

    pub fn optional1(&mut self, value: i32) -> &mut Self {
        self.optional1 = value;
        self
    }

    pub fn optional2(&mut self, value: char) -> &mut Self {
        self.optional2 = value;
        self
    }

    pub fn build(&self) -> Example {
        Example::new(self.mandatory.clone(), self.optional1, self.optional2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_builder_defaults() {
        let example = ManualBuilder::new("X").build();
        assert_eq!(example, Example::new("X", 0, '\0'));
    }

    #[test]
    fn test_dynamic_builder_matches_manual() {
        let mut builder = Example::builder("X").unwrap();
        builder.write("optional1", 35).unwrap().write("optional2", 'A').unwrap();
        let manual = ManualBuilder::new("X").optional1(35).optional2('A').build();
        assert_eq!(builder.build().unwrap(), manual);
    }

    #[test]
    fn test_typed_builder_matches_manual() {
        let mut builder = Example::typed_builder("X").unwrap();
        builder.set_optional1(35).unwrap().set_optional2('A').unwrap();
        assert_eq!(builder.optional1(), 35);
        let built = ExampleBuilder::build(&mut builder).unwrap();
        assert_eq!(built, ManualBuilder::new("X").optional1(35).optional2('A').build());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Example::new("X", 35, 'A').to_string(),
            "Example[optional1=35, optional2=A, mandatory=X]"
        );
    }
}
