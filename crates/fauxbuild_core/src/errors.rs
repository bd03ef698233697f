//! Error taxonomy shared by contract registration, dispatch and the factory.
//!
//! [`ContractError`] is raised while a contract description is turned into a role table. [`BuilderError`] is raised
//! while a synthesized builder is being used; callers that bring their own terminal error type receive it through
//! `From<BuilderError>`.

use miette::Diagnostic;
use thiserror::Error;

use crate::value::ValueType;

/// A contract description that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ContractError {
    #[error("contract `{contract}` has no terminal operation")]
    #[diagnostic(
        code(fauxbuild::contract::missing_terminal),
        help("tag exactly one zero-argument operation returning the product as terminal")
    )]
    MissingTerminal { contract: String },

    #[error(
        "contract `{contract}` has more than one terminal candidate: `{terminal}` and {}",
        .candidates.join(", ")
    )]
    #[diagnostic(
        code(fauxbuild::contract::ambiguous_terminal),
        help("only the tagged terminal may take no arguments and return the product")
    )]
    AmbiguousTerminal {
        contract: String,
        terminal: String,
        candidates: Vec<String>,
    },

    #[error("operation `{name}` with {arity} argument(s) is declared twice in contract `{contract}`")]
    #[diagnostic(code(fauxbuild::contract::duplicate_operation))]
    DuplicateOperation {
        contract: String,
        name: String,
        arity: usize,
    },

    #[error("slot `{slot}` holds `{expected}` but operation `{operation}` uses `{found}`")]
    #[diagnostic(
        code(fauxbuild::contract::slot_type_mismatch),
        help("a writer and its reader must agree on the value type; the store never converts")
    )]
    SlotTypeMismatch {
        slot: String,
        operation: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("unknown naming convention `{0}`")]
    #[diagnostic(
        code(fauxbuild::contract::unknown_convention),
        help("expected one of: simple, simple-setter, getter-setter")
    )]
    UnknownConvention(String),
}

/// A failed operation on a synthesized builder.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum BuilderError {
    #[error("method '{operation}' is not a reader or a writer of contract `{contract}`")]
    #[diagnostic(code(fauxbuild::dispatch::unclassified))]
    UnclassifiedOperation { contract: String, operation: String },

    #[error("operation `{operation}` expects `{expected}` but received `{found}`")]
    #[diagnostic(code(fauxbuild::dispatch::argument_type))]
    ArgumentType {
        operation: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("builder for contract `{contract}` was already consumed; `{operation}` is no longer allowed")]
    #[diagnostic(
        code(fauxbuild::dispatch::consumed),
        help("create a new builder, or use the reusable terminal policy")
    )]
    Consumed { contract: String, operation: String },

    #[error("no constructor of `{target}` accepts ({signature})")]
    #[diagnostic(code(fauxbuild::reflective::no_constructor))]
    NoMatchingConstructor { target: String, signature: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Contract(#[from] ContractError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclassified_names_the_operation() {
        let err = BuilderError::UnclassifiedOperation {
            contract: "ExampleBuilder".to_string(),
            operation: "frobnicate".to_string(),
        };
        assert!(err.to_string().contains("'frobnicate'"));
    }

    #[test]
    fn test_ambiguous_terminal_lists_candidates() {
        let err = ContractError::AmbiguousTerminal {
            contract: "C".to_string(),
            terminal: "build".to_string(),
            candidates: vec!["`make`".to_string(), "`finish`".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "contract `C` has more than one terminal candidate: `build` and `make`, `finish`"
        );
    }

    #[test]
    fn test_contract_error_is_transparent() {
        let inner = ContractError::UnknownConvention("camel".to_string());
        let err = BuilderError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }
}
