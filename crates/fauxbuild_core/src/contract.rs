//! Contract descriptions and the role tables registered from them.
//!
//! A [`ContractDescription`] lists the operations a synthesized builder must answer to: their names, parameter
//! types, return shapes, and which one is the terminal. Registering it with a [`NamingConvention`] produces a
//! [`Contract`]: the same description plus an explicit `(name, arity) → Role` table that the dispatcher consults on
//! every call. Classification therefore happens once, up front, and registration is where a malformed contract is
//! rejected.
//!
//! ## Notes
//! - Exactly one operation is the terminal, and it is tagged on the description rather than inferred. Any other
//!   zero-argument operation returning the product makes the contract ambiguous.
//! - Operations that classify as neither reader, writer nor terminal are kept as [`Role::Invalid`]; invoking them
//!   fails at call time.
//!
//! ## Examples
//! ```rust
//! use fauxbuild_core::contract::{Contract, ContractDescription, Role, SlotId};
//! use fauxbuild_core::convention::NamingConvention;
//! use fauxbuild_core::value::ValueType;
//!
//! let description = ContractDescription::new("PointBuilder", "Point")
//!     .writer("set_x", ValueType::Int)
//!     .reader("get_x", ValueType::Int)
//!     .terminal("build");
//! let contract = Contract::register(description, NamingConvention::GetterSetter).unwrap();
//! assert_eq!(contract.classify("set_x", 1), Role::Writer(SlotId::new("x")));
//! assert_eq!(contract.classify("build", 0), Role::Terminal);
//! assert_eq!(contract.classify("set_x", 0), Role::Invalid);
//! ```

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::convention::NamingConvention;
use crate::errors::ContractError;
use crate::value::{ValueDesc, ValueType};

/// Key shared by a writer and its reader.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SlotId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SlotId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// What invoking an operation does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Store the single argument under the slot and return the builder.
    Writer(SlotId),
    /// Return the slot's value, its zero, or nothing.
    Reader(SlotId),
    /// Hand the builder to the terminal callback.
    Terminal,
    /// None of the above; invoking it is an error.
    Invalid,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Writer(slot) => write!(f, "writes `{slot}`"),
            Role::Reader(slot) => write!(f, "reads `{slot}`"),
            Role::Terminal => f.write_str("terminal"),
            Role::Invalid => f.write_str("invalid"),
        }
    }
}

/// What an operation returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
    Unit,
    /// The builder itself.
    Chain,
    Value(ValueDesc),
    /// The constructed value, named by its type.
    Product(String),
}

/// One operation of a contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub params: Vec<ValueType>,
    pub returns: ReturnShape,
    /// Role declared at definition time, replacing name-based inference.
    pub role: Option<Role>,
}

impl Operation {
    pub fn new(name: impl Into<String>, params: Vec<ValueType>, returns: ReturnShape) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
            role: None,
        }
    }

    /// A one-argument operation that returns the builder.
    pub fn writer(name: impl Into<String>, ty: ValueType) -> Self {
        Self::new(name, vec![ty], ReturnShape::Chain)
    }

    /// A zero-argument operation returning `ty` (non-nullable if primitive).
    pub fn reader(name: impl Into<String>, ty: ValueType) -> Self {
        Self::new(name, Vec::new(), ReturnShape::Value(ValueDesc::of(ty)))
    }

    /// A zero-argument operation returning `ty` or nothing.
    pub fn nullable_reader(name: impl Into<String>, ty: ValueType) -> Self {
        Self::new(name, Vec::new(), ReturnShape::Value(ValueDesc::nullable(ty)))
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Render `name(int, char) -> Self` for diagnostics and listings.
    pub fn signature(&self) -> String {
        let params = self.params.iter().map(|p| p.name()).collect::<Vec<_>>().join(", ");
        match &self.returns {
            ReturnShape::Unit => format!("{}({})", self.name, params),
            ReturnShape::Chain => format!("{}({}) -> Self", self.name, params),
            ReturnShape::Value(desc) => format!("{}({}) -> {}", self.name, params, desc),
            ReturnShape::Product(product) => format!("{}({}) -> {}", self.name, params, product),
        }
    }
}

/// The shape of a builder contract, as supplied by its author.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDescription {
    name: String,
    product: String,
    terminal: Option<String>,
    operations: Vec<Operation>,
}

impl ContractDescription {
    /// Start describing contract `name` whose terminal produces a `product`.
    pub fn new(name: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product: product.into(),
            terminal: None,
            operations: Vec::new(),
        }
    }

    pub fn operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    pub fn writer(self, name: impl Into<String>, ty: ValueType) -> Self {
        self.operation(Operation::writer(name, ty))
    }

    pub fn reader(self, name: impl Into<String>, ty: ValueType) -> Self {
        self.operation(Operation::reader(name, ty))
    }

    pub fn nullable_reader(self, name: impl Into<String>, ty: ValueType) -> Self {
        self.operation(Operation::nullable_reader(name, ty))
    }

    /// Add the terminal operation `name() -> product` and tag it as the one construction method.
    pub fn terminal(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let op = Operation::new(name.clone(), Vec::new(), ReturnShape::Product(self.product.clone()));
        self.terminal = Some(name);
        self.operation(op)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn terminal_name(&self) -> Option<&str> {
        self.terminal.as_deref()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Check whether `op` is the tagged terminal with the terminal shape.
    pub fn is_terminal(&self, op: &Operation) -> bool {
        self.terminal.as_deref() == Some(op.name.as_str())
            && op.params.is_empty()
            && matches!(op.returns, ReturnShape::Product(_))
    }
}

/// A registered contract: the description plus its role table.
#[derive(Debug, Clone)]
pub struct Contract {
    description: ContractDescription,
    convention: NamingConvention,
    /// Parallel to `description.operations`.
    roles: Vec<Role>,
}

impl Contract {
    /// Classify every operation of `description` under `convention` and validate the result.
    ///
    /// ## Errors
    /// - [`ContractError::MissingTerminal`] if no operation is tagged terminal, or the tagged one has the wrong shape.
    /// - [`ContractError::AmbiguousTerminal`] if another zero-argument operation returns the product.
    /// - [`ContractError::DuplicateOperation`] if a name/arity pair occurs twice.
    /// - [`ContractError::SlotTypeMismatch`] if operations sharing a slot disagree on its type.
    #[tracing::instrument(skip_all, fields(contract = %description.name(), convention = %convention))]
    pub fn register(description: ContractDescription, convention: NamingConvention) -> Result<Self, ContractError> {
        let terminal = description
            .operations
            .iter()
            .find(|op| description.is_terminal(op))
            .ok_or_else(|| ContractError::MissingTerminal {
                contract: description.name.clone(),
            })?;

        let candidates: Vec<String> = description
            .operations
            .iter()
            .filter(|op| !std::ptr::eq(*op, terminal))
            .filter(|op| op.params.is_empty() && matches!(op.returns, ReturnShape::Product(_)))
            .map(|op| format!("`{}`", op.name))
            .collect();
        if !candidates.is_empty() {
            return Err(ContractError::AmbiguousTerminal {
                contract: description.name.clone(),
                terminal: terminal.name.clone(),
                candidates,
            });
        }

        let mut seen = HashSet::new();
        for op in &description.operations {
            if !seen.insert((op.name.as_str(), op.arity())) {
                return Err(ContractError::DuplicateOperation {
                    contract: description.name.clone(),
                    name: op.name.clone(),
                    arity: op.arity(),
                });
            }
        }

        let roles: Vec<Role> = description
            .operations
            .iter()
            .map(|op| convention.classify(&description, op, op.arity()))
            .collect();

        let mut slot_types: BTreeMap<&SlotId, ValueType> = BTreeMap::new();
        for (op, role) in description.operations.iter().zip(&roles) {
            let (slot, found) = match (role, &op.returns) {
                (Role::Writer(slot), _) => match op.params.first() {
                    Some(ty) => (slot, *ty),
                    None => continue,
                },
                (Role::Reader(slot), ReturnShape::Value(desc)) => (slot, desc.ty),
                _ => continue,
            };
            match slot_types.get(slot) {
                Some(expected) if *expected != found => {
                    return Err(ContractError::SlotTypeMismatch {
                        slot: slot.to_string(),
                        operation: op.name.clone(),
                        expected: *expected,
                        found,
                    });
                }
                Some(_) => {}
                None => {
                    slot_types.insert(slot, found);
                }
            }
        }

        let invalid = roles.iter().filter(|r| **r == Role::Invalid).count();
        tracing::debug!(
            operations = description.operations.len(),
            slots = slot_types.len(),
            invalid,
            "registered contract"
        );

        Ok(Self {
            description,
            convention,
            roles,
        })
    }

    pub fn name(&self) -> &str {
        self.description.name()
    }

    pub fn product(&self) -> &str {
        self.description.product()
    }

    pub fn description(&self) -> &ContractDescription {
        &self.description
    }

    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    /// Name of the terminal operation.
    pub fn terminal_name(&self) -> &str {
        // Registration guarantees the tag.
        self.description.terminal_name().unwrap_or_default()
    }

    /// Look up the operation invoked as `name` with `arity` arguments, and its role.
    pub fn resolve(&self, name: &str, arity: usize) -> Option<(&Operation, &Role)> {
        self.description
            .operations
            .iter()
            .zip(&self.roles)
            .find(|(op, _)| op.name == name && op.arity() == arity)
    }

    /// Role of `name` invoked with `arity` arguments; unknown operations are [`Role::Invalid`].
    pub fn classify(&self, name: &str, arity: usize) -> Role {
        self.resolve(name, arity)
            .map(|(_, role)| role.clone())
            .unwrap_or(Role::Invalid)
    }

    /// The full role table, in declaration order.
    pub fn roles(&self) -> impl Iterator<Item = (&Operation, &Role)> {
        self.description.operations.iter().zip(&self.roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> ContractDescription {
        ContractDescription::new("ExampleBuilder", "Example")
            .writer("set_optional1", ValueType::Int)
            .writer("set_optional2", ValueType::Char)
            .reader("get_optional1", ValueType::Int)
            .reader("get_optional2", ValueType::Char)
            .terminal("build")
    }

    #[test]
    fn test_register_builds_role_table() {
        let contract = Contract::register(example(), NamingConvention::GetterSetter).unwrap();
        let roles: Vec<_> = contract.roles().map(|(op, role)| (op.name.as_str(), role.clone())).collect();
        assert_eq!(
            roles,
            vec![
                ("set_optional1", Role::Writer(SlotId::new("optional1"))),
                ("set_optional2", Role::Writer(SlotId::new("optional2"))),
                ("get_optional1", Role::Reader(SlotId::new("optional1"))),
                ("get_optional2", Role::Reader(SlotId::new("optional2"))),
                ("build", Role::Terminal),
            ]
        );
        assert_eq!(contract.terminal_name(), "build");
    }

    #[test]
    fn test_unknown_operation_is_invalid() {
        let contract = Contract::register(example(), NamingConvention::GetterSetter).unwrap();
        assert_eq!(contract.classify("frobnicate", 0), Role::Invalid);
        assert_eq!(contract.classify("set_optional1", 2), Role::Invalid);
    }

    #[test]
    fn test_misnamed_operation_is_kept_as_invalid() {
        let description = example().reader("optional3", ValueType::Int);
        let contract = Contract::register(description, NamingConvention::GetterSetter).unwrap();
        assert_eq!(contract.classify("optional3", 0), Role::Invalid);
    }

    #[test]
    fn test_missing_terminal_is_rejected() {
        let description = ContractDescription::new("C", "P").writer("set_a", ValueType::Int);
        assert_eq!(
            Contract::register(description, NamingConvention::GetterSetter).unwrap_err(),
            ContractError::MissingTerminal { contract: "C".to_string() }
        );
    }

    #[test]
    fn test_second_terminal_candidate_is_ambiguous() {
        let description = example().operation(Operation::new(
            "finish",
            Vec::new(),
            ReturnShape::Product("Example".to_string()),
        ));
        let err = Contract::register(description, NamingConvention::GetterSetter).unwrap_err();
        assert_eq!(
            err,
            ContractError::AmbiguousTerminal {
                contract: "ExampleBuilder".to_string(),
                terminal: "build".to_string(),
                candidates: vec!["`finish`".to_string()],
            }
        );
    }

    #[test]
    fn test_duplicate_operation_is_rejected() {
        let description = example().writer("set_optional1", ValueType::Int);
        assert!(matches!(
            Contract::register(description, NamingConvention::GetterSetter),
            Err(ContractError::DuplicateOperation { arity: 1, .. })
        ));
    }

    #[test]
    fn test_simple_allows_same_name_different_arity() {
        let description = ContractDescription::new("C", "P")
            .writer("a", ValueType::Int)
            .reader("a", ValueType::Int)
            .terminal("build");
        let contract = Contract::register(description, NamingConvention::Simple).unwrap();
        assert_eq!(contract.classify("a", 1), Role::Writer(SlotId::new("a")));
        assert_eq!(contract.classify("a", 0), Role::Reader(SlotId::new("a")));
    }

    #[test]
    fn test_slot_type_mismatch_is_rejected() {
        let description = ContractDescription::new("C", "P")
            .writer("set_a", ValueType::Int)
            .reader("get_a", ValueType::Long)
            .terminal("build");
        assert_eq!(
            Contract::register(description, NamingConvention::GetterSetter).unwrap_err(),
            ContractError::SlotTypeMismatch {
                slot: "a".to_string(),
                operation: "get_a".to_string(),
                expected: ValueType::Int,
                found: ValueType::Long,
            }
        );
    }

    #[test]
    fn test_signature_rendering() {
        assert_eq!(Operation::writer("set_a", ValueType::Int).signature(), "set_a(int) -> Self");
        assert_eq!(Operation::nullable_reader("get_b", ValueType::Text).signature(), "get_b() -> text?");
    }
}
