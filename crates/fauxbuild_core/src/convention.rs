//! Naming conventions: the strategies that turn operation names into slot roles.
//!
//! A convention decides, from an operation's name and shape, whether it writes a slot, reads a slot, or neither, and
//! derives the slot identity a writer and its reader share. Conventions are vocabulary: callers refer to them by
//! [`NamingConvention`] and look spellings up in [`CONVENTIONS`].
//!
//! ## Notes
//! - Prefixes are snake_case (`set_`, `get_`); the slot identity is whatever follows the prefix.
//! - The terminal operation is never inferred from a name. It is tagged on the contract description.
//! - Lookup via [`from_str`] accepts the canonical spelling and the listed aliases, case-sensitively.
//!
//! ## Examples
//! ```rust
//! use fauxbuild_core::convention::{self, NamingConvention};
//!
//! assert_eq!(convention::from_str("getter-setter"), Some(NamingConvention::GetterSetter));
//! assert_eq!(NamingConvention::GetterSetter.writer_slot("set_color"), Some("color"));
//! assert_eq!(NamingConvention::GetterSetter.reader_slot("get_color"), Some("color"));
//! assert_eq!(NamingConvention::Simple.writer_slot("color"), Some("color"));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::contract::{ContractDescription, Operation, ReturnShape, Role, SlotId};
use crate::errors::ContractError;

/// Prefix of writer operations under the setter conventions.
pub const WRITER_PREFIX: &str = "set_";

/// Prefix of reader operations under the getter-setter convention.
pub const READER_PREFIX: &str = "get_";

/// Stable identifier for a naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamingConvention {
    /// Same name for reading and writing; arity tells them apart.
    Simple,
    /// `set_x(v)` writes, `x()` reads.
    SimpleSetter,
    /// `set_x(v)` writes, `get_x()` reads.
    #[default]
    GetterSetter,
}

/// Metadata for a naming convention.
#[derive(Debug, Clone, Copy)]
pub struct ConventionInfo {
    pub id: NamingConvention,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    /// Prefix a writer name must carry (empty: none).
    pub writer_prefix: &'static str,
    /// Prefix a reader name must carry (empty: none).
    pub reader_prefix: &'static str,
}

/// Registry of all naming conventions.
pub const CONVENTIONS: &[ConventionInfo] = &[
    ConventionInfo {
        id: NamingConvention::Simple,
        canonical: "simple",
        aliases: &["SIMPLE"],
        description: "Reads and writes share one name; no argument reads, one argument writes.",
        writer_prefix: "",
        reader_prefix: "",
    },
    ConventionInfo {
        id: NamingConvention::SimpleSetter,
        canonical: "simple-setter",
        aliases: &["simple_setter", "SIMPLE_SETTER"],
        description: "Writers are `set_`-prefixed and chain; readers use the bare slot name.",
        writer_prefix: WRITER_PREFIX,
        reader_prefix: "",
    },
    ConventionInfo {
        id: NamingConvention::GetterSetter,
        canonical: "getter-setter",
        aliases: &["getter_setter", "GETTER_SETTER"],
        description: "Writers are `set_`-prefixed and chain; readers are `get_`-prefixed.",
        writer_prefix: WRITER_PREFIX,
        reader_prefix: READER_PREFIX,
    },
];

/// Resolve a spelling to a [`NamingConvention`].
///
/// ## Returns
/// - `Some(NamingConvention)` if `name` is a canonical spelling or an alias.
/// - `None` otherwise.
pub fn from_str(name: &str) -> Option<NamingConvention> {
    CONVENTIONS
        .iter()
        .find(|c| c.canonical == name || c.aliases.iter().any(|alias| *alias == name))
        .map(|c| c.id)
}

/// Return the canonical spelling for a convention.
pub fn as_str(id: NamingConvention) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a convention.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: NamingConvention) -> &'static ConventionInfo {
    CONVENTIONS
        .iter()
        .find(|c| c.id == id)
        .expect("convention info missing")
}

/// Strip `prefix` from `name`, requiring a non-empty remainder.
fn strip<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

impl NamingConvention {
    pub fn info(self) -> &'static ConventionInfo {
        info_for(self)
    }

    /// Derive the slot a writer named `name` stores into, if the name follows this convention.
    pub fn writer_slot(self, name: &str) -> Option<&str> {
        strip(name, self.info().writer_prefix)
    }

    /// Derive the slot a reader named `name` reads from, if the name follows this convention.
    ///
    /// Under [`NamingConvention::SimpleSetter`] a bare reader name may not itself look like a writer.
    pub fn reader_slot(self, name: &str) -> Option<&str> {
        let info = self.info();
        if info.reader_prefix.is_empty() && !info.writer_prefix.is_empty() && name.starts_with(info.writer_prefix) {
            return None;
        }
        strip(name, info.reader_prefix)
    }

    /// Check whether `op`, invoked with `arity` arguments, is a writer under this convention.
    pub fn is_writer(self, op: &Operation, arity: usize) -> bool {
        has_writer_shape(op, arity) && self.writer_slot(&op.name).is_some()
    }

    /// Check whether `op`, invoked with `arity` arguments, is a reader under this convention.
    pub fn is_reader(self, op: &Operation, arity: usize) -> bool {
        has_reader_shape(op, arity) && self.reader_slot(&op.name).is_some()
    }

    /// Classify `op` of `description` when invoked with `arity` arguments.
    ///
    /// ## Notes
    /// - The tagged terminal wins over everything else.
    /// - An explicit role on the operation replaces name-based inference, but the shape still has to fit: an explicit
    ///   writer that does not take one argument and chain is [`Role::Invalid`].
    pub fn classify(self, description: &ContractDescription, op: &Operation, arity: usize) -> Role {
        if arity == 0 && description.is_terminal(op) {
            return Role::Terminal;
        }
        match &op.role {
            Some(Role::Writer(slot)) if has_writer_shape(op, arity) => Role::Writer(slot.clone()),
            Some(Role::Reader(slot)) if has_reader_shape(op, arity) => Role::Reader(slot.clone()),
            Some(_) => Role::Invalid,
            None => {
                if let Some(slot) = self.writer_slot(&op.name).filter(|_| has_writer_shape(op, arity)) {
                    Role::Writer(SlotId::new(slot))
                } else if let Some(slot) = self.reader_slot(&op.name).filter(|_| has_reader_shape(op, arity)) {
                    Role::Reader(SlotId::new(slot))
                } else {
                    Role::Invalid
                }
            }
        }
    }
}

fn has_writer_shape(op: &Operation, arity: usize) -> bool {
    arity == 1 && op.params.len() == 1 && op.returns == ReturnShape::Chain
}

fn has_reader_shape(op: &Operation, arity: usize) -> bool {
    arity == 0 && op.params.is_empty() && matches!(op.returns, ReturnShape::Value(_))
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(as_str(*self))
    }
}

impl FromStr for NamingConvention {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_str(s).ok_or_else(|| ContractError::UnknownConvention(s.to_string()))
    }
}
