//! The synthesized builder and its dispatcher.
//!
//! [`BuilderProxy`] stands in for a hand-written builder of any registered [`Contract`]. Every operation invoked on
//! it goes through [`BuilderProxy::dispatch`], which looks the operation up in the contract's role table and:
//! - **writer**: type-checks the single argument, stores it under the slot, answers [`Reply::Chained`];
//! - **reader**: answers the stored value, the primitive zero, or nothing;
//! - **terminal**: hands the live builder to the terminal callback and answers its result;
//! - **invalid**: fails with [`BuilderError::UnclassifiedOperation`] naming the operation.
//!
//! ## Notes
//!
//! - Terminal callback errors come back exactly as the callback returned them. The dispatcher's own errors reach the
//!   caller through `E: From<BuilderError>`.
//! - Identity is per instance: two proxies are equal only if they are the same builder, whatever their slots hold.
//! - A proxy is `!Send`: it shares its contract and callback through `Rc`.
//! - The third type parameter names the contract a proxy was made from. Proxies built from a runtime description are
//!   [`Untyped`]; `#[contract]` traits are implemented only for proxies marked with their own generated contract.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use fauxbuild_core::defaults;
use fauxbuild_core::{BuilderError, Contract, FromSlot, Operation, ReturnShape, Role, SlotId, Value};

/// Function invoked by the terminal operation with the populated builder.
pub type TerminalCallback<V, E, C = Untyped> = Rc<dyn Fn(&BuilderProxy<V, E, C>) -> Result<V, E>>;

/// Contract marker of builders synthesized from a runtime [`ContractDescription`](fauxbuild_core::ContractDescription).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Untyped;

/// Process-unique identity of one synthesized builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// What happens when the terminal operation is invoked more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalPolicy {
    /// A successful terminal call consumes the builder; later writes and builds fail.
    #[default]
    SingleUse,
    /// Every terminal call runs the callback again on the current slots.
    Reusable,
}

/// Where a builder is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Fresh,
    Populated,
    Consumed,
}

/// Last written value of every slot, ordered by slot identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotStore {
    slots: BTreeMap<SlotId, Value>,
}

impl SlotStore {
    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.slots.get(slot)
    }

    /// Store `value`, returning what the slot held before.
    pub fn insert(&mut self, slot: SlotId, value: Value) -> Option<Value> {
        self.slots.insert(slot, value)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, &Value)> {
        self.slots.iter()
    }
}

impl fmt::Display for SlotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (slot, value)) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}={value}")?;
        }
        f.write_str("}")
    }
}

/// Answer to a dispatched operation.
#[derive(Debug)]
pub enum Reply<V> {
    /// A writer stored its argument; the builder is the result.
    Chained,
    /// A reader's answer.
    Value(Option<Value>),
    /// The terminal callback's product.
    Built(V),
}

impl<V> Reply<V> {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Reply::Value(value) => value,
            _ => None,
        }
    }

    pub fn into_built(self) -> Option<V> {
        match self {
            Reply::Built(built) => Some(built),
            _ => None,
        }
    }
}

/// A builder synthesized from a registered contract.
pub struct BuilderProxy<V, E = BuilderError, C = Untyped> {
    id: InstanceId,
    contract: Rc<Contract>,
    slots: SlotStore,
    callback: TerminalCallback<V, E, C>,
    policy: TerminalPolicy,
    lifecycle: Lifecycle,
    marker: PhantomData<fn() -> C>,
}

impl<V, E> BuilderProxy<V, E> {
    /// Bind a fresh builder to `contract` and `callback`.
    pub fn new(contract: Rc<Contract>, policy: TerminalPolicy, callback: TerminalCallback<V, E>) -> Self {
        Self::bind(contract, policy, callback)
    }
}

impl<V, E, C> BuilderProxy<V, E, C> {
    /// Bind a fresh builder marked with `C`; `contract` must be the one `C` describes.
    pub(crate) fn bind(contract: Rc<Contract>, policy: TerminalPolicy, callback: TerminalCallback<V, E, C>) -> Self {
        Self {
            id: InstanceId::next(),
            contract,
            slots: SlotStore::default(),
            callback,
            policy,
            lifecycle: Lifecycle::Fresh,
            marker: PhantomData,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn policy(&self) -> TerminalPolicy {
        self.policy
    }

    fn unclassified(&self, operation: &str) -> BuilderError {
        BuilderError::UnclassifiedOperation {
            contract: self.contract.name().to_string(),
            operation: operation.to_string(),
        }
    }

    fn ensure_live(&self, operation: &str) -> Result<(), BuilderError> {
        if self.lifecycle == Lifecycle::Consumed && self.policy == TerminalPolicy::SingleUse {
            return Err(BuilderError::Consumed {
                contract: self.contract.name().to_string(),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// Answer a reader: the stored value, else the declared type's zero, else nothing.
    fn read_slot(&self, slot: &SlotId, op: &Operation) -> Option<Value> {
        if let Some(value) = self.slots.get(slot.as_str()) {
            return Some(value.clone());
        }
        match &op.returns {
            ReturnShape::Value(desc) => defaults::default_for(*desc),
            _ => None,
        }
    }
}

impl<V, E: From<BuilderError>, C> BuilderProxy<V, E, C> {
    /// Route one invocation of `operation` with `args` through the role table.
    ///
    /// ## Errors
    /// - [`BuilderError::UnclassifiedOperation`] if `operation` with this many arguments is not a reader, writer or
    ///   the terminal of the contract.
    /// - [`BuilderError::ArgumentType`] if a writer receives a value of another type than it declares.
    /// - [`BuilderError::Consumed`] for writes and builds after a single-use builder was built.
    /// - The terminal callback's own error, unchanged.
    pub fn dispatch(&mut self, operation: &str, args: Vec<Value>) -> Result<Reply<V>, E> {
        let contract = Rc::clone(&self.contract);
        let Some((op, role)) = contract.resolve(operation, args.len()) else {
            tracing::debug!(contract = %contract.name(), operation, arity = args.len(), "unknown operation");
            return Err(self.unclassified(operation).into());
        };
        tracing::trace!(contract = %contract.name(), operation, ?role, "dispatch");

        match role {
            Role::Writer(slot) => {
                self.ensure_live(operation)?;
                let (Some(expected), Some(value)) = (op.params.first().copied(), args.into_iter().next()) else {
                    return Err(self.unclassified(operation).into());
                };
                if value.value_type() != expected {
                    return Err(BuilderError::ArgumentType {
                        operation: operation.to_string(),
                        expected,
                        found: value.value_type(),
                    }
                    .into());
                }
                self.slots.insert(slot.clone(), value);
                if self.lifecycle == Lifecycle::Fresh {
                    self.lifecycle = Lifecycle::Populated;
                }
                Ok(Reply::Chained)
            }
            Role::Reader(slot) => Ok(Reply::Value(self.read_slot(slot, op))),
            Role::Terminal => {
                self.ensure_live(operation)?;
                let callback = Rc::clone(&self.callback);
                let built = (*callback)(&*self)?;
                if self.policy == TerminalPolicy::SingleUse {
                    self.lifecycle = Lifecycle::Consumed;
                }
                tracing::debug!(contract = %contract.name(), id = self.id.get(), "built");
                Ok(Reply::Built(built))
            }
            Role::Invalid => Err(self.unclassified(operation).into()),
        }
    }

    /// Invoke writer `operation` with `value`, returning this same builder.
    pub fn write(&mut self, operation: &str, value: impl Into<Value>) -> Result<&mut Self, E> {
        self.dispatch(operation, vec![value.into()])?;
        Ok(self)
    }

    /// Invoke reader `operation`.
    ///
    /// Reading never mutates, so it is available through a shared reference (inside the terminal callback, for
    /// instance); it resolves exactly like [`BuilderProxy::dispatch`] does.
    pub fn read(&self, operation: &str) -> Result<Option<Value>, E> {
        match self.contract.resolve(operation, 0) {
            Some((op, Role::Reader(slot))) => Ok(self.read_slot(slot, op)),
            _ => Err(self.unclassified(operation).into()),
        }
    }

    /// Invoke reader `operation` and convert its answer to `T`.
    pub fn get<T: FromSlot>(&self, operation: &str) -> Result<T, E> {
        Ok(T::from_slot(self.read(operation)?))
    }

    /// Invoke the terminal operation.
    pub fn build(&mut self) -> Result<V, E> {
        let contract = Rc::clone(&self.contract);
        let terminal = contract.terminal_name();
        match self.dispatch(terminal, Vec::new())? {
            Reply::Built(built) => Ok(built),
            _ => Err(self.unclassified(terminal).into()),
        }
    }
}

impl<V, E, C> PartialEq for BuilderProxy<V, E, C> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<V, E, C> Eq for BuilderProxy<V, E, C> {}

impl<V, E, C> Hash for BuilderProxy<V, E, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<V, E, C> fmt::Display for BuilderProxy<V, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.slots, f)
    }
}

impl<V, E, C> fmt::Debug for BuilderProxy<V, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderProxy")
            .field("id", &self.id.get())
            .field("contract", &self.contract.name())
            .field("lifecycle", &self.lifecycle)
            .field("slots", &format_args!("{}", self.slots))
            .finish()
    }
}
