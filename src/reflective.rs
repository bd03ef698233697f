//! Constructor discovery for reflectively built products.
//!
//! Rust has no runtime constructor lookup, so a product type opts in by listing its builder-taking constructors
//! through [`Constructible`]. Each [`Constructor`] receives the populated builder as its implicit leading parameter,
//! followed by a fixed argument list whose value types it declares. [`discover`] picks the constructor whose
//! declared parameters match the fixed arguments exactly.
//!
//! This trades compile-time checking for run-time discovery: a missing shape is only reported when the builder is
//! created.

use fauxbuild_core::{BuilderError, Value, ValueType};

use crate::proxy::BuilderProxy;

/// Builder-taking constructor body.
pub type ConstructorFn<T> = fn(&BuilderProxy<T>, &[Value]) -> Result<T, BuilderError>;

/// One constructor of a [`Constructible`] type.
pub struct Constructor<T> {
    name: &'static str,
    params: Vec<ValueType>,
    invoke: ConstructorFn<T>,
}

impl<T> Constructor<T> {
    /// `params` lists the fixed arguments after the builder.
    pub fn new(name: &'static str, params: &[ValueType], invoke: ConstructorFn<T>) -> Self {
        Self {
            name,
            params: params.to_vec(),
            invoke,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &[ValueType] {
        &self.params
    }

    /// Check whether `args` match the declared parameters one for one.
    pub fn accepts(&self, args: &[Value]) -> bool {
        self.params.len() == args.len() && self.params.iter().zip(args).all(|(p, a)| a.value_type() == *p)
    }

    pub fn invoke(&self, builder: &BuilderProxy<T>, args: &[Value]) -> Result<T, BuilderError> {
        (self.invoke)(builder, args)
    }
}

/// A product type whose constructors can be discovered at run time.
pub trait Constructible: Sized + 'static {
    fn constructors() -> Vec<Constructor<Self>>;
}

/// Find the constructor of `T` accepting the builder followed by `args`.
///
/// ## Errors
/// - [`BuilderError::NoMatchingConstructor`] naming `T` and the requested signature.
pub fn discover<T: Constructible>(args: &[Value]) -> Result<Constructor<T>, BuilderError> {
    T::constructors()
        .into_iter()
        .find(|c| c.accepts(args))
        .ok_or_else(|| BuilderError::NoMatchingConstructor {
            target: short_type_name::<T>().to_string(),
            signature: std::iter::once("builder")
                .chain(args.iter().map(|a| a.value_type().name()))
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
