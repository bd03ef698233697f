//! Construction entry points for synthesized builders.
//!
//! - [`create`]: register a description under a convention and bind a terminal callback.
//! - [`BuilderFactory`]: the same, driven by a [`FactoryConfig`], with a reusable registration step.
//! - [`BuilderFactory::create_reflective`]: derive the callback from a discovered constructor of the product.

use std::rc::Rc;

use fauxbuild_core::{BuilderError, Contract, ContractDescription, ContractError, ContractShape, NamingConvention, Value};

use crate::config::FactoryConfig;
use crate::proxy::BuilderProxy;
use crate::reflective::{self, Constructible};

/// Synthesize a builder for `description`, classified under `convention`, finished by `callback`.
///
/// ## Examples
/// ```rust
/// use fauxbuild::{create, BuilderError, ContractDescription, NamingConvention, ValueType};
///
/// let description = ContractDescription::new("GreetingBuilder", "String")
///     .writer("set_name", ValueType::Text)
///     .nullable_reader("get_name", ValueType::Text)
///     .terminal("build");
/// let mut builder = create(description, NamingConvention::GetterSetter, |b| {
///     let name: Option<String> = b.get("get_name")?;
///     Ok::<_, BuilderError>(format!("hello {}", name.unwrap_or_default()))
/// })
/// .unwrap();
/// builder.write("set_name", "world").unwrap();
/// assert_eq!(builder.build().unwrap(), "hello world");
/// ```
pub fn create<V, E, F>(
    description: ContractDescription,
    convention: NamingConvention,
    callback: F,
) -> Result<BuilderProxy<V, E>, ContractError>
where
    F: Fn(&BuilderProxy<V, E>) -> Result<V, E> + 'static,
{
    BuilderFactory::new(convention).create(description, callback)
}

/// Synthesize a builder whose terminal call runs the constructor of `T` matching `fixed_args`.
pub fn create_reflective<T: Constructible>(
    description: ContractDescription,
    fixed_args: Vec<Value>,
) -> Result<BuilderProxy<T>, BuilderError> {
    BuilderFactory::default().create_reflective(description, fixed_args)
}

/// Registers contracts and synthesizes builders for them.
#[derive(Debug, Clone, Default)]
pub struct BuilderFactory {
    config: FactoryConfig,
}

impl BuilderFactory {
    pub fn new(convention: NamingConvention) -> Self {
        Self::with_config(FactoryConfig::default().with_convention(convention))
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Register `description` under the configured convention.
    ///
    /// The returned contract can back any number of builders through [`BuilderFactory::make`].
    pub fn register(&self, description: ContractDescription) -> Result<Rc<Contract>, ContractError> {
        Ok(Rc::new(Contract::register(description, self.config.convention)?))
    }

    /// Register `description` and bind a fresh builder to it.
    pub fn create<V, E, F>(&self, description: ContractDescription, callback: F) -> Result<BuilderProxy<V, E>, ContractError>
    where
        F: Fn(&BuilderProxy<V, E>) -> Result<V, E> + 'static,
    {
        let contract = self.register(description)?;
        tracing::debug!(contract = %contract.name(), convention = %contract.convention(), "creating builder");
        Ok(self.make(&contract, callback))
    }

    /// Bind a fresh builder to an already registered contract.
    pub fn make<V, E, F>(&self, contract: &Rc<Contract>, callback: F) -> BuilderProxy<V, E>
    where
        F: Fn(&BuilderProxy<V, E>) -> Result<V, E> + 'static,
    {
        BuilderProxy::new(Rc::clone(contract), self.config.terminal_policy, Rc::new(callback))
    }

    /// Register the contract generated for a `#[contract]` trait and bind a fresh builder to it.
    ///
    /// The trait's own convention applies, whatever this factory is configured with. The builder is marked with `C`,
    /// which is what the trait is implemented for: a builder of another contract with the same product never gains
    /// the trait's methods.
    ///
    /// ```compile_fail,E0599
    /// use fauxbuild::{contract, create, BuilderError, ContractDescription, NamingConvention, ValueType};
    ///
    /// #[contract]
    /// trait PointBuilder {
    ///     fn set_x(&mut self, x: i32) -> Result<&mut Self, BuilderError>;
    ///     fn get_x(&self) -> i32;
    ///     #[terminal]
    ///     fn build(&mut self) -> Result<i32, BuilderError>;
    /// }
    ///
    /// let other = ContractDescription::new("Other", "i32").writer("x", ValueType::Int).terminal("build");
    /// let builder = create(other, NamingConvention::Simple, |_| Ok::<i32, BuilderError>(0)).unwrap();
    /// builder.get_x();
    /// ```
    pub fn make_typed<C, V, E, F>(&self, callback: F) -> Result<BuilderProxy<V, E, C>, ContractError>
    where
        C: ContractShape,
        F: Fn(&BuilderProxy<V, E, C>) -> Result<V, E> + 'static,
    {
        let contract = Rc::new(Contract::register(C::description(), C::CONVENTION)?);
        tracing::debug!(contract = %contract.name(), convention = %contract.convention(), "creating typed builder");
        Ok(BuilderProxy::bind(contract, self.config.terminal_policy, Rc::new(callback)))
    }

    /// Register `description` and bind a builder whose terminal call constructs a `T`.
    ///
    /// The constructor is discovered now, among [`Constructible::constructors`], by matching `fixed_args`; it is
    /// invoked on build with the builder followed by `fixed_args`.
    ///
    /// ## Errors
    /// - [`BuilderError::Contract`] if the description does not register.
    /// - [`BuilderError::NoMatchingConstructor`] if no constructor of `T` takes the fixed arguments.
    pub fn create_reflective<T: Constructible>(
        &self,
        description: ContractDescription,
        fixed_args: Vec<Value>,
    ) -> Result<BuilderProxy<T>, BuilderError> {
        let contract = self.register(description)?;
        let constructor = reflective::discover::<T>(&fixed_args)?;
        tracing::debug!(
            contract = %contract.name(),
            constructor = constructor.name(),
            "creating reflective builder"
        );
        Ok(self.make(&contract, move |builder: &BuilderProxy<T>| {
            constructor.invoke(builder, &fixed_args)
        }))
    }
}
