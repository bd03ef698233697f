//! Factory configuration

use fauxbuild_core::NamingConvention;

use crate::proxy::TerminalPolicy;

/// How a [`crate::BuilderFactory`] registers contracts and what its builders allow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Convention used to classify the operations of registered contracts
    pub convention: NamingConvention,
    /// What a second terminal call does
    pub terminal_policy: TerminalPolicy,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        // Getter/setter naming, builders consumed by their first successful build
        Self {
            convention: NamingConvention::GetterSetter,
            terminal_policy: TerminalPolicy::SingleUse,
        }
    }
}

impl FactoryConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the naming convention
    pub fn with_convention(mut self, convention: NamingConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Set the terminal policy
    pub fn with_terminal_policy(mut self, policy: TerminalPolicy) -> Self {
        self.terminal_policy = policy;
        self
    }
}
