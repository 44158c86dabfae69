//! Factory configuration.

use exprtree_core::NameMatching;

/// Options that govern named lookup and argument quoting.
///
/// # Example
///
/// ```ignore
/// let options = FactoryOptions::default()
///     .with_name_matching(NameMatching::Exact)
///     .with_non_public(false);
/// let factory = ExprFactory::with_options(&registry, options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryOptions {
    /// How member names are compared during named lookup.
    pub name_matching: NameMatching,
    /// Whether non-public members take part in named lookup.
    ///
    /// Public candidates are still preferred when both are compatible.
    pub include_non_public: bool,
    /// Whether an expression-typed parameter may quote a node argument.
    pub quote_expression_arguments: bool,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            name_matching: NameMatching::IgnoreCase,
            include_non_public: true,
            quote_expression_arguments: true,
        }
    }
}

impl FactoryOptions {
    pub fn with_name_matching(mut self, matching: NameMatching) -> Self {
        self.name_matching = matching;
        self
    }

    pub fn with_non_public(mut self, include: bool) -> Self {
        self.include_non_public = include;
        self
    }

    pub fn with_quoting(mut self, enabled: bool) -> Self {
        self.quote_expression_arguments = enabled;
        self
    }
}
