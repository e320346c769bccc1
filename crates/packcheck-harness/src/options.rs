use packcheck_core::compare::CompareOptions;

/// Runtime configuration of a stress harness
#[derive(Debug, Clone, Default)]
pub struct HarnessOptions {
    /// Comparator configuration used for every archive comparison
    pub compare: CompareOptions,
    /// Compare clones with their entropy intact instead of stripping it first
    pub strict_clone: bool,
}

impl HarnessOptions {
    pub fn with_compare(mut self, compare: CompareOptions) -> Self {
        self.compare = compare;
        self
    }

    pub fn strict(mut self, strict_clone: bool) -> Self {
        self.strict_clone = strict_clone;
        self
    }
}
