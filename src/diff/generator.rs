use super::algorithms::{DiffAlgorithm, DiffAlgorithmType, DiffResult};

/// Default number of unchanged lines kept around each change
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// High-level diff generator that can use different algorithms
pub struct DiffGenerator {
    algorithm: Box<dyn DiffAlgorithm>,
    context_lines: usize,
}

impl DiffGenerator {
    /// Create a new diff generator with the specified algorithm
    pub fn new(algorithm_type: DiffAlgorithmType) -> Self {
        Self {
            algorithm: algorithm_type.create(),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }

    /// Generate a diff between old and new content
    pub fn generate(&self, old: &str, new: &str) -> DiffResult {
        self.algorithm.diff(old, new, self.context_lines)
    }

    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    /// Get the current algorithm name
    pub fn algorithm_name(&self) -> &str {
        self.algorithm.name()
    }
}

impl Default for DiffGenerator {
    fn default() -> Self {
        Self::new(DiffAlgorithmType::default())
    }
}

/// Builder for configuring diff generation
pub struct DiffConfig {
    algorithm: DiffAlgorithmType,
    context_lines: usize,
}

impl DiffConfig {
    pub fn new() -> Self {
        Self {
            algorithm: DiffAlgorithmType::default(),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }

    pub fn algorithm(mut self, algorithm: DiffAlgorithmType) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn build(self) -> DiffGenerator {
        DiffGenerator {
            algorithm: self.algorithm.create(),
            context_lines: self.context_lines,
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self::new()
    }
}
