//! Solver configuration.

/// Options for layout resolution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Upper bound on solver iterations per resolve
    pub max_iterations: usize,
    /// Geometry changes smaller than this (in pixels) count as converged
    pub epsilon: f32,
    /// Log a warning when a child overflows a fixed-size parent
    pub warn_on_overflow: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            epsilon: 0.01,
            warn_on_overflow: true,
        }
    }
}

impl LayoutOptions {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_overflow_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_overflow = enabled;
        self
    }

    /// Iteration cap actually used; at least one pass always runs.
    pub(crate) fn iteration_cap(&self) -> usize {
        self.max_iterations.max(1)
    }

    /// Tolerance actually used; non-finite or negative values fall back to the default.
    pub(crate) fn tolerance(&self) -> f32 {
        if self.epsilon.is_finite() && self.epsilon >= 0.0 {
            self.epsilon
        } else {
            Self::default().epsilon
        }
    }
}
