/// Default limit on nested subquery levels.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for rendering and dynamic parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Maximum subquery nesting depth. `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl RenderConfig {
    /// Create a configuration with defaults (depth limit of 128).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Disable the depth limit.
    ///
    /// Deeply nested input can then exhaust the stack.
    pub fn unbounded(mut self) -> Self {
        self.max_depth = None;
        self
    }
}
