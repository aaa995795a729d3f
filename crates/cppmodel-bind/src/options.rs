use crate::bind::Bind;

/// Knobs of a [`Bind`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOptions {
    /// Bind function signatures but not their bodies.
    pub skip_function_bodies: bool,
    /// How deep the binder descends before it stops and yields
    /// degenerate results.
    pub max_depth: usize,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            skip_function_bodies: false,
            max_depth: Bind::MAX_DEPTH,
        }
    }
}

impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip_function_bodies(mut self, skip: bool) -> Self {
        self.skip_function_bodies = skip;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
