/// What a lazily resolved `include` does when its template cannot be loaded.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum MissingIncludePolicy {
    /// Leave the placeholder empty and log a warning.
    #[default]
    Silent,
    /// Fail the render with the load error.
    Error,
}

/// Settings for an [`Engine`](crate::Engine).
///
/// ```
/// use tagloom::{EngineConfig, MissingIncludePolicy};
///
/// let config = EngineConfig::default()
///     .with_max_depth(8)
///     .with_missing_include(MissingIncludePolicy::Error);
/// assert_eq!(config.max_depth, 8);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EngineConfig {
    /// How deeply templates may include or extend one another.
    pub max_depth: usize,
    pub missing_include: MissingIncludePolicy,
}

impl EngineConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_missing_include(mut self, policy: MissingIncludePolicy) -> Self {
        self.missing_include = policy;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            missing_include: MissingIncludePolicy::default(),
        }
    }
}
