use serde::Deserialize;

/// Step used by [`Spacing::Fixed`] when none is given.
pub const DEFAULT_STEP_SECONDS: u32 = 52;

/// Options for timestamp redistribution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedistributeOptions {
    /// How points are spread over the time window (default: proportional)
    #[serde(default)]
    pub spacing: Spacing,

    /// Seconds between consecutive points in fixed mode (default: 52)
    #[serde(default = "default_step_seconds")]
    pub step_seconds: u32,
}

impl Default for RedistributeOptions {
    fn default() -> Self {
        Self {
            spacing: Spacing::default(),
            step_seconds: DEFAULT_STEP_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    /// First point at the window's begin, last point at its end.
    #[default]
    Proportional,
    /// Constant step from the window's begin; the end only bounds validation.
    Fixed,
}

fn default_step_seconds() -> u32 {
    DEFAULT_STEP_SECONDS
}
