//! Per-run driver configuration.

use serde::{Deserialize, Serialize};

/// Per-run configuration of the driver.
///
/// Every field has a default, so partial configurations deserialize:
///
/// ```
/// use fx_engine::RunSettings;
///
/// let settings: RunSettings = serde_json::from_str(r#"{ "label": "game" }"#).unwrap();
/// assert_eq!(settings.label, "game");
/// assert_eq!(settings.step_limit, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Name attached to every log event of the run.
    pub label: String,
    /// Maximum number of descriptors the run may resolve. Unlimited when
    /// `None`.
    pub step_limit: Option<u64>,
}

impl RunSettings {
    /// Settings with the given label and no step limit.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Limit the run to `limit` resolved descriptors.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            label: "run".to_string(),
            step_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[fx_macros::test]
    fn it_defaults_to_an_unlimited_run() {
        let settings = RunSettings::default();
        assert_eq!(settings.label, "run");
        assert_eq!(settings.step_limit, None);
    }

    #[fx_macros::test]
    fn it_round_trips_through_json() -> anyhow::Result<()> {
        let settings = RunSettings::new("checkout").with_step_limit(64);
        let json = serde_json::to_string(&settings)?;

        assert_eq!(json, r#"{"label":"checkout","step_limit":64}"#);
        assert_eq!(serde_json::from_str::<RunSettings>(&json)?, settings);
        Ok(())
    }

    #[fx_macros::test]
    fn it_fills_missing_fields_with_defaults() -> anyhow::Result<()> {
        let settings: RunSettings = serde_json::from_str(r#"{ "step_limit": 3 }"#)?;
        assert_eq!(settings, RunSettings::default().with_step_limit(3));
        Ok(())
    }
}
