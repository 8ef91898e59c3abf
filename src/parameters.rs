//! Adjustable processing parameters and the store resolving their values.
//!
//! Each parameter is backed by a control that may or may not exist on the page.
//! The store never fails a lookup: an absent control, or one without a usable
//! value, resolves to the parameter's default.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Identifies one of the fixed processing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterId {
    Brightness,
    Contrast,
    Saturation,
    Denoise,
    Sharpness,
}

impl ParameterId {
    /// All parameters in display order.
    pub const ALL: [ParameterId; 5] = [
        ParameterId::Brightness,
        ParameterId::Contrast,
        ParameterId::Saturation,
        ParameterId::Denoise,
        ParameterId::Sharpness,
    ];

    /// Short name used in configuration and logs.
    pub fn name(&self) -> &'static str {
        match self {
            ParameterId::Brightness => "brightness",
            ParameterId::Contrast => "contrast",
            ParameterId::Saturation => "saturation",
            ParameterId::Denoise => "denoise",
            ParameterId::Sharpness => "sharpness",
        }
    }

    /// Element id of the range control, also the form field the server reads.
    pub fn control_id(&self) -> &'static str {
        match self {
            ParameterId::Brightness => "brightness_beta",
            ParameterId::Contrast => "contrast_alpha",
            ParameterId::Saturation => "saturation_factor",
            ParameterId::Denoise => "denoise_h",
            ParameterId::Sharpness => "sharpness_factor",
        }
    }

    /// Element id of the text readout paired with the control.
    pub fn readout_id(&self) -> &'static str {
        match self {
            ParameterId::Brightness => "brightnessValue",
            ParameterId::Contrast => "contrastValue",
            ParameterId::Saturation => "saturationValue",
            ParameterId::Denoise => "denoiseValue",
            ParameterId::Sharpness => "sharpnessValue",
        }
    }

    /// Built-in default, used when configuration does not override it.
    pub fn factory_default(&self) -> f64 {
        match self {
            ParameterId::Brightness => 15.0,
            ParameterId::Contrast => 1.15,
            ParameterId::Saturation => 1.3,
            ParameterId::Denoise => 15.0,
            ParameterId::Sharpness => 1.0,
        }
    }

    /// Range the processing server clamps submitted values to.
    pub fn submission_range(&self) -> (f64, f64) {
        match self {
            ParameterId::Brightness => (-100.0, 100.0),
            ParameterId::Contrast => (1.0, 3.0),
            ParameterId::Saturation => (0.5, 2.0),
            ParameterId::Denoise => (0.0, 20.0),
            ParameterId::Sharpness => (0.0, 3.0),
        }
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterId {
    type Err = ParameterError;

    /// Accepts either the short name or the control id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterId::ALL
            .into_iter()
            .find(|id| id.name() == s || id.control_id() == s)
            .ok_or_else(|| ParameterError::Unknown(s.to_string()))
    }
}

/// A fully resolved value for every parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub denoise: f64,
    pub sharpness: f64,
}

impl ParameterSet {
    /// Value of a single parameter.
    pub fn get(&self, id: ParameterId) -> f64 {
        match id {
            ParameterId::Brightness => self.brightness,
            ParameterId::Contrast => self.contrast,
            ParameterId::Saturation => self.saturation,
            ParameterId::Denoise => self.denoise,
            ParameterId::Sharpness => self.sharpness,
        }
    }

    /// Replace a single parameter.
    pub fn set(&mut self, id: ParameterId, value: f64) {
        let slot = match id {
            ParameterId::Brightness => &mut self.brightness,
            ParameterId::Contrast => &mut self.contrast,
            ParameterId::Saturation => &mut self.saturation,
            ParameterId::Denoise => &mut self.denoise,
            ParameterId::Sharpness => &mut self.sharpness,
        };
        *slot = value;
    }

    /// Form fields for the processing request, clamped to what the server accepts.
    pub fn submission_fields(&self) -> Vec<(&'static str, f64)> {
        ParameterId::ALL
            .iter()
            .map(|id| {
                let (min, max) = id.submission_range();
                (id.control_id(), self.get(*id).clamp(min, max))
            })
            .collect()
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            brightness: ParameterId::Brightness.factory_default(),
            contrast: ParameterId::Contrast.factory_default(),
            saturation: ParameterId::Saturation.factory_default(),
            denoise: ParameterId::Denoise.factory_default(),
            sharpness: ParameterId::Sharpness.factory_default(),
        }
    }
}

/// Current parameter values as reported by their controls.
///
/// A key present in `controls` means the control exists; `None` as its value
/// means the control exists but holds nothing usable (empty or unparseable).
#[derive(Debug, Clone)]
pub struct ParameterStore {
    defaults: ParameterSet,
    controls: HashMap<ParameterId, Option<f64>>,
}

impl ParameterStore {
    /// Create a store with no controls attached; everything resolves to `defaults`.
    pub fn new(defaults: ParameterSet) -> Self {
        Self {
            defaults,
            controls: HashMap::new(),
        }
    }

    /// Register a control, optionally with the value it currently shows.
    pub fn attach_control(&mut self, id: ParameterId, value: Option<f64>) {
        self.controls.insert(id, value.filter(|v| v.is_finite()));
    }

    /// Forget a control; its parameter falls back to the default.
    pub fn detach_control(&mut self, id: ParameterId) {
        self.controls.remove(&id);
    }

    /// Whether a control is attached for this parameter.
    pub fn has_control(&self, id: ParameterId) -> bool {
        self.controls.contains_key(&id)
    }

    /// Resolve a parameter: the control's value if it has one, else the default.
    pub fn get(&self, id: ParameterId) -> f64 {
        self.controls
            .get(&id)
            .copied()
            .flatten()
            .unwrap_or_else(|| self.defaults.get(id))
    }

    /// Record a new value reported by a control.
    ///
    /// Non-finite values leave the control without a usable value.
    pub fn set(&mut self, id: ParameterId, value: f64) {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite value for {}: {}", id, value);
        }
        self.attach_control(id, Some(value));
    }

    /// Restore every attached control to its default and return the result.
    pub fn reset_all(&mut self) -> ParameterSet {
        for (id, value) in self.controls.iter_mut() {
            *value = Some(self.defaults.get(*id));
        }
        log::debug!("Parameters reset to defaults");
        self.snapshot()
    }

    /// Resolve every parameter at once.
    pub fn snapshot(&self) -> ParameterSet {
        let mut set = self.defaults;
        for id in ParameterId::ALL {
            set.set(id, self.get(id));
        }
        set
    }

    /// The defaults this store falls back to.
    pub fn defaults(&self) -> &ParameterSet {
        &self.defaults
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ParameterSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_control_resolves_to_default() {
        let store = ParameterStore::default();
        assert!(!store.has_control(ParameterId::Brightness));
        assert_eq!(store.get(ParameterId::Brightness), 15.0);
        assert_eq!(store.get(ParameterId::Contrast), 1.15);
        assert_eq!(store.get(ParameterId::Saturation), 1.3);
        assert_eq!(store.get(ParameterId::Denoise), 15.0);
        assert_eq!(store.get(ParameterId::Sharpness), 1.0);
    }

    #[test]
    fn test_control_without_value_resolves_to_default() {
        let mut store = ParameterStore::default();
        store.attach_control(ParameterId::Denoise, None);
        assert!(store.has_control(ParameterId::Denoise));
        assert_eq!(store.get(ParameterId::Denoise), 15.0);

        store.attach_control(ParameterId::Denoise, Some(f64::NAN));
        assert_eq!(store.get(ParameterId::Denoise), 15.0);
    }

    #[test]
    fn test_set_and_get() {
        let mut store = ParameterStore::default();
        store.set(ParameterId::Brightness, -40.0);
        assert_eq!(store.get(ParameterId::Brightness), -40.0);
        assert_eq!(store.snapshot().brightness, -40.0);

        store.detach_control(ParameterId::Brightness);
        assert_eq!(store.get(ParameterId::Brightness), 15.0);
    }

    #[test]
    fn test_reset_all_is_idempotent() {
        let mut store = ParameterStore::default();
        for id in ParameterId::ALL {
            store.set(id, 2.0);
        }

        let first = store.reset_all();
        let second = store.reset_all();
        assert_eq!(first, ParameterSet::default());
        assert_eq!(first, second);
        // Controls stay attached after a reset
        assert!(store.has_control(ParameterId::Sharpness));
    }

    #[test]
    fn test_reset_uses_configured_defaults() {
        let defaults = ParameterSet {
            brightness: 0.0,
            ..ParameterSet::default()
        };
        let mut store = ParameterStore::new(defaults);
        store.set(ParameterId::Brightness, 80.0);
        assert_eq!(store.reset_all().brightness, 0.0);
    }

    #[test]
    fn test_parameter_id_parsing() {
        assert_eq!("brightness".parse(), Ok(ParameterId::Brightness));
        assert_eq!("denoise_h".parse(), Ok(ParameterId::Denoise));
        assert_eq!("sharpness_factor".parse(), Ok(ParameterId::Sharpness));
        assert_eq!(
            "gamma".parse::<ParameterId>(),
            Err(ParameterError::Unknown("gamma".to_string()))
        );
    }

    #[test]
    fn test_submission_fields_are_clamped() {
        let set = ParameterSet {
            brightness: 250.0,
            contrast: 0.5,
            saturation: 1.3,
            denoise: 25.0,
            sharpness: -1.0,
        };
        let fields = set.submission_fields();
        assert_eq!(
            fields,
            vec![
                ("brightness_beta", 100.0),
                ("contrast_alpha", 1.0),
                ("saturation_factor", 1.3),
                ("denoise_h", 20.0),
                ("sharpness_factor", 0.0),
            ]
        );
    }

    #[test]
    fn test_parameter_set_deserializes_partial() {
        let set: ParameterSet = serde_json::from_str(r#"{"brightness": 0}"#).unwrap();
        assert_eq!(set.brightness, 0.0);
        assert_eq!(set.contrast, 1.15);
    }
}
