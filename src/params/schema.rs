//! Artwork parameter schemas and the configuration generator.
//!
//! Every artwork declares its knobs as a static list of [`ParamSpec`]s:
//! - a wide `random` range used by "randomize"
//! - a narrower curated `default` range (or a single value) used at construction
//!
//! Integer knobs are drawn by flooring a uniform draw over `max - min + 1`
//! slots and offsetting by `min`, so both endpoints are reachable.

use rand::Rng;

use crate::error::{GalleryError, Result};

/// Numeric flavour of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Whole numbers (counts, spacings)
    Integer,
    /// Continuous values (speeds, scales, alphas)
    Float,
}

/// A single named parameter with its ranges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    /// Inclusive range for randomized configs
    pub random: (f32, f32),
    /// Inclusive range for the curated default config
    pub default: (f32, f32),
}

impl ParamSpec {
    /// Integer parameter in `min..=max`
    pub const fn int(name: &'static str, min: f32, max: f32) -> Self {
        Self {
            name,
            kind: ParamKind::Integer,
            random: (min, max),
            default: (min, max),
        }
    }

    /// Float parameter in `min..=max`
    pub const fn float(name: &'static str, min: f32, max: f32) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            random: (min, max),
            default: (min, max),
        }
    }

    /// Structural constant that never varies
    pub const fn fixed(name: &'static str, value: f32) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            random: (value, value),
            default: (value, value),
        }
    }

    /// Narrow the default draw to `min..=max`
    pub const fn default_range(mut self, min: f32, max: f32) -> Self {
        self.default = (min, max);
        self
    }

    /// Pin the default config to a single value
    pub const fn default_value(mut self, value: f32) -> Self {
        self.default = (value, value);
        self
    }

    /// Draw a value from the given inclusive range
    fn sample(&self, (min, max): (f32, f32), rng: &mut impl Rng) -> f32 {
        if max <= min {
            return min;
        }
        match self.kind {
            ParamKind::Integer => {
                let slots = (max - min + 1.0).floor();
                ((rng.random::<f32>() * slots).floor() + min).min(max)
            }
            ParamKind::Float => rng.random::<f32>() * (max - min) + min,
        }
    }

    /// Draw a value for a randomized config
    pub fn sample_random(&self, rng: &mut impl Rng) -> f32 {
        self.sample(self.random, rng)
    }

    /// Draw a value for the default config
    pub fn sample_default(&self, rng: &mut impl Rng) -> f32 {
        self.sample(self.default, rng)
    }

    /// Whether `value` lies inside the randomized range (which contains the default range)
    pub fn contains(&self, value: f32) -> bool {
        let (min, max) = self.random;
        let (dmin, dmax) = self.default;
        let in_random = value >= min && value <= max;
        let in_default = value >= dmin && value <= dmax;
        let integral = self.kind == ParamKind::Float || value.fract() == 0.0;
        (in_random || in_default) && integral
    }
}

/// Flat name -> value parameter set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtworkConfig {
    values: Vec<(&'static str, f32)>,
}

impl ArtworkConfig {
    /// Value for `name`; 0.0 if the schema never declared it
    pub fn get(&self, name: &str) -> f32 {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .unwrap_or_default()
    }

    /// Integer view of a count-like field
    pub fn count(&self, name: &str) -> usize {
        self.get(name).max(0.0) as usize
    }

    /// Replace a single field in place
    pub fn set(&mut self, name: &'static str, value: f32) {
        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|(key, _)| *key == name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Static parameter schema of one artwork
#[derive(Debug, Clone, Copy)]
pub struct ConfigSchema {
    pub fields: &'static [ParamSpec],
}

impl ConfigSchema {
    pub const fn new(fields: &'static [ParamSpec]) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&ParamSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Curated baseline (same shape as the random config, narrower values)
    pub fn generate_default(&self, rng: &mut impl Rng) -> ArtworkConfig {
        ArtworkConfig {
            values: self
                .fields
                .iter()
                .map(|spec| (spec.name, spec.sample_default(rng)))
                .collect(),
        }
    }

    /// Every field drawn independently from its wide range
    pub fn generate_random(&self, rng: &mut impl Rng) -> ArtworkConfig {
        ArtworkConfig {
            values: self
                .fields
                .iter()
                .map(|spec| (spec.name, spec.sample_random(rng)))
                .collect(),
        }
    }

    /// Redraw only the named tunables, leaving the rest of `config` untouched
    pub fn randomize_fields(
        &self,
        config: &mut ArtworkConfig,
        names: &[&str],
        rng: &mut impl Rng,
    ) -> Result<()> {
        for name in names {
            let spec = self
                .field(name)
                .ok_or_else(|| GalleryError::InvalidConfig(format!("no field '{}'", name)))?;
            config.set(spec.name, spec.sample_random(rng));
        }
        Ok(())
    }

    /// Check that every declared field is present and in range
    pub fn validate(&self, config: &ArtworkConfig) -> Result<()> {
        for spec in self.fields {
            if !config.contains(spec.name) {
                return Err(GalleryError::InvalidConfig(format!(
                    "missing field '{}'",
                    spec.name
                )));
            }
            let value = config.get(spec.name);
            if !spec.contains(value) {
                return Err(GalleryError::InvalidConfig(format!(
                    "'{}' = {} outside {:?}",
                    spec.name, value, spec.random
                )));
            }
        }
        Ok(())
    }
}
