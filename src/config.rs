// config.rs
// Tunable parameters for the simulation, loadable from a TOML file.

use crate::atom::model::ModelKind;
use crate::constants::*;
use crate::error::{SimResult, SimulationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub space: SpaceConfig,
    pub light: LightConfig,
    pub bohr: BohrConfig,
    pub debroglie: DeBroglieConfig,
    pub metastable: MetastableConfig,
    pub spectrometer: SpectrometerConfig,
    pub run: RunConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    pub box_width: f64,
    pub box_height: f64,
    /// Distance a photon travels per second.
    pub photon_speed: f64,
    /// Upper bound on photons from the light that are in the box at once.
    pub max_photons: usize,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            box_width: BOX_WIDTH,
            box_height: BOX_HEIGHT,
            photon_speed: PHOTON_SPEED,
            max_photons: MAX_PHOTONS_IN_BOX,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Probability that white light picks a wavelength the ground state can absorb.
    pub transition_weight: f64,
    pub min_wavelength: f64,
    pub max_wavelength: f64,
    /// Initial monochromatic wavelength.
    pub wavelength: f64,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            transition_weight: WHITE_LIGHT_TRANSITION_WEIGHT,
            min_wavelength: MIN_UV_WAVELENGTH,
            max_wavelength: MAX_VISIBLE_WAVELENGTH,
            wavelength: 94.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BohrConfig {
    pub ground_orbit_radius: f64,
    pub absorption_probability: f64,
    pub stimulated_emission_probability: f64,
    /// Scales the per-step spontaneous decay hazard.
    pub spontaneous_emission_probability: f64,
    /// Photon-to-electron distance that counts as a collision.
    pub collision_threshold: f64,
    /// Seconds an electron must stay in a state before it may decay.
    pub min_time_in_state: f64,
    /// Characteristic lifetime of an excited state past the minimum time.
    pub mean_lifetime: f64,
    /// Ground-state orbit angle change per second, radians.
    pub angle_delta: f64,
}

impl Default for BohrConfig {
    fn default() -> Self {
        Self {
            ground_orbit_radius: GROUND_ORBIT_RADIUS,
            absorption_probability: 1.0,
            stimulated_emission_probability: 1.0,
            spontaneous_emission_probability: 0.5,
            collision_threshold: 15.0,
            min_time_in_state: 0.5,
            mean_lifetime: 1.0,
            angle_delta: 10f64.to_radians() * 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeBroglieConfig {
    /// Distance from the orbit ring that counts as a collision.
    pub ring_threshold: f64,
    /// Y-axis scale of the tilted orbit in the 3D height representation.
    pub orbit_y_scale: f64,
}

impl Default for DeBroglieConfig {
    fn default() -> Self {
        Self {
            ring_threshold: 15.0,
            orbit_y_scale: 0.35,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetastableConfig {
    /// Seconds stuck in the metastable state before white light is helped along.
    pub intervention_interval: f64,
}

impl Default for MetastableConfig {
    fn default() -> Self {
        Self {
            intervention_interval: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrometerConfig {
    pub max_snapshots: usize,
}

impl Default for SpectrometerConfig {
    fn default() -> Self {
        Self { max_snapshots: 5 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub seed: u64,
    pub frame_dt: f64,
    pub frames: usize,
    /// Model driven by the headless runner, e.g. "bohr" or "schrodinger".
    pub model: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frame_dt: 1.0 / 60.0,
            frames: 3_600,
            model: "schrodinger".to_owned(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(content: &str) -> SimResult<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> SimResult<()> {
        let positive = [
            ("space.box_width", self.space.box_width),
            ("space.box_height", self.space.box_height),
            ("space.photon_speed", self.space.photon_speed),
            ("bohr.ground_orbit_radius", self.bohr.ground_orbit_radius),
            ("bohr.collision_threshold", self.bohr.collision_threshold),
            ("bohr.mean_lifetime", self.bohr.mean_lifetime),
            ("debroglie.ring_threshold", self.debroglie.ring_threshold),
            ("debroglie.orbit_y_scale", self.debroglie.orbit_y_scale),
            ("metastable.intervention_interval", self.metastable.intervention_interval),
            ("run.frame_dt", self.run.frame_dt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimulationError::config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let probabilities = [
            ("light.transition_weight", self.light.transition_weight),
            ("bohr.absorption_probability", self.bohr.absorption_probability),
            (
                "bohr.stimulated_emission_probability",
                self.bohr.stimulated_emission_probability,
            ),
            (
                "bohr.spontaneous_emission_probability",
                self.bohr.spontaneous_emission_probability,
            ),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimulationError::config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.space.max_photons == 0 {
            return Err(SimulationError::config("space.max_photons must be at least 1"));
        }
        if self.bohr.min_time_in_state < 0.0 {
            return Err(SimulationError::config("bohr.min_time_in_state must not be negative"));
        }
        // White light draws whole nanometres, so the range must hold at least one.
        if !(self.light.min_wavelength > 0.0
            && self.light.min_wavelength < self.light.max_wavelength
            && self.light.min_wavelength.ceil() <= self.light.max_wavelength.floor())
        {
            return Err(SimulationError::config(format!(
                "light wavelength range [{}, {}] is empty",
                self.light.min_wavelength, self.light.max_wavelength
            )));
        }
        if ModelKind::from_name(&self.run.model).is_none() {
            return Err(SimulationError::config(format!(
                "run.model `{}` is not a known model",
                self.run.model
            )));
        }
        if !(self.light.min_wavelength..=self.light.max_wavelength).contains(&self.light.wavelength) {
            return Err(SimulationError::WavelengthOutOfRange {
                wavelength: self.light.wavelength,
                min: self.light.min_wavelength,
                max: self.light.max_wavelength,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [space]
            max_photons = 8

            [run]
            seed = 7
            model = "bohr"
            "#,
        )
        .unwrap();
        assert_eq!(config.space.max_photons, 8);
        assert_eq!(config.space.box_width, BOX_WIDTH);
        assert_eq!(config.run.seed, 7);
        assert_eq!(config.spectrometer.max_snapshots, 5);
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let err = SimulationConfig::from_toml_str("[bohr]\nabsorption_probability = 1.5\n")
            .unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }

    #[test]
    fn rejects_range_without_a_whole_wavelength() {
        let err = SimulationConfig::from_toml_str(
            "[light]\nmin_wavelength = 100.2\nmax_wavelength = 100.8\nwavelength = 100.5\n",
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));

        let config = SimulationConfig::from_toml_str(
            "[light]\nmin_wavelength = 100.2\nmax_wavelength = 101.0\nwavelength = 100.5\n",
        )
        .unwrap();
        assert_eq!(config.light.max_wavelength, 101.0);
    }

    #[test]
    fn rejects_unknown_model() {
        let err = SimulationConfig::from_toml_str("[run]\nmodel = \"thomson\"\n").unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = SimulationConfig::from_toml_str("[space\nbox_width = 1").unwrap_err();
        assert!(matches!(err, SimulationError::ConfigParse(_)));
    }
}
