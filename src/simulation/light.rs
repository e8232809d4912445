use crate::config::SimulationConfig;
use crate::error::{SimResult, SimulationError};
use crate::physics::photon::{PhotonRequest, PhotonSource};
use crate::physics::transitions;
use crate::scope::StateScope;
use glam::DVec2;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightMode {
    #[default]
    White,
    Monochromatic,
}

/// A gun at the bottom of the box firing photons straight up.
#[derive(Clone, Debug)]
pub struct Light {
    scope: StateScope,
    on: bool,
    mode: LightMode,
    wavelength: f64,
    initial_wavelength: f64,
    min_wavelength: f64,
    max_wavelength: f64,
    transition_weight: f64,
    interval: f64,
    elapsed: f64,
    box_width: f64,
    bottom: f64,
}

impl Light {
    pub fn new(config: &SimulationConfig, scope: StateScope) -> Self {
        let space = &config.space;
        let light = &config.light;
        Self {
            scope,
            on: false,
            mode: LightMode::default(),
            wavelength: light.wavelength.round(),
            initial_wavelength: light.wavelength.round(),
            min_wavelength: light.min_wavelength,
            max_wavelength: light.max_wavelength,
            transition_weight: light.transition_weight,
            // Spaced so that at most `max_photons` are ever crossing the box.
            interval: space.box_height / space.photon_speed / space.max_photons as f64,
            elapsed: 0.0,
            box_width: space.box_width,
            bottom: -space.box_height / 2.0,
        }
    }

    pub fn scope(&self) -> &StateScope {
        &self.scope
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }

    pub fn mode(&self) -> LightMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LightMode) {
        self.mode = mode;
    }

    pub fn is_white(&self) -> bool {
        self.mode == LightMode::White
    }

    pub fn is_monochromatic(&self) -> bool {
        self.mode == LightMode::Monochromatic
    }

    /// The monochromatic wavelength, in nm.
    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// Rounds to whole nanometres.
    pub fn set_monochromatic_wavelength(&mut self, wavelength: f64) -> SimResult<()> {
        if !(self.min_wavelength..=self.max_wavelength).contains(&wavelength) {
            return Err(SimulationError::WavelengthOutOfRange {
                wavelength,
                min: self.min_wavelength,
                max: self.max_wavelength,
            });
        }
        self.wavelength = wavelength.round();
        Ok(())
    }

    pub fn emission_interval(&self) -> f64 {
        self.interval
    }

    /// Point on the bottom edge directly below `x`.
    pub fn bottom_edge(&self, x: f64) -> DVec2 {
        DVec2::new(x, self.bottom)
    }

    /// Advances the emission timer, returning at most one photon. Leftover time carries over.
    pub fn step<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Option<PhotonRequest> {
        if !self.on {
            return None;
        }
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return None;
        }
        self.elapsed -= self.interval;

        let half_width = self.box_width / 2.0;
        let x = rng.gen_range(-half_width..=half_width);
        Some(PhotonRequest {
            wavelength: self.choose_wavelength(rng),
            position: self.bottom_edge(x),
            direction: FRAC_PI_2,
            source: PhotonSource::Light,
        })
    }

    pub fn choose_wavelength<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.mode {
            LightMode::Monochromatic => self.wavelength,
            LightMode::White => {
                // Biased toward lines the ground state can absorb, or nothing would ever happen.
                let absorbable = transitions::table().absorption_wavelengths(1);
                if !absorbable.is_empty() && rng.gen_bool(self.transition_weight) {
                    absorbable[rng.gen_range(0..absorbable.len())]
                } else {
                    let min = self.min_wavelength.ceil() as u32;
                    let max = self.max_wavelength.floor() as u32;
                    f64::from(rng.gen_range(min..=max))
                }
            }
        }
    }

    pub fn reset(&mut self) {
        debug!("{}: reset", self.scope);
        self.on = false;
        self.mode = LightMode::default();
        self.wavelength = self.initial_wavelength;
        self.elapsed = 0.0;
    }
}
