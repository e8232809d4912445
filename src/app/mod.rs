//! Headless runner: drives a [`Simulation`] at a fixed frame rate under white
//! light and summarizes what the spectrometer saw.

use crate::atom::model::{AtomState, AtomicBehavior, ModelKind};
use crate::config::SimulationConfig;
use crate::constants::GROUND_ORBIT_RADIUS;
use crate::error::SimulationError;
use crate::simulation::density::DensityField;
use crate::simulation::events::SimEvent;
use crate::simulation::spectrometer::SpectrumData;
use crate::simulation::{AtomSource, EXPERIMENT_MODEL, ModelMode, Simulation};
use log::info;

/// Cells per side of the logged orbital slice.
const ORBITAL_SLICE_SIZE: usize = 33;

pub type AppError = Box<dyn std::error::Error + Send + Sync>;
pub type AppResult<T> = Result<T, AppError>;

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub source: AtomSource,
    pub frames: usize,
    pub seconds: f64,
    pub absorbed: usize,
    pub state_changes: usize,
    pub spectrum: SpectrumData,
    pub final_state: AtomState,
    /// Density slice of the final orbital, for Schrödinger atoms.
    pub orbital: Option<DensityField>,
}

impl RunSummary {
    pub fn emitted(&self) -> u32 {
        self.spectrum.values().sum()
    }

    pub fn log(&self) {
        info!(
            "{}: {} frames ({:.1} s), {} photons absorbed, {} state changes, {} photons recorded",
            self.source,
            self.frames,
            self.seconds,
            self.absorbed,
            self.state_changes,
            self.emitted()
        );
        for (wavelength, count) in &self.spectrum {
            info!("  {wavelength:>5} nm  {count}");
        }
        if let Some(orbital) = &self.orbital {
            info!("final orbital {} (x–z slice):", orbital.state().label());
            for row in orbital.render_rows() {
                info!("  |{row}|");
            }
        }
    }
}

pub struct App {
    simulation: Simulation,
    frame_dt: f64,
    frames: usize,
}

impl App {
    pub fn new(config: SimulationConfig) -> AppResult<Self> {
        let kind = ModelKind::from_name(&config.run.model).ok_or_else(|| {
            SimulationError::config(format!("unknown model `{}`", config.run.model))
        })?;
        let mut simulation = Simulation::new(&config)?;
        if kind != EXPERIMENT_MODEL {
            simulation.set_prediction_model(kind);
            simulation.set_mode(ModelMode::Prediction);
        }
        simulation.light_mut().set_on(true);
        simulation.drain_events();

        Ok(Self {
            simulation,
            frame_dt: config.run.frame_dt,
            frames: config.run.frames,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn run(&mut self) -> RunSummary {
        let mut absorbed = 0;
        let mut state_changes = 0;
        for _ in 0..self.frames {
            self.simulation.step(self.frame_dt);
            for event in self.simulation.drain_events() {
                match event {
                    SimEvent::PhotonAbsorbed { .. } => absorbed += 1,
                    SimEvent::StateChanged { .. } => state_changes += 1,
                    _ => {}
                }
            }
        }

        RunSummary {
            source: self.simulation.active_source(),
            frames: self.frames,
            seconds: self.simulation.time(),
            absorbed,
            state_changes,
            spectrum: self.simulation.spectrometer().data().clone(),
            final_state: self.simulation.active_model().state(),
            orbital: self.orbital_slice(),
        }
    }

    /// Density slice for the Schrödinger electron's current orbital.
    pub fn orbital_slice(&self) -> Option<DensityField> {
        let state = self.simulation.active_model().as_schrodinger()?.quantum_state();
        let extent = 4.0 * f64::from(state.n).powi(2) * GROUND_ORBIT_RADIUS;
        Some(DensityField::compute(state, ORBITAL_SLICE_SIZE, extent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str, frames: usize) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.run.model = model.to_owned();
        config.run.frames = frames;
        config
    }

    #[test]
    fn runs_the_configured_model() {
        let mut app = App::new(config("bohr", 600)).unwrap();
        assert_eq!(app.simulation().mode(), ModelMode::Prediction);
        let summary = app.run();
        assert_eq!(summary.source, AtomSource::Prediction(ModelKind::Bohr));
        assert_eq!(summary.frames, 600);
        assert!((summary.seconds - 10.0).abs() < 1e-6);
        assert!(summary.orbital.is_none());
    }

    #[test]
    fn experiment_run_reports_the_final_orbital() {
        let mut app = App::new(config("schrodinger", 60)).unwrap();
        assert_eq!(app.simulation().mode(), ModelMode::Experiment);
        let summary = app.run();
        assert_eq!(summary.source, AtomSource::Experiment);
        let orbital = summary.orbital.unwrap();
        let state = app.simulation().active_model().as_schrodinger().unwrap().quantum_state();
        assert_eq!(orbital.state(), state);
        assert_eq!(orbital.render_rows().len(), ORBITAL_SLICE_SIZE);
    }
}
