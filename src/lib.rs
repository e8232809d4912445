//! Models of the hydrogen atom.
//!
//! A light source fires photons at one of six historical models of the
//! atom (billiard ball through Schrödinger). Each model decides whether
//! photons are absorbed, scattered or stimulate emission, and photons the
//! atom emits are tallied by a spectrometer.

pub mod app;
pub mod atom;
pub mod config;
pub mod constants;
pub mod error;
pub mod physics;
pub mod scope;
pub mod simulation;

pub use atom::model::{AtomState, AtomicBehavior, AtomicModel, ElectronState, ModelKind};
pub use config::SimulationConfig;
pub use error::{SimResult, SimulationError};
pub use physics::electron::QuantumNumbers;
pub use simulation::events::SimEvent;
pub use simulation::light::LightMode;
pub use simulation::{AtomSource, ModelMode, Simulation};
