use crate::atom::bohr::PrincipalAtom;
use crate::atom::model::{AtomState, AtomicBehavior, ModelKind, StepContext};
use crate::atom::quantized::CollisionGeometry;
use crate::config::SimulationConfig;
use crate::error::SimResult;
use crate::physics::electron::QuantumElectron;
use crate::physics::photon::{Photon, PhotonId};
use crate::scope::StateScope;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ways of drawing the standing wave. Only the 3D view changes collision geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeBroglieRepresentation {
    /// Wave drawn as a radial offset from the orbit.
    #[default]
    RadialDistance,
    /// Wave drawn as height above a tilted orbit plane.
    ThreeD,
    /// Wave drawn as signed brightness along the orbit.
    Brightness,
    /// Wave drawn as brightness of the amplitude's magnitude.
    BrightnessMagnitude,
}

/// The electron as a standing wave around the Bohr orbit.
#[derive(Clone, Debug)]
pub struct DeBroglieModel {
    scope: StateScope,
    core: PrincipalAtom,
    representation: DeBroglieRepresentation,
    ring_threshold: f64,
    orbit_y_scale: f64,
}

impl DeBroglieModel {
    pub fn new(config: &SimulationConfig, scope: StateScope) -> Self {
        Self {
            scope,
            core: PrincipalAtom::new(ModelKind::DeBroglie, config),
            representation: DeBroglieRepresentation::default(),
            ring_threshold: config.debroglie.ring_threshold,
            orbit_y_scale: config.debroglie.orbit_y_scale,
        }
    }

    pub fn n(&self) -> u8 {
        self.core.electron().n()
    }

    pub fn electron(&self) -> &QuantumElectron {
        self.core.electron()
    }

    pub fn representation(&self) -> DeBroglieRepresentation {
        self.representation
    }

    pub fn set_representation(&mut self, representation: DeBroglieRepresentation) {
        self.representation = representation;
    }

    /// Vertical squash applied to the orbit in the 3D view.
    pub fn orbit_y_scale(&self) -> f64 {
        self.orbit_y_scale
    }

    pub fn orbit_radius(&self, n: u8) -> f64 {
        self.core.atom().orbit_radius(n)
    }

    /// Standing-wave amplitude at `angle` around the orbit, in [-1, 1].
    pub fn amplitude(&self, angle: f64) -> f64 {
        let electron = self.core.electron();
        standing_wave(electron.n(), angle, electron.angle())
    }

    pub fn set_certain_absorption(&mut self, certain: bool) {
        self.core.atom_mut().set_certain_absorption(certain);
    }

    pub fn is_certain_absorption(&self) -> bool {
        self.core.atom().is_certain_absorption()
    }

    pub fn restore(&mut self, n: u8) -> SimResult<()> {
        self.core.restore(n)
    }

    fn geometry(&self) -> CollisionGeometry {
        match self.representation {
            DeBroglieRepresentation::ThreeD => CollisionGeometry::Ellipse {
                threshold: self.ring_threshold,
                y_scale: self.orbit_y_scale,
            },
            _ => CollisionGeometry::Ring {
                threshold: self.ring_threshold,
            },
        }
    }
}

/// `sin(n·angle) · sin(phase)`: a standing wave with n wavelengths around the orbit,
/// oscillating in time with the electron's orbit phase.
pub fn standing_wave(n: u8, angle: f64, phase: f64) -> f64 {
    let amplitude = (f64::from(n) * angle).sin() * phase.sin();
    assert!(
        (-1.0..=1.0).contains(&amplitude),
        "standing wave amplitude {amplitude} out of range"
    );
    amplitude
}

impl AtomicBehavior for DeBroglieModel {
    fn kind(&self) -> ModelKind {
        ModelKind::DeBroglie
    }

    fn collides(&self, photon: &Photon) -> bool {
        self.core.collides(self.geometry(), photon)
    }

    fn process_photon<R: Rng + ?Sized>(&mut self, id: PhotonId, ctx: &mut StepContext<'_, R>) {
        let geometry = self.geometry();
        self.core.process_photon(geometry, id, ctx);
    }

    fn advance_clock<R: Rng + ?Sized>(&mut self, dt: f64, ctx: &mut StepContext<'_, R>) {
        self.core.advance_clock(dt, ctx);
    }

    fn reset(&mut self) {
        self.core.reset();
    }

    fn absorption_wavelengths(&self) -> Vec<f64> {
        self.core.absorption_wavelengths()
    }

    fn state(&self) -> AtomState {
        self.core.state(&self.scope)
    }
}
