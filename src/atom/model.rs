use crate::atom::billiard::BilliardBallModel;
use crate::atom::bohr::BohrModel;
use crate::atom::debroglie::DeBroglieModel;
use crate::atom::plum_pudding::PlumPuddingModel;
use crate::atom::schrodinger::SchrodingerModel;
use crate::atom::solar_system::SolarSystemModel;
use crate::config::SimulationConfig;
use crate::physics::electron::QuantumNumbers;
use crate::physics::photon::{Photon, PhotonId, PhotonPool, PhotonRequest, PhotonSource};
use crate::scope::StateScope;
use crate::simulation::events::SimEvent;
use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every model sits at the center of the box.
pub const ATOM_CENTER: DVec2 = DVec2::ZERO;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    BilliardBall,
    PlumPudding,
    ClassicalSolarSystem,
    Bohr,
    DeBroglie,
    Schrodinger,
}

impl ModelKind {
    pub const ALL: [ModelKind; 6] = [
        ModelKind::BilliardBall,
        ModelKind::PlumPudding,
        ModelKind::ClassicalSolarSystem,
        ModelKind::Bohr,
        ModelKind::DeBroglie,
        ModelKind::Schrodinger,
    ];

    pub fn index(self) -> usize {
        match self {
            ModelKind::BilliardBall => 0,
            ModelKind::PlumPudding => 1,
            ModelKind::ClassicalSolarSystem => 2,
            ModelKind::Bohr => 3,
            ModelKind::DeBroglie => 4,
            ModelKind::Schrodinger => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::BilliardBall => "billiardBall",
            ModelKind::PlumPudding => "plumPudding",
            ModelKind::ClassicalSolarSystem => "classicalSolarSystem",
            ModelKind::Bohr => "bohr",
            ModelKind::DeBroglie => "deBroglie",
            ModelKind::Schrodinger => "schrodinger",
        }
    }

    /// Case-insensitive lookup by [`ModelKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn is_quantized(self) -> bool {
        matches!(
            self,
            ModelKind::Bohr | ModelKind::DeBroglie | ModelKind::Schrodinger
        )
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The electron's quantum state as seen from outside a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectronState {
    Principal(u8),
    Orbital(QuantumNumbers),
}

impl ElectronState {
    pub fn n(&self) -> u8 {
        match self {
            ElectronState::Principal(n) => *n,
            ElectronState::Orbital(state) => state.n,
        }
    }
}

/// Whether a state change is a physical transition or the restoration of saved state.
///
/// Restoring skips selection-rule checks and emits no events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionMode {
    Physical,
    Restoring,
}

/// Read-only view of a model, shaped for an external state tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtomState {
    pub scope: StateScope,
    pub kind: ModelKind,
    pub electron: Option<ElectronState>,
    pub electron_position: Option<DVec2>,
    pub electron_angle: Option<f64>,
    pub time_in_state: Option<f64>,
}

/// Mutable world handed to a model for one step.
pub struct StepContext<'a, R: Rng + ?Sized> {
    pub photons: &'a mut PhotonPool,
    pub events: &'a mut Vec<SimEvent>,
    pub rng: &'a mut R,
    pub photon_speed: f64,
}

impl<'a, R: Rng + ?Sized> StepContext<'a, R> {
    pub fn spawn(&mut self, request: PhotonRequest) -> PhotonId {
        let PhotonRequest {
            wavelength,
            position,
            direction,
            source,
        } = request.clone();
        let id = self.photons.spawn(request);
        self.events.push(SimEvent::PhotonEmitted {
            id,
            wavelength,
            position,
            direction,
            source,
        });
        id
    }

    /// Photon emitted by the atom itself.
    pub fn emit_photon(&mut self, wavelength: f64, position: DVec2, direction: f64) -> PhotonId {
        self.spawn(PhotonRequest {
            wavelength,
            position,
            direction,
            source: PhotonSource::Atom,
        })
    }

    pub fn absorb_photon(&mut self, id: PhotonId) -> Option<Photon> {
        let photon = self.photons.remove(id)?;
        self.events.push(SimEvent::PhotonAbsorbed {
            id,
            wavelength: photon.wavelength,
        });
        Some(photon)
    }

    pub fn state_changed(&mut self, model: ModelKind, from: ElectronState, to: ElectronState) {
        self.events.push(SimEvent::StateChanged { model, from, to });
    }

    pub fn random_direction(&mut self) -> f64 {
        self.rng.gen_range(0.0..std::f64::consts::TAU)
    }
}

/// Capabilities shared by every atomic model.
pub trait AtomicBehavior {
    fn kind(&self) -> ModelKind;

    /// Whether a photon is close enough to interact with the atom.
    fn collides(&self, photon: &Photon) -> bool;

    /// Collision handling for one photon that has just moved.
    fn process_photon<R: Rng + ?Sized>(&mut self, id: PhotonId, ctx: &mut StepContext<'_, R>);

    /// The model's own clock: orbit angle, dwell timers, spontaneous emission.
    fn advance_clock<R: Rng + ?Sized>(&mut self, dt: f64, ctx: &mut StepContext<'_, R>);

    fn reset(&mut self);

    /// Wavelengths the atom can absorb in its current state.
    fn absorption_wavelengths(&self) -> Vec<f64> {
        Vec::new()
    }

    fn state(&self) -> AtomState;
}

#[derive(Clone, Debug)]
pub enum AtomicModel {
    BilliardBall(BilliardBallModel),
    PlumPudding(PlumPuddingModel),
    ClassicalSolarSystem(SolarSystemModel),
    Bohr(BohrModel),
    DeBroglie(DeBroglieModel),
    Schrodinger(SchrodingerModel),
}

macro_rules! each_model {
    ($self:expr, $model:ident => $body:expr) => {
        match $self {
            AtomicModel::BilliardBall($model) => $body,
            AtomicModel::PlumPudding($model) => $body,
            AtomicModel::ClassicalSolarSystem($model) => $body,
            AtomicModel::Bohr($model) => $body,
            AtomicModel::DeBroglie($model) => $body,
            AtomicModel::Schrodinger($model) => $body,
        }
    };
}

impl AtomicModel {
    pub fn new(kind: ModelKind, config: &SimulationConfig, parent: &StateScope) -> Self {
        let scope = parent.child(&format!("{}Model", kind.name()));
        match kind {
            ModelKind::BilliardBall => AtomicModel::BilliardBall(BilliardBallModel::new(scope)),
            ModelKind::PlumPudding => AtomicModel::PlumPudding(PlumPuddingModel::new(scope)),
            ModelKind::ClassicalSolarSystem => {
                AtomicModel::ClassicalSolarSystem(SolarSystemModel::new(scope))
            }
            ModelKind::Bohr => AtomicModel::Bohr(BohrModel::new(config, scope)),
            ModelKind::DeBroglie => AtomicModel::DeBroglie(DeBroglieModel::new(config, scope)),
            ModelKind::Schrodinger => {
                AtomicModel::Schrodinger(SchrodingerModel::new(config, scope))
            }
        }
    }

    /// Moves every live photon, lets the atom react to each, then runs the atom's clock.
    pub fn step<R: Rng + ?Sized>(&mut self, dt: f64, ctx: &mut StepContext<'_, R>) {
        let distance = ctx.photon_speed * dt;
        for id in ctx.photons.ids() {
            if let Some(photon) = ctx.photons.get_mut(id) {
                photon.advance(distance);
            }
            self.process_photon(id, ctx);
        }
        self.advance_clock(dt, ctx);
    }

    pub fn as_schrodinger(&self) -> Option<&SchrodingerModel> {
        match self {
            AtomicModel::Schrodinger(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_schrodinger_mut(&mut self) -> Option<&mut SchrodingerModel> {
        match self {
            AtomicModel::Schrodinger(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_bohr_mut(&mut self) -> Option<&mut BohrModel> {
        match self {
            AtomicModel::Bohr(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_debroglie(&self) -> Option<&DeBroglieModel> {
        match self {
            AtomicModel::DeBroglie(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_debroglie_mut(&mut self) -> Option<&mut DeBroglieModel> {
        match self {
            AtomicModel::DeBroglie(model) => Some(model),
            _ => None,
        }
    }
}

impl AtomicBehavior for AtomicModel {
    fn kind(&self) -> ModelKind {
        each_model!(self, model => model.kind())
    }

    fn collides(&self, photon: &Photon) -> bool {
        each_model!(self, model => model.collides(photon))
    }

    fn process_photon<R: Rng + ?Sized>(&mut self, id: PhotonId, ctx: &mut StepContext<'_, R>) {
        each_model!(self, model => model.process_photon(id, ctx))
    }

    fn advance_clock<R: Rng + ?Sized>(&mut self, dt: f64, ctx: &mut StepContext<'_, R>) {
        each_model!(self, model => model.advance_clock(dt, ctx))
    }

    fn reset(&mut self) {
        each_model!(self, model => model.reset())
    }

    fn absorption_wavelengths(&self) -> Vec<f64> {
        each_model!(self, model => model.absorption_wavelengths())
    }

    fn state(&self) -> AtomState {
        each_model!(self, model => model.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_names() {
        for (i, kind) in ModelKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(ModelKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ModelKind::from_name("SCHRODINGER"), Some(ModelKind::Schrodinger));
        assert_eq!(ModelKind::from_name("thomson"), None);
    }

    #[test]
    fn models_are_built_with_scoped_names() {
        let config = SimulationConfig::default();
        let root = StateScope::root("simulation");
        for kind in ModelKind::ALL {
            let model = AtomicModel::new(kind, &config, &root);
            let state = model.state();
            assert_eq!(model.kind(), kind);
            assert_eq!(state.kind, kind);
            assert_eq!(state.scope.path(), format!("simulation.{}Model", kind.name()));
            assert_eq!(state.electron.is_some(), kind.is_quantized());
        }
    }
}
