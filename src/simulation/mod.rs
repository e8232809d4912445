//! The simulation engine: one light, the experiment atom and six predictive
//! models (one of them active), a spectrometer, and the pool of photons flying
//! between them.

pub mod density;
pub mod events;
pub mod light;
pub mod spectrometer;

use crate::atom::metastable::MetastableHandler;
use crate::atom::model::{ATOM_CENTER, AtomState, AtomicBehavior, AtomicModel, ModelKind, StepContext};
use crate::config::SimulationConfig;
use crate::error::SimResult;
use crate::physics::photon::{Photon, PhotonId, PhotonPool, PhotonRequest};
use crate::scope::StateScope;
use events::SimEvent;
use glam::DVec2;
use light::Light;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use spectrometer::Spectrometer;
use std::fmt;

/// Whether the box shows the real hydrogen atom or one of the predictive models.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelMode {
    #[default]
    Experiment,
    Prediction,
}

/// The model that plays the real atom in experiment mode.
pub const EXPERIMENT_MODEL: ModelKind = ModelKind::Schrodinger;

/// Which atom is in the box. The experiment atom is a separate instance from the
/// Schrödinger prediction even though both behave the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtomSource {
    Experiment,
    Prediction(ModelKind),
}

impl AtomSource {
    pub fn kind(self) -> ModelKind {
        match self {
            AtomSource::Experiment => EXPERIMENT_MODEL,
            AtomSource::Prediction(kind) => kind,
        }
    }
}

impl fmt::Display for AtomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomSource::Experiment => write!(f, "experiment"),
            AtomSource::Prediction(kind) => write!(f, "{kind} prediction"),
        }
    }
}

pub struct Simulation<R: Rng = ChaCha8Rng> {
    scope: StateScope,
    config: SimulationConfig,
    rng: R,
    photon_speed: f64,
    half_extent: DVec2,
    mode: ModelMode,
    prediction: ModelKind,
    experiment: AtomicModel,
    models: Vec<AtomicModel>,
    photons: PhotonPool,
    light: Light,
    spectrometer: Spectrometer,
    metastable: MetastableHandler,
    events: Vec<SimEvent>,
    time: f64,
}

impl Simulation<ChaCha8Rng> {
    /// Seeded from `config.run.seed`.
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(config.run.seed))
    }
}

fn build_atoms(config: &SimulationConfig, scope: &StateScope) -> (AtomicModel, Vec<AtomicModel>) {
    let experiment = AtomicModel::new(EXPERIMENT_MODEL, config, &scope.child("experiment"));
    let models = ModelKind::ALL
        .into_iter()
        .map(|kind| AtomicModel::new(kind, config, scope))
        .collect();
    (experiment, models)
}

impl<R: Rng> Simulation<R> {
    pub fn with_rng(config: &SimulationConfig, rng: R) -> SimResult<Self> {
        config.validate()?;
        let scope = StateScope::root("simulation");
        let (experiment, models) = build_atoms(config, &scope);
        Ok(Self {
            config: config.clone(),
            rng,
            photon_speed: config.space.photon_speed,
            half_extent: DVec2::new(config.space.box_width, config.space.box_height) / 2.0,
            mode: ModelMode::default(),
            prediction: ModelKind::BilliardBall,
            experiment,
            models,
            photons: PhotonPool::new(),
            light: Light::new(config, scope.child("light")),
            spectrometer: Spectrometer::new(config, scope.child("spectrometer")),
            metastable: MetastableHandler::new(config, scope.child("metastableHandler")),
            events: Vec::new(),
            time: 0.0,
            scope,
        })
    }

    pub fn scope(&self) -> &StateScope {
        &self.scope
    }

    /// Seconds simulated since construction or the last reset.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advances one frame: light, then the active model, then the metastable handler,
    /// then photons that left the box are dropped.
    pub fn step(&mut self, dt: f64) {
        let mut ctx = StepContext {
            photons: &mut self.photons,
            events: &mut self.events,
            rng: &mut self.rng,
            photon_speed: self.photon_speed,
        };

        if let Some(request) = self.light.step(dt, ctx.rng) {
            ctx.spawn(request);
        }

        let prediction = self.prediction.index();
        let model = match self.mode {
            ModelMode::Experiment => &mut self.experiment,
            ModelMode::Prediction => &mut self.models[prediction],
        };
        model.step(dt, &mut ctx);

        if let Some(schrodinger) = model.as_schrodinger() {
            self.metastable.update(schrodinger.quantum_state());
            self.metastable
                .step(dt, &self.light, schrodinger.center(), &mut ctx);
        }

        self.cull_escaped_photons();
        self.time += dt;
    }

    fn cull_escaped_photons(&mut self) {
        let escaped: Vec<PhotonId> = self
            .photons
            .iter()
            .filter(|photon| !self.contains(photon.position))
            .map(Photon::id)
            .collect();
        for id in escaped {
            let Some(photon) = self.photons.remove(id) else {
                continue;
            };
            if photon.was_emitted_by_atom() {
                self.spectrometer.record_emission(photon.wavelength);
            }
            self.events.push(SimEvent::PhotonRemoved { id });
        }
    }

    /// Whether `point` lies inside the box.
    pub fn contains(&self, point: DVec2) -> bool {
        let offset = (point - ATOM_CENTER).abs();
        offset.x <= self.half_extent.x && offset.y <= self.half_extent.y
    }

    pub fn mode(&self) -> ModelMode {
        self.mode
    }

    pub fn prediction_model(&self) -> ModelKind {
        self.prediction
    }

    pub fn active_source(&self) -> AtomSource {
        match self.mode {
            ModelMode::Experiment => AtomSource::Experiment,
            ModelMode::Prediction => AtomSource::Prediction(self.prediction),
        }
    }

    pub fn active_kind(&self) -> ModelKind {
        self.active_source().kind()
    }

    pub fn set_mode(&mut self, mode: ModelMode) {
        let from = self.active_source();
        self.mode = mode;
        self.switched_from(from);
    }

    /// Remembered in experiment mode; takes effect in prediction mode.
    pub fn set_prediction_model(&mut self, kind: ModelKind) {
        let from = self.active_source();
        self.prediction = kind;
        self.switched_from(from);
    }

    /// Clears photons and resets the atom being left. A no-op if the same atom stays.
    fn switched_from(&mut self, from: AtomSource) {
        let to = self.active_source();
        if from == to {
            return;
        }
        self.photons.clear();
        self.atom_mut(from).reset();
        self.metastable.reset();
        debug!("{}: switched from {} to {}", self.scope, from, to);
        self.events.push(SimEvent::ModelSwitched { from, to });
    }

    pub fn atom(&self, source: AtomSource) -> &AtomicModel {
        match source {
            AtomSource::Experiment => &self.experiment,
            AtomSource::Prediction(kind) => &self.models[kind.index()],
        }
    }

    pub fn atom_mut(&mut self, source: AtomSource) -> &mut AtomicModel {
        match source {
            AtomSource::Experiment => &mut self.experiment,
            AtomSource::Prediction(kind) => &mut self.models[kind.index()],
        }
    }

    pub fn active_model(&self) -> &AtomicModel {
        self.atom(self.active_source())
    }

    pub fn active_model_mut(&mut self) -> &mut AtomicModel {
        self.atom_mut(self.active_source())
    }

    pub fn experiment_model(&self) -> &AtomicModel {
        &self.experiment
    }

    /// The predictive instance of `kind`.
    pub fn model(&self, kind: ModelKind) -> &AtomicModel {
        &self.models[kind.index()]
    }

    /// State views of the experiment atom followed by every prediction, for an external
    /// state tree.
    pub fn atom_states(&self) -> Vec<AtomState> {
        std::iter::once(&self.experiment)
            .chain(&self.models)
            .map(AtomicBehavior::state)
            .collect()
    }

    /// Puts a Schrödinger atom into (n, l, m) without a physical transition: the active
    /// one if it is Schrödinger, otherwise the experiment atom.
    pub fn restore_schrodinger_state(&mut self, n: u8, l: u8, m: i8) -> SimResult<()> {
        let active = self.active_source();
        let target = if active.kind() == ModelKind::Schrodinger {
            active
        } else {
            AtomSource::Experiment
        };
        let Some(schrodinger) = self.atom_mut(target).as_schrodinger_mut() else {
            unreachable!("experiment and Schrödinger slots hold Schrödinger atoms");
        };
        schrodinger.restore_state(n, l, m)?;
        let state = schrodinger.quantum_state();
        if target == active {
            self.metastable.update(state);
        }
        Ok(())
    }

    pub fn is_metastable(&self) -> bool {
        self.active_kind() == ModelKind::Schrodinger && self.metastable.is_metastable()
    }

    pub fn can_excite(&self) -> bool {
        self.is_metastable() && self.metastable.can_excite(&self.light)
    }

    /// Fires a photon that lifts the electron out of (2,0,0), if offered.
    pub fn excite(&mut self) -> Option<PhotonId> {
        if !self.can_excite() {
            return None;
        }
        let mut ctx = StepContext {
            photons: &mut self.photons,
            events: &mut self.events,
            rng: &mut self.rng,
            photon_speed: self.photon_speed,
        };
        self.metastable.excite(&self.light, ATOM_CENTER, &mut ctx)
    }

    /// Adds a photon from outside, e.g. a photon gun.
    pub fn inject_photon(&mut self, request: PhotonRequest) -> PhotonId {
        let mut ctx = StepContext {
            photons: &mut self.photons,
            events: &mut self.events,
            rng: &mut self.rng,
            photon_speed: self.photon_speed,
        };
        ctx.spawn(request)
    }

    pub fn photons(&self) -> &PhotonPool {
        &self.photons
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn light_mut(&mut self) -> &mut Light {
        &mut self.light
    }

    pub fn spectrometer(&self) -> &Spectrometer {
        &self.spectrometer
    }

    pub fn spectrometer_mut(&mut self) -> &mut Spectrometer {
        &mut self.spectrometer
    }

    /// Snapshot tagged with the atom in the box.
    pub fn take_snapshot(&mut self) -> SimResult<u32> {
        let source = self.active_source();
        self.spectrometer.take_snapshot(source)
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Back to the initial state, atoms rebuilt with their view and test switches.
    /// The random source is not rewound.
    pub fn reset(&mut self) {
        self.photons.clear();
        self.events.clear();
        let (experiment, models) = build_atoms(&self.config, &self.scope);
        self.experiment = experiment;
        self.models = models;
        self.mode = ModelMode::default();
        self.prediction = ModelKind::BilliardBall;
        self.light.reset();
        self.spectrometer.reset();
        self.metastable.reset();
        self.time = 0.0;
        info!("{}: reset", self.scope);
    }
}
