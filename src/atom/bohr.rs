use crate::atom::model::{
    AtomState, AtomicBehavior, ElectronState, ModelKind, StepContext,
};
use crate::atom::quantized::{CollisionGeometry, QuantizedAtom};
use crate::config::SimulationConfig;
use crate::constants::{GROUND_STATE, MAX_STATE};
use crate::error::{SimResult, SimulationError};
use crate::physics::electron::QuantumElectron;
use crate::physics::photon::{Photon, PhotonId};
use crate::physics::transitions;
use crate::scope::StateScope;
use glam::DVec2;
use log::debug;
use rand::Rng;

/// Atom whose electron state is the principal number alone.
/// Bohr and de Broglie differ only in how photons find the electron.
#[derive(Clone, Debug)]
pub(crate) struct PrincipalAtom {
    kind: ModelKind,
    atom: QuantizedAtom,
    electron: QuantumElectron,
}

impl PrincipalAtom {
    pub(crate) fn new(kind: ModelKind, config: &SimulationConfig) -> Self {
        Self {
            kind,
            atom: QuantizedAtom::new(config),
            electron: QuantumElectron::new(GROUND_STATE, 0.0),
        }
    }

    pub(crate) fn atom(&self) -> &QuantizedAtom {
        &self.atom
    }

    pub(crate) fn atom_mut(&mut self) -> &mut QuantizedAtom {
        &mut self.atom
    }

    pub(crate) fn electron(&self) -> &QuantumElectron {
        &self.electron
    }

    pub(crate) fn collides(&self, geometry: CollisionGeometry, photon: &Photon) -> bool {
        !photon.was_emitted_by_atom() && self.atom.collides(geometry, &self.electron, photon)
    }

    pub(crate) fn process_photon<R: Rng + ?Sized>(
        &mut self,
        geometry: CollisionGeometry,
        id: PhotonId,
        ctx: &mut StepContext<'_, R>,
    ) {
        let Some(photon) = ctx.photons.get(id) else {
            return;
        };
        if !self.collides(geometry, photon) {
            return;
        }
        let wavelength = photon.wavelength;
        let direction = photon.direction;
        let table = transitions::table();
        let n = self.electron.n();

        if let Some(upper) = table.absorption_target(n, wavelength) {
            if self.atom.absorption_succeeds(ctx.rng, false) {
                ctx.absorb_photon(id);
                debug!("{}: absorbed {wavelength} nm, n {n} -> {upper}", self.kind);
                self.transition(upper, ctx);
            }
        } else if let Some(lower) = table.emission_target(n, wavelength) {
            if self.atom.stimulated_emission_succeeds(ctx.rng) {
                let position = self.atom.electron_position(&self.electron);
                ctx.absorb_photon(id);
                debug!("{}: stimulated emission of {wavelength} nm, n {n} -> {lower}", self.kind);
                self.transition(lower, ctx);
                ctx.emit_photon(wavelength, position, direction);
            }
        }
    }

    pub(crate) fn advance_clock<R: Rng + ?Sized>(&mut self, dt: f64, ctx: &mut StepContext<'_, R>) {
        self.electron.tick(dt);
        if self.atom.decays(ctx.rng, &self.electron, dt) {
            self.spontaneous_emission(ctx);
        }
        let step = self.atom.angle_step(self.electron.n(), dt);
        self.electron.advance_angle(step);
    }

    fn spontaneous_emission<R: Rng + ?Sized>(&mut self, ctx: &mut StepContext<'_, R>) {
        let n = self.electron.n();
        let Some(lower) = self.atom.choose_lower_n(ctx.rng, n, |_| true) else {
            return;
        };
        let Some(wavelength) = transitions::table().wavelength(n, lower) else {
            return;
        };
        let position = self.atom.electron_position(&self.electron);
        let direction = ctx.random_direction();
        debug!("{}: spontaneous emission of {wavelength} nm, n {n} -> {lower}", self.kind);
        self.transition(lower, ctx);
        ctx.emit_photon(wavelength, position, direction);
    }

    fn transition<R: Rng + ?Sized>(&mut self, n: u8, ctx: &mut StepContext<'_, R>) {
        let from = ElectronState::Principal(self.electron.n());
        self.electron.set_n(n);
        ctx.state_changed(self.kind, from, ElectronState::Principal(n));
    }

    /// Sets the level directly; no events fire and no selection rule applies.
    pub(crate) fn restore(&mut self, n: u8) -> SimResult<()> {
        if !(GROUND_STATE..=MAX_STATE).contains(&n) {
            return Err(SimulationError::InvalidQuantumState { n, l: 0, m: 0 });
        }
        self.electron.set_n(n);
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.electron = QuantumElectron::new(GROUND_STATE, 0.0);
    }

    pub(crate) fn state(&self, scope: &StateScope) -> AtomState {
        AtomState {
            scope: scope.clone(),
            kind: self.kind,
            electron: Some(ElectronState::Principal(self.electron.n())),
            electron_position: Some(self.atom.electron_position(&self.electron)),
            electron_angle: Some(self.electron.angle()),
            time_in_state: Some(self.electron.time_in_state()),
        }
    }

    pub(crate) fn absorption_wavelengths(&self) -> Vec<f64> {
        transitions::table().absorption_wavelengths(self.electron.n())
    }
}

/// Bohr's atom: the electron is a point on one of six circular orbits.
#[derive(Clone, Debug)]
pub struct BohrModel {
    scope: StateScope,
    core: PrincipalAtom,
    collision_threshold: f64,
}

impl BohrModel {
    pub fn new(config: &SimulationConfig, scope: StateScope) -> Self {
        Self {
            scope,
            core: PrincipalAtom::new(ModelKind::Bohr, config),
            collision_threshold: config.bohr.collision_threshold,
        }
    }

    pub fn n(&self) -> u8 {
        self.core.electron().n()
    }

    pub fn electron(&self) -> &QuantumElectron {
        self.core.electron()
    }

    pub fn electron_position(&self) -> DVec2 {
        self.core.atom().electron_position(self.core.electron())
    }

    pub fn orbit_radius(&self, n: u8) -> f64 {
        self.core.atom().orbit_radius(n)
    }

    pub fn set_certain_absorption(&mut self, certain: bool) {
        self.core.atom_mut().set_certain_absorption(certain);
    }

    pub fn is_certain_absorption(&self) -> bool {
        self.core.atom().is_certain_absorption()
    }

    /// Puts the electron in level `n` without emitting events, e.g. when loading saved state.
    pub fn restore(&mut self, n: u8) -> SimResult<()> {
        self.core.restore(n)
    }

    fn geometry(&self) -> CollisionGeometry {
        CollisionGeometry::Electron {
            threshold: self.collision_threshold,
        }
    }
}

impl AtomicBehavior for BohrModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Bohr
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::photon::{PhotonPool, PhotonRequest, PhotonSource};
    use crate::simulation::events::SimEvent;
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;
    use std::f64::consts::FRAC_PI_2;

    fn model() -> BohrModel {
        BohrModel::new(&SimulationConfig::default(), StateScope::root("bohr"))
    }

    fn photon_below(pool: &mut PhotonPool, target: DVec2, wavelength: f64) -> PhotonId {
        pool.spawn(PhotonRequest {
            wavelength,
            position: target - DVec2::new(0.0, 2.0),
            direction: FRAC_PI_2,
            source: PhotonSource::Light,
        })
    }

    #[test]
    fn absorbs_lyman_alpha_from_ground_state() {
        let mut bohr = model();
        assert!(!bohr.is_certain_absorption());
        bohr.set_certain_absorption(true);
        assert!(bohr.is_certain_absorption());
        let mut photons = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let id = photon_below(&mut photons, bohr.electron_position(), 122.0);
        let mut ctx = StepContext {
            photons: &mut photons,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        bohr.process_photon(id, &mut ctx);

        assert_eq!(bohr.n(), 2);
        assert!(photons.is_empty());
        assert!(events.contains(&SimEvent::PhotonAbsorbed { id, wavelength: 122.0 }));
        assert!(events.contains(&SimEvent::StateChanged {
            model: ModelKind::Bohr,
            from: ElectronState::Principal(1),
            to: ElectronState::Principal(2),
        }));
    }

    #[test]
    fn ignores_unmatched_wavelength_and_distant_photons() {
        let mut bohr = model();
        let mut photons = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let off_line = photon_below(&mut photons, bohr.electron_position(), 500.0);
        let far = photon_below(&mut photons, DVec2::new(-300.0, 0.0), 122.0);
        let mut ctx = StepContext {
            photons: &mut photons,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        bohr.process_photon(off_line, &mut ctx);
        bohr.process_photon(far, &mut ctx);
        assert_eq!(bohr.n(), 1);
        assert_eq!(photons.len(), 2);
        assert!(events.is_empty());
    }

    #[test]
    fn stimulated_emission_is_coherent() {
        let mut bohr = model();
        bohr.restore(3).unwrap();
        let mut photons = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let position = bohr.electron_position();
        let id = photon_below(&mut photons, position, 656.0);
        let mut ctx = StepContext {
            photons: &mut photons,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        bohr.process_photon(id, &mut ctx);

        assert_eq!(bohr.n(), 2);
        assert!(photons.get(id).is_none());
        let emitted: Vec<_> = photons.iter().collect();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].wavelength, 656.0);
        assert_eq!(emitted[0].direction, FRAC_PI_2);
        assert!(emitted[0].was_emitted_by_atom());
        assert_eq!(emitted[0].position, position);
    }

    #[test]
    fn atom_emitted_photons_never_interact() {
        let mut bohr = model();
        let mut photons = PhotonPool::new();
        let id = photons.spawn(PhotonRequest {
            wavelength: 122.0,
            position: bohr.electron_position(),
            direction: 0.0,
            source: PhotonSource::Atom,
        });
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext {
            photons: &mut photons,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        bohr.process_photon(id, &mut ctx);
        assert_eq!(bohr.n(), 1);
        assert_eq!(photons.len(), 1);
    }

    #[test]
    fn excited_state_eventually_decays_to_ground() {
        let mut bohr = model();
        bohr.restore(4).unwrap();
        let mut photons = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut ctx = StepContext {
            photons: &mut photons,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        for _ in 0..10_000 {
            bohr.advance_clock(1.0 / 60.0, &mut ctx);
            if bohr.n() == 1 {
                break;
            }
        }
        assert_eq!(bohr.n(), 1);
        assert!(!photons.is_empty());
        for photon in photons.iter() {
            assert!(transitions::table().transition_for(photon.wavelength).is_some());
        }
    }

    #[test]
    fn ground_state_never_decays() {
        let mut bohr = model();
        let mut photons = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext {
            photons: &mut photons,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        for _ in 0..1_000 {
            bohr.advance_clock(0.1, &mut ctx);
        }
        assert_eq!(bohr.n(), 1);
        assert!(photons.is_empty());
    }

    #[test]
    fn orbit_angle_advances_clockwise_and_slower_outside() {
        let mut bohr = model();
        let mut photons = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext {
            photons: &mut photons,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        bohr.advance_clock(0.01, &mut ctx);
        let ground_step = std::f64::consts::TAU - bohr.electron().angle();
        bohr.restore(2).unwrap();
        let before = bohr.electron().angle();
        bohr.advance_clock(0.01, &mut ctx);
        let outer_step = before - bohr.electron().angle();
        assert!(ground_step > 0.0);
        assert!((outer_step - ground_step / 4.0).abs() < 1e-9);
    }

    #[test]
    fn restore_rejects_out_of_range_levels() {
        let mut bohr = model();
        assert!(bohr.restore(7).is_err());
        assert!(bohr.restore(0).is_err());
        assert_eq!(bohr.n(), 1);
    }
}
