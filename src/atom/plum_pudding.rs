use crate::atom::model::{ATOM_CENTER, AtomState, AtomicBehavior, ModelKind, StepContext};
use crate::physics::electron::Electron;
use crate::physics::nucleus::Proton;
use crate::physics::particle::Particle;
use crate::physics::photon::{Photon, PhotonId};
use crate::scope::StateScope;
use glam::DVec2;
use log::trace;
use rand::Rng;
use std::f64::consts::TAU;

pub const PUDDING_RADIUS: f64 = 30.0;
pub const ELECTRON_COLLISION_DISTANCE: f64 = 10.0;
pub const MAX_PHOTONS_ABSORBED: usize = 1;
pub const ABSORPTION_PROBABILITY: f64 = 0.5;
/// Chance of emitting at the end of each oscillation while holding a photon.
pub const EMISSION_PROBABILITY: f64 = 0.1;
/// The only wavelength the pudding ever emits.
pub const EMISSION_WAVELENGTH: f64 = 150.0;
pub const OSCILLATION_PERIOD: f64 = 1.0;
/// Fraction of the pudding radius added to the swing per absorbed photon.
pub const AMPLITUDE_PER_PHOTON: f64 = 1.0;

/// Thomson's atom: an electron embedded in a positive pudding, oscillating when excited.
#[derive(Clone, Debug)]
pub struct PlumPuddingModel {
    scope: StateScope,
    proton: Proton,
    electron: Electron,
    line_angle: f64,
    phase: f64,
    amplitude: f64,
    photons_held: usize,
}

impl PlumPuddingModel {
    pub fn new(scope: StateScope) -> Self {
        Self {
            scope,
            proton: Proton::new(ATOM_CENTER),
            electron: Electron::new(ATOM_CENTER),
            line_angle: 0.0,
            phase: 0.0,
            amplitude: 0.0,
            photons_held: 0,
        }
    }

    pub fn electron(&self) -> &Electron {
        &self.electron
    }

    pub fn photons_held(&self) -> usize {
        self.photons_held
    }

    /// Swing of the electron as a fraction of the pudding radius, in [0, 1].
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn is_oscillating(&self) -> bool {
        self.amplitude > 0.0
    }

    fn place_electron(&mut self) {
        let axis = DVec2::new(self.line_angle.cos(), self.line_angle.sin());
        let offset = axis * (self.amplitude * PUDDING_RADIUS * self.phase.sin());
        self.electron.set_position(self.proton.position() + offset);
    }

    fn settle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.amplitude = 0.0;
        self.phase = 0.0;
        self.line_angle = rng.gen_range(0.0..TAU);
    }
}

impl AtomicBehavior for PlumPuddingModel {
    fn kind(&self) -> ModelKind {
        ModelKind::PlumPudding
    }

    fn collides(&self, photon: &Photon) -> bool {
        !photon.was_emitted_by_atom()
            && self.electron.distance_to(photon.position) <= ELECTRON_COLLISION_DISTANCE
    }

    fn process_photon<R: Rng + ?Sized>(&mut self, id: PhotonId, ctx: &mut StepContext<'_, R>) {
        let Some(photon) = ctx.photons.get(id) else {
            return;
        };
        if !self.collides(photon) || self.photons_held >= MAX_PHOTONS_ABSORBED {
            return;
        }
        if !ctx.rng.gen_bool(ABSORPTION_PROBABILITY) {
            return;
        }
        if ctx.absorb_photon(id).is_some() {
            self.photons_held += 1;
            self.amplitude = (self.amplitude + AMPLITUDE_PER_PHOTON).min(1.0);
            trace!("plumPudding: absorbed photon {:?}", id);
        }
    }

    fn advance_clock<R: Rng + ?Sized>(&mut self, dt: f64, ctx: &mut StepContext<'_, R>) {
        if !self.is_oscillating() {
            return;
        }
        self.phase += TAU * dt / OSCILLATION_PERIOD;
        if self.phase >= TAU {
            self.phase = self.phase.rem_euclid(TAU);
            if self.photons_held > 0 && ctx.rng.gen_bool(EMISSION_PROBABILITY) {
                let direction = ctx.random_direction();
                ctx.emit_photon(EMISSION_WAVELENGTH, self.electron.position(), direction);
                self.photons_held -= 1;
            }
            if self.photons_held == 0 {
                self.settle(ctx.rng);
            }
        }
        self.place_electron();
    }

    fn reset(&mut self) {
        self.amplitude = 0.0;
        self.phase = 0.0;
        self.line_angle = 0.0;
        self.photons_held = 0;
        self.place_electron();
    }

    fn state(&self) -> AtomState {
        AtomState {
            scope: self.scope.clone(),
            kind: ModelKind::PlumPudding,
            electron: None,
            electron_position: Some(self.electron.position()),
            electron_angle: None,
            time_in_state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::photon::{PhotonPool, PhotonRequest, PhotonSource};
    use crate::simulation::events::SimEvent;
    use rand::rngs::mock::StepRng;
    use std::f64::consts::FRAC_PI_2;

    fn photon_at_center(pool: &mut PhotonPool) -> PhotonId {
        pool.spawn(PhotonRequest {
            wavelength: 150.0,
            position: ATOM_CENTER,
            direction: FRAC_PI_2,
            source: PhotonSource::Light,
        })
    }

    #[test]
    fn absorbs_one_photon_then_reemits_at_150_nm() {
        let mut pudding = PlumPuddingModel::new(StateScope::root("pudding"));
        let mut pool = PhotonPool::new();
        let first = photon_at_center(&mut pool);
        let second = photon_at_center(&mut pool);
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext {
            photons: &mut pool,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };

        pudding.process_photon(first, &mut ctx);
        pudding.process_photon(second, &mut ctx);
        assert_eq!(pudding.photons_held(), 1);
        assert!(pudding.is_oscillating());

        pudding.advance_clock(0.6, &mut ctx);
        pudding.advance_clock(0.6, &mut ctx);
        assert_eq!(pudding.photons_held(), 0);
        assert!(!pudding.is_oscillating());

        assert!(pool.get(first).is_none());
        assert!(pool.get(second).is_some());
        let emitted: Vec<_> = pool.iter().filter(|p| p.was_emitted_by_atom()).collect();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].wavelength, EMISSION_WAVELENGTH);
        assert!(matches!(events[0], SimEvent::PhotonAbsorbed { id, .. } if id == first));
        assert!(matches!(events[1], SimEvent::PhotonEmitted { source: PhotonSource::Atom, .. }));
    }

    #[test]
    fn idle_electron_stays_at_center() {
        let mut pudding = PlumPuddingModel::new(StateScope::root("pudding"));
        let mut pool = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext {
            photons: &mut pool,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        pudding.advance_clock(5.0, &mut ctx);
        assert_eq!(pudding.electron().position(), ATOM_CENTER);
        assert!(events.is_empty());
    }
}
