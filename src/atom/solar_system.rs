use crate::atom::model::{ATOM_CENTER, AtomState, AtomicBehavior, ModelKind, StepContext};
use crate::physics::electron::Electron;
use crate::physics::nucleus::Proton;
use crate::physics::particle::Particle;
use crate::physics::photon::{Photon, PhotonId};
use crate::scope::StateScope;
use glam::DVec2;
use log::debug;
use rand::Rng;

pub const INITIAL_RADIUS: f64 = 150.0;
/// Radius lost per second while spiralling in.
pub const RADIUS_DECAY_RATE: f64 = 25.0;
/// Angular speed at the initial radius, rad/s.
pub const INITIAL_ANGULAR_SPEED: f64 = 4.0;
/// Once this close the electron has fallen into the proton.
pub const COLLAPSE_RADIUS: f64 = 5.0;

/// A classical electron orbiting the proton. Radiating energy, it spirals in and the atom collapses.
#[derive(Clone, Debug)]
pub struct SolarSystemModel {
    scope: StateScope,
    proton: Proton,
    electron: Electron,
    radius: f64,
    angle: f64,
    destroyed: bool,
}

impl SolarSystemModel {
    pub fn new(scope: StateScope) -> Self {
        let mut model = Self {
            scope,
            proton: Proton::new(ATOM_CENTER),
            electron: Electron::new(ATOM_CENTER),
            radius: INITIAL_RADIUS,
            angle: 0.0,
            destroyed: false,
        };
        model.place_electron();
        model
    }

    pub fn electron(&self) -> &Electron {
        &self.electron
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Kepler's third law: angular speed grows as r^(-3/2).
    pub fn angular_speed(&self) -> f64 {
        INITIAL_ANGULAR_SPEED * (INITIAL_RADIUS / self.radius.max(COLLAPSE_RADIUS)).powf(1.5)
    }

    fn place_electron(&mut self) {
        let offset = DVec2::new(self.angle.cos(), self.angle.sin()) * self.radius;
        self.electron.set_position(self.proton.position() + offset);
    }
}

impl AtomicBehavior for SolarSystemModel {
    fn kind(&self) -> ModelKind {
        ModelKind::ClassicalSolarSystem
    }

    /// Photons pass straight through.
    fn collides(&self, _photon: &Photon) -> bool {
        false
    }

    fn process_photon<R: Rng + ?Sized>(&mut self, _id: PhotonId, _ctx: &mut StepContext<'_, R>) {}

    fn advance_clock<R: Rng + ?Sized>(&mut self, dt: f64, _ctx: &mut StepContext<'_, R>) {
        if self.destroyed {
            return;
        }
        self.angle = (self.angle - self.angular_speed() * dt).rem_euclid(std::f64::consts::TAU);
        self.radius -= RADIUS_DECAY_RATE * dt;
        if self.radius <= COLLAPSE_RADIUS {
            self.radius = 0.0;
            self.destroyed = true;
            debug!("classicalSolarSystem: electron fell into the nucleus");
        }
        self.place_electron();
    }

    fn reset(&mut self) {
        self.radius = INITIAL_RADIUS;
        self.angle = 0.0;
        self.destroyed = false;
        self.place_electron();
    }

    fn state(&self) -> AtomState {
        AtomState {
            scope: self.scope.clone(),
            kind: ModelKind::ClassicalSolarSystem,
            electron: None,
            electron_position: Some(self.electron.position()),
            electron_angle: Some(self.angle),
            time_in_state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::photon::PhotonPool;
    use rand::rngs::mock::StepRng;

    #[test]
    fn electron_spirals_in_and_collapses() {
        let mut model = SolarSystemModel::new(StateScope::root("solar"));
        let mut pool = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext {
            photons: &mut pool,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        let initial_speed = model.angular_speed();
        model.advance_clock(1.0, &mut ctx);
        assert!(model.radius() < INITIAL_RADIUS);
        assert!(model.angular_speed() > initial_speed);

        for _ in 0..60 {
            model.advance_clock(0.5, &mut ctx);
        }
        assert!(model.is_destroyed());
        assert_eq!(model.electron().position(), ATOM_CENTER);

        model.reset();
        assert!(!model.is_destroyed());
        assert_eq!(model.electron().position(), DVec2::new(INITIAL_RADIUS, 0.0));
    }
}
