use crate::atom::model::{ATOM_CENTER, AtomState, AtomicBehavior, ModelKind, StepContext};
use crate::physics::nucleus::Proton;
use crate::physics::particle::Particle;
use crate::physics::photon::{Photon, PhotonId};
use crate::scope::StateScope;
use glam::DVec2;
use rand::Rng;

pub const BALL_RADIUS: f64 = 30.0;

/// The atom as a solid ball. Photons bounce off it once and nothing else happens.
#[derive(Clone, Debug)]
pub struct BilliardBallModel {
    scope: StateScope,
    proton: Proton,
    radius: f64,
}

impl BilliardBallModel {
    pub fn new(scope: StateScope) -> Self {
        Self {
            scope,
            proton: Proton::new(ATOM_CENTER),
            radius: BALL_RADIUS,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// Mirrors `direction` about the surface normal at `position`.
fn reflect(direction: f64, position: DVec2, center: DVec2) -> f64 {
    let normal = (position - center).normalize_or_zero();
    if normal == DVec2::ZERO {
        return direction + std::f64::consts::PI;
    }
    let incoming = DVec2::new(direction.cos(), direction.sin());
    let outgoing = incoming - 2.0 * incoming.dot(normal) * normal;
    outgoing.y.atan2(outgoing.x)
}

impl AtomicBehavior for BilliardBallModel {
    fn kind(&self) -> ModelKind {
        ModelKind::BilliardBall
    }

    fn collides(&self, photon: &Photon) -> bool {
        !photon.collided && self.proton.distance_to(photon.position) <= self.radius
    }

    fn process_photon<R: Rng + ?Sized>(&mut self, id: PhotonId, ctx: &mut StepContext<'_, R>) {
        let center = self.proton.position();
        let Some(photon) = ctx.photons.get_mut(id) else {
            return;
        };
        if !self.collides(photon) {
            return;
        }
        photon.direction = reflect(photon.direction, photon.position, center);
        photon.collided = true;
    }

    fn advance_clock<R: Rng + ?Sized>(&mut self, _dt: f64, _ctx: &mut StepContext<'_, R>) {}

    fn reset(&mut self) {}

    fn state(&self) -> AtomState {
        AtomState {
            scope: self.scope.clone(),
            kind: ModelKind::BilliardBall,
            electron: None,
            electron_position: None,
            electron_angle: None,
            time_in_state: None,
        }
    }
}
