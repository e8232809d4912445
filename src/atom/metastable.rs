use crate::atom::model::StepContext;
use crate::config::SimulationConfig;
use crate::physics::electron::QuantumNumbers;
use crate::physics::photon::{PhotonId, PhotonRequest, PhotonSource};
use crate::physics::transitions;
use crate::scope::StateScope;
use crate::simulation::light::Light;
use glam::DVec2;
use log::debug;
use rand::Rng;
use std::f64::consts::FRAC_PI_2;

/// Watches the Schrödinger electron for the (2,0,0) trap and, depending on the light,
/// either fires absorbable photons at it on a timer or offers a manual "excite" action.
#[derive(Clone, Debug)]
pub struct MetastableHandler {
    scope: StateScope,
    metastable: bool,
    elapsed: f64,
    interval: f64,
}

impl MetastableHandler {
    pub fn new(config: &SimulationConfig, scope: StateScope) -> Self {
        Self {
            scope,
            metastable: false,
            elapsed: 0.0,
            interval: config.metastable.intervention_interval,
        }
    }

    pub fn is_metastable(&self) -> bool {
        self.metastable
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn update(&mut self, state: QuantumNumbers) {
        let metastable = state.is_metastable();
        if self.metastable && !metastable {
            self.elapsed = 0.0;
        }
        self.metastable = metastable;
    }

    /// Only offered while stuck under monochromatic light.
    pub fn can_excite(&self, light: &Light) -> bool {
        self.metastable && light.is_on() && light.is_monochromatic()
    }

    /// Under white light, fires an absorbable photon every `interval` seconds while stuck.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        dt: f64,
        light: &Light,
        center: DVec2,
        ctx: &mut StepContext<'_, R>,
    ) -> Option<PhotonId> {
        if !(self.metastable && light.is_on() && light.is_white()) {
            return None;
        }
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return None;
        }
        self.elapsed = 0.0;
        debug!("{}: firing photon to leave the metastable state", self.scope);
        Some(fire_absorbable_photon(light, center, ctx))
    }

    pub fn excite<R: Rng + ?Sized>(
        &mut self,
        light: &Light,
        center: DVec2,
        ctx: &mut StepContext<'_, R>,
    ) -> Option<PhotonId> {
        if !self.can_excite(light) {
            return None;
        }
        debug!("{}: excite", self.scope);
        Some(fire_absorbable_photon(light, center, ctx))
    }

    pub fn reset(&mut self) {
        self.metastable = false;
        self.elapsed = 0.0;
    }
}

/// A light photon, aimed straight up at the atom, that (2,0,0) can absorb.
fn fire_absorbable_photon<R: Rng + ?Sized>(
    light: &Light,
    center: DVec2,
    ctx: &mut StepContext<'_, R>,
) -> PhotonId {
    let wavelengths = transitions::table()
        .absorption_wavelengths(QuantumNumbers::metastable().n);
    let wavelength = wavelengths[ctx.rng.gen_range(0..wavelengths.len())];
    ctx.spawn(PhotonRequest {
        wavelength,
        position: light.bottom_edge(center.x),
        direction: FRAC_PI_2,
        source: PhotonSource::Light,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::photon::PhotonPool;
    use crate::simulation::light::LightMode;
    use rand::rngs::mock::StepRng;

    fn fixture() -> (MetastableHandler, Light) {
        let config = SimulationConfig::default();
        let root = StateScope::root("simulation");
        (
            MetastableHandler::new(&config, root.child("metastableHandler")),
            Light::new(&config, root.child("light")),
        )
    }

    #[test]
    fn white_light_intervenes_on_a_timer() {
        let (mut handler, mut light) = fixture();
        let mut pool = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext {
            photons: &mut pool,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };

        handler.update(QuantumNumbers::metastable());
        assert!(handler.step(5.0, &light, DVec2::ZERO, &mut ctx).is_none());

        light.set_on(true);
        assert!(handler.step(1.5, &light, DVec2::ZERO, &mut ctx).is_none());
        let id = handler.step(0.5, &light, DVec2::ZERO, &mut ctx).unwrap();
        let photon = pool.get(id).unwrap();
        assert_eq!(photon.position, DVec2::new(0.0, -750.0));
        assert_eq!(photon.wavelength, 656.0);
        assert_eq!(handler.elapsed(), 0.0);
    }

    #[test]
    fn leaving_the_state_resets_the_timer() {
        let (mut handler, mut light) = fixture();
        light.set_on(true);
        let mut pool = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext {
            photons: &mut pool,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        handler.update(QuantumNumbers::metastable());
        handler.step(1.0, &light, DVec2::ZERO, &mut ctx);
        assert_eq!(handler.elapsed(), 1.0);

        handler.update(QuantumNumbers::new(3, 1, 0));
        assert!(!handler.is_metastable());
        assert_eq!(handler.elapsed(), 0.0);
        assert!(handler.step(5.0, &light, DVec2::ZERO, &mut ctx).is_none());
    }

    #[test]
    fn excite_only_under_monochromatic_light() {
        let (mut handler, mut light) = fixture();
        let mut pool = PhotonPool::new();
        let mut events = Vec::new();
        let mut rng = StepRng::new(0, 0);
        let mut ctx = StepContext {
            photons: &mut pool,
            events: &mut events,
            rng: &mut rng,
            photon_speed: 600.0,
        };
        handler.update(QuantumNumbers::metastable());
        light.set_on(true);
        assert!(!handler.can_excite(&light));
        assert!(handler.excite(&light, DVec2::ZERO, &mut ctx).is_none());

        light.set_mode(LightMode::Monochromatic);
        assert!(handler.can_excite(&light));
        assert!(handler.excite(&light, DVec2::ZERO, &mut ctx).is_some());
        assert_eq!(pool.len(), 1);
    }
}
