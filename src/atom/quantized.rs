//! Machinery shared by the quantized models (Bohr, de Broglie, Schrödinger):
//! orbit geometry, collision tests, interaction probabilities and the
//! spontaneous-decay clock.

use crate::atom::model::ATOM_CENTER;
use crate::config::SimulationConfig;
use crate::physics::electron::{QuantumElectron, orbit_radius};
use crate::physics::nucleus::Proton;
use crate::physics::photon::Photon;
use crate::physics::transitions;
use glam::DVec2;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// How a photon is tested against the electron.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CollisionGeometry {
    /// Photon within `threshold` of the electron itself.
    Electron { threshold: f64 },
    /// Photon within `threshold` of the circular orbit.
    Ring { threshold: f64 },
    /// Photon within `threshold` of the orbit squashed vertically by `y_scale`.
    Ellipse { threshold: f64, y_scale: f64 },
}

#[derive(Clone, Debug)]
pub struct QuantizedAtom {
    center: DVec2,
    proton: Proton,
    ground_orbit_radius: f64,
    absorption_probability: f64,
    stimulated_emission_probability: f64,
    spontaneous_emission_probability: f64,
    min_time_in_state: f64,
    mean_lifetime: f64,
    angle_delta: f64,
    certain_absorption: bool,
}

impl QuantizedAtom {
    pub fn new(config: &SimulationConfig) -> Self {
        let bohr = &config.bohr;
        Self {
            center: ATOM_CENTER,
            proton: Proton::new(ATOM_CENTER),
            ground_orbit_radius: bohr.ground_orbit_radius,
            absorption_probability: bohr.absorption_probability,
            stimulated_emission_probability: bohr.stimulated_emission_probability,
            spontaneous_emission_probability: bohr.spontaneous_emission_probability,
            min_time_in_state: bohr.min_time_in_state,
            mean_lifetime: bohr.mean_lifetime,
            angle_delta: bohr.angle_delta,
            certain_absorption: false,
        }
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn proton(&self) -> &Proton {
        &self.proton
    }

    pub fn orbit_radius(&self, n: u8) -> f64 {
        orbit_radius(n, self.ground_orbit_radius)
    }

    pub fn electron_position(&self, electron: &QuantumElectron) -> DVec2 {
        electron.position(self.center, self.ground_orbit_radius)
    }

    /// Makes every matching photon absorbed, regardless of the configured probability.
    pub fn set_certain_absorption(&mut self, certain: bool) {
        self.certain_absorption = certain;
    }

    pub fn is_certain_absorption(&self) -> bool {
        self.certain_absorption
    }

    pub fn collides(
        &self,
        geometry: CollisionGeometry,
        electron: &QuantumElectron,
        photon: &Photon,
    ) -> bool {
        let radius = self.orbit_radius(electron.n());
        match geometry {
            CollisionGeometry::Electron { threshold } => {
                self.electron_position(electron).distance(photon.position) <= threshold
            }
            CollisionGeometry::Ring { threshold } => {
                (photon.position.distance(self.center) - radius).abs() <= threshold
            }
            CollisionGeometry::Ellipse { threshold, y_scale } => {
                distance_to_ellipse(photon.position - self.center, radius, radius * y_scale)
                    <= threshold
            }
        }
    }

    pub fn absorption_succeeds<R: Rng + ?Sized>(&self, rng: &mut R, certain: bool) -> bool {
        certain || self.certain_absorption || rng.gen_bool(self.absorption_probability)
    }

    pub fn stimulated_emission_succeeds<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.stimulated_emission_probability)
    }

    /// Chance of decaying during the next `dt`. The hazard is zero for the
    /// minimum dwell time, then grows linearly with time in state.
    pub fn decay_probability(&self, electron: &QuantumElectron, dt: f64) -> f64 {
        if electron.n() <= 1 {
            return 0.0;
        }
        let excess = electron.time_in_state() - self.min_time_in_state;
        if excess < 0.0 {
            return 0.0;
        }
        let hazard = self.spontaneous_emission_probability * excess / self.mean_lifetime.powi(2);
        (1.0 - (-hazard * dt).exp()).clamp(0.0, 1.0)
    }

    pub fn decays<R: Rng + ?Sized>(&self, rng: &mut R, electron: &QuantumElectron, dt: f64) -> bool {
        let probability = self.decay_probability(electron, dt);
        probability > 0.0 && rng.gen_bool(probability)
    }

    /// Orbit angle change over `dt`; outer orbits turn more slowly.
    pub fn angle_step(&self, n: u8, dt: f64) -> f64 {
        self.angle_delta / f64::from(n).powi(2) * dt
    }

    /// Picks a lower level weighted by transition strength among those `allowed`.
    pub fn choose_lower_n<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: u8,
        allowed: impl Fn(u8) -> bool,
    ) -> Option<u8> {
        let table = transitions::table();
        let candidates: Vec<(u8, f64)> = (1..n)
            .filter(|&lower| allowed(lower))
            .map(|lower| (lower, table.strength(n, lower)))
            .filter(|&(_, strength)| strength > 0.0)
            .collect();
        match candidates.len() {
            0 => None,
            1 => Some(candidates[0].0),
            _ => {
                let weights = WeightedIndex::new(candidates.iter().map(|(_, w)| *w)).ok()?;
                Some(candidates[weights.sample(rng)].0)
            }
        }
    }

    /// Random point on the ground-state orbit.
    pub fn random_ground_orbit_point<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec2 {
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        self.center + DVec2::new(angle.cos(), angle.sin()) * self.ground_orbit_radius
    }
}

/// Shortest distance from `point` to the axis-aligned ellipse with semi-axes `a` (x) and `b` (y),
/// both centered on the origin.
pub fn distance_to_ellipse(point: DVec2, a: f64, b: f64) -> f64 {
    // Solve in the first quadrant with the major axis along x.
    let (e0, e1, y0, y1) = if a >= b {
        (a, b, point.x.abs(), point.y.abs())
    } else {
        (b, a, point.y.abs(), point.x.abs())
    };

    if y1 > 0.0 {
        if y0 > 0.0 {
            let z0 = y0 / e0;
            let z1 = y1 / e1;
            let g = z0 * z0 + z1 * z1 - 1.0;
            if g == 0.0 {
                return 0.0;
            }
            let r0 = (e0 / e1).powi(2);
            let s = ellipse_root(r0, z0, z1, g);
            let x0 = r0 * y0 / (s + r0);
            let x1 = y1 / (s + 1.0);
            DVec2::new(x0 - y0, x1 - y1).length()
        } else {
            (y1 - e1).abs()
        }
    } else {
        let numer0 = e0 * y0;
        let denom0 = e0 * e0 - e1 * e1;
        if numer0 < denom0 {
            let xde0 = numer0 / denom0;
            let x0 = e0 * xde0;
            let x1 = e1 * (1.0 - xde0 * xde0).max(0.0).sqrt();
            DVec2::new(x0 - y0, x1).length()
        } else {
            (y0 - e0).abs()
        }
    }
}

fn ellipse_root(r0: f64, z0: f64, z1: f64, mut g: f64) -> f64 {
    let n0 = r0 * z0;
    let mut s0 = z1 - 1.0;
    let mut s1 = if g < 0.0 {
        0.0
    } else {
        DVec2::new(n0, z1).length() - 1.0
    };
    let mut s = 0.0;
    for _ in 0..200 {
        s = 0.5 * (s0 + s1);
        if s == s0 || s == s1 {
            break;
        }
        let ratio0 = n0 / (s + r0);
        let ratio1 = z1 / (s + 1.0);
        g = ratio0 * ratio0 + ratio1 * ratio1 - 1.0;
        if g > 0.0 {
            s0 = s;
        } else if g < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn ellipse_distance_on_axes() {
        assert!((distance_to_ellipse(DVec2::new(0.0, 0.0), 10.0, 5.0) - 5.0).abs() < 1e-9);
        assert!((distance_to_ellipse(DVec2::new(12.0, 0.0), 10.0, 5.0) - 2.0).abs() < 1e-9);
        assert!((distance_to_ellipse(DVec2::new(0.0, -9.0), 10.0, 5.0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn ellipse_distance_matches_circle() {
        let point = DVec2::new(3.0, 4.0) * 3.0;
        assert!((distance_to_ellipse(point, 10.0, 10.0) - 5.0).abs() < 1e-6);
        assert!(distance_to_ellipse(DVec2::new(6.0, 8.0), 10.0, 10.0) < 1e-6);
    }

    #[test]
    fn decay_hazard_grows_with_time_in_state() {
        let atom = QuantizedAtom::new(&SimulationConfig::default());
        let mut electron = QuantumElectron::new(3, 0.0);
        assert_eq!(atom.decay_probability(&electron, 0.1), 0.0);
        electron.tick(1.0);
        let early = atom.decay_probability(&electron, 0.1);
        electron.tick(1.0);
        let late = atom.decay_probability(&electron, 0.1);
        assert!(early > 0.0 && late > early && late <= 1.0);

        let mut ground = QuantumElectron::new(1, 0.0);
        ground.tick(100.0);
        assert_eq!(atom.decay_probability(&ground, 0.1), 0.0);
    }

    #[test]
    fn lower_level_choice_respects_filter() {
        let atom = QuantizedAtom::new(&SimulationConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(atom.choose_lower_n(&mut rng, 1, |_| true), None);
        assert_eq!(atom.choose_lower_n(&mut rng, 2, |_| true), Some(1));
        assert_eq!(atom.choose_lower_n(&mut rng, 4, |n| n == 3), Some(3));
        assert_eq!(atom.choose_lower_n(&mut rng, 4, |_| false), None);
        for _ in 0..100 {
            let lower = atom.choose_lower_n(&mut rng, 6, |_| true).unwrap();
            assert!((1..6).contains(&lower));
        }
    }

    #[test]
    fn ring_and_electron_geometry() {
        let atom = QuantizedAtom::new(&SimulationConfig::default());
        let electron = QuantumElectron::new(2, 0.0);
        let mut pool = crate::physics::photon::PhotonPool::new();
        let id = pool.spawn(crate::physics::photon::PhotonRequest {
            wavelength: 656.0,
            position: DVec2::new(0.0, -60.0),
            direction: std::f64::consts::FRAC_PI_2,
            source: crate::physics::photon::PhotonSource::Light,
        });
        let photon = pool.get(id).unwrap();
        assert!(atom.collides(CollisionGeometry::Ring { threshold: 5.0 }, &electron, photon));
        // The electron sits at (60, 0), far from the photon.
        assert!(!atom.collides(CollisionGeometry::Electron { threshold: 5.0 }, &electron, photon));
        assert!(!atom.collides(
            CollisionGeometry::Ellipse {
                threshold: 5.0,
                y_scale: 0.35
            },
            &electron,
            photon
        ));
    }
}
