use crate::physics::particle::Particle;
use glam::DVec2;

pub const PROTON_MASS_AMU: f64 = 1.007_276;
pub const NEUTRON_MASS_AMU: f64 = 1.008_665;

/// The hydrogen nucleus. Every atomic model owns exactly one.
#[derive(Clone, Debug, PartialEq)]
pub struct Proton {
    position: DVec2,
}

/// Uncharged nucleon, for heavier isotopes. Protium carries none.
#[derive(Clone, Debug, PartialEq)]
pub struct Neutron {
    position: DVec2,
}

impl Proton {
    pub fn new(position: DVec2) -> Self {
        Self { position }
    }

    pub fn mass(&self) -> f64 {
        PROTON_MASS_AMU
    }

    pub fn charge(&self) -> f64 {
        1.0
    }
}

impl Neutron {
    pub fn new(position: DVec2) -> Self {
        Self { position }
    }

    pub fn mass(&self) -> f64 {
        NEUTRON_MASS_AMU
    }

    pub fn charge(&self) -> f64 {
        0.0
    }
}

impl Particle for Proton {
    fn position(&self) -> DVec2 {
        self.position
    }
}

impl Particle for Neutron {
    fn position(&self) -> DVec2 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_from_nucleus() {
        let proton = Proton::new(DVec2::new(1.0, 1.0));
        assert_eq!(proton.distance_to(DVec2::new(4.0, 5.0)), 5.0);
        assert!(proton.mass() > 1.0);
        assert_eq!(proton.charge(), 1.0);
    }

    #[test]
    fn neutron_is_heavier_and_neutral() {
        let neutron = Neutron::new(DVec2::new(-3.0, 0.0));
        let proton = Proton::new(DVec2::ZERO);
        assert!(neutron.mass() > proton.mass());
        assert_eq!(neutron.charge(), 0.0);
        assert_eq!(neutron.distance_to(proton.position()), 3.0);
    }
}
