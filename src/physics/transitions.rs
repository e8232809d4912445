//! Hydrogen spectral lines between levels 1..=6.
//!
//! Built once from the level energies: Lyman (n=1), Balmer (n=2), Paschen (n=3),
//! Brackett (n=4) and Pfund (n=5) series. Wavelengths are rounded to whole
//! nanometers, the precision photons are generated with.

use crate::constants::{GROUND_STATE, HC, MAX_STATE, WAVELENGTH_CLOSENESS};
use crate::physics::electron::energy;
use once_cell::sync::Lazy;

/// Einstein A coefficients (10⁸ s⁻¹), indexed `[upper - 1][lower - 1]`.
const EINSTEIN_A: [[f64; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [4.699, 0.0, 0.0, 0.0, 0.0],
    [0.5575, 0.4410, 0.0, 0.0, 0.0],
    [0.1278, 0.08419, 0.08986, 0.0, 0.0],
    [0.04125, 0.02530, 0.02201, 0.02699, 0.0],
    [0.01644, 0.009732, 0.007783, 0.007711, 0.01025],
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub lower: u8,
    pub upper: u8,
    /// nm
    pub wavelength: f64,
    /// Relative probability of the downward transition.
    pub strength: f64,
}

#[derive(Debug)]
pub struct TransitionTable {
    transitions: Vec<Transition>,
}

static HYDROGEN: Lazy<TransitionTable> = Lazy::new(TransitionTable::hydrogen);

/// The process-wide hydrogen table.
pub fn table() -> &'static TransitionTable {
    &HYDROGEN
}

/// Photon energy in eV for a wavelength in nm.
pub fn wavelength_to_energy(wavelength: f64) -> f64 {
    HC / wavelength
}

/// Wavelength in nm of a photon carrying `energy` eV.
pub fn energy_to_wavelength(energy: f64) -> f64 {
    HC / energy
}

/// Unrounded wavelength of the photon exchanged between two levels.
pub fn exact_wavelength(n1: u8, n2: u8) -> f64 {
    energy_to_wavelength((energy(n2) - energy(n1)).abs())
}

impl TransitionTable {
    fn hydrogen() -> Self {
        let mut transitions = Vec::new();
        for lower in GROUND_STATE..MAX_STATE {
            for upper in (lower + 1)..=MAX_STATE {
                transitions.push(Transition {
                    lower,
                    upper,
                    wavelength: exact_wavelength(lower, upper).round(),
                    strength: EINSTEIN_A[usize::from(upper - 1)][usize::from(lower - 1)],
                });
            }
        }
        Self { transitions }
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Wavelengths that can lift an electron out of level `n`, ordered by target level.
    pub fn absorption_wavelengths(&self, n: u8) -> Vec<f64> {
        self.transitions
            .iter()
            .filter(|transition| transition.lower == n)
            .map(|transition| transition.wavelength)
            .collect()
    }

    /// The (lower, upper) pair a wavelength belongs to.
    pub fn transition_for(&self, wavelength: f64) -> Option<(u8, u8)> {
        self.find(wavelength)
            .map(|transition| (transition.lower, transition.upper))
    }

    pub fn all_wavelengths(&self) -> Vec<f64> {
        self.transitions
            .iter()
            .map(|transition| transition.wavelength)
            .collect()
    }

    /// Level reached by absorbing `wavelength` from level `n`, if any.
    pub fn absorption_target(&self, n: u8, wavelength: f64) -> Option<u8> {
        self.find(wavelength)
            .filter(|transition| transition.lower == n)
            .map(|transition| transition.upper)
    }

    /// Level reached by emitting `wavelength` from level `n`, if any.
    pub fn emission_target(&self, n: u8, wavelength: f64) -> Option<u8> {
        self.find(wavelength)
            .filter(|transition| transition.upper == n)
            .map(|transition| transition.lower)
    }

    /// Rounded wavelength for a jump between two levels, in either direction.
    pub fn wavelength(&self, n1: u8, n2: u8) -> Option<f64> {
        let (lower, upper) = if n1 < n2 { (n1, n2) } else { (n2, n1) };
        self.transitions
            .iter()
            .find(|transition| transition.lower == lower && transition.upper == upper)
            .map(|transition| transition.wavelength)
    }

    /// Strength of the downward transition `upper → lower`; zero when no such line exists.
    pub fn strength(&self, upper: u8, lower: u8) -> f64 {
        self.transitions
            .iter()
            .find(|transition| transition.lower == lower && transition.upper == upper)
            .map_or(0.0, |transition| transition.strength)
    }

    fn find(&self, wavelength: f64) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|transition| (transition.wavelength - wavelength).abs() < WAVELENGTH_CLOSENESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_lines() {
        let table = table();
        assert_eq!(table.wavelength(1, 2), Some(122.0));
        assert_eq!(table.wavelength(2, 3), Some(656.0));
        assert_eq!(table.wavelength(3, 2), Some(656.0));
        assert_eq!(table.wavelength(2, 4), Some(486.0));
        assert_eq!(table.wavelength(1, 6), Some(94.0));
        assert_eq!(table.transitions().len(), 15);
    }

    #[test]
    fn every_wavelength_belongs_to_exactly_one_lower_state() {
        let table = table();
        for wavelength in table.all_wavelengths() {
            let (n1, n2) = table.transition_for(wavelength).unwrap();
            assert!(n1 < n2);
            let owners: Vec<u8> = (1..=6)
                .filter(|&n| table.absorption_wavelengths(n).contains(&wavelength))
                .collect();
            assert_eq!(owners, vec![n1]);
        }
    }

    #[test]
    fn energy_conversion_is_monotonic_and_invertible() {
        let mut wavelengths = table().all_wavelengths();
        wavelengths.sort_by(f64::total_cmp);
        for pair in wavelengths.windows(2) {
            assert!(wavelength_to_energy(pair[0]) > wavelength_to_energy(pair[1]));
        }
        for wavelength in wavelengths {
            let back = energy_to_wavelength(wavelength_to_energy(wavelength));
            assert!((back - wavelength).abs() < 1e-9);
        }
    }

    #[test]
    fn absorption_and_emission_targets() {
        let table = table();
        assert_eq!(table.absorption_target(1, 122.0), Some(2));
        assert_eq!(table.absorption_target(2, 122.0), None);
        assert_eq!(table.emission_target(2, 122.0), Some(1));
        assert_eq!(table.emission_target(1, 122.0), None);
        assert_eq!(table.absorption_target(6, 122.0), None);
        assert_eq!(table.transition_for(500.0), None);
    }

    #[test]
    fn ground_state_absorbs_lyman_series() {
        assert_eq!(
            table().absorption_wavelengths(1),
            vec![122.0, 103.0, 97.0, 95.0, 94.0]
        );
        assert!(table().absorption_wavelengths(6).is_empty());
    }

    #[test]
    fn strengths_are_positive_for_downward_lines() {
        let table = table();
        for upper in 2..=6u8 {
            for lower in 1..upper {
                assert!(table.strength(upper, lower) > 0.0);
            }
            assert_eq!(table.strength(upper, upper), 0.0);
        }
    }
}
