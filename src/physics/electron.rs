use crate::constants::{GROUND_STATE, GROUND_STATE_ENERGY, MAX_STATE};
use crate::error::{SimResult, SimulationError};
use crate::physics::particle::Particle;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Energy of level `n`, eV.
pub fn energy(n: u8) -> f64 {
    debug_assert!(n >= GROUND_STATE, "Principal quantum number n must be >= 1");
    GROUND_STATE_ENERGY / f64::from(n).powi(2)
}

/// Radius of the circular orbit for level `n`.
pub fn orbit_radius(n: u8, ground_orbit_radius: f64) -> f64 {
    f64::from(n).powi(2) * ground_orbit_radius
}

/// A classical electron: a point charge with no quantum state.
#[derive(Clone, Debug, PartialEq)]
pub struct Electron {
    position: DVec2,
}

impl Electron {
    pub fn new(position: DVec2) -> Self {
        Self { position }
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }
}

impl Particle for Electron {
    fn position(&self) -> DVec2 {
        self.position
    }
}

/// Quantum numbers (n, l, m) that identify a hydrogen orbital.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantumNumbers {
    pub n: u8,
    pub l: u8,
    pub m: i8,
}

impl QuantumNumbers {
    pub fn new(n: u8, l: u8, m: i8) -> Self {
        debug_assert!(
            Self::is_valid(n, l, m),
            "Invalid quantum numbers (n={n}, l={l}, m={m})"
        );
        Self { n, l, m }
    }

    pub fn try_new(n: u8, l: u8, m: i8) -> SimResult<Self> {
        if Self::is_valid(n, l, m) {
            Ok(Self { n, l, m })
        } else {
            Err(SimulationError::InvalidQuantumState { n, l, m })
        }
    }

    /// 1 ≤ n ≤ 6, 0 ≤ l < n, |m| ≤ l.
    pub fn is_valid(n: u8, l: u8, m: i8) -> bool {
        (GROUND_STATE..=MAX_STATE).contains(&n) && l < n && m.unsigned_abs() <= l
    }

    pub const fn ground_state() -> Self {
        Self { n: 1, l: 0, m: 0 }
    }

    /// (2, 0, 0): spontaneous decay would need l = -1.
    pub const fn metastable() -> Self {
        Self { n: 2, l: 0, m: 0 }
    }

    pub fn is_metastable(&self) -> bool {
        *self == Self::metastable()
    }

    /// Spectroscopic label, e.g. `3d-1`.
    pub fn label(&self) -> String {
        let l_char = match self.l {
            0 => 's',
            1 => 'p',
            2 => 'd',
            3 => 'f',
            4 => 'g',
            _ => 'h',
        };
        format!("{}{}{:+}", self.n, l_char, self.m)
    }
}

impl Default for QuantumNumbers {
    fn default() -> Self {
        Self::ground_state()
    }
}

/// Electron bound to a principal level `n`, orbiting at some angle.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantumElectron {
    n: u8,
    angle: f64,
    time_in_state: f64,
}

impl QuantumElectron {
    pub fn new(n: u8, angle: f64) -> Self {
        assert!(
            (GROUND_STATE..=MAX_STATE).contains(&n),
            "Principal quantum number {n} out of range"
        );
        Self {
            n,
            angle: angle.rem_euclid(TAU),
            time_in_state: 0.0,
        }
    }

    pub fn n(&self) -> u8 {
        self.n
    }

    pub fn energy(&self) -> f64 {
        energy(self.n)
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn time_in_state(&self) -> f64 {
        self.time_in_state
    }

    /// Changes level. The orbit angle is kept so motion continues smoothly.
    pub fn set_n(&mut self, n: u8) {
        assert!(
            (GROUND_STATE..=MAX_STATE).contains(&n),
            "Principal quantum number {n} out of range"
        );
        if n != self.n {
            self.n = n;
            self.time_in_state = 0.0;
        }
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle.rem_euclid(TAU);
    }

    /// Positive deltas move clockwise.
    pub fn advance_angle(&mut self, delta: f64) {
        self.set_angle(self.angle - delta);
    }

    pub fn tick(&mut self, dt: f64) {
        self.time_in_state += dt;
    }

    /// Clears the dwell timer without changing state.
    pub fn reset_time_in_state(&mut self) {
        self.time_in_state = 0.0;
    }

    /// Position on the circular orbit of the current level.
    pub fn position(&self, center: DVec2, ground_orbit_radius: f64) -> DVec2 {
        let radius = orbit_radius(self.n, ground_orbit_radius);
        center + DVec2::new(self.angle.cos(), self.angle.sin()) * radius
    }
}

/// Electron whose state is the full (n, l, m) triple.
#[derive(Clone, Debug, PartialEq)]
pub struct SchrodingerElectron {
    electron: QuantumElectron,
    l: u8,
    m: i8,
}

impl SchrodingerElectron {
    pub fn new(state: QuantumNumbers, angle: f64) -> Self {
        assert!(
            QuantumNumbers::is_valid(state.n, state.l, state.m),
            "Invalid quantum state {state:?}"
        );
        Self {
            electron: QuantumElectron::new(state.n, angle),
            l: state.l,
            m: state.m,
        }
    }

    pub fn state(&self) -> QuantumNumbers {
        QuantumNumbers {
            n: self.electron.n(),
            l: self.l,
            m: self.m,
        }
    }

    /// Replaces the whole triple at once.
    pub fn set_state(&mut self, state: QuantumNumbers) {
        assert!(
            QuantumNumbers::is_valid(state.n, state.l, state.m),
            "Invalid quantum state {state:?}"
        );
        if state != self.state() {
            self.electron.set_n(state.n);
            self.electron.reset_time_in_state();
            self.l = state.l;
            self.m = state.m;
        }
    }

    pub fn electron(&self) -> &QuantumElectron {
        &self.electron
    }

    pub fn electron_mut(&mut self) -> &mut QuantumElectron {
        &mut self.electron
    }
}
