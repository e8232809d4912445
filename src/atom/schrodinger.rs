//! Schrödinger's hydrogen atom: the electron state is the full (n, l, m)
//! triple and every transition obeys the dipole selection rules.

use crate::atom::model::{
    AtomState, AtomicBehavior, ElectronState, ModelKind, StepContext, TransitionMode,
};
use crate::atom::quantized::{CollisionGeometry, QuantizedAtom};
use crate::config::SimulationConfig;
use crate::constants::MAX_STATE;
use crate::error::SimResult;
use crate::physics::electron::{QuantumNumbers, SchrodingerElectron};
use crate::physics::photon::{Photon, PhotonId};
use crate::physics::transitions;
use crate::physics::wavefunction;
use crate::scope::StateScope;
use log::debug;
use rand::Rng;

/// Whether `from → to` satisfies n' ≠ n, |Δl| = 1 and |Δm| ≤ 1, with `to` a valid state.
pub fn is_allowed_transition(from: QuantumNumbers, to: QuantumNumbers) -> bool {
    QuantumNumbers::is_valid(to.n, to.l, to.m)
        && to.n != from.n
        && from.l.abs_diff(to.l) == 1
        && (i16::from(from.m) - i16::from(to.m)).abs() <= 1
}

/// Every state in level `n` reachable from `from`, all equally likely.
pub fn allowed_transitions(from: QuantumNumbers, n: u8) -> Vec<QuantumNumbers> {
    if n == 0 || n > MAX_STATE || n == from.n {
        return Vec::new();
    }
    let mut states = Vec::new();
    for l in [from.l.checked_sub(1), from.l.checked_add(1)].into_iter().flatten() {
        if l >= n {
            continue;
        }
        let l_signed = l as i8;
        for m in (from.m - 1)..=(from.m + 1) {
            if m.abs() <= l_signed {
                states.push(QuantumNumbers::new(n, l, m));
            }
        }
    }
    states
}

#[derive(Clone, Debug)]
pub struct SchrodingerModel {
    scope: StateScope,
    atom: QuantizedAtom,
    electron: SchrodingerElectron,
    ring_threshold: f64,
}

impl SchrodingerModel {
    pub fn new(config: &SimulationConfig, scope: StateScope) -> Self {
        Self {
            scope,
            atom: QuantizedAtom::new(config),
            electron: SchrodingerElectron::new(QuantumNumbers::ground_state(), 0.0),
            ring_threshold: config.debroglie.ring_threshold,
        }
    }

    pub fn quantum_state(&self) -> QuantumNumbers {
        self.electron.state()
    }

    pub fn is_metastable(&self) -> bool {
        self.electron.state().is_metastable()
    }

    pub fn electron(&self) -> &SchrodingerElectron {
        &self.electron
    }

    pub fn center(&self) -> glam::DVec2 {
        self.atom.center()
    }

    pub fn orbit_radius(&self, n: u8) -> f64 {
        self.atom.orbit_radius(n)
    }

    pub fn set_certain_absorption(&mut self, certain: bool) {
        self.atom.set_certain_absorption(certain);
    }

    pub fn is_certain_absorption(&self) -> bool {
        self.atom.is_certain_absorption()
    }

    /// |ψ|² of the current state at radius `r` and polar angle θ.
    pub fn probability_density(&self, r: f64, cos_theta: f64) -> f64 {
        let state = self.electron.state();
        wavefunction::probability_density(state.n, state.l, state.m, r, cos_theta)
    }

    /// Loads a saved state; any valid triple is accepted.
    pub fn restore_state(&mut self, n: u8, l: u8, m: i8) -> SimResult<()> {
        let state = QuantumNumbers::try_new(n, l, m)?;
        self.apply_state(state, TransitionMode::Restoring);
        Ok(())
    }

    fn apply_state(&mut self, state: QuantumNumbers, mode: TransitionMode) {
        if mode == TransitionMode::Physical {
            let current = self.electron.state();
            assert!(
                is_allowed_transition(current, state),
                "forbidden transition {current:?} -> {state:?}"
            );
        }
        self.electron.set_state(state);
    }

    fn transition<R: Rng + ?Sized>(&mut self, to: QuantumNumbers, ctx: &mut StepContext<'_, R>) {
        let from = self.electron.state();
        self.apply_state(to, TransitionMode::Physical);
        ctx.state_changed(
            ModelKind::Schrodinger,
            ElectronState::Orbital(from),
            ElectronState::Orbital(to),
        );
    }

    fn choose_state<R: Rng + ?Sized>(&self, rng: &mut R, n: u8) -> Option<QuantumNumbers> {
        let states = allowed_transitions(self.electron.state(), n);
        if states.is_empty() {
            return None;
        }
        Some(states[rng.gen_range(0..states.len())])
    }

    fn geometry(&self) -> CollisionGeometry {
        CollisionGeometry::Ring {
            threshold: self.ring_threshold,
        }
    }

    fn spontaneous_emission<R: Rng + ?Sized>(&mut self, ctx: &mut StepContext<'_, R>) {
        let from = self.electron.state();
        let Some(lower) = self.atom.choose_lower_n(ctx.rng, from.n, |n| {
            !allowed_transitions(from, n).is_empty()
        }) else {
            return;
        };
        let Some(to) = self.choose_state(ctx.rng, lower) else {
            return;
        };
        let Some(wavelength) = transitions::table().wavelength(from.n, lower) else {
            return;
        };
        let position = self.atom.random_ground_orbit_point(ctx.rng);
        let direction = ctx.random_direction();
        debug!(
            "schrodinger: spontaneous emission of {wavelength} nm, {} -> {}",
            from.label(),
            to.label()
        );
        self.transition(to, ctx);
        ctx.emit_photon(wavelength, position, direction);
    }
}

impl AtomicBehavior for SchrodingerModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Schrodinger
    }

    fn collides(&self, photon: &Photon) -> bool {
        !photon.was_emitted_by_atom()
            && self
                .atom
                .collides(self.geometry(), self.electron.electron(), photon)
    }

    fn process_photon<R: Rng + ?Sized>(&mut self, id: PhotonId, ctx: &mut StepContext<'_, R>) {
        let Some(photon) = ctx.photons.get(id) else {
            return;
        };
        if !self.collides(photon) {
            return;
        }
        let wavelength = photon.wavelength;
        let direction = photon.direction;
        let table = transitions::table();
        let from = self.electron.state();

        if let Some(upper) = table.absorption_target(from.n, wavelength) {
            // Leaving the metastable state by absorption is never left to chance.
            if !self.atom.absorption_succeeds(ctx.rng, from.is_metastable()) {
                return;
            }
            let Some(to) = self.choose_state(ctx.rng, upper) else {
                return;
            };
            ctx.absorb_photon(id);
            debug!(
                "schrodinger: absorbed {wavelength} nm, {} -> {}",
                from.label(),
                to.label()
            );
            self.transition(to, ctx);
        } else if let Some(lower) = table.emission_target(from.n, wavelength) {
            if allowed_transitions(from, lower).is_empty() {
                return;
            }
            if !self.atom.stimulated_emission_succeeds(ctx.rng) {
                return;
            }
            let Some(to) = self.choose_state(ctx.rng, lower) else {
                return;
            };
            let position = self.atom.electron_position(self.electron.electron());
            ctx.absorb_photon(id);
            debug!(
                "schrodinger: stimulated emission of {wavelength} nm, {} -> {}",
                from.label(),
                to.label()
            );
            self.transition(to, ctx);
            ctx.emit_photon(wavelength, position, direction);
        }
    }

    fn advance_clock<R: Rng + ?Sized>(&mut self, dt: f64, ctx: &mut StepContext<'_, R>) {
        self.electron.electron_mut().tick(dt);
        if self.atom.decays(ctx.rng, self.electron.electron(), dt) {
            self.spontaneous_emission(ctx);
        }
        let step = self.atom.angle_step(self.electron.state().n, dt);
        self.electron.electron_mut().advance_angle(step);
    }

    fn reset(&mut self) {
        // Jumping straight to the ground state is rarely a legal transition.
        self.apply_state(QuantumNumbers::ground_state(), TransitionMode::Restoring);
        let electron = self.electron.electron_mut();
        electron.set_angle(0.0);
        electron.reset_time_in_state();
    }

    fn absorption_wavelengths(&self) -> Vec<f64> {
        transitions::table().absorption_wavelengths(self.electron.state().n)
    }

    fn state(&self) -> AtomState {
        let electron = self.electron.electron();
        AtomState {
            scope: self.scope.clone(),
            kind: ModelKind::Schrodinger,
            electron: Some(ElectronState::Orbital(self.electron.state())),
            electron_position: Some(self.atom.electron_position(electron)),
            electron_angle: Some(electron.angle()),
            time_in_state: Some(electron.time_in_state()),
        }
    }
}
