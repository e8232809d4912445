// Simulation Units
// Lengths are model units inside the zoomed-in box, time is seconds,
// energies are electron volts and wavelengths are nanometers.

/// Energy of the hydrogen ground state, eV.
pub const GROUND_STATE_ENERGY: f64 = -13.6;

/// Planck constant times the speed of light, eV·nm.
pub const HC: f64 = 1239.84;

pub const GROUND_STATE: u8 = 1;
pub const MAX_STATE: u8 = 6;

/// Radius of the n = 1 orbit. Higher orbits scale with n².
pub const GROUND_ORBIT_RADIUS: f64 = 15.0;

// Light
pub const PHOTON_SPEED: f64 = 600.0;
pub const MAX_PHOTONS_IN_BOX: usize = 20;
pub const MIN_UV_WAVELENGTH: f64 = 92.0;
pub const MAX_VISIBLE_WAVELENGTH: f64 = 750.0;
pub const WHITE_LIGHT_TRANSITION_WEIGHT: f64 = 0.40;

// Zoomed-in box, centered on the atom.
pub const BOX_WIDTH: f64 = 1500.0;
pub const BOX_HEIGHT: f64 = 1500.0;

/// A photon's wavelength matches a transition when within this many nm.
pub const WAVELENGTH_CLOSENESS: f64 = 0.5;
