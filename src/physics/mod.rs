pub mod electron;
pub mod nucleus;
pub mod particle;
pub mod photon;
pub mod transitions;
pub mod wavefunction;
