use crate::physics::particle::Particle;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhotonId(pub u64);

/// Who created a photon. Only atom-emitted photons reach the spectrometer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotonSource {
    Light,
    Atom,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Photon {
    id: PhotonId,
    pub wavelength: f64,
    pub position: DVec2,
    /// Radians, measured counterclockwise from +x.
    pub direction: f64,
    pub source: PhotonSource,
    /// Set once the photon has bounced off something, so it bounces only once.
    pub collided: bool,
}

impl Photon {
    pub fn id(&self) -> PhotonId {
        self.id
    }

    pub fn advance(&mut self, distance: f64) {
        self.position += DVec2::new(self.direction.cos(), self.direction.sin()) * distance;
    }

    pub fn was_emitted_by_atom(&self) -> bool {
        self.source == PhotonSource::Atom
    }
}

impl Particle for Photon {
    fn position(&self) -> DVec2 {
        self.position
    }
}

/// Everything needed to create a photon; the pool assigns the id.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotonRequest {
    pub wavelength: f64,
    pub position: DVec2,
    pub direction: f64,
    pub source: PhotonSource,
}

/// Live photons keyed by identity. Ids are never reused within a pool.
#[derive(Clone, Debug, Default)]
pub struct PhotonPool {
    photons: BTreeMap<PhotonId, Photon>,
    next_id: u64,
}

impl PhotonPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, request: PhotonRequest) -> PhotonId {
        debug_assert!(request.wavelength > 0.0, "Photon wavelength must be positive");
        let id = PhotonId(self.next_id);
        self.next_id += 1;
        self.photons.insert(
            id,
            Photon {
                id,
                wavelength: request.wavelength,
                position: request.position,
                direction: request.direction,
                source: request.source,
                collided: false,
            },
        );
        id
    }

    pub fn get(&self, id: PhotonId) -> Option<&Photon> {
        self.photons.get(&id)
    }

    pub fn get_mut(&mut self, id: PhotonId) -> Option<&mut Photon> {
        self.photons.get_mut(&id)
    }

    pub fn remove(&mut self, id: PhotonId) -> Option<Photon> {
        self.photons.remove(&id)
    }

    /// Ids in creation order, detached from the pool so it can be mutated while iterating.
    pub fn ids(&self) -> Vec<PhotonId> {
        self.photons.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Photon> {
        self.photons.values()
    }

    pub fn len(&self) -> usize {
        self.photons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    pub fn clear(&mut self) {
        self.photons.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn request(wavelength: f64) -> PhotonRequest {
        PhotonRequest {
            wavelength,
            position: DVec2::ZERO,
            direction: FRAC_PI_2,
            source: PhotonSource::Light,
        }
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut pool = PhotonPool::new();
        let a = pool.spawn(request(122.0));
        let b = pool.spawn(request(656.0));
        pool.remove(a);
        let c = pool.spawn(request(486.0));
        assert!(a < b && b < c);
        assert_eq!(pool.ids(), vec![b, c]);
    }

    #[test]
    fn advance_moves_along_direction() {
        let mut pool = PhotonPool::new();
        let id = pool.spawn(request(122.0));
        let photon = pool.get_mut(id).unwrap();
        photon.advance(10.0);
        assert!(photon.position.x.abs() < 1e-9);
        assert!((photon.position.y - 10.0).abs() < 1e-9);
    }
}
