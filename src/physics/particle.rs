use glam::DVec2;

/// Anything with a position in the box: nucleons, electrons and photons.
pub trait Particle {
    fn position(&self) -> DVec2;

    fn distance_to(&self, point: DVec2) -> f64 {
        self.position().distance(point)
    }
}
