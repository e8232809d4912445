use crate::physics::electron::QuantumNumbers;
use crate::physics::wavefunction::probability_density;
use glam::DVec2;

/// Characters from empty to brightest for text rendering.
const SHADES: &[u8] = b" .:-=+*#%@";

/// Probability density over a square slice through the nucleus in the x–z plane,
/// normalized so the brightest cell is 1.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityField {
    state: QuantumNumbers,
    size: usize,
    extent: f64,
    values: Vec<f64>,
}

impl DensityField {
    /// `size` × `size` cells covering `[-extent, extent]` on both axes. Row 0 is the top (+z).
    pub fn compute(state: QuantumNumbers, size: usize, extent: f64) -> Self {
        let mut field = Self {
            state,
            size,
            extent,
            values: Vec::with_capacity(size * size),
        };
        for row in 0..size {
            for column in 0..size {
                let point = field.cell_center(column, row);
                let r = point.length();
                let cos_theta = if r > 0.0 { point.y / r } else { 1.0 };
                field
                    .values
                    .push(probability_density(state.n, state.l, state.m, r, cos_theta));
            }
        }

        let peak = field.values.iter().copied().fold(0.0, f64::max);
        if peak > 0.0 {
            for value in &mut field.values {
                *value /= peak;
            }
        }
        field
    }

    pub fn state(&self) -> QuantumNumbers {
        self.state
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, column: usize, row: usize) -> f64 {
        self.values[row * self.size + column]
    }

    /// Cell center as (x, z).
    pub fn cell_center(&self, column: usize, row: usize) -> DVec2 {
        let cell = 2.0 * self.extent / self.size as f64;
        DVec2::new(
            -self.extent + (column as f64 + 0.5) * cell,
            self.extent - (row as f64 + 0.5) * cell,
        )
    }

    /// One line per row, shaded by density.
    pub fn render_rows(&self) -> Vec<String> {
        let top = SHADES.len() - 1;
        self.values
            .chunks(self.size.max(1))
            .map(|row| {
                row.iter()
                    .map(|value| {
                        let shade = (value.clamp(0.0, 1.0) * top as f64).round() as usize;
                        char::from(SHADES[shade.min(top)])
                    })
                    .collect::<String>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_state_field_peaks_at_nucleus() {
        let field = DensityField::compute(QuantumNumbers::ground_state(), 21, 60.0);
        assert_eq!(field.values().len(), 21 * 21);
        assert_eq!(field.value(10, 10), 1.0);
        assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(field.value(0, 0) < field.value(5, 5));
    }

    #[test]
    fn p_orbital_has_nodal_plane() {
        let field = DensityField::compute(QuantumNumbers::new(2, 1, 0), 21, 150.0);
        for column in 0..21 {
            assert!(field.value(column, 10) < 1e-12);
        }
        assert!((field.value(10, 4) - field.value(10, 16)).abs() < 1e-9);
    }

    #[test]
    fn rendered_rows_shade_the_peak_brightest() {
        let field = DensityField::compute(QuantumNumbers::ground_state(), 9, 60.0);
        let rows = field.render_rows();
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|row| row.chars().count() == 9));
        assert_eq!(rows[4].chars().nth(4), Some('@'));
        assert_eq!(rows[0].chars().next(), Some(' '));
    }
}
