//! Height synthesis for grid construction.
//!
//! Two independent fields are produced per grid: a midpoint-displacement
//! (diamond-square) field driven by the world seed, and a multi-octave Perlin
//! field sampled through the `noise` crate. The blend of the two is what the
//! classifier consumes.

use ::noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::Rng;

/// Dense row-major field of raw height values.
#[derive(Debug, Clone)]
pub struct HeightField {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl HeightField {
    /// Allocate a zeroed field.
    pub fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.cols + col] = value;
    }

    /// Min-max normalize into `[0, 1]`, then pull strictly inside the unit
    /// interval so threshold comparisons never sit exactly on 0.0 or 1.0.
    pub fn normalize(&mut self) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.values {
            min = min.min(v);
            max = max.max(v);
        }
        let span = max - min;
        for v in &mut self.values {
            let unit = if span > 0.0 { (*v - min) / span } else { 0.5 };
            *v = unit * 0.998 + 0.001;
        }
    }
}

/// Configuration for the multi-octave Perlin field.
#[derive(Debug, Clone)]
pub struct PerlinConfig {
    /// Coordinate divisor applied before sampling.
    pub scale: f64,
    /// Number of octaves accumulated per sample.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Seed for the underlying permutation table.
    pub seed: u32,
}

impl Default for PerlinConfig {
    fn default() -> Self {
        Self {
            scale: 25.0,
            octaves: 38,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 0,
        }
    }
}

/// Sample a normalized multi-octave Perlin field covering `rows x cols`.
pub fn perlin_field(config: &PerlinConfig, rows: usize, cols: usize) -> HeightField {
    let perlin = Perlin::new(config.seed);
    let scale = if config.scale > 0.0 { config.scale } else { 1.0 };
    let mut field = HeightField::zeroed(rows, cols);

    for row in 0..rows {
        for col in 0..cols {
            let x = col as f64 / scale;
            let y = row as f64 / scale;

            let mut value = 0.0;
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut max_value = 0.0;
            for _ in 0..config.octaves.max(1) {
                value += perlin.get([x * frequency, y * frequency]) * amplitude;
                max_value += amplitude;
                amplitude *= config.persistence;
                frequency *= config.lacunarity;
            }
            field.set(row, col, value / max_value);
        }
    }

    field.normalize();
    field
}

/// Generate a normalized diamond-square field covering `rows x cols`.
///
/// Corner seeds and per-pass perturbations are drawn from `rng`, so the field
/// is a pure function of the caller's seeded state. The perturbation magnitude
/// halves with every pass, as does the step size; boundary reads wrap.
pub fn diamond_square(
    rng: &mut StdRng,
    rows: usize,
    cols: usize,
    mut roughness: f64,
) -> HeightField {
    let mut field = HeightField::zeroed(rows, cols);
    if rows < 3 || cols < 3 {
        field.normalize();
        return field;
    }

    let last_row = rows - 1;
    let last_col = cols - 1;
    for &row in &[0, last_row] {
        for &col in &[0, last_col] {
            field.set(row, col, rng.gen_range(0.0..1.0));
        }
    }

    let mut step = last_col;
    while step > 1 {
        let half = step / 2;

        // Diamond pass: each sub-square center takes the mean of its four
        // diagonal corners at distance `half`, read directly. The step comes
        // from the column axis, so the clamp keeps reads in bounds when the
        // row axis is shorter.
        let mut row = half;
        while row < last_row {
            let mut col = half;
            while col < last_col {
                let up = row - half;
                let down = (row + half).min(last_row);
                let left = col - half;
                let right = (col + half).min(last_col);
                let avg = (field.get(up, left)
                    + field.get(up, right)
                    + field.get(down, left)
                    + field.get(down, right))
                    / 4.0;
                field.set(row, col, avg + rng.gen_range(-1.0..1.0) * roughness);
                col += step;
            }
            row += step;
        }

        // Square pass: edge midpoints take the mean of their four axis
        // neighbors at distance `half`, wrapping at the boundary.
        let mut row = 0;
        while row < rows {
            let mut col = (row + half) % step;
            while col < cols {
                let up = (row + last_row - half) % last_row.max(1);
                let down = (row + half) % last_row.max(1);
                let left = (col + last_col - half) % last_col.max(1);
                let right = (col + half) % last_col.max(1);
                let avg = (field.get(up, col)
                    + field.get(down, col)
                    + field.get(row, left)
                    + field.get(row, right))
                    / 4.0;
                field.set(row, col, avg + rng.gen_range(-1.0..1.0) * roughness);
                col += step;
            }
            row += half;
        }

        roughness /= 2.0;
        step /= 2;
    }

    field.normalize();
    field
}

/// Blend a diamond-square field with a Perlin field.
///
/// The sum is divided by 1.5 rather than 2.0, which biases the result upward
/// and leaves more of the grid above the water thresholds.
pub fn blend(displacement: &HeightField, coherent: &HeightField) -> HeightField {
    debug_assert_eq!(displacement.rows, coherent.rows);
    debug_assert_eq!(displacement.cols, coherent.cols);
    let mut out = HeightField::zeroed(displacement.rows, displacement.cols);
    for row in 0..out.rows {
        for col in 0..out.cols {
            let v = (displacement.get(row, col) + coherent.get(row, col)) / 1.5;
            out.set(row, col, v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridforge_core::{scoped_rng, RngDomain, WorldSeed};

    fn bounds_ok(field: &HeightField) -> bool {
        (0..field.rows()).all(|r| {
            (0..field.cols()).all(|c| {
                let v = field.get(r, c);
                v > 0.0 && v < 1.0
            })
        })
    }

    #[test]
    fn perlin_field_is_deterministic_for_a_seed() {
        let config = PerlinConfig {
            seed: 7,
            octaves: 4,
            ..PerlinConfig::default()
        };
        let a = perlin_field(&config, 16, 16);
        let b = perlin_field(&config, 16, 16);
        for row in 0..16 {
            for col in 0..16 {
                assert_eq!(a.get(row, col), b.get(row, col));
            }
        }
        assert!(bounds_ok(&a));
    }

    #[test]
    fn diamond_square_stays_inside_unit_interval() {
        let mut rng = scoped_rng(WorldSeed(42), RngDomain::Heightmap);
        let field = diamond_square(&mut rng, 33, 33, 0.35);
        assert!(bounds_ok(&field));
    }

    #[test]
    fn diamond_center_averages_all_four_corners() {
        // With zero roughness the first diamond center is exactly the mean
        // of the four seeded corners. Normalization is affine, so the
        // relation survives it.
        let mut rng = scoped_rng(WorldSeed(6), RngDomain::Heightmap);
        let field = diamond_square(&mut rng, 3, 3, 0.0);
        let corners = [
            field.get(0, 0),
            field.get(0, 2),
            field.get(2, 0),
            field.get(2, 2),
        ];
        let mean = corners.iter().sum::<f64>() / 4.0;
        assert!((field.get(1, 1) - mean).abs() < 1e-9);
        // The center must not collapse onto a single corner.
        assert!(corners.iter().any(|&c| (field.get(1, 1) - c).abs() > 1e-9));
    }

    #[test]
    fn diamond_square_same_seed_same_field() {
        let mut a_rng = scoped_rng(WorldSeed(9), RngDomain::Heightmap);
        let mut b_rng = scoped_rng(WorldSeed(9), RngDomain::Heightmap);
        let a = diamond_square(&mut a_rng, 17, 17, 0.5);
        let b = diamond_square(&mut b_rng, 17, 17, 0.5);
        for row in 0..17 {
            for col in 0..17 {
                assert_eq!(a.get(row, col), b.get(row, col));
            }
        }
    }

    #[test]
    fn blend_divides_by_one_point_five() {
        let mut a = HeightField::zeroed(2, 2);
        let mut b = HeightField::zeroed(2, 2);
        a.set(0, 0, 0.6);
        b.set(0, 0, 0.9);
        let out = blend(&a, &b);
        assert!((out.get(0, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tiny_grids_do_not_panic() {
        let mut rng = scoped_rng(WorldSeed(1), RngDomain::Heightmap);
        let field = diamond_square(&mut rng, 1, 1, 0.35);
        assert_eq!(field.rows(), 1);
    }
}
