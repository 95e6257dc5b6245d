use crate::config::WaveConfig;

use super::{Particle, Point3D};

/// Only every `PARTICLE_STRIDE`th row and column may carry foam.
const PARTICLE_STRIDE: usize = 3;

/// Crest threshold as a fraction of the height range.
const CREST_FRACTION: f64 = 0.6;

pub(super) fn sample(cfg: &WaveConfig, t: f64, points: &mut [Point3D]) {
    let (width, depth) = (cfg.grid_width, cfg.grid_depth);
    for row in 0..depth {
        let y0 = row as f64 / (depth - 1) as f64 * 2.0 - 1.0;
        for col in 0..width {
            let x0 = col as f64 / (width - 1) as f64 * 2.0 - 1.0;
            points[row * width + col] = displace(cfg, x0, y0, t);
        }
    }
}

/// Sum of all components at rest position (x0, y0).
fn displace(cfg: &WaveConfig, x0: f64, y0: f64, t: f64) -> Point3D {
    let count = cfg.waves.len() as f64;
    let mut p = Point3D { x: x0, y: y0, z: 0.0 };

    for wave in &cfg.waves {
        let k = wave.wavenumber();
        let q = wave.steepness / (k * wave.amplitude * count);
        let [dx, dy] = wave.direction();
        let phase = k * (dx * x0 + dy * y0) - wave.speed * t;
        let (sin, cos) = phase.sin_cos();

        p.x += q * wave.amplitude * dx * cos;
        p.y += q * wave.amplitude * dy * cos;
        p.z += wave.amplitude * sin;
    }

    p
}

pub(super) fn spawn_particles(
    cfg: &WaveConfig,
    points: &[Point3D],
    min_z: f64,
    max_z: f64,
    out: &mut Vec<Particle>,
) {
    let threshold = min_z + CREST_FRACTION * (max_z - min_z);
    let period = 1.0 / cfg.particle_density;

    for row in (0..cfg.grid_depth).step_by(PARTICLE_STRIDE) {
        for col in (0..cfg.grid_width).step_by(PARTICLE_STRIDE) {
            if ((row + col) as f64) % period >= 1.0 {
                continue;
            }
            let pos = points[row * cfg.grid_width + col];
            if pos.z > threshold {
                out.push(Particle {
                    pos,
                    velocity: pos.z,
                });
            }
        }
    }
}
