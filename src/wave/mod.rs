//! Procedural wave surfaces.
//!
//! A [`Surface`] owns a flat `depth x width` grid of [`Point3D`] that is
//! overwritten wholesale by [`Surface::update`]. The grid is a pure function
//! of the configuration and the time value; nothing carries over between
//! calls except the reused allocations.

mod gerstner;
mod ribbon;

use crate::config::{RibbonConfig, WaveConfig};
use crate::error::ConfigError;

/// x runs across the screen, y is depth/layer offset, z is wave height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One Gerstner wave component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub amplitude: f64,
    pub wavelength: f64,
    pub speed: f64,
    /// Peak sharpness, 0 gives a plain sine.
    pub steepness: f64,
    direction: [f64; 2],
}

impl WaveParams {
    /// The direction is normalized here. A zero vector stays zero and is
    /// rejected later by [`WaveConfig::validate`].
    pub fn new(
        amplitude: f64,
        wavelength: f64,
        speed: f64,
        direction: [f64; 2],
        steepness: f64,
    ) -> Self {
        let len = direction[0].hypot(direction[1]);
        let direction = if len > 0.0 && len.is_finite() {
            [direction[0] / len, direction[1] / len]
        } else {
            [0.0, 0.0]
        };
        Self {
            amplitude,
            wavelength,
            speed,
            steepness,
            direction,
        }
    }

    /// Unit direction of travel.
    pub fn direction(&self) -> [f64; 2] {
        self.direction
    }

    pub fn wavenumber(&self) -> f64 {
        std::f64::consts::TAU / self.wavelength
    }
}

/// Foam/spray marker riding a crest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Point3D,
    pub velocity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Gerstner,
    Ribbon,
}

#[derive(Debug, Clone)]
enum Model {
    Gerstner(WaveConfig),
    Ribbon(RibbonConfig),
}

#[derive(Debug, Clone)]
pub struct Surface {
    model: Model,
    width: usize,
    depth: usize,
    points: Vec<Point3D>,
    particles: Vec<Particle>,
    min_z: f64,
    max_z: f64,
}

impl Surface {
    pub fn gerstner(cfg: WaveConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let (width, depth) = (cfg.grid_width, cfg.grid_depth);
        Ok(Self::allocate(Model::Gerstner(cfg), width, depth))
    }

    pub fn ribbon(cfg: RibbonConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let (width, depth) = (cfg.num_points, cfg.num_layers);
        Ok(Self::allocate(Model::Ribbon(cfg), width, depth))
    }

    fn allocate(model: Model, width: usize, depth: usize) -> Self {
        let mut surface = Self {
            model,
            width,
            depth,
            points: vec![Point3D::default(); width * depth],
            particles: Vec::new(),
            min_z: 0.0,
            max_z: 0.0,
        };
        surface.update(0.0);
        surface
    }

    /// Recompute every sample for time `t`.
    pub fn update(&mut self, t: f64) {
        match &self.model {
            Model::Gerstner(cfg) => gerstner::sample(cfg, t, &mut self.points),
            Model::Ribbon(cfg) => ribbon::sample(cfg, t, &mut self.points),
        }

        let (min_z, max_z) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.z), hi.max(p.z))
            });
        self.min_z = min_z;
        self.max_z = max_z;

        self.particles.clear();
        if let Model::Gerstner(cfg) = &self.model {
            gerstner::spawn_particles(
                cfg,
                &self.points,
                min_z,
                max_z,
                &mut self.particles,
            );
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        match self.model {
            Model::Gerstner(_) => SurfaceKind::Gerstner,
            Model::Ribbon(_) => SurfaceKind::Ribbon,
        }
    }

    /// (rows, columns) = (depth layers, samples per layer).
    pub fn dims(&self) -> (usize, usize) {
        (self.depth, self.width)
    }

    pub fn point(&self, row: usize, col: usize) -> Point3D {
        self.points[row * self.width + col]
    }

    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn min_z(&self) -> f64 {
        self.min_z
    }

    pub fn max_z(&self) -> f64 {
        self.max_z
    }

    /// Height span of the current tick, 1.0 when the surface is flat.
    pub fn z_range(&self) -> f64 {
        let range = self.max_z - self.min_z;
        if range == 0.0 { 1.0 } else { range }
    }

    /// Height rescaled into [0, 1] against this tick's extremes.
    pub fn normalized_z(&self, z: f64) -> f64 {
        ((z - self.min_z) / self.z_range()).clamp(0.0, 1.0)
    }

    /// 0 for the furthest row, 1 for the nearest.
    pub fn layer_factor(&self, row: usize) -> f64 {
        if self.depth < 2 {
            return 0.0;
        }
        (row as f64 / (self.depth - 1) as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_wave(width: usize, depth: usize) -> WaveConfig {
        WaveConfig {
            grid_width: width,
            grid_depth: depth,
            particle_density: 0.3,
            waves: vec![WaveParams::new(0.1, 1.0, 1.0, [1.0, 0.0], 0.0)],
        }
    }

    #[test]
    fn directions_are_unit_length() {
        for wave in WaveConfig::default().waves {
            let [dx, dy] = wave.direction();
            assert!((dx.hypot(dy) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn flat_steepness_is_pure_sine_at_t0() {
        let mut surface = Surface::gerstner(single_wave(4, 4)).unwrap();
        surface.update(0.0);

        for row in 0..4 {
            for col in 0..4 {
                let x0 = col as f64 / 3.0 * 2.0 - 1.0;
                let p = surface.point(row, col);
                let expected = 0.1 * (std::f64::consts::TAU * x0).sin();
                assert!((p.z - expected).abs() < 1e-12);
                assert!((p.x - x0).abs() < 1e-12, "no horizontal drift without steepness");
            }
            assert!(surface.point(row, 0).z.abs() < 1e-12);
            assert!(surface.point(row, 3).z.abs() < 1e-12);
        }

        for p in surface.points() {
            assert!(surface.min_z() <= p.z && p.z <= surface.max_z());
        }
    }

    #[test]
    fn odd_grid_center_is_zero() {
        let surface = Surface::gerstner(single_wave(5, 5)).unwrap();
        assert_eq!(surface.point(2, 2).z, 0.0);
    }

    #[test]
    fn flat_surface_range_is_guarded() {
        let mut surface = Surface::gerstner(single_wave(4, 4)).unwrap();
        surface.min_z = 0.25;
        surface.max_z = 0.25;
        assert_eq!(surface.z_range(), 1.0);
        assert_eq!(surface.normalized_z(0.25), 0.0);
    }

    #[test]
    fn normalized_height_is_clamped() {
        let surface = Surface::gerstner(WaveConfig::default()).unwrap();
        assert_eq!(surface.normalized_z(surface.max_z() + 1e-9), 1.0);
        assert_eq!(surface.normalized_z(surface.min_z() - 1e-9), 0.0);
    }

    #[test]
    fn layer_factor_spans_unit_interval() {
        let surface = Surface::ribbon(RibbonConfig::default()).unwrap();
        let (rows, _) = surface.dims();
        assert_eq!(surface.layer_factor(0), 0.0);
        assert_eq!(surface.layer_factor(rows - 1), 1.0);
    }

    #[test]
    fn ribbon_never_spawns_particles() {
        let mut surface = Surface::ribbon(RibbonConfig::default()).unwrap();
        surface.update(3.7);
        assert!(surface.particles().is_empty());
        assert_eq!(surface.kind(), SurfaceKind::Ribbon);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Surface::gerstner(single_wave(1, 4)).unwrap_err();
        assert_eq!(err, ConfigError::GridTooSmall { width: 1, depth: 4 });
    }
}
