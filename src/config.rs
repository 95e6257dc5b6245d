//! Fixed tuning constants for the surface models, projection and loop pacing.
//!
//! Nothing here is parsed at runtime. The defaults are the values the
//! binaries run with; tests build their own configs to pin down behavior.

use std::time::Duration;

use crate::error::ConfigError;
use crate::wave::WaveParams;

/// Delay between animation ticks (about 20 frames per second).
pub const FRAME_DELAY: Duration = Duration::from_millis(50);

/// Amount the time accumulator advances per tick.
pub const TIME_STEP: f64 = 0.08;

/// Grid and wave components for the Gerstner ocean.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveConfig {
    pub grid_width: usize,
    pub grid_depth: usize,
    /// Fraction of strided samples allowed to spawn a particle.
    pub particle_density: f64,
    pub waves: Vec<WaveParams>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            grid_width: 80,
            grid_depth: 60,
            particle_density: 0.3,
            waves: vec![
                WaveParams::new(0.15, 1.5, 0.8, [1.0, 0.3], 0.6),
                WaveParams::new(0.08, 0.8, 1.2, [0.7, -0.5], 0.4),
                WaveParams::new(0.05, 0.4, 1.6, [-0.3, 0.8], 0.3),
            ],
        }
    }
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_grid(self.grid_width, self.grid_depth)?;
        if self.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        if !(self.particle_density > 0.0 && self.particle_density <= 1.0) {
            return Err(ConfigError::ParticleDensity(self.particle_density));
        }
        for (index, wave) in self.waves.iter().enumerate() {
            if !(wave.amplitude.is_finite() && wave.amplitude > 0.0) {
                return Err(ConfigError::Amplitude {
                    index,
                    value: wave.amplitude,
                });
            }
            if !(wave.wavelength.is_finite() && wave.wavelength > 0.0) {
                return Err(ConfigError::Wavelength {
                    index,
                    value: wave.wavelength,
                });
            }
            let [dx, dy] = wave.direction();
            if dx == 0.0 && dy == 0.0 {
                return Err(ConfigError::ZeroDirection { index });
            }
            if !(0.0..=1.0).contains(&wave.steepness) {
                return Err(ConfigError::Steepness {
                    index,
                    value: wave.steepness,
                });
            }
        }
        Ok(())
    }
}

/// Layered sine ribbon.
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonConfig {
    pub num_layers: usize,
    pub num_points: usize,
    pub amplitude: f64,
    pub frequency: f64,
    pub amplitude2: f64,
    pub frequency2: f64,
    /// Spread of the layers along the depth axis.
    pub depth_scale: f64,
    /// How much height leaks into apparent depth.
    pub height_variation: f64,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            num_layers: 12,
            num_points: 120,
            amplitude: 0.25,
            frequency: 1.5,
            amplitude2: 0.12,
            frequency2: 3.2,
            depth_scale: 1.6,
            height_variation: 0.25,
        }
    }
}

impl RibbonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_grid(self.num_points, self.num_layers)?;
        let params = [
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
            ("amplitude2", self.amplitude2),
            ("frequency2", self.frequency2),
            ("depth_scale", self.depth_scale),
            ("height_variation", self.height_variation),
        ];
        for (name, value) in params {
            if !value.is_finite() {
                return Err(ConfigError::RibbonParam { name, value });
            }
        }
        Ok(())
    }
}

fn check_grid(width: usize, depth: usize) -> Result<(), ConfigError> {
    if width < 2 || depth < 2 {
        return Err(ConfigError::GridTooSmall { width, depth });
    }
    Ok(())
}

/// Maps surface space onto the character grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Horizontal spread as a fraction of terminal width.
    pub scale_x: f64,
    /// Vertical compression as a fraction of terminal height.
    pub scale_y: f64,
    /// How far back layers are pushed up the screen.
    pub perspective_y: f64,
    /// Weight of wave height in the depth used for occlusion.
    pub depth_z_factor: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            scale_x: 0.95,
            scale_y: 0.7,
            perspective_y: 0.4,
            depth_z_factor: 0.3,
        }
    }
}

/// Which surface model a binary animates.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceConfig {
    Gerstner(WaveConfig),
    Ribbon(RibbonConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub frame_delay: Duration,
    pub time_step: f64,
    pub projection: Projection,
    pub surface: SurfaceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::gerstner()
    }
}

impl AppConfig {
    pub fn gerstner() -> Self {
        Self {
            frame_delay: FRAME_DELAY,
            time_step: TIME_STEP,
            projection: Projection::default(),
            surface: SurfaceConfig::Gerstner(WaveConfig::default()),
        }
    }

    pub fn ribbon() -> Self {
        Self {
            surface: SurfaceConfig::Ribbon(RibbonConfig::default()),
            ..Self::gerstner()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(WaveConfig::default().validate(), Ok(()));
        assert_eq!(RibbonConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_grid() {
        let cfg = WaveConfig {
            grid_width: 1,
            ..WaveConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::GridTooSmall { width: 1, depth: 60 })
        );
    }

    #[test]
    fn rejects_bad_wave_components() {
        let mut cfg = WaveConfig::default();
        cfg.waves[1] = WaveParams::new(0.1, 1.0, 1.0, [0.0, 0.0], 0.5);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroDirection { index: 1 }));

        cfg.waves[1] = WaveParams::new(0.1, 0.0, 1.0, [1.0, 0.0], 0.5);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Wavelength { index: 1, .. })
        ));

        cfg.waves[1] = WaveParams::new(0.1, 1.0, 1.0, [1.0, 0.0], 1.5);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Steepness { index: 1, .. })
        ));

        cfg.waves.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoWaves));
    }

    #[test]
    fn rejects_non_finite_ribbon() {
        let cfg = RibbonConfig {
            frequency2: f64::NAN,
            ..RibbonConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RibbonParam { name: "frequency2", .. })
        ));
    }

    #[test]
    fn ribbon_app_keeps_pacing() {
        let app = AppConfig::ribbon();
        assert_eq!(app.frame_delay, FRAME_DELAY);
        assert_eq!(app.time_step, TIME_STEP);
        assert!(matches!(app.surface, SurfaceConfig::Ribbon(_)));
    }
}
