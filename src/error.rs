use thiserror::Error;

/// Rejected surface configuration. Raised once, at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 2x2 samples, got {width}x{depth}")]
    GridTooSmall { width: usize, depth: usize },

    #[error("at least one wave component is required")]
    NoWaves,

    #[error("wave {index}: amplitude must be finite and positive, got {value}")]
    Amplitude { index: usize, value: f64 },

    #[error("wave {index}: wavelength must be finite and positive, got {value}")]
    Wavelength { index: usize, value: f64 },

    #[error("wave {index}: direction vector has zero length")]
    ZeroDirection { index: usize },

    #[error("wave {index}: steepness must lie in [0, 1], got {value}")]
    Steepness { index: usize, value: f64 },

    #[error("particle density must lie in (0, 1], got {0}")]
    ParticleDensity(f64),

    #[error("ribbon parameter `{name}` must be finite, got {value}")]
    RibbonParam { name: &'static str, value: f64 },
}
