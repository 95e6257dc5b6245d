use std::f64::consts::TAU;

use crate::config::RibbonConfig;

use super::Point3D;

pub(super) fn sample(cfg: &RibbonConfig, t: f64, points: &mut [Point3D]) {
    let (layers, width) = (cfg.num_layers, cfg.num_points);
    for layer in 0..layers {
        let offset = layer as f64 / (layers - 1) as f64;
        for i in 0..width {
            let x = i as f64 / (width - 1) as f64 - 0.5;
            let z = height(cfg, x, t);
            points[layer * width + i] = Point3D {
                x,
                y: (offset - 0.5) * cfg.depth_scale + z * cfg.height_variation,
                z,
            };
        }
    }
}

/// Primary swell, a counter-moving secondary, and a faster ripple on top.
fn height(cfg: &RibbonConfig, x: f64, t: f64) -> f64 {
    let primary = cfg.amplitude * (x * TAU * cfg.frequency + t).sin();
    let secondary = cfg.amplitude2 * (x * TAU * cfg.frequency2 - t * 0.7).sin();
    let ripple = cfg.amplitude * 0.3 * (x * TAU * cfg.frequency * 1.5 + t * 1.3).sin();
    primary + secondary + ripple
}
