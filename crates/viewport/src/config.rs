use serde::{Deserialize, Serialize};

/// Zoom and gesture tuning.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale a focus command zooms to.
    pub focus_scale: f64,
    pub focus_duration_s: f64,
    /// Pointer travel (px) below which a press-release still counts as a click.
    pub click_distance_px: f64,
    /// A wheel gesture ends after this long without wheel input.
    pub wheel_idle_s: f64,
    /// Multiplier for pixel-mode wheel deltas (zoom is `2^(-deltaY * factor)`).
    pub wheel_pixel_factor: f64,
    pub wheel_line_factor: f64,
    pub wheel_page_factor: f64,
    /// Extra wheel multiplier when ctrl is held (trackpad pinch).
    pub wheel_ctrl_multiplier: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 15.0,
            focus_scale: 4.0,
            focus_duration_s: 0.75,
            click_distance_px: 3.0,
            wheel_idle_s: 0.15,
            wheel_pixel_factor: 0.002,
            wheel_line_factor: 0.05,
            wheel_page_factor: 1.0,
            wheel_ctrl_multiplier: 10.0,
        }
    }
}

impl ViewportConfig {
    pub fn clamp_scale(&self, k: f64) -> f64 {
        k.clamp(self.min_scale, self.max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_in_defaults() {
        let cfg: ViewportConfig =
            serde_json::from_str(r#"{"max_scale": 8.0, "focus_scale": 3.0}"#).unwrap();
        assert_eq!(cfg.max_scale, 8.0);
        assert_eq!(cfg.focus_scale, 3.0);
        assert_eq!(cfg.min_scale, 1.0);
        assert_eq!(cfg.wheel_idle_s, 0.15);
        assert_eq!(cfg.clamp_scale(20.0), 8.0);
    }
}
