use foundation::pin::{PinCategory, PinOwner};
use scene::components::{Color, Stroke, Style};

pub const LAND_FILL: Color = Color::rgb(0xfe, 0xca, 0xca);
pub const LAND_FILL_HOVER: Color = Color::rgb(0xfd, 0xa4, 0xaf);
pub const LAND_STROKE_WIDTH: f64 = 0.5;

pub const MEMORY_COLOR: Color = Color::rgb(0xef, 0x44, 0x44);
pub const DREAM_USER1_COLOR: Color = Color::rgb(0xec, 0x48, 0x99);
pub const DREAM_USER2_COLOR: Color = Color::rgb(0x63, 0x66, 0xf1);
pub const DREAM_SHARED_COLOR: Color = Color::rgb(0xf5, 0x9e, 0x0b);

pub const MARKER_STROKE_WIDTH: f64 = 1.5;
pub const MARKER_EYE_RADIUS: f64 = 2.0;
pub const MARKER_HIT_RADIUS: f64 = 15.0;
pub const DEFAULT_MARKER_EXPONENT: f64 = 0.7;

/// Memories are red whoever owns them; dreams are colored by owner.
pub fn pin_color(category: PinCategory, owner: PinOwner) -> Color {
    match (category, owner) {
        (PinCategory::Memory, _) => MEMORY_COLOR,
        (PinCategory::Dream, PinOwner::User1) => DREAM_USER1_COLOR,
        (PinCategory::Dream, PinOwner::User2) => DREAM_USER2_COLOR,
        (PinCategory::Dream, PinOwner::Shared) => DREAM_SHARED_COLOR,
    }
}

/// Counter-scale applied to markers so they shrink slower than the map grows.
pub fn marker_scale(k: f64, exponent: f64) -> f64 {
    1.0 / k.powf(exponent)
}

pub fn land_style(hovered: bool) -> Style {
    let fill = if hovered { LAND_FILL_HOVER } else { LAND_FILL };
    Style::filled(fill).with_stroke(Stroke {
        color: Color::WHITE,
        width: LAND_STROKE_WIDTH,
        non_scaling: true,
    })
}

pub fn marker_glyph_style(color: Color) -> Style {
    Style::filled(color).with_stroke(Stroke {
        color: Color::WHITE,
        width: MARKER_STROKE_WIDTH,
        non_scaling: true,
    })
}

pub fn marker_eye_style() -> Style {
    Style::filled(Color::WHITE)
}

pub fn marker_hit_style() -> Style {
    Style::filled(Color::TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_depends_on_category_then_owner() {
        for owner in [PinOwner::User1, PinOwner::User2, PinOwner::Shared] {
            assert_eq!(pin_color(PinCategory::Memory, owner).to_string(), "#ef4444");
        }
        assert_eq!(pin_color(PinCategory::Dream, PinOwner::User1).to_string(), "#ec4899");
        assert_eq!(pin_color(PinCategory::Dream, PinOwner::User2).to_string(), "#6366f1");
        assert_eq!(pin_color(PinCategory::Dream, PinOwner::Shared).to_string(), "#f59e0b");
    }

    #[test]
    fn marker_factor_follows_power_law() {
        assert_eq!(marker_scale(1.0, DEFAULT_MARKER_EXPONENT), 1.0);
        for k in [1.5_f64, 4.0, 15.0] {
            let expected = k.powf(-0.7);
            assert!((marker_scale(k, DEFAULT_MARKER_EXPONENT) - expected).abs() < 1e-12);
        }
        assert!(marker_scale(15.0, 0.7) < marker_scale(4.0, 0.7));
    }

    #[test]
    fn land_hover_swaps_fill_only() {
        assert_eq!(land_style(false).fill, Some(LAND_FILL));
        assert_eq!(land_style(true).fill, Some(LAND_FILL_HOVER));
        assert_eq!(land_style(true).stroke, land_style(false).stroke);
    }
}
