//! Draw styles and their colors

/// What a draw request depicts; the backend maps it to a look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawStyle {
    Background,
    Hazard,
    HazardSelected,
    Goal,
    GoalSelected,
    Marquee,
    Button,
    Text,
    /// Large end-screen headline
    Title,
}

/// Convert a `#RRGGBB` hex color to linear RGBA floats
const fn hex(rgb: u32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
        1.0,
    ]
}

impl DrawStyle {
    /// RGBA fill or stroke color
    pub const fn color(self) -> [f32; 4] {
        match self {
            DrawStyle::Background => hex(0x55BBFF),
            DrawStyle::Hazard => hex(0x000000),
            DrawStyle::HazardSelected => hex(0x333333),
            DrawStyle::Goal => hex(0x008800),
            DrawStyle::GoalSelected => hex(0x33AA33),
            DrawStyle::Button => hex(0x222244),
            DrawStyle::Marquee | DrawStyle::Text | DrawStyle::Title => hex(0xFFFFFF),
        }
    }

    /// Font size in pixels for text styles
    pub fn font_size(self) -> Option<f32> {
        match self {
            DrawStyle::Title => Some(32.0),
            DrawStyle::Text => Some(20.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(DrawStyle::Hazard.color(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(DrawStyle::Text.color(), [1.0, 1.0, 1.0, 1.0]);
        let [r, g, b, _] = DrawStyle::Goal.color();
        assert_eq!((r, b), (0.0, 0.0));
        assert!((g - 136.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_font_sizes() {
        assert_eq!(DrawStyle::Title.font_size(), Some(32.0));
        assert_eq!(DrawStyle::Hazard.font_size(), None);
    }
}
