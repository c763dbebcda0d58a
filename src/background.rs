//! Board backgrounds
//!
//! A background paints every empty pixel of the board. `None` is a flat
//! cream fill; the others are vertical two-stop gradients.

use ratatui::style::Color;

/// Flat fill used when no background is selected
const PLAIN: (u8, u8, u8) = (0xff, 0xf5, 0xe6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    None,
    Sunset,
    Ocean,
    Forest,
    Dusk,
}

impl Background {
    pub fn all() -> &'static [Background] {
        &[
            Background::None,
            Background::Sunset,
            Background::Ocean,
            Background::Forest,
            Background::Dusk,
        ]
    }

    /// Identifier stored in the settings file
    pub fn id(&self) -> &'static str {
        match self {
            Background::None => "",
            Background::Sunset => "sunset",
            Background::Ocean => "ocean",
            Background::Forest => "forest",
            Background::Dusk => "dusk",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Background::None => "None",
            Background::Sunset => "Sunset",
            Background::Ocean => "Ocean",
            Background::Forest => "Forest",
            Background::Dusk => "Dusk",
        }
    }

    /// Look up a stored id; unknown ids fall back to no background
    pub fn from_id(id: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|bg| bg.id() == id)
            .unwrap_or_default()
    }

    /// Top and bottom gradient stops
    fn stops(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        match self {
            Background::None => (PLAIN, PLAIN),
            Background::Sunset => ((0xff, 0xb3, 0x7a), (0x8e, 0x3b, 0x5e)),
            Background::Ocean => ((0x9f, 0xd8, 0xef), (0x0b, 0x3c, 0x5d)),
            Background::Forest => ((0xc8, 0xe6, 0xa0), (0x1e, 0x4d, 0x2b)),
            Background::Dusk => ((0x6a, 0x5a, 0xcd), (0x12, 0x12, 0x2e)),
        }
    }

    /// Color of the pixel row `y` on a surface `height` pixels tall
    pub fn color_at(&self, y: u16, height: u16) -> Color {
        let (top, bottom) = self.stops();
        if height <= 1 {
            return Color::Rgb(top.0, top.1, top.2);
        }
        let t = f32::from(y.min(height - 1)) / f32::from(height - 1);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Color::Rgb(mix(top.0, bottom.0), mix(top.1, bottom.1), mix(top.2, bottom.2))
    }
}
