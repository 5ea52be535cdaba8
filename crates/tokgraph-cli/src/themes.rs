/// 24-bit terminal color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Green,
    Halloween,
    Teal,
    Blue,
    Pink,
    Purple,
    Orange,
    Monochrome,
    YlGnBu,
}

impl ThemeName {
    pub fn all() -> &'static [ThemeName] {
        &[
            ThemeName::Green,
            ThemeName::Halloween,
            ThemeName::Teal,
            ThemeName::Blue,
            ThemeName::Pink,
            ThemeName::Purple,
            ThemeName::Orange,
            ThemeName::Monochrome,
            ThemeName::YlGnBu,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Green => "green",
            ThemeName::Halloween => "halloween",
            ThemeName::Teal => "teal",
            ThemeName::Blue => "blue",
            ThemeName::Pink => "pink",
            ThemeName::Purple => "purple",
            ThemeName::Orange => "orange",
            ThemeName::Monochrome => "monochrome",
            ThemeName::YlGnBu => "ylgnbu",
        }
    }
}

impl std::str::FromStr for ThemeName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ThemeName::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or(())
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    /// Shade per intensity level, index 0 is "no activity"
    pub colors: [Rgb; 5],
    pub highlight: Rgb,
    pub muted: Rgb,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        let colors = match name {
            ThemeName::Green => [
                Rgb(22, 27, 34),
                Rgb(14, 68, 41),
                Rgb(0, 109, 50),
                Rgb(38, 166, 65),
                Rgb(57, 211, 83),
            ],
            ThemeName::Halloween => [
                Rgb(22, 27, 34),
                Rgb(99, 29, 0),
                Rgb(153, 68, 0),
                Rgb(255, 123, 0),
                Rgb(255, 166, 39),
            ],
            ThemeName::Teal => [
                Rgb(22, 27, 34),
                Rgb(0, 68, 68),
                Rgb(0, 109, 109),
                Rgb(38, 166, 154),
                Rgb(57, 211, 196),
            ],
            ThemeName::Blue => [
                Rgb(22, 27, 34),
                Rgb(14, 41, 68),
                Rgb(0, 50, 109),
                Rgb(38, 65, 166),
                Rgb(57, 83, 211),
            ],
            ThemeName::Pink => [
                Rgb(22, 27, 34),
                Rgb(68, 14, 41),
                Rgb(109, 0, 50),
                Rgb(166, 38, 65),
                Rgb(211, 57, 83),
            ],
            ThemeName::Purple => [
                Rgb(22, 27, 34),
                Rgb(41, 14, 68),
                Rgb(50, 0, 109),
                Rgb(65, 38, 166),
                Rgb(83, 57, 211),
            ],
            ThemeName::Orange => [
                Rgb(22, 27, 34),
                Rgb(68, 41, 14),
                Rgb(109, 50, 0),
                Rgb(166, 65, 38),
                Rgb(211, 83, 57),
            ],
            ThemeName::Monochrome => [
                Rgb(22, 27, 34),
                Rgb(50, 55, 62),
                Rgb(80, 85, 92),
                Rgb(140, 145, 152),
                Rgb(200, 205, 212),
            ],
            ThemeName::YlGnBu => [
                Rgb(22, 27, 34),
                Rgb(34, 94, 168),
                Rgb(29, 145, 192),
                Rgb(65, 182, 196),
                Rgb(127, 205, 187),
            ],
        };

        Self {
            colors,
            highlight: colors[4],
            muted: Rgb(139, 148, 158),
        }
    }

    /// Shade for an intensity level; out-of-range levels clamp to the top shade.
    pub fn level_color(&self, level: u8) -> Rgb {
        self.colors[usize::from(level).min(self.colors.len() - 1)]
    }
}
