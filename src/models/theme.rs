use serde::{Deserialize, Serialize};

/// Accent choices offered by the picker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Cyberpunk,
    Ocean,
    Forest,
    Sunset,
}

/// Colors making up one accent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccentPalette {
    pub name: &'static str,
    pub color: &'static str,
    pub text: &'static str,
    pub gradient_from: &'static str,
    pub gradient_to: &'static str,
}

impl Accent {
    pub const ALL: [Accent; 4] = [Accent::Cyberpunk, Accent::Ocean, Accent::Forest, Accent::Sunset];

    pub fn palette(&self) -> AccentPalette {
        match self {
            Accent::Cyberpunk => AccentPalette {
                name: "Cyberpunk",
                color: "#a855f7",
                text: "#d8b4fe",
                gradient_from: "#a855f7",
                gradient_to: "#ec4899",
            },
            Accent::Ocean => AccentPalette {
                name: "Ocean",
                color: "#22d3ee",
                text: "#67e8f9",
                gradient_from: "#22d3ee",
                gradient_to: "#3b82f6",
            },
            Accent::Forest => AccentPalette {
                name: "Forest",
                color: "#4ade80",
                text: "#d0f2b2",
                gradient_from: "#22c55e",
                gradient_to: "#a3e635",
            },
            Accent::Sunset => AccentPalette {
                name: "Sunset",
                color: "#f97316",
                text: "#fbbf24",
                gradient_from: "#fb923c",
                gradient_to: "#f59e0b",
            },
        }
    }
}

/// Cosmetic display preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    #[serde(default)]
    pub accent: Accent,
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
}

fn default_dark_mode() -> bool {
    true
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            accent: Accent::default(),
            dark_mode: true,
        }
    }
}
