//! Static option catalogues for the three presentation controls.

use std::fmt;

use serde::Serialize;

/// A selectable presentation option.
///
/// `id` is the machine value that is spliced into the prompt, `label` is the
/// display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StyleOption {
    pub id: &'static str,
    pub label: &'static str,
}

impl StyleOption {
    const fn new(id: &'static str, label: &'static str) -> Self {
        Self { id, label }
    }
}

impl fmt::Display for StyleOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

pub const ASPECT_RATIOS: &[StyleOption] = &[
    StyleOption::new("1:1", "Square"),
    StyleOption::new("16:9", "Widescreen"),
    StyleOption::new("9:16", "Vertical"),
    StyleOption::new("4:3", "Standard"),
    StyleOption::new("3:2", "Classic"),
];

pub const LIGHTING_STYLES: &[StyleOption] = &[
    StyleOption::new("soft studio lighting", "Soft Studio"),
    StyleOption::new("dramatic side lighting", "Dramatic"),
    StyleOption::new("natural sunlight", "Natural Light"),
    StyleOption::new("neon ambient glow", "Neon Glow"),
    StyleOption::new("cinematic moody lighting", "Cinematic"),
];

pub const CAMERA_PERSPECTIVES: &[StyleOption] = &[
    StyleOption::new("front-on eye-level shot", "Eye-Level"),
    StyleOption::new("high-angle shot", "High Angle"),
    StyleOption::new("low-angle shot", "Low Angle"),
    StyleOption::new("dutch angle shot", "Dutch Angle"),
    StyleOption::new("macro close-up shot", "Macro"),
];

/// The three option groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionCategory {
    AspectRatio,
    Lighting,
    CameraPerspective,
}

impl OptionCategory {
    pub const ALL: [Self; 3] = [Self::AspectRatio, Self::Lighting, Self::CameraPerspective];

    #[must_use]
    pub const fn options(self) -> &'static [StyleOption] {
        match self {
            Self::AspectRatio => ASPECT_RATIOS,
            Self::Lighting => LIGHTING_STYLES,
            Self::CameraPerspective => CAMERA_PERSPECTIVES,
        }
    }

    /// First entry of the catalogue; used as the initial selection.
    #[must_use]
    pub const fn default_option(self) -> &'static StyleOption {
        &self.options()[0]
    }

    #[must_use]
    pub fn find(self, id: &str) -> Option<&'static StyleOption> {
        self.options().iter().find(|option| option.id == id)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AspectRatio => "Aspect Ratio",
            Self::Lighting => "Lighting Style",
            Self::CameraPerspective => "Camera Perspective",
        }
    }
}

impl fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
