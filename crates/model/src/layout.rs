//! Output layouts: target aspect ratio plus compositing arrangement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed target aspect ratios of the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 9:16 vertical.
    Portrait,
    /// 16:9 horizontal.
    Landscape,
    /// 1:1.
    Square,
}

impl AspectRatio {
    /// Width over height.
    pub fn value(self) -> f64 {
        match self {
            Self::Portrait => 9.0 / 16.0,
            Self::Landscape => 16.0 / 9.0,
            Self::Square => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Portrait => "9:16",
            Self::Landscape => "16:9",
            Self::Square => "1:1",
        }
    }
}

/// Canvas edge a docked camera strip is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockEdge {
    Top,
    Bottom,
}

/// Canvas corner of a picture-in-picture inset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// How the two layers are arranged on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arrangement {
    /// Content fills the canvas; the camera is not drawn.
    ContentOnly,
    /// Camera as a full-width strip on one edge, content in the rest.
    CameraDocked(DockEdge),
    /// Content fills the canvas, camera as a small corner inset.
    PictureInPicture(Corner),
}

/// Named output layout variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputLayout {
    #[serde(rename = "tiktok-content-only")]
    TiktokContentOnly,
    #[serde(rename = "tiktok-cam-top")]
    TiktokCamTop,
    #[serde(rename = "tiktok-cam-bottom")]
    TiktokCamBottom,
    #[serde(rename = "youtube-content-only")]
    YoutubeContentOnly,
    #[serde(rename = "youtube-pip-tl")]
    YoutubePipTopLeft,
    #[serde(rename = "youtube-pip-tr")]
    YoutubePipTopRight,
    #[serde(rename = "youtube-pip-bl")]
    YoutubePipBottomLeft,
    #[serde(rename = "youtube-pip-br")]
    YoutubePipBottomRight,
    #[serde(rename = "square-content-only")]
    SquareContentOnly,
    #[serde(rename = "other-16:9")]
    Landscape,
    #[serde(rename = "other-9:16")]
    Portrait,
}

impl OutputLayout {
    pub const ALL: [OutputLayout; 11] = [
        OutputLayout::TiktokContentOnly,
        OutputLayout::TiktokCamTop,
        OutputLayout::TiktokCamBottom,
        OutputLayout::YoutubeContentOnly,
        OutputLayout::YoutubePipTopLeft,
        OutputLayout::YoutubePipTopRight,
        OutputLayout::YoutubePipBottomLeft,
        OutputLayout::YoutubePipBottomRight,
        OutputLayout::SquareContentOnly,
        OutputLayout::Landscape,
        OutputLayout::Portrait,
    ];

    /// Serialized name, e.g. `"tiktok-cam-top"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TiktokContentOnly => "tiktok-content-only",
            Self::TiktokCamTop => "tiktok-cam-top",
            Self::TiktokCamBottom => "tiktok-cam-bottom",
            Self::YoutubeContentOnly => "youtube-content-only",
            Self::YoutubePipTopLeft => "youtube-pip-tl",
            Self::YoutubePipTopRight => "youtube-pip-tr",
            Self::YoutubePipBottomLeft => "youtube-pip-bl",
            Self::YoutubePipBottomRight => "youtube-pip-br",
            Self::SquareContentOnly => "square-content-only",
            Self::Landscape => "other-16:9",
            Self::Portrait => "other-9:16",
        }
    }

    /// Human-readable name for layout pickers.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::TiktokContentOnly => "TikTok (Content Only)",
            Self::TiktokCamTop => "TikTok (Camera Top)",
            Self::TiktokCamBottom => "TikTok (Camera Bottom)",
            Self::YoutubeContentOnly => "YouTube (Content Only)",
            Self::YoutubePipTopLeft => "YouTube (PiP Top-Left)",
            Self::YoutubePipTopRight => "YouTube (PiP Top-Right)",
            Self::YoutubePipBottomLeft => "YouTube (PiP Bottom-Left)",
            Self::YoutubePipBottomRight => "YouTube (PiP Bottom-Right)",
            Self::SquareContentOnly => "Square (Content Only)",
            Self::Landscape => "Landscape (16:9)",
            Self::Portrait => "Portrait (9:16)",
        }
    }

    pub fn aspect(self) -> AspectRatio {
        match self {
            Self::TiktokContentOnly | Self::TiktokCamTop | Self::TiktokCamBottom | Self::Portrait => {
                AspectRatio::Portrait
            }
            Self::YoutubeContentOnly
            | Self::YoutubePipTopLeft
            | Self::YoutubePipTopRight
            | Self::YoutubePipBottomLeft
            | Self::YoutubePipBottomRight
            | Self::Landscape => AspectRatio::Landscape,
            Self::SquareContentOnly => AspectRatio::Square,
        }
    }

    pub fn arrangement(self) -> Arrangement {
        match self {
            Self::TiktokCamTop => Arrangement::CameraDocked(DockEdge::Top),
            Self::TiktokCamBottom => Arrangement::CameraDocked(DockEdge::Bottom),
            Self::YoutubePipTopLeft => Arrangement::PictureInPicture(Corner::TopLeft),
            Self::YoutubePipTopRight => Arrangement::PictureInPicture(Corner::TopRight),
            Self::YoutubePipBottomLeft => Arrangement::PictureInPicture(Corner::BottomLeft),
            Self::YoutubePipBottomRight => Arrangement::PictureInPicture(Corner::BottomRight),
            Self::TiktokContentOnly
            | Self::YoutubeContentOnly
            | Self::SquareContentOnly
            | Self::Landscape
            | Self::Portrait => Arrangement::ContentOnly,
        }
    }

    /// Whether the camera layer takes part in this layout.
    pub fn uses_camera(self) -> bool {
        self.arrangement() != Arrangement::ContentOnly
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::TiktokCamTop
    }
}

impl fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown layout name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown output layout '{0}'")]
pub struct UnknownLayout(pub String);

impl FromStr for OutputLayout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str() == s)
            .ok_or_else(|| UnknownLayout(s.to_string()))
    }
}

/// A labelled group of layouts, as shown in the layout picker.
#[derive(Debug, Clone, Copy)]
pub struct LayoutGroup {
    pub label: &'static str,
    pub variants: &'static [OutputLayout],
}

pub const LAYOUT_GROUPS: [LayoutGroup; 3] = [
    LayoutGroup {
        label: "TikTok (9:16)",
        variants: &[
            OutputLayout::TiktokCamTop,
            OutputLayout::TiktokCamBottom,
            OutputLayout::TiktokContentOnly,
            OutputLayout::Portrait,
        ],
    },
    LayoutGroup {
        label: "YouTube (16:9)",
        variants: &[
            OutputLayout::YoutubePipTopLeft,
            OutputLayout::YoutubePipTopRight,
            OutputLayout::YoutubePipBottomLeft,
            OutputLayout::YoutubePipBottomRight,
            OutputLayout::YoutubeContentOnly,
            OutputLayout::Landscape,
        ],
    },
    LayoutGroup {
        label: "Other",
        variants: &[OutputLayout::SquareContentOnly],
    },
];

/// Boolean output options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Draw a blurred, darkened copy of the full frame behind the layers.
    #[serde(default)]
    pub add_blurred_background: bool,
}

/// Layout selection plus options, as chosen in the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub layout: OutputLayout,
    #[serde(default)]
    pub options: OutputOptions,
}

impl OutputConfig {
    pub fn new(layout: OutputLayout) -> Self {
        Self {
            layout,
            options: OutputOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for layout in OutputLayout::ALL {
            assert_eq!(layout.as_str().parse::<OutputLayout>().unwrap(), layout);
            let json = serde_json::to_string(&layout).unwrap();
            assert_eq!(json, format!("\"{}\"", layout.as_str()));
        }
        assert!("instagram-reel".parse::<OutputLayout>().is_err());
    }

    #[test]
    fn test_groups_cover_every_layout_once() {
        let mut seen: Vec<OutputLayout> = LAYOUT_GROUPS
            .iter()
            .flat_map(|g| g.variants.iter().copied())
            .collect();
        assert_eq!(seen.len(), OutputLayout::ALL.len());
        seen.dedup();
        for layout in OutputLayout::ALL {
            assert!(seen.contains(&layout), "{layout} missing from groups");
        }
    }

    #[test]
    fn test_arrangements() {
        assert_eq!(
            OutputLayout::TiktokCamBottom.arrangement(),
            Arrangement::CameraDocked(DockEdge::Bottom)
        );
        assert_eq!(
            OutputLayout::YoutubePipTopRight.arrangement(),
            Arrangement::PictureInPicture(Corner::TopRight)
        );
        assert!(!OutputLayout::Landscape.uses_camera());
        assert_eq!(OutputLayout::SquareContentOnly.aspect(), AspectRatio::Square);
        assert_eq!(OutputLayout::Portrait.aspect().label(), "9:16");
    }

    #[test]
    fn test_output_config_json_shape() {
        let config = OutputConfig {
            layout: OutputLayout::YoutubePipBottomLeft,
            options: OutputOptions {
                add_blurred_background: true,
            },
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["layout"], "youtube-pip-bl");
        assert_eq!(json["options"]["addBlurredBackground"], true);
    }
}
