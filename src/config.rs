//! Serializable banner configuration.
//!
//! A [`BannerConfig`] captures every user-facing setting in a JSON-friendly
//! shape. It is the value the surrounding application edits, previews and
//! exports.
//!
//! # Example
//!
//! ```
//! use banner_renderer::{BannerConfig, Resolution};
//!
//! let config = BannerConfig {
//!     resolution: Resolution::Qhd1440,
//!     selected_icons: vec!["car".into(), "id".into()],
//!     ..BannerConfig::default()
//! };
//!
//! let json = config.to_json().unwrap();
//! let restored = BannerConfig::from_json(&json).unwrap();
//! assert_eq!(restored, config);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::parse_hex;
use crate::compositor::{Compositor, RenderOutcome, RenderRequest};
use crate::error::Result;
use crate::glyph::{GlyphRasterizer, GlyphSource};
use crate::grid::{AssignmentPolicy, GridPlan, LayoutConfig};
use crate::surface::Surface;

/// Height of the interactive preview canvas in pixels.
pub const DEFAULT_PREVIEW_HEIGHT: u32 = 450;

const DEFAULT_ICONS: [&str; 10] = [
    "car",
    "motorbike",
    "id",
    "password",
    "user-heart",
    "home-shield",
    "notebook",
    "list-check",
    "credit-card",
    "address-book",
];

// ============================================================================
// Resolution
// ============================================================================

/// Output canvas size: a standard preset or custom dimensions.
///
/// ```json
/// "1080p"
/// // or
/// { "custom": { "width": 1500, "height": 500 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    #[default]
    #[serde(rename = "1080p")]
    Hd1080,
    #[serde(rename = "1440p")]
    Qhd1440,
    #[serde(rename = "2160p")]
    Uhd2160,
    Custom { width: u32, height: u32 },
}

impl Resolution {
    /// The standard presets, smallest first.
    pub const PRESETS: [Resolution; 3] = [Self::Hd1080, Self::Qhd1440, Self::Uhd2160];

    /// Returns `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            Self::Hd1080 => (1920, 1080),
            Self::Qhd1440 => (2560, 1440),
            Self::Uhd2160 => (3840, 2160),
            Self::Custom { width, height } => (width, height),
        }
    }

    /// Human-readable label, e.g. `1080p (1920×1080)`.
    pub fn label(&self) -> String {
        let (w, h) = self.dimensions();
        match self {
            Self::Hd1080 => format!("1080p ({w}×{h})"),
            Self::Qhd1440 => format!("1440p ({w}×{h})"),
            Self::Uhd2160 => format!("2160p ({w}×{h})"),
            Self::Custom { .. } => format!("Custom ({w}×{h})"),
        }
    }

    /// Returns the preset with these dimensions, or a custom resolution.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::PRESETS
            .into_iter()
            .find(|preset| preset.dimensions() == (width, height))
            .unwrap_or(Self::Custom { width, height })
    }
}

// ============================================================================
// Advisory
// ============================================================================

/// Whether a configuration can be exported, and why not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    Ready,
    /// The icon selection is empty.
    NoIcons,
    /// Icon size, spacing or padding leave no room for a single cell.
    NothingFits,
}

impl Advisory {
    pub fn can_export(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// A short message suitable for a warning label or tooltip.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Ready => "Ready to export",
            Self::NoIcons => "Select at least one icon",
            Self::NothingFits => "No icons fit. Reduce spacing or icon size.",
        }
    }
}

// ============================================================================
// BannerConfig
// ============================================================================

/// The complete set of banner settings.
///
/// Missing JSON keys fall back to the defaults, which reproduce the stock
/// 1080p banner.
///
/// # JSON Format
///
/// ```json
/// {
///   "resolution": "1080p",
///   "selectedIcons": ["car", "id"],
///   "iconSize": 24,
///   "spacing": 16,
///   "padding": 0,
///   "rotation": 0,
///   "color": "#d1d5db",
///   "iconOpacity": 100,
///   "bgColor": "#ffffff",
///   "bgOpacity": 100,
///   "assignment": { "kind": "round-robin" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct BannerConfig {
    pub resolution: Resolution,

    /// Icon names in the order they cycle through the grid.
    pub selected_icons: Vec<String>,

    /// Glyph box edge in pixels.
    pub icon_size: i64,

    /// Gap between adjacent cells in pixels.
    pub spacing: i64,

    /// Margin between the canvas edge and the grid area in pixels.
    pub padding: i64,

    /// Glyph rotation in degrees, nominally -180 to 180.
    pub rotation: i32,

    /// Stroke color as hex RGB.
    pub color: String,

    /// Icon opacity, 0-100.
    pub icon_opacity: u8,

    /// Background color as hex RGB.
    pub bg_color: String,

    /// Background opacity, 0-100. Zero exports a transparent background.
    pub bg_opacity: u8,

    /// How icons are assigned to cells.
    pub assignment: AssignmentPolicy,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            selected_icons: DEFAULT_ICONS.iter().map(|s| s.to_string()).collect(),
            icon_size: 24,
            spacing: 16,
            padding: 0,
            rotation: 0,
            color: "#d1d5db".to_string(),
            icon_opacity: 100,
            bg_color: "#ffffff".to_string(),
            bg_opacity: 100,
            assignment: AssignmentPolicy::default(),
        }
    }
}

impl BannerConfig {
    /// Creates a config with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.resolution.dimensions()
    }

    /// The geometric inputs for grid planning.
    pub fn layout(&self) -> LayoutConfig {
        let (width, height) = self.dimensions();
        LayoutConfig::new(width, height, self.icon_size, self.spacing, self.padding)
    }

    /// Plans the grid at full resolution.
    pub fn grid(&self) -> GridPlan {
        self.layout().plan()
    }

    /// Checks whether this configuration produces an exportable banner.
    ///
    /// An empty selection takes precedence over an infeasible grid.
    pub fn advisory(&self) -> Advisory {
        if self.selected_icons.is_empty() {
            Advisory::NoIcons
        } else if !self.grid().valid {
            Advisory::NothingFits
        } else {
            Advisory::Ready
        }
    }

    /// Builds a render request, parsing both colors.
    pub fn render_request(&self) -> Result<RenderRequest<'_>> {
        let (canvas_width, canvas_height) = self.dimensions();
        Ok(RenderRequest {
            canvas_width,
            canvas_height,
            icons: &self.selected_icons,
            icon_size: self.icon_size,
            spacing: self.spacing,
            padding: self.padding,
            rotation: self.rotation as f32,
            color: parse_hex(&self.color)?,
            icon_opacity: self.icon_opacity,
            bg_color: parse_hex(&self.bg_color)?,
            bg_opacity: self.bg_opacity,
            assignment: self.assignment,
        })
    }

    /// Renders this configuration at full resolution.
    pub fn render<G>(&self, surface: &mut Surface, glyphs: &G) -> Result<RenderOutcome>
    where
        G: GlyphSource + ?Sized,
    {
        self.render_with(&Compositor::new(), surface, glyphs)
    }

    /// Renders this configuration with a specific compositor.
    pub fn render_with<G, R>(
        &self,
        compositor: &Compositor<R>,
        surface: &mut Surface,
        glyphs: &G,
    ) -> Result<RenderOutcome>
    where
        G: GlyphSource + ?Sized,
        R: GlyphRasterizer,
    {
        compositor.render(surface, glyphs, &self.render_request()?)
    }

    /// Returns a copy scaled down to a preview canvas `height` pixels tall.
    ///
    /// The width follows the aspect ratio. Icon size, spacing and padding
    /// scale by the same factor; the icon size never drops below 1 and the
    /// spacing never below 0.
    pub fn preview(&self, height: u32) -> Self {
        let (width, full_height) = self.dimensions();
        if full_height == 0 {
            return self.clone();
        }

        let scale = f64::from(height) / f64::from(full_height);
        let preview_width = (f64::from(width) * scale).round() as u32;
        let scaled = |v: i64| (v as f64 * scale).round() as i64;

        Self {
            resolution: Resolution::Custom {
                width: preview_width,
                height,
            },
            icon_size: scaled(self.icon_size).max(1),
            spacing: scaled(self.spacing).max(0),
            padding: scaled(self.padding),
            ..self.clone()
        }
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn defaults_match_stock_banner() {
        let config = BannerConfig::default();
        assert_eq!(config.dimensions(), (1920, 1080));
        assert_eq!(config.selected_icons.len(), 10);
        assert_eq!(config.selected_icons[0], "car");
        assert_eq!(config.icon_size, 24);
        assert_eq!(config.spacing, 16);
        assert_eq!(config.color, "#d1d5db");
        assert_eq!(config.assignment, AssignmentPolicy::RoundRobin);

        let grid = config.grid();
        assert_eq!((grid.cols, grid.rows, grid.total), (48, 27, 1296));
        assert_eq!(config.advisory(), Advisory::Ready);
    }

    #[test]
    fn resolution_presets() {
        assert_eq!(Resolution::Qhd1440.dimensions(), (2560, 1440));
        assert_eq!(Resolution::Uhd2160.dimensions(), (3840, 2160));
        assert_eq!(Resolution::Hd1080.label(), "1080p (1920×1080)");
        assert_eq!(Resolution::from_dimensions(2560, 1440), Resolution::Qhd1440);
        assert_eq!(
            Resolution::from_dimensions(1500, 500),
            Resolution::Custom { width: 1500, height: 500 }
        );
    }

    #[test]
    fn resolution_json_format() {
        let json = serde_json::to_string(&Resolution::Uhd2160).unwrap();
        assert_eq!(json, "\"2160p\"");

        let custom: Resolution =
            serde_json::from_str(r#"{"custom":{"width":800,"height":200}}"#).unwrap();
        assert_eq!(custom.dimensions(), (800, 200));
    }

    #[test]
    fn config_json_uses_camel_case() {
        let json = BannerConfig::default().to_json_pretty().unwrap();
        assert!(json.contains("\"selectedIcons\""));
        assert!(json.contains("\"iconOpacity\""));
        assert!(json.contains("\"bgColor\""));
        assert!(json.contains("\"round-robin\""));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = BannerConfig::from_json(r#"{"iconSize": 48, "bgOpacity": 0}"#).unwrap();
        assert_eq!(config.icon_size, 48);
        assert_eq!(config.bg_opacity, 0);
        assert_eq!(config.spacing, 16);
        assert_eq!(config.resolution, Resolution::Hd1080);

        let empty = BannerConfig::from_json("{}").unwrap();
        assert_eq!(empty, BannerConfig::default());
    }

    #[test]
    fn advisory_distinguishes_empty_selection_from_overflow() {
        let mut config = BannerConfig::default();
        config.selected_icons.clear();
        assert_eq!(config.advisory(), Advisory::NoIcons);
        assert!(!config.advisory().can_export());

        // Both problems at once: the empty selection wins
        config.spacing = 5000;
        assert_eq!(config.advisory(), Advisory::NoIcons);

        config.selected_icons.push("car".into());
        assert_eq!(config.advisory(), Advisory::NothingFits);
        assert_eq!(config.advisory().message(), "No icons fit. Reduce spacing or icon size.");
    }

    #[test]
    fn render_request_rejects_bad_colors() {
        let config = BannerConfig {
            color: "chartreuse-ish".into(),
            ..BannerConfig::default()
        };
        assert!(matches!(config.render_request(), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn render_request_carries_settings() {
        let config = BannerConfig {
            rotation: -45,
            ..BannerConfig::default()
        };
        let request = config.render_request().unwrap();
        assert_eq!((request.canvas_width, request.canvas_height), (1920, 1080));
        assert_eq!(request.rotation, -45.0);
        assert_eq!(request.icons.len(), 10);
        assert_eq!((request.color.red, request.color.green, request.color.blue), (0xd1, 0xd5, 0xdb));
    }

    #[test]
    fn preview_scales_to_fixed_height() {
        let preview = BannerConfig::default().preview(DEFAULT_PREVIEW_HEIGHT);
        assert_eq!(preview.dimensions(), (800, 450));
        // 24 * 450/1080 = 10, 16 * 450/1080 = 6.67
        assert_eq!(preview.icon_size, 10);
        assert_eq!(preview.spacing, 7);
        assert_eq!(preview.selected_icons, BannerConfig::default().selected_icons);
    }

    #[test]
    fn preview_keeps_icons_visible() {
        let config = BannerConfig {
            resolution: Resolution::Uhd2160,
            icon_size: 8,
            spacing: 0,
            padding: 1,
            ..BannerConfig::default()
        };
        let preview = config.preview(45);
        assert_eq!(preview.dimensions(), (80, 45));
        assert_eq!(preview.icon_size, 1);
        assert_eq!(preview.spacing, 0);
        assert_eq!(preview.padding, 0);
    }
}
