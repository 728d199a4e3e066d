// src/models.rs
use crate::errors::StudioError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An embeddable image: base64 payload, declared mime type and a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageValue {
    pub data: String,
    pub mime_type: String,
    pub name: String,
}

impl ImageValue {
    pub fn new(
        data: impl Into<String>,
        mime_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    /// Parses `data:<mime>;base64,<payload>`, as produced by browser canvases.
    pub fn from_data_url(url: &str, name: impl Into<String>) -> Result<Self, StudioError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::ImageProcessing("Not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| StudioError::ImageProcessing("Data URL has no payload".to_string()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| StudioError::ImageProcessing("Data URL is not base64".to_string()))?;
        if mime_type.is_empty() || payload.is_empty() {
            return Err(StudioError::ImageProcessing(
                "Data URL is missing its mime type or payload".to_string(),
            ));
        }
        Ok(Self::new(payload, mime_type, name))
    }

    /// The bare base64 payload, with any `data:...,` prefix removed.
    pub fn payload(&self) -> &str {
        if self.data.starts_with("data:") {
            self.data
                .split_once(',')
                .map(|(_, payload)| payload)
                .unwrap_or_default()
        } else {
            &self.data
        }
    }
}

/// The transformation applied by one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Exterior,
    Interior,
    Planning,
    SketchColorize,
    #[serde(rename = "plan_to_3d")]
    PlanTo3d,
    PlanToPerspective,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Exterior,
        Mode::Interior,
        Mode::Planning,
        Mode::SketchColorize,
        Mode::PlanTo3d,
        Mode::PlanToPerspective,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Exterior => "exterior",
            Mode::Interior => "interior",
            Mode::Planning => "planning",
            Mode::SketchColorize => "sketch_colorize",
            Mode::PlanTo3d => "plan_to_3d",
            Mode::PlanToPerspective => "plan_to_perspective",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| StudioError::Validation(format!("Unknown mode: {}", s)))
    }
}

/// What the UI currently shows: a generation mode, or the gallery browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveMode {
    Generate(Mode),
    Gallery,
}

impl FromStr for ActiveMode {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "gallery" {
            return Ok(ActiveMode::Gallery);
        }
        s.parse().map(ActiveMode::Generate)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    #[default]
    Draft,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Classic,
    #[serde(rename = "3:4")]
    ClassicPortrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Classic => "4:3",
            AspectRatio::ClassicPortrait => "3:4",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacadeType {
    #[default]
    StreetFront,
    CornerLot,
    Villa,
    Bungalow,
    KoiPond,
    Random,
    Restaurant,
    Resort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sky {
    #[default]
    Sunny,
    Cloudy,
    Overcast,
    Sunset,
    Dusk,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Urban,
    Forest,
    EmptyLot,
    Garden,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreetActivity {
    #[default]
    None,
    FewCars,
    Pedestrians,
    FewPedestrians,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Effects {
    pub fog: bool,
    pub rain: bool,
    pub after_rain: bool,
    pub lights_on: bool,
    pub daytime: bool,
    pub nighttime: bool,
}

impl Effects {
    /// Wire names of the enabled flags, in declaration order.
    pub fn active_names(&self) -> Vec<&'static str> {
        [
            (self.fog, "fog"),
            (self.rain, "rain"),
            (self.after_rain, "afterRain"),
            (self.lights_on, "lightsOn"),
            (self.daytime, "daytime"),
            (self.nighttime, "nighttime"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteriorRenderType {
    #[default]
    Redesign,
    Enhance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteriorLighting {
    #[default]
    Sunny,
    Foggy,
    Night,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SketchStyle {
    #[default]
    BlackWhiteSketch,
    Watercolor,
    Lineless,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanView {
    TopDown,
    #[default]
    Perspective,
    HighAngle,
    WideAngle,
    Detail,
    #[serde(rename = "angle_45")]
    Angle45,
}

/// Form state for one request. Fields outside the active mode are carried but ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditingOptions {
    pub quality: Quality,
    pub enhance4k: bool,
    pub ai_materials: bool,
    pub aspect_ratio: AspectRatio,
    pub style_image: Option<ImageValue>,
    pub style_extract_lighting: bool,
    pub style_extract_context: bool,
    pub style_extract_design: bool,
    pub architecture_image: Option<ImageValue>,
    pub moodboard_image: Option<ImageValue>,
    pub blend_architecture: bool,
    pub blend_ratio: u8,

    pub facade_type: FacadeType,
    pub sky: Sky,
    pub environment: Environment,
    pub street_activity: StreetActivity,
    pub effects: Effects,

    pub interior_render_type: InteriorRenderType,
    pub interior_lighting: InteriorLighting,
    pub interior_variation_seed: u64,

    pub sketch_style: SketchStyle,

    pub plan_view: PlanView,
}

impl Default for EditingOptions {
    fn default() -> Self {
        Self {
            quality: Quality::Draft,
            enhance4k: false,
            ai_materials: false,
            aspect_ratio: AspectRatio::Landscape,
            style_image: None,
            style_extract_lighting: true,
            style_extract_context: false,
            style_extract_design: false,
            architecture_image: None,
            moodboard_image: None,
            blend_architecture: false,
            blend_ratio: 50,
            facade_type: FacadeType::StreetFront,
            sky: Sky::Sunny,
            environment: Environment::Urban,
            street_activity: StreetActivity::None,
            effects: Effects::default(),
            interior_render_type: InteriorRenderType::Redesign,
            interior_lighting: InteriorLighting::Sunny,
            interior_variation_seed: 1,
            sketch_style: SketchStyle::BlackWhiteSketch,
            plan_view: PlanView::Perspective,
        }
    }
}

impl EditingOptions {
    /// Blend ratio as a percentage, capped at 100.
    pub fn blend_percent(&self) -> u8 {
        self.blend_ratio.min(100)
    }
}

/// Everything one "Generate" action needs. Built once and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(flatten)]
    pub options: EditingOptions,
    #[serde(default)]
    pub prompt: String,
}

/// Images produced by one orchestrator invocation, in view order.
pub type GenerationResult = Vec<ImageValue>;

/// Up to three advisory suggestions.
pub type SuggestionList = Vec<String>;
