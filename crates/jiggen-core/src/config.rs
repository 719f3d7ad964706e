//! Puzzle configuration: serde structs plus validation.
//!
//! Validation runs before any geometry work and is the only place generation
//! refuses to start; everything downstream degrades to warnings instead.

use serde::{Deserialize, Serialize};

pub const MAX_PIECES: u32 = 10_000;
pub const MAX_PANEL_MM: f64 = 5_000.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("rows and columns must both be at least 1 (got {rows}x{columns})")]
    EmptyGrid { rows: u32, columns: u32 },
    #[error("grid {rows}x{columns} exceeds the {MAX_PIECES}-piece limit")]
    GridTooLarge { rows: u32, columns: u32 },
    #[error("panel dimensions must be positive and at most {MAX_PANEL_MM} mm (got {width}x{height})")]
    BadPanel { width: f64, height: f64 },
    #[error("kerf must lie in 0..=5 mm (got {value})")]
    BadKerf { value: f64 },
    #[error("clearance must lie in 0..=2 mm (got {value})")]
    BadClearance { value: f64 },
    #[error("corner radius must be non-negative and below half the short panel side (got {value})")]
    BadCornerRadius { value: f64 },
    #[error("knob size must lie in 10..=35 percent of the edge length (got {value})")]
    BadKnobSize { value: f64 },
    #[error("knob {field} must lie in 0..=1 (got {value})")]
    BadKnobRatio { field: &'static str, value: f64 },
    #[error("difficulty must lie in 1..=5 (got {value})")]
    BadDifficulty { value: u8 },
    #[error("cutout ratio must lie in 0.2..=0.8 (got {value})")]
    BadCutoutRatio { value: f64 },
    #[error("sheet dimensions must be positive (got {width}x{height})")]
    BadSheet { width: f64, height: f64 },
    #[error("sheet margin and gap must be non-negative (margin {margin}, gap {gap})")]
    BadSpacing { margin: f64, gap: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnobStyle {
    Classic,
    Organic,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnobSpec {
    pub style: KnobStyle,
    /// Bulb diameter as a percentage of the edge length.
    pub size: f64,
    /// 0 = shallow knobs, 1 = deep round knobs.
    pub roundness: f64,
    /// Scales per-edge parameter variation.
    pub jitter: f64,
    /// 1..=5; higher widens variation and bulb drift.
    pub difficulty: u8,
}

impl Default for KnobSpec {
    fn default() -> Self {
        Self {
            style: KnobStyle::Classic,
            size: 20.0,
            roundness: 0.5,
            jitter: 0.5,
            difficulty: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateShape {
    Rectangle,
    Circle,
    Oval,
    Heart,
    Star,
    Hexagon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Pieces stay at their grid position.
    Assembled,
    /// Row-major bounding-box packing on the sheet.
    Packed,
    /// Irregular-outline nesting on the sheet.
    Nested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NestStrategy {
    Fast,
    Balanced,
    MaximizeSaving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationSet {
    None,
    Half,
    Quarter,
}

impl RotationSet {
    pub fn angles_deg(self) -> &'static [f64] {
        match self {
            RotationSet::None => &[0.0],
            RotationSet::Half => &[0.0, 180.0],
            RotationSet::Quarter => &[0.0, 90.0, 180.0, 270.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetPreset {
    A2,
    A3,
    A4,
}

impl SheetPreset {
    /// Landscape dimensions in millimetres.
    pub fn dims(self) -> (f64, f64) {
        match self {
            SheetPreset::A2 => (594.0, 420.0),
            SheetPreset::A3 => (420.0, 297.0),
            SheetPreset::A4 => (297.0, 210.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetSpec {
    Preset(SheetPreset),
    Custom { width: f64, height: f64 },
}

impl SheetSpec {
    pub fn dims(&self) -> (f64, f64) {
        match *self {
            SheetSpec::Preset(p) => p.dims(),
            SheetSpec::Custom { width, height } => (width, height),
        }
    }
}

impl Default for SheetSpec {
    fn default() -> Self {
        SheetSpec::Preset(SheetPreset::A4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpec {
    pub mode: LayoutMode,
    pub strategy: NestStrategy,
    pub rotations: RotationSet,
    pub sheet: SheetSpec,
    /// Border kept free around the sheet, mm.
    pub margin: f64,
    /// Minimum spacing between placed pieces, mm.
    pub gap: f64,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Assembled,
            strategy: NestStrategy::Balanced,
            rotations: RotationSet::Half,
            sheet: SheetSpec::default(),
            margin: 5.0,
            gap: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Panel width, mm.
    pub width: f64,
    /// Panel height, mm.
    pub height: f64,
    pub rows: u32,
    pub columns: u32,
    pub seed: u32,
    pub knob: KnobSpec,
    /// Laser kerf, mm. Half of it is returned to each outline.
    pub kerf: f64,
    /// Intentional play between pieces, mm. Subtracted from the kerf
    /// compensation.
    pub clearance: f64,
    /// Border corner radius, mm. Zero keeps sharp corners.
    pub corner_radius: f64,
    pub template: TemplateShape,
    /// Cut a scaled-down copy of the template out of the middle.
    pub center_cutout: bool,
    /// Size of the centre cutout relative to the panel.
    pub cutout_ratio: f64,
    pub layout: LayoutSpec,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 150.0,
            rows: 4,
            columns: 5,
            seed: 1,
            knob: KnobSpec::default(),
            kerf: 0.0,
            clearance: 0.0,
            corner_radius: 0.0,
            template: TemplateShape::Rectangle,
            center_cutout: false,
            cutout_ratio: 0.4,
            layout: LayoutSpec::default(),
        }
    }
}

impl PuzzleConfig {
    pub fn cell_width(&self) -> f64 {
        self.width / self.columns as f64
    }

    pub fn cell_height(&self) -> f64 {
        self.height / self.rows as f64
    }

    pub fn piece_count(&self) -> u32 {
        self.rows * self.columns
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self
            .rows
            .checked_mul(self.columns)
            .is_none_or(|n| n > MAX_PIECES)
        {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if !(self.width > 0.0 && self.height > 0.0)
            || self.width > MAX_PANEL_MM
            || self.height > MAX_PANEL_MM
        {
            return Err(ConfigError::BadPanel {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=5.0).contains(&self.kerf) {
            return Err(ConfigError::BadKerf { value: self.kerf });
        }
        if !(0.0..=2.0).contains(&self.clearance) {
            return Err(ConfigError::BadClearance {
                value: self.clearance,
            });
        }
        let short_side = self.width.min(self.height);
        if self.corner_radius < 0.0 || self.corner_radius >= short_side / 2.0 {
            return Err(ConfigError::BadCornerRadius {
                value: self.corner_radius,
            });
        }
        if !(10.0..=35.0).contains(&self.knob.size) {
            return Err(ConfigError::BadKnobSize {
                value: self.knob.size,
            });
        }
        for (field, value) in [
            ("roundness", self.knob.roundness),
            ("jitter", self.knob.jitter),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::BadKnobRatio { field, value });
            }
        }
        if !(1..=5).contains(&self.knob.difficulty) {
            return Err(ConfigError::BadDifficulty {
                value: self.knob.difficulty,
            });
        }
        if self.center_cutout && !(0.2..=0.8).contains(&self.cutout_ratio) {
            return Err(ConfigError::BadCutoutRatio {
                value: self.cutout_ratio,
            });
        }
        let (sw, sh) = self.layout.sheet.dims();
        if !(sw > 0.0 && sh > 0.0) {
            return Err(ConfigError::BadSheet {
                width: sw,
                height: sh,
            });
        }
        if self.layout.margin < 0.0 || self.layout.gap < 0.0 {
            return Err(ConfigError::BadSpacing {
                margin: self.layout.margin,
                gap: self.layout.gap,
            });
        }
        Ok(())
    }
}
