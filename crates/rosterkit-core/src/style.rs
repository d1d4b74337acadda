//! Cell styling
//!
//! A [`CellStyle`] is a plain value: cloning a cell clones its style, so two
//! cells never share style state. Editing the alignment of one copied cell
//! leaves the source cell untouched.
//!
//! The tuple mirrors what spreadsheet files carry per cell:
//! font, borders, fill, number format, protection and alignment.

use serde::{Deserialize, Serialize};

/// RGB colour, `0xRRGGBB`
pub type Rgb = u32;

/// Full per-cell style tuple
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub font: Font,
    pub borders: Borders,
    pub fill: Fill,
    /// Number format code (`None` means "General")
    pub number_format: Option<String>,
    pub protection: Protection,
    pub alignment: Alignment,
}

impl CellStyle {
    /// True when nothing differs from the default style
    pub fn is_default(&self) -> bool {
        *self == CellStyle::default()
    }

    /// Replace the font
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Replace the alignment
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Font attributes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Font family (`None` keeps the workbook default)
    pub name: Option<String>,
    /// Size in points
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<Rgb>,
}

impl Font {
    /// Font with a family and a size, nothing else set
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: Some(name.into()),
            size: Some(size),
            ..Default::default()
        }
    }
}

/// Border line style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderLine {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
}

/// Borders on the four edges of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borders {
    pub left: BorderLine,
    pub right: BorderLine,
    pub top: BorderLine,
    pub bottom: BorderLine,
}

impl Borders {
    /// Same line on every edge
    pub fn all(line: BorderLine) -> Self {
        Self {
            left: line,
            right: line,
            top: line,
            bottom: line,
        }
    }
}

/// Solid background fill
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub background: Option<Rgb>,
}

/// Cell protection flags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protection {
    pub locked: bool,
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        // Spreadsheet cells are locked unless told otherwise
        Self {
            locked: true,
            hidden: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    #[default]
    Bottom,
    Top,
    Center,
    Justify,
}

/// Text alignment within a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    pub wrap_text: bool,
}

impl Alignment {
    /// Horizontally centred, nothing else
    pub fn centered() -> Self {
        Self {
            horizontal: HorizontalAlign::Center,
            ..Default::default()
        }
    }

    /// Wrapped text, default placement
    pub fn wrapped() -> Self {
        Self {
            wrap_text: true,
            ..Default::default()
        }
    }

    /// Wrapped and horizontally centred
    pub fn wrapped_centered() -> Self {
        Self {
            horizontal: HorizontalAlign::Center,
            wrap_text: true,
            ..Default::default()
        }
    }

    /// Centred on both axes, wrapped
    pub fn middle() -> Self {
        Self {
            horizontal: HorizontalAlign::Center,
            vertical: VerticalAlign::Center,
            wrap_text: true,
        }
    }
}
