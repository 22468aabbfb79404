//! Named paper sizes and page setup.
//!
//! Dimensions are in PDF points (1/72 inch), covering the ISO A/B/C/RA/SRA series
//! plus the common North American sizes.

use crate::geometry::{Margins, Size};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageSizeError {
    #[error("Unknown page size: '{0}'")]
    Unknown(String),
    #[error("Page dimensions must be positive, got {0}x{1}")]
    NonPositive(f32, f32),
}

const NAMED_SIZES: &[(&str, f32, f32)] = &[
    ("4A0", 4768.28, 6741.54),
    ("2A0", 3370.39, 4768.28),
    ("A0", 2383.94, 3370.39),
    ("A1", 1683.78, 2383.94),
    ("A2", 1190.55, 1683.78),
    ("A3", 841.89, 1190.55),
    ("A4", 595.28, 841.89),
    ("A5", 419.53, 595.28),
    ("A6", 297.64, 419.53),
    ("A7", 209.76, 297.64),
    ("A8", 147.4, 209.76),
    ("A9", 104.88, 147.4),
    ("A10", 73.7, 104.88),
    ("B0", 2834.65, 4008.19),
    ("B1", 2004.09, 2834.65),
    ("B2", 1417.32, 2004.09),
    ("B3", 1000.63, 1417.32),
    ("B4", 708.66, 1000.63),
    ("B5", 498.9, 708.66),
    ("B6", 354.33, 498.9),
    ("B7", 249.45, 354.33),
    ("B8", 175.75, 249.45),
    ("B9", 124.72, 175.75),
    ("B10", 87.87, 124.72),
    ("C0", 2599.37, 3676.54),
    ("C1", 1836.85, 2599.37),
    ("C2", 1298.27, 1836.85),
    ("C3", 918.43, 1298.27),
    ("C4", 649.13, 918.43),
    ("C5", 459.21, 649.13),
    ("C6", 323.15, 459.21),
    ("C7", 229.61, 323.15),
    ("C8", 161.57, 229.61),
    ("C9", 113.39, 161.57),
    ("C10", 79.37, 113.39),
    ("RA0", 2437.8, 3458.27),
    ("RA1", 1729.13, 2437.8),
    ("RA2", 1218.9, 1729.13),
    ("RA3", 864.57, 1218.9),
    ("RA4", 609.45, 864.57),
    ("SRA0", 2551.18, 3628.35),
    ("SRA1", 1814.17, 2551.18),
    ("SRA2", 1275.59, 1814.17),
    ("SRA3", 907.09, 1275.59),
    ("SRA4", 637.8, 907.09),
    ("EXECUTIVE", 521.86, 756.0),
    ("FOLIO", 612.0, 936.0),
    ("LEGAL", 612.0, 1008.0),
    ("LETTER", 612.0, 792.0),
    ("TABLOID", 792.0, 1224.0),
];

/// Either a named paper size or explicit `[width, height]` in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PageSize {
    Named(&'static str),
    Custom(f32, f32),
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Named("LETTER")
    }
}

impl PageSize {
    pub fn dimensions(&self) -> Size {
        match self {
            PageSize::Named(name) => NAMED_SIZES
                .iter()
                .find(|(n, _, _)| n == name)
                .map(|(_, w, h)| Size::new(*w, *h))
                .unwrap_or(Size::new(612.0, 792.0)),
            PageSize::Custom(w, h) => Size::new(*w, *h),
        }
    }
}

impl FromStr for PageSize {
    type Err = PageSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        NAMED_SIZES
            .iter()
            .find(|(name, _, _)| *name == upper)
            .map(|(name, _, _)| PageSize::Named(name))
            .ok_or_else(|| PageSizeError::Unknown(s.to_string()))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Named(name) => f.write_str(name),
            PageSize::Custom(w, h) => write!(f, "{}x{}", w, h),
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Name(String),
            Dims([f32; 2]),
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Name(name) => name.parse().map_err(de::Error::custom),
            PageSizeDef::Dims([w, h]) => {
                if w <= 0.0 || h <= 0.0 {
                    Err(de::Error::custom(PageSizeError::NonPositive(w, h)))
                } else {
                    Ok(PageSize::Custom(w, h))
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Everything the writer needs to open a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    pub size: Size,
    pub margins: Margins,
}

impl PageSetup {
    pub fn new(size: &PageSize, orientation: Orientation, margins: Margins) -> Self {
        let dims = size.dimensions();
        let size = match orientation {
            Orientation::Portrait => dims.portrait(),
            Orientation::Landscape => dims.landscape(),
        };
        Self { size, margins }
    }

    /// Width available to content between the left and right margins.
    pub fn content_width(&self) -> f32 {
        (self.size.width - self.margins.left - self.margins.right).max(0.0)
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::new(&PageSize::default(), Orientation::Portrait, Margins::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_sizes_are_case_insensitive() {
        let size: PageSize = "a4".parse().unwrap();
        assert_eq!(size, PageSize::Named("A4"));
        assert_eq!(size.dimensions(), Size::new(595.28, 841.89));
    }

    #[test]
    fn unknown_size_is_rejected() {
        assert!(matches!(
            "A11".parse::<PageSize>(),
            Err(PageSizeError::Unknown(_))
        ));
    }

    #[test]
    fn deserializes_custom_dimensions() {
        let size: PageSize = serde_json::from_str("[300, 400]").unwrap();
        assert_eq!(size.dimensions(), Size::new(300.0, 400.0));
        assert!(serde_json::from_str::<PageSize>("[0, 400]").is_err());
    }

    #[test]
    fn landscape_swaps_axes() {
        let setup = PageSetup::new(&PageSize::default(), Orientation::Landscape, Margins::all(10.0));
        assert_eq!(setup.size, Size::new(792.0, 612.0));
        assert_eq!(setup.content_width(), 772.0);
    }
}
