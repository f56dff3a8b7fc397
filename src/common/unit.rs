//! Unit conversion utilities.
//!
//! OpenDocument expresses lengths as a number glued to a unit, e.g. the
//! `fo:margin-left="1.25cm"` and `fo:font-size="12pt"` attribute values.
//! This module parses those strings and converts between the units LaTeX
//! and CSS understand.

use crate::Result;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Points per inch (TeX big points are not used by ODF)
pub const PT_PER_INCH: f64 = 72.0;
/// CSS reference pixel density
pub const PX_PER_INCH: f64 = 96.0;

/// Length units accepted in OpenDocument attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Millimeter
    Millimeter,
    /// Centimeter
    Centimeter,
    /// Point (1/72 inch)
    Point,
    /// Pica (1/6 inch)
    Pica,
    /// Inch
    Inch,
    /// Pixel (CSS reference pixel, 1/96 inch)
    Pixel,
}

impl LengthUnit {
    /// Get the unit abbreviation
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Point => "pt",
            Self::Pica => "pc",
            Self::Inch => "in",
            Self::Pixel => "px",
        }
    }

    /// Parse unit from string
    fn from_str_internal(s: &str) -> Option<Self> {
        match s {
            "mm" => Some(Self::Millimeter),
            "cm" => Some(Self::Centimeter),
            "pt" => Some(Self::Point),
            "pc" => Some(Self::Pica),
            "in" | "inch" => Some(Self::Inch),
            "px" => Some(Self::Pixel),
            _ => None,
        }
    }

    /// Points per one of this unit
    #[inline]
    fn points_per_unit(&self) -> f64 {
        match self {
            Self::Millimeter => PT_PER_INCH / 25.4,
            Self::Centimeter => PT_PER_INCH / 2.54,
            Self::Point => 1.0,
            Self::Pica => 12.0,
            Self::Inch => PT_PER_INCH,
            Self::Pixel => PT_PER_INCH / PX_PER_INCH,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_internal(s)
            .ok_or_else(|| crate::Error::InvalidFormat(format!("Unknown length unit '{}'", s)))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Length value with unit
///
/// Represents a length measurement with a numeric value and a unit.
/// Supports parsing from strings (e.g., "2.5cm", "10pt") and conversion
/// between units.
///
/// # Examples
///
/// ```
/// use longan::common::unit::{Length, LengthUnit};
///
/// // Parse from string
/// let length = "2.5cm".parse::<Length>().unwrap();
/// assert_eq!(length.value(), 2.5);
/// assert_eq!(length.unit(), LengthUnit::Centimeter);
///
/// // Convert to points
/// let pt = length.to_points();
/// assert!((pt - 70.866).abs() < 0.01);
///
/// // Create from value and unit
/// let length = Length::new(10.0, LengthUnit::Point);
/// assert_eq!(length.to_string(), "10pt");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    /// Create a new length measurement
    #[inline]
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Zero length in points
    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, LengthUnit::Point)
    }

    /// Get the numeric value
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Get the unit
    #[inline]
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Convert to points
    ///
    /// # Examples
    ///
    /// ```
    /// use longan::common::unit::{Length, LengthUnit};
    ///
    /// let inch = Length::new(1.0, LengthUnit::Inch);
    /// assert_eq!(inch.to_points(), 72.0);
    ///
    /// let px = Length::new(96.0, LengthUnit::Pixel);
    /// assert_eq!(px.to_points(), 72.0);
    /// ```
    #[inline]
    pub fn to_points(&self) -> f64 {
        self.value * self.unit.points_per_unit()
    }

    /// Convert to a length in the given unit
    pub fn to_unit(&self, unit: LengthUnit) -> Self {
        let points = self.to_points();
        Self::new(points / unit.points_per_unit(), unit)
    }

    /// Format for use in LaTeX length arguments.
    ///
    /// LaTeX understands mm, cm, pt, pc and in directly; pixel values are
    /// rewritten as points first.
    pub fn as_latex(&self) -> String {
        match self.unit {
            LengthUnit::Pixel => self.to_unit(LengthUnit::Point).to_string(),
            _ => self.to_string(),
        }
    }

    /// Format for use in CSS property values
    #[inline]
    pub fn as_css(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Length {
    type Err = crate::Error;

    /// Parse length from string (e.g., "2.5cm", "10pt")
    ///
    /// # Examples
    ///
    /// ```
    /// use longan::common::unit::{Length, LengthUnit};
    ///
    /// let length = "0.635cm".parse::<Length>().unwrap();
    /// assert_eq!(length.unit(), LengthUnit::Centimeter);
    ///
    /// let length = "-5mm".parse::<Length>().unwrap();
    /// assert_eq!(length.value(), -5.0);
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map(|(i, _)| i)
            .unwrap_or(s.len());

        let (number, unit) = s.split_at(split);
        if number.is_empty() {
            return Err(crate::Error::InvalidFormat(format!(
                "No numeric value found in '{}'",
                s
            )));
        }

        let value: f64 = fast_float2::parse(number).map_err(|_| {
            crate::Error::InvalidFormat(format!("Failed to parse numeric value from '{}'", s))
        })?;

        if unit.is_empty() {
            // A bare number has no defined unit in ODF attribute values
            return Err(crate::Error::InvalidFormat(format!(
                "Missing length unit in '{}'",
                s
            )));
        }

        Ok(Self::new(value, LengthUnit::from_str(unit)?))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.fract() == 0.0 && self.value.abs() < 1e15 {
            write!(f, "{}{}", self.value as i64, self.unit.as_str())
        } else {
            let mut buf = ryu::Buffer::new();
            write!(f, "{}{}", buf.format(self.value), self.unit.as_str())
        }
    }
}

impl PartialEq for Length {
    fn eq(&self, other: &Self) -> bool {
        (self.to_points() - other.to_points()).abs() < 1e-10
    }
}

impl PartialOrd for Length {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_points().partial_cmp(&other.to_points())
    }
}
