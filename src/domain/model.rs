use crate::utils::error::{InventoryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A single inventory entry.
///
/// Field order is the serialization order used by every codec:
/// `brand, type, year`. Equality covers all three fields.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Car {
    pub brand: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub year: i32,
}

impl Car {
    pub fn new(brand: impl Into<String>, car_type: impl Into<String>, year: i32) -> Self {
        Self {
            brand: brand.into(),
            car_type: car_type.into(),
            year,
        }
    }

    /// Builds a car from raw text fields, coercing the year.
    pub fn from_fields(brand: &str, car_type: &str, year: &str) -> Result<Self> {
        Ok(Self::new(brand, car_type, parse_year(year)?))
    }
}

pub fn parse_year(raw: &str) -> Result<i32> {
    let raw = raw.trim();
    raw.parse::<i32>()
        .map_err(|_| InventoryError::parse(None, format!("year '{}' is not an integer", raw)))
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.brand, self.car_type, self.year)
    }
}

impl fmt::Debug for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Car(brand={}, type={}, year={})",
            self.brand, self.car_type, self.year
        )
    }
}

/// On-disk format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Txt,
    Csv,
    Db,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Txt, Format::Csv, Format::Db];

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Csv => "csv",
            Format::Db => "db",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == ext.trim_start_matches('.'))
    }

    pub fn from_path(path: &str) -> Result<Self> {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| InventoryError::UnsupportedFormat {
                path: path.to_string(),
            })
    }

    /// Appends this format's extension to a bare file name.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What to do with candidates that already exist in the export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Let the user decide at export time.
    #[default]
    Ask,
    /// Leave duplicates out of the write.
    Skip,
    /// Write everything, duplicates included.
    Keep,
}

impl DuplicatePolicy {
    pub const NAMES: [&'static str; 3] = ["ask", "skip", "keep"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ask" => Some(Self::Ask),
            "skip" => Some(Self::Skip),
            "keep" => Some(Self::Keep),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: String,
    pub format: Format,
    pub written: usize,
    pub skipped: Vec<Car>,
}
