//! core::units
//!
//! The unit table used when reporting sizes.
//!
//! Each unit maps to a positive byte divisor. The table is fixed and ordered;
//! [`Unit::ALL`] lists units in definition order, which is also the order
//! they appear in help text.
//!
//! # Example
//!
//! ```
//! use revsize::core::units::Unit;
//!
//! let unit: Unit = "kib".parse().unwrap();
//! assert_eq!(unit.scale(), 1024);
//! assert_eq!(unit.convert(209_715), 205);
//!
//! assert!("kb".parse::<Unit>().is_err());
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from unit lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnitError {
    /// The name is not one of the recognized units.
    #[error("invalid unit: \"{name}\" (expected one of: {expected})")]
    InvalidUnit {
        /// The name that was requested
        name: String,
        /// The recognized names, `|`-separated
        expected: String,
    },
}

/// A reporting unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Plain bytes
    #[default]
    Byte,
    /// Kibibytes (1024 bytes)
    Kib,
    /// Mebibytes (1024 * 1024 bytes)
    Mib,
}

impl Unit {
    /// All units, in definition order.
    pub const ALL: [Unit; 3] = [Unit::Byte, Unit::Kib, Unit::Mib];

    /// The unit's name as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Unit::Byte => "byte",
            Unit::Kib => "kib",
            Unit::Mib => "mib",
        }
    }

    /// The number of bytes in one of this unit. Always positive.
    pub fn scale(self) -> u64 {
        match self {
            Unit::Byte => 1,
            Unit::Kib => 1024,
            Unit::Mib => 1024 * 1024,
        }
    }

    /// Iterate over the recognized unit names in definition order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|unit| unit.name())
    }

    /// Convert a byte count into this unit, rounded to the nearest integer.
    ///
    /// Exact halves round to the even neighbour.
    pub fn convert(self, bytes: u64) -> u64 {
        let scale = self.scale();
        let quotient = bytes / scale;
        let twice_remainder = (bytes % scale) * 2;

        if twice_remainder > scale || (twice_remainder == scale && quotient % 2 == 1) {
            quotient + 1
        } else {
            quotient
        }
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|unit| unit.name() == name)
            .ok_or_else(|| UnitError::InvalidUnit {
                name: name.to_string(),
                expected: Self::names().collect::<Vec<_>>().join("|"),
            })
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
