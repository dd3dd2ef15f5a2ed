//! Distribution archive formats

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Type of distribution archive for a Python package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionFormat {
    Wheel,
    Sdist,
}

impl DistributionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wheel => "wheel",
            Self::Sdist => "sdist",
        }
    }
}

impl fmt::Display for DistributionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wheel" => Ok(Self::Wheel),
            "sdist" => Ok(Self::Sdist),
            other => Err(Error::InvalidFormat {
                value: other.to_string(),
            }),
        }
    }
}
