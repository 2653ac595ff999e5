//! Display resolutions and the physical <-> virtual coordinate mapping
//!
//! Recorded pointer coordinates are stored in a fixed virtual resolution so a
//! task captured on one display can be replayed on another.

use crate::error::{Error, Result};
use std::str::FromStr;

/// Pixel dimensions of a display or of the virtual coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Named virtual resolutions a recording can be normalized to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingTarget {
    /// 1024x768, 4:3
    #[default]
    Xga,
    /// 1280x800, 16:10
    Wxga,
    /// 1366x768, ~16:9
    Fwxga,
}

impl ScalingTarget {
    pub fn resolution(self) -> Resolution {
        match self {
            ScalingTarget::Xga => Resolution::new(1024, 768),
            ScalingTarget::Wxga => Resolution::new(1280, 800),
            ScalingTarget::Fwxga => Resolution::new(1366, 768),
        }
    }
}

impl FromStr for ScalingTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "XGA" => Ok(ScalingTarget::Xga),
            "WXGA" => Ok(ScalingTarget::Wxga),
            "FWXGA" => Ok(ScalingTarget::Fwxga),
            other => Err(Error::Configuration(format!(
                "unknown scaling target '{}'",
                other
            ))),
        }
    }
}

/// Linear, per-axis mapping between physical pixels and virtual units.
///
/// Both directions truncate toward zero, so a round trip may lose up to one
/// unit of precision per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateScaler {
    physical: Resolution,
    virtual_res: Resolution,
}

impl CoordinateScaler {
    pub fn new(physical: Resolution, virtual_res: Resolution) -> Result<Self> {
        if physical.is_empty() {
            return Err(Error::Configuration(format!(
                "physical resolution {} has zero area",
                physical
            )));
        }
        if virtual_res.is_empty() {
            return Err(Error::Configuration(format!(
                "virtual resolution {} has zero area",
                virtual_res
            )));
        }
        Ok(Self {
            physical,
            virtual_res,
        })
    }

    pub fn physical(&self) -> Resolution {
        self.physical
    }

    pub fn virtual_resolution(&self) -> Resolution {
        self.virtual_res
    }

    /// Physical pixels -> virtual units
    pub fn to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        (
            scale_axis(x, self.virtual_res.width, self.physical.width),
            scale_axis(y, self.virtual_res.height, self.physical.height),
        )
    }

    /// Virtual units -> physical pixels
    pub fn to_physical(&self, x: i32, y: i32) -> (i32, i32) {
        (
            scale_axis(x, self.physical.width, self.virtual_res.width),
            scale_axis(y, self.physical.height, self.virtual_res.height),
        )
    }
}

fn scale_axis(value: i32, numerator: u32, denominator: u32) -> i32 {
    // i64 keeps the intermediate product from overflowing on large displays
    let scaled = value as i64 * numerator as i64 / denominator as i64;
    scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
