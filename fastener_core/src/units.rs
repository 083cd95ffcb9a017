//! # Unit Types
//!
//! Type-safe wrappers for the units the bolting calculations touch.
//! These provide compile-time safety against unit confusion while
//! remaining lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Bolting reference data uses a small, fixed set of US customary units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## US Customary Units
//!
//! Matching the source standards (ASME B1.1, ASME Section II-D):
//! - Diameter: inches (in)
//! - Stress area: square inches (in²)
//! - Stress: kips per square inch (ksi), pounds per square inch (psi)
//! - Bolt load: pounds-force (lbf)
//! - Torque: foot-pounds (ft-lb), inch-pounds (in-lb)
//!
//! ## Example
//!
//! ```rust
//! use fastener_core::units::{FtLb, InLb, Ksi, Psi};
//!
//! let stress = Ksi(23.6);
//! let psi: Psi = stress.into();
//! assert_eq!(psi.0, 23_600.0);
//!
//! let torque: FtLb = InLb(1_930.7).into();
//! assert!((torque.0 - 160.9).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Nominal diameter or other length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

// ============================================================================
// Force Units
// ============================================================================

/// Force in pounds (bolt pre-load)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in pounds per square inch (psi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psi(pub f64);

/// Stress in kips per square inch (ksi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ksi(pub f64);

impl From<Psi> for Ksi {
    fn from(psi: Psi) -> Self {
        Ksi(psi.0 / 1000.0)
    }
}

impl From<Ksi> for Psi {
    fn from(ksi: Ksi) -> Self {
        Psi(ksi.0 * 1000.0)
    }
}

// ============================================================================
// Torque Units
// ============================================================================

/// Torque in foot-pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FtLb(pub f64);

/// Torque in inch-pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InLb(pub f64);

impl From<FtLb> for InLb {
    fn from(ftlb: FtLb) -> Self {
        InLb(ftlb.0 * 12.0)
    }
}

impl From<InLb> for FtLb {
    fn from(inlb: InLb) -> Self {
        FtLb(inlb.0 / 12.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Tensile stress area in square inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqIn(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Inches);
impl_arithmetic!(Pounds);
impl_arithmetic!(Psi);
impl_arithmetic!(Ksi);
impl_arithmetic!(FtLb);
impl_arithmetic!(InLb);
impl_arithmetic!(SqIn);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ksi_to_psi() {
        let ksi = Ksi(23.6);
        let psi: Psi = ksi.into();
        assert_eq!(psi.0, 23_600.0);
    }

    #[test]
    fn test_inlb_to_ftlb() {
        let inlb = InLb(120.0);
        let ftlb: FtLb = inlb.into();
        assert_eq!(ftlb.0, 10.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = FtLb(160.0);
        let b = FtLb(40.0);
        assert_eq!((a + b).0, 200.0);
        assert_eq!((a - b).0, 120.0);
        assert_eq!((a * 0.30).0, 48.0);
        assert_eq!((a / 2.0).0, 80.0);
    }

    #[test]
    fn test_serialization() {
        let area = SqIn(0.606);
        let json = serde_json::to_string(&area).unwrap();
        assert_eq!(json, "0.606");

        let roundtrip: SqIn = serde_json::from_str(&json).unwrap();
        assert_eq!(area, roundtrip);
    }
}
