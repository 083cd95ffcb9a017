//! # Fastener Reference Types
//!
//! Grade identifiers, thread geometry, and the strength/allowable stress
//! table types behind the reference dataset.
//!
//! ## Example
//!
//! ```rust
//! use fastener_core::fasteners::{parse_diameter, BoltGrade, ThreadSeries};
//!
//! let grade = BoltGrade::from_str_flexible("SA-193 B7").unwrap();
//! let dia = parse_diameter("1-1/2").unwrap();
//! assert_eq!(dia.0, 1.5);
//! assert_eq!(ThreadSeries::default_for(dia), ThreadSeries::EightUn);
//! assert_eq!(grade.code(), "A193_B7");
//! ```

pub mod allowable;
pub mod grades;
pub mod strength;
pub mod threads;

// Re-export grade types
pub use grades::{BoltGrade, NutGrade};

// Re-export thread geometry types
pub use threads::{derived_stress_area, parse_diameter, ThreadSeries};

// Re-export table types
pub use allowable::{lookup_allowable, AllowableRange, AllowableResult, TempEntry};
pub use strength::{lookup_yield, StrengthRange, StressValue, PLACEHOLDER_MARKER};
