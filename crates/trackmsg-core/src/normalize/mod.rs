//! Conversion of raw fixed-width text fields into display and numeric forms.
//!
//! Normalizers never fail: a value that does not match its pattern is passed
//! through with a malformed annotation and no numeric value. The orchestrator
//! turns a missing numeric value into a warning.

pub mod altitude;
pub mod coordinate;

pub use altitude::{NormalizedAltitude, normalize_altitude};
pub use coordinate::{Axis, NormalizedCoordinate, normalize_coordinate};
