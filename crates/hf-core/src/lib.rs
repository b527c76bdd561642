//! hf-core: shared foundation for hydraflow.
//!
//! Contains:
//! - units (uom SI time + sample period conversions)
//! - numeric (Real + finite/positive checks)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{HfError, HfResult};
pub use numeric::*;
pub use units::*;
