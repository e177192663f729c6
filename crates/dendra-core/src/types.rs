//! Numeric type aliases for the finite-volume data record.
//!
//! The discretization record is a set of flat vectors indexed by control
//! volume. Using aliases rather than newtypes keeps the record directly
//! consumable by matrix-assembly kernels.

/// Floating-point type for geometric and electrical quantities.
pub type Value = f64;

/// Index type for control volumes, segments and cells within a record.
pub type Index = u32;

/// Count type for partitions and totals.
pub type Size = u32;
