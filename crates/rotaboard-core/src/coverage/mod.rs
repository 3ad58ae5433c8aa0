//! Staffing coverage analysis.
//!
//! Given the template set and the staff roster, reports weekly required
//! hours, roster capacity, per-slot available staff and warnings for slots
//! without enough staff or without a keyholder.

mod analyzer;
mod staff;

pub use analyzer::{
    coverage_percentage, staff_capacity, weekly_required_hours, CoverageAnalyzer, CoverageReport,
    KeyholderGap, SlotCoverage, StaffCapacity, Warning,
};
pub use staff::{AvailabilityEntry, AvailabilityGrid, SlotRef, StaffMember};
