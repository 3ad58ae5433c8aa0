//! # Rotaboard Core Library
//!
//! This library provides the core logic for Rotaboard, a shift-template
//! planner. A manager defines day templates of shift blocks, assigns them to
//! weekdays and records staff availability; the core answers whether enough
//! staff can cover every slot. The CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Layout**: greedy interval partitioning of overlapping blocks into
//!   display columns
//! - **Timeline**: edit session for one day template (move with snapping,
//!   length cycling, headcount, add/remove, drag, gap and keyholder detection)
//! - **Coverage**: weekly required hours, staff capacity and per-slot
//!   sufficiency warnings
//! - **Storage**: TOML configuration plus template store and staff directory
//!   contracts
//!
//! ## Key Components
//!
//! - [`TimelineEditor`]: Edit session over a day template
//! - [`layout()`]: Column layout for shift blocks
//! - [`CoverageAnalyzer`]: Coverage report for a week
//! - [`TemplateStore`] / [`StaffDirectory`]: Collaborator contracts

pub mod coverage;
pub mod error;
pub mod layout;
pub mod schedule;
pub mod storage;
pub mod timeline;

pub use coverage::{
    AvailabilityGrid, CoverageAnalyzer, CoverageReport, SlotCoverage, SlotRef, StaffCapacity,
    StaffMember, Warning,
};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use layout::{layout, Layout, Placement};
pub use schedule::{
    BlockId, DayAssignment, DayTemplate, ShiftBlock, ShiftLengths, TemplateSet, TimeWindow,
    WeekAssignment,
};
pub use storage::{
    Config, FileStaffDirectory, FileTemplateStore, MemoryStaffDirectory, MemoryTemplateStore,
    StaffDirectory, TemplateStore,
};
pub use timeline::{
    color_for_length, ColorToken, CoverageGap, EditOutcome, EditorSettings, KeyholderRole,
    TimelineEditor,
};
