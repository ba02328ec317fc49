//! Bounded Field-Level Repair
//!
//! Turns a failing [`crate::validation::ValidationResult`] into targeted regeneration of
//! the offending fields. Only suggestions tied to error-severity issues are acted on;
//! everything flows through a [`crate::content::DraftPatch`] so untouched fields stay
//! structurally identical. The loop never runs more than [`MAX_REPAIR_ATTEMPTS`]
//! iterations and stops early once an iteration changes nothing.

pub mod dispatcher;
pub mod plan;
pub mod strategies;

pub use dispatcher::{
    FieldRepairOutcome, FieldRepairRecord, RepairDispatcher, RepairIteration, RepairOutcome,
    RepairState, TerminationReason, MAX_REPAIR_ATTEMPTS,
};
pub use plan::{is_actionable, section_index, FieldGroup, RepairPlan};
