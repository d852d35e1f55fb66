//! e-KTP Forge Library
//!
//! Synthetic Indonesian e-KTP record generator for exercising identity
//! validation systems. Records are derived from job-application rows and a
//! configurable share is deliberately corrupted:
//! - Name spelling / formatting variations
//! - NIK digit changes, swaps, insertions and deletions
//! - Phone digit edits and prefix reformatting
//! - Birth-date day / month / year shifts
//!
//! Every corruption is annotated so the validator's verdict can be checked.

pub mod core;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod utils;

pub use crate::core::{
    EktpGenerator, InjectionOutcome, InjectionState, MismatchInjector, NikParts,
};
pub use models::{
    AppError, AppResult, BaseRecord, DataQuality, EktpRecord, ErrorCode, Gender,
    GeneratorConfig, IdentityRecord, MismatchAnnotation, MismatchType, MutationProbabilities,
};
pub use pipeline::{run_batch, BatchOutcome, InputSource};
pub use render::{CardPayload, DocumentRenderer, JsonCardRenderer};
pub use report::{DetailedMismatch, ValidationReport};
