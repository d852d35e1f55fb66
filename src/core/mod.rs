//! Core Module - Business Logic
//!
//! Otak aplikasi: NIK encoding, field mutators, mismatch injection, dan
//! batch generator.

pub mod generator;
pub mod injector;
pub mod mutators;
pub mod nik;

pub use generator::*;
pub use injector::*;
pub use mutators::*;
pub use nik::*;
