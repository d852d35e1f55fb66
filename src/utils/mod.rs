//! Utils Module - Helper Functions & Shared Utilities
//!
//! Tabel referensi, fake-data provider, dan CSV I/O.

pub mod constants;
pub mod csv_io;
pub mod faker;

pub use constants::*;
pub use csv_io::*;
