//! Core fiscal document types, access keys, numbering, lifecycle, and totals.
//!
//! This module provides the foundational types for NFC-e issuance based on
//! the SEFAZ NFe 4.00 semantic model (documento modelo 65).

pub mod access_key;
mod assembler;
mod builder;
mod error;
pub(crate) mod money;
mod numbering;
mod qrcode;
mod status;
mod totals;
mod types;

pub use assembler::*;
pub use builder::*;
pub use error::*;
pub use numbering::*;
pub use qrcode::*;
pub use status::*;
pub use totals::*;
pub use types::*;
