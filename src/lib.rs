//! # nfce
//!
//! Brazilian NFC-e (Nota Fiscal de Consumidor Eletrônica) document engine:
//! access-key generation and validation, sequential numbering per series,
//! the issuance lifecycle, tax totals, QR consultation payloads, and
//! NFe 4.00 XML rendering.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! The XML layout follows the SEFAZ NFe 4.00 schema (`nfeProc`/`NFe`/`infNFe`).
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::DateTime;
//! use nfce::core::*;
//! use rust_decimal_macros::dec;
//!
//! let issued_at = DateTime::parse_from_rfc3339("2024-03-15T10:30:00-03:00").unwrap();
//!
//! let issuer = IssuerBuilder::new(
//!     "12345678000199",
//!     "Mercearia do Bairro LTDA",
//!     35,
//!     TaxRegime::SimplesNacional,
//!     Address {
//!         street: "Rua das Flores".into(),
//!         number: "100".into(),
//!         district: "Centro".into(),
//!         city: "São Paulo".into(),
//!         city_code: 3550308,
//!         uf: "SP".into(),
//!         postal_code: "01001000".into(),
//!     },
//! )
//! .trade_name("Mercearia do Bairro")
//! .build();
//!
//! let document = NfceBuilder::new(1, 1, issued_at)
//!     .operation_nature("VENDA AO CONSUMIDOR")
//!     .issuer(issuer)
//!     .add_item(
//!         LineItemBuilder::new(1, "P001", "Café torrado 500g", dec!(2), "UN", dec!(12.50))
//!             .classification("09012100", "5102")
//!             .icms("102")
//!             .build(),
//!     )
//!     .add_payment(Payment::new(PaymentMethod::Cash, dec!(25.00)))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(document.totals.products, dec!(25.00));
//! assert_eq!(document.status, DocumentStatus::Draft);
//! assert!(access_key::validate(&document.access_key));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document types, access keys, numbering, lifecycle, totals, QR payloads |
//! | `xml` | NFe 4.00 `nfeProc` XML rendering |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
