//! NFe 4.00 XML rendering.
//!
//! Renders a populated [`crate::core::Nfce`] into the canonical
//! `nfeProc`/`NFe`/`infNFe` tree. Rendering is deterministic: the same
//! document state always yields byte-identical XML.

mod nfe;
mod writer;

pub use nfe::to_nfe_xml;
pub(crate) use writer::XmlWriter;

/// Namespace of the SEFAZ NFe schema.
pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";

/// Schema version emitted on `nfeProc` and `infNFe`.
pub const NFE_VERSION: &str = "4.00";
