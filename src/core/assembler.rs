use super::builder::NfceBuilder;
use super::error::NfceError;
use super::numbering::{NumberStore, SequenceAllocator};
use super::qrcode::QrCodeBuilder;
use super::types::Nfce;

/// Orchestrates creation of a new document: rejects duplicate
/// (number, series) pairs, builds the document, and attaches the QR
/// consultation URL. Persistence stays with the caller.
///
/// The availability check and the caller's subsequent insert are not one
/// atomic step; a storage-level uniqueness constraint on (number, series)
/// must back this up under concurrent issuance.
pub struct DocumentAssembler<'a, S: NumberStore + ?Sized> {
    allocator: SequenceAllocator<'a, S>,
    qr: QrCodeBuilder,
}

impl<'a, S: NumberStore + ?Sized> DocumentAssembler<'a, S> {
    pub fn new(allocator: SequenceAllocator<'a, S>, qr: QrCodeBuilder) -> Self {
        Self { allocator, qr }
    }

    /// Next available number for `series`, for callers that let the
    /// engine pick the document number.
    pub fn next_number(&self, series: u16) -> u32 {
        self.allocator.next_number(series)
    }

    /// Assemble a fully populated document in Draft status.
    pub fn assemble(&self, builder: NfceBuilder) -> Result<Nfce, NfceError> {
        let number = builder.number();
        let series = builder.series();

        if !self.allocator.is_available(number, series) {
            return Err(NfceError::DuplicateDocument { number, series });
        }

        let mut document = builder.build()?;

        let url = self.qr.consultation_url(
            &document.access_key,
            document.environment,
            document.issued_at,
            document.totals.total,
            document.recipient.as_ref().map(|r| r.tax_id.as_str()),
        );
        document.qr_code = Some(url.clone());
        document.consultation_url = Some(url);

        tracing::info!(
            number,
            series,
            access_key = %document.access_key,
            "NFC-e assembled"
        );

        Ok(document)
    }
}
