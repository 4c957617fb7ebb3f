use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::error::NfceError;
use super::types::Nfce;

/// Issuance lifecycle status of an NFC-e.
///
/// The regulated flow is `Draft → Signed → Sent → Authorized → Cancelled`.
/// `Rejected` and `Denied` are alternate terminal outcomes of SEFAZ
/// processing, reachable from `Sent`; they are not produced by any
/// transition in this crate but are part of the wire enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Assembled but not yet signed (RASCUNHO).
    Draft,
    /// Digitally signed (ASSINADA).
    Signed,
    /// Submitted to SEFAZ (ENVIADA).
    Sent,
    /// Authorized by SEFAZ (AUTORIZADA).
    Authorized,
    /// Rejected by SEFAZ (REJEITADA) — terminal.
    Rejected,
    /// Cancelled after authorization (CANCELADA) — terminal.
    Cancelled,
    /// Denied by SEFAZ (DENEGADA) — terminal.
    Denied,
}

impl DocumentStatus {
    /// Wire string used in persisted records and API payloads.
    pub fn wire_code(&self) -> &'static str {
        match self {
            Self::Draft => "RASCUNHO",
            Self::Signed => "ASSINADA",
            Self::Sent => "ENVIADA",
            Self::Authorized => "AUTORIZADA",
            Self::Rejected => "REJEITADA",
            Self::Cancelled => "CANCELADA",
            Self::Denied => "DENEGADA",
        }
    }

    /// Parse from the wire string.
    pub fn from_wire_code(code: &str) -> Option<Self> {
        match code {
            "RASCUNHO" => Some(Self::Draft),
            "ASSINADA" => Some(Self::Signed),
            "ENVIADA" => Some(Self::Sent),
            "AUTORIZADA" => Some(Self::Authorized),
            "REJEITADA" => Some(Self::Rejected),
            "CANCELADA" => Some(Self::Cancelled),
            "DENEGADA" => Some(Self::Denied),
            _ => None,
        }
    }

    /// Whether this status accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled | Self::Denied)
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_code())
    }
}

/// Minimum length of a cancellation justification, per the SEFAZ event rules.
pub const MIN_CANCEL_JUSTIFICATION: usize = 15;

impl Nfce {
    /// Mark the document as signed (RASCUNHO → ASSINADA).
    ///
    /// The signature computation itself happens at the system boundary;
    /// this transition only records that it took place.
    pub fn sign(&mut self) -> Result<(), NfceError> {
        self.require_status(DocumentStatus::Draft, "sign")?;
        self.status = DocumentStatus::Signed;
        tracing::info!(number = self.number, series = self.series, "NFC-e signed");
        Ok(())
    }

    /// Mark the document as sent to SEFAZ (ASSINADA → ENVIADA).
    pub fn send(&mut self) -> Result<(), NfceError> {
        self.require_status(DocumentStatus::Signed, "send")?;
        self.status = DocumentStatus::Sent;
        tracing::info!(number = self.number, series = self.series, "NFC-e sent");
        Ok(())
    }

    /// Record a SEFAZ authorization (ENVIADA → AUTORIZADA), storing the
    /// protocol number and the authorization timestamp.
    pub fn authorize(
        &mut self,
        protocol: impl Into<String>,
        authorized_at: DateTime<FixedOffset>,
    ) -> Result<(), NfceError> {
        self.require_status(DocumentStatus::Sent, "authorize")?;
        self.status = DocumentStatus::Authorized;
        self.authorization_protocol = Some(protocol.into());
        self.authorized_at = Some(authorized_at);
        tracing::info!(
            number = self.number,
            series = self.series,
            protocol = self.authorization_protocol.as_deref(),
            "NFC-e authorized"
        );
        Ok(())
    }

    /// Cancel an authorized document (AUTORIZADA → CANCELADA).
    ///
    /// The justification must have at least 15 characters.
    pub fn cancel(&mut self, justification: &str) -> Result<(), NfceError> {
        self.require_status(DocumentStatus::Authorized, "cancel")?;
        if justification.chars().count() < MIN_CANCEL_JUSTIFICATION {
            return Err(NfceError::InvalidInput(format!(
                "cancellation justification must have at least {MIN_CANCEL_JUSTIFICATION} characters"
            )));
        }
        self.status = DocumentStatus::Cancelled;
        tracing::info!(number = self.number, series = self.series, "NFC-e cancelled");
        Ok(())
    }

    fn require_status(
        &self,
        required: DocumentStatus,
        operation: &'static str,
    ) -> Result<(), NfceError> {
        if self.status != required {
            return Err(NfceError::InvalidStateTransition {
                operation,
                required,
                actual: self.status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_round_trip() {
        for status in [
            DocumentStatus::Draft,
            DocumentStatus::Signed,
            DocumentStatus::Sent,
            DocumentStatus::Authorized,
            DocumentStatus::Rejected,
            DocumentStatus::Cancelled,
            DocumentStatus::Denied,
        ] {
            assert_eq!(DocumentStatus::from_wire_code(status.wire_code()), Some(status));
        }
        assert_eq!(DocumentStatus::from_wire_code("PENDENTE"), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(DocumentStatus::Cancelled.is_terminal());
        assert!(DocumentStatus::Rejected.is_terminal());
        assert!(DocumentStatus::Denied.is_terminal());
        assert!(!DocumentStatus::Draft.is_terminal());
        assert!(!DocumentStatus::Authorized.is_terminal());
    }
}
