use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::access_key::{self, EMISSION_NORMAL};
use super::error::NfceError;
use super::money::round_half_up;
use super::status::DocumentStatus;
use super::totals::calculate_totals;
use super::types::*;

/// Builder for a line item.
///
/// Gross value is fixed at build time as quantity × unit price; it is not
/// recomputed later. Taxable unit/quantity/price default to the commercial
/// values unless overridden. ICMS/PIS/COFINS values are derived from
/// basis × rate / 100, rounded half-up to 2 decimal places.
pub struct LineItemBuilder {
    number: u32,
    product_code: String,
    description: String,
    ncm: String,
    cfop: String,
    commercial_unit: String,
    commercial_quantity: Decimal,
    commercial_unit_price: Decimal,
    taxable: Option<(String, Decimal, Decimal)>,
    discount: Option<Decimal>,
    include_in_total: bool,
    origin: MerchandiseOrigin,
    icms_cst: String,
    icms_bc_modality: Option<u8>,
    icms_base: Option<Decimal>,
    icms_rate: Option<Decimal>,
    pis: Option<(String, Option<(Decimal, Decimal)>)>,
    cofins: Option<(String, Option<(Decimal, Decimal)>)>,
}

impl LineItemBuilder {
    pub fn new(
        number: u32,
        product_code: impl Into<String>,
        description: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            number,
            product_code: product_code.into(),
            description: description.into(),
            ncm: String::new(),
            cfop: String::new(),
            commercial_unit: unit.into(),
            commercial_quantity: quantity,
            commercial_unit_price: unit_price,
            taxable: None,
            discount: None,
            include_in_total: true,
            origin: MerchandiseOrigin::National,
            icms_cst: String::new(),
            icms_bc_modality: None,
            icms_base: None,
            icms_rate: None,
            pis: None,
            cofins: None,
        }
    }

    /// Set the NCM (8 digits) and CFOP (4 digits) classification codes.
    pub fn classification(mut self, ncm: impl Into<String>, cfop: impl Into<String>) -> Self {
        self.ncm = ncm.into();
        self.cfop = cfop.into();
        self
    }

    /// Override the taxable unit/quantity/price (default: commercial values).
    pub fn taxable(mut self, unit: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        self.taxable = Some((unit.into(), quantity, unit_price));
        self
    }

    pub fn discount(mut self, amount: Decimal) -> Self {
        self.discount = Some(amount);
        self
    }

    /// Exclude the item from the document total (indTot 0).
    pub fn excluded_from_total(mut self) -> Self {
        self.include_in_total = false;
        self
    }

    pub fn origin(mut self, origin: MerchandiseOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Set the ICMS tax situation code without a calculation basis
    /// (e.g. "102" for Simples Nacional without credit).
    pub fn icms(mut self, cst: impl Into<String>) -> Self {
        self.icms_cst = cst.into();
        self
    }

    /// Set the ICMS basis modality, calculation basis, and rate.
    /// The ICMS value is derived at build time.
    pub fn icms_taxed(mut self, modality: u8, base: Decimal, rate: Decimal) -> Self {
        self.icms_bc_modality = Some(modality);
        self.icms_base = Some(base);
        self.icms_rate = Some(rate);
        self
    }

    /// Set the PIS situation code, basis, and rate; the value is derived
    /// at build time.
    pub fn pis(mut self, cst: impl Into<String>, base: Decimal, rate: Decimal) -> Self {
        self.pis = Some((cst.into(), Some((base, rate))));
        self
    }

    /// Set a PIS situation code with no calculation basis (exempt CSTs).
    pub fn pis_exempt(mut self, cst: impl Into<String>) -> Self {
        self.pis = Some((cst.into(), None));
        self
    }

    /// Set the COFINS situation code, basis, and rate; the value is
    /// derived at build time.
    pub fn cofins(mut self, cst: impl Into<String>, base: Decimal, rate: Decimal) -> Self {
        self.cofins = Some((cst.into(), Some((base, rate))));
        self
    }

    /// Set a COFINS situation code with no calculation basis.
    pub fn cofins_exempt(mut self, cst: impl Into<String>) -> Self {
        self.cofins = Some((cst.into(), None));
        self
    }

    pub fn build(self) -> LineItem {
        let gross_value = self.commercial_quantity * self.commercial_unit_price;

        let (taxable_unit, taxable_quantity, taxable_unit_price) = self.taxable.unwrap_or((
            self.commercial_unit.clone(),
            self.commercial_quantity,
            self.commercial_unit_price,
        ));

        let icms_value = match (self.icms_base, self.icms_rate) {
            (Some(base), Some(rate)) => Some(derive_tax_value(base, rate)),
            _ => None,
        };

        let (pis_cst, pis_base, pis_rate, pis_value) = split_contribution(self.pis);
        let (cofins_cst, cofins_base, cofins_rate, cofins_value) = split_contribution(self.cofins);

        LineItem {
            number: self.number,
            product_code: self.product_code,
            description: self.description,
            ncm: self.ncm,
            cfop: self.cfop,
            commercial_unit: self.commercial_unit,
            commercial_quantity: self.commercial_quantity,
            commercial_unit_price: self.commercial_unit_price,
            gross_value,
            taxable_unit,
            taxable_quantity,
            taxable_unit_price,
            discount: self.discount,
            include_in_total: self.include_in_total,
            origin: self.origin,
            icms_cst: self.icms_cst,
            icms_bc_modality: self.icms_bc_modality,
            icms_base: self.icms_base,
            icms_rate: self.icms_rate,
            icms_value,
            pis_cst,
            pis_base,
            pis_rate,
            pis_value,
            cofins_cst,
            cofins_base,
            cofins_rate,
            cofins_value,
        }
    }
}

/// basis × rate / 100, rounded half-up to 2 decimal places.
fn derive_tax_value(base: Decimal, rate: Decimal) -> Decimal {
    round_half_up(base * rate / dec!(100), 2)
}

type Contribution = Option<(String, Option<(Decimal, Decimal)>)>;

fn split_contribution(
    contribution: Contribution,
) -> (Option<String>, Option<Decimal>, Option<Decimal>, Option<Decimal>) {
    match contribution {
        Some((cst, Some((base, rate)))) => {
            let value = derive_tax_value(base, rate);
            (Some(cst), Some(base), Some(rate), Some(value))
        }
        Some((cst, None)) => (Some(cst), None, None, None),
        None => (None, None, None, None),
    }
}

/// Builder for the issuer identity block.
pub struct IssuerBuilder {
    cnpj: String,
    legal_name: String,
    trade_name: Option<String>,
    state_code: u8,
    state_registration: Option<String>,
    tax_regime: TaxRegime,
    address: Address,
}

impl IssuerBuilder {
    pub fn new(
        cnpj: impl Into<String>,
        legal_name: impl Into<String>,
        state_code: u8,
        tax_regime: TaxRegime,
        address: Address,
    ) -> Self {
        Self {
            cnpj: cnpj.into(),
            legal_name: legal_name.into(),
            trade_name: None,
            state_code,
            state_registration: None,
            tax_regime,
            address,
        }
    }

    pub fn trade_name(mut self, name: impl Into<String>) -> Self {
        self.trade_name = Some(name.into());
        self
    }

    pub fn state_registration(mut self, ie: impl Into<String>) -> Self {
        self.state_registration = Some(ie.into());
        self
    }

    pub fn build(self) -> Issuer {
        Issuer {
            cnpj: self.cnpj,
            legal_name: self.legal_name,
            trade_name: self.trade_name,
            state_code: self.state_code,
            state_registration: self.state_registration,
            tax_regime: self.tax_regime,
            address: self.address,
        }
    }
}

/// Builder for an NFC-e document.
///
/// `build()` validates the input, computes totals, generates the access
/// key (emission type normal), and returns the document in Draft status.
/// It does not consult the numbering store — pair with
/// [`super::DocumentAssembler`] to get the duplicate check and the
/// consultation URL.
pub struct NfceBuilder {
    number: u32,
    series: u16,
    issued_at: DateTime<FixedOffset>,
    operation_nature: String,
    operation_type: OperationType,
    purpose: EmissionPurpose,
    payment_term: PaymentTerm,
    environment: Environment,
    issuer: Option<Issuer>,
    recipient: Option<Recipient>,
    items: Vec<LineItem>,
    payments: Vec<Payment>,
    freight: Option<Decimal>,
    insurance: Option<Decimal>,
    other_expenses: Option<Decimal>,
}

impl NfceBuilder {
    pub fn new(number: u32, series: u16, issued_at: DateTime<FixedOffset>) -> Self {
        Self {
            number,
            series,
            issued_at,
            operation_nature: String::new(),
            operation_type: OperationType::Outbound,
            purpose: EmissionPurpose::Normal,
            payment_term: PaymentTerm::Cash,
            environment: Environment::Homologation,
            issuer: None,
            recipient: None,
            items: Vec::new(),
            payments: Vec::new(),
            freight: None,
            insurance: None,
            other_expenses: None,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn series(&self) -> u16 {
        self.series
    }

    pub fn operation_nature(mut self, nature: impl Into<String>) -> Self {
        self.operation_nature = nature.into();
        self
    }

    pub fn operation_type(mut self, operation_type: OperationType) -> Self {
        self.operation_type = operation_type;
        self
    }

    pub fn purpose(mut self, purpose: EmissionPurpose) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn payment_term(mut self, term: PaymentTerm) -> Self {
        self.payment_term = term;
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn recipient(mut self, recipient: Recipient) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn add_payment(mut self, payment: Payment) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn freight(mut self, amount: Decimal) -> Self {
        self.freight = Some(amount);
        self
    }

    pub fn insurance(mut self, amount: Decimal) -> Self {
        self.insurance = Some(amount);
        self
    }

    pub fn other_expenses(mut self, amount: Decimal) -> Self {
        self.other_expenses = Some(amount);
        self
    }

    /// Build the document: validate fields, compute totals, generate the
    /// access key, and set the initial Draft status.
    pub fn build(self) -> Result<Nfce, NfceError> {
        let issuer = self
            .issuer
            .ok_or_else(|| NfceError::InvalidInput("issuer is required".into()))?;

        if self.operation_nature.trim().is_empty() {
            return Err(NfceError::InvalidInput(
                "operation nature must not be empty".into(),
            ));
        }
        if self.items.is_empty() {
            return Err(NfceError::InvalidInput(
                "at least one line item is required".into(),
            ));
        }
        if self.payments.is_empty() {
            return Err(NfceError::InvalidInput(
                "at least one payment is required".into(),
            ));
        }

        validate_items(&self.items)?;

        if let Some(recipient) = &self.recipient {
            let id = &recipient.tax_id;
            if !(id.len() == 11 || id.len() == 14) || !id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(NfceError::InvalidInput(format!(
                    "recipient tax id must be a CPF (11 digits) or CNPJ (14 digits), got {id:?}"
                )));
            }
        }

        let totals = calculate_totals(&self.items, self.freight, self.insurance, self.other_expenses);

        let access_key = access_key::generate_nfce(
            issuer.state_code,
            self.issued_at,
            &issuer.cnpj,
            self.series,
            self.number,
            EMISSION_NORMAL,
        )?;

        tracing::debug!(
            number = self.number,
            series = self.series,
            access_key = %access_key,
            "built NFC-e draft"
        );

        Ok(Nfce {
            number: self.number,
            series: self.series,
            access_key,
            issued_at: self.issued_at,
            operation_nature: self.operation_nature,
            operation_type: self.operation_type,
            purpose: self.purpose,
            payment_term: self.payment_term,
            environment: self.environment,
            issuer,
            recipient: self.recipient,
            items: self.items,
            payments: self.payments,
            totals,
            status: DocumentStatus::Draft,
            authorization_protocol: None,
            authorized_at: None,
            signed_xml: None,
            authorized_xml: None,
            qr_code: None,
            consultation_url: None,
        })
    }
}

fn validate_items(items: &[LineItem]) -> Result<(), NfceError> {
    let mut seen = std::collections::HashSet::new();
    for item in items {
        if item.number == 0 {
            return Err(NfceError::InvalidInput(
                "item numbers are 1-based".into(),
            ));
        }
        if !seen.insert(item.number) {
            return Err(NfceError::InvalidInput(format!(
                "duplicate item number {}",
                item.number
            )));
        }
        if item.ncm.len() != 8 || !item.ncm.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NfceError::InvalidInput(format!(
                "item {}: NCM must be 8 digits, got {:?}",
                item.number, item.ncm
            )));
        }
        if item.cfop.len() != 4 || !item.cfop.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NfceError::InvalidInput(format!(
                "item {}: CFOP must be 4 digits, got {:?}",
                item.number, item.cfop
            )));
        }
        if item.icms_cst.is_empty() {
            return Err(NfceError::InvalidInput(format!(
                "item {}: ICMS situation code is required",
                item.number
            )));
        }
        if item.commercial_quantity <= Decimal::ZERO {
            return Err(NfceError::InvalidInput(format!(
                "item {}: quantity must be positive",
                item.number
            )));
        }
        if item.commercial_unit_price < Decimal::ZERO {
            return Err(NfceError::InvalidInput(format!(
                "item {}: unit price must not be negative",
                item.number
            )));
        }
    }
    Ok(())
}
