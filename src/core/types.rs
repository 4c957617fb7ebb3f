use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::DocumentStatus;

/// An NFC-e — the top-level fiscal document (modelo 65).
///
/// Created in [`DocumentStatus::Draft`] and mutated only through the
/// lifecycle transitions; header fields are immutable once authorized.
/// Documents are never deleted, only transitioned to a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nfce {
    /// Document number (nNF), unique within its series.
    pub number: u32,
    /// Numbering series (serie).
    pub series: u16,
    /// 44-digit access key, check digit included.
    pub access_key: String,
    /// Issue timestamp with UTC offset (dhEmi).
    pub issued_at: DateTime<FixedOffset>,
    /// Operation nature free text (natOp), e.g. "VENDA AO CONSUMIDOR".
    pub operation_nature: String,
    /// Inbound/outbound indicator (tpNF).
    pub operation_type: OperationType,
    /// Emission purpose (finNFe).
    pub purpose: EmissionPurpose,
    /// Payment term indicator (indPag).
    pub payment_term: PaymentTerm,
    /// Issuance environment (tpAmb).
    pub environment: Environment,
    /// Issuer identity block (emit).
    pub issuer: Issuer,
    /// Optional consumer identification (dest) — NFC-e allows anonymous sales.
    pub recipient: Option<Recipient>,
    /// Ordered line items (det). Owned exclusively by this document.
    pub items: Vec<LineItem>,
    /// Ordered payments (pag/detPag). Owned exclusively by this document.
    pub payments: Vec<Payment>,
    /// Document-level totals (total/ICMSTot).
    pub totals: Totals,
    /// Current lifecycle status.
    pub status: DocumentStatus,
    /// SEFAZ authorization protocol number, set on authorization.
    pub authorization_protocol: Option<String>,
    /// When SEFAZ authorized the document.
    pub authorized_at: Option<DateTime<FixedOffset>>,
    /// Signed XML payload, set at the signing boundary.
    pub signed_xml: Option<String>,
    /// Authorized XML payload (nfeProc with protocol), set after authorization.
    pub authorized_xml: Option<String>,
    /// QR code content (the consultation URL).
    pub qr_code: Option<String>,
    /// Public consultation URL for the document.
    pub consultation_url: Option<String>,
}

/// Issuer identity block (emit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issuer {
    /// CNPJ, exactly 14 digits.
    pub cnpj: String,
    /// Legal name (xNome).
    pub legal_name: String,
    /// Trade name (xFant).
    pub trade_name: Option<String>,
    /// IBGE numeric state code (cUF), e.g. 35 for São Paulo.
    pub state_code: u8,
    /// State registration number (IE).
    pub state_registration: Option<String>,
    /// Tax regime (CRT).
    pub tax_regime: TaxRegime,
    /// Establishment address (enderEmit).
    pub address: Address,
}

/// Establishment address (enderEmit). All fields are mandatory in the
/// 4.00 schema for the issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Street (xLgr).
    pub street: String,
    /// Street number (nro).
    pub number: String,
    /// District (xBairro).
    pub district: String,
    /// City name (xMun).
    pub city: String,
    /// IBGE city code (cMun), e.g. 3550308 for São Paulo.
    pub city_code: u32,
    /// Two-letter state abbreviation (UF), e.g. "SP".
    pub uf: String,
    /// CEP postal code, 8 digits.
    pub postal_code: String,
}

/// Optional consumer identification (dest).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    /// CPF (11 digits) or CNPJ (14 digits).
    pub tax_id: String,
    /// Consumer name (xNome).
    pub name: Option<String>,
}

impl Recipient {
    pub fn new(tax_id: impl Into<String>) -> Self {
        Self {
            tax_id: tax_id.into(),
            name: None,
        }
    }

    pub fn named(tax_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tax_id: tax_id.into(),
            name: Some(name.into()),
        }
    }
}

/// A document line item (det/prod + det/imposto).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// 1-based item sequence number (nItem), unique within the document.
    pub number: u32,
    /// Internal product code (cProd).
    pub product_code: String,
    /// Product description (xProd).
    pub description: String,
    /// NCM merchandise classification, 8 digits.
    pub ncm: String,
    /// CFOP fiscal operation code, 4 digits.
    pub cfop: String,
    /// Commercial unit (uCom).
    pub commercial_unit: String,
    /// Commercial quantity (qCom).
    pub commercial_quantity: Decimal,
    /// Commercial unit price (vUnCom).
    pub commercial_unit_price: Decimal,
    /// Gross value (vProd) = quantity × unit price, fixed at build time.
    pub gross_value: Decimal,
    /// Taxable unit (uTrib), defaults to the commercial unit.
    pub taxable_unit: String,
    /// Taxable quantity (qTrib), defaults to the commercial quantity.
    pub taxable_quantity: Decimal,
    /// Taxable unit price (vUnTrib), defaults to the commercial price.
    pub taxable_unit_price: Decimal,
    /// Item discount (vDesc).
    pub discount: Option<Decimal>,
    /// Whether the item participates in the document total (indTot).
    pub include_in_total: bool,
    /// Merchandise origin (orig).
    pub origin: MerchandiseOrigin,
    /// ICMS tax situation code (CST), e.g. "00" or "102".
    pub icms_cst: String,
    /// ICMS calculation-basis modality (modBC).
    pub icms_bc_modality: Option<u8>,
    /// ICMS calculation basis (vBC).
    pub icms_base: Option<Decimal>,
    /// ICMS rate percentage (pICMS).
    pub icms_rate: Option<Decimal>,
    /// ICMS value (vICMS) = basis × rate / 100, fixed at build time.
    pub icms_value: Option<Decimal>,
    /// PIS tax situation code.
    pub pis_cst: Option<String>,
    /// PIS calculation basis (vBC).
    pub pis_base: Option<Decimal>,
    /// PIS rate percentage (pPIS).
    pub pis_rate: Option<Decimal>,
    /// PIS value (vPIS), fixed at build time.
    pub pis_value: Option<Decimal>,
    /// COFINS tax situation code.
    pub cofins_cst: Option<String>,
    /// COFINS calculation basis (vBC).
    pub cofins_base: Option<Decimal>,
    /// COFINS rate percentage (pCOFINS).
    pub cofins_rate: Option<Decimal>,
    /// COFINS value (vCOFINS), fixed at build time.
    pub cofins_value: Option<Decimal>,
}

/// A payment entry (pag/detPag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Payment method (tPag).
    pub method: PaymentMethod,
    /// Paid amount (vPag).
    pub amount: Decimal,
    /// Card acquirer CNPJ (card/CNPJ); presence triggers the card block.
    pub acquirer_cnpj: Option<String>,
    /// Card brand code (tBand).
    pub card_brand: Option<String>,
    /// Card authorization number (cAut).
    pub authorization_code: Option<String>,
}

impl Payment {
    pub fn new(method: PaymentMethod, amount: Decimal) -> Self {
        Self {
            method,
            amount,
            acquirer_cnpj: None,
            card_brand: None,
            authorization_code: None,
        }
    }

    /// Attach card transaction details.
    pub fn card(
        mut self,
        acquirer_cnpj: impl Into<String>,
        brand: Option<String>,
        authorization_code: Option<String>,
    ) -> Self {
        self.acquirer_cnpj = Some(acquirer_cnpj.into());
        self.card_brand = brand;
        self.authorization_code = authorization_code;
        self
    }
}

/// Document-level totals (total/ICMSTot). Every field is normalized to a
/// concrete value — serialization never meets a missing amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of item gross values (vProd).
    pub products: Decimal,
    /// Sum of item discounts (vDesc).
    pub discount: Decimal,
    /// Sum of item ICMS calculation bases (vBC).
    pub icms_base: Decimal,
    /// Sum of item ICMS values (vICMS).
    pub icms_value: Decimal,
    /// ICMS-ST calculation basis (vBCST).
    pub icms_st_base: Decimal,
    /// ICMS-ST value (vST).
    pub icms_st_value: Decimal,
    /// PIS total (vPIS).
    pub pis: Decimal,
    /// COFINS total (vCOFINS).
    pub cofins: Decimal,
    /// Freight (vFrete).
    pub freight: Decimal,
    /// Insurance (vSeg).
    pub insurance: Decimal,
    /// Other expenses (vOutro).
    pub other_expenses: Decimal,
    /// Grand total (vNF) = products − discount + freight + insurance + other.
    pub total: Decimal,
}

/// Issuance environment (tpAmb).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    /// tpAmb 1 — produção.
    Production,
    /// tpAmb 2 — homologação.
    Homologation,
}

impl Environment {
    /// Numeric wire code.
    pub fn code(&self) -> u8 {
        match self {
            Self::Production => 1,
            Self::Homologation => 2,
        }
    }

    /// Parse from the numeric wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Production),
            2 => Some(Self::Homologation),
            _ => None,
        }
    }
}

/// Operation direction (tpNF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    /// 0 — entrada.
    Inbound,
    /// 1 — saída.
    Outbound,
}

impl OperationType {
    pub fn code(&self) -> u8 {
        match self {
            Self::Inbound => 0,
            Self::Outbound => 1,
        }
    }
}

/// Emission purpose (finNFe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmissionPurpose {
    /// 1 — normal.
    Normal,
    /// 2 — complementar.
    Complementary,
    /// 3 — ajuste.
    Adjustment,
    /// 4 — devolução.
    Return,
}

impl EmissionPurpose {
    pub fn code(&self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Complementary => 2,
            Self::Adjustment => 3,
            Self::Return => 4,
        }
    }
}

/// Payment term indicator (indPag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTerm {
    /// 0 — à vista.
    Cash,
    /// 1 — a prazo.
    Deferred,
    /// 2 — outros.
    Other,
}

impl PaymentTerm {
    pub fn code(&self) -> u8 {
        match self {
            Self::Cash => 0,
            Self::Deferred => 1,
            Self::Other => 2,
        }
    }
}

/// Tax regime of the issuer (CRT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    /// 1 — Simples Nacional.
    SimplesNacional,
    /// 2 — Simples Nacional above the gross-revenue sublimit.
    SimplesNacionalExcessoSublimite,
    /// 3 — regime normal.
    Normal,
}

impl TaxRegime {
    pub fn code(&self) -> u8 {
        match self {
            Self::SimplesNacional => 1,
            Self::SimplesNacionalExcessoSublimite => 2,
            Self::Normal => 3,
        }
    }
}

/// Merchandise origin (orig) — table of CST origin digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MerchandiseOrigin {
    /// 0 — nacional.
    National,
    /// 1 — estrangeira, importação direta.
    ForeignDirectImport,
    /// 2 — estrangeira, adquirida no mercado interno.
    ForeignDomesticMarket,
    /// 3 — nacional, conteúdo de importação superior a 40%.
    NationalImportContentOver40,
    /// 4 — nacional, produção conforme processos produtivos básicos.
    NationalBasicProcesses,
    /// 5 — nacional, conteúdo de importação inferior ou igual a 40%.
    NationalImportContentUnder40,
    /// 6 — estrangeira, importação direta sem similar nacional (CAMEX).
    ForeignDirectImportCamex,
    /// 7 — estrangeira, mercado interno sem similar nacional (CAMEX).
    ForeignDomesticMarketCamex,
    /// 8 — nacional, conteúdo de importação superior a 70%.
    NationalImportContentOver70,
}

impl MerchandiseOrigin {
    pub fn code(&self) -> u8 {
        match self {
            Self::National => 0,
            Self::ForeignDirectImport => 1,
            Self::ForeignDomesticMarket => 2,
            Self::NationalImportContentOver40 => 3,
            Self::NationalBasicProcesses => 4,
            Self::NationalImportContentUnder40 => 5,
            Self::ForeignDirectImportCamex => 6,
            Self::ForeignDomesticMarketCamex => 7,
            Self::NationalImportContentOver70 => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::National),
            1 => Some(Self::ForeignDirectImport),
            2 => Some(Self::ForeignDomesticMarket),
            3 => Some(Self::NationalImportContentOver40),
            4 => Some(Self::NationalBasicProcesses),
            5 => Some(Self::NationalImportContentUnder40),
            6 => Some(Self::ForeignDirectImportCamex),
            7 => Some(Self::ForeignDomesticMarketCamex),
            8 => Some(Self::NationalImportContentOver70),
            _ => None,
        }
    }
}

/// Payment method (tPag) — two-digit wire codes from the SEFAZ table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// 01 — dinheiro.
    Cash,
    /// 02 — cheque.
    Cheque,
    /// 03 — cartão de crédito.
    CreditCard,
    /// 04 — cartão de débito.
    DebitCard,
    /// 05 — crédito loja.
    StoreCredit,
    /// 10 — vale alimentação.
    FoodVoucher,
    /// 11 — vale refeição.
    MealVoucher,
    /// 12 — vale presente.
    GiftVoucher,
    /// 13 — vale combustível.
    FuelVoucher,
    /// 14 — duplicata mercantil.
    TradeBill,
    /// 15 — boleto bancário.
    BankSlip,
    /// 16 — depósito bancário.
    BankDeposit,
    /// 17 — PIX.
    Pix,
    /// 18 — transferência bancária.
    BankTransfer,
    /// 19 — programa de fidelidade.
    LoyaltyProgram,
    /// 90 — sem pagamento.
    NoPayment,
    /// 99 — outros.
    Other,
}

impl PaymentMethod {
    /// Two-digit wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cash => "01",
            Self::Cheque => "02",
            Self::CreditCard => "03",
            Self::DebitCard => "04",
            Self::StoreCredit => "05",
            Self::FoodVoucher => "10",
            Self::MealVoucher => "11",
            Self::GiftVoucher => "12",
            Self::FuelVoucher => "13",
            Self::TradeBill => "14",
            Self::BankSlip => "15",
            Self::BankDeposit => "16",
            Self::Pix => "17",
            Self::BankTransfer => "18",
            Self::LoyaltyProgram => "19",
            Self::NoPayment => "90",
            Self::Other => "99",
        }
    }

    /// Parse from the two-digit wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Cash),
            "02" => Some(Self::Cheque),
            "03" => Some(Self::CreditCard),
            "04" => Some(Self::DebitCard),
            "05" => Some(Self::StoreCredit),
            "10" => Some(Self::FoodVoucher),
            "11" => Some(Self::MealVoucher),
            "12" => Some(Self::GiftVoucher),
            "13" => Some(Self::FuelVoucher),
            "14" => Some(Self::TradeBill),
            "15" => Some(Self::BankSlip),
            "16" => Some(Self::BankDeposit),
            "17" => Some(Self::Pix),
            "18" => Some(Self::BankTransfer),
            "19" => Some(Self::LoyaltyProgram),
            "90" => Some(Self::NoPayment),
            "99" => Some(Self::Other),
            _ => None,
        }
    }
}
