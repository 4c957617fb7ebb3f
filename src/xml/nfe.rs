use rust_decimal::Decimal;

use super::writer::XmlWriter;
use super::{NFE_NAMESPACE, NFE_VERSION};
use crate::core::money::format_scaled;
use crate::core::{LineItem, Nfce, NfceError, Payment, access_key};

/// Compliance text emitted in `infAdic/infCpl` for Simples Nacional issuers.
const SIMPLES_NACIONAL_NOTICE: &str = "Documento emitido por ME/EPP optante pelo Simples Nacional. \
     Não gera direito a crédito fiscal de IPI. \
     Não gera direito a crédito fiscal de ICMS.";

/// Render a document into the canonical NFe 4.00 `nfeProc` tree.
///
/// Deterministic: the same document state always yields byte-identical
/// XML. A document without a well-formed access key cannot be represented
/// and fails outright — partial output is never produced.
pub fn to_nfe_xml(document: &Nfce) -> Result<String, NfceError> {
    if !access_key::validate(&document.access_key) {
        return Err(NfceError::Xml(format!(
            "document access key is missing or malformed: {:?}",
            document.access_key
        )));
    }

    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs("nfeProc", &[("versao", NFE_VERSION), ("xmlns", NFE_NAMESPACE)])?;
    w.start_element("NFe")?;
    w.start_element_with_attrs(
        "infNFe",
        &[
            ("Id", &format!("NFe{}", document.access_key)),
            ("versao", NFE_VERSION),
        ],
    )?;

    write_ide(&mut w, document)?;
    write_emit(&mut w, document)?;

    if let Some(recipient) = &document.recipient {
        if !recipient.tax_id.trim().is_empty() {
            write_dest(&mut w, recipient)?;
        }
    }

    for item in &document.items {
        write_det(&mut w, item)?;
    }

    write_total(&mut w, document)?;
    write_transp(&mut w)?;
    write_pag(&mut w, &document.payments)?;
    write_inf_adic(&mut w)?;

    w.end_element("infNFe")?;
    w.end_element("NFe")?;
    w.end_element("nfeProc")?;

    w.into_string()
}

fn write_ide(w: &mut XmlWriter, document: &Nfce) -> Result<(), NfceError> {
    let key = &document.access_key;

    w.start_element("ide")?;
    w.text_element("cUF", &document.issuer.state_code.to_string())?;
    w.text_element("cNF", &key[35..43])?;
    w.text_element("natOp", &document.operation_nature)?;
    w.text_element("mod", access_key::MODEL_NFCE)?;
    w.text_element("serie", &document.series.to_string())?;
    w.text_element("nNF", &document.number.to_string())?;
    w.text_element("dhEmi", &document.issued_at.format("%Y-%m-%dT%H:%M:%S%:z").to_string())?;
    w.text_element("tpNF", &document.operation_type.code().to_string())?;
    // idDest 1: operação interna
    w.text_element("idDest", "1")?;
    w.text_element("cMunFG", &document.issuer.address.city_code.to_string())?;
    // tpImp 4: DANFE NFC-e
    w.text_element("tpImp", "4")?;
    w.text_element("tpEmis", &access_key::EMISSION_NORMAL.to_string())?;
    w.text_element("cDV", &key[43..])?;
    w.text_element("tpAmb", &document.environment.code().to_string())?;
    w.text_element("finNFe", &document.purpose.code().to_string())?;
    // Consumidor final, operação presencial, sem intermediador
    w.text_element("indFinal", "1")?;
    w.text_element("indPres", "1")?;
    w.text_element("indIntermed", "0")?;
    w.end_element("ide")?;
    Ok(())
}

fn write_emit(w: &mut XmlWriter, document: &Nfce) -> Result<(), NfceError> {
    let issuer = &document.issuer;

    w.start_element("emit")?;
    w.text_element("CNPJ", &issuer.cnpj)?;
    w.text_element("xNome", &issuer.legal_name)?;
    if let Some(trade_name) = &issuer.trade_name {
        w.text_element("xFant", trade_name)?;
    }

    w.start_element("enderEmit")?;
    w.text_element("xLgr", &issuer.address.street)?;
    w.text_element("nro", &issuer.address.number)?;
    w.text_element("xBairro", &issuer.address.district)?;
    w.text_element("cMun", &issuer.address.city_code.to_string())?;
    w.text_element("xMun", &issuer.address.city)?;
    w.text_element("UF", &issuer.address.uf)?;
    w.text_element("CEP", &issuer.address.postal_code)?;
    w.end_element("enderEmit")?;

    if let Some(ie) = &issuer.state_registration {
        w.text_element("IE", ie)?;
    }
    w.text_element("CRT", &issuer.tax_regime.code().to_string())?;
    w.end_element("emit")?;
    Ok(())
}

fn write_dest(w: &mut XmlWriter, recipient: &crate::core::Recipient) -> Result<(), NfceError> {
    w.start_element("dest")?;
    if recipient.tax_id.len() == 11 {
        w.text_element("CPF", &recipient.tax_id)?;
    } else {
        w.text_element("CNPJ", &recipient.tax_id)?;
    }
    if let Some(name) = &recipient.name {
        w.text_element("xNome", name)?;
    }
    // indIEDest 9: não contribuinte
    w.text_element("indIEDest", "9")?;
    w.end_element("dest")?;
    Ok(())
}

fn write_det(w: &mut XmlWriter, item: &LineItem) -> Result<(), NfceError> {
    w.start_element_with_attrs("det", &[("nItem", &item.number.to_string())])?;

    w.start_element("prod")?;
    w.text_element("cProd", &item.product_code)?;
    w.text_element("cEAN", "")?;
    w.text_element("xProd", &item.description)?;
    w.text_element("NCM", &item.ncm)?;
    w.text_element("CFOP", &item.cfop)?;
    w.text_element("uCom", &item.commercial_unit)?;
    w.text_element("qCom", &format_scaled(item.commercial_quantity, 4))?;
    w.text_element("vUnCom", &format_scaled(item.commercial_unit_price, 10))?;
    w.text_element("vProd", &format_scaled(item.gross_value, 2))?;
    w.text_element("cEANTrib", "")?;
    w.text_element("uTrib", &item.taxable_unit)?;
    w.text_element("qTrib", &format_scaled(item.taxable_quantity, 4))?;
    w.text_element("vUnTrib", &format_scaled(item.taxable_unit_price, 10))?;
    if let Some(discount) = item.discount {
        if discount > Decimal::ZERO {
            w.text_element("vDesc", &format_scaled(discount, 2))?;
        }
    }
    w.text_element("indTot", if item.include_in_total { "1" } else { "0" })?;
    w.end_element("prod")?;

    w.start_element("imposto")?;
    write_icms(w, item)?;
    if item.pis_cst.is_some() {
        write_pis(w, item)?;
    }
    if item.cofins_cst.is_some() {
        write_cofins(w, item)?;
    }
    w.end_element("imposto")?;

    w.end_element("det")?;
    Ok(())
}

fn write_icms(w: &mut XmlWriter, item: &LineItem) -> Result<(), NfceError> {
    let group = format!("ICMS{}", item.icms_cst);

    w.start_element("ICMS")?;
    w.start_element(&group)?;
    w.text_element("orig", &item.origin.code().to_string())?;
    w.text_element("CST", &item.icms_cst)?;
    if let Some(modality) = item.icms_bc_modality {
        w.text_element("modBC", &modality.to_string())?;
    }
    if let Some(base) = item.icms_base {
        w.text_element("vBC", &format_scaled(base, 2))?;
    }
    if let Some(rate) = item.icms_rate {
        w.text_element("pICMS", &format_scaled(rate, 2))?;
    }
    if let Some(value) = item.icms_value {
        w.text_element("vICMS", &format_scaled(value, 2))?;
    }
    w.end_element(&group)?;
    w.end_element("ICMS")?;
    Ok(())
}

fn write_pis(w: &mut XmlWriter, item: &LineItem) -> Result<(), NfceError> {
    let cst = item.pis_cst.as_deref().unwrap_or_default();
    let group = format!("PIS{cst}");

    w.start_element("PIS")?;
    w.start_element(&group)?;
    w.text_element("CST", cst)?;
    if let Some(base) = item.pis_base {
        w.text_element("vBC", &format_scaled(base, 2))?;
        w.text_element("pPIS", &format_scaled(item.pis_rate.unwrap_or(Decimal::ZERO), 4))?;
        w.text_element("vPIS", &format_scaled(item.pis_value.unwrap_or(Decimal::ZERO), 2))?;
    }
    w.end_element(&group)?;
    w.end_element("PIS")?;
    Ok(())
}

fn write_cofins(w: &mut XmlWriter, item: &LineItem) -> Result<(), NfceError> {
    let cst = item.cofins_cst.as_deref().unwrap_or_default();
    let group = format!("COFINS{cst}");

    w.start_element("COFINS")?;
    w.start_element(&group)?;
    w.text_element("CST", cst)?;
    if let Some(base) = item.cofins_base {
        w.text_element("vBC", &format_scaled(base, 2))?;
        w.text_element("pCOFINS", &format_scaled(item.cofins_rate.unwrap_or(Decimal::ZERO), 4))?;
        w.text_element("vCOFINS", &format_scaled(item.cofins_value.unwrap_or(Decimal::ZERO), 2))?;
    }
    w.end_element(&group)?;
    w.end_element("COFINS")?;
    Ok(())
}

fn write_total(w: &mut XmlWriter, document: &Nfce) -> Result<(), NfceError> {
    let totals = &document.totals;

    w.start_element("total")?;
    w.start_element("ICMSTot")?;
    w.text_element("vBC", &format_scaled(totals.icms_base, 2))?;
    w.text_element("vICMS", &format_scaled(totals.icms_value, 2))?;
    w.text_element("vICMSDeson", "0.00")?;
    w.text_element("vFCP", "0.00")?;
    w.text_element("vBCST", &format_scaled(totals.icms_st_base, 2))?;
    w.text_element("vST", &format_scaled(totals.icms_st_value, 2))?;
    w.text_element("vFCPST", "0.00")?;
    w.text_element("vFCPSTRet", "0.00")?;
    w.text_element("vProd", &format_scaled(totals.products, 2))?;
    w.text_element("vFrete", &format_scaled(totals.freight, 2))?;
    w.text_element("vSeg", &format_scaled(totals.insurance, 2))?;
    w.text_element("vDesc", &format_scaled(totals.discount, 2))?;
    w.text_element("vII", "0.00")?;
    w.text_element("vIPI", "0.00")?;
    w.text_element("vIPIDevol", "0.00")?;
    w.text_element("vPIS", &format_scaled(totals.pis, 2))?;
    w.text_element("vCOFINS", &format_scaled(totals.cofins, 2))?;
    w.text_element("vOutro", &format_scaled(totals.other_expenses, 2))?;
    w.text_element("vNF", &format_scaled(totals.total, 2))?;
    w.end_element("ICMSTot")?;
    w.end_element("total")?;
    Ok(())
}

fn write_transp(w: &mut XmlWriter) -> Result<(), NfceError> {
    w.start_element("transp")?;
    // modFrete 9: sem frete
    w.text_element("modFrete", "9")?;
    w.end_element("transp")?;
    Ok(())
}

fn write_pag(w: &mut XmlWriter, payments: &[Payment]) -> Result<(), NfceError> {
    w.start_element("pag")?;
    for payment in payments {
        w.start_element("detPag")?;
        w.text_element("tPag", payment.method.code())?;
        w.text_element("vPag", &format_scaled(payment.amount, 2))?;

        if let Some(acquirer) = &payment.acquirer_cnpj {
            w.start_element("card")?;
            w.text_element("CNPJ", acquirer)?;
            if let Some(brand) = &payment.card_brand {
                w.text_element("tBand", brand)?;
            }
            if let Some(authorization) = &payment.authorization_code {
                w.text_element("cAut", authorization)?;
            }
            w.end_element("card")?;
        }

        w.end_element("detPag")?;
    }
    w.end_element("pag")?;
    Ok(())
}

fn write_inf_adic(w: &mut XmlWriter) -> Result<(), NfceError> {
    w.start_element("infAdic")?;
    w.text_element("infCpl", SIMPLES_NACIONAL_NOTICE)?;
    w.end_element("infAdic")?;
    Ok(())
}
