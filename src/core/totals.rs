use rust_decimal::Decimal;

use super::types::{LineItem, Totals};

/// Aggregate per-item monetary fields into document totals.
///
/// Sums gross value, discount, ICMS basis and ICMS value across all line
/// items. The grand total is products − discount + freight + insurance +
/// other expenses; the latter three default to zero when absent. Every
/// optional document-level amount (ICMS-ST, PIS, COFINS included) comes
/// out as a concrete zero, so serialization never meets a missing field.
pub fn calculate_totals(
    items: &[LineItem],
    freight: Option<Decimal>,
    insurance: Option<Decimal>,
    other_expenses: Option<Decimal>,
) -> Totals {
    let mut products = Decimal::ZERO;
    let mut discount = Decimal::ZERO;
    let mut icms_base = Decimal::ZERO;
    let mut icms_value = Decimal::ZERO;

    for item in items {
        products += item.gross_value;
        if let Some(value) = item.discount {
            discount += value;
        }
        if let Some(value) = item.icms_base {
            icms_base += value;
        }
        if let Some(value) = item.icms_value {
            icms_value += value;
        }
    }

    let freight = freight.unwrap_or(Decimal::ZERO);
    let insurance = insurance.unwrap_or(Decimal::ZERO);
    let other_expenses = other_expenses.unwrap_or(Decimal::ZERO);

    let total = products - discount + freight + insurance + other_expenses;

    Totals {
        products,
        discount,
        icms_base,
        icms_value,
        icms_st_base: Decimal::ZERO,
        icms_st_value: Decimal::ZERO,
        pis: Decimal::ZERO,
        cofins: Decimal::ZERO,
        freight,
        insurance,
        other_expenses,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LineItemBuilder;
    use rust_decimal_macros::dec;

    #[test]
    fn sums_gross_values_and_discounts() {
        let items = vec![
            LineItemBuilder::new(1, "A", "Item A", dec!(1), "UN", dec!(10.00))
                .classification("09012100", "5102")
                .icms("102")
                .discount(dec!(1.00))
                .build(),
            LineItemBuilder::new(2, "B", "Item B", dec!(1), "UN", dec!(25.50))
                .classification("09012100", "5102")
                .icms("102")
                .build(),
        ];

        let totals = calculate_totals(&items, None, None, None);
        assert_eq!(totals.products, dec!(35.50));
        assert_eq!(totals.discount, dec!(1.00));
        assert_eq!(totals.total, dec!(34.50));
        assert_eq!(totals.freight, Decimal::ZERO);
        assert_eq!(totals.insurance, Decimal::ZERO);
        assert_eq!(totals.other_expenses, Decimal::ZERO);
        assert_eq!(totals.pis, Decimal::ZERO);
        assert_eq!(totals.cofins, Decimal::ZERO);
    }

    #[test]
    fn freight_and_expenses_enter_the_grand_total() {
        let items = vec![
            LineItemBuilder::new(1, "A", "Item A", dec!(2), "UN", dec!(50.00))
                .classification("09012100", "5102")
                .icms("102")
                .build(),
        ];

        let totals = calculate_totals(&items, Some(dec!(10.00)), Some(dec!(2.50)), Some(dec!(0.50)));
        assert_eq!(totals.products, dec!(100.00));
        assert_eq!(totals.total, dec!(113.00));
    }

    #[test]
    fn aggregates_icms_basis_and_value() {
        let items = vec![
            LineItemBuilder::new(1, "A", "Item A", dec!(1), "UN", dec!(100.00))
                .classification("22021000", "5102")
                .icms("00")
                .icms_taxed(3, dec!(100.00), dec!(18))
                .build(),
            LineItemBuilder::new(2, "B", "Item B", dec!(1), "UN", dec!(50.00))
                .classification("22021000", "5102")
                .icms("00")
                .icms_taxed(3, dec!(50.00), dec!(18))
                .build(),
        ];

        let totals = calculate_totals(&items, None, None, None);
        assert_eq!(totals.icms_base, dec!(150.00));
        assert_eq!(totals.icms_value, dec!(27.00));
    }

    #[test]
    fn empty_item_list_yields_zeroes() {
        let totals = calculate_totals(&[], None, None, None);
        assert_eq!(totals.products, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }
}
