use chrono::{DateTime, FixedOffset};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use nfce::core::*;
use nfce::xml;

fn issued_at() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-03-15T10:30:00-03:00").unwrap()
}

fn build_10_item_document() -> Nfce {
    let issuer = IssuerBuilder::new(
        "12345678000199",
        "Mercearia do Bairro LTDA",
        35,
        TaxRegime::SimplesNacional,
        Address {
            street: "Rua das Flores".into(),
            number: "100".into(),
            district: "Centro".into(),
            city: "São Paulo".into(),
            city_code: 3550308,
            uf: "SP".into(),
            postal_code: "01001000".into(),
        },
    )
    .build();

    let mut builder = NfceBuilder::new(1, 1, issued_at())
        .operation_nature("VENDA AO CONSUMIDOR")
        .issuer(issuer)
        .add_payment(Payment::new(PaymentMethod::Cash, dec!(125.00)));

    for i in 1..=10u32 {
        builder = builder.add_item(
            LineItemBuilder::new(i, format!("P{i:03}"), format!("Produto {i}"), dec!(1), "UN", dec!(12.50))
                .classification("09012100", "5102")
                .icms("102")
                .build(),
        );
    }

    builder.build().unwrap()
}

fn bench_access_key(c: &mut Criterion) {
    c.bench_function("access_key_generate", |b| {
        b.iter(|| {
            access_key::generate(
                black_box(35),
                issued_at(),
                "12345678000199",
                "65",
                1,
                42,
                1,
                12_345_678,
            )
            .unwrap()
        })
    });

    let key =
        access_key::generate(35, issued_at(), "12345678000199", "65", 1, 42, 1, 12_345_678).unwrap();
    c.bench_function("access_key_validate", |b| {
        b.iter(|| access_key::validate(black_box(&key)))
    });
}

fn bench_xml(c: &mut Criterion) {
    let document = build_10_item_document();
    c.bench_function("nfe_xml_10_items", |b| {
        b.iter(|| xml::to_nfe_xml(black_box(&document)).unwrap())
    });
}

criterion_group!(benches, bench_access_key, bench_xml);
criterion_main!(benches);
