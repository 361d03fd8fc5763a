use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use aeat303::core::*;
use aeat303::mapping::*;
use aeat303::record;

fn fiscal_year() -> FiscalYear {
    FiscalYear::monthly(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
}

fn company() -> Company {
    Company {
        name: "Ferreteria Peñíscola SL".into(),
        vat_code: Some("ESB12000000".into()),
        currency: "EUR".into(),
    }
}

fn full_report() -> Declaration303 {
    let mut report = Declaration303Builder::new(&company(), PeriodCode::FourthQuarter)
        .fiscalyear_code(2024)
        .declaration_type(DeclarationType::DirectDebit)
        .bank_account(BankAccount {
            numbers: vec![AccountNumber::iban("ES91 2100 0418 4502 0005 1332")],
            bic: Some("CAIXESBBXXX".into()),
        })
        .build();
    for (i, field) in DeclarationField::ALL.iter().enumerate() {
        report.set_amount(*field, Decimal::new((i as i64 + 1) * 12_345, 2));
    }
    report
}

/// 300 tax codes spread over every box, with one entry per code and month.
fn large_chart() -> (Vec<FieldMapping>, InMemoryLedger) {
    let mut ledger = InMemoryLedger::new();
    let mut mappings = Vec::new();
    for (i, field) in DeclarationField::ALL.iter().enumerate() {
        if field.name().contains("percent") {
            mappings.push(FieldMapping::fixed(*field, dec!(21)));
            continue;
        }
        let codes: Vec<String> = (0..4).map(|n| format!("{}-{n}", field.name())).collect();
        for (n, code) in codes.iter().enumerate() {
            for month in 1..=12 {
                ledger.record(code.as_str(), PeriodId(month), Decimal::new((i * 7 + n) as i64, 0));
            }
        }
        mappings.push(FieldMapping::codes(*field, codes.iter().map(String::as_str)));
    }
    (mappings, ledger)
}

fn bench_resolve(c: &mut Criterion) {
    let (mappings, ledger) = large_chart();
    let window = TaxPeriodWindow::resolve(PeriodCode::FourthQuarter, &fiscal_year()).unwrap();
    c.bench_function("resolve_all_boxes_quarter", |b| {
        b.iter(|| black_box(resolve(black_box(&window), &mappings, &ledger)));
    });
}

fn bench_totals(c: &mut Criterion) {
    let report = full_report();
    c.bench_function("compute_totals", |b| {
        b.iter(|| black_box(compute_totals(black_box(&report.amounts)).unwrap()));
    });
}

fn bench_encode(c: &mut Criterion) {
    let report = full_report();
    let config = AeatConfig::default();
    c.bench_function("encode_full_return", |b| {
        b.iter(|| black_box(record::encode(black_box(&report), &config)));
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = record::encode(&full_report(), &AeatConfig::default()).unwrap();
    c.bench_function("decode_full_return", |b| {
        b.iter(|| black_box(record::decode(black_box(&bytes))));
    });
}

fn bench_workflow(c: &mut Criterion) {
    let (mappings, ledger) = large_chart();
    let config = AeatConfig::default();
    let now = Utc.with_ymd_and_hms(2025, 1, 20, 9, 0, 0).unwrap();
    let template = Declaration303Builder::new(&company(), PeriodCode::FourthQuarter)
        .fiscal_year(&fiscal_year())
        .build();

    c.bench_function("calculate_and_process", |b| {
        b.iter(|| {
            let mut report = template.clone();
            aeat303::report::calculate(&mut report, &fiscal_year(), &mappings, &ledger, &config, now)
                .unwrap();
            aeat303::report::process(&mut report, &config).unwrap();
            black_box(report)
        });
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_totals,
    bench_encode,
    bench_decode,
    bench_workflow,
);
criterion_main!(benches);
