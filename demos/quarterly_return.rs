//! Quarterly model 303 return for a small company.
//!
//! Run with: `cargo run --example quarterly_return`

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;

use aeat303::mapping::*;
use aeat303::record::{self, RecordKey};
use aeat303::report::{ReportStore, calculate, process};
use aeat303::*;

fn main() -> Result<(), AeatError> {
    let fiscal_year = FiscalYear::monthly(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())?;

    // Chart-of-accounts template shipped with the localization.
    let templates = templates_from_json(
        r#"[
            {"id": 1, "field": "accrued_vat_base_3", "type": "code", "codes": ["base-iva21"]},
            {"id": 2, "field": "accrued_vat_percent_3", "type": "numeric", "number": "21"},
            {"id": 3, "field": "accrued_vat_tax_3", "type": "code", "codes": ["iva21"]},
            {"id": 4, "field": "accrued_vat_base_1", "type": "code", "codes": ["base-iva4"]},
            {"id": 5, "field": "accrued_vat_percent_1", "type": "numeric", "number": "4"},
            {"id": 6, "field": "accrued_vat_tax_1", "type": "code", "codes": ["iva4"]},
            {"id": 7, "field": "deductible_current_domestic_operations_base", "type": "code", "codes": ["base-soportado"]},
            {"id": 8, "field": "deductible_current_domestic_operations_tax", "type": "code", "codes": ["soportado"]},
            {"id": 9, "field": "state_administration_percent", "type": "numeric", "number": "100"}
        ]"#,
    )?;

    let chart = vec![
        ChartTaxCode::new("B21", "base-iva21"),
        ChartTaxCode::new("V21", "iva21"),
        ChartTaxCode::new("B4", "base-iva4"),
        ChartTaxCode::new("V4", "iva4"),
        ChartTaxCode::new("BS", "base-soportado"),
        ChartTaxCode::new("S", "soportado"),
    ];
    let entity = EntityId(1);
    let mut mappings = Vec::new();
    let sync = update_chart(&templates, &mut mappings, entity, &chart);
    println!("mappings: {} created, {} updated", sync.created, sync.updated);

    let ledger = InMemoryLedger::new()
        .with("B21", PeriodId(7), dec!(18400))
        .with("V21", PeriodId(7), dec!(3864))
        .with("B21", PeriodId(8), dec!(9250.40))
        .with("V21", PeriodId(8), dec!(1942.58))
        .with("B4", PeriodId(9), dec!(1200))
        .with("V4", PeriodId(9), dec!(48))
        .with("BS", PeriodId(7), dec!(11000))
        .with("S", PeriodId(7), dec!(2310))
        .with("BS", PeriodId(9), dec!(640.10))
        .with("S", PeriodId(9), dec!(134.42));

    let company = Company {
        name: "Distribucions Martí i Fills SL".into(),
        vat_code: Some("ESB25000000".into()),
        currency: "EUR".into(),
    };
    let config = AeatConfigBuilder::new()
        .software_version("1.0")
        .build();

    let mut store = ReportStore::new(config);
    let id = store.insert(
        Declaration303Builder::new(&company, PeriodCode::ThirdQuarter)
            .fiscal_year(&fiscal_year)
            .build(),
    )?;

    let totals = store.try_update(id, |report, config| {
        calculate(
            report,
            &fiscal_year,
            mappings_for(&mappings, entity),
            &ledger,
            config,
            Utc::now(),
        )
    })?;
    println!("accrued tax:      {:>12}", totals.accrued_total_tax);
    println!("deductible tax:   {:>12}", totals.deductible_total);
    println!("liquidation:      {:>12}", totals.liquidation_result);

    store.try_update(id, |report, config| process(report, config))?;

    let report = store
        .get(id)
        .ok_or_else(|| AeatError::Validation(format!("report {} vanished", id.0)))?;
    let bytes = report.file.as_deref().unwrap_or_default();
    println!(
        "{}: {} bytes",
        report.filename(&store.config().model),
        bytes.len()
    );

    let file = record::decode(bytes)?;
    println!(
        "box 71 read back: {:?}",
        file.value(RecordKey::Total(DerivedField::LiquidationResult))?
    );
    Ok(())
}
