#![cfg(feature = "mapping")]

use std::collections::BTreeSet;

use aeat303::mapping::*;
use aeat303::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn window(period: PeriodCode) -> TaxPeriodWindow {
    let fy = FiscalYear::monthly(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).unwrap();
    TaxPeriodWindow::resolve(period, &fy).unwrap()
}

fn codes(ids: &[&str]) -> BTreeSet<TaxCodeId> {
    ids.iter().map(|id| TaxCodeId::new(*id)).collect()
}

/// Company chart: every template code `tX` has a company code `X`.
fn chart() -> Vec<ChartTaxCode> {
    ["A", "B", "C", "D"]
        .iter()
        .map(|c| ChartTaxCode::new(*c, format!("t{c}").as_str()))
        .collect()
}

fn templates() -> Vec<TemplateMapping> {
    vec![
        TemplateMapping {
            id: TemplateId(1),
            mapping: FieldMapping::codes(DeclarationField::AccruedVatBase1, ["tA", "tB"]),
        },
        TemplateMapping {
            id: TemplateId(2),
            mapping: FieldMapping::fixed(DeclarationField::StateAdministrationPercent, dec!(100)),
        },
    ]
}

// --- Template sync ---

#[test]
fn sync_creates_mirroring_mappings() {
    let mut mappings = Vec::new();
    let report = update_chart(&templates(), &mut mappings, EntityId(1), &chart());

    assert_eq!(report, SyncReport { created: 2, updated: 0 });
    assert_eq!(mappings.len(), 2);

    let code = &mappings[0];
    assert_eq!(code.entity, Some(EntityId(1)));
    assert_eq!(code.template, Some(TemplateId(1)));
    assert_eq!(code.mapping.kind, MappingKind::Code);
    assert_eq!(code.mapping.field, DeclarationField::AccruedVatBase1);
    assert_eq!(code.mapping.codes, codes(&["A", "B"]));

    let fixed = &mappings[1];
    assert_eq!(fixed.mapping.kind, MappingKind::Numeric);
    assert_eq!(fixed.mapping.number, Some(dec!(100)));
    assert_eq!(fixed.template, Some(TemplateId(2)));
}

#[test]
fn create_chart_matches_first_sync() {
    let created = create_chart(&templates(), Some(EntityId(1)), &chart());
    let mut synced = Vec::new();
    update_chart(&templates(), &mut synced, EntityId(1), &chart());
    assert_eq!(created, synced);
}

#[test]
fn template_change_is_diffed() {
    let mut mappings = create_chart(&templates(), Some(EntityId(1)), &chart());

    let mut changed = templates();
    changed[0].mapping.codes = codes(&["tB", "tC"]);
    changed[1].mapping.number = Some(dec!(90));

    let existing = &mappings[0];
    let Some(MappingChange::Update(update)) =
        changed[0].mapping_change(existing.entity, Some(existing), &chart())
    else {
        panic!("expected an update");
    };
    assert_eq!(update.codes.add, codes(&["C"]));
    assert_eq!(update.codes.remove, codes(&["A"]));
    assert!(update.head.is_none());

    let report = update_chart(&changed, &mut mappings, EntityId(1), &chart());
    assert_eq!(report, SyncReport { created: 0, updated: 2 });
    assert_eq!(mappings[0].mapping.codes, codes(&["B", "C"]));
    assert_eq!(mappings[1].mapping.number, Some(dec!(90)));
}

#[test]
fn other_entities_are_not_touched() {
    let mut mappings = create_chart(&templates(), Some(EntityId(2)), &chart());
    let before = mappings.clone();
    let report = update_chart(&templates(), &mut mappings, EntityId(1), &chart());
    assert_eq!(report.created, 2);
    assert_eq!(&mappings[..2], &before[..]);
}

#[test]
fn code_template_without_company_codes_creates_nothing() {
    let templates = vec![
        TemplateMapping {
            id: TemplateId(1),
            mapping: FieldMapping::codes(DeclarationField::Exports, ["tZ"]),
        },
        TemplateMapping {
            id: TemplateId(2),
            mapping: FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(4)),
        },
    ];
    let created = create_chart(&templates, None, &chart());
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].mapping.field, DeclarationField::AccruedVatPercent1);
}

// --- Resolution ---

#[test]
fn resolve_over_quarter() {
    let ledger = InMemoryLedger::new()
        .with("A", PeriodId(3), dec!(1000))
        .with("A", PeriodId(4), dec!(100))
        .with("B", PeriodId(5), dec!(50.25))
        .with("B", PeriodId(6), dec!(-0.25))
        .with("B", PeriodId(7), dec!(999));
    let mappings = create_chart(&templates(), Some(EntityId(1)), &chart());

    let resolved = resolve(
        &window(PeriodCode::SecondQuarter),
        mappings_for(&mappings, EntityId(1)),
        &ledger,
    )
    .unwrap();
    assert_eq!(resolved.get(DeclarationField::AccruedVatBase1), Some(dec!(150)));
    assert_eq!(
        resolved.get(DeclarationField::StateAdministrationPercent),
        Some(dec!(100))
    );
}

#[test]
fn resolve_without_fixed_mapping_fails() {
    let mappings = [FieldMapping::codes(DeclarationField::Exports, ["A"])];
    let err = resolve(&window(PeriodCode::January), &mappings, &InMemoryLedger::new()).unwrap_err();
    assert!(matches!(err, AeatError::Configuration(_)));

    let none: [FieldMapping; 0] = [];
    let err = resolve(&window(PeriodCode::January), &none, &InMemoryLedger::new()).unwrap_err();
    assert!(matches!(err, AeatError::Configuration(_)));
}

#[test]
fn tax_code_in_two_mappings_rejected() {
    let mappings = [
        FieldMapping::codes(DeclarationField::Exports, ["A", "B"]),
        FieldMapping::codes(DeclarationField::IntracommunityDeliveries, ["B"]),
        FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(21)),
    ];
    let err = resolve(&window(PeriodCode::January), &mappings, &InMemoryLedger::new()).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"mapping error: tax code B is mapped to both exports and intracommunity_deliveries"
    );
}

#[test]
fn code_boxes_reset_on_resolution() {
    let mut amounts = Amounts::default();
    amounts.set(DeclarationField::Exports, dec!(123));
    let mappings = [
        FieldMapping::codes(DeclarationField::Exports, ["A"]),
        FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(21)),
    ];
    resolve(&window(PeriodCode::March), &mappings, &InMemoryLedger::new())
        .unwrap()
        .apply_to(&mut amounts);
    assert_eq!(amounts.get(DeclarationField::Exports), Decimal::ZERO);
}

/// A ledger backed by an external system that may be unavailable.
struct OfflineLedger;

impl TaxCodeLedger for OfflineLedger {
    fn balance(&self, code: &TaxCodeId, _periods: &[PeriodId]) -> Result<Decimal, AeatError> {
        Err(AeatError::Ledger(format!("balance of {code} unavailable")))
    }
}

#[test]
fn ledger_errors_propagate() {
    let mappings = [
        FieldMapping::codes(DeclarationField::Exports, ["A"]),
        FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(21)),
    ];
    let err = resolve(&window(PeriodCode::March), &mappings, &OfflineLedger).unwrap_err();
    assert!(matches!(err, AeatError::Ledger(_)));
}

// --- JSON ---

#[test]
fn templates_and_config_from_json() {
    let templates = templates_from_json(
        r#"[
            {"id": 10, "field": "exports", "type": "code", "codes": ["tD"]},
            {"id": 11, "field": "accrued_vat_percent_3", "type": "numeric", "number": "21"}
        ]"#,
    )
    .unwrap();
    let created = create_chart(&templates, None, &chart());
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].mapping.codes, codes(&["D"]));

    let config = AeatConfig::from_json(r#"{"software_version": "2.0"}"#).unwrap();
    assert_eq!(config.software_version, "2.0");
    assert_eq!(config.currency, "EUR");

    assert!(matches!(AeatConfig::from_json("{"), Err(AeatError::Json(_))));
}
