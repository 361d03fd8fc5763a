//! Resolve declaration boxes from tax code balances and fixed values.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::core::{AeatError, Amounts, DeclarationField, TaxPeriodWindow};

use super::ledger::{TaxCodeId, TaxCodeLedger};
use super::model::{FieldMapping, MappingKind};

/// Box values produced by [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    values: BTreeMap<DeclarationField, Decimal>,
}

impl ResolvedFields {
    /// Value of a resolved box, `None` when no mapping targets it.
    pub fn get(&self, field: DeclarationField) -> Option<Decimal> {
        self.values.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclarationField, Decimal)> + '_ {
        self.values.iter().map(|(f, v)| (*f, *v))
    }

    /// Write every resolved box into `amounts`. Boxes without a mapping keep
    /// their current value.
    pub fn apply_to(&self, amounts: &mut Amounts) {
        for (field, value) in self.iter() {
            amounts.set(field, value);
        }
    }
}

/// Compute the value of every mapped box for the given window.
///
/// Fixed mappings yield their constant. Code mappings start at zero and
/// accumulate the ledger balance of each code over the window's
/// sub-periods. Fails with [`AeatError::Configuration`] when no fixed
/// mapping exists, and with [`AeatError::Mapping`] when a box or a tax code
/// is mapped twice.
pub fn resolve<'a, I, L>(
    window: &TaxPeriodWindow,
    mappings: I,
    ledger: &L,
) -> Result<ResolvedFields, AeatError>
where
    I: IntoIterator<Item = &'a FieldMapping>,
    L: TaxCodeLedger + ?Sized,
{
    let mappings: Vec<&FieldMapping> = mappings.into_iter().collect();
    check_unique(&mappings)?;

    if !mappings.iter().any(|m| m.is_fixed()) {
        return Err(AeatError::Configuration(
            "no fixed-value mappings; update the AEAT 303 mappings from the chart template".into(),
        ));
    }

    let mut values = BTreeMap::new();
    for mapping in &mappings {
        let value = match mapping.kind {
            MappingKind::Numeric => mapping.number.ok_or_else(|| {
                AeatError::Mapping(format!("fixed mapping for {} has no number", mapping.field))
            })?,
            MappingKind::Code => {
                let mut total = Decimal::ZERO;
                for code in &mapping.codes {
                    let balance = ledger.balance(code, &window.periods)?;
                    total = total
                        .checked_add(balance)
                        .ok_or_else(|| AeatError::Arithmetic(mapping.field.to_string()))?;
                }
                total
            }
        };
        tracing::debug!(field = %mapping.field, kind = mapping.kind.code(), %value, "resolved box");
        values.insert(mapping.field, value);
    }

    tracing::debug!(
        period = %window.period,
        year = window.year,
        boxes = values.len(),
        "resolved AEAT 303 mappings"
    );
    Ok(ResolvedFields { values })
}

fn check_unique(mappings: &[&FieldMapping]) -> Result<(), AeatError> {
    let mut fields = BTreeSet::new();
    let mut codes: BTreeMap<&TaxCodeId, DeclarationField> = BTreeMap::new();
    for mapping in mappings {
        if !fields.insert(mapping.field) {
            return Err(AeatError::Mapping(format!(
                "box {} is mapped more than once",
                mapping.field
            )));
        }
        if mapping.kind != MappingKind::Code {
            continue;
        }
        for code in &mapping.codes {
            if let Some(other) = codes.insert(code, mapping.field) {
                return Err(AeatError::Mapping(format!(
                    "tax code {code} is mapped to both {other} and {}",
                    mapping.field
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FiscalYear, PeriodCode, PeriodId};
    use crate::mapping::InMemoryLedger;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn window() -> TaxPeriodWindow {
        let fy = FiscalYear::monthly(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).unwrap();
        TaxPeriodWindow::resolve(PeriodCode::SecondQuarter, &fy).unwrap()
    }

    fn ledger() -> InMemoryLedger {
        InMemoryLedger::new()
            .with("A", PeriodId(4), dec!(100))
            .with("A", PeriodId(6), dec!(20))
            .with("A", PeriodId(7), dec!(999))
            .with("B", PeriodId(5), dec!(-30))
            .with("Z", PeriodId(5), dec!(77))
    }

    #[test]
    fn sums_codes_over_window() {
        let mappings = [
            FieldMapping::codes(DeclarationField::AccruedVatBase1, ["A", "B"]),
            FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(21)),
        ];
        let resolved = resolve(&window(), &mappings, &ledger()).unwrap();
        assert_eq!(resolved.get(DeclarationField::AccruedVatBase1), Some(dec!(90)));
        assert_eq!(resolved.get(DeclarationField::AccruedVatPercent1), Some(dec!(21)));
        assert_eq!(resolved.get(DeclarationField::Exports), None);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn code_mapping_without_balances_is_zero() {
        let mappings = [
            FieldMapping::codes(DeclarationField::Exports, ["NOPE"]),
            FieldMapping::codes(DeclarationField::IntracommunityDeliveries, Vec::<&str>::new()),
            FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(21)),
        ];
        let resolved = resolve(&window(), &mappings, &ledger()).unwrap();
        assert_eq!(resolved.get(DeclarationField::Exports), Some(Decimal::ZERO));
        assert_eq!(
            resolved.get(DeclarationField::IntracommunityDeliveries),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn requires_a_fixed_mapping() {
        let mappings = [FieldMapping::codes(DeclarationField::Exports, ["A"])];
        let err = resolve(&window(), &mappings, &ledger()).unwrap_err();
        assert!(matches!(err, AeatError::Configuration(_)));
    }

    #[test]
    fn duplicate_box_rejected() {
        let mappings = [
            FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(21)),
            FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(10)),
        ];
        let err = resolve(&window(), &mappings, &ledger()).unwrap_err();
        assert!(matches!(err, AeatError::Mapping(_)));
    }

    #[test]
    fn duplicate_code_rejected() {
        let mappings = [
            FieldMapping::codes(DeclarationField::Exports, ["A"]),
            FieldMapping::codes(DeclarationField::IntracommunityDeliveries, ["A"]),
            FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(21)),
        ];
        let err = resolve(&window(), &mappings, &ledger()).unwrap_err();
        assert!(matches!(err, AeatError::Mapping(_)));
    }

    #[test]
    fn apply_keeps_unmapped_boxes() {
        let mut amounts = Amounts::default();
        amounts.set(DeclarationField::ToDeduce, dec!(50));
        let mappings = [FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(21))];
        resolve(&window(), &mappings, &ledger())
            .unwrap()
            .apply_to(&mut amounts);
        assert_eq!(amounts.get(DeclarationField::ToDeduce), dec!(50));
        assert_eq!(amounts.get(DeclarationField::AccruedVatPercent1), dec!(21));
    }

    struct SaturatedLedger;

    impl TaxCodeLedger for SaturatedLedger {
        fn balance(&self, _: &TaxCodeId, _: &[PeriodId]) -> Result<Decimal, AeatError> {
            Ok(Decimal::MAX)
        }
    }

    #[test]
    fn overflowing_code_sum_fails() {
        let mappings = [
            FieldMapping::codes(DeclarationField::Exports, ["A", "B"]),
            FieldMapping::fixed(DeclarationField::AccruedVatPercent1, dec!(21)),
        ];
        let err = resolve(&window(), &mappings, &SaturatedLedger).unwrap_err();
        assert!(matches!(err, AeatError::Arithmetic(ref f) if f == "exports"));
    }
}
