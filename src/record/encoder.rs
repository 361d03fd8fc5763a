//! Encode a calculated return into the model 303 file, and read it back.

use encoding_rs::mem;

use crate::core::{AeatConfig, AeatError, Declaration303, DerivedTotals};

use super::model303::{ADDITIONAL, DETAIL, FOOTER, HEADER, file_width};
use super::layout::{FieldValue, Record, RecordKey, RecordLayout};
use super::normalize::normalize;

/// The four records of a model 303 file.
#[derive(Debug, Clone)]
pub struct Aeat303File {
    pub header: Record,
    pub detail: Record,
    pub additional: Record,
    pub footer: Record,
}

impl Aeat303File {
    pub fn records(&self) -> [&Record; 4] {
        [&self.header, &self.detail, &self.additional, &self.footer]
    }

    /// Value of `key` from the first record that binds it.
    pub fn value(&self, key: RecordKey) -> Result<Option<FieldValue>, AeatError> {
        for record in self.records() {
            if record.layout().contains(key) {
                return record.value(key);
            }
        }
        Ok(None)
    }
}

/// Value of `key` for this return, `None` when the return has nothing to say.
fn record_value(
    key: RecordKey,
    report: &Declaration303,
    totals: &DerivedTotals,
    config: &AeatConfig,
) -> Option<FieldValue> {
    let text = |s: &str| Some(FieldValue::Text(s.to_string()));
    let iban = report.bank_account.as_ref().and_then(|b| b.iban().map(|n| (b, n)));

    match key {
        RecordKey::Amount(field) => Some(FieldValue::Amount(report.amount(field))),
        RecordKey::Total(field) => Some(FieldValue::Amount(totals.get(field))),
        RecordKey::FiscalYear => u64::try_from(report.fiscalyear_code).ok().map(FieldValue::Number),
        RecordKey::Period => text(report.period.code()),
        RecordKey::DeclarationType => text(report.declaration_type.code()),
        RecordKey::RegimeType => text(report.regime_type.code()),
        RecordKey::CompanyVat => report.company_vat.as_deref().and_then(text),
        RecordKey::CompanyName => text(&report.company_name),
        RecordKey::Recc => Some(FieldValue::Flag(report.recc)),
        RecordKey::ReccReceiver => Some(FieldValue::Flag(report.recc_receiver)),
        RecordKey::SpecialProrate => Some(FieldValue::Flag(report.special_prorate)),
        RecordKey::SpecialProrateRevocation => {
            Some(FieldValue::Flag(report.special_prorate_revocation))
        }
        RecordKey::Bankruptcy => Some(FieldValue::Flag(report.bankruptcy())),
        RecordKey::AutoBankruptcyDate => report.auto_bankruptcy_date.map(FieldValue::Date),
        RecordKey::AutoBankruptcyDeclaration => text(report.auto_bankruptcy_declaration.code()),
        RecordKey::JointLiquidation => Some(FieldValue::Flag(report.joint_liquidation)),
        RecordKey::MonthlyReturnSubscription => {
            Some(FieldValue::Flag(report.monthly_return_subscription))
        }
        RecordKey::ExoneratedMod390 => text(report.exonerated_mod390.code()),
        RecordKey::ComplementaryDeclaration => {
            Some(FieldValue::Flag(report.complementary_declaration))
        }
        RecordKey::PreviousDeclarationReceipt => {
            report.previous_declaration_receipt.as_deref().and_then(text)
        }
        RecordKey::WithoutActivity => Some(FieldValue::Flag(report.without_activity)),
        RecordKey::SwiftBank => iban.and_then(|(account, _)| account.bic.as_deref()).and_then(text),
        RecordKey::BankAccount => iban.map(|(_, number)| FieldValue::Text(number.compact())),
        RecordKey::PassiveSubjectForalAdministration => {
            text(report.passive_subject_foral_administration.code())
        }
        RecordKey::TakenVatBookToAeat => text(report.taken_vat_book_to_aeat.code()),
        RecordKey::SoftwareVersion => text(&config.software_version),
        RecordKey::DeveloperNif => config.developer_nif.as_deref().and_then(text),
    }
}

fn build_record(
    layout: &'static RecordLayout,
    report: &Declaration303,
    totals: &DerivedTotals,
    config: &AeatConfig,
) -> Result<Record, AeatError> {
    let mut record = Record::new(layout);
    for key in layout.keys() {
        let Some(value) = record_value(key, report, totals, config) else {
            continue;
        };
        let value = match value {
            FieldValue::Text(text) => FieldValue::Text(normalize(&text, &config.preserved_marks)),
            other => other,
        };
        record.set(key, &value)?;
    }
    Ok(record)
}

/// Build the four records of the return.
pub fn build_file(report: &Declaration303, config: &AeatConfig) -> Result<Aeat303File, AeatError> {
    let totals = report.totals()?;
    Ok(Aeat303File {
        header: build_record(&HEADER, report, &totals, config)?,
        detail: build_record(&DETAIL, report, &totals, config)?,
        additional: build_record(&ADDITIONAL, report, &totals, config)?,
        footer: build_record(&FOOTER, report, &totals, config)?,
    })
}

/// Render the return as the normalized text of the file.
///
/// Records are concatenated without separator, then the whole text is
/// normalized once more and checked against the declared layout widths.
pub fn render(report: &Declaration303, config: &AeatConfig) -> Result<String, AeatError> {
    config.validate()?;
    let file = build_file(report, config)?;
    let joined: String = file.records().iter().map(|r| r.to_string()).collect();
    let text = normalize(&joined, &config.preserved_marks);

    let expected = file_width();
    let actual = text.chars().count();
    if actual != expected {
        return Err(AeatError::Width { expected, actual });
    }
    Ok(text)
}

/// Encode the return as ISO-8859-1 bytes ready to be filed.
pub fn encode(report: &Declaration303, config: &AeatConfig) -> Result<Vec<u8>, AeatError> {
    let text = render(report, config)?;
    let bytes = to_latin(&text)?;
    tracing::debug!(report = %report.rec_name(), bytes = bytes.len(), "encoded AEAT 303 file");
    Ok(bytes)
}

fn to_latin(text: &str) -> Result<Vec<u8>, AeatError> {
    let valid_up_to = mem::str_latin1_up_to(text);
    if let Some(character) = text[valid_up_to..].chars().next() {
        return Err(AeatError::Encoding {
            character,
            offset: text[..valid_up_to].chars().count(),
        });
    }
    Ok(mem::encode_latin1_lossy(text).into_owned())
}

/// Read a model 303 file back into its records.
pub fn decode(bytes: &[u8]) -> Result<Aeat303File, AeatError> {
    let text = mem::decode_latin1(bytes);
    let chars: Vec<char> = text.chars().collect();
    let expected = file_width();
    if chars.len() != expected {
        return Err(AeatError::Width {
            expected,
            actual: chars.len(),
        });
    }

    let mut offset = 0;
    let mut take = |layout: &'static RecordLayout| {
        let end = offset + layout.width();
        let slice: String = chars[offset..end].iter().collect();
        offset = end;
        Record::parse(layout, &slice)
    };
    Ok(Aeat303File {
        header: take(&HEADER)?,
        detail: take(&DETAIL)?,
        additional: take(&ADDITIONAL)?,
        footer: take(&FOOTER)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AccountNumber, AutoBankruptcy, BankAccount, Company, Declaration303Builder,
        DeclarationField, PeriodCode,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn report() -> Declaration303 {
        let company = Company {
            name: "Ferretería Muñoz".into(),
            vat_code: Some("ESB12345678".into()),
            currency: "EUR".into(),
        };
        Declaration303Builder::new(&company, PeriodCode::SecondQuarter)
            .fiscalyear_code(2021)
            .amount(DeclarationField::AccruedVatBase3, dec!(1000))
            .amount(DeclarationField::AccruedVatPercent3, dec!(21))
            .amount(DeclarationField::AccruedVatTax3, dec!(210))
            .build()
    }

    #[test]
    fn width_matches_layouts() {
        let bytes = encode(&report(), &AeatConfig::default()).unwrap();
        assert_eq!(bytes.len(), file_width());
    }

    #[test]
    fn header_and_footer_frame() {
        let text = render(&report(), &AeatConfig::default()).unwrap();
        assert!(text.starts_with("<T303020212T0000><AUX>"));
        assert!(text.ends_with("</T303020212T0000>"));
    }

    #[test]
    fn name_is_normalized() {
        let file = build_file(&report(), &AeatConfig::default()).unwrap();
        assert_eq!(
            file.detail.value(RecordKey::CompanyName).unwrap(),
            Some(FieldValue::Text("FERRETERIA MUÑOZ".into()))
        );
        assert_eq!(
            file.detail.value(RecordKey::CompanyVat).unwrap(),
            Some(FieldValue::Text("B12345678".into()))
        );
    }

    #[test]
    fn totals_are_written() {
        let file = build_file(&report(), &AeatConfig::default()).unwrap();
        let total = RecordKey::Total(crate::core::DerivedField::AccruedTotalTax);
        assert_eq!(file.value(total).unwrap(), Some(FieldValue::Amount(dec!(210))));
    }

    #[test]
    fn bankruptcy_flag_follows_selector() {
        let mut r = report();
        let file = build_file(&r, &AeatConfig::default()).unwrap();
        assert_eq!(file.detail.value(RecordKey::Bankruptcy).unwrap(), None);

        r.auto_bankruptcy_declaration = AutoBankruptcy::AfterProceeding;
        r.auto_bankruptcy_date = NaiveDate::from_ymd_opt(2021, 5, 3);
        let file = build_file(&r, &AeatConfig::default()).unwrap();
        assert_eq!(
            file.detail.value(RecordKey::Bankruptcy).unwrap(),
            Some(FieldValue::Flag(true))
        );
        assert_eq!(
            file.detail.raw(RecordKey::AutoBankruptcyDate).as_deref(),
            Some("20210503")
        );
    }

    #[test]
    fn iban_and_bic_in_additional_record() {
        let mut r = report();
        r.bank_account = Some(BankAccount {
            numbers: vec![
                AccountNumber::other("0049 1500"),
                AccountNumber::iban("es91 2100 0418 4502 0005 1332"),
            ],
            bic: Some("CAIXESBBXXX".into()),
        });
        let file = build_file(&r, &AeatConfig::default()).unwrap();
        assert_eq!(
            file.additional.value(RecordKey::BankAccount).unwrap(),
            Some(FieldValue::Text("ES9121000418450200051332".into()))
        );
        assert_eq!(
            file.additional.value(RecordKey::SwiftBank).unwrap(),
            Some(FieldValue::Text("CAIXESBBXXX".into()))
        );
    }

    #[test]
    fn account_without_iban_leaves_columns_blank() {
        let mut r = report();
        r.bank_account = Some(BankAccount {
            numbers: vec![AccountNumber::other("0049 1500")],
            bic: Some("CAIXESBBXXX".into()),
        });
        let file = build_file(&r, &AeatConfig::default()).unwrap();
        assert_eq!(file.additional.value(RecordKey::BankAccount).unwrap(), None);
        assert_eq!(file.additional.value(RecordKey::SwiftBank).unwrap(), None);
    }

    #[test]
    fn unencodable_character() {
        let mut r = report();
        r.company_name = "ACME ✓ SL".into();
        let err = encode(&r, &AeatConfig::default()).unwrap_err();
        let AeatError::Encoding { character, .. } = err else {
            panic!("expected an encoding error");
        };
        assert_eq!(character, '✓');
    }

    #[test]
    fn decode_reads_back() {
        let bytes = encode(&report(), &AeatConfig::default()).unwrap();
        let file = decode(&bytes).unwrap();
        assert_eq!(
            file.value(RecordKey::Amount(DeclarationField::AccruedVatBase3)).unwrap(),
            Some(FieldValue::Amount(dec!(1000)))
        );
        assert_eq!(file.footer.value(RecordKey::FiscalYear).unwrap(), Some(FieldValue::Number(2021)));
    }

    #[test]
    fn decode_rejects_short_input() {
        assert!(matches!(decode(b"<T3030"), Err(AeatError::Width { .. })));
    }
}
