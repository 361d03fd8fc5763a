//! Fixed-width record layouts and record buffers.
//!
//! A [`RecordLayout`] is an ordered list of columns. Each column has a width,
//! a [`FieldKind`] deciding how values are rendered and which character an
//! unset column is filled with, and a [`Slot`] saying what goes in it: a
//! literal, blanks, or a named declaration value.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AeatError, DeclarationField, DerivedField};

/// Marker written in front of negative amounts.
pub const NEGATIVE_SIGN: char = 'N';

/// How a column renders its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Left-aligned, blank padded, truncated when too long.
    Text,
    /// Right-aligned, zero padded unsigned integer.
    Number,
    /// Two implied decimals, zero padded, `N` first when negative.
    Amount,
    /// `X` when set.
    Flag,
    /// `YYYYMMDD`.
    Date,
}

impl FieldKind {
    /// Character an unset column is filled with.
    pub fn fill(&self) -> char {
        match self {
            Self::Text | Self::Flag => ' ',
            Self::Number | Self::Amount | Self::Date => '0',
        }
    }
}

/// Declaration value a column can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Amount(DeclarationField),
    Total(DerivedField),
    FiscalYear,
    Period,
    DeclarationType,
    RegimeType,
    CompanyVat,
    CompanyName,
    Recc,
    ReccReceiver,
    SpecialProrate,
    SpecialProrateRevocation,
    Bankruptcy,
    AutoBankruptcyDate,
    AutoBankruptcyDeclaration,
    JointLiquidation,
    MonthlyReturnSubscription,
    ExoneratedMod390,
    ComplementaryDeclaration,
    PreviousDeclarationReceipt,
    WithoutActivity,
    SwiftBank,
    BankAccount,
    PassiveSubjectForalAdministration,
    TakenVatBookToAeat,
    SoftwareVersion,
    DeveloperNif,
}

impl RecordKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Amount(field) => field.name(),
            Self::Total(field) => field.name(),
            Self::FiscalYear => "fiscalyear",
            Self::Period => "period",
            Self::DeclarationType => "type",
            Self::RegimeType => "regime_type",
            Self::CompanyVat => "company_vat",
            Self::CompanyName => "company_name",
            Self::Recc => "recc",
            Self::ReccReceiver => "recc_receiver",
            Self::SpecialProrate => "special_prorate",
            Self::SpecialProrateRevocation => "special_prorate_revocation",
            Self::Bankruptcy => "bankruptcy",
            Self::AutoBankruptcyDate => "auto_bankruptcy_date",
            Self::AutoBankruptcyDeclaration => "auto_bankruptcy_declaration",
            Self::JointLiquidation => "joint_liquidation",
            Self::MonthlyReturnSubscription => "monthly_return_subscription",
            Self::ExoneratedMod390 => "exonerated_mod390",
            Self::ComplementaryDeclaration => "complementary_declaration",
            Self::PreviousDeclarationReceipt => "previous_declaration_receipt",
            Self::WithoutActivity => "without_activity",
            Self::SwiftBank => "swift_bank",
            Self::BankAccount => "bank_account",
            Self::PassiveSubjectForalAdministration => "passive_subject_foral_administration",
            Self::TakenVatBookToAeat => "taken_vat_book_to_aeat",
            Self::SoftwareVersion => "software_version",
            Self::DeveloperNif => "developer_nif",
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Literal text, always written.
    Const(&'static str),
    /// Reserved columns, left blank.
    Blank,
    /// A declaration value.
    Field(RecordKey),
}

/// One column of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub slot: Slot,
    pub width: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn literal(text: &'static str) -> Self {
        Self {
            slot: Slot::Const(text),
            width: text.len(),
            kind: FieldKind::Text,
        }
    }

    pub const fn blank(width: usize) -> Self {
        Self {
            slot: Slot::Blank,
            width,
            kind: FieldKind::Text,
        }
    }

    pub const fn field(key: RecordKey, width: usize, kind: FieldKind) -> Self {
        Self {
            slot: Slot::Field(key),
            width,
            kind,
        }
    }

    pub const fn text(key: RecordKey, width: usize) -> Self {
        Self::field(key, width, FieldKind::Text)
    }

    pub const fn flag(key: RecordKey) -> Self {
        Self::field(key, 1, FieldKind::Flag)
    }

    /// 17-column amount box.
    pub const fn amount(field: DeclarationField) -> Self {
        Self::field(RecordKey::Amount(field), 17, FieldKind::Amount)
    }

    /// 5-column percentage box.
    pub const fn percent(field: DeclarationField) -> Self {
        Self::field(RecordKey::Amount(field), 5, FieldKind::Amount)
    }

    pub const fn total(field: DerivedField) -> Self {
        Self::field(RecordKey::Total(field), 17, FieldKind::Amount)
    }

    pub fn key(&self) -> Option<RecordKey> {
        match self.slot {
            Slot::Field(key) => Some(key),
            _ => None,
        }
    }
}

/// Ordered columns of one record.
#[derive(Debug)]
pub struct RecordLayout {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordLayout {
    /// Total width in characters.
    pub fn width(&self) -> usize {
        self.fields.iter().map(|f| f.width).sum()
    }

    /// Columns with their character offsets.
    pub fn spans(&self) -> impl Iterator<Item = (usize, &FieldSpec)> + '_ {
        self.fields.iter().scan(0, |offset, spec| {
            let start = *offset;
            *offset += spec.width;
            Some((start, spec))
        })
    }

    /// Distinct keys bound in this layout, in column order.
    pub fn keys(&self) -> Vec<RecordKey> {
        let mut keys = Vec::new();
        for key in self.fields.iter().filter_map(FieldSpec::key) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn contains(&self, key: RecordKey) -> bool {
        self.fields.iter().any(|f| f.key() == Some(key))
    }
}

/// A value to be written into a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(u64),
    Amount(Decimal),
    Flag(bool),
    Date(NaiveDate),
}

impl FieldValue {
    /// Empty values are never written; the column keeps its fill.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(n) => *n == 0,
            Self::Amount(amount) => amount.is_zero(),
            Self::Flag(flag) => !flag,
            Self::Date(_) => false,
        }
    }

    /// Render for a column of the given kind and width.
    fn render(&self, key: RecordKey, spec: &FieldSpec) -> Result<String, AeatError> {
        let width = spec.width;
        let overflow = |value: String| AeatError::Overflow {
            field: key.name().to_string(),
            value,
            width,
        };

        let rendered = match (spec.kind, self) {
            (FieldKind::Text, Self::Text(text)) => {
                let count = text.chars().count();
                if count > width {
                    tracing::warn!(field = %key, width, "truncating text value");
                    text.chars().take(width).collect()
                } else {
                    format!("{text:<width$}")
                }
            }
            (FieldKind::Number, Self::Number(n)) => format!("{n:0width$}"),
            (FieldKind::Amount, Self::Amount(amount)) => {
                let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                let cents = (rounded.abs() * Decimal::ONE_HUNDRED)
                    .to_u128()
                    .ok_or_else(|| overflow(amount.to_string()))?;
                if rounded.is_sign_negative() && !rounded.is_zero() {
                    let digits = width.saturating_sub(1);
                    format!("{NEGATIVE_SIGN}{cents:0digits$}")
                } else {
                    format!("{cents:0width$}")
                }
            }
            (FieldKind::Flag, Self::Flag(flag)) => {
                let mark = if *flag { "X" } else { " " };
                format!("{mark:<width$}")
            }
            (FieldKind::Date, Self::Date(date)) => date.format("%Y%m%d").to_string(),
            (kind, value) => {
                return Err(AeatError::Layout(format!(
                    "{value:?} cannot be written to {kind:?} column {key}"
                )));
            }
        };

        if rendered.chars().count() != width {
            return Err(overflow(rendered));
        }
        Ok(rendered)
    }

    fn parse(raw: &str, key: RecordKey, kind: FieldKind) -> Result<Self, AeatError> {
        let invalid = || AeatError::Layout(format!("cannot read {kind:?} column {key} from {raw:?}"));
        match kind {
            FieldKind::Text => Ok(Self::Text(raw.trim_end().to_string())),
            FieldKind::Number => raw.parse().map(Self::Number).map_err(|_| invalid()),
            FieldKind::Amount => {
                let (negative, digits) = match raw.strip_prefix(NEGATIVE_SIGN) {
                    Some(rest) => (true, rest),
                    None => (false, raw),
                };
                if !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let cents: i64 = digits.parse().map_err(|_| invalid())?;
                let amount = Decimal::new(cents, 2);
                Ok(Self::Amount(if negative { -amount } else { amount }))
            }
            FieldKind::Flag => match raw {
                "X" => Ok(Self::Flag(true)),
                _ => Err(invalid()),
            },
            FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y%m%d")
                .map(Self::Date)
                .map_err(|_| invalid()),
        }
    }
}

/// A record buffer laid out by a [`RecordLayout`].
#[derive(Debug, Clone)]
pub struct Record {
    layout: &'static RecordLayout,
    buf: Vec<char>,
}

impl Record {
    /// Record prefilled with every column's fill and the layout literals.
    pub fn new(layout: &'static RecordLayout) -> Self {
        let mut buf = Vec::with_capacity(layout.width());
        for spec in layout.fields {
            match spec.slot {
                Slot::Const(text) => buf.extend(text.chars()),
                Slot::Blank | Slot::Field(_) => {
                    buf.extend(std::iter::repeat_n(spec.kind.fill(), spec.width))
                }
            }
        }
        Self { layout, buf }
    }

    /// Read a record back from its text. The text must have the layout width
    /// and carry the layout literals.
    pub fn parse(layout: &'static RecordLayout, text: &str) -> Result<Self, AeatError> {
        let buf: Vec<char> = text.chars().collect();
        if buf.len() != layout.width() {
            return Err(AeatError::Width {
                expected: layout.width(),
                actual: buf.len(),
            });
        }
        let record = Self { layout, buf };
        for (offset, spec) in layout.spans() {
            if let Slot::Const(literal) = spec.slot {
                let found = record.column(offset, spec.width);
                if found != literal {
                    return Err(AeatError::Layout(format!(
                        "{} record expects {literal:?} at offset {offset}, found {found:?}",
                        layout.name
                    )));
                }
            }
        }
        Ok(record)
    }

    pub fn layout(&self) -> &'static RecordLayout {
        self.layout
    }

    /// Write `value` into every column bound to `key`. Returns whether the
    /// layout has such a column. Empty values leave the columns untouched.
    pub fn set(&mut self, key: RecordKey, value: &FieldValue) -> Result<bool, AeatError> {
        let layout = self.layout;
        let mut found = false;
        for (offset, spec) in layout.spans() {
            if spec.key() != Some(key) {
                continue;
            }
            found = true;
            if value.is_empty() {
                continue;
            }
            let rendered = value.render(key, spec)?;
            for (slot, c) in self.buf[offset..offset + spec.width].iter_mut().zip(rendered.chars()) {
                *slot = c;
            }
        }
        Ok(found)
    }

    /// Raw text of the first column bound to `key`.
    pub fn raw(&self, key: RecordKey) -> Option<String> {
        self.layout
            .spans()
            .find(|(_, spec)| spec.key() == Some(key))
            .map(|(offset, spec)| self.column(offset, spec.width))
    }

    /// Parsed value of the first column bound to `key`. `None` when the
    /// layout has no such column or the column holds only its fill.
    pub fn value(&self, key: RecordKey) -> Result<Option<FieldValue>, AeatError> {
        let Some((offset, spec)) = self.layout.spans().find(|(_, spec)| spec.key() == Some(key))
        else {
            return Ok(None);
        };
        let raw = self.column(offset, spec.width);
        if raw.chars().all(|c| c == spec.kind.fill()) {
            return Ok(None);
        }
        FieldValue::parse(&raw, key, spec.kind).map(Some)
    }

    fn column(&self, offset: usize, width: usize) -> String {
        self.buf[offset..offset + width].iter().collect()
    }

    pub fn width(&self) -> usize {
        self.buf.len()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.buf {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    static SAMPLE: RecordLayout = RecordLayout {
        name: "sample",
        fields: &[
            FieldSpec::literal("<S>"),
            FieldSpec::text(RecordKey::CompanyName, 6),
            FieldSpec::field(RecordKey::FiscalYear, 4, FieldKind::Number),
            FieldSpec::blank(2),
            FieldSpec::amount(DeclarationField::Exports),
            FieldSpec::percent(DeclarationField::AccruedVatPercent1),
            FieldSpec::flag(RecordKey::Recc),
            FieldSpec::field(RecordKey::AutoBankruptcyDate, 8, FieldKind::Date),
            FieldSpec::text(RecordKey::CompanyName, 3),
        ],
    };

    #[test]
    fn fresh_record_holds_fill() {
        let record = Record::new(&SAMPLE);
        assert_eq!(record.width(), SAMPLE.width());
        assert_eq!(
            record.to_string(),
            format!("<S>{}0000  {}00000 00000000   ", " ".repeat(6), "0".repeat(17))
        );
    }

    #[test]
    fn amounts_have_implied_decimals() {
        let mut record = Record::new(&SAMPLE);
        let exports = RecordKey::Amount(DeclarationField::Exports);
        record.set(exports, &FieldValue::Amount(dec!(1234.567))).unwrap();
        assert_eq!(record.raw(exports).unwrap(), "00000000000123457");

        record.set(exports, &FieldValue::Amount(dec!(-50))).unwrap();
        assert_eq!(record.raw(exports).unwrap(), "N0000000000005000");
        assert_eq!(record.value(exports).unwrap(), Some(FieldValue::Amount(dec!(-50))));

        let percent = RecordKey::Amount(DeclarationField::AccruedVatPercent1);
        record.set(percent, &FieldValue::Amount(dec!(21))).unwrap();
        assert_eq!(record.raw(percent).unwrap(), "02100");
    }

    #[test]
    fn zero_and_false_keep_fill() {
        let mut record = Record::new(&SAMPLE);
        let exports = RecordKey::Amount(DeclarationField::Exports);
        assert!(record.set(exports, &FieldValue::Amount(Decimal::ZERO)).unwrap());
        assert!(record.set(RecordKey::Recc, &FieldValue::Flag(false)).unwrap());
        assert_eq!(record.to_string(), Record::new(&SAMPLE).to_string());
        assert_eq!(record.value(exports).unwrap(), None);
    }

    #[test]
    fn text_written_to_every_column() {
        let mut record = Record::new(&SAMPLE);
        let written = record
            .set(RecordKey::CompanyName, &FieldValue::Text("ACME".into()))
            .unwrap();
        assert!(written);
        assert!(record.to_string().starts_with("<S>ACME  "));
        assert!(record.to_string().ends_with("ACM"));
    }

    #[test]
    fn missing_key_reports_false() {
        let mut record = Record::new(&SAMPLE);
        let found = record
            .set(RecordKey::BankAccount, &FieldValue::Text("ES00".into()))
            .unwrap();
        assert!(!found);
    }

    #[test]
    fn number_overflow() {
        let mut record = Record::new(&SAMPLE);
        let err = record
            .set(RecordKey::FiscalYear, &FieldValue::Number(20211))
            .unwrap_err();
        assert!(matches!(err, AeatError::Overflow { width: 4, .. }));
    }

    #[test]
    fn amount_overflow() {
        let mut record = Record::new(&SAMPLE);
        let percent = RecordKey::Amount(DeclarationField::AccruedVatPercent1);
        let err = record.set(percent, &FieldValue::Amount(dec!(1000))).unwrap_err();
        assert!(matches!(err, AeatError::Overflow { .. }));
    }

    #[test]
    fn kind_mismatch() {
        let mut record = Record::new(&SAMPLE);
        let err = record
            .set(RecordKey::FiscalYear, &FieldValue::Text("2021".into()))
            .unwrap_err();
        assert!(matches!(err, AeatError::Layout(_)));
    }

    #[test]
    fn parse_checks_literals_and_width() {
        let text = Record::new(&SAMPLE).to_string();
        assert!(Record::parse(&SAMPLE, &text).is_ok());
        assert!(matches!(
            Record::parse(&SAMPLE, &text[1..]),
            Err(AeatError::Width { .. })
        ));
        let broken = text.replacen("<S>", "<Q>", 1);
        assert!(matches!(Record::parse(&SAMPLE, &broken), Err(AeatError::Layout(_))));
    }

    #[test]
    fn date_and_flag_values() {
        let mut record = Record::new(&SAMPLE);
        let date = NaiveDate::from_ymd_opt(2021, 6, 30).unwrap();
        record.set(RecordKey::AutoBankruptcyDate, &FieldValue::Date(date)).unwrap();
        record.set(RecordKey::Recc, &FieldValue::Flag(true)).unwrap();
        assert_eq!(record.raw(RecordKey::AutoBankruptcyDate).unwrap(), "20210630");
        assert_eq!(
            record.value(RecordKey::AutoBankruptcyDate).unwrap(),
            Some(FieldValue::Date(date))
        );
        assert_eq!(record.value(RecordKey::Recc).unwrap(), Some(FieldValue::Flag(true)));
    }
}
