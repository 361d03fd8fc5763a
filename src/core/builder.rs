use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::declaration::{Amounts, Declaration303};
use super::fields::DeclarationField;
use super::period::FiscalYear;
use super::state::ReportState;
use super::types::*;

/// Builder for a draft model 303 return.
///
/// Prefills company data and the form defaults: state administration share
/// of 100%, no bankruptcy proceeding, model 390 question unanswered and the
/// foral-administration and VAT-book questions answered "no".
///
/// ```
/// use aeat303::*;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let company = Company {
///     name: "Ferretería López SL".into(),
///     vat_code: Some("ESB12345678".into()),
///     currency: "EUR".into(),
/// };
/// let fy = FiscalYear::monthly(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).unwrap();
/// let report = Declaration303Builder::new(&company, PeriodCode::SecondQuarter)
///     .fiscal_year(&fy)
///     .amount(DeclarationField::ToDeduce, dec!(50))
///     .build();
///
/// assert_eq!(report.company_vat.as_deref(), Some("B12345678"));
/// assert_eq!(report.fiscalyear_code, 2021);
/// assert_eq!(report.state, ReportState::Draft);
/// ```
pub struct Declaration303Builder {
    report: Declaration303,
}

impl Declaration303Builder {
    pub fn new(company: &Company, period: PeriodCode) -> Self {
        let mut amounts = Amounts::default();
        amounts.set(DeclarationField::StateAdministrationPercent, Decimal::ONE_HUNDRED);
        Self {
            report: Declaration303 {
                company_name: company.declared_name(),
                company_vat: company.declared_vat(),
                currency: company.currency.clone(),
                fiscalyear_code: 0,
                period,
                declaration_type: DeclarationType::Income,
                regime_type: RegimeType::General,
                monthly_return_subscription: false,
                joint_liquidation: false,
                recc: false,
                recc_receiver: false,
                special_prorate: false,
                special_prorate_revocation: false,
                without_activity: false,
                complementary_declaration: false,
                previous_declaration_receipt: None,
                exonerated_mod390: FormAnswer::Unanswered,
                passive_subject_foral_administration: FormAnswer::No,
                taken_vat_book_to_aeat: FormAnswer::No,
                auto_bankruptcy_declaration: AutoBankruptcy::No,
                auto_bankruptcy_date: None,
                bank_account: None,
                amounts,
                calculation_date: None,
                state: ReportState::Draft,
                file: None,
            },
        }
    }

    /// Take the fiscal year code from the fiscal year start.
    pub fn fiscal_year(mut self, fiscal_year: &FiscalYear) -> Self {
        self.report.fiscalyear_code = fiscal_year.code();
        self
    }

    pub fn fiscalyear_code(mut self, code: i32) -> Self {
        self.report.fiscalyear_code = code;
        self
    }

    pub fn declaration_type(mut self, declaration_type: DeclarationType) -> Self {
        self.report.declaration_type = declaration_type;
        self
    }

    pub fn regime_type(mut self, regime_type: RegimeType) -> Self {
        self.report.regime_type = regime_type;
        self
    }

    pub fn monthly_return_subscription(mut self, value: bool) -> Self {
        self.report.monthly_return_subscription = value;
        self
    }

    pub fn joint_liquidation(mut self, value: bool) -> Self {
        self.report.joint_liquidation = value;
        self
    }

    /// Special cash criteria as supplier and/or receiver.
    pub fn recc(mut self, recc: bool, receiver: bool) -> Self {
        self.report.recc = recc;
        self.report.recc_receiver = receiver;
        self
    }

    pub fn special_prorate(mut self, prorate: bool, revocation: bool) -> Self {
        self.report.special_prorate = prorate;
        self.report.special_prorate_revocation = revocation;
        self
    }

    pub fn without_activity(mut self, value: bool) -> Self {
        self.report.without_activity = value;
        self
    }

    /// Mark the return as complementary to an earlier one.
    pub fn complementary(mut self, previous_receipt: impl Into<String>) -> Self {
        self.report.complementary_declaration = true;
        self.report.previous_declaration_receipt = Some(previous_receipt.into());
        self
    }

    pub fn exonerated_mod390(mut self, answer: FormAnswer) -> Self {
        self.report.exonerated_mod390 = answer;
        self
    }

    pub fn passive_subject_foral_administration(mut self, answer: FormAnswer) -> Self {
        self.report.passive_subject_foral_administration = answer;
        self
    }

    pub fn taken_vat_book_to_aeat(mut self, answer: FormAnswer) -> Self {
        self.report.taken_vat_book_to_aeat = answer;
        self
    }

    pub fn auto_bankruptcy(mut self, declaration: AutoBankruptcy, date: Option<NaiveDate>) -> Self {
        self.report.auto_bankruptcy_declaration = declaration;
        self.report.auto_bankruptcy_date = date;
        self
    }

    pub fn bank_account(mut self, account: BankAccount) -> Self {
        self.report.bank_account = Some(account);
        self
    }

    pub fn amount(mut self, field: DeclarationField, value: Decimal) -> Self {
        self.report.amounts.set(field, value);
        self
    }

    pub fn build(self) -> Declaration303 {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn company() -> Company {
        Company {
            name: "Talleres Ibáñez SA".into(),
            vat_code: Some("ESA28000000".into()),
            currency: "EUR".into(),
        }
    }

    #[test]
    fn defaults() {
        let r = Declaration303Builder::new(&company(), PeriodCode::January).build();
        assert_eq!(r.company_name, "TALLERES IBÁÑEZ SA");
        assert_eq!(r.company_vat.as_deref(), Some("A28000000"));
        assert_eq!(r.amount(DeclarationField::StateAdministrationPercent), dec!(100));
        assert_eq!(r.auto_bankruptcy_declaration, AutoBankruptcy::No);
        assert_eq!(r.exonerated_mod390, FormAnswer::Unanswered);
        assert_eq!(r.passive_subject_foral_administration, FormAnswer::No);
        assert_eq!(r.taken_vat_book_to_aeat, FormAnswer::No);
        assert!(!r.complementary_declaration);
        assert_eq!(r.state, ReportState::Draft);
        assert!(r.file.is_none());
    }

    #[test]
    fn complementary_sets_receipt() {
        let r = Declaration303Builder::new(&company(), PeriodCode::January)
            .complementary("3031234567890")
            .build();
        assert!(r.complementary_declaration);
        assert_eq!(r.previous_declaration_receipt.as_deref(), Some("3031234567890"));
    }
}
