//! Record layouts of the model 303 file: header, detail page, additional
//! page and footer.

use crate::core::DeclarationField::*;
use crate::core::DerivedField;

use super::layout::{FieldKind, FieldSpec, RecordKey, RecordLayout};

const fn number(key: RecordKey, width: usize) -> FieldSpec {
    FieldSpec::field(key, width, FieldKind::Number)
}

pub static HEADER: RecordLayout = RecordLayout {
    name: "header",
    fields: &[
        FieldSpec::literal("<T"),
        FieldSpec::literal("303"),
        FieldSpec::literal("0"),
        number(RecordKey::FiscalYear, 4),
        FieldSpec::text(RecordKey::Period, 2),
        FieldSpec::literal("0000>"),
        FieldSpec::literal("<AUX>"),
        FieldSpec::blank(70),
        FieldSpec::text(RecordKey::SoftwareVersion, 4),
        FieldSpec::blank(4),
        FieldSpec::text(RecordKey::DeveloperNif, 9),
        FieldSpec::blank(213),
        FieldSpec::literal("</AUX>"),
    ],
};

pub static DETAIL: RecordLayout = RecordLayout {
    name: "detail",
    fields: &[
        FieldSpec::literal("<T"),
        FieldSpec::literal("303"),
        FieldSpec::literal("01000"),
        FieldSpec::literal(">"),
        // complementary page indicator
        FieldSpec::blank(1),
        FieldSpec::text(RecordKey::DeclarationType, 1),
        FieldSpec::text(RecordKey::CompanyVat, 9),
        FieldSpec::text(RecordKey::CompanyName, 80),
        number(RecordKey::FiscalYear, 4),
        FieldSpec::text(RecordKey::Period, 2),
        FieldSpec::text(RecordKey::RegimeType, 1),
        FieldSpec::flag(RecordKey::Recc),
        FieldSpec::flag(RecordKey::ReccReceiver),
        FieldSpec::flag(RecordKey::SpecialProrate),
        FieldSpec::flag(RecordKey::SpecialProrateRevocation),
        FieldSpec::flag(RecordKey::Bankruptcy),
        FieldSpec::field(RecordKey::AutoBankruptcyDate, 8, FieldKind::Date),
        FieldSpec::text(RecordKey::AutoBankruptcyDeclaration, 1),
        FieldSpec::flag(RecordKey::JointLiquidation),
        FieldSpec::flag(RecordKey::MonthlyReturnSubscription),
        FieldSpec::text(RecordKey::ExoneratedMod390, 1),
        FieldSpec::amount(AccruedVatBase1),
        FieldSpec::percent(AccruedVatPercent1),
        FieldSpec::amount(AccruedVatTax1),
        FieldSpec::amount(AccruedVatBase2),
        FieldSpec::percent(AccruedVatPercent2),
        FieldSpec::amount(AccruedVatTax2),
        FieldSpec::amount(AccruedVatBase3),
        FieldSpec::percent(AccruedVatPercent3),
        FieldSpec::amount(AccruedVatTax3),
        FieldSpec::amount(IntracommunityAdquisitionsBase),
        FieldSpec::amount(IntracommunityAdquisitionsTax),
        FieldSpec::amount(OtherPassiveSubjectBase),
        FieldSpec::amount(OtherPassiveSubjectTax),
        FieldSpec::amount(AccruedVatBaseModification),
        FieldSpec::amount(AccruedVatTaxModification),
        FieldSpec::amount(AccruedReBase1),
        FieldSpec::percent(AccruedRePercent1),
        FieldSpec::amount(AccruedReTax1),
        FieldSpec::amount(AccruedReBase2),
        FieldSpec::percent(AccruedRePercent2),
        FieldSpec::amount(AccruedReTax2),
        FieldSpec::amount(AccruedReBase3),
        FieldSpec::percent(AccruedRePercent3),
        FieldSpec::amount(AccruedReTax3),
        FieldSpec::amount(AccruedReBaseModification),
        FieldSpec::amount(AccruedReTaxModification),
        FieldSpec::total(DerivedField::AccruedTotalTax),
        FieldSpec::amount(DeductibleCurrentDomesticOperationsBase),
        FieldSpec::amount(DeductibleCurrentDomesticOperationsTax),
        FieldSpec::amount(DeductibleInvestmentDomesticOperationsBase),
        FieldSpec::amount(DeductibleInvestmentDomesticOperationsTax),
        FieldSpec::amount(DeductibleCurrentImportOperationsBase),
        FieldSpec::amount(DeductibleCurrentImportOperationsTax),
        FieldSpec::amount(DeductibleInvestmentImportOperationsBase),
        FieldSpec::amount(DeductibleInvestmentImportOperationsTax),
        FieldSpec::amount(DeductibleCurrentIntracommunityOperationsBase),
        FieldSpec::amount(DeductibleCurrentIntracommunityOperationsTax),
        FieldSpec::amount(DeductibleInvestmentIntracommunityOperationsBase),
        FieldSpec::amount(DeductibleInvestmentIntracommunityOperationsTax),
        FieldSpec::amount(DeductibleRegularizationBase),
        FieldSpec::amount(DeductibleRegularizationTax),
        FieldSpec::amount(DeductibleCompensations),
        FieldSpec::amount(DeductibleInvestmentRegularization),
        FieldSpec::amount(DeductibleProRataRegularization),
        FieldSpec::total(DerivedField::DeductibleTotal),
        FieldSpec::total(DerivedField::GeneralRegimeResult),
        FieldSpec::blank(600),
        FieldSpec::literal("</T30301000>"),
    ],
};

pub static ADDITIONAL: RecordLayout = RecordLayout {
    name: "additional",
    fields: &[
        FieldSpec::literal("<T"),
        FieldSpec::literal("303"),
        FieldSpec::literal("03000"),
        FieldSpec::literal(">"),
        FieldSpec::amount(IntracommunityDeliveries),
        FieldSpec::amount(Exports),
        FieldSpec::amount(NotSubjectOrReverseCharge),
        FieldSpec::amount(ReccDeliveriesBase),
        FieldSpec::amount(ReccDeliveriesTax),
        FieldSpec::amount(ReccAdquisitionsBase),
        FieldSpec::amount(ReccAdquisitionsTax),
        FieldSpec::amount(ResultTaxRegularitzation),
        FieldSpec::total(DerivedField::SumResults),
        FieldSpec::percent(StateAdministrationPercent),
        FieldSpec::total(DerivedField::StateAdministrationAmount),
        FieldSpec::amount(AduanaTaxPending),
        FieldSpec::amount(PreviousPeriodAmountToCompensate),
        FieldSpec::amount(JointTaxationStateProvincialCouncils),
        FieldSpec::total(DerivedField::Result),
        FieldSpec::amount(ToDeduce),
        FieldSpec::total(DerivedField::LiquidationResult),
        FieldSpec::amount(AmountToCompensate),
        FieldSpec::amount(InfoTerritoryAlava),
        FieldSpec::amount(InfoTerritoryGuipuzcoa),
        FieldSpec::amount(InfoTerritoryVizcaya),
        FieldSpec::amount(InfoTerritoryNavarra),
        FieldSpec::amount(SpecialInfoExemptOp2bdeduced),
        FieldSpec::amount(SpecialInfoFarmingCattleraisingFishing),
        FieldSpec::amount(SpecialInfoPassiveSubjectRe),
        FieldSpec::amount(SpecialInfoArtAntiquesCollectibles),
        FieldSpec::amount(SpecialInfoTravelAgency),
        FieldSpec::amount(SpecialInfoDeliveryInvestmentDomesticOperations),
        FieldSpec::flag(RecordKey::ComplementaryDeclaration),
        FieldSpec::text(RecordKey::PreviousDeclarationReceipt, 13),
        FieldSpec::flag(RecordKey::WithoutActivity),
        FieldSpec::text(RecordKey::SwiftBank, 11),
        FieldSpec::text(RecordKey::BankAccount, 34),
        FieldSpec::text(RecordKey::PassiveSubjectForalAdministration, 1),
        FieldSpec::text(RecordKey::TakenVatBookToAeat, 1),
        FieldSpec::blank(50),
        FieldSpec::literal("</T30303000>"),
    ],
};

pub static FOOTER: RecordLayout = RecordLayout {
    name: "footer",
    fields: &[
        FieldSpec::literal("</T3030"),
        number(RecordKey::FiscalYear, 4),
        FieldSpec::text(RecordKey::Period, 2),
        FieldSpec::literal("0000>"),
    ],
};

/// Layouts in file order.
pub static LAYOUTS: [&RecordLayout; 4] = [&HEADER, &DETAIL, &ADDITIONAL, &FOOTER];

/// Width of a complete model 303 file, in characters.
pub fn file_width() -> usize {
    LAYOUTS.iter().map(|l| l.width()).sum()
}
