//! Closed set of declaration boxes.
//!
//! Mappings, the calculator and the record layouts all address declaration
//! boxes through [`DeclarationField`] and [`DerivedField`], never through
//! free-form strings. The textual names are only used at the configuration
//! boundary (JSON) and in error messages.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

macro_rules! declaration_fields {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal, )+) => {
        /// An input box of the model 303 return that holds a decimal value
        /// and can be the target of a tax-code or fixed-value mapping.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum DeclarationField {
            $( $(#[$meta])* $variant, )+
        }

        impl DeclarationField {
            /// Every declaration field, in form order.
            pub const ALL: &'static [DeclarationField] = &[ $( DeclarationField::$variant, )+ ];

            /// Stable snake_case identifier used in configuration files.
            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }

            /// Parse from the snake_case identifier.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

declaration_fields! {
    AccruedVatBase1 => "accrued_vat_base_1",
    AccruedVatPercent1 => "accrued_vat_percent_1",
    AccruedVatTax1 => "accrued_vat_tax_1",
    AccruedVatBase2 => "accrued_vat_base_2",
    AccruedVatPercent2 => "accrued_vat_percent_2",
    AccruedVatTax2 => "accrued_vat_tax_2",
    AccruedVatBase3 => "accrued_vat_base_3",
    AccruedVatPercent3 => "accrued_vat_percent_3",
    AccruedVatTax3 => "accrued_vat_tax_3",
    AccruedVatBaseModification => "accrued_vat_base_modification",
    AccruedVatTaxModification => "accrued_vat_tax_modification",
    /// Equivalence surcharge (recargo de equivalencia).
    AccruedReBase1 => "accrued_re_base_1",
    AccruedRePercent1 => "accrued_re_percent_1",
    AccruedReTax1 => "accrued_re_tax_1",
    AccruedReBase2 => "accrued_re_base_2",
    AccruedRePercent2 => "accrued_re_percent_2",
    AccruedReTax2 => "accrued_re_tax_2",
    AccruedReBase3 => "accrued_re_base_3",
    AccruedRePercent3 => "accrued_re_percent_3",
    AccruedReTax3 => "accrued_re_tax_3",
    AccruedReBaseModification => "accrued_re_base_modification",
    AccruedReTaxModification => "accrued_re_tax_modification",
    IntracommunityAdquisitionsBase => "intracommunity_adquisitions_base",
    IntracommunityAdquisitionsTax => "intracommunity_adquisitions_tax",
    OtherPassiveSubjectBase => "other_passive_subject_base",
    OtherPassiveSubjectTax => "other_passive_subject_tax",
    DeductibleCurrentDomesticOperationsBase => "deductible_current_domestic_operations_base",
    DeductibleCurrentDomesticOperationsTax => "deductible_current_domestic_operations_tax",
    DeductibleInvestmentDomesticOperationsBase => "deductible_investment_domestic_operations_base",
    DeductibleInvestmentDomesticOperationsTax => "deductible_investment_domestic_operations_tax",
    DeductibleCurrentImportOperationsBase => "deductible_current_import_operations_base",
    DeductibleCurrentImportOperationsTax => "deductible_current_import_operations_tax",
    DeductibleInvestmentImportOperationsBase => "deductible_investment_import_operations_base",
    DeductibleInvestmentImportOperationsTax => "deductible_investment_import_operations_tax",
    DeductibleCurrentIntracommunityOperationsBase => "deductible_current_intracommunity_operations_base",
    DeductibleCurrentIntracommunityOperationsTax => "deductible_current_intracommunity_operations_tax",
    DeductibleInvestmentIntracommunityOperationsBase => "deductible_investment_intracommunity_operations_base",
    DeductibleInvestmentIntracommunityOperationsTax => "deductible_investment_intracommunity_operations_tax",
    DeductibleRegularizationBase => "deductible_regularization_base",
    DeductibleRegularizationTax => "deductible_regularization_tax",
    DeductibleCompensations => "deductible_compensations",
    DeductibleInvestmentRegularization => "deductible_investment_regularization",
    DeductibleProRataRegularization => "deductible_pro_rata_regularization",
    /// Regularization art. 80.cinco.5ª LIVA (only after filing model 952).
    ResultTaxRegularitzation => "result_tax_regularitzation",
    StateAdministrationPercent => "state_administration_percent",
    PreviousPeriodAmountToCompensate => "previous_period_amount_to_compensate",
    IntracommunityDeliveries => "intracommunity_deliveries",
    Exports => "exports",
    NotSubjectOrReverseCharge => "not_subject_or_reverse_charge",
    /// Import VAT paid at customs pending entry.
    AduanaTaxPending => "aduana_tax_pending",
    JointTaxationStateProvincialCouncils => "joint_taxation_state_provincial_councils",
    ToDeduce => "to_deduce",
    AmountToCompensate => "amount_to_compensate",
    /// Special cash criteria regime (RECC).
    ReccDeliveriesBase => "recc_deliveries_base",
    ReccDeliveriesTax => "recc_deliveries_tax",
    ReccAdquisitionsBase => "recc_adquisitions_base",
    ReccAdquisitionsTax => "recc_adquisitions_tax",
    InfoTerritoryAlava => "info_territory_alava",
    InfoTerritoryGuipuzcoa => "info_territory_guipuzcoa",
    InfoTerritoryVizcaya => "info_territory_vizcaya",
    InfoTerritoryNavarra => "info_territory_navarra",
    SpecialInfoExemptOp2bdeduced => "special_info_exempt_op_2bdeduced",
    SpecialInfoFarmingCattleraisingFishing => "special_info_farming_cattleraising_fishing",
    SpecialInfoPassiveSubjectRe => "special_info_passive_subject_re",
    SpecialInfoArtAntiquesCollectibles => "special_info_art_antiques_collectibles",
    SpecialInfoTravelAgency => "special_info_travel_agency",
    SpecialInfoDeliveryInvestmentDomesticOperations => "special_info_delivery_investment_domestic_operations",
}

impl fmt::Display for DeclarationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for DeclarationField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DeclarationField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown AEAT 303 field '{name}'")))
    }
}

/// A box computed by the calculator from other boxes.
///
/// Derived boxes are never mapping targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedField {
    AccruedTotalTax,
    DeductibleTotal,
    GeneralRegimeResult,
    SumResults,
    StateAdministrationAmount,
    Result,
    LiquidationResult,
}

impl DerivedField {
    /// Every derived field, in calculation order.
    pub const ALL: &'static [DerivedField] = &[
        Self::AccruedTotalTax,
        Self::DeductibleTotal,
        Self::GeneralRegimeResult,
        Self::SumResults,
        Self::StateAdministrationAmount,
        Self::Result,
        Self::LiquidationResult,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AccruedTotalTax => "accrued_total_tax",
            Self::DeductibleTotal => "deductible_total",
            Self::GeneralRegimeResult => "general_regime_result",
            Self::SumResults => "sum_results",
            Self::StateAdministrationAmount => "state_administration_amount",
            Self::Result => "result",
            Self::LiquidationResult => "liquidation_result",
        }
    }
}

impl fmt::Display for DerivedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
