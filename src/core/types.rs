use serde::{Deserialize, Serialize};

/// Declared period: a calendar quarter ("1T".."4T") or a month ("01".."12").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodCode {
    FirstQuarter,
    SecondQuarter,
    ThirdQuarter,
    FourthQuarter,
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl PeriodCode {
    /// All period codes, quarters first.
    pub const ALL: &'static [PeriodCode] = &[
        Self::FirstQuarter,
        Self::SecondQuarter,
        Self::ThirdQuarter,
        Self::FourthQuarter,
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// AEAT period code as written in the file.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FirstQuarter => "1T",
            Self::SecondQuarter => "2T",
            Self::ThirdQuarter => "3T",
            Self::FourthQuarter => "4T",
            Self::January => "01",
            Self::February => "02",
            Self::March => "03",
            Self::April => "04",
            Self::May => "05",
            Self::June => "06",
            Self::July => "07",
            Self::August => "08",
            Self::September => "09",
            Self::October => "10",
            Self::November => "11",
            Self::December => "12",
        }
    }

    /// Parse from the AEAT period code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.code() == code)
    }

    pub fn is_quarter(&self) -> bool {
        matches!(
            self,
            Self::FirstQuarter | Self::SecondQuarter | Self::ThirdQuarter | Self::FourthQuarter
        )
    }

    /// First and last calendar month covered (1-based, inclusive).
    pub fn months(&self) -> (u32, u32) {
        let month = match self {
            Self::FirstQuarter => return quarter_months(1),
            Self::SecondQuarter => return quarter_months(2),
            Self::ThirdQuarter => return quarter_months(3),
            Self::FourthQuarter => return quarter_months(4),
            Self::January => 1,
            Self::February => 2,
            Self::March => 3,
            Self::April => 4,
            Self::May => 5,
            Self::June => 6,
            Self::July => 7,
            Self::August => 8,
            Self::September => 9,
            Self::October => 10,
            Self::November => 11,
            Self::December => 12,
        };
        (month, month)
    }
}

fn quarter_months(quarter: u32) -> (u32, u32) {
    let start = (quarter - 1) * 3 + 1;
    (start, start + 2)
}

impl std::fmt::Display for PeriodCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Declaration type (tipo de declaración).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationType {
    /// C: Application for compensation.
    Compensation,
    /// D: Return (devolución).
    Return,
    /// G: Current account tax, revenue.
    CurrentAccountRevenue,
    /// I: Income (ingreso).
    Income,
    /// N: No activity / zero result.
    NoActivity,
    /// V: Current account tax, returns.
    CurrentAccountReturn,
    /// U: Direct debit of the income in account.
    DirectDebit,
}

impl DeclarationType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Compensation => "C",
            Self::Return => "D",
            Self::CurrentAccountRevenue => "G",
            Self::Income => "I",
            Self::NoActivity => "N",
            Self::CurrentAccountReturn => "V",
            Self::DirectDebit => "U",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(Self::Compensation),
            "D" => Some(Self::Return),
            "G" => Some(Self::CurrentAccountRevenue),
            "I" => Some(Self::Income),
            "N" => Some(Self::NoActivity),
            "V" => Some(Self::CurrentAccountReturn),
            "U" => Some(Self::DirectDebit),
            _ => None,
        }
    }
}

/// Tax regime the declarant is subject to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegimeType {
    /// 1: Exclusively simplified regime.
    Simplified,
    /// 2: Both simplified and general regime.
    Mixed,
    /// 3: Exclusively general regime.
    General,
}

impl RegimeType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Simplified => "1",
            Self::Mixed => "2",
            Self::General => "3",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Simplified),
            "2" => Some(Self::Mixed),
            "3" => Some(Self::General),
            _ => None,
        }
    }
}

/// Three-way answer used by several form questions: "0" (not answered /
/// January only), "1" (yes) and "2" (no).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormAnswer {
    Unanswered,
    Yes,
    No,
}

impl FormAnswer {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unanswered => "0",
            Self::Yes => "1",
            Self::No => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::Unanswered),
            "1" => Some(Self::Yes),
            "2" => Some(Self::No),
            _ => None,
        }
    }
}

/// Auto-bankruptcy declaration selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoBankruptcy {
    /// Blank: no bankruptcy proceeding.
    No,
    /// 1: Declared before the bankruptcy proceeding.
    BeforeProceeding,
    /// 2: Declared after the bankruptcy proceeding.
    AfterProceeding,
}

impl AutoBankruptcy {
    pub fn code(&self) -> &'static str {
        match self {
            Self::No => " ",
            Self::BeforeProceeding => "1",
            Self::AfterProceeding => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            " " | "" => Some(Self::No),
            "1" => Some(Self::BeforeProceeding),
            "2" => Some(Self::AfterProceeding),
            _ => None,
        }
    }

    /// Whether a bankruptcy proceeding is declared at all.
    pub fn is_declared(&self) -> bool {
        *self != Self::No
    }
}

/// Kind of a bank account number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountNumberKind {
    Iban,
    Other,
}

/// One identifier of a bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNumber {
    pub kind: AccountNumberKind,
    /// Number as entered (may contain spaces).
    pub number: String,
}

impl AccountNumber {
    pub fn iban(number: impl Into<String>) -> Self {
        Self {
            kind: AccountNumberKind::Iban,
            number: number.into(),
        }
    }

    pub fn other(number: impl Into<String>) -> Self {
        Self {
            kind: AccountNumberKind::Other,
            number: number.into(),
        }
    }

    /// Number without whitespace, uppercased.
    pub fn compact(&self) -> String {
        self.number
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Bank account attached to the return for refunds or direct debit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BankAccount {
    pub numbers: Vec<AccountNumber>,
    /// BIC/SWIFT of the linked bank, if any.
    pub bic: Option<String>,
}

impl BankAccount {
    /// First IBAN-type number of the account.
    pub fn iban(&self) -> Option<&AccountNumber> {
        self.numbers
            .iter()
            .find(|n| n.kind == AccountNumberKind::Iban)
    }
}

/// Declarant company data the return is prefilled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    /// VAT code, with or without the "ES" prefix.
    pub vat_code: Option<String>,
    /// Accounting currency (ISO 4217).
    pub currency: String,
}

impl Company {
    /// Company name as declared: uppercased.
    pub fn declared_name(&self) -> String {
        self.name.to_uppercase()
    }

    /// NIF as declared: VAT code without the Spanish country prefix.
    pub fn declared_vat(&self) -> Option<String> {
        self.vat_code.as_ref().map(|vat| {
            vat.strip_prefix("ES").unwrap_or(vat).to_string()
        })
    }
}
