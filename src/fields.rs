//! Standard financial field catalog and column-name auto-mapping.
//!
//! The catalog is a fixed, process-wide table: every standard field carries a
//! display label, a statement category, the value kind a mapped column is
//! expected to hold, and a list of normalized header aliases seen in the
//! wild. `suggest_field` reconciles arbitrary header text against that table.
//!
//! Matching precedence, first hit wins:
//! 1. exact equality between the normalized header and an alias,
//! 2. the normalized header contains an alias as a substring, scanned in
//!    catalog order (catalog order is the deterministic tie-break, which also
//!    means a header like `net_income_tax` resolves to the tax field before
//!    the net-income field, a documented limitation),
//! 3. a small keyword table for a handful of high-value fields.

use std::fmt;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::infer::CellType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    IncomeStatement,
    BalanceSheet,
    CashFlow,
    Dimensions,
}

impl FieldCategory {
    pub const ALL: [FieldCategory; 4] = [
        FieldCategory::IncomeStatement,
        FieldCategory::BalanceSheet,
        FieldCategory::CashFlow,
        FieldCategory::Dimensions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::IncomeStatement => "income_statement",
            FieldCategory::BalanceSheet => "balance_sheet",
            FieldCategory::CashFlow => "cash_flow",
            FieldCategory::Dimensions => "dimensions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldCategory::IncomeStatement => "Income Statement",
            FieldCategory::BalanceSheet => "Balance Sheet",
            FieldCategory::CashFlow => "Cash Flow",
            FieldCategory::Dimensions => "Dimensions",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldCategory {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_name(value).as_str() {
            "income_statement" | "income" | "is" => Ok(FieldCategory::IncomeStatement),
            "balance_sheet" | "balance" | "bs" => Ok(FieldCategory::BalanceSheet),
            "cash_flow" | "cashflow" | "cf" => Ok(FieldCategory::CashFlow),
            "dimensions" | "dimension" | "dims" => Ok(FieldCategory::Dimensions),
            other => Err(anyhow!(
                "unknown field category '{other}' (expected income_statement, balance_sheet, cash_flow, or dimensions)"
            )),
        }
    }
}

/// Identifier of one entry in the standard field catalog. Variant order
/// matches catalog order; `def` relies on that.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StandardField {
    Revenue,
    Cogs,
    GrossProfit,
    OperatingExpenses,
    Ebitda,
    DepreciationAmortization,
    OperatingIncome,
    InterestExpense,
    TaxExpense,
    NetIncome,
    Cash,
    AccountsReceivable,
    Inventory,
    CurrentAssets,
    FixedAssets,
    TotalAssets,
    AccountsPayable,
    CurrentLiabilities,
    LongTermDebt,
    TotalLiabilities,
    Equity,
    RetainedEarnings,
    OperatingCashFlow,
    InvestingCashFlow,
    FinancingCashFlow,
    Capex,
    FreeCashFlow,
    Date,
    Entity,
    Segment,
    Currency,
}

impl StandardField {
    pub fn def(&self) -> &'static FieldDef {
        &FIELD_DEFS[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StandardField::Revenue => "revenue",
            StandardField::Cogs => "cogs",
            StandardField::GrossProfit => "gross_profit",
            StandardField::OperatingExpenses => "operating_expenses",
            StandardField::Ebitda => "ebitda",
            StandardField::DepreciationAmortization => "depreciation_amortization",
            StandardField::OperatingIncome => "operating_income",
            StandardField::InterestExpense => "interest_expense",
            StandardField::TaxExpense => "tax_expense",
            StandardField::NetIncome => "net_income",
            StandardField::Cash => "cash",
            StandardField::AccountsReceivable => "accounts_receivable",
            StandardField::Inventory => "inventory",
            StandardField::CurrentAssets => "current_assets",
            StandardField::FixedAssets => "fixed_assets",
            StandardField::TotalAssets => "total_assets",
            StandardField::AccountsPayable => "accounts_payable",
            StandardField::CurrentLiabilities => "current_liabilities",
            StandardField::LongTermDebt => "long_term_debt",
            StandardField::TotalLiabilities => "total_liabilities",
            StandardField::Equity => "equity",
            StandardField::RetainedEarnings => "retained_earnings",
            StandardField::OperatingCashFlow => "operating_cash_flow",
            StandardField::InvestingCashFlow => "investing_cash_flow",
            StandardField::FinancingCashFlow => "financing_cash_flow",
            StandardField::Capex => "capex",
            StandardField::FreeCashFlow => "free_cash_flow",
            StandardField::Date => "date",
            StandardField::Entity => "entity",
            StandardField::Segment => "segment",
            StandardField::Currency => "currency",
        }
    }

    pub fn label(&self) -> &'static str {
        self.def().label
    }

    pub fn category(&self) -> FieldCategory {
        self.def().category
    }

    pub fn value_kind(&self) -> CellType {
        self.def().value_kind
    }
}

impl fmt::Display for StandardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StandardField {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_name(value);
        FIELD_DEFS
            .iter()
            .find(|def| def.field.as_str() == normalized)
            .map(|def| def.field)
            .ok_or_else(|| anyhow!("unknown standard field '{normalized}'"))
    }
}

/// One catalog entry. Aliases are stored pre-normalized.
#[derive(Debug)]
pub struct FieldDef {
    pub field: StandardField,
    pub label: &'static str,
    pub category: FieldCategory,
    pub value_kind: CellType,
    pub aliases: &'static [&'static str],
}

/// The catalog, in definition order. Substring matching scans this order.
static FIELD_DEFS: [FieldDef; 31] = [
    FieldDef {
        field: StandardField::Revenue,
        label: "Revenue",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &[
            "revenue",
            "revenues",
            "sales",
            "sales_usd",
            "total_revenue",
            "net_revenue",
            "net_sales",
            "total_sales",
            "gross_sales",
            "turnover",
        ],
    },
    FieldDef {
        field: StandardField::Cogs,
        label: "Cost of Goods Sold",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &[
            "cogs",
            "cost_of_goods_sold",
            "cost_of_sales",
            "cost_of_revenue",
            "direct_costs",
        ],
    },
    FieldDef {
        field: StandardField::GrossProfit,
        label: "Gross Profit",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &["gross_profit", "gross_margin", "gross_income"],
    },
    FieldDef {
        field: StandardField::OperatingExpenses,
        label: "Operating Expenses",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &[
            "operating_expenses",
            "opex",
            "operating_costs",
            "total_operating_expenses",
            "sg_a",
            "selling_general_administrative",
        ],
    },
    FieldDef {
        field: StandardField::Ebitda,
        label: "EBITDA",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &["ebitda", "adjusted_ebitda"],
    },
    FieldDef {
        field: StandardField::DepreciationAmortization,
        label: "Depreciation & Amortization",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &[
            "depreciation_amortization",
            "depreciation_and_amortization",
            "depreciation",
            "amortization",
        ],
    },
    FieldDef {
        field: StandardField::OperatingIncome,
        label: "Operating Income",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &[
            "operating_income",
            "operating_profit",
            "ebit",
            "income_from_operations",
        ],
    },
    FieldDef {
        field: StandardField::InterestExpense,
        label: "Interest Expense",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &[
            "interest_expense",
            "interest_paid",
            "interest_cost",
            "finance_costs",
        ],
    },
    FieldDef {
        field: StandardField::TaxExpense,
        label: "Tax Expense",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &[
            "tax_expense",
            "income_tax",
            "income_tax_expense",
            "taxes",
            "provision_for_income_taxes",
        ],
    },
    FieldDef {
        field: StandardField::NetIncome,
        label: "Net Income",
        category: FieldCategory::IncomeStatement,
        value_kind: CellType::Numeric,
        aliases: &[
            "net_income",
            "net_profit",
            "net_earnings",
            "net_profit_loss",
            "net_income_loss",
            "profit_after_tax",
        ],
    },
    FieldDef {
        field: StandardField::Cash,
        label: "Cash & Equivalents",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &[
            "cash",
            "cash_and_equivalents",
            "cash_and_cash_equivalents",
            "cash_on_hand",
        ],
    },
    FieldDef {
        field: StandardField::AccountsReceivable,
        label: "Accounts Receivable",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &[
            "accounts_receivable",
            "receivables",
            "trade_receivables",
            "debtors",
        ],
    },
    FieldDef {
        field: StandardField::Inventory,
        label: "Inventory",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &["inventory", "inventories", "stock_on_hand"],
    },
    FieldDef {
        field: StandardField::CurrentAssets,
        label: "Current Assets",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &["current_assets", "total_current_assets"],
    },
    FieldDef {
        field: StandardField::FixedAssets,
        label: "Fixed Assets",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &[
            "fixed_assets",
            "net_fixed_assets",
            "property_plant_equipment",
            "ppe",
        ],
    },
    FieldDef {
        field: StandardField::TotalAssets,
        label: "Total Assets",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &["total_assets", "assets_total"],
    },
    FieldDef {
        field: StandardField::AccountsPayable,
        label: "Accounts Payable",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &["accounts_payable", "payables", "trade_payables", "creditors"],
    },
    FieldDef {
        field: StandardField::CurrentLiabilities,
        label: "Current Liabilities",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &["current_liabilities", "total_current_liabilities"],
    },
    FieldDef {
        field: StandardField::LongTermDebt,
        label: "Long-Term Debt",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &[
            "long_term_debt",
            "lt_debt",
            "long_term_borrowings",
            "non_current_debt",
        ],
    },
    FieldDef {
        field: StandardField::TotalLiabilities,
        label: "Total Liabilities",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &["total_liabilities", "liabilities_total"],
    },
    FieldDef {
        field: StandardField::Equity,
        label: "Shareholders' Equity",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &[
            "equity",
            "shareholders_equity",
            "stockholders_equity",
            "total_equity",
            "owners_equity",
            "net_worth",
        ],
    },
    FieldDef {
        field: StandardField::RetainedEarnings,
        label: "Retained Earnings",
        category: FieldCategory::BalanceSheet,
        value_kind: CellType::Numeric,
        aliases: &[
            "retained_earnings",
            "accumulated_earnings",
            "accumulated_deficit",
        ],
    },
    FieldDef {
        field: StandardField::OperatingCashFlow,
        label: "Operating Cash Flow",
        category: FieldCategory::CashFlow,
        value_kind: CellType::Numeric,
        aliases: &[
            "operating_cash_flow",
            "cash_from_operations",
            "cash_flow_from_operations",
            "net_cash_from_operating_activities",
        ],
    },
    FieldDef {
        field: StandardField::InvestingCashFlow,
        label: "Investing Cash Flow",
        category: FieldCategory::CashFlow,
        value_kind: CellType::Numeric,
        aliases: &[
            "investing_cash_flow",
            "cash_from_investing",
            "cash_flow_from_investing",
            "net_cash_used_in_investing_activities",
        ],
    },
    FieldDef {
        field: StandardField::FinancingCashFlow,
        label: "Financing Cash Flow",
        category: FieldCategory::CashFlow,
        value_kind: CellType::Numeric,
        aliases: &[
            "financing_cash_flow",
            "cash_from_financing",
            "cash_flow_from_financing",
            "net_cash_from_financing_activities",
        ],
    },
    FieldDef {
        field: StandardField::Capex,
        label: "Capital Expenditure",
        category: FieldCategory::CashFlow,
        value_kind: CellType::Numeric,
        aliases: &[
            "capex",
            "capital_expenditure",
            "capital_expenditures",
            "purchases_of_property_and_equipment",
        ],
    },
    FieldDef {
        field: StandardField::FreeCashFlow,
        label: "Free Cash Flow",
        category: FieldCategory::CashFlow,
        value_kind: CellType::Numeric,
        aliases: &["free_cash_flow", "fcf"],
    },
    FieldDef {
        field: StandardField::Date,
        label: "Date / Period",
        category: FieldCategory::Dimensions,
        value_kind: CellType::Date,
        aliases: &[
            "date",
            "period",
            "fiscal_period",
            "reporting_date",
            "period_end",
            "as_of_date",
            "transaction_date",
        ],
    },
    FieldDef {
        field: StandardField::Entity,
        label: "Entity",
        category: FieldCategory::Dimensions,
        value_kind: CellType::Text,
        aliases: &[
            "entity",
            "entity_name",
            "company",
            "company_name",
            "business_unit",
            "subsidiary",
        ],
    },
    FieldDef {
        field: StandardField::Segment,
        label: "Segment",
        category: FieldCategory::Dimensions,
        value_kind: CellType::Text,
        aliases: &[
            "segment",
            "division",
            "department",
            "product_line",
            "region",
        ],
    },
    FieldDef {
        field: StandardField::Currency,
        label: "Currency",
        category: FieldCategory::Dimensions,
        value_kind: CellType::Text,
        aliases: &["currency", "currency_code", "iso_currency"],
    },
];

/// Hand-picked fuzzy keywords for high-value fields, consulted only when no
/// alias matched. Scanned in order, first hit wins.
static KEYWORD_FALLBACKS: &[(StandardField, &[&str])] = &[
    (StandardField::NetIncome, &["net_income", "net_profit", "bottom_line", "profit"]),
    (StandardField::Revenue, &["revenue", "sales", "turnover"]),
    (StandardField::Cogs, &["cogs", "cost_of"]),
    (StandardField::TotalAssets, &["total_asset"]),
    (StandardField::TotalLiabilities, &["total_liabilit"]),
    (StandardField::Equity, &["equity"]),
    (StandardField::Date, &["date", "period", "month", "quarter", "year"]),
];

/// Read-only view of the catalog in definition order.
pub fn registry() -> &'static [FieldDef] {
    &FIELD_DEFS
}

/// Catalog entries grouped by category, for UI pickers and the field listing
/// command. Category order is fixed; entries keep catalog order.
pub fn fields_by_category() -> Vec<(FieldCategory, Vec<&'static FieldDef>)> {
    FieldCategory::ALL
        .iter()
        .map(|category| {
            let defs = FIELD_DEFS
                .iter()
                .filter(|def| def.category == *category)
                .collect();
            (*category, defs)
        })
        .collect()
}

/// Serializable catalog view for JSON output and UI field pickers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldListing {
    pub id: &'static str,
    pub label: &'static str,
    pub category: FieldCategory,
    pub value_kind: CellType,
    pub aliases: &'static [&'static str],
}

pub fn catalog_listing(category: Option<FieldCategory>) -> Vec<FieldListing> {
    FIELD_DEFS
        .iter()
        .filter(|def| category.is_none_or(|c| def.category == c))
        .map(|def| FieldListing {
            id: def.field.as_str(),
            label: def.label,
            category: def.category,
            value_kind: def.value_kind,
            aliases: def.aliases,
        })
        .collect()
}

/// Canonical form of a raw header: lower-cased, every run of
/// non-alphanumeric characters collapsed to one `_`, no leading or trailing
/// separator. Idempotent.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Identifier-safe column name for display and persistence. Names starting
/// with a digit get a `col_` prefix; a header that normalizes to nothing
/// falls back to its position. Uniqueness across a dataset is not enforced.
pub fn sanitize_column_name(raw: &str, index: usize) -> String {
    let normalized = normalize_name(raw);
    match normalized.chars().next() {
        None => format!("col_{index}"),
        Some(first) if first.is_ascii_digit() => format!("col_{normalized}"),
        Some(_) => normalized,
    }
}

/// Proposes a standard field for a raw header, or `None` when nothing in the
/// catalog or keyword table applies.
pub fn suggest_field(raw_column_name: &str) -> Option<StandardField> {
    let normalized = normalize_name(raw_column_name);
    if normalized.is_empty() {
        return None;
    }
    for def in &FIELD_DEFS {
        if def.aliases.contains(&normalized.as_str()) {
            return Some(def.field);
        }
    }
    for def in &FIELD_DEFS {
        if def.aliases.iter().any(|alias| normalized.contains(alias)) {
            return Some(def.field);
        }
    }
    for (field, keywords) in KEYWORD_FALLBACKS {
        if keywords.iter().any(|keyword| normalized.contains(keyword)) {
            return Some(*field);
        }
    }
    None
}
