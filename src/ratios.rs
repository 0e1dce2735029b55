use crate::dataset::FinancialDataset;
use crate::schema::{items, StatementKind, StatementRow};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const NOT_APPLICABLE: &str = "N/A";

/// Outcome of a single computed ratio.
///
/// `NotApplicable` means the denominator was zero or negative, or an
/// operand was missing. It is never folded into a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Value(f64),
    NotApplicable,
}

impl Ratio {
    /// `numerator / denominator`, defined only for a positive denominator.
    pub fn of(numerator: Option<f64>, denominator: Option<f64>) -> Self {
        match (numerator, denominator) {
            (Some(n), Some(d)) if d > 0.0 => Self::Value(n / d),
            _ => Self::NotApplicable,
        }
    }

    /// Same as [`Ratio::of`], expressed in percent.
    pub fn percent(numerator: Option<f64>, denominator: Option<f64>) -> Self {
        Self::of(numerator, denominator).map(|v| v * 100.0)
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Value(v) => Self::Value(f(v)),
            Self::NotApplicable => Self::NotApplicable,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotApplicable => None,
        }
    }

    pub fn is_applicable(self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn rounded(self, decimals: u32) -> Self {
        self.map(|v| round_to(v, decimals))
    }

    /// Fixed-point text, or `N/A`.
    pub fn display(self, decimals: usize) -> String {
        match self {
            Self::Value(v) => format!("{:.*}", decimals, v),
            Self::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub const RATIO_DECIMALS: u32 = 2;
pub const PERCENT_DECIMALS: u32 = 1;

/// Key metrics for one year.
///
/// Every field is `None` when either statement is missing: absence of
/// source data is not a computed zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioSet {
    pub revenue: Option<f64>,
    pub total_assets: Option<f64>,
    pub current_ratio: Option<Ratio>,
    #[serde(rename = "roa")]
    pub return_on_assets: Option<Ratio>,
    #[serde(rename = "roe")]
    pub return_on_equity: Option<Ratio>,
    pub profit_margin: Option<Ratio>,
    pub debt_to_equity: Option<Ratio>,
}

impl RatioSet {
    pub fn is_absent(&self) -> bool {
        *self == Self::default()
    }

    /// Display precision: two decimals for plain ratios, one for percentages.
    pub fn rounded(&self) -> Self {
        let ratio = |r: Option<Ratio>| r.map(|r| r.rounded(RATIO_DECIMALS));
        let percent = |r: Option<Ratio>| r.map(|r| r.rounded(PERCENT_DECIMALS));
        Self {
            revenue: self.revenue,
            total_assets: self.total_assets,
            current_ratio: ratio(self.current_ratio),
            return_on_assets: percent(self.return_on_assets),
            return_on_equity: percent(self.return_on_equity),
            profit_margin: percent(self.profit_margin),
            debt_to_equity: ratio(self.debt_to_equity),
        }
    }
}

pub fn compute_ratios(
    balance_sheet: Option<&StatementRow>,
    income_statement: Option<&StatementRow>,
) -> RatioSet {
    let (Some(bs), Some(is)) = (balance_sheet, income_statement) else {
        return RatioSet::default();
    };

    let revenue = is.number(&items::NET_TURNOVER);
    let net_income = is.number(&items::NET_INCOME);
    let total_assets = bs.number(&items::TOTAL_ASSETS);
    let current_assets = bs.number(&items::CURRENT_ASSETS);
    let current_liabilities = bs.number(&items::CURRENT_LIABILITIES);
    let equity = bs.number(&items::EQUITY);

    // Liabilities as a difference: missing total assets count as zero.
    let liabilities = equity.map(|e| total_assets.unwrap_or(0.0) - e);

    RatioSet {
        revenue,
        total_assets,
        current_ratio: Some(Ratio::of(current_assets, current_liabilities)),
        return_on_assets: Some(Ratio::percent(net_income, total_assets)),
        return_on_equity: Some(Ratio::percent(net_income, equity)),
        profit_margin: Some(Ratio::percent(net_income, revenue)),
        debt_to_equity: Some(Ratio::of(liabilities, equity)),
    }
}

/// Liquidity, leverage and efficiency ratios beyond the key metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ExtendedRatios {
    pub quick_ratio: Option<Ratio>,
    pub cash_ratio: Option<Ratio>,
    pub gross_profit_margin: Option<Ratio>,
    pub debt_to_assets: Option<Ratio>,
    pub equity_ratio: Option<Ratio>,
    pub asset_turnover: Option<Ratio>,
    pub inventory_turnover: Option<Ratio>,
    pub receivables_turnover: Option<Ratio>,
}

pub fn compute_extended_ratios(
    balance_sheet: Option<&StatementRow>,
    income_statement: Option<&StatementRow>,
) -> ExtendedRatios {
    let (Some(bs), Some(is)) = (balance_sheet, income_statement) else {
        return ExtendedRatios::default();
    };

    let revenue = is.number(&items::NET_TURNOVER);
    let gross_profit = is.number(&items::GROSS_PROFIT);
    let total_assets = bs.number(&items::TOTAL_ASSETS);
    let current_liabilities = bs.number(&items::CURRENT_LIABILITIES);
    let equity = bs.number(&items::EQUITY);

    let quick_assets = bs
        .number(&items::CURRENT_ASSETS)
        .map(|ca| ca - bs.number(&items::INVENTORIES).unwrap_or(0.0));
    let cash_and_securities = sum_or_zero(&[
        bs.number(&items::CASH),
        bs.number(&items::MARKETABLE_SECURITIES),
    ]);
    let total_liabilities = sum_or_zero(&[
        current_liabilities,
        bs.number(&items::NON_CURRENT_LIABILITIES),
    ]);

    ExtendedRatios {
        quick_ratio: Some(Ratio::of(quick_assets, current_liabilities)),
        cash_ratio: Some(Ratio::of(cash_and_securities, current_liabilities)),
        gross_profit_margin: Some(Ratio::percent(gross_profit, revenue)),
        debt_to_assets: Some(Ratio::percent(total_liabilities, total_assets)),
        equity_ratio: Some(Ratio::percent(equity, total_assets)),
        asset_turnover: Some(Ratio::of(revenue, total_assets)),
        inventory_turnover: Some(Ratio::of(
            is.number(&items::COST_OF_GOODS_SOLD),
            bs.number(&items::INVENTORIES),
        )),
        receivables_turnover: Some(Ratio::of(
            revenue,
            bs.number(&items::ACCOUNTS_RECEIVABLE),
        )),
    }
}

/// Sum with absent terms counted as zero.
fn sum_or_zero(terms: &[Option<f64>]) -> Option<f64> {
    Some(terms.iter().flatten().sum())
}

/// Key metrics of the most recent year, all absent for an empty dataset.
pub fn latest_ratios(dataset: &FinancialDataset) -> RatioSet {
    dataset
        .latest()
        .map(|latest| compute_ratios(latest.balance_sheet, latest.income_statement))
        .unwrap_or_default()
}

/// Key metrics for every year that has both a balance sheet and an income
/// statement.
pub fn ratios_by_year(dataset: &FinancialDataset) -> BTreeMap<i32, RatioSet> {
    dataset
        .years_with_data()
        .iter()
        .filter_map(|&year| {
            let bs = dataset.row_for(StatementKind::Balance, year)?;
            let is = dataset.row_for(StatementKind::Income, year)?;
            Some((year, compute_ratios(Some(bs), Some(is))))
        })
        .collect()
}

/// Year-over-year change between the two most recent comparable years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthRates {
    pub from_year: i32,
    pub to_year: i32,
    pub revenue_growth: Ratio,
    pub profit_growth: Ratio,
    pub assets_growth: Ratio,
}

pub fn growth_rates(dataset: &FinancialDataset) -> Option<GrowthRates> {
    let by_year = ratios_by_year(dataset);
    let mut recent = by_year.iter().rev();
    let (&to_year, _) = recent.next()?;
    let (&from_year, _) = recent.next()?;

    let income = |year| {
        dataset
            .row_for(StatementKind::Income, year)
            .and_then(|r| r.number(&items::NET_INCOME))
    };
    let revenue = |year| by_year.get(&year).and_then(|r| r.revenue);
    let assets = |year| by_year.get(&year).and_then(|r| r.total_assets);

    Some(GrowthRates {
        from_year,
        to_year,
        revenue_growth: change(revenue(from_year), revenue(to_year)),
        profit_growth: change(income(from_year), income(to_year)),
        assets_growth: change(assets(from_year), assets(to_year)),
    })
}

fn change(previous: Option<f64>, current: Option<f64>) -> Ratio {
    let delta = match (previous, current) {
        (Some(p), Some(c)) => Some(c - p),
        _ => None,
    };
    Ratio::percent(delta, previous)
}
