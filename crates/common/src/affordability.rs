//! Purchase and rental budgets, and investment yields.
//!
//! Budgets follow the 30 % gross income rule. The purchase budget is the
//! present value of a mortgage whose monthly instalment is that 30 %, grossed
//! up by the down payment.

use crate::types::SummaryRow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Share of gross monthly income available for housing.
pub const INCOME_SHARE: f64 = 0.30;
/// Average Kenyan mortgage rate, compounded monthly.
pub const ANNUAL_MORTGAGE_RATE: f64 = 0.13;
/// Neighbourhoods priced up to this multiple of the budget count as a stretch.
pub const STRETCH_FACTOR: f64 = 1.2;

pub const DEFAULT_DOWN_PCT: f64 = 20.0;
pub const DEFAULT_TENURE_YEARS: f64 = 20.0;
pub const DEFAULT_BEDROOMS: f64 = 2.0;
pub const DEFAULT_VACANCY_PCT: f64 = 5.0;
pub const DEFAULT_OPERATING_PCT: f64 = 15.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AffordabilityError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("down payment must be below 100%, got {0}")]
    DownPaymentTooLarge(f64),
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, AffordabilityError> {
    if !value.is_finite() {
        return Err(AffordabilityError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(AffordabilityError::Negative { field, value });
    }
    Ok(value)
}

fn percent(field: &'static str, value: f64) -> Result<f64, AffordabilityError> {
    let value = non_negative(field, value)?;
    if value > 100.0 {
        return Err(AffordabilityError::PercentOutOfRange { field, value });
    }
    Ok(value)
}

pub fn max_rent(monthly_income: f64) -> f64 {
    monthly_income * INCOME_SHARE
}

pub fn max_purchase(monthly_income: f64, down_pct: f64, tenure_years: f64) -> f64 {
    let rate = ANNUAL_MORTGAGE_RATE / 12.0;
    let n = tenure_years * 12.0;
    let instalment = monthly_income * INCOME_SHARE;
    let loan = instalment * ((1.0 - (1.0 + rate).powf(-n)) / rate);
    loan / (1.0 - down_pct / 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BudgetMode {
    Rent,
    Buy {
        down_pct: f64,
        tenure_years: f64,
        bedrooms: f64,
    },
}

impl BudgetMode {
    pub fn buy_default() -> Self {
        BudgetMode::Buy {
            down_pct: DEFAULT_DOWN_PCT,
            tenure_years: DEFAULT_TENURE_YEARS,
            bedrooms: DEFAULT_BEDROOMS,
        }
    }

    fn validate(&self) -> Result<(), AffordabilityError> {
        if let BudgetMode::Buy {
            down_pct,
            tenure_years,
            bedrooms,
        } = *self
        {
            if percent("down_pct", down_pct)? >= 100.0 {
                return Err(AffordabilityError::DownPaymentTooLarge(down_pct));
            }
            non_negative("tenure_years", tenure_years)?;
            non_negative("bedrooms", bedrooms)?;
        }
        Ok(())
    }

    pub fn budget(&self, monthly_income: f64) -> f64 {
        match *self {
            BudgetMode::Rent => max_rent(monthly_income),
            BudgetMode::Buy {
                down_pct,
                tenure_years,
                ..
            } => max_purchase(monthly_income, down_pct, tenure_years),
        }
    }

    /// Price a neighbourhood is judged by; unknown figures count as zero.
    pub fn price_of(&self, row: &SummaryRow) -> f64 {
        match *self {
            BudgetMode::Rent => row.median_price.unwrap_or(0.0),
            BudgetMode::Buy { bedrooms, .. } => row.avg_price_per_bedroom.unwrap_or(0.0) * bedrooms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityReport {
    pub budget: f64,
    pub monthly_payment: f64,
    pub affordable: Vec<SummaryRow>,
    pub stretch: Vec<SummaryRow>,
    /// Affordable neighbourhoods as a share of all, in whole percent.
    pub budget_ratio_pct: u32,
}

pub fn assess(
    mode: &BudgetMode,
    monthly_income: f64,
    rows: &[SummaryRow],
) -> Result<AffordabilityReport, AffordabilityError> {
    let monthly_income = non_negative("income", monthly_income)?;
    mode.validate()?;

    let budget = mode.budget(monthly_income);
    let mut affordable = Vec::new();
    let mut stretch = Vec::new();
    for row in rows {
        let price = mode.price_of(row);
        if price <= budget {
            affordable.push(row.clone());
        } else if price <= budget * STRETCH_FACTOR {
            stretch.push(row.clone());
        }
    }

    let budget_ratio_pct = if rows.is_empty() {
        0
    } else {
        (affordable.len() as f64 / rows.len() as f64 * 100.0).round() as u32
    };

    Ok(AffordabilityReport {
        budget,
        monthly_payment: monthly_income * INCOME_SHARE,
        affordable,
        stretch,
        budget_ratio_pct,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInputs {
    pub purchase_price: f64,
    pub monthly_rent: f64,
    pub vacancy_pct: f64,
    pub operating_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentReport {
    pub annual_gross_rent: f64,
    pub gross_yield_pct: f64,
    pub effective_gross_income: f64,
    pub net_operating_income: f64,
    pub cap_rate_pct: f64,
}

impl InvestmentInputs {
    pub fn new(purchase_price: f64, monthly_rent: f64) -> Self {
        Self {
            purchase_price,
            monthly_rent,
            vacancy_pct: DEFAULT_VACANCY_PCT,
            operating_pct: DEFAULT_OPERATING_PCT,
        }
    }

    pub fn evaluate(&self) -> Result<InvestmentReport, AffordabilityError> {
        let price = non_negative("purchase_price", self.purchase_price)?;
        let rent = non_negative("monthly_rent", self.monthly_rent)?;
        let vacancy = percent("vacancy_pct", self.vacancy_pct)?;
        let operating = percent("operating_pct", self.operating_pct)?;

        let annual_gross_rent = rent * 12.0;
        let effective_gross_income = annual_gross_rent * (1.0 - vacancy / 100.0);
        let net_operating_income = effective_gross_income * (1.0 - operating / 100.0);
        let yield_of = |income: f64| {
            if price > 0.0 {
                income / price * 100.0
            } else {
                0.0
            }
        };

        Ok(InvestmentReport {
            annual_gross_rent,
            gross_yield_pct: yield_of(annual_gross_rent),
            effective_gross_income,
            net_operating_income,
            cap_rate_pct: yield_of(net_operating_income),
        })
    }
}
