//! # Plan Calculation Engine
//!
//! 成本模型、產能約束建構與負荷 / 可行性評估

pub mod constraints;
pub mod cost;
pub mod evaluator;

use std::fmt;

use plan_core::{PerVariant, PlanError};
use rust_decimal::Decimal;

// Re-export 主要類型
pub use constraints::{CapacityConstraint, ConstraintBuilder, ConstraintSet};
pub use cost::{CostModel, ProfitBreakdown, UnitCosts};
pub use evaluator::{LoadEvaluator, PlanEvaluation, PlanStatus};

/// 溢位檢查的內積：Σ a[v] × b[v]
pub(crate) fn checked_dot(
    a: &PerVariant<Decimal>,
    b: &PerVariant<Decimal>,
) -> plan_core::Result<Decimal> {
    a.checked_dot(b).ok_or_else(|| overflow("內積"))
}

/// 數值溢位錯誤
pub(crate) fn overflow(context: impl fmt::Display) -> PlanError {
    PlanError::CalculationError(format!("{} 數值溢位", context))
}
