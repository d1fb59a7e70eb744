//! 負荷與可行性評估

use std::fmt;

use plan_core::{Dataset, ProductionPlan, ResourceLoad, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ConstraintBuilder, ConstraintSet, CostModel, ProfitBreakdown, UnitCosts};

/// 計劃狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    /// 所有資源負荷率 ≤ 1
    Feasible,
    /// 至少一個資源超載
    Infeasible,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feasible => f.write_str("Feasible"),
            Self::Infeasible => f.write_str("Infeasible"),
        }
    }
}

/// 計劃評估結果
///
/// 每次評估重新計算，不保留任何狀態。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEvaluation {
    /// 被評估的計劃
    pub plan: ProductionPlan,

    /// 部門負荷（依資料集順序）
    pub department_loads: Vec<ResourceLoad>,

    /// 物料負荷（依資料集順序）
    pub part_loads: Vec<ResourceLoad>,

    /// 是否可行
    pub feasible: bool,

    /// 利潤貢獻（僅可行計劃）
    #[serde(with = "rust_decimal::serde::float_option")]
    pub profit_contribution: Option<Decimal>,

    /// 利潤明細（僅可行計劃）
    pub profit_breakdown: Option<ProfitBreakdown>,
}

impl PlanEvaluation {
    pub fn status(&self) -> PlanStatus {
        if self.feasible {
            PlanStatus::Feasible
        } else {
            PlanStatus::Infeasible
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// 所有資源負荷（部門在前）
    pub fn loads(&self) -> impl Iterator<Item = &ResourceLoad> {
        self.department_loads.iter().chain(self.part_loads.iter())
    }

    /// 超載的資源
    pub fn overloaded(&self) -> Vec<&ResourceLoad> {
        self.loads().filter(|load| load.is_overloaded()).collect()
    }

    /// 最高負荷率的資源（瓶頸）
    pub fn bottleneck(&self) -> Option<&ResourceLoad> {
        self.loads().max_by(|a, b| a.load_fraction.cmp(&b.load_fraction))
    }
}

/// 負荷與可行性評估器
pub struct LoadEvaluator;

impl LoadEvaluator {
    /// 評估任意生產計劃（最佳解或使用者指定）
    pub fn evaluate(dataset: &Dataset, plan: &ProductionPlan) -> Result<PlanEvaluation> {
        plan.validate()?;
        dataset.validate()?;

        let constraints = ConstraintBuilder::build(dataset)?;
        let costs = CostModel::calculate(dataset)?;

        Self::evaluate_with(&constraints, &costs, plan)
    }

    /// 以預先建構的約束與成本評估計劃
    pub fn evaluate_with(
        constraints: &ConstraintSet,
        costs: &UnitCosts,
        plan: &ProductionPlan,
    ) -> Result<PlanEvaluation> {
        plan.validate()?;

        let department_loads = constraints
            .departments
            .iter()
            .map(|c| c.evaluate(plan))
            .collect::<Result<Vec<_>>>()?;
        let part_loads = constraints
            .parts
            .iter()
            .map(|c| c.evaluate(plan))
            .collect::<Result<Vec<_>>>()?;

        let feasible = department_loads
            .iter()
            .chain(part_loads.iter())
            .all(|load| !load.is_overloaded());

        let profit_breakdown = if feasible {
            Some(CostModel::profit_breakdown(costs, plan)?)
        } else {
            None
        };

        let evaluation = PlanEvaluation {
            plan: *plan,
            department_loads,
            part_loads,
            feasible,
            profit_contribution: profit_breakdown.map(|p| p.contribution),
            profit_breakdown,
        };

        if feasible {
            tracing::debug!(
                "計劃 economy={}, deluxe={} 可行，利潤貢獻 {:?}",
                plan.quantities.economy,
                plan.quantities.deluxe,
                evaluation.profit_contribution
            );
        } else {
            let overloaded: Vec<&str> = evaluation
                .overloaded()
                .iter()
                .map(|load| load.resource_id.as_str())
                .collect();
            tracing::warn!(
                "計劃 economy={}, deluxe={} 不可行，超載資源: {:?}",
                plan.quantities.economy,
                plan.quantities.deluxe,
                overloaded
            );
        }

        Ok(evaluation)
    }
}
