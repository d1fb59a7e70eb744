//! # Plan Optimizer
//!
//! 線性規劃求解與生產計劃建議

pub mod lp;
pub mod planner;

use plan_calc::{PlanEvaluation, UnitCosts};
use plan_core::{ProductionPlan, RecommendedPlan};
use serde::Serialize;

// Re-export 主要類型
pub use lp::{LinearConstraint, LinearProgram, LpSolution, LpSolver, MicroLpSolver};
pub use planner::Planner;

/// 優化結果
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    /// 單位成本與利潤
    pub unit_costs: UnitCosts,

    /// 連續鬆弛最佳解（已正規化精度）
    pub continuous: ProductionPlan,

    /// 連續最佳目標值
    pub objective_value: f64,

    /// 建議計劃（連續解向下取整）
    pub plan: RecommendedPlan,

    /// 建議計劃的負荷與可行性評估
    pub evaluation: PlanEvaluation,
}

impl Recommendation {
    /// 建議計劃是否可行
    pub fn is_feasible(&self) -> bool {
        self.evaluation.is_feasible()
    }
}
