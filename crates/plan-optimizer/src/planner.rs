//! 生產規劃器：成本模型 → 約束建構 → 線性規劃 → 取整與評估

use plan_calc::{ConstraintBuilder, ConstraintSet, CostModel, LoadEvaluator, PlanEvaluation};
use plan_core::{
    Dataset, PerVariant, PlanError, PlannerConfig, ProductVariant, ProductionPlan,
    RecommendedPlan, Result,
};
use rayon::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::lp::{LinearProgram, LpSolver, MicroLpSolver};
use crate::Recommendation;

/// 取整後為恢復可行最多減產的次數
const MAX_FLOOR_ADJUSTMENTS: u32 = 1_000;

/// 生產規劃器
///
/// 不持有資料集；每次呼叫傳入唯讀快照，可在多執行緒間共用。
pub struct Planner<S = MicroLpSolver> {
    solver: S,
    config: PlannerConfig,
}

impl Planner<MicroLpSolver> {
    /// 使用預設求解器創建規劃器
    pub fn new(config: PlannerConfig) -> Self {
        Self::with_solver(MicroLpSolver, config)
    }
}

impl Default for Planner<MicroLpSolver> {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl<S: LpSolver> Planner<S> {
    /// 使用指定求解器創建規劃器
    pub fn with_solver(solver: S, config: PlannerConfig) -> Self {
        Self { solver, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 求解最大利潤的生產計劃
    ///
    /// 連續最佳解先正規化到 `solution_precision` 位小數，再向下取整為建議計劃。
    /// 正規化可能把略低於整數的解進位；取整後若有資源超載，逐單位減產直到可行，
    /// 因此建議計劃永遠不超過連續解。
    /// 不在整數上重新優化，真正的整數最佳解可能略有不同。
    pub fn recommend(&self, dataset: &Dataset) -> Result<Recommendation> {
        tracing::info!(
            "開始求解生產計劃：物料 {} 筆，BOM {} 筆，部門 {} 個",
            dataset.parts.len(),
            dataset.bom.len(),
            dataset.departments.len()
        );
        let start_time = std::time::Instant::now();

        self.config.validate()?;
        dataset.validate()?;

        // Step 1: 成本模型
        tracing::debug!("Step 1: 計算單位成本");
        let unit_costs = CostModel::calculate(dataset)?;

        // Step 2: 產能約束
        tracing::debug!("Step 2: 建構產能約束");
        let constraints = ConstraintBuilder::build(dataset)?;

        // Step 3: 線性規劃
        tracing::debug!("Step 3: 求解線性規劃（{} 條約束）", constraints.len());
        let program = LinearProgram::from_model(&unit_costs.profit, &constraints)?;
        let solution = self.solver.solve(&program)?;
        if self.config.verify_solution {
            program.check(&solution.quantities, self.config.solver_tolerance)?;
        }
        tracing::debug!(
            "連續最佳解: economy={}, deluxe={}, 目標值={}",
            solution.quantities.economy,
            solution.quantities.deluxe,
            solution.objective_value
        );

        // Step 4: 正規化並向下取整
        tracing::debug!("Step 4: 取整與評估");
        let continuous = ProductionPlan {
            quantities: self.normalize(&solution.quantities)?,
        };
        let plan = Self::fit_to_capacity(&constraints, continuous.floor()?)?;
        let evaluation = LoadEvaluator::evaluate_with(&constraints, &unit_costs, &plan.to_plan())?;

        tracing::info!(
            "求解完成，耗時 {:?}：建議 economy={}, deluxe={}，狀態 {}",
            start_time.elapsed(),
            plan.economy_units,
            plan.deluxe_units,
            evaluation.status()
        );

        Ok(Recommendation {
            unit_costs,
            continuous,
            objective_value: solution.objective_value,
            plan,
            evaluation,
        })
    }

    /// 評估使用者指定的計劃（what-if）
    pub fn evaluate(&self, dataset: &Dataset, plan: &ProductionPlan) -> Result<PlanEvaluation> {
        LoadEvaluator::evaluate(dataset, plan)
    }

    /// 並行評估多個計劃
    ///
    /// 約束與成本只建構一次；任一計劃出錯則整批返回錯誤。
    pub fn evaluate_many(
        &self,
        dataset: &Dataset,
        plans: &[ProductionPlan],
    ) -> Result<Vec<PlanEvaluation>> {
        dataset.validate()?;
        let constraints = ConstraintBuilder::build(dataset)?;
        let unit_costs = CostModel::calculate(dataset)?;

        tracing::debug!("並行評估 {} 個計劃", plans.len());

        plans
            .par_iter()
            .map(|plan| LoadEvaluator::evaluate_with(&constraints, &unit_costs, plan))
            .collect()
    }

    /// 減少超載資源上用量最大的型號，直到取整計劃可行
    fn fit_to_capacity(
        constraints: &ConstraintSet,
        mut plan: RecommendedPlan,
    ) -> Result<RecommendedPlan> {
        for _ in 0..MAX_FLOOR_ADJUSTMENTS {
            let candidate = plan.to_plan();
            let mut overloaded = None;
            for constraint in constraints.iter() {
                if constraint.evaluate(&candidate)?.is_overloaded() {
                    overloaded = Some(constraint);
                    break;
                }
            }
            let Some(constraint) = overloaded else {
                return Ok(plan);
            };

            let variant = ProductVariant::ALL
                .into_iter()
                .filter(|v| plan.units(*v) > 0 && !constraint.usage_per_unit.get(*v).is_zero())
                .max_by_key(|v| *constraint.usage_per_unit.get(*v))
                .ok_or_else(|| {
                    PlanError::Solver(format!("{} 超載且無法減產", constraint.resource_id))
                })?;

            tracing::debug!(
                "取整後 {} 超載，{} 減少一單位",
                constraint.resource_id,
                variant
            );
            *plan.units_mut(variant) -= 1;
        }

        Err(PlanError::Solver(format!(
            "取整後減產 {} 次仍超出產能",
            MAX_FLOOR_ADJUSTMENTS
        )))
    }

    fn normalize(&self, quantities: &PerVariant<f64>) -> Result<PerVariant<Decimal>> {
        let precision = self.config.solution_precision;
        quantities.try_map(|value| {
            Decimal::from_f64(value)
                .map(|d| d.round_dp(precision))
                .ok_or_else(|| PlanError::CalculationError(format!("求解器返回無效數值: {}", value)))
        })
    }
}
