//! 線性規劃求解器介面

use good_lp::{
    constraint, microlp, variable, variables, Expression, ResolutionError, Solution, SolverModel,
};
use plan_calc::ConstraintSet;
use plan_core::{PerVariant, PlanError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// 線性約束：Σ 係數 × 數量 ≤ 右端值
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub coefficients: PerVariant<f64>,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, coefficients: PerVariant<f64>, rhs: f64) -> Self {
        Self {
            name: name.into(),
            coefficients,
            rhs,
        }
    }

    /// 左端值
    pub fn lhs(&self, quantities: &PerVariant<f64>) -> f64 {
        self.coefficients.economy * quantities.economy + self.coefficients.deluxe * quantities.deluxe
    }
}

/// 兩個非負連續變數的最大化線性規劃
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    /// 目標係數（單位利潤）
    pub objective: PerVariant<f64>,
    pub constraints: Vec<LinearConstraint>,
}

impl LinearProgram {
    pub fn new(objective: PerVariant<f64>) -> Self {
        Self {
            objective,
            constraints: Vec::new(),
        }
    }

    /// 建構器模式：添加約束
    pub fn with_constraint(mut self, constraint: LinearConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// 由單位利潤與產能約束組成線性規劃
    ///
    /// 部門約束以秒為單位：係數為單位工時，右端值為產能 × 3600。
    pub fn from_model(unit_profits: &PerVariant<Decimal>, constraints: &ConstraintSet) -> Result<Self> {
        let mut program = Self::new(unit_profits.try_map(to_f64)?);
        for c in constraints.iter() {
            program.constraints.push(LinearConstraint::new(
                format!("{}:{}", c.kind, c.key),
                c.usage_per_unit.try_map(to_f64)?,
                to_f64(c.usage_capacity()?)?,
            ));
        }
        Ok(program)
    }

    /// 目標值
    pub fn objective_value(&self, quantities: &PerVariant<f64>) -> f64 {
        self.objective.economy * quantities.economy + self.objective.deluxe * quantities.deluxe
    }

    /// 檢查所有係數為有限值
    pub fn validate(&self) -> Result<()> {
        let finite = |v: &PerVariant<f64>| v.economy.is_finite() && v.deluxe.is_finite();
        if !finite(&self.objective) {
            return Err(PlanError::InvalidInput("目標係數必須為有限值".to_string()));
        }
        for c in &self.constraints {
            if !finite(&c.coefficients) || !c.rhs.is_finite() {
                return Err(PlanError::InvalidInput(format!("約束 {} 含非有限值", c.name)));
            }
        }
        Ok(())
    }

    /// 檢查解是否滿足所有約束（相對容差）
    pub fn check(&self, quantities: &PerVariant<f64>, tolerance: f64) -> Result<()> {
        if quantities.economy < -tolerance || quantities.deluxe < -tolerance {
            return Err(PlanError::Solver(format!(
                "解違反非負約束: ({}, {})",
                quantities.economy, quantities.deluxe
            )));
        }
        for c in &self.constraints {
            let lhs = c.lhs(quantities);
            if lhs > c.rhs + tolerance * c.rhs.abs().max(1.0) {
                return Err(PlanError::Solver(format!(
                    "解違反約束 {}: {} > {}",
                    c.name, lhs, c.rhs
                )));
            }
        }
        Ok(())
    }
}

/// 線性規劃的最佳解
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LpSolution {
    /// 各型號的連續最佳數量
    pub quantities: PerVariant<f64>,
    /// 最佳目標值
    pub objective_value: f64,
}

/// 外部線性規劃求解能力
///
/// 提交目標與約束，取得最佳解或錯誤；求解器內部不在本 crate 範圍內。
pub trait LpSolver: Send + Sync {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution>;
}

/// 以 good_lp 的 microlp 後端求解（純 Rust 單純形法）
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl LpSolver for MicroLpSolver {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution> {
        program.validate()?;

        let mut vars = variables!();
        let economy = vars.add(variable().min(0));
        let deluxe = vars.add(variable().min(0));

        let objective: Expression =
            economy * program.objective.economy + deluxe * program.objective.deluxe;

        let mut model = vars.maximise(objective).using(microlp);
        for c in &program.constraints {
            let lhs: Expression = economy * c.coefficients.economy + deluxe * c.coefficients.deluxe;
            model = model.with(constraint!(lhs <= c.rhs));
        }

        let solution = model.solve().map_err(|err| match err {
            ResolutionError::Infeasible => PlanError::SolverInfeasible,
            ResolutionError::Unbounded => PlanError::SolverUnbounded,
            other => PlanError::Solver(other.to_string()),
        })?;

        // 單純形法可能返回 -0.0 或極小負值
        let quantities = PerVariant::new(
            solution.value(economy).max(0.0),
            solution.value(deluxe).max(0.0),
        );

        Ok(LpSolution {
            quantities,
            objective_value: program.objective_value(&quantities),
        })
    }
}

fn to_f64(value: Decimal) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| PlanError::CalculationError(format!("無法轉換為浮點數: {}", value)))
}
