//! 文字報表輸出

use std::fmt::Write;

use plan_calc::PlanEvaluation;
use plan_core::ResourceLoad;
use plan_optimizer::Recommendation;

/// 建議計劃報表
pub fn render_recommendation(recommendation: &Recommendation) -> String {
    let mut out = String::new();
    let costs = &recommendation.unit_costs;
    let continuous = &recommendation.continuous.quantities;

    let _ = writeln!(out, "=== 建議生產計劃 ===");
    let _ = writeln!(
        out,
        "單位利潤: economy ${:.4}, deluxe ${:.4}",
        costs.profit.economy, costs.profit.deluxe
    );
    let _ = writeln!(
        out,
        "連續最佳解: economy {}, deluxe {}（目標值 ${:.2}）",
        continuous.economy, continuous.deluxe, recommendation.objective_value
    );
    let _ = writeln!(
        out,
        "建議數量: economy {} 支, deluxe {} 支\n",
        recommendation.plan.economy_units, recommendation.plan.deluxe_units
    );
    out.push_str(&render_evaluation(&recommendation.evaluation));
    out
}

/// 計劃評估報表
pub fn render_evaluation(evaluation: &PlanEvaluation) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "部門負荷:");
    render_loads(&mut out, &evaluation.department_loads);
    let _ = writeln!(out, "物料負荷:");
    render_loads(&mut out, &evaluation.part_loads);

    let _ = writeln!(out, "\nSolution Status: {}", evaluation.status());
    if let Some(profit) = &evaluation.profit_breakdown {
        let _ = writeln!(out, "營收:     ${:.2}", profit.revenue);
        let _ = writeln!(out, "材料成本: ${:.2}", profit.material_cost);
        let _ = writeln!(out, "人工成本: ${:.2}", profit.labor_cost);
        let _ = writeln!(out, "Profit Contribution: ${:.2}", profit.contribution);
    }
    out
}

fn render_loads(out: &mut String, loads: &[ResourceLoad]) {
    for load in loads {
        let marker = if load.is_overloaded() { " !" } else { "" };
        let _ = writeln!(
            out,
            "  {:<16} {:>12.3} / {:<12} {:>8}{}",
            load.resource_id,
            load.load,
            load.capacity,
            load.percent_label(),
            marker
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_calc::LoadEvaluator;
    use plan_core::{Dataset, Department, FinancialParameters, ProductionPlan};
    use rust_decimal::Decimal;

    #[test]
    fn test_render_overloaded_evaluation() {
        let dataset = Dataset::new(FinancialParameters::new(Decimal::ONE, Decimal::ONE, Decimal::ZERO))
            .with_department(Department::new(
                "Assembly",
                Decimal::from(3600),
                Decimal::from(1800),
                Decimal::ONE,
            ));
        let evaluation = LoadEvaluator::evaluate(&dataset, &ProductionPlan::from_units(2, 0)).unwrap();

        let text = render_evaluation(&evaluation);
        assert!(text.contains("Assembly"));
        assert!(text.contains("200.0%"));
        assert!(text.contains("Solution Status: Infeasible"));
        assert!(!text.contains("Profit Contribution"));
    }
}
