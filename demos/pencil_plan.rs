//! 鉛筆生產規劃完整範例
//!
//! 展示從資料集到建議計劃、再到 what-if 評估的完整流程

use plan_core::{Dataset, PlannerConfig, ProductionPlan};
use plan_optimizer::Planner;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("===== Pencil Production Planning Example =====\n");

    // 步驟 1: 載入資料集
    println!("[1] Load Dataset");
    let dataset = Dataset::from_json_str(include_str!("data.json"))?;
    println!("    Parts: {}", dataset.parts.len());
    println!("    Departments: {}\n", dataset.departments.len());

    // 步驟 2: 求解建議計劃
    println!("[2] Solve LP");
    let planner = Planner::new(PlannerConfig::default());
    let recommendation = planner.recommend(&dataset)?;
    println!(
        "    Unit profit: economy ${:.4}, deluxe ${:.4}",
        recommendation.unit_costs.profit.economy, recommendation.unit_costs.profit.deluxe
    );
    println!(
        "    Recommended: economy {}, deluxe {}\n",
        recommendation.plan.economy_units, recommendation.plan.deluxe_units
    );

    // 步驟 3: 檢視負荷
    println!("[3] Resource Loads");
    for load in recommendation.evaluation.loads() {
        println!("    {:<10} {:>8}", load.resource_id, load.percent_label());
    }
    if let Some(profit) = recommendation.evaluation.profit_contribution {
        println!("    Profit contribution: ${:.2}\n", profit);
    }

    // 步驟 4: what-if 評估
    println!("[4] What-if Plans");
    let plans = vec![
        ProductionPlan::from_units(500, 500),
        ProductionPlan::from_units(1500, 800),
        ProductionPlan::from_units(2000, 0),
    ];
    for evaluation in planner.evaluate_many(&dataset, &plans)? {
        println!(
            "    economy {:>5}, deluxe {:>5}: {}",
            evaluation.plan.quantities.economy,
            evaluation.plan.quantities.deluxe,
            evaluation.status()
        );
    }

    Ok(())
}
