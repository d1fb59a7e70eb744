//! 成本模型：單位材料成本、人工成本與利潤貢獻

use plan_core::{Dataset, Department, PerVariant, ProductionPlan, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{checked_dot, overflow};

/// 各型號的單位成本與利潤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCosts {
    /// 單位售價
    pub price: PerVariant<Decimal>,
    /// 單位材料成本
    pub material: PerVariant<Decimal>,
    /// 單位人工成本
    pub labor: PerVariant<Decimal>,
    /// 單位利潤 = 售價 - 材料 - 人工
    pub profit: PerVariant<Decimal>,
}

/// 生產計劃的利潤明細
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    /// 營收
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,

    /// 材料成本
    #[serde(with = "rust_decimal::serde::float")]
    pub material_cost: Decimal,

    /// 人工成本
    #[serde(with = "rust_decimal::serde::float")]
    pub labor_cost: Decimal,

    /// 利潤貢獻 = Σ 單位利潤 × 數量
    #[serde(with = "rust_decimal::serde::float")]
    pub contribution: Decimal,
}

/// 成本模型
pub struct CostModel;

impl CostModel {
    /// 每小時分鐘數（人工費率以分鐘計）
    pub const MINUTES_PER_HOUR: u32 = 60;

    /// 計算所有單位成本
    pub fn calculate(dataset: &Dataset) -> Result<UnitCosts> {
        let price = dataset.finance.prices();
        let material = Self::unit_material_costs(dataset)?;
        let labor = Self::unit_labor_costs(dataset)?;

        let profit = PerVariant::new(
            unit_profit(price.economy, material.economy, labor.economy)?,
            unit_profit(price.deluxe, material.deluxe, labor.deluxe)?,
        );

        tracing::debug!(
            "單位利潤: economy={}, deluxe={}",
            profit.economy,
            profit.deluxe
        );

        Ok(UnitCosts {
            price,
            material,
            labor,
            profit,
        })
    }

    /// 單位材料成本 = Σ（換算到物料單位的用量 × 物料單價）
    pub fn unit_material_costs(dataset: &Dataset) -> Result<PerVariant<Decimal>> {
        let parts = dataset.part_index()?;
        let mut costs = PerVariant::zero();

        for entry in &dataset.bom {
            let part = Dataset::part_for(&parts, entry)?;
            let line = entry.usage_in(part)?.try_map(|usage| {
                usage
                    .checked_mul(part.cost)
                    .ok_or_else(|| overflow(&part.part_id))
            })?;
            costs = costs
                .checked_add(&line)
                .ok_or_else(|| overflow("材料成本"))?;
        }

        Ok(costs)
    }

    /// 單位人工成本 = Σ（秒 / 3600）× 人工費率 × 60
    ///
    /// 以總秒數 × 每小時費率 / 3600 計算，除法放在最後。
    pub fn unit_labor_costs(dataset: &Dataset) -> Result<PerVariant<Decimal>> {
        let rate_per_hour = dataset
            .finance
            .shop_labor_rate
            .checked_mul(Decimal::from(Self::MINUTES_PER_HOUR))
            .ok_or_else(|| overflow("人工費率"))?;

        let mut seconds = PerVariant::zero();
        for dept in &dataset.departments {
            seconds = seconds
                .checked_add(&dept.seconds_per_unit())
                .ok_or_else(|| overflow("部門工時"))?;
        }

        seconds.try_map(|total| {
            total
                .checked_mul(rate_per_hour)
                .and_then(|cost| cost.checked_div(Decimal::from(Department::SECONDS_PER_HOUR)))
                .ok_or_else(|| overflow("人工成本"))
        })
    }

    /// 單位利潤
    pub fn unit_profits(dataset: &Dataset) -> Result<PerVariant<Decimal>> {
        Ok(Self::calculate(dataset)?.profit)
    }

    /// 計算生產計劃的利潤明細
    pub fn profit_breakdown(costs: &UnitCosts, plan: &ProductionPlan) -> Result<ProfitBreakdown> {
        let quantities = &plan.quantities;
        Ok(ProfitBreakdown {
            revenue: checked_dot(&costs.price, quantities)?,
            material_cost: checked_dot(&costs.material, quantities)?,
            labor_cost: checked_dot(&costs.labor, quantities)?,
            contribution: checked_dot(&costs.profit, quantities)?,
        })
    }
}

fn unit_profit(price: Decimal, material: Decimal, labor: Decimal) -> Result<Decimal> {
    price
        .checked_sub(material)
        .and_then(|p| p.checked_sub(labor))
        .ok_or_else(|| overflow("單位利潤"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::pencil_dataset;
    use plan_core::{BomEntry, Department, FinancialParameters, Part, PlanError};

    fn finance(rate: Decimal) -> FinancialParameters {
        FinancialParameters::new(Decimal::from(5), Decimal::from(8), rate)
    }

    #[test]
    fn test_ounce_bom_against_pound_part() {
        // 8 盎司 × 每磅 $2.00 = 8/16 × 2.00 = $1.00
        let dataset = plan_core::Dataset::new(finance(Decimal::ZERO))
            .with_part(Part::new("Graphite", Decimal::new(200, 2), Decimal::from(10), "LB"))
            .with_bom_entry(BomEntry::new("Graphite", Decimal::from(8), Decimal::ZERO, "OZ"));

        let material = CostModel::unit_material_costs(&dataset).unwrap();
        assert_eq!(material.economy, Decimal::ONE);
        assert_eq!(material.deluxe, Decimal::ZERO);
    }

    #[test]
    fn test_labor_cost_uses_minute_rate() {
        // 3600 秒 = 1 小時 = 60 分鐘，費率 $0.50/分鐘 → $30
        let dataset = plan_core::Dataset::new(finance(Decimal::new(5, 1))).with_department(
            Department::new("Assembly", Decimal::from(3600), Decimal::from(1800), Decimal::ONE),
        );

        let labor = CostModel::unit_labor_costs(&dataset).unwrap();
        assert_eq!(labor.economy, Decimal::from(30));
        assert_eq!(labor.deluxe, Decimal::from(15));
    }

    #[test]
    fn test_labor_cost_with_odd_seconds() {
        // 7 秒 × $12/小時 = 84 / 3600 = $0.02333…
        let dataset = plan_core::Dataset::new(finance(Decimal::new(20, 2))).with_department(
            Department::new("Trimming", Decimal::from(7), Decimal::from(3600), Decimal::ONE),
        );

        let labor = CostModel::unit_labor_costs(&dataset).unwrap();
        assert!((labor.economy - Decimal::new(2333, 5)).abs() < Decimal::new(1, 5));
        assert_eq!(labor.deluxe, Decimal::from(12));
    }

    #[test]
    fn test_huge_part_cost_is_calculation_error() {
        // 5e28 × 2 超出 Decimal 範圍
        let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let dataset = plan_core::Dataset::new(finance(Decimal::ZERO))
            .with_part(Part::new("Gold", huge, Decimal::ONE, "EA"))
            .with_bom_entry(BomEntry::new("Gold", Decimal::from(2), Decimal::ZERO, "EA"));

        let err = CostModel::calculate(&dataset).unwrap_err();
        assert!(matches!(err, PlanError::CalculationError(_)));
    }

    #[test]
    fn test_huge_labor_is_calculation_error() {
        let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let dataset = plan_core::Dataset::new(finance(Decimal::ONE))
            .with_department(Department::new("Forming", huge, Decimal::ONE, Decimal::ONE))
            .with_department(Department::new("Painting", huge, Decimal::ONE, Decimal::ONE));

        let err = CostModel::calculate(&dataset).unwrap_err();
        assert!(matches!(err, PlanError::CalculationError(_)));
    }

    #[test]
    fn test_pencil_unit_costs() {
        let costs = CostModel::calculate(&pencil_dataset()).unwrap();

        // 材料：石墨 0.0625 + 木桿 0.10 = 0.1625；豪華款另加石墨 0.0625 與橡皮擦 0.05
        assert_eq!(costs.material.economy, Decimal::new(1625, 4));
        assert_eq!(costs.material.deluxe, Decimal::new(275, 3));

        // 人工：(9 + 36) 秒 = 0.0125 小時 × $12/小時
        assert_eq!(costs.labor.economy, Decimal::new(15, 2));
        assert_eq!(costs.labor.deluxe, Decimal::new(30, 2));

        assert_eq!(costs.profit.economy, Decimal::new(11875, 4));
        assert_eq!(costs.profit.deluxe, Decimal::new(1925, 3));
    }

    #[test]
    fn test_profit_breakdown() {
        let costs = CostModel::calculate(&pencil_dataset()).unwrap();
        let plan = ProductionPlan::from_units(1000, 1000);

        let breakdown = CostModel::profit_breakdown(&costs, &plan).unwrap();
        assert_eq!(breakdown.revenue, Decimal::from(4000));
        assert_eq!(breakdown.material_cost, Decimal::new(4375, 1));
        assert_eq!(breakdown.labor_cost, Decimal::from(450));
        assert_eq!(breakdown.contribution, Decimal::new(31125, 1));
        assert_eq!(
            breakdown.contribution,
            breakdown.revenue - breakdown.material_cost - breakdown.labor_cost
        );
    }

    #[test]
    fn test_unknown_part_in_bom() {
        let dataset = plan_core::Dataset::new(finance(Decimal::ONE))
            .with_bom_entry(BomEntry::new("Ferrule", Decimal::ONE, Decimal::ONE, "EA"));

        let err = CostModel::calculate(&dataset).unwrap_err();
        assert!(matches!(err, PlanError::MissingReference { .. }));
    }

    #[test]
    fn test_unsupported_unit_pair() {
        let dataset = plan_core::Dataset::new(finance(Decimal::ONE))
            .with_part(Part::new("Paint", Decimal::ONE, Decimal::from(10), "OZ"))
            .with_bom_entry(BomEntry::new("Paint", Decimal::ONE, Decimal::ONE, "LB"));

        let err = CostModel::calculate(&dataset).unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedUnitConversion { .. }));
    }
}
