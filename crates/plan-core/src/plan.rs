//! 生產計劃模型

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PerVariant, PlanError, ProductVariant, Result};

/// 生產計劃（各型號的生產數量，可為連續值）
///
/// 由線性規劃求得，或由使用者臨時指定（what-if）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionPlan {
    #[serde(flatten)]
    pub quantities: PerVariant<Decimal>,
}

impl ProductionPlan {
    pub fn new(economy: Decimal, deluxe: Decimal) -> Self {
        Self {
            quantities: PerVariant::new(economy, deluxe),
        }
    }

    /// 不生產任何產品
    pub fn zero() -> Self {
        Self {
            quantities: PerVariant::zero(),
        }
    }

    /// 從整數數量創建
    pub fn from_units(economy_units: u64, deluxe_units: u64) -> Self {
        Self::new(Decimal::from(economy_units), Decimal::from(deluxe_units))
    }

    pub fn quantity(&self, variant: ProductVariant) -> Decimal {
        *self.quantities.get(variant)
    }

    /// 檢查數量非負
    pub fn validate(&self) -> Result<()> {
        for (variant, quantity) in self.quantities.iter() {
            if quantity.is_sign_negative() && !quantity.is_zero() {
                return Err(PlanError::InvalidInput(format!(
                    "{} 生產數量不可為負數: {}",
                    variant, quantity
                )));
            }
        }
        Ok(())
    }

    /// 向下取整為建議計劃
    ///
    /// 連續鬆弛解只是整數最佳解的近似，取整後不再重新優化。
    pub fn floor(&self) -> Result<RecommendedPlan> {
        self.validate()?;
        let units = self.quantities.try_map(|quantity| {
            quantity.floor().to_u64().ok_or_else(|| {
                PlanError::CalculationError(format!("生產數量超出範圍: {}", quantity))
            })
        })?;
        Ok(RecommendedPlan {
            economy_units: units.economy,
            deluxe_units: units.deluxe,
        })
    }
}

/// 建議生產計劃（整數數量）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedPlan {
    pub economy_units: u64,
    pub deluxe_units: u64,
}

impl RecommendedPlan {
    pub fn to_plan(&self) -> ProductionPlan {
        ProductionPlan::from_units(self.economy_units, self.deluxe_units)
    }

    /// 指定型號的數量
    pub fn units(&self, variant: ProductVariant) -> u64 {
        match variant {
            ProductVariant::Economy => self.economy_units,
            ProductVariant::Deluxe => self.deluxe_units,
        }
    }

    pub fn units_mut(&mut self, variant: ProductVariant) -> &mut u64 {
        match variant {
            ProductVariant::Economy => &mut self.economy_units,
            ProductVariant::Deluxe => &mut self.deluxe_units,
        }
    }
}
