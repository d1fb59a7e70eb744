//! 資源負荷模型

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 資源類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// 部門工時
    Department,
    /// 物料庫存
    Part,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Department => f.write_str("部門"),
            Self::Part => f.write_str("物料"),
        }
    }
}

/// 單一資源在某生產計劃下的負荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLoad {
    /// 資源ID（資料集中的原始名稱）
    pub resource_id: String,

    /// 資源類型
    pub kind: ResourceKind,

    /// 絕對負荷（部門為小時，物料為物料計量單位）
    #[serde(with = "rust_decimal::serde::float")]
    pub load: Decimal,

    /// 負荷率（負荷 / 產能）
    #[serde(with = "rust_decimal::serde::float")]
    pub load_fraction: Decimal,

    /// 產能
    #[serde(with = "rust_decimal::serde::float")]
    pub capacity: Decimal,
}

impl ResourceLoad {
    /// 創建負荷記錄；產能必須大於零
    pub fn new(
        resource_id: String,
        kind: ResourceKind,
        load: Decimal,
        capacity: Decimal,
    ) -> Result<Self> {
        if capacity <= Decimal::ZERO {
            return Err(PlanError::InvalidCapacity {
                resource: format!("{} {}", kind, resource_id),
                capacity,
            });
        }
        let load_fraction = load
            .checked_div(capacity)
            .ok_or_else(|| PlanError::CalculationError(format!("{} 負荷率溢位", resource_id)))?;
        Ok(Self {
            resource_id,
            kind,
            load,
            load_fraction,
            capacity,
        })
    }

    /// 是否超載（負荷率 > 1，恰好等於 1 不算超載）
    pub fn is_overloaded(&self) -> bool {
        self.load_fraction > Decimal::ONE
    }

    /// 剩餘產能（超載時為負）
    pub fn remaining(&self) -> Decimal {
        self.capacity - self.load
    }

    /// 負荷百分比標籤，保留一位小數（如 `"87.5%"`）
    pub fn percent_label(&self) -> String {
        match self.load_fraction.checked_mul(Decimal::ONE_HUNDRED) {
            Some(percent) => format!(
                "{:.1}%",
                percent.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            ),
            None => format!("{:.1e}%", self.load_fraction.to_f64().unwrap_or(f64::MAX) * 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fraction() {
        let load = ResourceLoad::new(
            "Milling".to_string(),
            ResourceKind::Department,
            Decimal::from(35),
            Decimal::from(40),
        )
        .unwrap();

        assert_eq!(load.load_fraction, Decimal::new(875, 3));
        assert!(!load.is_overloaded());
        assert_eq!(load.remaining(), Decimal::from(5));
        assert_eq!(load.percent_label(), "87.5%");
    }

    #[test]
    fn test_exactly_full_is_not_overloaded() {
        let load = ResourceLoad::new(
            "Eraser".to_string(),
            ResourceKind::Part,
            Decimal::from(100),
            Decimal::from(100),
        )
        .unwrap();
        assert!(!load.is_overloaded());
        assert_eq!(load.percent_label(), "100.0%");
    }

    #[test]
    fn test_overloaded() {
        let load = ResourceLoad::new(
            "Paint".to_string(),
            ResourceKind::Department,
            Decimal::new(1001, 2),
            Decimal::from(10),
        )
        .unwrap();
        assert!(load.is_overloaded());
        assert_eq!(load.percent_label(), "100.1%");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = ResourceLoad::new(
            "Packing".to_string(),
            ResourceKind::Department,
            Decimal::ZERO,
            Decimal::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::InvalidCapacity { .. }));
    }

    #[test]
    fn test_serialize_as_numbers() {
        let load = ResourceLoad::new(
            "Milling".to_string(),
            ResourceKind::Department,
            Decimal::from(10),
            Decimal::from(40),
        )
        .unwrap();
        let value = serde_json::to_value(&load).unwrap();
        assert_eq!(value["resource_id"], "Milling");
        assert_eq!(value["load_fraction"], 0.25);
        assert_eq!(value["capacity"], 40.0);
    }
}
