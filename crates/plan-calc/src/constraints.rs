//! 產能約束建構（部門工時、物料庫存）

use std::collections::HashSet;

use plan_core::{
    Dataset, Department, PerVariant, PlanError, ProductionPlan, ResourceKind, ResourceLoad,
    Result,
};
use rust_decimal::Decimal;

use crate::{checked_dot, overflow};

/// 線性產能約束：Σ 型號數量 × 單位用量 ≤ 產能
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityConstraint {
    /// 正規化資源鍵
    pub key: String,

    /// 資源ID（原始名稱）
    pub resource_id: String,

    /// 資源類型
    pub kind: ResourceKind,

    /// 每單位成品的資源用量（部門為秒，物料為物料單位）
    pub usage_per_unit: PerVariant<Decimal>,

    /// 用量換算為產能單位的除數（部門為 3600，物料為 1）
    pub usage_divisor: Decimal,

    /// 產能（部門為小時，物料為庫存）
    pub capacity: Decimal,
}

impl CapacityConstraint {
    /// 計劃下的絕對負荷（產能單位）
    ///
    /// 先算 Σ 數量 × 用量，最後才除以換算除數。
    pub fn load(&self, plan: &ProductionPlan) -> Result<Decimal> {
        checked_dot(&self.usage_per_unit, &plan.quantities)?
            .checked_div(self.usage_divisor)
            .ok_or_else(|| overflow(&self.resource_id))
    }

    /// 以用量單位表示的產能（部門為秒）
    pub fn usage_capacity(&self) -> Result<Decimal> {
        self.capacity
            .checked_mul(self.usage_divisor)
            .ok_or_else(|| overflow(&self.resource_id))
    }

    /// 計劃下的資源負荷
    pub fn evaluate(&self, plan: &ProductionPlan) -> Result<ResourceLoad> {
        ResourceLoad::new(
            self.resource_id.clone(),
            self.kind,
            self.load(plan)?,
            self.capacity,
        )
    }
}

/// 所有產能約束
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    /// 部門工時約束（依資料集順序）
    pub departments: Vec<CapacityConstraint>,

    /// 物料庫存約束（依資料集順序）
    pub parts: Vec<CapacityConstraint>,
}

impl ConstraintSet {
    /// 迭代所有約束（部門在前）
    pub fn iter(&self) -> impl Iterator<Item = &CapacityConstraint> {
        self.departments.iter().chain(self.parts.iter())
    }

    pub fn len(&self) -> usize {
        self.departments.len() + self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 依類型與名稱查找約束（名稱不分大小寫）
    pub fn get(&self, kind: ResourceKind, resource_id: &str) -> Option<&CapacityConstraint> {
        let key = plan_core::normalize_key(resource_id);
        let list = match kind {
            ResourceKind::Department => &self.departments,
            ResourceKind::Part => &self.parts,
        };
        list.iter().find(|c| c.key == key)
    }
}

/// 約束建構器
pub struct ConstraintBuilder;

impl ConstraintBuilder {
    /// 建構所有部門與物料約束
    pub fn build(dataset: &Dataset) -> Result<ConstraintSet> {
        let set = ConstraintSet {
            departments: Self::department_constraints(dataset)?,
            parts: Self::part_constraints(dataset)?,
        };

        tracing::debug!(
            "約束建構完成: 部門 {} 條，物料 {} 條",
            set.departments.len(),
            set.parts.len()
        );

        Ok(set)
    }

    /// 部門約束：Σ 數量 × 秒 ≤ 產能（小時）× 3600
    pub fn department_constraints(dataset: &Dataset) -> Result<Vec<CapacityConstraint>> {
        let mut seen = HashSet::new();
        let mut constraints = Vec::with_capacity(dataset.departments.len());

        for dept in &dataset.departments {
            let key = dept.key();
            if !seen.insert(key.clone()) {
                return Err(PlanError::DuplicateEntry(format!("部門 {}", dept.dept_id)));
            }
            check_capacity(&dept.dept_id, ResourceKind::Department, dept.capacity)?;

            constraints.push(CapacityConstraint {
                key,
                resource_id: dept.dept_id.clone(),
                kind: ResourceKind::Department,
                usage_per_unit: dept.seconds_per_unit(),
                usage_divisor: Decimal::from(Department::SECONDS_PER_HOUR),
                capacity: dept.capacity,
            });
        }

        Ok(constraints)
    }

    /// 物料約束：Σ 數量 × 換算後用量 ≤ 庫存
    ///
    /// 沒有 BOM 用量的物料仍產生約束（用量為零）。
    pub fn part_constraints(dataset: &Dataset) -> Result<Vec<CapacityConstraint>> {
        let parts = dataset.part_index()?;
        let bom = dataset.bom_index()?;

        // BOM 參照的物料必須存在
        for entry in &dataset.bom {
            Dataset::part_for(&parts, entry)?;
        }

        let mut constraints = Vec::with_capacity(dataset.parts.len());
        for part in &dataset.parts {
            check_capacity(&part.part_id, ResourceKind::Part, part.inventory)?;

            let key = part.key();
            let usage_per_unit = match bom.get(&key) {
                Some(entry) => entry.usage_in(part)?,
                None => {
                    tracing::debug!("物料 {} 沒有 BOM 用量", part.part_id);
                    PerVariant::zero()
                }
            };

            constraints.push(CapacityConstraint {
                key,
                resource_id: part.part_id.clone(),
                kind: ResourceKind::Part,
                usage_per_unit,
                usage_divisor: Decimal::ONE,
                capacity: part.inventory,
            });
        }

        Ok(constraints)
    }
}

fn check_capacity(resource_id: &str, kind: ResourceKind, capacity: Decimal) -> Result<()> {
    if capacity <= Decimal::ZERO {
        return Err(PlanError::InvalidCapacity {
            resource: format!("{} {}", kind, resource_id),
            capacity,
        });
    }
    Ok(())
}
