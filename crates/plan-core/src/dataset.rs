//! 生產資料集（物料、BOM、部門、財務參數）

use std::collections::{HashMap, HashSet};
use std::io::Read;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PerVariant, PlanError, ResourceKind, Result, UnitOfMeasure};

/// 資源鍵正規化（去除前後空白並轉小寫）
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// 物料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// 物料ID
    #[serde(rename = "part")]
    pub part_id: String,

    /// 單位成本（每計量單位）
    pub cost: Decimal,

    /// 現有庫存
    #[serde(rename = "inv")]
    pub inventory: Decimal,

    /// 計量單位
    pub uom: UnitOfMeasure,
}

impl Part {
    pub fn new(
        part_id: impl Into<String>,
        cost: Decimal,
        inventory: Decimal,
        uom: impl Into<UnitOfMeasure>,
    ) -> Self {
        Self {
            part_id: part_id.into(),
            cost,
            inventory,
            uom: uom.into(),
        }
    }

    pub fn key(&self) -> String {
        normalize_key(&self.part_id)
    }
}

/// BOM 用量（每單位成品消耗的物料數量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomEntry {
    /// 物料ID
    #[serde(rename = "part")]
    pub part_id: String,

    /// 經濟款單位用量
    pub economy: Decimal,

    /// 豪華款單位用量
    pub deluxe: Decimal,

    /// 用量的計量單位
    pub uom: UnitOfMeasure,
}

impl BomEntry {
    pub fn new(
        part_id: impl Into<String>,
        economy: Decimal,
        deluxe: Decimal,
        uom: impl Into<UnitOfMeasure>,
    ) -> Self {
        Self {
            part_id: part_id.into(),
            economy,
            deluxe,
            uom: uom.into(),
        }
    }

    pub fn key(&self) -> String {
        normalize_key(&self.part_id)
    }

    /// 原始單位下的單位用量
    pub fn usage(&self) -> PerVariant<Decimal> {
        PerVariant::new(self.economy, self.deluxe)
    }

    /// 換算為物料計量單位後的單位用量
    pub fn usage_in(&self, part: &Part) -> Result<PerVariant<Decimal>> {
        self.usage().try_map(|quantity| {
            self.uom
                .convert(quantity, &part.uom)
                .ok_or_else(|| PlanError::UnsupportedUnitConversion {
                    part: part.part_id.clone(),
                    from: self.uom.clone(),
                    to: part.uom.clone(),
                })
        })
    }
}

/// 部門（工時與產能）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    /// 部門ID
    #[serde(rename = "dept")]
    pub dept_id: String,

    /// 經濟款單位工時（秒）
    pub economy: Decimal,

    /// 豪華款單位工時（秒）
    pub deluxe: Decimal,

    /// 產能（小時）
    pub capacity: Decimal,
}

impl Department {
    /// 每小時秒數
    pub const SECONDS_PER_HOUR: u32 = 3600;

    pub fn new(dept_id: impl Into<String>, economy: Decimal, deluxe: Decimal, capacity: Decimal) -> Self {
        Self {
            dept_id: dept_id.into(),
            economy,
            deluxe,
            capacity,
        }
    }

    pub fn key(&self) -> String {
        normalize_key(&self.dept_id)
    }

    /// 單位工時（秒）
    ///
    /// 不預先換算為小時：1/3600 之類的商無法以十進位精確表示，
    /// 工時須先乘數量再除以 3600。
    pub fn seconds_per_unit(&self) -> PerVariant<Decimal> {
        PerVariant::new(self.economy, self.deluxe)
    }
}

/// 財務參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialParameters {
    /// 經濟款售價
    pub economy_price: Decimal,

    /// 豪華款售價
    pub deluxe_price: Decimal,

    /// 車間人工費率（每人工分鐘）
    pub shop_labor_rate: Decimal,
}

impl FinancialParameters {
    pub fn new(economy_price: Decimal, deluxe_price: Decimal, shop_labor_rate: Decimal) -> Self {
        Self {
            economy_price,
            deluxe_price,
            shop_labor_rate,
        }
    }

    /// 單位售價
    pub fn prices(&self) -> PerVariant<Decimal> {
        PerVariant::new(self.economy_price, self.deluxe_price)
    }
}

/// 完整的生產資料集
///
/// 由呼叫端擁有並以唯讀方式傳入每次計算；核心從不修改它。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub parts: Vec<Part>,

    #[serde(default)]
    pub bom: Vec<BomEntry>,

    #[serde(rename = "dept", default)]
    pub departments: Vec<Department>,

    #[serde(flatten)]
    pub finance: FinancialParameters,
}

impl Dataset {
    /// 創建空資料集（僅財務參數）
    pub fn new(finance: FinancialParameters) -> Self {
        Self {
            parts: Vec::new(),
            bom: Vec::new(),
            departments: Vec::new(),
            finance,
        }
    }

    /// 從 JSON 字串解析
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 從讀取器解析 JSON
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// 建構器模式：添加物料
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// 建構器模式：添加 BOM 用量
    pub fn with_bom_entry(mut self, entry: BomEntry) -> Self {
        self.bom.push(entry);
        self
    }

    /// 建構器模式：添加部門
    pub fn with_department(mut self, department: Department) -> Self {
        self.departments.push(department);
        self
    }

    /// 物料索引（正規化鍵 → 物料）
    pub fn part_index(&self) -> Result<HashMap<String, &Part>> {
        let mut index = HashMap::with_capacity(self.parts.len());
        for part in &self.parts {
            if index.insert(part.key(), part).is_some() {
                return Err(PlanError::DuplicateEntry(format!("物料 {}", part.part_id)));
            }
        }
        Ok(index)
    }

    /// BOM 索引（正規化鍵 → 用量），每個物料最多一筆
    pub fn bom_index(&self) -> Result<HashMap<String, &BomEntry>> {
        let mut index = HashMap::with_capacity(self.bom.len());
        for entry in &self.bom {
            if index.insert(entry.key(), entry).is_some() {
                return Err(PlanError::DuplicateEntry(format!("BOM {}", entry.part_id)));
            }
        }
        Ok(index)
    }

    /// 查找 BOM 所參照的物料
    pub fn part_for<'a>(
        index: &HashMap<String, &'a Part>,
        entry: &BomEntry,
    ) -> Result<&'a Part> {
        index
            .get(&entry.key())
            .copied()
            .ok_or_else(|| PlanError::MissingReference {
                kind: ResourceKind::Part,
                key: entry.part_id.clone(),
                referenced_by: "BOM".to_string(),
            })
    }

    /// 檢查輸入資料（負數、重複鍵）
    ///
    /// 產能 / 庫存是否大於零由約束建構時檢查，以返回 [`PlanError::InvalidCapacity`]。
    pub fn validate(&self) -> Result<()> {
        let finance = &self.finance;
        check_non_negative("經濟款售價", finance.economy_price)?;
        check_non_negative("豪華款售價", finance.deluxe_price)?;
        check_non_negative("人工費率", finance.shop_labor_rate)?;

        for part in &self.parts {
            check_non_negative(&format!("物料 {} 成本", part.part_id), part.cost)?;
        }
        for entry in &self.bom {
            for (variant, quantity) in entry.usage().iter() {
                check_non_negative(&format!("BOM {} {} 用量", entry.part_id, variant), *quantity)?;
            }
        }

        let mut seen = HashSet::new();
        for dept in &self.departments {
            if !seen.insert(dept.key()) {
                return Err(PlanError::DuplicateEntry(format!("部門 {}", dept.dept_id)));
            }
            for (variant, seconds) in dept.seconds_per_unit().iter() {
                check_non_negative(&format!("部門 {} {} 工時", dept.dept_id, variant), *seconds)?;
            }
        }

        let parts = self.part_index()?;
        let bom = self.bom_index()?;
        for entry in bom.values() {
            Self::part_for(&parts, entry)?;
        }

        Ok(())
    }
}

fn check_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PlanError::InvalidInput(format!("{} 不可為負數: {}", field, value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "parts": [
            {"part": "Graphite", "cost": "2.00", "inv": 500, "uom": "LB"},
            {"part": "Eraser", "cost": 0.05, "inv": 20000, "uom": "EA"}
        ],
        "bom": [
            {"part": "graphite", "economy": 0.5, "deluxe": 1, "uom": "OZ"},
            {"part": "Eraser", "economy": 1, "deluxe": 1, "uom": "EA"}
        ],
        "dept": [
            {"dept": "Milling", "economy": 10, "deluxe": 15, "capacity": 40}
        ],
        "economy_price": 0.75,
        "deluxe_price": 1.25,
        "shop_labor_rate": 0.5
    }"#;

    #[test]
    fn test_parse_dataset() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();

        assert_eq!(dataset.parts.len(), 2);
        assert_eq!(dataset.parts[0].cost, Decimal::from(2));
        assert_eq!(dataset.parts[1].cost, Decimal::new(5, 2));
        assert_eq!(dataset.parts[0].uom, UnitOfMeasure::Pound);
        assert_eq!(dataset.bom[0].uom, UnitOfMeasure::Ounce);
        assert_eq!(dataset.departments[0].capacity, Decimal::from(40));
        assert_eq!(dataset.finance.shop_labor_rate, Decimal::new(5, 1));
        assert!(dataset.validate().is_ok());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let parts = dataset.part_index().unwrap();

        // BOM 中的 "graphite" 對應物料表中的 "Graphite"
        let part = Dataset::part_for(&parts, &dataset.bom[0]).unwrap();
        assert_eq!(part.part_id, "Graphite");
    }

    #[test]
    fn test_usage_converted_to_part_unit() {
        let part = Part::new("Graphite", Decimal::from(2), Decimal::from(10), "LB");
        let entry = BomEntry::new("Graphite", Decimal::from(8), Decimal::from(16), "OZ");

        let usage = entry.usage_in(&part).unwrap();
        assert_eq!(usage.economy, Decimal::new(5, 1));
        assert_eq!(usage.deluxe, Decimal::ONE);
    }

    #[test]
    fn test_usage_unsupported_conversion() {
        let part = Part::new("Wood", Decimal::ONE, Decimal::from(10), "EA");
        let entry = BomEntry::new("Wood", Decimal::ONE, Decimal::ONE, "LB");

        let err = entry.usage_in(&part).unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedUnitConversion { .. }));
    }

    #[test]
    fn test_seconds_per_unit() {
        let dept = Department::new("Paint", Decimal::from(3600), Decimal::from(1800), Decimal::ONE);
        let seconds = dept.seconds_per_unit();
        assert_eq!(seconds.economy, Decimal::from(3600));
        assert_eq!(seconds.deluxe, Decimal::from(1800));
    }

    #[test]
    fn test_missing_part_reference() {
        let dataset = Dataset::new(FinancialParameters::new(Decimal::ONE, Decimal::ONE, Decimal::ONE))
            .with_bom_entry(BomEntry::new("Ferrule", Decimal::ONE, Decimal::ONE, "EA"));

        let err = dataset.validate().unwrap_err();
        assert!(matches!(
            err,
            PlanError::MissingReference { kind: ResourceKind::Part, ref key, .. } if key == "Ferrule"
        ));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let dataset = Dataset::new(FinancialParameters::new(Decimal::ONE, Decimal::ONE, Decimal::ONE))
            .with_part(Part::new("Wood", Decimal::ONE, Decimal::ONE, "EA"))
            .with_part(Part::new("WOOD", Decimal::ONE, Decimal::ONE, "EA"));

        assert!(matches!(dataset.validate(), Err(PlanError::DuplicateEntry(_))));
    }

    #[test]
    fn test_negative_price_rejected() {
        let dataset = Dataset::new(FinancialParameters::new(
            Decimal::from(-1),
            Decimal::ONE,
            Decimal::ONE,
        ));
        assert!(matches!(dataset.validate(), Err(PlanError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_json() {
        let err = Dataset::from_json_str("{\"parts\": 3}").unwrap_err();
        assert!(matches!(err, PlanError::Dataset(_)));
    }
}
