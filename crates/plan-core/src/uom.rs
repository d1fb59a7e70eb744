//! 計量單位

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 每磅盎司數
const OUNCES_PER_POUND: u32 = 16;

/// 計量單位
///
/// 資料集中以代碼表示（`"OZ"`、`"LB"`，其餘原樣保留為 [`UnitOfMeasure::Other`]），
/// 解析時忽略大小寫與前後空白。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitOfMeasure {
    /// 盎司
    Ounce,
    /// 磅
    Pound,
    /// 其他單位（如件數 `EA`）
    Other(String),
}

impl UnitOfMeasure {
    /// 單位代碼
    pub fn code(&self) -> &str {
        match self {
            Self::Ounce => "OZ",
            Self::Pound => "LB",
            Self::Other(code) => code,
        }
    }

    /// 將數量從本單位換算到目標單位
    ///
    /// 相同單位原樣返回；唯一定義的換算為盎司 → 磅（除以 16）。
    /// 其他組合返回 `None`，由呼叫端決定錯誤。
    pub fn convert(&self, quantity: Decimal, target: &UnitOfMeasure) -> Option<Decimal> {
        if self == target {
            return Some(quantity);
        }
        match (self, target) {
            (Self::Ounce, Self::Pound) => Some(quantity / Decimal::from(OUNCES_PER_POUND)),
            _ => None,
        }
    }
}

impl From<String> for UnitOfMeasure {
    fn from(code: String) -> Self {
        let code = code.trim().to_uppercase();
        match code.as_str() {
            "OZ" => Self::Ounce,
            "LB" => Self::Pound,
            _ => Self::Other(code),
        }
    }
}

impl From<&str> for UnitOfMeasure {
    fn from(code: &str) -> Self {
        Self::from(code.to_string())
    }
}

impl From<UnitOfMeasure> for String {
    fn from(uom: UnitOfMeasure) -> Self {
        uom.code().to_string()
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
