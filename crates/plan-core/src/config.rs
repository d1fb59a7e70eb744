//! 規劃器配置

use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 規劃器參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// 求解器容差（驗證約束時允許的相對誤差）
    pub solver_tolerance: f64,

    /// 連續解在取整前保留的小數位數
    ///
    /// 浮點求解器可能返回 999.9999999999998 之類的值，
    /// 先正規化到此精度再向下取整，避免少算一單位。
    pub solution_precision: u32,

    /// 是否在求解後重新檢查所有約束
    pub verify_solution: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            solver_tolerance: 1e-6,
            solution_precision: 6,
            verify_solution: true,
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 字串解析（缺少的欄位使用預設值）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置求解器容差
    pub fn with_solver_tolerance(mut self, tolerance: f64) -> Self {
        self.solver_tolerance = tolerance;
        self
    }

    /// 建構器模式：設置連續解精度
    pub fn with_solution_precision(mut self, precision: u32) -> Self {
        self.solution_precision = precision;
        self
    }

    /// 建構器模式：設置是否驗證解
    pub fn with_verify_solution(mut self, verify: bool) -> Self {
        self.verify_solution = verify;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.solver_tolerance.is_finite() || self.solver_tolerance < 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "求解器容差無效: {}",
                self.solver_tolerance
            )));
        }
        // Decimal 最多 28 位小數
        if self.solution_precision > 28 {
            return Err(PlanError::InvalidInput(format!(
                "連續解精度無效: {}",
                self.solution_precision
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::new();
        assert_eq!(config.solver_tolerance, 1e-6);
        assert_eq!(config.solution_precision, 6);
        assert!(config.verify_solution);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = PlannerConfig::new()
            .with_solver_tolerance(1e-9)
            .with_solution_precision(4)
            .with_verify_solution(false);

        assert_eq!(config.solver_tolerance, 1e-9);
        assert_eq!(config.solution_precision, 4);
        assert!(!config.verify_solution);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PlannerConfig::from_json_str(r#"{"solution_precision": 3}"#).unwrap();
        assert_eq!(config.solution_precision, 3);
        assert_eq!(config.solver_tolerance, 1e-6);
    }

    #[test]
    fn test_invalid_tolerance() {
        let err = PlannerConfig::from_json_str(r#"{"solver_tolerance": -1.0}"#).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }
}
