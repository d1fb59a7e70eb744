//! # Plan Core
//!
//! 核心資料模型與類型定義（物料、BOM、部門、財務參數、生產計劃）

pub mod config;
pub mod dataset;
pub mod load;
pub mod plan;
pub mod uom;
pub mod variant;

use rust_decimal::Decimal;

// Re-export 主要類型
pub use config::PlannerConfig;
pub use dataset::{normalize_key, BomEntry, Dataset, Department, FinancialParameters, Part};
pub use load::{ResourceKind, ResourceLoad};
pub use plan::{ProductionPlan, RecommendedPlan};
pub use uom::UnitOfMeasure;
pub use variant::{PerVariant, ProductVariant};

/// 生產計劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("找不到{kind}: {key}（由 {referenced_by} 參照）")]
    MissingReference {
        kind: ResourceKind,
        key: String,
        referenced_by: String,
    },

    #[error("{resource} 的產能無效: {capacity}（必須大於 0）")]
    InvalidCapacity { resource: String, capacity: Decimal },

    #[error("不支援的單位換算: {from} → {to}（物料 {part}）")]
    UnsupportedUnitConversion {
        part: String,
        from: UnitOfMeasure,
        to: UnitOfMeasure,
    },

    #[error("線性規劃無可行解")]
    SolverInfeasible,

    #[error("線性規劃目標無界")]
    SolverUnbounded,

    #[error("求解器錯誤: {0}")]
    Solver(String),

    #[error("重複的資料鍵: {0}")]
    DuplicateEntry(String),

    #[error("無效的輸入: {0}")]
    InvalidInput(String),

    #[error("資料集解析錯誤: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
