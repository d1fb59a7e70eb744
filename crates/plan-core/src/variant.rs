//! 產品型號

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 產品型號（固定兩種）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductVariant {
    /// 經濟款
    Economy,
    /// 豪華款
    Deluxe,
}

impl ProductVariant {
    /// 所有型號（固定順序）
    pub const ALL: [ProductVariant; 2] = [ProductVariant::Economy, ProductVariant::Deluxe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Deluxe => "deluxe",
        }
    }
}

impl fmt::Display for ProductVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 每個型號各一個值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerVariant<T> {
    pub economy: T,
    pub deluxe: T,
}

impl<T> PerVariant<T> {
    pub fn new(economy: T, deluxe: T) -> Self {
        Self { economy, deluxe }
    }

    /// 取得指定型號的值
    pub fn get(&self, variant: ProductVariant) -> &T {
        match variant {
            ProductVariant::Economy => &self.economy,
            ProductVariant::Deluxe => &self.deluxe,
        }
    }

    /// 取得指定型號的可變引用
    pub fn get_mut(&mut self, variant: ProductVariant) -> &mut T {
        match variant {
            ProductVariant::Economy => &mut self.economy,
            ProductVariant::Deluxe => &mut self.deluxe,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerVariant<U> {
        PerVariant {
            economy: f(self.economy),
            deluxe: f(self.deluxe),
        }
    }

    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<PerVariant<U>, E> {
        Ok(PerVariant {
            economy: f(self.economy)?,
            deluxe: f(self.deluxe)?,
        })
    }

    /// 依固定順序迭代（型號, 值）
    pub fn iter(&self) -> impl Iterator<Item = (ProductVariant, &T)> {
        ProductVariant::ALL
            .into_iter()
            .map(move |variant| (variant, self.get(variant)))
    }
}

impl PerVariant<Decimal> {
    /// 兩型號的值都為零
    pub fn zero() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO)
    }

    /// 內積：Σ self[v] × other[v]，溢位時返回 `None`
    pub fn checked_dot(&self, other: &PerVariant<Decimal>) -> Option<Decimal> {
        let economy = self.economy.checked_mul(other.economy)?;
        let deluxe = self.deluxe.checked_mul(other.deluxe)?;
        economy.checked_add(deluxe)
    }

    /// 逐型號相加，溢位時返回 `None`
    pub fn checked_add(&self, other: &PerVariant<Decimal>) -> Option<Self> {
        Some(Self::new(
            self.economy.checked_add(other.economy)?,
            self.deluxe.checked_add(other.deluxe)?,
        ))
    }
}
