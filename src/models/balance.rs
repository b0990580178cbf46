use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::user_balance_entity;

/// 余额科目 (结算货币)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Gems,
    Tokens,
    /// 现金 (美分计)
    Cash,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Gems => write!(f, "gems"),
            Currency::Tokens => write!(f, "tokens"),
            Currency::Cash => write!(f, "cash"),
        }
    }
}

/// 用户余额响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub gems: i64,
    pub tokens: i64,
    /// 现金余额 (美分)
    pub cash_cents: i64,
}

impl From<user_balance_entity::Model> for BalanceResponse {
    fn from(m: user_balance_entity::Model) -> Self {
        BalanceResponse {
            gems: m.gems,
            tokens: m.tokens,
            cash_cents: m.cash_cents,
        }
    }
}

/// 管理端手工入账请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjustBalanceRequest {
    pub currency: Currency,
    /// 入账数额 (非负; cash 为美分)
    pub amount: i64,
}
