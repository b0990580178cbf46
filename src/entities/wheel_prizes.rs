use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Currency;

/// 奖品类型
/// - gems / tokens / cash: 中奖后直接入账对应余额科目 (cash 以美分计)
/// - item / discount: 交由外部履约服务发放, 不走余额账户
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema, DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "prize_kind")]
#[serde(rename_all = "snake_case")]
pub enum PrizeKind {
    #[sea_orm(string_value = "gems")]
    Gems,
    #[sea_orm(string_value = "tokens")]
    Tokens,
    #[sea_orm(string_value = "item")]
    Item,
    #[sea_orm(string_value = "discount")]
    Discount,
    #[sea_orm(string_value = "cash")]
    Cash,
}

impl PrizeKind {
    /// 中奖后入账的余额科目; item / discount 无对应科目 (走履约回调)
    pub fn payout_currency(&self) -> Option<Currency> {
        match self {
            PrizeKind::Gems => Some(Currency::Gems),
            PrizeKind::Tokens => Some(Currency::Tokens),
            PrizeKind::Cash => Some(Currency::Cash),
            PrizeKind::Item | PrizeKind::Discount => None,
        }
    }
}

impl std::fmt::Display for PrizeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrizeKind::Gems => write!(f, "gems"),
            PrizeKind::Tokens => write!(f, "tokens"),
            PrizeKind::Item => write!(f, "item"),
            PrizeKind::Discount => write!(f, "discount"),
            PrizeKind::Cash => write!(f, "cash"),
        }
    }
}

/// 奖品配置实体
/// 概念说明:
/// - probability: 概率百分比 [0, 100], 同一转盘启用奖品之和必须为 100(±0.01)
/// - value: 奖品数额 (gems/tokens 个数, cash/discount 为美分, item 为物品ID)
/// - 分桶顺序按 id 升序 (创建时的声明顺序), 该顺序是转盘语义的一部分,
///   因为累计分桶在边界值上对顺序敏感
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wheel_prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub wheel_id: i64,
    pub name: String,
    pub kind: PrizeKind,
    pub value: i64,
    pub probability: f64,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
