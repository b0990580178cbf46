use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Currency;

/// 抽奖支付方式
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema, DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "gems")]
    Gems,
    #[sea_orm(string_value = "tokens")]
    Tokens,
}

impl PaymentMethod {
    pub fn currency(&self) -> Currency {
        match self {
            PaymentMethod::Gems => Currency::Gems,
            PaymentMethod::Tokens => Currency::Tokens,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Gems => write!(f, "gems"),
            PaymentMethod::Tokens => write!(f, "tokens"),
        }
    }
}

/// 抽奖记录实体
/// 只追加, 落库后不再更新或删除 (审计与限流判定的唯一事实来源);
/// 奖品名称与数额为历史快照, 不受后续奖品配置变更影响
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "spin_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub wheel_id: i64,
    pub prize_name: String,
    pub prize_kind: super::wheel_prizes::PrizeKind,
    pub prize_value: i64,
    pub cost: i64,
    pub payment_method: PaymentMethod,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
