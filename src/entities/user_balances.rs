use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 用户余额账户实体 (按需创建, 一个用户一条)
/// 三个科目均不允许为负; 只能通过 SpendLedger 的 debit / credit 变更
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "user_balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub gems: i64,
    pub tokens: i64,
    /// 现金余额 (美分)
    pub cash_cents: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
