use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 转盘配置实体
/// 概念说明:
/// - cost_gems / cost_tokens: 单次抽奖价格, 按请求中的支付方式取其一
/// - daily_limit: 单用户每日 (UTC 自然日) 抽奖上限, >= 1
/// - cooldown_seconds: 同一用户两次抽奖的最小间隔 (秒), 0 表示无冷却
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wheels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: String,
    pub cost_gems: i64,
    pub cost_tokens: i64,
    pub daily_limit: i32,
    pub cooldown_seconds: i64,
    /// 是否上架 (下架转盘不可见也不可抽)
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
