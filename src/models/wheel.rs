use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{
    PaymentMethod, PrizeKind, spin_record_entity as record_entity,
    wheel_entity, wheel_prize_entity as prize_entity,
};

/// 单次抽奖价格 (两种支付方式各自的面额)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct CostPerSpin {
    pub gems: i64,
    pub tokens: i64,
}

/// 创建 / 更新转盘时的奖品配置项
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrizeInput {
    pub name: String,
    pub kind: PrizeKind,
    /// 奖品数额 (gems/tokens 个数, cash/discount 为美分, item 为物品ID)
    pub value: i64,
    /// 概率百分比 [0, 100]
    pub probability: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// 创建转盘请求 (管理端)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWheelRequest {
    pub name: String,
    pub description: String,
    pub cost_per_spin: CostPerSpin,
    /// 奖品按声明顺序入库, 该顺序即分桶顺序
    pub prizes: Vec<PrizeInput>,
    pub daily_limit: i32,
    pub cooldown_seconds: i64,
}

/// 更新转盘请求 (管理端, 全部字段可选)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateWheelRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cost_per_spin: Option<CostPerSpin>,
    /// 提供时整组替换并重新校验
    pub prizes: Option<Vec<PrizeInput>>,
    pub daily_limit: Option<i32>,
    pub cooldown_seconds: Option<i64>,
    pub is_active: Option<bool>,
}

/// 奖品信息响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeResponse {
    pub id: i64,
    pub name: String,
    pub kind: PrizeKind,
    pub value: i64,
    pub probability: f64,
    pub is_active: bool,
}

impl From<prize_entity::Model> for PrizeResponse {
    fn from(m: prize_entity::Model) -> Self {
        PrizeResponse {
            id: m.id,
            name: m.name,
            kind: m.kind,
            value: m.value,
            probability: m.probability,
            is_active: m.is_active,
        }
    }
}

/// 转盘信息响应 (含奖品配置)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WheelResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub cost_per_spin: CostPerSpin,
    pub daily_limit: i32,
    pub cooldown_seconds: i64,
    pub is_active: bool,
    pub prizes: Vec<PrizeResponse>,
    pub created_at: DateTime<Utc>,
}

impl WheelResponse {
    pub fn from_parts(wheel: wheel_entity::Model, prizes: Vec<prize_entity::Model>) -> Self {
        WheelResponse {
            id: wheel.id,
            name: wheel.name,
            description: wheel.description,
            cost_per_spin: CostPerSpin {
                gems: wheel.cost_gems,
                tokens: wheel.cost_tokens,
            },
            daily_limit: wheel.daily_limit,
            cooldown_seconds: wheel.cooldown_seconds,
            is_active: wheel.is_active,
            prizes: prizes.into_iter().map(Into::into).collect(),
            created_at: wheel.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// 抽奖请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpinRequest {
    pub payment_method: PaymentMethod,
}

/// 抽中的奖品 (对用户隐藏概率等配置字段)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WonPrize {
    pub name: String,
    pub kind: PrizeKind,
    pub value: i64,
}

impl From<&prize_entity::Model> for WonPrize {
    fn from(m: &prize_entity::Model) -> Self {
        WonPrize {
            name: m.name.clone(),
            kind: m.kind,
            value: m.value,
        }
    }
}

/// 抽奖 (Spin) 响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinResponse {
    pub prize: WonPrize,
    /// 本次抽奖花费 (按支付方式的面额)
    pub cost: i64,
    pub payment_method: PaymentMethod,
    /// 支付科目在扣费与中奖入账后的余额
    pub balance_after: i64,
    /// 非致命降级提示 (履约失败 / 记录落库延迟), 抽奖本身已成交
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// 抽奖记录查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SpinRecordQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
}

/// 抽奖记录响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinRecordResponse {
    pub id: i64,
    pub wheel_id: i64,
    /// 奖品名称 (历史快照)
    pub prize_name: String,
    pub prize_kind: PrizeKind,
    pub prize_value: i64,
    pub cost: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl From<record_entity::Model> for SpinRecordResponse {
    fn from(m: record_entity::Model) -> Self {
        SpinRecordResponse {
            id: m.id,
            wheel_id: m.wheel_id,
            prize_name: m.prize_name,
            prize_kind: m.prize_kind,
            prize_value: m.prize_value,
            cost: m.cost,
            payment_method: m.payment_method,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// 抽奖记录分页响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinRecordPageResponse {
    pub data: Vec<SpinRecordResponse>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl SpinRecordPageResponse {
    pub fn new(data: Vec<SpinRecordResponse>, page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = (total + page_size - 1) / page_size.max(1);
        Self {
            data,
            page,
            page_size,
            total,
            total_pages,
        }
    }
}
