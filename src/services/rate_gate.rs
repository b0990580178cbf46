use chrono::{DateTime, Days, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::entities::spin_record_entity as records;
use crate::error::{AppError, AppResult};

/// 限流门控: 每日上限 + 冷却间隔, 判定依据只有抽奖记录日志。
///
/// "预留" 由 WheelService 的用户级串行锁保证: 检查与记录写入在同一把锁内
/// 完成, 并发请求不可能都在对方落库前通过检查。
pub trait RateGate: Clone + Send + Sync + 'static {
    async fn check_and_reserve(
        &self,
        user_id: i64,
        wheel_id: i64,
        daily_limit: i32,
        cooldown_seconds: i64,
        now: DateTime<Utc>,
    ) -> AppResult<()>;
}

/// 当日零点 (UTC 自然日为每日上限的统计口径)
pub fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}

fn seconds_until_next_utc_day(now: DateTime<Utc>) -> i64 {
    let next_day = (now.date_naive() + Days::new(1))
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();
    (next_day - now).num_seconds().max(1)
}

/// 纯判定逻辑: 先判每日上限, 再判冷却。
/// 拒绝时返回精确剩余秒数 (展示层再取整到分钟)。
pub fn evaluate_gate(
    spins_today: u64,
    last_spin_at: Option<DateTime<Utc>>,
    daily_limit: i32,
    cooldown_seconds: i64,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if spins_today >= daily_limit.max(0) as u64 {
        return Err(AppError::RateLimited {
            retry_after_secs: seconds_until_next_utc_day(now),
        });
    }

    if cooldown_seconds > 0
        && let Some(last) = last_spin_at
    {
        let elapsed = (now - last).num_seconds();
        if elapsed < cooldown_seconds {
            return Err(AppError::RateLimited {
                retry_after_secs: cooldown_seconds - elapsed,
            });
        }
    }

    Ok(())
}

/// 基于 spin_records 表的门控实现 (落库持久化, 重启与多实例均不丢历史)
#[derive(Clone)]
pub struct PgRateGate {
    pool: DatabaseConnection,
}

impl PgRateGate {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

impl RateGate for PgRateGate {
    async fn check_and_reserve(
        &self,
        user_id: i64,
        wheel_id: i64,
        daily_limit: i32,
        cooldown_seconds: i64,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let day_start = start_of_utc_day(now);

        let spins_today = records::Entity::find()
            .filter(records::Column::UserId.eq(user_id))
            .filter(records::Column::WheelId.eq(wheel_id))
            .filter(records::Column::CreatedAt.gte(day_start))
            .count(&self.pool)
            .await?;

        let last_spin_at = records::Entity::find()
            .filter(records::Column::UserId.eq(user_id))
            .filter(records::Column::WheelId.eq(wheel_id))
            .order_by_desc(records::Column::CreatedAt)
            .one(&self.pool)
            .await?
            .and_then(|m| m.created_at);

        evaluate_gate(spins_today, last_spin_at, daily_limit, cooldown_seconds, now)
    }
}
