use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::{wheel_entity as wheels, wheel_prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::{CreateWheelRequest, PrizeInput, UpdateWheelRequest, WheelResponse};
use crate::services::prize_table;

/// 转盘配置管理 (管理端)。
/// 所有写操作先校验后入库, 校验不通过的配置不会产生任何写入。
#[derive(Clone)]
pub struct WheelAdminService {
    pool: DatabaseConnection,
}

impl WheelAdminService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 创建转盘及其奖品 (单事务)
    pub async fn create_wheel(&self, req: CreateWheelRequest) -> AppResult<WheelResponse> {
        prize_table::validate_limits(
            req.cost_per_spin.gems,
            req.cost_per_spin.tokens,
            req.daily_limit,
            req.cooldown_seconds,
        )?;
        prize_table::validate_prizes(&req.prizes)?;

        let txn = self.pool.begin().await?;

        let wheel = wheels::ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            cost_gems: Set(req.cost_per_spin.gems),
            cost_tokens: Set(req.cost_per_spin.tokens),
            daily_limit: Set(req.daily_limit),
            cooldown_seconds: Set(req.cooldown_seconds),
            is_active: Set(true),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let prize_models = insert_prizes(&txn, wheel.id, &req.prizes).await?;

        txn.commit().await?;

        log::info!("Wheel created: id={} name={}", wheel.id, wheel.name);
        Ok(WheelResponse::from_parts(wheel, prize_models))
    }

    /// 更新转盘; prizes 提供时整组替换 (删除旧奖品后按声明顺序重建)
    pub async fn update_wheel(
        &self,
        wheel_id: i64,
        req: UpdateWheelRequest,
    ) -> AppResult<WheelResponse> {
        let current = wheels::Entity::find_by_id(wheel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Wheel not found".to_string()))?;

        let cost_gems = req.cost_per_spin.map_or(current.cost_gems, |c| c.gems);
        let cost_tokens = req.cost_per_spin.map_or(current.cost_tokens, |c| c.tokens);
        let daily_limit = req.daily_limit.unwrap_or(current.daily_limit);
        let cooldown_seconds = req.cooldown_seconds.unwrap_or(current.cooldown_seconds);
        prize_table::validate_limits(cost_gems, cost_tokens, daily_limit, cooldown_seconds)?;
        if let Some(prize_inputs) = &req.prizes {
            prize_table::validate_prizes(prize_inputs)?;
        }

        let txn = self.pool.begin().await?;

        let mut active: wheels::ActiveModel = current.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(description) = req.description {
            active.description = Set(description);
        }
        active.cost_gems = Set(cost_gems);
        active.cost_tokens = Set(cost_tokens);
        active.daily_limit = Set(daily_limit);
        active.cooldown_seconds = Set(cooldown_seconds);
        if let Some(is_active) = req.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));
        let wheel = active.update(&txn).await?;

        let prize_models = match req.prizes {
            Some(prize_inputs) => {
                prizes::Entity::delete_many()
                    .filter(prizes::Column::WheelId.eq(wheel_id))
                    .exec(&txn)
                    .await?;
                insert_prizes(&txn, wheel_id, &prize_inputs).await?
            }
            None => {
                prizes::Entity::find()
                    .filter(prizes::Column::WheelId.eq(wheel_id))
                    .order_by_asc(prizes::Column::Id)
                    .all(&txn)
                    .await?
            }
        };

        txn.commit().await?;

        log::info!("Wheel updated: id={} name={}", wheel.id, wheel.name);
        Ok(WheelResponse::from_parts(wheel, prize_models))
    }

    /// 列出上架中的转盘 (用户端)
    pub async fn list_active(&self) -> AppResult<Vec<WheelResponse>> {
        self.list(true).await
    }

    /// 列出全部转盘, 含已下架 (管理端)
    pub async fn list_all(&self) -> AppResult<Vec<WheelResponse>> {
        self.list(false).await
    }

    async fn list(&self, active_only: bool) -> AppResult<Vec<WheelResponse>> {
        let mut query = wheels::Entity::find().order_by_asc(wheels::Column::Id);
        if active_only {
            query = query.filter(wheels::Column::IsActive.eq(true));
        }
        let wheel_list = query.all(&self.pool).await?;

        let mut responses = Vec::with_capacity(wheel_list.len());
        for wheel in wheel_list {
            let prize_list = prizes::Entity::find()
                .filter(prizes::Column::WheelId.eq(wheel.id))
                .order_by_asc(prizes::Column::Id)
                .all(&self.pool)
                .await?;
            responses.push(WheelResponse::from_parts(wheel, prize_list));
        }
        Ok(responses)
    }

    /// 获取单个上架转盘详情 (用户端; 下架转盘视同不存在)
    pub async fn get_active(&self, wheel_id: i64) -> AppResult<WheelResponse> {
        let wheel = wheels::Entity::find_by_id(wheel_id)
            .one(&self.pool)
            .await?
            .filter(|w| w.is_active)
            .ok_or_else(|| AppError::NotFound("Wheel not found".to_string()))?;

        let prize_list = prizes::Entity::find()
            .filter(prizes::Column::WheelId.eq(wheel.id))
            .order_by_asc(prizes::Column::Id)
            .all(&self.pool)
            .await?;

        Ok(WheelResponse::from_parts(wheel, prize_list))
    }
}

/// 按声明顺序插入奖品, id 升序即分桶顺序
async fn insert_prizes(
    txn: &sea_orm::DatabaseTransaction,
    wheel_id: i64,
    inputs: &[PrizeInput],
) -> AppResult<Vec<prizes::Model>> {
    let mut models = Vec::with_capacity(inputs.len());
    for input in inputs {
        let model = prizes::ActiveModel {
            wheel_id: Set(wheel_id),
            name: Set(input.name.clone()),
            kind: Set(input.kind),
            value: Set(input.value),
            probability: Set(input.probability),
            is_active: Set(input.is_active),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        models.push(model);
    }
    Ok(models)
}
