use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::user_balance_entity as balances;
use crate::error::{AppError, AppResult};
use crate::models::{BalanceResponse, Currency};

/// 账务接口。
/// - debit: 余额检查与扣减必须是单条原子操作, 并发扣费不可能双双成功超出余额
/// - credit: 金额非负时总是成功
/// 两者都拒绝负数金额 (InvalidAmount); 金额一律为整数 (cash 以美分计)
pub trait SpendLedger: Clone + Send + Sync + 'static {
    async fn debit(&self, user_id: i64, currency: Currency, amount: i64) -> AppResult<i64>;
    async fn credit(&self, user_id: i64, currency: Currency, amount: i64) -> AppResult<i64>;
}

pub(crate) fn check_amount(amount: i64) -> AppResult<()> {
    if amount < 0 {
        return Err(AppError::InvalidAmount(format!(
            "Amount must not be negative (got {amount})"
        )));
    }
    Ok(())
}

fn currency_column(currency: Currency) -> balances::Column {
    match currency {
        Currency::Gems => balances::Column::Gems,
        Currency::Tokens => balances::Column::Tokens,
        Currency::Cash => balances::Column::CashCents,
    }
}

/// 基于 user_balances 表的账务实现。
/// 扣费使用条件更新 (where 科目 >= 金额) 一步完成检查与扣减,
/// 跨实例并发下同样不会把余额扣成负数。
#[derive(Clone)]
pub struct PgSpendLedger {
    pool: DatabaseConnection,
}

impl PgSpendLedger {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 查询用户余额 (不存在则初始化为全 0)
    pub async fn snapshot(&self, user_id: i64) -> AppResult<BalanceResponse> {
        let model = self.ensure_account(user_id).await?;
        Ok(model.into())
    }

    async fn ensure_account(&self, user_id: i64) -> AppResult<balances::Model> {
        if let Some(m) = balances::Entity::find()
            .filter(balances::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
        {
            return Ok(m);
        }
        let m = balances::ActiveModel {
            user_id: Set(user_id),
            gems: Set(0),
            tokens: Set(0),
            cash_cents: Set(0),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(m)
    }

    async fn read_balance(&self, user_id: i64, currency: Currency) -> AppResult<i64> {
        let model = balances::Entity::find()
            .filter(balances::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Balance account missing for user {user_id}"))
            })?;
        Ok(match currency {
            Currency::Gems => model.gems,
            Currency::Tokens => model.tokens,
            Currency::Cash => model.cash_cents,
        })
    }
}

impl SpendLedger for PgSpendLedger {
    async fn debit(&self, user_id: i64, currency: Currency, amount: i64) -> AppResult<i64> {
        check_amount(amount)?;
        self.ensure_account(user_id).await?;

        let column = currency_column(currency);

        // 原子条件扣减: 只有余额足够时才会命中行
        let result = balances::Entity::update_many()
            .col_expr(column, Expr::col(column).sub(amount))
            .col_expr(balances::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(balances::Column::UserId.eq(user_id))
            .filter(Expr::col(column).gte(amount))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::InsufficientFunds { currency });
        }

        self.read_balance(user_id, currency).await
    }

    async fn credit(&self, user_id: i64, currency: Currency, amount: i64) -> AppResult<i64> {
        check_amount(amount)?;
        self.ensure_account(user_id).await?;

        let column = currency_column(currency);

        balances::Entity::update_many()
            .col_expr(column, Expr::col(column).add(amount))
            .col_expr(balances::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(balances::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;

        self.read_balance(user_id, currency).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(matches!(
            check_amount(-1),
            Err(AppError::InvalidAmount(_))
        ));
        assert!(check_amount(0).is_ok());
        assert!(check_amount(100).is_ok());
    }
}
