use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

/// Wheels (转盘配置表)
#[derive(DeriveIden)]
enum Wheels {
    Table,
    Id,
    Name,
    Description,
    CostGems,
    CostTokens,
    DailyLimit,
    CooldownSeconds,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

/// Wheel Prizes (奖品配置表)
#[derive(DeriveIden)]
enum WheelPrizes {
    Table,
    Id,
    WheelId,
    Name,
    Kind,
    Value,
    Probability,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

/// User Balances (用户余额账户)
#[derive(DeriveIden)]
enum UserBalances {
    Table,
    Id,
    UserId,
    Gems,
    Tokens,
    CashCents,
    CreatedAt,
    UpdatedAt,
}

/// Spin Records (抽奖记录, 只追加)
#[derive(DeriveIden)]
enum SpinRecords {
    Table,
    Id,
    UserId,
    WheelId,
    PrizeName,
    PrizeKind,
    PrizeValue,
    Cost,
    PaymentMethod,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 概率使用百分比 (double), 同一转盘启用奖品之和必须为 100(±0.01), 由服务层校验。
/// 奖品分桶顺序 = id 升序（即创建时的声明顺序）, 属于转盘语义的一部分。
///
/// 初始种子转盘 (Starter Wheel):
/// - 10 Gems     70%
/// - 5 Tokens    25%
/// - $1 Cash      5%
/// 单次花费 10 gems 或 5 tokens, 每日 10 次, 冷却 300 秒
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 枚举类型
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("prize_kind"))
                    .values(vec![
                        Alias::new("gems"),
                        Alias::new("tokens"),
                        Alias::new("item"),
                        Alias::new("discount"),
                        Alias::new("cash"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("payment_method"))
                    .values(vec![Alias::new("gems"), Alias::new("tokens")])
                    .to_owned(),
            )
            .await?;

        // 转盘配置表
        manager
            .create_table(
                Table::create()
                    .table(Wheels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wheels::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wheels::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Wheels::Description).text().not_null())
                    .col(ColumnDef::new(Wheels::CostGems).big_integer().not_null())
                    .col(ColumnDef::new(Wheels::CostTokens).big_integer().not_null())
                    .col(
                        ColumnDef::new(Wheels::DailyLimit)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(Wheels::CooldownSeconds)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Wheels::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Wheels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Wheels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wheels_active")
                    .table(Wheels::Table)
                    .col(Wheels::IsActive)
                    .to_owned(),
            )
            .await?;

        // 奖品表
        manager
            .create_table(
                Table::create()
                    .table(WheelPrizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WheelPrizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::WheelId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WheelPrizes::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(WheelPrizes::Kind)
                            .custom(Alias::new("prize_kind"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::Value)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(WheelPrizes::Probability).double().not_null())
                    .col(
                        ColumnDef::new(WheelPrizes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wheel_prizes_wheel")
                    .table(WheelPrizes::Table)
                    .col(WheelPrizes::WheelId)
                    .to_owned(),
            )
            .await?;

        // 用户余额表
        manager
            .create_table(
                Table::create()
                    .table(UserBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserBalances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserBalances::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserBalances::Gems)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserBalances::Tokens)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserBalances::CashCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserBalances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(UserBalances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // user_id 唯一索引（一个用户一条余额记录）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_balances_user_unique")
                    .table(UserBalances::Table)
                    .col(UserBalances::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 抽奖记录表
        manager
            .create_table(
                Table::create()
                    .table(SpinRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SpinRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SpinRecords::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(SpinRecords::WheelId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpinRecords::PrizeName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpinRecords::PrizeKind)
                            .custom(Alias::new("prize_kind"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpinRecords::PrizeValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SpinRecords::Cost).big_integer().not_null())
                    .col(
                        ColumnDef::new(SpinRecords::PaymentMethod)
                            .custom(Alias::new("payment_method"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpinRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 每日上限 / 冷却查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_spin_records_user_wheel_time")
                    .table(SpinRecords::Table)
                    .col(SpinRecords::UserId)
                    .col(SpinRecords::WheelId)
                    .col(SpinRecords::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 种子数据: 默认转盘与奖品
        let conn = manager.get_connection();
        conn.execute(Statement::from_string(
            manager.get_database_backend(),
            r#"
            INSERT INTO wheels (name, description, cost_gems, cost_tokens, daily_limit, cooldown_seconds, is_active)
            SELECT 'Starter Wheel', 'Default prize wheel', 10, 5, 10, 300, TRUE
            WHERE NOT EXISTS (SELECT 1 FROM wheels WHERE name = 'Starter Wheel');
            "#
            .to_string(),
        ))
        .await?;

        conn.execute(Statement::from_string(
            manager.get_database_backend(),
            r#"
            INSERT INTO wheel_prizes (wheel_id, name, kind, value, probability, is_active)
            SELECT w.id, p.name, p.kind::prize_kind, p.value, p.probability, TRUE
            FROM wheels w
            CROSS JOIN (VALUES
                ('10 Gems', 'gems', 10, 70.0),
                ('5 Tokens', 'tokens', 5, 25.0),
                ('$1 Cash', 'cash', 100, 5.0)
            ) AS p(name, kind, value, probability)
            WHERE w.name = 'Starter Wheel'
              AND NOT EXISTS (SELECT 1 FROM wheel_prizes wp WHERE wp.wheel_id = w.id);
            "#
            .to_string(),
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SpinRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WheelPrizes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wheels::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("payment_method")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("prize_kind")).to_owned())
            .await?;
        Ok(())
    }
}
