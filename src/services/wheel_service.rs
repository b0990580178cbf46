use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::entities::{
    PaymentMethod, PrizeKind, spin_record_entity as records, wheel_entity as wheels,
    wheel_prize_entity as prizes,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    PaginationParams, SpinRecordQuery, SpinRecordPageResponse, SpinResponse, WonPrize,
};
use crate::services::{SpendLedger, allocator, rate_gate::RateGate};

/// 锁表超过该规模时清理无人持有的槽位
const LOCK_SWEEP_THRESHOLD: usize = 1024;

/// 待落库的抽奖记录 (奖品字段为落库时的快照)
#[derive(Debug, Clone)]
pub struct NewSpinRecord {
    pub user_id: i64,
    pub wheel_id: i64,
    pub prize_name: String,
    pub prize_kind: PrizeKind,
    pub prize_value: i64,
    pub cost: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// 转盘与抽奖记录的存储接口
pub trait WheelStore: Clone + Send + Sync + 'static {
    async fn find_wheel(
        &self,
        wheel_id: i64,
    ) -> AppResult<Option<(wheels::Model, Vec<prizes::Model>)>>;

    /// 追加一条抽奖记录 (只追加, 永不更新)
    async fn append_record(&self, record: NewSpinRecord) -> AppResult<()>;

    async fn list_records(
        &self,
        user_id: i64,
        wheel_id: i64,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<records::Model>, u64)>;
}

/// 非货币奖品 (item / discount) 的履约回调。
/// 尽力而为: 失败不回滚已成交的抽奖, 只降级为警告。
pub trait Fulfillment: Clone + Send + Sync + 'static {
    async fn fulfill(&self, user_id: i64, prize: &WonPrize) -> AppResult<()>;
}

/// 基于 sea-orm 的转盘存储实现
#[derive(Clone)]
pub struct PgWheelStore {
    pool: DatabaseConnection,
}

impl PgWheelStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

impl WheelStore for PgWheelStore {
    async fn find_wheel(
        &self,
        wheel_id: i64,
    ) -> AppResult<Option<(wheels::Model, Vec<prizes::Model>)>> {
        let Some(wheel) = wheels::Entity::find_by_id(wheel_id).one(&self.pool).await? else {
            return Ok(None);
        };

        // id 升序 = 配置声明顺序, 分桶语义依赖该顺序
        let prize_list = prizes::Entity::find()
            .filter(prizes::Column::WheelId.eq(wheel_id))
            .order_by_asc(prizes::Column::Id)
            .all(&self.pool)
            .await?;

        Ok(Some((wheel, prize_list)))
    }

    async fn append_record(&self, record: NewSpinRecord) -> AppResult<()> {
        records::ActiveModel {
            user_id: Set(record.user_id),
            wheel_id: Set(record.wheel_id),
            prize_name: Set(record.prize_name),
            prize_kind: Set(record.prize_kind),
            prize_value: Set(record.prize_value),
            cost: Set(record.cost),
            payment_method: Set(record.payment_method),
            created_at: Set(Some(record.created_at)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_records(
        &self,
        user_id: i64,
        wheel_id: i64,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<records::Model>, u64)> {
        let base_query = records::Entity::find()
            .filter(records::Column::UserId.eq(user_id))
            .filter(records::Column::WheelId.eq(wheel_id));

        let total = base_query.clone().count(&self.pool).await?;

        let items = base_query
            .order_by_desc(records::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.pool)
            .await?;

        Ok((items, total))
    }
}

/// 抽奖编排服务。
///
/// 单次抽奖流程: 查转盘 → 限流门控 → 扣费 → 分桶选奖 → 发奖 → 写记录。
/// 门控与扣费失败在任何资金变动前中止; 扣费成功后本次抽奖即视为成交,
/// 之后的发奖 / 落库失败只记录对账日志并降级为警告, 不退款不回滚。
#[derive(Clone)]
pub struct WheelService<S, L, G, F> {
    store: S,
    ledger: L,
    gate: G,
    fulfillment: F,
    /// 用户级互斥锁: 同一用户的 门控→扣费→写记录 串行执行 (不同用户互不影响)
    user_locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl<S, L, G, F> WheelService<S, L, G, F>
where
    S: WheelStore,
    L: SpendLedger,
    G: RateGate,
    F: Fulfillment,
{
    pub fn new(store: S, ledger: L, gate: G, fulfillment: F) -> Self {
        Self {
            store,
            ledger,
            gate,
            fulfillment,
            user_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn user_lock(&self, user_id: i64) -> OwnedMutexGuard<()> {
        let slot = {
            let mut locks = self.user_locks.lock().await;
            if locks.len() > LOCK_SWEEP_THRESHOLD {
                locks.retain(|_, m| Arc::strong_count(m) > 1);
            }
            locks
                .entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        slot.lock_owned().await
    }

    /// 进行一次抽奖 (随机源为服务端 thread_rng, 客户端无法影响)
    pub async fn spin(
        &self,
        user_id: i64,
        wheel_id: i64,
        payment_method: PaymentMethod,
    ) -> AppResult<SpinResponse> {
        let roll = allocator::draw_roll();
        self.spin_with_roll(user_id, wheel_id, payment_method, Utc::now(), roll)
            .await
    }

    async fn spin_with_roll(
        &self,
        user_id: i64,
        wheel_id: i64,
        payment_method: PaymentMethod,
        now: DateTime<Utc>,
        roll: f64,
    ) -> AppResult<SpinResponse> {
        let _guard = self.user_lock(user_id).await;

        let (wheel, prize_list) = self
            .store
            .find_wheel(wheel_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Wheel not found".to_string()))?;
        if !wheel.is_active {
            return Err(AppError::NotFound("Wheel not found or inactive".to_string()));
        }

        self.gate
            .check_and_reserve(user_id, wheel_id, wheel.daily_limit, wheel.cooldown_seconds, now)
            .await?;

        let cost = match payment_method {
            PaymentMethod::Gems => wheel.cost_gems,
            PaymentMethod::Tokens => wheel.cost_tokens,
        };
        let mut balance_after = self
            .ledger
            .debit(user_id, payment_method.currency(), cost)
            .await?;

        // 扣费成功, 本次抽奖已成交; 之后的失败只降级, 不回滚
        let prize = allocator::select_prize(&prize_list, roll)
            .ok_or_else(|| AppError::InternalError("No active prizes configured".to_string()))?
            .clone();
        let won = WonPrize::from(&prize);
        let mut warning: Option<String> = None;

        match prize.kind.payout_currency() {
            Some(currency) => match self.ledger.credit(user_id, currency, prize.value).await {
                Ok(new_balance) => {
                    if currency == payment_method.currency() {
                        balance_after = new_balance;
                    }
                }
                Err(e) => {
                    log::error!(
                        "Prize credit failed, needs reconciliation: user={user_id} wheel={wheel_id} prize={} err={e}",
                        prize.name
                    );
                    warning =
                        Some("Prize payout is delayed and will be credited shortly".to_string());
                }
            },
            None => {
                if let Err(e) = self.fulfillment.fulfill(user_id, &won).await {
                    log::warn!(
                        "Prize fulfillment failed (non-fatal): user={user_id} wheel={wheel_id} prize={} err={e}",
                        prize.name
                    );
                    warning = Some("Prize fulfillment is pending".to_string());
                }
            }
        }

        let record = NewSpinRecord {
            user_id,
            wheel_id,
            prize_name: prize.name.clone(),
            prize_kind: prize.kind,
            prize_value: prize.value,
            cost,
            payment_method,
            created_at: now,
        };
        if let Err(e) = self.store.append_record(record).await {
            // 已扣费但记录未落库: 留对账日志; 不向用户报错, 避免客户端重试造成二次扣费
            log::error!(
                "Spin record append failed, needs reconciliation: user={user_id} wheel={wheel_id} prize={} err={e}",
                prize.name
            );
            warning = Some("Spin completed; history record is delayed".to_string());
        }

        Ok(SpinResponse {
            prize: won,
            cost,
            payment_method,
            balance_after,
            warning,
        })
    }

    /// 分页获取用户在某转盘的抽奖记录 (倒序)
    pub async fn list_records(
        &self,
        user_id: i64,
        wheel_id: i64,
        query: &SpinRecordQuery,
    ) -> AppResult<SpinRecordPageResponse> {
        let params = PaginationParams::new(query.page, query.per_page);
        let offset = params.get_offset();
        let limit = params.get_limit();

        let (items, total) = self
            .store
            .list_records(user_id, wheel_id, offset as u64, limit as u64)
            .await?;

        Ok(SpinRecordPageResponse::new(
            items.into_iter().map(Into::into).collect(),
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(20),
            total as i64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use crate::services::rate_gate::{evaluate_gate, start_of_utc_day};
    use chrono::Duration;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

    fn make_wheel(daily_limit: i32, cooldown_seconds: i64) -> wheels::Model {
        wheels::Model {
            id: 1,
            name: "Starter Wheel".to_string(),
            description: "test wheel".to_string(),
            cost_gems: 10,
            cost_tokens: 5,
            daily_limit,
            cooldown_seconds,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn make_prize(id: i64, name: &str, kind: PrizeKind, value: i64, probability: f64) -> prizes::Model {
        prizes::Model {
            id,
            wheel_id: 1,
            name: name.to_string(),
            kind,
            value,
            probability,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn sample_prizes() -> Vec<prizes::Model> {
        vec![
            make_prize(1, "10 Gems", PrizeKind::Gems, 10, 70.0),
            make_prize(2, "5 Tokens", PrizeKind::Tokens, 5, 25.0),
            make_prize(3, "$1 Cash", PrizeKind::Cash, 100, 5.0),
        ]
    }

    #[derive(Clone)]
    struct FakeStore {
        wheel: wheels::Model,
        prizes: Vec<prizes::Model>,
        records: Arc<StdMutex<Vec<records::Model>>>,
        next_id: Arc<AtomicI64>,
        fail_append: Arc<AtomicBool>,
    }

    impl FakeStore {
        fn new(wheel: wheels::Model, prizes: Vec<prizes::Model>) -> Self {
            Self {
                wheel,
                prizes,
                records: Arc::new(StdMutex::new(Vec::new())),
                next_id: Arc::new(AtomicI64::new(1)),
                fail_append: Arc::new(AtomicBool::new(false)),
            }
        }

        fn seed_record(&self, user_id: i64, created_at: DateTime<Utc>) {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.records.lock().unwrap().push(records::Model {
                id,
                user_id,
                wheel_id: self.wheel.id,
                prize_name: "seed".to_string(),
                prize_kind: PrizeKind::Gems,
                prize_value: 0,
                cost: 10,
                payment_method: PaymentMethod::Gems,
                created_at: Some(created_at),
            });
        }

        fn record_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    impl WheelStore for FakeStore {
        async fn find_wheel(
            &self,
            wheel_id: i64,
        ) -> AppResult<Option<(wheels::Model, Vec<prizes::Model>)>> {
            if wheel_id != self.wheel.id {
                return Ok(None);
            }
            Ok(Some((self.wheel.clone(), self.prizes.clone())))
        }

        async fn append_record(&self, record: NewSpinRecord) -> AppResult<()> {
            if self.fail_append.load(Ordering::SeqCst) {
                return Err(AppError::InternalError("storage unavailable".to_string()));
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.records.lock().unwrap().push(records::Model {
                id,
                user_id: record.user_id,
                wheel_id: record.wheel_id,
                prize_name: record.prize_name,
                prize_kind: record.prize_kind,
                prize_value: record.prize_value,
                cost: record.cost,
                payment_method: record.payment_method,
                created_at: Some(record.created_at),
            });
            Ok(())
        }

        async fn list_records(
            &self,
            user_id: i64,
            wheel_id: i64,
            offset: u64,
            limit: u64,
        ) -> AppResult<(Vec<records::Model>, u64)> {
            let mut items: Vec<records::Model> = self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id && r.wheel_id == wheel_id)
                .cloned()
                .collect();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let total = items.len() as u64;
            let items = items
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
            Ok((items, total))
        }
    }

    /// 与 FakeStore 共享记录, 判定逻辑复用 evaluate_gate
    #[derive(Clone)]
    struct FakeGate {
        records: Arc<StdMutex<Vec<records::Model>>>,
    }

    impl RateGate for FakeGate {
        async fn check_and_reserve(
            &self,
            user_id: i64,
            wheel_id: i64,
            daily_limit: i32,
            cooldown_seconds: i64,
            now: DateTime<Utc>,
        ) -> AppResult<()> {
            let day_start = start_of_utc_day(now);
            let records = self.records.lock().unwrap();
            let spins_today = records
                .iter()
                .filter(|r| {
                    r.user_id == user_id
                        && r.wheel_id == wheel_id
                        && r.created_at.is_some_and(|t| t >= day_start)
                })
                .count() as u64;
            let last_spin_at = records
                .iter()
                .filter(|r| r.user_id == user_id && r.wheel_id == wheel_id)
                .filter_map(|r| r.created_at)
                .max();
            evaluate_gate(spins_today, last_spin_at, daily_limit, cooldown_seconds, now)
        }
    }

    #[derive(Clone)]
    struct FakeLedger {
        balances: Arc<StdMutex<HashMap<(i64, Currency), i64>>>,
    }

    impl FakeLedger {
        fn with_balance(user_id: i64, currency: Currency, amount: i64) -> Self {
            let ledger = Self {
                balances: Arc::new(StdMutex::new(HashMap::new())),
            };
            ledger.balances.lock().unwrap().insert((user_id, currency), amount);
            ledger
        }

        fn balance(&self, user_id: i64, currency: Currency) -> i64 {
            *self
                .balances
                .lock()
                .unwrap()
                .get(&(user_id, currency))
                .unwrap_or(&0)
        }
    }

    impl SpendLedger for FakeLedger {
        async fn debit(&self, user_id: i64, currency: Currency, amount: i64) -> AppResult<i64> {
            let mut balances = self.balances.lock().unwrap();
            let entry = balances.entry((user_id, currency)).or_insert(0);
            if *entry < amount {
                return Err(AppError::InsufficientFunds { currency });
            }
            *entry -= amount;
            Ok(*entry)
        }

        async fn credit(&self, user_id: i64, currency: Currency, amount: i64) -> AppResult<i64> {
            let mut balances = self.balances.lock().unwrap();
            let entry = balances.entry((user_id, currency)).or_insert(0);
            *entry += amount;
            Ok(*entry)
        }
    }

    #[derive(Clone)]
    struct FakeFulfillment {
        fail: Arc<AtomicBool>,
        calls: Arc<StdMutex<Vec<(i64, String)>>>,
    }

    impl FakeFulfillment {
        fn new() -> Self {
            Self {
                fail: Arc::new(AtomicBool::new(false)),
                calls: Arc::new(StdMutex::new(Vec::new())),
            }
        }
    }

    impl Fulfillment for FakeFulfillment {
        async fn fulfill(&self, user_id: i64, prize: &WonPrize) -> AppResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::ExternalApiError("fulfillment down".to_string()));
            }
            self.calls.lock().unwrap().push((user_id, prize.name.clone()));
            Ok(())
        }
    }

    type TestService = WheelService<FakeStore, FakeLedger, FakeGate, FakeFulfillment>;

    fn make_service(
        wheel: wheels::Model,
        prizes: Vec<prizes::Model>,
        ledger: FakeLedger,
    ) -> (TestService, FakeStore, FakeFulfillment) {
        let store = FakeStore::new(wheel, prizes);
        let gate = FakeGate {
            records: store.records.clone(),
        };
        let fulfillment = FakeFulfillment::new();
        let service = WheelService::new(store.clone(), ledger, gate, fulfillment.clone());
        (service, store, fulfillment)
    }

    #[tokio::test]
    async fn spin_settles_balances_and_appends_record() {
        // 余额 50, 花费 10, roll=50 命中 10 gems 奖品 -> 余额回到 50
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 50);
        let (service, store, _) = make_service(make_wheel(10, 0), sample_prizes(), ledger.clone());

        let resp = service
            .spin_with_roll(7, 1, PaymentMethod::Gems, Utc::now(), 50.0)
            .await
            .unwrap();

        assert_eq!(resp.prize.name, "10 Gems");
        assert_eq!(resp.prize.kind, PrizeKind::Gems);
        assert_eq!(resp.cost, 10);
        assert_eq!(resp.balance_after, 50);
        assert!(resp.warning.is_none());
        assert_eq!(ledger.balance(7, Currency::Gems), 50);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn cash_prize_credits_cash_account() {
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 50);
        let (service, store, _) = make_service(make_wheel(10, 0), sample_prizes(), ledger.clone());

        let resp = service
            .spin_with_roll(7, 1, PaymentMethod::Gems, Utc::now(), 99.0)
            .await
            .unwrap();

        assert_eq!(resp.prize.kind, PrizeKind::Cash);
        // 支付科目只被扣费, 奖金进了现金科目
        assert_eq!(resp.balance_after, 40);
        assert_eq!(ledger.balance(7, Currency::Cash), 100);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn insufficient_funds_aborts_without_side_effects() {
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 5);
        let (service, store, _) = make_service(make_wheel(10, 0), sample_prizes(), ledger.clone());

        let err = service
            .spin_with_roll(7, 1, PaymentMethod::Gems, Utc::now(), 50.0)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientFunds { .. }));
        assert_eq!(ledger.balance(7, Currency::Gems), 5);
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn cooldown_rejection_reports_remaining_seconds() {
        // 2 分钟前抽过, 冷却 300 秒 -> 剩余 180 秒, 无任何资金变动
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 50);
        let (service, store, _) = make_service(make_wheel(10, 300), sample_prizes(), ledger.clone());
        let now = Utc::now();
        store.seed_record(7, now - Duration::minutes(2));

        let err = service
            .spin_with_roll(7, 1, PaymentMethod::Gems, now, 50.0)
            .await
            .unwrap_err();

        match err {
            AppError::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, 180),
            other => panic!("expected RateLimited, got {other:?}"),
        }
        assert_eq!(ledger.balance(7, Currency::Gems), 50);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn daily_limit_one_admits_exactly_one_of_two_concurrent_spins() {
        let prizes = vec![make_prize(1, "Sticker", PrizeKind::Item, 1, 100.0)];
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 100);
        let (service, store, _) = make_service(make_wheel(1, 0), prizes, ledger.clone());

        let s1 = service.clone();
        let s2 = service.clone();
        let h1 = tokio::spawn(async move { s1.spin(7, 1, PaymentMethod::Gems).await });
        let h2 = tokio::spawn(async move { s2.spin(7, 1, PaymentMethod::Gems).await });
        let r1 = h1.await.unwrap();
        let r2 = h2.await.unwrap();

        let successes = [&r1, &r2].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one of two concurrent spins may win the gate");
        let rejected = [r1, r2].into_iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(rejected, Err(AppError::RateLimited { .. })));

        assert_eq!(store.record_count(), 1);
        assert_eq!(ledger.balance(7, Currency::Gems), 90);
    }

    #[tokio::test]
    async fn spins_stop_once_balance_is_exhausted() {
        // 余额 25, 花费 10, 奖品不回充余额 -> 只有 floor(25/10)=2 次成功
        let prizes = vec![make_prize(1, "Sticker", PrizeKind::Item, 1, 100.0)];
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 25);
        let (service, store, _) = make_service(make_wheel(10, 0), prizes, ledger.clone());

        assert!(service.spin(7, 1, PaymentMethod::Gems).await.is_ok());
        assert!(service.spin(7, 1, PaymentMethod::Gems).await.is_ok());
        let err = service.spin(7, 1, PaymentMethod::Gems).await.unwrap_err();

        assert!(matches!(err, AppError::InsufficientFunds { .. }));
        assert_eq!(ledger.balance(7, Currency::Gems), 5);
        assert_eq!(store.record_count(), 2);
    }

    #[tokio::test]
    async fn record_append_failure_degrades_to_warning() {
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 50);
        let (service, store, _) = make_service(make_wheel(10, 0), sample_prizes(), ledger.clone());
        store.fail_append.store(true, Ordering::SeqCst);

        let resp = service
            .spin_with_roll(7, 1, PaymentMethod::Gems, Utc::now(), 50.0)
            .await
            .unwrap();

        // 扣费生效, 记录缺失只降级为警告
        assert!(resp.warning.is_some());
        assert_eq!(ledger.balance(7, Currency::Gems), 50);
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn fulfillment_failure_is_nonfatal() {
        let prizes = vec![make_prize(1, "Sticker", PrizeKind::Item, 1, 100.0)];
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 50);
        let (service, store, fulfillment) = make_service(make_wheel(10, 0), prizes, ledger.clone());
        fulfillment.fail.store(true, Ordering::SeqCst);

        let resp = service
            .spin_with_roll(7, 1, PaymentMethod::Gems, Utc::now(), 50.0)
            .await
            .unwrap();

        assert!(resp.warning.is_some());
        assert_eq!(ledger.balance(7, Currency::Gems), 40);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn item_prize_invokes_fulfillment_hook() {
        let prizes = vec![make_prize(1, "Sticker", PrizeKind::Item, 42, 100.0)];
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 50);
        let (service, _, fulfillment) = make_service(make_wheel(10, 0), prizes, ledger);

        let resp = service
            .spin_with_roll(7, 1, PaymentMethod::Gems, Utc::now(), 50.0)
            .await
            .unwrap();

        assert!(resp.warning.is_none());
        let calls = fulfillment.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[(7, "Sticker".to_string())]);
    }

    #[tokio::test]
    async fn inactive_or_unknown_wheel_is_not_found() {
        let mut wheel = make_wheel(10, 0);
        wheel.is_active = false;
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 50);
        let (service, _, _) = make_service(wheel, sample_prizes(), ledger.clone());

        let err = service.spin(7, 1, PaymentMethod::Gems).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.spin(7, 99, PaymentMethod::Gems).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(ledger.balance(7, Currency::Gems), 50);
    }

    #[tokio::test]
    async fn list_records_paginates_newest_first() {
        let ledger = FakeLedger::with_balance(7, Currency::Gems, 1000);
        let (service, store, _) = make_service(make_wheel(100, 0), sample_prizes(), ledger);
        let now = Utc::now();
        for i in 0..5 {
            store.seed_record(7, now - Duration::minutes(10 - i));
        }

        let page = service
            .list_records(
                7,
                1,
                &SpinRecordQuery {
                    page: Some(1),
                    per_page: Some(2),
                },
            )
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data.len(), 2);
        assert!(page.data[0].created_at >= page.data[1].created_at);
    }
}
