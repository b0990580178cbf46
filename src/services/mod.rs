pub mod allocator;
pub mod ledger;
pub mod prize_table;
pub mod rate_gate;
pub mod wheel_admin_service;
pub mod wheel_service;

pub use ledger::{PgSpendLedger, SpendLedger};
pub use rate_gate::{PgRateGate, RateGate};
pub use wheel_admin_service::WheelAdminService;
pub use wheel_service::{Fulfillment, PgWheelStore, WheelService, WheelStore};

/// 生产环境装配的抽奖服务类型
pub type AppWheelService = WheelService<
    PgWheelStore,
    PgSpendLedger,
    PgRateGate,
    crate::external::WebhookFulfillment,
>;
