pub mod spin_records;
pub mod user_balances;
pub mod wheel_prizes;
pub mod wheels;

pub use spin_records as spin_record_entity;
pub use user_balances as user_balance_entity;
pub use wheel_prizes as wheel_prize_entity;
pub use wheels as wheel_entity;

pub use spin_records::PaymentMethod;
pub use wheel_prizes::PrizeKind;
