pub mod admin;
pub mod balance;
pub mod wheel;

pub use admin::admin_config;
pub use balance::balance_config;
pub use wheel::wheel_config;
