pub mod balance;
pub mod pagination;
pub mod wheel;

pub use balance::*;
pub use pagination::*;
pub use wheel::*;
