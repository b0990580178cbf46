pub mod fulfillment;

pub use fulfillment::WebhookFulfillment;
