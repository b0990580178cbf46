use std::time::Duration;

use serde_json::json;

use crate::config::FulfillmentConfig;
use crate::error::{AppError, AppResult};
use crate::models::WonPrize;
use crate::services::Fulfillment;

/// 通过 HTTP webhook 通知外部履约服务发放实物 / 折扣奖品。
/// base_url 未配置时为空操作 (中奖记录仍然落库, 供后续人工履约)。
#[derive(Clone)]
pub struct WebhookFulfillment {
    client: reqwest::Client,
    config: FulfillmentConfig,
}

impl WebhookFulfillment {
    pub fn new(config: FulfillmentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }
}

impl Fulfillment for WebhookFulfillment {
    async fn fulfill(&self, user_id: i64, prize: &WonPrize) -> AppResult<()> {
        if self.config.base_url.is_empty() {
            log::info!(
                "Fulfillment service not configured, skipping webhook: user={user_id} prize={}",
                prize.name
            );
            return Ok(());
        }

        let url = format!("{}/fulfillments", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "user_id": user_id,
                "prize_name": prize.name,
                "prize_kind": prize.kind,
                "value": prize.value,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Fulfillment webhook returned status {}",
                response.status()
            )));
        }

        log::info!("Fulfillment webhook delivered: user={user_id} prize={}", prize.name);
        Ok(())
    }
}
