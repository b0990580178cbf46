use thiserror::Error;

use crate::error::AppError;
use crate::models::PrizeInput;

/// 启用奖品概率之和允许的偏差
pub const PROBABILITY_SUM_TOLERANCE: f64 = 0.01;

/// 转盘配置校验错误; 校验不通过的配置不会落库
#[derive(Debug, Error, PartialEq)]
pub enum WheelConfigError {
    #[error("Wheel must have at least one active prize")]
    EmptyPrizeList,

    #[error("Total probability of active prizes must equal 100 (got {0})")]
    InvalidProbabilitySum(f64),

    #[error("Prize '{0}' has a negative value")]
    NegativeValue(String),

    #[error("Prize '{0}' probability must be within [0, 100] (got {1})")]
    ProbabilityOutOfRange(String, f64),

    #[error("Daily limit must be at least 1")]
    InvalidDailyLimit,

    #[error("Cooldown seconds must not be negative")]
    InvalidCooldown,

    #[error("Cost per spin must be at least 1")]
    InvalidCost,
}

impl From<WheelConfigError> for AppError {
    fn from(e: WheelConfigError) -> Self {
        AppError::ValidationError(e.to_string())
    }
}

/// 校验奖品配置:
/// - 每个奖品数额非负, 概率在 [0, 100] 内
/// - 至少一个启用奖品
/// - 启用奖品概率之和为 100(±0.01); 停用奖品不计入
pub fn validate_prizes(prizes: &[PrizeInput]) -> Result<(), WheelConfigError> {
    for prize in prizes {
        if prize.value < 0 {
            return Err(WheelConfigError::NegativeValue(prize.name.clone()));
        }
        if !prize.probability.is_finite() || !(0.0..=100.0).contains(&prize.probability) {
            return Err(WheelConfigError::ProbabilityOutOfRange(
                prize.name.clone(),
                prize.probability,
            ));
        }
    }

    let total: f64 = prizes
        .iter()
        .filter(|p| p.is_active)
        .map(|p| p.probability)
        .sum();
    if !prizes.iter().any(|p| p.is_active) {
        return Err(WheelConfigError::EmptyPrizeList);
    }
    if (total - 100.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(WheelConfigError::InvalidProbabilitySum(total));
    }

    Ok(())
}

/// 校验价格与限流配置
pub fn validate_limits(
    cost_gems: i64,
    cost_tokens: i64,
    daily_limit: i32,
    cooldown_seconds: i64,
) -> Result<(), WheelConfigError> {
    if cost_gems < 1 || cost_tokens < 1 {
        return Err(WheelConfigError::InvalidCost);
    }
    if daily_limit < 1 {
        return Err(WheelConfigError::InvalidDailyLimit);
    }
    if cooldown_seconds < 0 {
        return Err(WheelConfigError::InvalidCooldown);
    }
    Ok(())
}
