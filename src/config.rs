use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub fulfillment: FulfillmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 实物 / 折扣类奖品的外部履约服务; base_url 为空表示未接入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_fulfillment_timeout")]
    pub timeout_seconds: u64,
}

fn default_fulfillment_timeout() -> u64 {
    10
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: default_fulfillment_timeout(),
        }
    }
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 优先读配置文件, 不存在时完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .with_context(|| format!("Failed to parse config file {config_path}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 无配置文件时数据库 URL 必须由环境变量提供
                let database_url = get_env("DATABASE_URL").context(
                    "DATABASE_URL environment variable is required when config.toml is missing",
                )?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    fulfillment: FulfillmentConfig {
                        base_url: get_env("FULFILLMENT_BASE_URL").unwrap_or_default(),
                        timeout_seconds: get_env_parse("FULFILLMENT_TIMEOUT_SECONDS", 10u64),
                    },
                }
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config file {config_path}"));
            }
        };

        // 环境变量覆盖 (即便文件存在时也生效)
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("FULFILLMENT_BASE_URL") {
            config.fulfillment.base_url = v;
        }
        if let Ok(v) = env::var("FULFILLMENT_TIMEOUT_SECONDS")
            && let Ok(n) = v.parse()
        {
            config.fulfillment.timeout_seconds = n;
        }

        Ok(config)
    }
}
