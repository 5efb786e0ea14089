use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppEnv {
    pub app_port: u16,
    pub api_prefix: String,
    pub db: DbConfig,
    pub jwt: JwtConfig,
    pub rate_limit_per_second: usize,
}

#[derive(Debug, Clone)]
pub struct DbUri(pub String);

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub uri: DbUri,
    pub pool_size: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_token: String,
    pub refresh_token: String,
    pub token_expires_in_seconds: i64,
    pub refresh_token_expires_in_seconds: i64,
}

impl AppEnv {
    pub fn new() -> anyhow::Result<Self> {
        dotenv().ok();

        Ok(Self {
            app_port: Self::get_env("APP_PORT", 5000),
            api_prefix: Self::get_str_env("API_PREFIX", "api"),
            db: DbConfig {
                uri: DbUri(Self::required("DATABASE_URL")?),
                pool_size: Self::get_env("DB_POOL_SIZE", 10),
            },
            jwt: JwtConfig {
                jwt_token: Self::required("AUTH_JWT_SECRET")?,
                refresh_token: Self::required("AUTH_REFRESH_SECRET")?,
                token_expires_in_seconds: Self::get_env("AUTH_JWT_TOKEN_EXPIRES_IN", 86_400), // a day
                refresh_token_expires_in_seconds: Self::get_env(
                    "AUTH_REFRESH_TOKEN_EXPIRES_IN",
                    2_592_000, // 30 days
                ),
            },
            rate_limit_per_second: Self::get_env("RATE_LIMIT_PER_SECOND", 50),
        })
    }

    fn required(var: &str) -> anyhow::Result<String> {
        env::var(var).with_context(|| format!("{var} must be set"))
    }

    fn get_env<T: FromStr>(var: &str, default: T) -> T {
        env::var(var)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_str_env(var: &str, default: &str) -> String {
        env::var(var)
            .ok()
            .map(|v| v.trim().trim_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}
