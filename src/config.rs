use clap::{Args, Parser};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "LINKBOARD_DATABASE_URL")]
    pub database_url: String,

    /// Redis connection URL for the session store
    #[arg(long, env = "LINKBOARD_REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub auth: AuthConfig,

    #[command(flatten)]
    pub session: SessionConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "LINKBOARD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "LINKBOARD_PORT", default_value_t = 3000)]
    pub port: u16,

    /// How long to wait for in-flight requests on shutdown
    #[arg(long, env = "LINKBOARD_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,

    /// Emit logs as JSON instead of human-readable lines
    #[arg(long, env = "LINKBOARD_JSON_LOGS", default_value_t = false)]
    pub json_logs: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AuthConfig {
    /// Secret key for JWT signing
    #[arg(long, env = "LINKBOARD_JWT_SECRET")]
    pub jwt_secret: String,

    /// Access token time-to-live in seconds
    #[arg(long, env = "LINKBOARD_ACCESS_TOKEN_TTL_SECS", default_value_t = 900)]
    pub access_token_ttl_secs: u64,

    /// Refresh token time-to-live in days
    #[arg(long, env = "LINKBOARD_REFRESH_TOKEN_TTL_DAYS", default_value_t = 7)]
    pub refresh_token_ttl_days: i64,

    /// bcrypt work factor for password hashing
    #[arg(long, env = "LINKBOARD_BCRYPT_COST", default_value_t = 10)]
    pub bcrypt_cost: u32,
}

#[derive(Clone, Debug, Args)]
pub struct SessionConfig {
    /// Lifetime of remember-me sessions in days
    #[arg(long, env = "LINKBOARD_SESSION_TTL_DAYS", default_value_t = 7)]
    pub session_ttl_days: i64,

    /// Set the Secure attribute on the session cookie (enable behind TLS)
    #[arg(long, env = "LINKBOARD_COOKIE_SECURE", default_value_t = false)]
    pub cookie_secure: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed for standard endpoints
    #[arg(long, env = "LINKBOARD_RATE_LIMIT_PER_SECOND", default_value_t = 10)]
    pub per_second: u32,

    /// Burst allowance for standard endpoints
    #[arg(long, env = "LINKBOARD_RATE_LIMIT_BURST", default_value_t = 20)]
    pub burst: u32,

    /// Stricter rate limit for expensive auth-related endpoints (register/login/refresh)
    #[arg(long, env = "LINKBOARD_AUTH_RATE_LIMIT_PER_SECOND", default_value_t = 1)]
    pub auth_per_second: u32,

    /// Burst allowance for expensive auth-related endpoints
    #[arg(long, env = "LINKBOARD_AUTH_RATE_LIMIT_BURST", default_value_t = 3)]
    pub auth_burst: u32,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
