//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "kinoteka";
const ENV_PREFIX: &str = "KINOTEKA";
const DEFAULT_PROJECT_NAME: &str = "movies";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_ELASTIC_URL: &str = "http://127.0.0.1:9200";
const DEFAULT_ELASTIC_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;
const DEFAULT_CACHE_MEMORY_CAPACITY: usize = 10_000;

/// Command-line arguments for the kinoteka binary.
#[derive(Debug, Parser)]
#[command(name = "kinoteka", version, about = "Film catalogue API")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "KINOTEKA_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP API.
    Serve(Box<ServeArgs>),
    /// Create the search indices that do not exist yet.
    #[command(name = "ensure-indices")]
    EnsureIndices(EnsureIndicesArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct EnsureIndicesArgs {
    #[command(flatten)]
    pub elastic: ElasticOverride,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ElasticOverride {
    /// Override the Elasticsearch base URL.
    #[arg(long = "elastic-url", value_name = "URL")]
    pub elastic_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub elastic: ElasticOverride,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the Redis connection URL.
    #[arg(long = "redis-url", value_name = "URL")]
    pub redis_url: Option<String>,

    /// Select the cache backend.
    #[arg(long = "cache-backend", value_name = "BACKEND")]
    pub cache_backend: Option<CacheBackend>,

    /// Override the cache entry lifetime.
    #[arg(long = "cache-ttl-seconds", value_name = "SECONDS")]
    pub cache_ttl_seconds: Option<u64>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_name: String,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub elastic: ElasticSettings,
    pub redis: RedisSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct ElasticSettings {
    pub url: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Memory,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    pub ttl: Duration,
    pub memory_capacity: usize,
    pub fail_open: bool,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::EnsureIndices(args)) => raw.apply_elastic_override(&args.elastic),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    project_name: Option<String>,
    server: RawServerSettings,
    logging: RawLoggingSettings,
    elastic: RawElasticSettings,
    redis: RawRedisSettings,
    cache: RawCacheSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.redis_url.as_ref() {
            self.redis.url = Some(url.clone());
        }
        if let Some(backend) = overrides.cache_backend {
            self.cache.backend = Some(backend);
        }
        if let Some(seconds) = overrides.cache_ttl_seconds {
            self.cache.ttl_seconds = Some(seconds);
        }

        self.apply_elastic_override(&overrides.elastic);
    }

    fn apply_elastic_override(&mut self, overrides: &ElasticOverride) {
        if let Some(url) = overrides.elastic_url.as_ref() {
            self.elastic.url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            project_name,
            server,
            logging,
            elastic,
            redis,
            cache,
        } = raw;

        let project_name = non_empty(project_name)
            .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());

        Ok(Self {
            project_name,
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            elastic: build_elastic_settings(elastic)?,
            redis: build_redis_settings(redis)?,
            cache: build_cache_settings(cache)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = non_empty(server.host).unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_elastic_settings(elastic: RawElasticSettings) -> Result<ElasticSettings, LoadError> {
    let url = non_empty(elastic.url).unwrap_or_else(|| DEFAULT_ELASTIC_URL.to_string());
    url::Url::parse(&url)
        .map_err(|err| LoadError::invalid("elastic.url", format!("invalid url: {err}")))?;

    let timeout_secs = elastic
        .request_timeout_seconds
        .unwrap_or(DEFAULT_ELASTIC_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "elastic.request_timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ElasticSettings {
        url,
        request_timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_redis_settings(redis: RawRedisSettings) -> Result<RedisSettings, LoadError> {
    let url = non_empty(redis.url).unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());
    let parsed = url::Url::parse(&url)
        .map_err(|err| LoadError::invalid("redis.url", format!("invalid url: {err}")))?;
    if !matches!(parsed.scheme(), "redis" | "rediss") {
        return Err(LoadError::invalid(
            "redis.url",
            format!("unsupported scheme `{}`", parsed.scheme()),
        ));
    }

    Ok(RedisSettings { url })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let ttl_secs = cache.ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS);
    if ttl_secs == 0 {
        return Err(LoadError::invalid(
            "cache.ttl_seconds",
            "must be greater than zero",
        ));
    }
    if ttl_secs > MAX_CACHE_TTL_SECS {
        return Err(LoadError::invalid(
            "cache.ttl_seconds",
            format!("must not exceed {MAX_CACHE_TTL_SECS} seconds"),
        ));
    }

    let memory_capacity = cache
        .memory_capacity
        .unwrap_or(DEFAULT_CACHE_MEMORY_CAPACITY);
    if memory_capacity == 0 {
        return Err(LoadError::invalid(
            "cache.memory_capacity",
            "must be greater than zero",
        ));
    }

    Ok(CacheSettings {
        backend: cache.backend.unwrap_or(CacheBackend::Redis),
        ttl: Duration::from_secs(ttl_secs),
        memory_capacity,
        fail_open: cache.fail_open.unwrap_or(true),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawElasticSettings {
    url: Option<String>,
    request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRedisSettings {
    url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    backend: Option<CacheBackend>,
    ttl_seconds: Option<u64>,
    memory_capacity: Option<usize>,
    fail_open: Option<bool>,
}
