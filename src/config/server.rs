use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use validator::Validate;

use super::ParseError;
use crate::util::figment::FigmentErrorAttachable;
use crate::util::validator::IntoValidatorReport;
use crate::util::Sensitive;

#[derive(Debug, Deserialize, Validate)]
pub struct Server {
    /// Address the HTTP server binds to.
    ///
    /// **Environment variables**:
    /// - `PANEL_IP`
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// Port the HTTP server binds to.
    ///
    /// **Environment variables**:
    /// - `PANEL_PORT` or `PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// Amount of runtime worker threads.
    ///
    /// **Environment variables**:
    /// - `PANEL_WORKERS`
    #[serde(default = "Server::default_workers")]
    pub workers: usize,
    /// The single browser origin allowed to call this API.
    ///
    /// **Environment variables**:
    /// - `PANEL_ALLOWED_ORIGIN` or `CLIENT_URL`
    #[serde(default = "Server::default_allowed_origin")]
    #[validate(url(message = "Invalid allowed origin URL"))]
    pub allowed_origin: String,
    /// Secret key used for signing and verifying session tokens. There is
    /// no fallback value: deployments without it must fail to start.
    ///
    /// **Environment variables**:
    /// - `PANEL_JWT_SECRET` or `JWT_SECRET`
    #[validate(length(min = 12, max = 1024, message = "Invalid JWT secret key"))]
    pub jwt_secret: Sensitive<String>,
    /// Password given to the default administrator account on first start.
    ///
    /// **Environment variables**:
    /// - `PANEL_INITIAL_ADMIN_PASSWORD`
    #[serde(default = "Server::default_initial_admin_password")]
    pub initial_admin_password: Sensitive<String>,
    #[validate]
    pub db: super::Database,
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "panel.toml";

    /// Creates the default [`Figment`](figment::Figment) object used to
    /// load server configuration. Split out so tests can extract from it
    /// directly.
    pub(crate) fn figment() -> figment::Figment {
        use figment::providers::{Env, Format, Toml};
        use figment::Figment;

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // Fields with an underscore in their name cannot go through the
            // plain underscore-to-dot mapping below.
            .merge(Env::prefixed("PANEL_").map(|v| match v.as_str() {
                "DB_MIN_IDLE" => "db.min_idle".into(),
                "DB_POOL_SIZE" => "db.pool_size".into(),
                "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),
                "ALLOWED_ORIGIN" => "allowed_origin".into(),
                "JWT_SECRET" => "jwt_secret".into(),
                "INITIAL_ADMIN_PASSWORD" => "initial_admin_password".into(),
                _ => v.as_str().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(Env::raw().map(|v| match v.as_str() {
                "DATABASE_URL" => "db.url".into(),
                "JWT_SECRET" => "jwt_secret".into(),
                "CLIENT_URL" => "allowed_origin".into(),
                "PORT" => "port".into(),
                _ => v.into(),
            }))
    }

    const fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        5001
    }

    fn default_workers() -> usize {
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }

    fn default_allowed_origin() -> String {
        "http://localhost:3000".to_string()
    }

    fn default_initial_admin_password() -> Sensitive<String> {
        Sensitive::new("admin123".to_string())
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use std::num::{NonZeroU32, NonZeroU64};

        Self {
            ip: Self::default_ip(),
            port: Self::default_port(),
            workers: 1,
            allowed_origin: Self::default_allowed_origin(),
            jwt_secret: Sensitive::new("panel-test-signing-key-0123456789".to_string()),
            initial_admin_password: Self::default_initial_admin_password(),
            db: super::Database {
                min_idle: None,
                pool_size: NonZeroU32::new(2).expect("nonzero"),
                timeout_secs: NonZeroU64::new(1).expect("nonzero"),
                url: Sensitive::new("postgres://postgres@localhost/panel_test".to_string()),
            },
        }
    }
}
