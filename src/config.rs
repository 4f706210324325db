use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use url::Url;

/// Football match prediction proxy and dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "matchday-predictions", version, about)]
pub struct Config {
    /// Dashboard and proxy listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Prediction API base URL (the `/api/v1/matches/today/` path is appended)
    #[arg(long, env = "PREDICTIONS_API_URL")]
    pub upstream_url: String,

    /// Prediction API token, sent as `Authorization: Token <token>`
    #[arg(long, env = "PREDICTIONS_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// URL the view polls for predictions. Defaults to this server's own
    /// `/api/predictions` endpoint.
    #[arg(long, env = "PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Team logo URL template; `{slug}` is replaced by the team slug
    #[arg(
        long,
        env = "LOGO_URL_TEMPLATE",
        default_value = "https://media.api-sports.io/football/teams/{slug}.png"
    )]
    pub logo_url_template: String,

    /// Seconds between scheduled view refreshes
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value = "86400")]
    pub refresh_interval_secs: u64,

    /// Timeout for every outbound HTTP request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_token.trim().is_empty() {
            anyhow::bail!("PREDICTIONS_API_TOKEN must not be empty");
        }
        if Url::parse(&self.upstream_url).is_err() {
            anyhow::bail!("PREDICTIONS_API_URL is not a valid URL: {}", self.upstream_url);
        }
        if let Some(proxy_url) = &self.proxy_url {
            if Url::parse(proxy_url).is_err() {
                anyhow::bail!("PROXY_URL is not a valid URL: {}", proxy_url);
            }
        }
        if !self.logo_url_template.contains("{slug}") {
            anyhow::bail!("logo_url_template must contain a {{slug}} placeholder");
        }
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be positive");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        self.listen_socket_addr()?;
        Ok(())
    }

    pub fn listen_socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {}: {}", self.listen_addr, e))
    }

    /// The endpoint the view polls. When no explicit proxy URL is set, this is
    /// the local server's `/api/predictions`, with an unspecified bind address
    /// (0.0.0.0 / ::) swapped for loopback.
    pub fn resolved_proxy_url(&self) -> anyhow::Result<Url> {
        if let Some(proxy_url) = &self.proxy_url {
            return Ok(Url::parse(proxy_url)?);
        }
        let mut addr = self.listen_socket_addr()?;
        if addr.ip().is_unspecified() {
            addr.set_ip(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        Ok(Url::parse(&format!("http://{}/api/predictions", addr))?)
    }
}
