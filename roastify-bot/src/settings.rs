use std::net::SocketAddr;

const DEFAULT_STATUS_PORT: u16 = 8080;

/// Process-level settings. Policy knobs live in `roastify_app::config`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_token: String,
    pub database_url: Option<String>,
    pub status_addr: SocketAddr,
}

impl Settings {
    pub fn from_env() -> Self {
        let bot_token = std::env::var("BOT_TOKEN").expect("BOT_TOKEN must be set");
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            bot_token,
            database_url,
            status_addr: parse_addr(std::env::var("STATUS_ADDR").ok().as_deref()),
        }
    }
}

fn parse_addr(raw: Option<&str>) -> SocketAddr {
    let default = || SocketAddr::from(([0, 0, 0, 0], DEFAULT_STATUS_PORT));
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable STATUS_ADDR={:?}", raw);
            default()
        }),
        None => default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_addr_falls_back_to_default() {
        assert_eq!(parse_addr(None).port(), 8080);
        assert_eq!(parse_addr(Some("not an address")).port(), 8080);
        assert_eq!(parse_addr(Some("127.0.0.1:9000")).to_string(), "127.0.0.1:9000");
    }
}
