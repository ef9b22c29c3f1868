use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use clap::Parser;

#[derive(Parser, Clone, Debug)]
#[command(name = "divines-api", about = "Reservation API backed by MongoDB")]
pub struct Config {
    /// MongoDB connection string, e.g. mongodb://localhost:27017
    #[clap(env, long)]
    pub database_url: Option<String>,

    #[clap(env, long)]
    pub database_name: Option<String>,

    #[clap(env, long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[clap(env, long, default_value_t = 8000)]
    pub port: u16,

    /// Upper bound on MongoDB server selection before a request fails
    #[clap(env, long, default_value_t = 5)]
    pub database_timeout_secs: u64,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database_timeout_secs)
    }

    pub fn has_database_url(&self) -> bool {
        is_set(&self.database_url)
    }

    pub fn has_database_name(&self) -> bool {
        is_set(&self.database_name)
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces_port_8000() {
        let config = Config::try_parse_from(["divines-api"]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.database_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn blank_database_settings_count_as_unset() {
        let config = Config::try_parse_from([
            "divines-api",
            "--database-url",
            "mongodb://localhost:27017",
            "--database-name",
            "  ",
            "--port",
            "9100",
        ])
        .unwrap();
        assert!(config.has_database_url());
        assert!(!config.has_database_name());
        assert_eq!(config.port, 9100);
    }
}
