#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Bearer token for the funding routes; `None` leaves them open.
    pub auth_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            auth_token: std::env::var("AUTH_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
        }
    }
}
