use std::path::PathBuf;

/// Process configuration, read once at startup from flags or the environment.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "backend", about = "Game sharing and virtual goods marketplace backend")]
pub struct Config {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
    /// PostgreSQL connection string; without it records live in memory.
    #[arg(long, env = "DB_URL")]
    pub db_url: Option<String>,
    /// Secret signing the session cookie.
    #[arg(long, env = "SESSION_SECRET", default_value = "defaultsecret", hide_env_values = true)]
    pub session_secret: String,
    /// Browser origin allowed to make credentialed cross-origin requests.
    #[arg(long, env = "CLIENT_ORIGIN")]
    pub client_origin: Option<String>,
    /// Directory receiving uploaded files.
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub uploads: PathBuf,
    /// HTTP worker threads.
    #[arg(long, env = "WORKERS", default_value_t = 6)]
    pub workers: usize,
    /// JSON file of catalog items to stock at startup.
    #[arg(long, env = "SEED_ITEMS")]
    pub seed: Option<PathBuf>,
}

impl Config {
    pub fn bind(&self) -> (&'static str, u16) {
        ("0.0.0.0", self.port)
    }
    /// Logs the settings that fell back to unsafe defaults.
    pub fn warn(&self) {
        if self.session_secret == "defaultsecret" {
            log::warn!("SESSION_SECRET not set, sessions are signed with the default secret");
        }
        if self.db_url.is_none() {
            log::warn!("DB_URL not set, records are kept in memory and lost on exit");
        }
        if self.client_origin.is_none() {
            log::warn!("CLIENT_ORIGIN not set, accepting requests from any origin");
        }
    }
}
