/// Which persistence gateway backs the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local stores; contents are lost on restart.
    Memory,
    /// PostgreSQL through `skiadmin-db`.
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

impl StorageBackend {
    /// Short name reported by the health endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres { .. } => "postgres",
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Selected storage backend (default: in-memory).
    pub storage: StorageBackend,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `STORAGE_BACKEND`      | `memory`                   |
    /// | `DATABASE_URL`         | required for `postgres`    |
    /// | `DB_MAX_CONNECTIONS`   | `10`                       |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let storage = Self::storage_from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage,
        }
    }

    fn storage_from_env() -> StorageBackend {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "memory".into());

        match backend.trim().to_ascii_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "postgres" => {
                let database_url = std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
                let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".into())
                    .parse()
                    .expect("DB_MAX_CONNECTIONS must be a valid u32");
                StorageBackend::Postgres {
                    database_url,
                    max_connections,
                }
            }
            other => panic!("STORAGE_BACKEND must be 'memory' or 'postgres', got '{other}'"),
        }
    }
}
