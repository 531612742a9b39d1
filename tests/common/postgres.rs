use retable::{config::DatabaseConfig, errors::ConnectError, postgres::PgClient};

use crate::common::load_test_env;

pub fn test_database_config() -> DatabaseConfig {
    load_test_env();
    DatabaseConfig {
        host: std::env::var("TEST_PG_HOST").unwrap_or("localhost".to_string()),
        port: std::env::var("TEST_PG_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5432),
        name: std::env::var("TEST_PG_DATABASE").unwrap_or("postgres".to_string()),
        user: std::env::var("TEST_PG_USER").unwrap_or("postgres".to_string()),
        password: std::env::var("TEST_PG_PASSWORD").unwrap_or("postgres".to_string()),
        ssl_mode: "disable".to_string(),
    }
}

pub async fn create_test_client() -> Result<PgClient, ConnectError> {
    PgClient::connect(&test_database_config()).await
}
