//! PostgreSQL containers for adapter tests
//!
//! Each [`TestDatabase`] owns a throwaway `postgres:16-alpine` container with
//! the embedded migrations applied. Docker must be available.

use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

use infra_db::{create_pool, run_migrations, DatabaseConfig, DatabasePool};

const IMAGE: &str = "postgres";
const TAG: &str = "16-alpine";
const USER: &str = "eventhub";
const PASSWORD: &str = "eventhub";
const DATABASE: &str = "eventhub_test";
const READY_LINE: &str = "database system is ready to accept connections";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Connection URL for the test credentials on the given host and port
pub fn connection_url(host: &str, port: u16) -> String {
    format!("postgres://{USER}:{PASSWORD}@{host}:{port}/{DATABASE}")
}

/// A migrated database that lives as long as this value
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pool: DatabasePool,
}

impl TestDatabase {
    /// Starts the container, connects and applies migrations
    pub async fn start() -> Result<Self, BoxError> {
        let container = GenericImage::new(IMAGE, TAG)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(READY_LINE))
            .with_env_var("POSTGRES_USER", USER)
            .with_env_var("POSTGRES_PASSWORD", PASSWORD)
            .with_env_var("POSTGRES_DB", DATABASE)
            .start()
            .await?;

        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(5432).await?;

        let pool = create_pool(DatabaseConfig::new(connection_url(&host, port)).max_connections(5))
            .await?;
        run_migrations(&pool).await?;

        Ok(Self {
            _container: container,
            pool,
        })
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

/// Declares a test that runs against its own [`TestDatabase`]
///
/// ```rust,ignore
/// db_test!(#[ignore] inserts_user, |pool| {
///     let store = PostgresCredentialStore::new(pool.clone());
///     store.insert_user("a@x.com", "digest").await.unwrap();
/// });
/// ```
#[macro_export]
macro_rules! db_test {
    ($(#[$meta:meta])* $name:ident, |$pool:ident| $body:block) => {
        $(#[$meta])*
        #[tokio::test]
        async fn $name() {
            let db = $crate::database::TestDatabase::start()
                .await
                .expect("Failed to start test database");
            let $pool = db.pool();
            $body
        }
    };
}

/// Assertions on raw query results
pub trait DatabaseTestAssertions {
    fn assert_rows_affected(&self, expected: u64);
}

impl DatabaseTestAssertions for sqlx::postgres::PgQueryResult {
    fn assert_rows_affected(&self, expected: u64) {
        assert_eq!(
            self.rows_affected(),
            expected,
            "expected {} rows affected, got {}",
            expected,
            self.rows_affected()
        );
    }
}
