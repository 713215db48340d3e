use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub use sea_orm::DbErr;

pub mod entities;
pub mod models;
pub mod types;

const DEFAULT_DATABASE_URL: &str = "sqlite://hearth.sqlite?mode=rwc";

#[derive(Clone)]
pub struct DBService {
    pub pool: DatabaseConnection,
}

impl DBService {
    /// Connects to `DATABASE_URL` (or a local sqlite file when unset) and
    /// brings the schema up to date.
    pub async fn new() -> Result<DBService, DbErr> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self::connect(&database_url).await
    }

    pub async fn connect(database_url: &str) -> Result<DBService, DbErr> {
        let pool = Database::connect(database_url).await?;
        db_migration::Migrator::up(&pool, None).await?;
        tracing::debug!("database ready");
        Ok(DBService { pool })
    }
}
