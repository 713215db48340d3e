use db::{DBService, DbErr};

pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;

/// Process-wide state handed to every handler. Owns the database service;
/// constructed once at startup and torn down with the process.
#[derive(Clone)]
pub struct Deployment {
    db: DBService,
}

impl Deployment {
    pub async fn new() -> Result<Self, DbErr> {
        Ok(Self {
            db: DBService::new().await?,
        })
    }

    pub fn from_db(db: DBService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }
}
