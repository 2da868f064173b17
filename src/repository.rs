// 💾 SQLite-backed pensioner repository

use crate::clients::PensionerRepository;
use crate::db::save_pensioner;
use crate::entities::PensionerDetail;
use crate::error::{ProcessPensionError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Actor recorded in the audit trail for saves made by the request path
const ACTOR: &str = "process_pension_service";

#[derive(Clone)]
pub struct SqlitePensionerRepository {
    db: Arc<Mutex<Connection>>,
}

impl SqlitePensionerRepository {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PensionerRepository for SqlitePensionerRepository {
    async fn save(&self, record: &PensionerDetail) -> Result<PensionerDetail> {
        let conn = self
            .db
            .lock()
            .map_err(|_| ProcessPensionError::Persistence(anyhow!("Database lock poisoned")))?;

        save_pensioner(&conn, record, ACTOR).map_err(ProcessPensionError::Persistence)
    }
}
