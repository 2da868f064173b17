// 🧾 Pensioner audit trail
//
// One row per save, keyed by identity number. Each row records the pay inputs
// before and after the save so salary or pension-type corrections stay visible
// after the upsert has overwritten the record.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    /// First save for this identity number
    Created,
    /// Save over an existing record
    Updated,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Updated => "updated",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "created" => Ok(AuditAction::Created),
            "updated" => Ok(AuditAction::Updated),
            other => bail!("Unknown audit action '{}'", other),
        }
    }
}

/// Pay inputs of a stored pensioner at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayInputs {
    pub salary: f64,
    pub allowance: f64,
    pub pension_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub audit_id: String,
    pub aadhaar_number: String,
    pub action: AuditAction,
    pub actor: String,
    pub recorded_at: DateTime<Utc>,
    /// `None` for the first save
    pub before: Option<PayInputs>,
    pub after: PayInputs,
}

impl AuditEntry {
    /// Entry for a save that replaces `before` (if any) with `after`
    pub fn for_save(aadhaar_number: &str, actor: &str, before: Option<PayInputs>, after: PayInputs) -> Self {
        let action = if before.is_some() {
            AuditAction::Updated
        } else {
            AuditAction::Created
        };

        AuditEntry {
            audit_id: uuid::Uuid::new_v4().to_string(),
            aadhaar_number: aadhaar_number.to_string(),
            action,
            actor: actor.to_string(),
            recorded_at: Utc::now(),
            before,
            after,
        }
    }

    /// True when the save changed salary, allowance or pension type
    pub fn changed_pay(&self) -> bool {
        self.before.as_ref() != Some(&self.after)
    }
}

pub fn setup_audit_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS pensioner_audit (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            audit_id TEXT UNIQUE NOT NULL,
            aadhaar_number TEXT NOT NULL,
            action TEXT NOT NULL,
            actor TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            salary_before REAL,
            allowance_before REAL,
            pension_type_before TEXT,
            salary_after REAL NOT NULL,
            allowance_after REAL NOT NULL,
            pension_type_after TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_pensioner_audit_aadhaar ON pensioner_audit(aadhaar_number)",
        [],
    )?;

    Ok(())
}

/// Pay inputs currently stored for an identity number
pub fn current_pay_inputs(conn: &Connection, aadhaar_number: &str) -> Result<Option<PayInputs>> {
    let inputs = conn
        .query_row(
            "SELECT salary, allowance, pension_type FROM pensioner_details WHERE aadhaar_number = ?1",
            params![aadhaar_number],
            |row| {
                Ok(PayInputs {
                    salary: row.get(0)?,
                    allowance: row.get(1)?,
                    pension_type: row.get(2)?,
                })
            },
        )
        .optional()?;

    Ok(inputs)
}

pub fn record_audit(conn: &Connection, entry: &AuditEntry) -> Result<()> {
    let before = entry.before.as_ref();

    conn.execute(
        "INSERT INTO pensioner_audit (
            audit_id, aadhaar_number, action, actor, recorded_at,
            salary_before, allowance_before, pension_type_before,
            salary_after, allowance_after, pension_type_after
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            entry.audit_id,
            entry.aadhaar_number,
            entry.action.as_str(),
            entry.actor,
            entry.recorded_at.to_rfc3339(),
            before.map(|b| b.salary),
            before.map(|b| b.allowance),
            before.and_then(|b| b.pension_type.clone()),
            entry.after.salary,
            entry.after.allowance,
            entry.after.pension_type,
        ],
    )?;

    Ok(())
}

/// Audit entries for one pensioner, newest first
pub fn get_audit_trail(conn: &Connection, aadhaar_number: &str) -> Result<Vec<AuditEntry>> {
    let mut stmt = conn.prepare(
        "SELECT audit_id, aadhaar_number, action, actor, recorded_at,
                salary_before, allowance_before, pension_type_before,
                salary_after, allowance_after, pension_type_after
         FROM pensioner_audit
         WHERE aadhaar_number = ?1
         ORDER BY id DESC",
    )?;

    let rows = stmt
        .query_map(params![aadhaar_number], |row| {
            let salary_before: Option<f64> = row.get(5)?;
            let allowance_before: Option<f64> = row.get(6)?;
            let before = match (salary_before, allowance_before) {
                (Some(salary), Some(allowance)) => Some(PayInputs {
                    salary,
                    allowance,
                    pension_type: row.get(7)?,
                }),
                _ => None,
            };

            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                before,
                PayInputs {
                    salary: row.get(8)?,
                    allowance: row.get(9)?,
                    pension_type: row.get(10)?,
                },
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(audit_id, aadhaar_number, action, actor, recorded_at, before, after)| {
            Ok(AuditEntry {
                audit_id,
                aadhaar_number,
                action: AuditAction::parse(&action)?,
                actor,
                recorded_at: DateTime::parse_from_rfc3339(&recorded_at)?.with_timezone(&Utc),
                before,
                after,
            })
        })
        .collect()
}
