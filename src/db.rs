use crate::audit::{current_pay_inputs, record_audit, setup_audit_table, AuditEntry, PayInputs};
use crate::date_util::parse_date;
use crate::entities::{Bank, PensionAmountDetail, PensionerDetail};
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // ==========================================================================
    // Banks Table (one account per pensioner)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS banks (
            account_number INTEGER PRIMARY KEY,
            bank_name TEXT NOT NULL,
            bank_type TEXT
        )",
        [],
    )?;

    // ==========================================================================
    // Pensioner Details Table (keyed by identity number)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS pensioner_details (
            aadhaar_number TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            date_of_birth TEXT,
            pan TEXT NOT NULL,
            salary REAL NOT NULL,
            allowance REAL NOT NULL,
            pension_type TEXT,
            account_number INTEGER NOT NULL,
            bank_account_number INTEGER UNIQUE REFERENCES banks(account_number),
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Pension Amount Details Table (calculation breakdowns)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS pension_amount_details (
            aadhaar_number TEXT PRIMARY KEY NOT NULL,
            pension_amount REAL NOT NULL,
            bank_service_charge REAL NOT NULL,
            total_amount REAL NOT NULL,
            calculated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    setup_audit_table(conn)?;

    Ok(())
}

/// Upsert a pensioner record and its bank account, keyed by identity number.
///
/// Fails if the record has no identity number, or if its bank account is
/// already linked to a different pensioner.
pub fn save_pensioner(conn: &Connection, record: &PensionerDetail, actor: &str) -> Result<PensionerDetail> {
    let aadhaar = record
        .identity()
        .ok_or_else(|| anyhow!("Cannot save pensioner without an identity number"))?;

    let tx = conn.unchecked_transaction()?;
    let before = current_pay_inputs(&tx, aadhaar)?;

    if let Some(bank) = &record.bank {
        tx.execute(
            "INSERT INTO banks (account_number, bank_name, bank_type)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(account_number) DO UPDATE SET
                bank_name = excluded.bank_name,
                bank_type = excluded.bank_type",
            params![bank.account_number, bank.bank_name, bank.bank_type],
        )
        .context("Failed to save bank account")?;
    }

    tx.execute(
        "INSERT INTO pensioner_details (
            aadhaar_number, name, date_of_birth, pan, salary, allowance,
            pension_type, account_number, bank_account_number
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(aadhaar_number) DO UPDATE SET
            name = excluded.name,
            date_of_birth = excluded.date_of_birth,
            pan = excluded.pan,
            salary = excluded.salary,
            allowance = excluded.allowance,
            pension_type = excluded.pension_type,
            account_number = excluded.account_number,
            bank_account_number = excluded.bank_account_number,
            updated_at = CURRENT_TIMESTAMP",
        params![
            aadhaar,
            record.name,
            record.date_of_birth.map(|d| d.format(ISO_DATE_FORMAT).to_string()),
            record.pan,
            record.salary,
            record.allowance,
            record.pension_type,
            record.account_number,
            record.bank.as_ref().map(|b| b.account_number),
        ],
    )
    .with_context(|| format!("Failed to save pensioner {}", aadhaar))?;

    let entry = AuditEntry::for_save(
        aadhaar,
        actor,
        before,
        PayInputs {
            salary: record.salary,
            allowance: record.allowance,
            pension_type: record.pension_type.clone(),
        },
    );
    record_audit(&tx, &entry)?;

    tx.commit()?;

    Ok(record.clone())
}

/// Look up a stored pensioner with its bank account
pub fn get_pensioner(conn: &Connection, aadhaar_number: &str) -> Result<Option<PensionerDetail>> {
    let row = conn
        .query_row(
            "SELECT p.aadhaar_number, p.name, p.date_of_birth, p.pan, p.salary, p.allowance,
                    p.pension_type, p.account_number,
                    b.account_number, b.bank_name, b.bank_type
             FROM pensioner_details p
             LEFT JOIN banks b ON b.account_number = p.bank_account_number
             WHERE p.aadhaar_number = ?1",
            params![aadhaar_number],
            |row| {
                let date_of_birth: Option<String> = row.get(2)?;
                let bank_account: Option<i64> = row.get(8)?;
                let bank = match bank_account {
                    Some(account_number) => Some(Bank {
                        account_number,
                        bank_name: row.get(9)?,
                        bank_type: row.get(10)?,
                    }),
                    None => None,
                };

                Ok((
                    PensionerDetail {
                        aadhaar_number: row.get(0)?,
                        name: row.get(1)?,
                        date_of_birth: None,
                        pan: row.get(3)?,
                        salary: row.get(4)?,
                        allowance: row.get(5)?,
                        pension_type: row.get(6)?,
                        account_number: row.get(7)?,
                        bank,
                    },
                    date_of_birth,
                ))
            },
        )
        .optional()?;

    match row {
        Some((mut record, date_of_birth)) => {
            record.date_of_birth = date_of_birth.as_deref().map(parse_date).transpose()?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

pub fn count_pensioners(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM pensioner_details", [], |row| row.get(0))?;
    Ok(count)
}

/// Upsert a calculation breakdown, keyed by identity number
pub fn save_pension_amount_detail(conn: &Connection, detail: &PensionAmountDetail) -> Result<()> {
    conn.execute(
        "INSERT INTO pension_amount_details (
            aadhaar_number, pension_amount, bank_service_charge, total_amount
        ) VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(aadhaar_number) DO UPDATE SET
            pension_amount = excluded.pension_amount,
            bank_service_charge = excluded.bank_service_charge,
            total_amount = excluded.total_amount,
            calculated_at = CURRENT_TIMESTAMP",
        params![
            detail.aadhaar_number,
            detail.pension_amount,
            detail.bank_service_charge,
            detail.total_amount,
        ],
    )
    .context("Failed to save pension amount detail")?;

    Ok(())
}

pub fn get_pension_amount_detail(
    conn: &Connection,
    aadhaar_number: &str,
) -> Result<Option<PensionAmountDetail>> {
    let detail = conn
        .query_row(
            "SELECT aadhaar_number, pension_amount, bank_service_charge, total_amount
             FROM pension_amount_details
             WHERE aadhaar_number = ?1",
            params![aadhaar_number],
            |row| {
                Ok(PensionAmountDetail {
                    aadhaar_number: row.get(0)?,
                    pension_amount: row.get(1)?,
                    bank_service_charge: row.get(2)?,
                    total_amount: row.get(3)?,
                })
            },
        )
        .optional()?;

    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{get_audit_trail, AuditAction};
    use crate::entities::pensioner::fixtures::pensioner;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_save_and_load_pensioner() {
        let conn = test_db();
        let record = pensioner("self", "public");

        let saved = save_pensioner(&conn, &record, "test").unwrap();
        assert_eq!(saved.aadhaar_number, record.aadhaar_number);

        let loaded = get_pensioner(&conn, "123456789011").unwrap().unwrap();
        assert_eq!(loaded, record);

        println!("✅ Save/load pensioner test PASSED");
    }

    #[test]
    fn test_save_twice_is_an_upsert() {
        let conn = test_db();
        let mut record = pensioner("self", "public");

        save_pensioner(&conn, &record, "test").unwrap();
        record.salary = 120000.0;
        save_pensioner(&conn, &record, "test").unwrap();

        assert_eq!(count_pensioners(&conn).unwrap(), 1);
        let loaded = get_pensioner(&conn, "123456789011").unwrap().unwrap();
        assert_eq!(loaded.salary, 120000.0);

        let trail = get_audit_trail(&conn, "123456789011").unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].action, AuditAction::Updated);
        assert_eq!(trail[0].before.as_ref().map(|b| b.salary), Some(100000.0));
        assert_eq!(trail[0].after.salary, 120000.0);
        assert_eq!(trail[0].actor, "test");
        assert_eq!(trail[1].action, AuditAction::Created);
    }

    #[test]
    fn test_save_without_identity_fails() {
        let conn = test_db();
        let mut record = pensioner("self", "public");
        record.aadhaar_number = Some(String::new());

        assert!(save_pensioner(&conn, &record, "test").is_err());
        assert_eq!(count_pensioners(&conn).unwrap(), 0);
    }

    #[test]
    fn test_bank_account_owned_by_one_pensioner() {
        let conn = test_db();
        let first = pensioner("self", "public");
        save_pensioner(&conn, &first, "test").unwrap();

        let mut second = pensioner("family", "public");
        second.aadhaar_number = Some("999999999999".to_string());

        // Same bank account 456678 on a different identity
        assert!(save_pensioner(&conn, &second, "test").is_err());
        assert_eq!(count_pensioners(&conn).unwrap(), 1);
        assert!(get_pensioner(&conn, "999999999999").unwrap().is_none());
    }

    #[test]
    fn test_pensioner_without_bank_round_trips() {
        let conn = test_db();
        let mut record = pensioner("family", "private");
        record.bank = None;
        record.date_of_birth = None;

        save_pensioner(&conn, &record, "test").unwrap();
        let loaded = get_pensioner(&conn, "123456789011").unwrap().unwrap();
        assert!(loaded.bank.is_none());
        assert!(loaded.date_of_birth.is_none());
    }

    #[test]
    fn test_missing_pensioner_is_none() {
        let conn = test_db();
        assert!(get_pensioner(&conn, "000000000000").unwrap().is_none());
    }

    #[test]
    fn test_pension_amount_detail() {
        let conn = test_db();
        let detail = PensionAmountDetail {
            aadhaar_number: "123456789012".to_string(),
            pension_amount: 31600.0,
            bank_service_charge: 550.0,
            total_amount: 31050.0,
        };

        save_pension_amount_detail(&conn, &detail).unwrap();
        save_pension_amount_detail(&conn, &detail).unwrap();

        let loaded = get_pension_amount_detail(&conn, "123456789012").unwrap().unwrap();
        assert_eq!(loaded, detail);
        assert!(get_pension_amount_detail(&conn, "123456789011").unwrap().is_none());
    }

    #[test]
    fn test_failed_save_leaves_no_audit_entry() {
        let conn = test_db();
        save_pensioner(&conn, &pensioner("self", "public"), "test").unwrap();

        let mut second = pensioner("family", "public");
        second.aadhaar_number = Some("999999999999".to_string());
        assert!(save_pensioner(&conn, &second, "test").is_err());

        assert!(get_audit_trail(&conn, "999999999999").unwrap().is_empty());
        assert_eq!(get_audit_trail(&conn, "123456789011").unwrap().len(), 1);
    }
}
