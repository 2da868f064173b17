use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::Path;

// Use library instead of local modules
use process_pension::{
    count_pensioners, get_audit_trail, get_pension_amount_detail, get_pensioner,
    save_pension_amount_detail, save_pensioner, setup_database, AppConfig, AuditAction,
    PensionCalculator, PensionerDetail,
};

const ACTOR: &str = "process_pension_cli";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = AppConfig::load()?;

    match args.get(1).map(String::as_str) {
        Some("init") => run_init(&config),
        Some("calculate") => match args.get(2) {
            Some(path) => run_calculate(&config, Path::new(path)),
            None => bail!("Usage: process-pension calculate <record.json>"),
        },
        Some("show") => match args.get(2) {
            Some(aadhaar) => run_show(&config, aadhaar),
            None => bail!("Usage: process-pension show <aadhaar-number>"),
        },
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("Process Pension {}", process_pension::VERSION);
    println!();
    println!("Usage:");
    println!("  process-pension init                     Create the database schema");
    println!("  process-pension calculate <record.json>  Compute and store a pension");
    println!("  process-pension show <aadhaar-number>    Show a stored pensioner");
}

fn open_database(config: &AppConfig) -> Result<Connection> {
    let conn = Connection::open(&config.database_path)
        .with_context(|| format!("Failed to open database {}", config.database_path))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn run_init(config: &AppConfig) -> Result<()> {
    println!("🔧 Setting up database...");
    let conn = open_database(config)?;
    println!("✓ Database initialized with WAL mode: {}", config.database_path);
    println!("✓ Database contains {} pensioners", count_pensioners(&conn)?);
    Ok(())
}

fn run_calculate(config: &AppConfig, record_path: &Path) -> Result<()> {
    println!("📂 Loading pensioner record...");
    let raw = fs::read_to_string(record_path)
        .with_context(|| format!("Failed to read {}", record_path.display()))?;
    let record: PensionerDetail =
        serde_json::from_str(&raw).context("Failed to deserialize pensioner record")?;

    let calculator = PensionCalculator::new();
    let result = calculator.compute(&record)?;
    let breakdown = calculator.breakdown(&record)?;

    let conn = open_database(config)?;
    save_pensioner(&conn, &record, ACTOR)?;
    save_pension_amount_detail(&conn, &breakdown)?;

    println!("✓ Pension computed for {}", breakdown.aadhaar_number);
    println!("{}", serde_json::to_string_pretty(&result)?);
    println!("  Gross pension:       {:.2}", breakdown.pension_amount);
    println!("  Bank service charge: {:.2}", breakdown.bank_service_charge);
    println!("  Total:               {:.2}", breakdown.total_amount);

    Ok(())
}

fn run_show(config: &AppConfig, aadhaar_number: &str) -> Result<()> {
    let conn = open_database(config)?;

    match get_pensioner(&conn, aadhaar_number)? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            if let Some(detail) = get_pension_amount_detail(&conn, aadhaar_number)? {
                println!("Last calculation:");
                println!("{}", serde_json::to_string_pretty(&detail)?);
            }

            let trail = get_audit_trail(&conn, aadhaar_number)?;
            if !trail.is_empty() {
                println!("History:");
            }
            for entry in trail {
                let marker = match entry.action {
                    AuditAction::Created => "+",
                    AuditAction::Updated if entry.changed_pay() => "~",
                    AuditAction::Updated => "=",
                };
                let before = entry
                    .before
                    .map(|b| format!("{} + {}", b.salary, b.allowance))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {} {} by {}: {} -> {} + {}",
                    marker,
                    entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                    entry.actor,
                    before,
                    entry.after.salary,
                    entry.after.allowance
                );
            }
        }
        None => println!("❌ No pensioner stored for {}", aadhaar_number),
    }

    Ok(())
}
