use std::path::Path;

use anyhow::Result;
use rust_decimal::Decimal;

use saldo_core::LedgerDay;

/// Print ledger days as an aligned table, oldest first.
pub fn print_days(days: &[LedgerDay]) {
    if days.is_empty() {
        println!("no ledger days in range");
        return;
    }
    println!(
        "{:<12} {:>14} {:>14} {:>12} {:>14} {:>14} {:>14}",
        "date", "available", "pending", "held", "platform", "proc total", "grand total"
    );
    for day in days {
        println!(
            "{:<12} {:>14} {:>14} {:>12} {:>14} {:>14} {:>14}",
            day.date.to_string(),
            day.processor_available,
            day.processor_pending,
            day.processor_held,
            day.platform_pending,
            day.processor_total(),
            day.grand_total()
        );
    }
}

/// Export ledger days to CSV, including the derived totals.
pub fn export_csv(days: &[LedgerDay], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "date",
        "processor_available",
        "processor_pending",
        "processor_held",
        "platform_pending",
        "processor_settled_today",
        "platform_settled_today",
        "tax_withheld_today",
        "processor_total",
        "grand_total",
        "net_movement",
    ])?;
    let mut prior: Option<&LedgerDay> = None;
    for day in days {
        writer.write_record([
            day.date.to_string(),
            decimal(day.processor_available),
            decimal(day.processor_pending),
            decimal(day.processor_held),
            decimal(day.platform_pending),
            decimal(day.processor_settled_today),
            decimal(day.platform_settled_today),
            decimal(day.tax_withheld_today),
            decimal(day.processor_total()),
            decimal(day.grand_total()),
            decimal(day.net_movement(prior)),
        ])?;
        prior = Some(day);
    }
    writer.flush()?;
    Ok(())
}

fn decimal(value: Decimal) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn csv_has_header_and_one_row_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut day = LedgerDay::opening(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        day.processor_available = Decimal::new(123450, 2);
        export_csv(std::slice::from_ref(&day), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("date,processor_available"));
        assert!(lines[1].starts_with("2024-03-01,1234.50"));
    }
}
