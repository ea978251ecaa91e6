use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use uuid::Uuid;

use saldo_core::{
    EntryCategory, EntryKind, FundsState, LedgerDay, ManualEntry, PaymentMethod, Product,
    ReturnDelta, ReturnResolution, Sale, SaleReturn, SettlementChannel,
};

use crate::{
    EntryStore, LedgerStore, ProductStore, ReturnDeltaStore, ReturnStore, SaleStore, StoreError,
    StoreResult,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sales (
    sale_id TEXT PRIMARY KEY,
    sale_date TEXT NOT NULL,
    channel TEXT NOT NULL,
    method TEXT NOT NULL,
    gross TEXT NOT NULL,
    shipping TEXT NOT NULL,
    commission TEXT NOT NULL,
    tax TEXT NOT NULL,
    processor_fee TEXT NOT NULL,
    product_id TEXT NOT NULL,
    buyer TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS sales_idx_date ON sales(sale_date);

CREATE TABLE IF NOT EXISTS returns (
    return_id TEXT PRIMARY KEY,
    sale_id TEXT NOT NULL,
    claim_date TEXT NOT NULL,
    completed_on TEXT,
    resolution TEXT NOT NULL,
    refund_amount TEXT,
    outbound_shipping TEXT NOT NULL,
    return_shipping TEXT NOT NULL,
    reshipment_shipping TEXT NOT NULL,
    product_recoverable INTEGER NOT NULL,
    funds_state TEXT NOT NULL,
    retained INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS returns_idx_completed ON returns(completed_on);
CREATE INDEX IF NOT EXISTS returns_idx_sale ON returns(sale_id);

CREATE TABLE IF NOT EXISTS entries (
    entry_id TEXT PRIMARY KEY,
    entry_date TEXT NOT NULL,
    kind TEXT NOT NULL,
    category TEXT NOT NULL,
    amount TEXT NOT NULL,
    channel TEXT,
    note TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS entries_idx_date ON entries(entry_date);

CREATE TABLE IF NOT EXISTS products (
    product_id TEXT PRIMARY KEY,
    sku TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    cost TEXT NOT NULL,
    price TEXT NOT NULL,
    stock_depot INTEGER NOT NULL,
    stock_showroom INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS ledger_days (
    day TEXT PRIMARY KEY,
    processor_available TEXT NOT NULL,
    processor_pending TEXT NOT NULL,
    processor_held TEXT NOT NULL,
    platform_pending TEXT NOT NULL,
    processor_settled_today TEXT NOT NULL,
    platform_settled_today TEXT NOT NULL,
    tax_withheld_today TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS return_deltas (
    return_id TEXT PRIMARY KEY,
    day TEXT NOT NULL,
    processor_available TEXT NOT NULL,
    processor_pending TEXT NOT NULL,
    processor_held TEXT NOT NULL,
    platform_pending TEXT NOT NULL,
    realized_loss TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS return_deltas_idx_day ON return_deltas(day);
"#;

/// SQLite-backed store holding every back-office table in one file.
#[derive(Clone, Debug)]
pub struct SqliteBackOffice {
    path: PathBuf,
}

impl SqliteBackOffice {
    pub fn new(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self { path: path.into() };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn connect(&self) -> StoreResult<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
        Ok(conn)
    }
}

impl SaleStore for SqliteBackOffice {
    fn insert_sale(&self, sale: &Sale) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO sales (
                sale_id, sale_date, channel, method, gross, shipping,
                commission, tax, processor_fee, product_id, buyer, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                sale.id.to_string(),
                sale.date.to_string(),
                sale.channel.as_str(),
                sale.method.as_str(),
                sale.gross.to_string(),
                sale.shipping.to_string(),
                sale.commission.to_string(),
                sale.tax.to_string(),
                sale.processor_fee.to_string(),
                sale.product_id.to_string(),
                sale.buyer,
                sale.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_sale(&self, sale: &Sale) -> StoreResult<()> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE sales SET
                sale_date = ?2, channel = ?3, method = ?4, gross = ?5, shipping = ?6,
                commission = ?7, tax = ?8, processor_fee = ?9, product_id = ?10,
                buyer = ?11, created_at = ?12
             WHERE sale_id = ?1",
            params![
                sale.id.to_string(),
                sale.date.to_string(),
                sale.channel.as_str(),
                sale.method.as_str(),
                sale.gross.to_string(),
                sale.shipping.to_string(),
                sale.commission.to_string(),
                sale.tax.to_string(),
                sale.processor_fee.to_string(),
                sale.product_id.to_string(),
                sale.buyer,
                sale.created_at.to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("sale", sale.id));
        }
        Ok(())
    }

    fn delete_sale(&self, id: Uuid) -> StoreResult<Sale> {
        let sale = self
            .sale(id)?
            .ok_or_else(|| StoreError::not_found("sale", id))?;
        let conn = self.connect()?;
        conn.execute("DELETE FROM sales WHERE sale_id = ?1", params![id.to_string()])?;
        Ok(sale)
    }

    fn sale(&self, id: Uuid) -> StoreResult<Option<Sale>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT sale_id, sale_date, channel, method, gross, shipping,
                        commission, tax, processor_fee, product_id, buyer, created_at
                 FROM sales WHERE sale_id = ?1",
                params![id.to_string()],
                row_to_sale,
            )
            .optional()?;
        row.transpose()
    }

    fn sales_on(&self, date: NaiveDate) -> StoreResult<Vec<Sale>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT sale_id, sale_date, channel, method, gross, shipping,
                    commission, tax, processor_fee, product_id, buyer, created_at
             FROM sales WHERE sale_date = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![date.to_string()], row_to_sale)?;
        collect(rows)
    }
}

impl ReturnStore for SqliteBackOffice {
    fn upsert_return(&self, ret: &SaleReturn) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO returns (
                return_id, sale_id, claim_date, completed_on, resolution, refund_amount,
                outbound_shipping, return_shipping, reshipment_shipping,
                product_recoverable, funds_state, retained, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(return_id) DO UPDATE SET
                sale_id = excluded.sale_id,
                claim_date = excluded.claim_date,
                completed_on = excluded.completed_on,
                resolution = excluded.resolution,
                refund_amount = excluded.refund_amount,
                outbound_shipping = excluded.outbound_shipping,
                return_shipping = excluded.return_shipping,
                reshipment_shipping = excluded.reshipment_shipping,
                product_recoverable = excluded.product_recoverable,
                funds_state = excluded.funds_state,
                retained = excluded.retained",
            params![
                ret.id.to_string(),
                ret.sale_id.to_string(),
                ret.claim_date.to_string(),
                ret.completed_on.map(|d| d.to_string()),
                ret.resolution.as_str(),
                ret.refund_amount.map(|a| a.to_string()),
                ret.outbound_shipping.to_string(),
                ret.return_shipping.to_string(),
                ret.reshipment_shipping.to_string(),
                ret.product_recoverable as i64,
                ret.funds_state.as_str(),
                ret.retained as i64,
                ret.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn sale_return(&self, id: Uuid) -> StoreResult<Option<SaleReturn>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT return_id, sale_id, claim_date, completed_on, resolution, refund_amount,
                        outbound_shipping, return_shipping, reshipment_shipping,
                        product_recoverable, funds_state, retained, created_at
                 FROM returns WHERE return_id = ?1",
                params![id.to_string()],
                row_to_return,
            )
            .optional()?;
        row.transpose()
    }

    fn returns_completed_on(&self, date: NaiveDate) -> StoreResult<Vec<SaleReturn>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT return_id, sale_id, claim_date, completed_on, resolution, refund_amount,
                    outbound_shipping, return_shipping, reshipment_shipping,
                    product_recoverable, funds_state, retained, created_at
             FROM returns WHERE completed_on = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![date.to_string()], row_to_return)?;
        collect(rows)
    }

    fn returns_for_sale(&self, sale_id: Uuid) -> StoreResult<Vec<SaleReturn>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT return_id, sale_id, claim_date, completed_on, resolution, refund_amount,
                    outbound_shipping, return_shipping, reshipment_shipping,
                    product_recoverable, funds_state, retained, created_at
             FROM returns WHERE sale_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![sale_id.to_string()], row_to_return)?;
        collect(rows)
    }
}

impl EntryStore for SqliteBackOffice {
    fn insert_entry(&self, entry: &ManualEntry) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO entries (
                entry_id, entry_date, kind, category, amount, channel, note, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.id.to_string(),
                entry.date.to_string(),
                entry.kind.as_str(),
                entry.category.as_str(),
                entry.amount.to_string(),
                entry.channel.map(|c| c.as_str()),
                entry.note,
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete_entry(&self, id: Uuid) -> StoreResult<ManualEntry> {
        let conn = self.connect()?;
        let entry = conn
            .query_row(
                "SELECT entry_id, entry_date, kind, category, amount, channel, note, created_at
                 FROM entries WHERE entry_id = ?1",
                params![id.to_string()],
                row_to_entry,
            )
            .optional()?
            .transpose()?
            .ok_or_else(|| StoreError::not_found("entry", id))?;
        conn.execute("DELETE FROM entries WHERE entry_id = ?1", params![id.to_string()])?;
        Ok(entry)
    }

    fn entries_on(&self, date: NaiveDate) -> StoreResult<Vec<ManualEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT entry_id, entry_date, kind, category, amount, channel, note, created_at
             FROM entries WHERE entry_date = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![date.to_string()], row_to_entry)?;
        collect(rows)
    }
}

impl ProductStore for SqliteBackOffice {
    fn upsert_product(&self, product: &Product) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO products (
                product_id, sku, name, cost, price, stock_depot, stock_showroom
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(product_id) DO UPDATE SET
                sku = excluded.sku,
                name = excluded.name,
                cost = excluded.cost,
                price = excluded.price,
                stock_depot = excluded.stock_depot,
                stock_showroom = excluded.stock_showroom",
            params![
                product.id.to_string(),
                product.sku,
                product.name,
                product.cost.to_string(),
                product.price.to_string(),
                product.stock_depot,
                product.stock_showroom,
            ],
        )?;
        Ok(())
    }

    fn product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT product_id, sku, name, cost, price, stock_depot, stock_showroom
                 FROM products WHERE product_id = ?1",
                params![id.to_string()],
                row_to_product,
            )
            .optional()?;
        row.transpose()
    }

    fn adjust_stock(&self, id: Uuid, depot_delta: i64, showroom_delta: i64) -> StoreResult<()> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE products SET
                stock_depot = stock_depot + ?2,
                stock_showroom = stock_showroom + ?3
             WHERE product_id = ?1",
            params![id.to_string(), depot_delta, showroom_delta],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("product", id));
        }
        Ok(())
    }
}

impl LedgerStore for SqliteBackOffice {
    fn day(&self, date: NaiveDate) -> StoreResult<Option<LedgerDay>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT day, processor_available, processor_pending, processor_held,
                        platform_pending, processor_settled_today, platform_settled_today,
                        tax_withheld_today
                 FROM ledger_days WHERE day = ?1",
                params![date.to_string()],
                row_to_day,
            )
            .optional()?;
        row.transpose()
    }

    fn days_from(&self, date: NaiveDate) -> StoreResult<Vec<LedgerDay>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT day, processor_available, processor_pending, processor_held,
                    platform_pending, processor_settled_today, platform_settled_today,
                    tax_withheld_today
             FROM ledger_days WHERE day >= ?1 ORDER BY day ASC",
        )?;
        let rows = stmt.query_map(params![date.to_string()], row_to_day)?;
        collect(rows)
    }

    fn latest_before(&self, date: NaiveDate) -> StoreResult<Option<LedgerDay>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT day, processor_available, processor_pending, processor_held,
                        platform_pending, processor_settled_today, platform_settled_today,
                        tax_withheld_today
                 FROM ledger_days WHERE day < ?1 ORDER BY day DESC LIMIT 1",
                params![date.to_string()],
                row_to_day,
            )
            .optional()?;
        row.transpose()
    }

    fn earliest_date(&self) -> StoreResult<Option<NaiveDate>> {
        let conn = self.connect()?;
        let day: Option<Option<String>> = conn
            .query_row("SELECT MIN(day) FROM ledger_days", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?;
        match day.flatten() {
            Some(text) => Ok(Some(parse_date(&text)?)),
            None => Ok(None),
        }
    }

    fn upsert_day(&self, day: &LedgerDay) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO ledger_days (
                day, processor_available, processor_pending, processor_held,
                platform_pending, processor_settled_today, platform_settled_today,
                tax_withheld_today
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(day) DO UPDATE SET
                processor_available = excluded.processor_available,
                processor_pending = excluded.processor_pending,
                processor_held = excluded.processor_held,
                platform_pending = excluded.platform_pending,
                processor_settled_today = excluded.processor_settled_today,
                platform_settled_today = excluded.platform_settled_today,
                tax_withheld_today = excluded.tax_withheld_today",
            params![
                day.date.to_string(),
                day.processor_available.to_string(),
                day.processor_pending.to_string(),
                day.processor_held.to_string(),
                day.platform_pending.to_string(),
                day.processor_settled_today.to_string(),
                day.platform_settled_today.to_string(),
                day.tax_withheld_today.to_string(),
            ],
        )?;
        Ok(())
    }

    fn all_days(&self) -> StoreResult<Vec<LedgerDay>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT day, processor_available, processor_pending, processor_held,
                    platform_pending, processor_settled_today, platform_settled_today,
                    tax_withheld_today
             FROM ledger_days ORDER BY day ASC",
        )?;
        let rows = stmt.query_map([], row_to_day)?;
        collect(rows)
    }
}

impl ReturnDeltaStore for SqliteBackOffice {
    fn replace_delta(&self, delta: &ReturnDelta) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO return_deltas (
                return_id, day, processor_available, processor_pending,
                processor_held, platform_pending, realized_loss
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(return_id) DO UPDATE SET
                day = excluded.day,
                processor_available = excluded.processor_available,
                processor_pending = excluded.processor_pending,
                processor_held = excluded.processor_held,
                platform_pending = excluded.platform_pending,
                realized_loss = excluded.realized_loss",
            params![
                delta.return_id.to_string(),
                delta.date.to_string(),
                delta.processor_available.to_string(),
                delta.processor_pending.to_string(),
                delta.processor_held.to_string(),
                delta.platform_pending.to_string(),
                delta.realized_loss.to_string(),
            ],
        )?;
        Ok(())
    }

    fn delete_delta(&self, return_id: Uuid) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "DELETE FROM return_deltas WHERE return_id = ?1",
            params![return_id.to_string()],
        )?;
        Ok(())
    }

    fn deltas_on(&self, date: NaiveDate) -> StoreResult<Vec<ReturnDelta>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT return_id, day, processor_available, processor_pending,
                    processor_held, platform_pending, realized_loss
             FROM return_deltas WHERE day = ?1",
        )?;
        let rows = stmt.query_map(params![date.to_string()], row_to_delta)?;
        collect(rows)
    }

    fn deltas_between(&self, from: NaiveDate, to: NaiveDate) -> StoreResult<Vec<ReturnDelta>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT return_id, day, processor_available, processor_pending,
                    processor_held, platform_pending, realized_loss
             FROM return_deltas WHERE day >= ?1 AND day <= ?2 ORDER BY day ASC",
        )?;
        let rows = stmt.query_map(params![from.to_string(), to.to_string()], row_to_delta)?;
        collect(rows)
    }
}

fn collect<T>(
    rows: impl Iterator<Item = Result<Result<T, StoreError>, rusqlite::Error>>,
) -> StoreResult<Vec<T>> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row??);
    }
    Ok(out)
}

fn row_to_sale(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<Sale, StoreError>> {
    let id: String = row.get(0)?;
    let date: String = row.get(1)?;
    let channel: String = row.get(2)?;
    let method: String = row.get(3)?;
    let gross: String = row.get(4)?;
    let shipping: String = row.get(5)?;
    let commission: String = row.get(6)?;
    let tax: String = row.get(7)?;
    let processor_fee: String = row.get(8)?;
    let product_id: String = row.get(9)?;
    let buyer: String = row.get(10)?;
    let created_at: String = row.get(11)?;
    Ok(build_sale(
        id,
        date,
        channel,
        method,
        gross,
        shipping,
        commission,
        tax,
        processor_fee,
        product_id,
        buyer,
        created_at,
    ))
}

#[allow(clippy::too_many_arguments)]
fn build_sale(
    id: String,
    date: String,
    channel: String,
    method: String,
    gross: String,
    shipping: String,
    commission: String,
    tax: String,
    processor_fee: String,
    product_id: String,
    buyer: String,
    created_at: String,
) -> Result<Sale, StoreError> {
    Ok(Sale {
        id: parse_uuid(&id)?,
        date: parse_date(&date)?,
        channel: parse_enum::<SettlementChannel>(&channel)?,
        method: parse_enum::<PaymentMethod>(&method)?,
        gross: parse_decimal(&gross)?,
        shipping: parse_decimal(&shipping)?,
        commission: parse_decimal(&commission)?,
        tax: parse_decimal(&tax)?,
        processor_fee: parse_decimal(&processor_fee)?,
        product_id: parse_uuid(&product_id)?,
        buyer,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn row_to_return(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<SaleReturn, StoreError>> {
    let id: String = row.get(0)?;
    let sale_id: String = row.get(1)?;
    let claim_date: String = row.get(2)?;
    let completed_on: Option<String> = row.get(3)?;
    let resolution: String = row.get(4)?;
    let refund_amount: Option<String> = row.get(5)?;
    let outbound: String = row.get(6)?;
    let return_leg: String = row.get(7)?;
    let reshipment: String = row.get(8)?;
    let recoverable: i64 = row.get(9)?;
    let funds_state: String = row.get(10)?;
    let retained: i64 = row.get(11)?;
    let created_at: String = row.get(12)?;
    Ok((|| {
        Ok(SaleReturn {
            id: parse_uuid(&id)?,
            sale_id: parse_uuid(&sale_id)?,
            claim_date: parse_date(&claim_date)?,
            completed_on: completed_on.as_deref().map(parse_date).transpose()?,
            resolution: parse_enum::<ReturnResolution>(&resolution)?,
            refund_amount: refund_amount.as_deref().map(parse_decimal).transpose()?,
            outbound_shipping: parse_decimal(&outbound)?,
            return_shipping: parse_decimal(&return_leg)?,
            reshipment_shipping: parse_decimal(&reshipment)?,
            product_recoverable: recoverable != 0,
            funds_state: parse_enum::<FundsState>(&funds_state)?,
            retained: retained != 0,
            created_at: parse_timestamp(&created_at)?,
        })
    })())
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<ManualEntry, StoreError>> {
    let id: String = row.get(0)?;
    let date: String = row.get(1)?;
    let kind: String = row.get(2)?;
    let category: String = row.get(3)?;
    let amount: String = row.get(4)?;
    let channel: Option<String> = row.get(5)?;
    let note: Option<String> = row.get(6)?;
    let created_at: String = row.get(7)?;
    Ok((|| {
        Ok(ManualEntry {
            id: parse_uuid(&id)?,
            date: parse_date(&date)?,
            kind: parse_enum::<EntryKind>(&kind)?,
            category: parse_enum::<EntryCategory>(&category)?,
            amount: parse_decimal(&amount)?,
            channel: channel
                .as_deref()
                .map(parse_enum::<SettlementChannel>)
                .transpose()?,
            note,
            created_at: parse_timestamp(&created_at)?,
        })
    })())
}

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<Product, StoreError>> {
    let id: String = row.get(0)?;
    let sku: String = row.get(1)?;
    let name: String = row.get(2)?;
    let cost: String = row.get(3)?;
    let price: String = row.get(4)?;
    let stock_depot: i64 = row.get(5)?;
    let stock_showroom: i64 = row.get(6)?;
    Ok((|| {
        Ok(Product {
            id: parse_uuid(&id)?,
            sku,
            name,
            cost: parse_decimal(&cost)?,
            price: parse_decimal(&price)?,
            stock_depot,
            stock_showroom,
        })
    })())
}

fn row_to_day(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<LedgerDay, StoreError>> {
    let day: String = row.get(0)?;
    let processor_available: String = row.get(1)?;
    let processor_pending: String = row.get(2)?;
    let processor_held: String = row.get(3)?;
    let platform_pending: String = row.get(4)?;
    let processor_settled: String = row.get(5)?;
    let platform_settled: String = row.get(6)?;
    let tax_withheld: String = row.get(7)?;
    Ok((|| {
        Ok(LedgerDay {
            date: parse_date(&day)?,
            processor_available: parse_decimal(&processor_available)?,
            processor_pending: parse_decimal(&processor_pending)?,
            processor_held: parse_decimal(&processor_held)?,
            platform_pending: parse_decimal(&platform_pending)?,
            processor_settled_today: parse_decimal(&processor_settled)?,
            platform_settled_today: parse_decimal(&platform_settled)?,
            tax_withheld_today: parse_decimal(&tax_withheld)?,
        })
    })())
}

fn row_to_delta(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<ReturnDelta, StoreError>> {
    let return_id: String = row.get(0)?;
    let day: String = row.get(1)?;
    let processor_available: String = row.get(2)?;
    let processor_pending: String = row.get(3)?;
    let processor_held: String = row.get(4)?;
    let platform_pending: String = row.get(5)?;
    let realized_loss: String = row.get(6)?;
    Ok((|| {
        Ok(ReturnDelta {
            return_id: parse_uuid(&return_id)?,
            date: parse_date(&day)?,
            processor_available: parse_decimal(&processor_available)?,
            processor_pending: parse_decimal(&processor_pending)?,
            processor_held: parse_decimal(&processor_held)?,
            platform_pending: parse_decimal(&platform_pending)?,
            realized_loss: parse_decimal(&realized_loss)?,
        })
    })())
}

fn parse_date(text: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::from_str(text)
        .map_err(|err| StoreError::Serialization(format!("invalid date {text}: {err}")))
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| StoreError::Serialization(format!("invalid timestamp {text}: {err}")))
}

fn parse_decimal(text: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(text)
        .map_err(|err| StoreError::Serialization(format!("invalid decimal {text}: {err}")))
}

fn parse_uuid(text: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(text)
        .map_err(|err| StoreError::Serialization(format!("invalid id {text}: {err}")))
}

fn parse_enum<T: FromStr<Err = String>>(text: &str) -> Result<T, StoreError> {
    T::from_str(text).map_err(StoreError::Serialization)
}
