use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use saldo_config::Settings;
use saldo_core::{
    EntryCategory, EntryKind, FundsState, ManualEntry, PaymentMethod, Product, ReturnResolution,
    SaleReturn, SettlementChannel,
};
use saldo_ledger::{BackOffice, SaleDraft};
use saldo_store::{ProductStore, ReturnStore, SaleStore, SqliteBackOffice};

use crate::output;

#[derive(Parser)]
#[command(name = "saldo", about = "Multi-channel settlement ledger back office")]
struct Cli {
    /// Path to the TOML settings file.
    #[arg(long, default_value = "saldo.toml", global = true)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record, amend or delete sales.
    #[command(subcommand)]
    Sale(SaleCommand),
    /// Open or finalize return claims.
    #[command(subcommand)]
    Return(ReturnCommand),
    /// Record or delete manual expense/income entries.
    #[command(subcommand)]
    Entry(EntryCommand),
    /// Record the amounts settled out of pending on a date.
    Settle(SettleArgs),
    /// Recalculate the ledger forward from a date.
    Recalc {
        #[arg(long)]
        from: NaiveDate,
    },
    /// Inspect or export the ledger.
    #[command(subcommand)]
    Ledger(LedgerCommand),
    /// Manage inventory items.
    #[command(subcommand)]
    Product(ProductCommand),
}

#[derive(Subcommand)]
enum SaleCommand {
    Add(SaleAddArgs),
    Amend(SaleAmendArgs),
    Rm {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Args)]
struct SaleAddArgs {
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    channel: SettlementChannel,
    #[arg(long)]
    method: PaymentMethod,
    #[arg(long)]
    gross: Decimal,
    #[arg(long, default_value = "0")]
    shipping: Decimal,
    #[arg(long)]
    product: Uuid,
    #[arg(long)]
    buyer: String,
}

#[derive(Args)]
struct SaleAmendArgs {
    #[arg(long)]
    id: Uuid,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    gross: Option<Decimal>,
    #[arg(long)]
    shipping: Option<Decimal>,
    #[arg(long)]
    buyer: Option<String>,
}

#[derive(Subcommand)]
enum ReturnCommand {
    Open(ReturnOpenArgs),
    Finalize(ReturnFinalizeArgs),
}

#[derive(Args)]
struct ReturnOpenArgs {
    #[arg(long)]
    sale: Uuid,
    #[arg(long)]
    claimed: NaiveDate,
}

#[derive(Args)]
struct ReturnFinalizeArgs {
    #[arg(long)]
    id: Uuid,
    #[arg(long)]
    resolution: ReturnResolution,
    #[arg(long)]
    completed: NaiveDate,
    #[arg(long)]
    refund: Option<Decimal>,
    #[arg(long, default_value = "0")]
    outbound_shipping: Decimal,
    #[arg(long, default_value = "0")]
    return_shipping: Decimal,
    #[arg(long, default_value = "0")]
    reshipment_shipping: Decimal,
    /// The returned product cannot be restocked.
    #[arg(long)]
    unrecoverable: bool,
    #[arg(long, default_value = "pending_settlement")]
    funds_state: FundsState,
    /// The processor froze the refunded amount.
    #[arg(long)]
    retained: bool,
}

#[derive(Subcommand)]
enum EntryCommand {
    Add(EntryAddArgs),
    Rm {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Args)]
struct EntryAddArgs {
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    kind: EntryKind,
    #[arg(long, default_value = "business")]
    category: EntryCategory,
    #[arg(long)]
    amount: Decimal,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args)]
struct SettleArgs {
    #[arg(long)]
    date: NaiveDate,
    #[arg(long, default_value = "0")]
    processor: Decimal,
    #[arg(long, default_value = "0")]
    platform: Decimal,
    #[arg(long, default_value = "0")]
    tax_withheld: Decimal,
}

#[derive(Subcommand)]
enum LedgerCommand {
    Show {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    Export {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProductCommand {
    Add(ProductAddArgs),
    Stock {
        #[arg(long)]
        id: Uuid,
        #[arg(long, default_value = "0")]
        depot: i64,
        #[arg(long, default_value = "0")]
        showroom: i64,
    },
}

#[derive(Args)]
struct ProductAddArgs {
    #[arg(long)]
    sku: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    cost: Decimal,
    #[arg(long)]
    price: Decimal,
    #[arg(long, default_value = "0")]
    depot: i64,
    #[arg(long, default_value = "0")]
    showroom: i64,
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    let store = SqliteBackOffice::new(&settings.database.path)?;
    let office = BackOffice::new(store, settings.rates);

    match cli.command {
        Command::Sale(cmd) => run_sale(&office, cmd),
        Command::Return(cmd) => run_return(&office, cmd),
        Command::Entry(cmd) => run_entry(&office, cmd),
        Command::Settle(args) => {
            let day = office.process_settlement(
                args.date,
                args.processor,
                args.platform,
                args.tax_withheld,
            )?;
            output::print_days(std::slice::from_ref(&day));
            Ok(())
        }
        Command::Recalc { from } => {
            let report = office.recalculate_from(from)?;
            println!(
                "recalculated {} day(s), {} through {}",
                report.days_recalculated, report.from, report.through
            );
            Ok(())
        }
        Command::Ledger(cmd) => run_ledger(&office, cmd),
        Command::Product(cmd) => run_product(&office, cmd),
    }
}

fn run_sale(office: &BackOffice<SqliteBackOffice>, cmd: SaleCommand) -> Result<()> {
    match cmd {
        SaleCommand::Add(args) => {
            let sale = office.record_sale(SaleDraft {
                date: args.date,
                channel: args.channel,
                method: args.method,
                gross: args.gross,
                shipping: args.shipping,
                product_id: args.product,
                buyer: args.buyer,
            })?;
            println!(
                "sale {} recorded: {} settles {}",
                sale.id,
                sale.channel,
                sale.settlement_contribution()
            );
        }
        SaleCommand::Amend(args) => {
            let mut sale = office
                .store()
                .sale(args.id)?
                .with_context(|| format!("sale {} not found", args.id))?;
            if let Some(date) = args.date {
                sale.date = date;
            }
            if let Some(gross) = args.gross {
                sale.gross = gross;
            }
            if let Some(shipping) = args.shipping {
                sale.shipping = shipping;
            }
            if let Some(buyer) = args.buyer {
                sale.buyer = buyer;
            }
            let report = office.amend_sale(sale)?;
            println!("sale amended, {} day(s) recalculated", report.days_recalculated);
        }
        SaleCommand::Rm { id } => {
            let report = office.delete_sale(id)?;
            println!("sale removed, {} day(s) recalculated", report.days_recalculated);
        }
    }
    Ok(())
}

fn run_return(office: &BackOffice<SqliteBackOffice>, cmd: ReturnCommand) -> Result<()> {
    match cmd {
        ReturnCommand::Open(args) => {
            let ret = office.open_return(SaleReturn::open(args.sale, args.claimed))?;
            println!("return {} opened for sale {}", ret.id, ret.sale_id);
        }
        ReturnCommand::Finalize(args) => {
            let mut ret = office
                .store()
                .sale_return(args.id)?
                .with_context(|| format!("return {} not found", args.id))?;
            ret.resolution = args.resolution;
            ret.completed_on = Some(args.completed);
            ret.refund_amount = args.refund;
            ret.outbound_shipping = args.outbound_shipping;
            ret.return_shipping = args.return_shipping;
            ret.reshipment_shipping = args.reshipment_shipping;
            ret.product_recoverable = !args.unrecoverable;
            ret.funds_state = args.funds_state;
            ret.retained = args.retained;
            let delta = office.finalize_return(ret)?;
            println!(
                "return finalized on {}: available -{}, pending -{}, held +{}, platform -{}",
                delta.date,
                delta.processor_available,
                delta.processor_pending,
                delta.processor_held,
                delta.platform_pending
            );
        }
    }
    Ok(())
}

fn run_entry(office: &BackOffice<SqliteBackOffice>, cmd: EntryCommand) -> Result<()> {
    match cmd {
        EntryCommand::Add(args) => {
            let mut entry = ManualEntry::new(args.date, args.kind, args.category, args.amount);
            entry.note = args.note;
            let report = office.record_entry(entry)?;
            println!("entry recorded, {} day(s) recalculated", report.days_recalculated);
        }
        EntryCommand::Rm { id } => {
            let report = office.delete_entry(id)?;
            println!("entry removed, {} day(s) recalculated", report.days_recalculated);
        }
    }
    Ok(())
}

fn run_ledger(office: &BackOffice<SqliteBackOffice>, cmd: LedgerCommand) -> Result<()> {
    match cmd {
        LedgerCommand::Show { from, to } => {
            let days = office.ledger_between(from, to)?;
            output::print_days(&days);
        }
        LedgerCommand::Export { from, to, out } => {
            let days = office.ledger_between(from, to)?;
            output::export_csv(&days, &out)?;
            println!("wrote {} day(s) to {}", days.len(), out.display());
        }
    }
    Ok(())
}

fn run_product(office: &BackOffice<SqliteBackOffice>, cmd: ProductCommand) -> Result<()> {
    match cmd {
        ProductCommand::Add(args) => {
            let mut product = Product::new(args.sku, args.name, args.cost, args.price);
            product.stock_depot = args.depot;
            product.stock_showroom = args.showroom;
            office.store().upsert_product(&product)?;
            println!("product {} ({}) added", product.id, product.sku);
        }
        ProductCommand::Stock { id, depot, showroom } => {
            office.store().adjust_stock(id, depot, showroom)?;
            println!("stock adjusted for {id}");
        }
    }
    Ok(())
}
