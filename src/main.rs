use atm_engine::application::coordinator::WithdrawalCoordinator;
use atm_engine::application::enquiry::EnquiryService;
use atm_engine::application::inventory::CashInventory;
use atm_engine::application::ledger::AccountLedger;
use atm_engine::config::AtmConfig;
use atm_engine::domain::planner::CapacityCheck;
use atm_engine::domain::ports::{AccountStoreBox, InventoryStoreBox};
use atm_engine::error::AtmError;
use atm_engine::infrastructure::in_memory::{InMemoryAccountStore, InMemoryInventoryStore};
use atm_engine::infrastructure::pin::Sha256PinAuthenticator;
use atm_engine::interfaces::csv::outcome_writer::{
    OutcomeRecord, OutcomeWriter, OutputFormat, write_accounts, write_inventory,
};
use atm_engine::interfaces::csv::request_reader::{RequestReader, RequestType};
use atm_engine::interfaces::csv::seed_reader::{read_accounts, read_denominations};
use atm_engine::telemetry;
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CapacityArg {
    /// Sum of squared note counts
    SquaredCounts,
    /// Sum of note values times counts
    FaceValue,
}

impl From<CapacityArg> for CapacityCheck {
    fn from(arg: CapacityArg) -> Self {
        match arg {
            CapacityArg::SquaredCounts => CapacityCheck::SquaredCounts,
            CapacityArg::FaceValue => CapacityCheck::FaceValue,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Requests CSV file (type, username, pin, amount, overdraft)
    input: PathBuf,

    /// Accounts to load before processing (username, pin, balance, overdraft)
    #[arg(long, env = "ATM_ACCOUNTS")]
    accounts: Option<PathBuf>,

    /// Machine inventory to load before processing (value, count)
    #[arg(long, env = "ATM_INVENTORY")]
    inventory: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "ATM_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Rule for the machine-total check made before planning a dispense
    #[arg(
        long,
        value_enum,
        env = "ATM_CAPACITY_CHECK",
        default_value_t = CapacityArg::SquaredCounts
    )]
    capacity_check: CapacityArg,

    /// Output format for processed requests
    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,

    /// Write the final machine inventory to this file
    #[arg(long)]
    inventory_out: Option<PathBuf>,

    /// Write the final account balances (without pins) to this file
    #[arg(long)]
    accounts_out: Option<PathBuf>,
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<PathBuf>) -> Result<(AccountStoreBox, InventoryStoreBox)> {
    use atm_engine::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = db_path {
        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        return Ok((Box::new(store.clone()), Box::new(store)));
    }
    Ok(in_memory_stores())
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<PathBuf>) -> Result<(AccountStoreBox, InventoryStoreBox)> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

fn in_memory_stores() -> (AccountStoreBox, InventoryStoreBox) {
    (
        Box::new(InMemoryAccountStore::new()),
        Box::new(InMemoryInventoryStore::new()),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let config = AtmConfig::default().with_capacity_check(cli.capacity_check.into());
    let (account_store, inventory_store) = open_stores(cli.db_path)?;

    let ledger = Arc::new(AccountLedger::new(account_store));
    let inventory = Arc::new(CashInventory::new(inventory_store, config));

    if let Some(path) = cli.accounts {
        let accounts = read_accounts(File::open(path).into_diagnostic()?).into_diagnostic()?;
        for account in accounts {
            ledger.open(account).await.into_diagnostic()?;
        }
    }
    if let Some(path) = cli.inventory {
        let denominations =
            read_denominations(File::open(path).into_diagnostic()?).into_diagnostic()?;
        inventory.provision(denominations).await.into_diagnostic()?;
    }

    let coordinator = WithdrawalCoordinator::new(
        ledger.clone(),
        inventory.clone(),
        Box::new(Sha256PinAuthenticator::new()),
    );
    let enquiry = EnquiryService::new(
        ledger.clone(),
        inventory.clone(),
        Box::new(Sha256PinAuthenticator::new()),
    );

    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock(), cli.format.into());

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = RequestReader::new(file);
    for record in reader.requests() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Error reading request: {}", e);
                continue;
            }
        };

        let kind = record.r#type;
        let username = record.username.clone();
        let row = match kind {
            RequestType::Withdrawal => {
                let request = record.into_withdrawal();
                match coordinator.withdraw(request.clone()).await {
                    Ok(outcome) => OutcomeRecord::withdrawal(&request, &outcome),
                    Err(AtmError::AccountNotFound(_)) => OutcomeRecord::unknown_account(&request),
                    Err(e) => {
                        tracing::error!("Error processing request: {}", e);
                        continue;
                    }
                }
            }
            RequestType::Balance => match enquiry.balance(&username, &record.pin).await {
                Ok(outcome) => OutcomeRecord::balance(&username, &outcome),
                Err(e) => {
                    tracing::error!("Error processing request: {}", e);
                    continue;
                }
            },
        };
        writer.write(&row).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    if let Some(path) = cli.inventory_out {
        let state = enquiry.machine_inventory().await.into_diagnostic()?;
        write_inventory(File::create(path).into_diagnostic()?, &state).into_diagnostic()?;
    }
    if let Some(path) = cli.accounts_out {
        let accounts = enquiry.accounts().await.into_diagnostic()?;
        write_accounts(File::create(path).into_diagnostic()?, &accounts).into_diagnostic()?;
    }

    Ok(())
}
