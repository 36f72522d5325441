use crate::application::enquiry::BalanceOutcome;
use crate::domain::inventory::InventorySnapshot;
use crate::domain::account::AccountSummary;
use crate::domain::withdrawal::{INVALID_PIN_MESSAGE, WithdrawalOutcome, WithdrawalRequest};
use crate::error::{AtmError, Result};
use crate::interfaces::csv::request_reader::RequestType;
use serde::Serialize;
use std::io::Write;

pub const ACCOUNT_NOT_FOUND_MESSAGE: &str = "Bank account not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    /// One JSON object per line.
    Json,
}

/// Flat, serializable view of one processed request.
///
/// Withdrawals echo the requested amount and overdraft flag; the pin is never
/// written out.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct OutcomeRecord {
    pub username: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub balance: Option<u64>,
    pub overdraft: Option<u64>,
    pub dispensed: String,
    pub message: String,
    pub requested: Option<i64>,
    pub use_overdraft: Option<bool>,
}

impl OutcomeRecord {
    pub fn withdrawal(request: &WithdrawalRequest, outcome: &WithdrawalOutcome) -> Self {
        let (balance, overdraft) = match outcome.balances() {
            Some((balance, overdraft)) => (Some(balance), Some(overdraft)),
            None => (None, None),
        };
        Self {
            username: request.username.clone(),
            kind: RequestType::Withdrawal.as_str().to_string(),
            status: outcome.status().to_string(),
            balance,
            overdraft,
            dispensed: outcome.plan().map(|p| p.to_string()).unwrap_or_default(),
            message: outcome.message().to_string(),
            requested: request.amount,
            use_overdraft: Some(request.use_overdraft),
        }
    }

    pub fn balance(username: &str, outcome: &BalanceOutcome) -> Self {
        let (status, balance, overdraft, message) = match outcome {
            BalanceOutcome::Balance { balance, overdraft } => {
                ("balance", Some(*balance), Some(*overdraft), "")
            }
            BalanceOutcome::InvalidPin => ("invalid_pin", None, None, INVALID_PIN_MESSAGE),
            BalanceOutcome::AccountNotFound => {
                ("account_not_found", None, None, ACCOUNT_NOT_FOUND_MESSAGE)
            }
        };
        Self {
            username: username.to_string(),
            kind: RequestType::Balance.as_str().to_string(),
            status: status.to_string(),
            balance,
            overdraft,
            dispensed: String::new(),
            message: message.to_string(),
            requested: None,
            use_overdraft: None,
        }
    }

    /// A withdrawal for an account the bank does not know.
    pub fn unknown_account(request: &WithdrawalRequest) -> Self {
        Self {
            username: request.username.clone(),
            kind: RequestType::Withdrawal.as_str().to_string(),
            status: "account_not_found".to_string(),
            balance: None,
            overdraft: None,
            dispensed: String::new(),
            message: ACCOUNT_NOT_FOUND_MESSAGE.to_string(),
            requested: request.amount,
            use_overdraft: Some(request.use_overdraft),
        }
    }
}

/// Writes processed requests as CSV (with a header) or JSON lines.
pub struct OutcomeWriter<W: Write> {
    sink: Sink<W>,
}

enum Sink<W: Write> {
    Csv(csv::Writer<W>),
    Json(W),
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        let sink = match format {
            OutputFormat::Csv => Sink::Csv(csv::Writer::from_writer(writer)),
            OutputFormat::Json => Sink::Json(writer),
        };
        Self { sink }
    }

    pub fn write(&mut self, record: &OutcomeRecord) -> Result<()> {
        match &mut self.sink {
            Sink::Csv(writer) => writer.serialize(record)?,
            Sink::Json(writer) => {
                serde_json::to_writer(&mut *writer, record)
                    .map_err(|e| AtmError::InternalError(Box::new(e)))?;
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        match &mut self.sink {
            Sink::Csv(writer) => writer.flush()?,
            Sink::Json(writer) => writer.flush()?,
        }
        Ok(())
    }
}

/// Writes the machine's inventory as `value,count` rows.
pub fn write_inventory<W: Write>(writer: W, inventory: &InventorySnapshot) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["value", "count"])?;
    for denomination in inventory.denominations() {
        writer.write_record([
            denomination.value.to_string(),
            denomination.available_count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes an audit listing of accounts as `username,balance,overdraft` rows.
pub fn write_accounts<W: Write>(writer: W, accounts: &[AccountSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for account in accounts {
        writer.serialize(account)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::{Denomination, DispenseEntry, DispensePlan};

    fn request() -> WithdrawalRequest {
        WithdrawalRequest::new("clint_west", "1234", Some(800), false)
    }

    fn success() -> WithdrawalOutcome {
        WithdrawalOutcome::Success {
            balance: 0,
            overdraft: 200,
            plan: DispensePlan::new(vec![
                DispenseEntry { value: 50, count: 10 },
                DispenseEntry { value: 20, count: 15 },
            ]),
        }
    }

    #[test]
    fn test_csv_output() {
        let mut buffer = Vec::new();
        {
            let mut writer = OutcomeWriter::new(&mut buffer, OutputFormat::Csv);
            writer
                .write(&OutcomeRecord::withdrawal(&request(), &success()))
                .unwrap();
            writer
                .write(&OutcomeRecord::withdrawal(&request(), &WithdrawalOutcome::InvalidPin))
                .unwrap();
            writer.flush().unwrap();
        }
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "username,type,status,balance,overdraft,dispensed,message,requested,use_overdraft"
        );
        assert_eq!(
            lines[1],
            "clint_west,withdrawal,success,0,200,50x10;20x15,Please collect your cash,800,false"
        );
        assert_eq!(
            lines[2],
            "clint_west,withdrawal,invalid_pin,,,,Invalid pin,800,false"
        );
        assert!(!output.contains("1234"));
    }

    #[test]
    fn test_json_output() {
        let mut buffer = Vec::new();
        {
            let mut writer = OutcomeWriter::new(&mut buffer, OutputFormat::Json);
            writer
                .write(&OutcomeRecord::balance(
                    "clint_west",
                    &BalanceOutcome::Balance {
                        balance: 800,
                        overdraft: 200,
                    },
                ))
                .unwrap();
            writer.flush().unwrap();
        }
        let output = String::from_utf8(buffer).unwrap();
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(value["type"], "balance");
        assert_eq!(value["balance"], 800);
        assert!(value["requested"].is_null());
    }

    #[test]
    fn test_unknown_account_echoes_request() {
        let record = OutcomeRecord::unknown_account(&WithdrawalRequest::new(
            "ghost",
            "1111",
            Some(-5),
            true,
        ));
        assert_eq!(record.status, "account_not_found");
        assert_eq!(record.requested, Some(-5));
        assert_eq!(record.use_overdraft, Some(true));
    }

    #[test]
    fn test_write_accounts() {
        let mut buffer = Vec::new();
        let accounts = vec![
            AccountSummary {
                username: "clint_west".to_string(),
                balance: 0,
                overdraft: 200,
            },
            AccountSummary {
                username: "russell_gladiator".to_string(),
                balance: 1800,
                overdraft: 150,
            },
        ];
        write_accounts(&mut buffer, &accounts).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "username,balance,overdraft\nclint_west,0,200\nrussell_gladiator,1800,150\n"
        );
    }

    #[test]
    fn test_write_inventory() {
        let mut buffer = Vec::new();
        let inventory = InventorySnapshot::new(vec![
            Denomination::new(20, 15),
            Denomination::new(50, 0),
        ]);
        write_inventory(&mut buffer, &inventory).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "value,count\n50,0\n20,15\n");
    }
}
