use crate::domain::withdrawal::WithdrawalRequest;
use crate::error::{AtmError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Withdrawal,
    Balance,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Withdrawal => "withdrawal",
            RequestType::Balance => "balance",
        }
    }
}

/// One row of the requests file: `type, username, pin, amount, overdraft`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct RequestRecord {
    pub r#type: RequestType,
    pub username: String,
    pub pin: String,
    pub amount: Option<i64>,
    pub overdraft: Option<bool>,
}

impl RequestRecord {
    pub fn into_withdrawal(self) -> WithdrawalRequest {
        WithdrawalRequest::new(
            self.username,
            self.pin,
            self.amount,
            self.overdraft.unwrap_or(false),
        )
    }
}

/// Reads customer requests from a CSV source.
///
/// Whitespace is trimmed and short rows are accepted, so balance enquiries can
/// leave out the amount and overdraft columns.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and deserializes requests.
    pub fn requests(self) -> impl Iterator<Item = Result<RequestRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(AtmError::from))
    }
}
