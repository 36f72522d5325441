//! CSV adapters for the command line: seed files in, requests in, outcomes out.

pub mod outcome_writer;
pub mod request_reader;
pub mod seed_reader;
