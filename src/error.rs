//! Error types for the arcade engine.

use crate::money::Pence;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during engine operation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited reader or writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Attraction ID fails the base pattern or the variant prefix
    #[error("Invalid attraction ID {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: &'static str },

    /// No customer registered under this ID
    #[error("Customer with ID {0} does not exist")]
    UnknownCustomer(String),

    /// No attraction registered under this ID
    #[error("Attraction with ID {0} does not exist")]
    UnknownAttraction(String),

    /// Customer is younger than the attraction allows
    #[error("Customer {customer} (age {age}) is below the minimum age of {minimum_age} for {attraction}")]
    AgeRestricted {
        customer: String,
        attraction: String,
        age: u32,
        minimum_age: u32,
    },

    /// Price exceeds the customer's balance
    #[error("Customer {customer} has {balance}, which does not cover {price}")]
    InsufficientFunds {
        customer: String,
        balance: Pence,
        price: Pence,
    },

    /// Balance or revenue would leave the representable range
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Input line could not be parsed into a record
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Missing input file arguments
    #[error("Missing input file argument. Usage: arcade-engine <attractions> <customers> <transactions> [customers-output.csv]")]
    MissingArgument,
}
