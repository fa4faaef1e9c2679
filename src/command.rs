//! Transaction commands replayed against the registry.

use crate::customer::{Customer, DiscountCategory};
use crate::error::{EngineError, Result};
use crate::ingest::parse_number;
use crate::money::Pence;
use csv::StringRecord;

/// A parsed and validated command ready for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `PLAY,<customerId>,<attractionId>,<PEAK|OFFPEAK>`
    Play {
        customer_id: String,
        attraction_id: String,
        peak: bool,
    },

    /// `ADD_FUNDS,<customerId>,<amount>`
    AddFunds { customer_id: String, amount: Pence },

    /// `NEW_CUSTOMER,<id>,<name>,<STAFF|STUDENT|other>,<balance>,<age>`
    NewCustomer(Customer),
}

impl Command {
    /// Parses one comma-separated command line.
    ///
    /// The action keyword is case-insensitive and each action requires an
    /// exact field count.
    pub fn parse(record: &StringRecord) -> Result<Self> {
        let action = record.get(0).unwrap_or_default().to_uppercase();

        match action.as_str() {
            "PLAY" => {
                expect_fields(record, 4, "PLAY")?;
                // Any non-empty token other than PEAK is off-peak.
                let peak_token = &record[3];
                if peak_token.is_empty() {
                    return Err(EngineError::MalformedRecord(
                        "invalid PLAY format: missing peak flag".to_string(),
                    ));
                }
                Ok(Command::Play {
                    customer_id: record[1].to_string(),
                    attraction_id: record[2].to_string(),
                    peak: peak_token.eq_ignore_ascii_case("PEAK"),
                })
            }
            "ADD_FUNDS" => {
                expect_fields(record, 3, "ADD_FUNDS")?;
                Ok(Command::AddFunds {
                    customer_id: record[1].to_string(),
                    amount: parse_number(&record[2], "amount")?,
                })
            }
            "NEW_CUSTOMER" => {
                expect_fields(record, 6, "NEW_CUSTOMER")?;
                // Unrecognised discount tokens fall back to no discount here.
                let discount: DiscountCategory = record[3].parse().unwrap_or_default();
                let balance: Pence = parse_number(&record[4], "balance")?;
                let age: u32 = parse_number(&record[5], "age")?;

                Ok(Command::NewCustomer(Customer::new(
                    &record[1], &record[2], age, discount, balance,
                )))
            }
            other => Err(EngineError::MalformedRecord(format!(
                "unknown transaction type {:?}",
                other
            ))),
        }
    }
}

fn expect_fields(record: &StringRecord, expected: usize, action: &str) -> Result<()> {
    if record.len() == expected {
        Ok(())
    } else {
        Err(EngineError::MalformedRecord(format!(
            "invalid {} format: expected {} fields, found {}",
            action,
            expected,
            record.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command> {
        let record: StringRecord = line.split(',').map(str::trim).collect();
        Command::parse(&record)
    }

    #[test]
    fn test_parse_play() {
        assert_eq!(
            parse("play,AB1234,C123456789,Peak").unwrap(),
            Command::Play {
                customer_id: "AB1234".to_string(),
                attraction_id: "C123456789".to_string(),
                peak: true,
            }
        );

        match parse("PLAY,AB1234,C123456789,OFFPEAK").unwrap() {
            Command::Play { peak, .. } => assert!(!peak),
            other => panic!("Expected Play, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognised_peak_token_is_off_peak() {
        match parse("PLAY,AB1234,C123456789,evening").unwrap() {
            Command::Play { peak, .. } => assert!(!peak),
            other => panic!("Expected Play, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_peak_token_is_rejected() {
        for line in ["PLAY,AB1234,C123456789,", "PLAY,AB1234,C123456789,   "] {
            assert!(
                matches!(parse(line), Err(EngineError::MalformedRecord(_))),
                "expected malformed for {:?}",
                line
            );
        }
    }

    #[test]
    fn test_parse_add_funds() {
        assert_eq!(
            parse("Add_Funds,AB1234,500").unwrap(),
            Command::AddFunds {
                customer_id: "AB1234".to_string(),
                amount: Pence::new(500),
            }
        );
        assert!(matches!(
            parse("ADD_FUNDS,AB1234,5.00"),
            Err(EngineError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_parse_new_customer() {
        match parse("NEW_CUSTOMER,ST1234,Charlie,student,400,19").unwrap() {
            Command::NewCustomer(c) => {
                assert_eq!(c.id(), "ST1234");
                assert_eq!(c.name(), "Charlie");
                assert_eq!(c.discount(), DiscountCategory::Student);
                assert_eq!(c.balance(), Pence::new(400));
                assert_eq!(c.age(), 19);
            }
            other => panic!("Expected NewCustomer, got {:?}", other),
        }
    }

    #[test]
    fn test_new_customer_unknown_discount_is_none() {
        match parse("NEW_CUSTOMER,X1,Xavier,VIP,100,30").unwrap() {
            Command::NewCustomer(c) => assert_eq!(c.discount(), DiscountCategory::None),
            other => panic!("Expected NewCustomer, got {:?}", other),
        }
    }

    #[test]
    fn test_field_count_must_match_exactly() {
        for line in [
            "PLAY,AB1234,C123456789",
            "PLAY,AB1234,C123456789,PEAK,extra",
            "ADD_FUNDS,AB1234",
            "NEW_CUSTOMER,X1,Xavier,STAFF,100",
        ] {
            assert!(
                matches!(parse(line), Err(EngineError::MalformedRecord(_))),
                "expected malformed for {}",
                line
            );
        }
    }

    #[test]
    fn test_unknown_action() {
        assert!(matches!(
            parse("REFUND,AB1234,100"),
            Err(EngineError::MalformedRecord(_))
        ));
    }
}
