//! Customer model and the charge protocol.
//!
//! A customer's balance only moves through [`Customer::add_funds`] or a
//! successful [`Customer::charge`]. A rejected charge leaves it untouched.

use crate::attraction::Attraction;
use crate::error::{EngineError, Result};
use crate::money::Pence;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Discount category recorded against a customer.
///
/// Carried through ingestion and reporting. No pricing rule reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountCategory {
    #[default]
    None,
    Student,
    Staff,
}

impl DiscountCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountCategory::None => "none",
            DiscountCategory::Student => "student",
            DiscountCategory::Staff => "staff",
        }
    }
}

impl FromStr for DiscountCategory {
    type Err = EngineError;

    /// Accepts `STAFF` or `STUDENT` ignoring case, and an empty token for none.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "" => Ok(DiscountCategory::None),
            "STUDENT" => Ok(DiscountCategory::Student),
            "STAFF" => Ok(DiscountCategory::Staff),
            other => Err(EngineError::MalformedRecord(format!(
                "unknown discount type {:?}",
                other
            ))),
        }
    }
}

/// An account-holding customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: String,
    name: String,
    age: u32,
    discount: DiscountCategory,
    balance: Pence,
}

impl Customer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        discount: DiscountCategory,
        balance: Pence,
    ) -> Self {
        Customer {
            id: id.into(),
            name: name.into(),
            age,
            discount,
            balance,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn discount(&self) -> DiscountCategory {
        self.discount
    }

    pub fn balance(&self) -> Pence {
        self.balance
    }

    /// Credits the balance by `amount`, which may be negative.
    ///
    /// Fails with [`EngineError::AmountOverflow`] and leaves the balance
    /// unchanged if the result would not fit.
    pub fn add_funds(&mut self, amount: Pence) -> Result<()> {
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            EngineError::AmountOverflow(format!(
                "adding {} to the balance of {} ({})",
                amount, self.id, self.balance
            ))
        })?;
        Ok(())
    }

    /// Charges one play of `attraction` and returns the amount debited.
    ///
    /// The age rule is checked before the balance, so an under-age customer
    /// is rejected with [`EngineError::AgeRestricted`] even when they could
    /// afford the play.
    pub fn charge(&mut self, attraction: &Attraction, peak: bool) -> Result<Pence> {
        let price = attraction.calculate_price(peak);

        if let Some(minimum_age) = attraction.minimum_age() {
            if self.age < minimum_age {
                return Err(EngineError::AgeRestricted {
                    customer: self.id.clone(),
                    attraction: attraction.id().to_string(),
                    age: self.age,
                    minimum_age,
                });
            }
        }

        if price > self.balance {
            return Err(EngineError::InsufficientFunds {
                customer: self.id.clone(),
                balance: self.balance,
                price,
            });
        }

        self.balance = self.balance.checked_sub(price).ok_or_else(|| {
            EngineError::AmountOverflow(format!(
                "charging {} to the balance of {} ({})",
                price, self.id, self.balance
            ))
        })?;
        Ok(price)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}), age {}, discount {}, balance {}",
            self.name,
            self.id,
            self.age,
            self.discount.as_str(),
            self.balance
        )
    }
}
