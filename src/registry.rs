//! Venue registry: attractions, customers, revenue and analytics.
//!
//! The registry is the sole owner of its collections. Every successful
//! charge is added to `total_revenue` in the same call that debits the
//! customer, so revenue always equals the sum of successful charges.

use crate::attraction::{Attraction, AttractionCategory};
use crate::command::Command;
use crate::customer::{Customer, DiscountCategory};
use crate::error::{EngineError, Result};
use crate::ingest::{
    for_each_line, parse_attraction, parse_customer, Diagnostic, ATTRACTION_DELIMITER,
    COMMAND_DELIMITER, CUSTOMER_DELIMITER,
};
use crate::money::Pence;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Write};

/// Number of attractions per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryCounts {
    pub standard: usize,
    pub active: usize,
    pub immersive_vr: usize,
}

/// One row of the customers CSV output.
#[derive(Serialize)]
struct CustomerRow<'a> {
    id: &'a str,
    name: &'a str,
    age: u32,
    discount: DiscountCategory,
    balance: Pence,
}

/// In-memory owner of a venue's attractions, customers and revenue.
#[derive(Debug)]
pub struct VenueRegistry {
    name: String,

    /// Sum of every successful charge.
    total_revenue: Pence,

    attractions: HashMap<String, Attraction>,

    customers: HashMap<String, Customer>,
}

impl VenueRegistry {
    /// Creates an empty registry for the named venue.
    pub fn new(name: impl Into<String>) -> Self {
        VenueRegistry {
            name: name.into(),
            total_revenue: Pence::ZERO,
            attractions: HashMap::new(),
            customers: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_revenue(&self) -> Pence {
        self.total_revenue
    }

    /// Inserts an attraction, replacing any with the same ID.
    pub fn register_attraction(&mut self, attraction: Attraction) {
        debug!("Registered attraction {}", attraction);
        self.attractions
            .insert(attraction.id().to_string(), attraction);
    }

    /// Inserts a customer, replacing any with the same ID.
    pub fn register_customer(&mut self, customer: Customer) {
        debug!("Registered customer {}", customer);
        self.customers.insert(customer.id().to_string(), customer);
    }

    pub fn lookup_customer(&self, id: &str) -> Result<&Customer> {
        self.customers
            .get(id)
            .ok_or_else(|| EngineError::UnknownCustomer(id.to_string()))
    }

    pub fn lookup_attraction(&self, id: &str) -> Result<&Attraction> {
        self.attractions
            .get(id)
            .ok_or_else(|| EngineError::UnknownAttraction(id.to_string()))
    }

    pub fn attractions(&self) -> impl Iterator<Item = &Attraction> {
        self.attractions.values()
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    /// Charges a customer for one play and books the revenue.
    ///
    /// The customer is resolved before the attraction. Returns the amount
    /// charged; on any error neither the balance nor the revenue changes.
    /// A price that would overflow the revenue total is refused with
    /// [`EngineError::AmountOverflow`] before the customer is charged.
    pub fn process_transaction(
        &mut self,
        customer_id: &str,
        attraction_id: &str,
        peak: bool,
    ) -> Result<Pence> {
        let customer = self
            .customers
            .get_mut(customer_id)
            .ok_or_else(|| EngineError::UnknownCustomer(customer_id.to_string()))?;
        let attraction = self
            .attractions
            .get(attraction_id)
            .ok_or_else(|| EngineError::UnknownAttraction(attraction_id.to_string()))?;

        let price = attraction.calculate_price(peak);
        let revenue = self.total_revenue.checked_add(price).ok_or_else(|| {
            EngineError::AmountOverflow(format!(
                "booking {} on top of revenue {}",
                price, self.total_revenue
            ))
        })?;

        let charged = customer.charge(attraction, peak)?;
        self.total_revenue = revenue;

        debug!(
            "Charged {} {} for {} ({})",
            customer_id,
            charged,
            attraction_id,
            if peak { "peak" } else { "off-peak" }
        );
        Ok(charged)
    }

    /// Credits a registered customer's balance.
    pub fn add_funds(&mut self, customer_id: &str, amount: Pence) -> Result<()> {
        let customer = self
            .customers
            .get_mut(customer_id)
            .ok_or_else(|| EngineError::UnknownCustomer(customer_id.to_string()))?;

        customer.add_funds(amount)?;
        debug!("Added {} to customer {}", amount, customer_id);
        Ok(())
    }

    /// Returns the customer with the strictly greatest balance.
    ///
    /// Among equal balances the first one visited wins; visit order is the
    /// map's iteration order and is not specified.
    pub fn find_richest_customer(&self) -> Option<&Customer> {
        self.customers.values().fold(None, |richest, c| match richest {
            Some(best) if c.balance() <= best.balance() => Some(best),
            _ => Some(c),
        })
    }

    /// Median of all off-peak prices, or zero when there are no attractions.
    ///
    /// For an even count this is the truncated mean of the two middle prices.
    pub fn median_attraction_price(&self) -> Pence {
        let mut prices: Vec<i64> = self
            .attractions
            .values()
            .map(|a| a.calculate_price(false).value())
            .collect();
        prices.sort_unstable();

        let size = prices.len();
        if size == 0 {
            return Pence::ZERO;
        }
        if size % 2 == 1 {
            Pence::new(prices[size / 2])
        } else {
            // the mean of two i64 values always fits back into an i64
            let sum = i128::from(prices[size / 2 - 1]) + i128::from(prices[size / 2]);
            Pence::new((sum / 2) as i64)
        }
    }

    /// Counts attractions by their most specific category.
    pub fn count_by_category(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for attraction in self.attractions.values() {
            match attraction.category() {
                AttractionCategory::ImmersiveVr => counts.immersive_vr += 1,
                AttractionCategory::Active => counts.active += 1,
                AttractionCategory::Standard => counts.standard += 1,
            }
        }
        counts
    }

    /// Total revenue rendered as `£major.minor`.
    pub fn formatted_revenue(&self) -> String {
        self.total_revenue.to_string()
    }

    /// Registers every valid `@`-separated attraction record.
    pub fn load_attractions<R: Read>(&mut self, reader: R) -> Result<Vec<Diagnostic>> {
        for_each_line(reader, ATTRACTION_DELIMITER, |record| {
            self.register_attraction(parse_attraction(record)?);
            Ok(())
        })
    }

    /// Registers every valid `#`-separated customer record.
    pub fn load_customers<R: Read>(&mut self, reader: R) -> Result<Vec<Diagnostic>> {
        for_each_line(reader, CUSTOMER_DELIMITER, |record| {
            self.register_customer(parse_customer(record)?);
            Ok(())
        })
    }

    /// Replays comma-separated transaction commands in order.
    ///
    /// Parse failures and engine errors are reported per line and never
    /// stop the replay.
    pub fn process_commands<R: Read>(&mut self, reader: R) -> Result<Vec<Diagnostic>> {
        for_each_line(reader, COMMAND_DELIMITER, |record| {
            let command = Command::parse(record)?;
            self.apply(command)
        })
    }

    /// Applies a single parsed command.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Play {
                customer_id,
                attraction_id,
                peak,
            } => self
                .process_transaction(&customer_id, &attraction_id, peak)
                .map(|_| ()),
            Command::AddFunds {
                customer_id,
                amount,
            } => self.add_funds(&customer_id, amount),
            Command::NewCustomer(customer) => {
                self.register_customer(customer);
                Ok(())
            }
        }
    }

    /// Writes the end-of-day analytics report.
    pub fn write_summary<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "====== {} Report ======", self.name)?;

        match self.find_richest_customer() {
            Some(c) => writeln!(
                writer,
                "Richest customer: {} ({}) with {}",
                c.name(),
                c.id(),
                c.balance()
            )?,
            None => writeln!(writer, "Richest customer: none")?,
        }
        writeln!(
            writer,
            "Median off-peak price: {}",
            self.median_attraction_price()
        )?;

        let counts = self.count_by_category();
        writeln!(writer, "Standard attractions: {}", counts.standard)?;
        writeln!(writer, "Active attractions: {}", counts.active)?;
        writeln!(writer, "Virtual reality attractions: {}", counts.immersive_vr)?;
        writeln!(writer, "Total revenue: {}", self.formatted_revenue())?;

        writer.flush()?;
        Ok(())
    }

    /// Writes final customer states as CSV, sorted by customer ID.
    pub fn write_customers<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut customers: Vec<_> = self.customers.values().collect();
        customers.sort_by(|a, b| a.id().cmp(b.id()));

        for c in customers {
            csv_writer.serialize(CustomerRow {
                id: c.id(),
                name: c.name(),
                age: c.age(),
                discount: c.discount(),
                balance: c.balance(),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
