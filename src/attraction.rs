//! Priced attractions and their variant-specific pricing rules.
//!
//! An attraction's variant is fixed at construction and determines both the
//! ID prefix it must carry and the off-peak discount it offers.

use crate::error::{EngineError, Result};
use crate::money::Pence;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Required length of every attraction ID.
pub const ID_LENGTH: usize = 10;

/// Off-peak rate for active attractions and reward-paying cabinets.
fn twenty_percent_off() -> Decimal {
    Decimal::new(8, 1)
}

/// Off-peak rate for cabinets that pay no reward.
fn half_price() -> Decimal {
    Decimal::new(5, 1)
}

/// Coarse classification of an attraction, most specific variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttractionCategory {
    Standard,
    Active,
    ImmersiveVr,
}

/// VR equipment bundled with an immersive attraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipmentTier {
    /// Headset only. 10% off-peak discount.
    Basic,
    /// Headset and controller. 5% off-peak discount.
    Standard,
    /// Full body tracking. Never discounted.
    Full,
}

impl EquipmentTier {
    /// Multiplier applied to the base price off-peak.
    pub fn off_peak_rate(self) -> Decimal {
        match self {
            EquipmentTier::Basic => Decimal::new(90, 2),
            EquipmentTier::Standard => Decimal::new(95, 2),
            EquipmentTier::Full => Decimal::ONE,
        }
    }

    /// Token used in attraction records.
    pub fn as_str(self) -> &'static str {
        match self {
            EquipmentTier::Basic => "headsetOnly",
            EquipmentTier::Standard => "headsetAndController",
            EquipmentTier::Full => "fullBodyTracking",
        }
    }
}

impl FromStr for EquipmentTier {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "headsetonly" => Ok(EquipmentTier::Basic),
            "headsetandcontroller" => Ok(EquipmentTier::Standard),
            "fullbodytracking" => Ok(EquipmentTier::Full),
            other => Err(EngineError::MalformedRecord(format!(
                "unknown VR equipment {:?}",
                other
            ))),
        }
    }
}

/// Age rule shared by active and immersive VR attractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveRules {
    pub minimum_age: u32,
}

/// Variant payload of an attraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttractionKind {
    /// Cabinet game, ID prefix `C`.
    Standard { pays_reward: bool },

    /// Physical game, ID prefix `A` (but not `AV`).
    Active(ActiveRules),

    /// Virtual reality game, ID prefix `AV`. Age-restricted like `Active`.
    ImmersiveVr {
        active: ActiveRules,
        equipment: EquipmentTier,
    },
}

impl AttractionKind {
    fn check_prefix(&self, id: &str) -> Result<()> {
        let valid = match self {
            AttractionKind::Standard { .. } => id.starts_with('C'),
            AttractionKind::Active(_) => id.starts_with('A') && !id.starts_with("AV"),
            AttractionKind::ImmersiveVr { .. } => id.starts_with("AV"),
        };
        if valid {
            return Ok(());
        }

        let reason = match self {
            AttractionKind::Standard { .. } => "standard attraction IDs must start with 'C'",
            AttractionKind::Active(_) => {
                "active attraction IDs must start with 'A' and not with 'AV'"
            }
            AttractionKind::ImmersiveVr { .. } => "VR attraction IDs must start with 'AV'",
        };
        Err(EngineError::InvalidIdentifier {
            id: id.to_string(),
            reason,
        })
    }
}

/// A priced attraction. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attraction {
    id: String,
    name: String,
    base_price: Pence,
    kind: AttractionKind,
}

impl Attraction {
    /// Validates `id` against the base pattern and then the variant prefix.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: Pence,
        kind: AttractionKind,
    ) -> Result<Self> {
        let id = id.into();
        validate_id(&id)?;
        kind.check_prefix(&id)?;

        Ok(Attraction {
            id,
            name: name.into(),
            base_price,
            kind,
        })
    }

    pub fn standard(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: Pence,
        pays_reward: bool,
    ) -> Result<Self> {
        Self::new(id, name, base_price, AttractionKind::Standard { pays_reward })
    }

    pub fn active(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: Pence,
        minimum_age: u32,
    ) -> Result<Self> {
        Self::new(
            id,
            name,
            base_price,
            AttractionKind::Active(ActiveRules { minimum_age }),
        )
    }

    pub fn immersive_vr(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: Pence,
        minimum_age: u32,
        equipment: EquipmentTier,
    ) -> Result<Self> {
        Self::new(
            id,
            name,
            base_price,
            AttractionKind::ImmersiveVr {
                active: ActiveRules { minimum_age },
                equipment,
            },
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_price(&self) -> Pence {
        self.base_price
    }

    pub fn kind(&self) -> &AttractionKind {
        &self.kind
    }

    pub fn category(&self) -> AttractionCategory {
        match self.kind {
            AttractionKind::Standard { .. } => AttractionCategory::Standard,
            AttractionKind::Active(_) => AttractionCategory::Active,
            AttractionKind::ImmersiveVr { .. } => AttractionCategory::ImmersiveVr,
        }
    }

    /// Minimum customer age, or `None` for attractions without an age rule.
    pub fn minimum_age(&self) -> Option<u32> {
        match &self.kind {
            AttractionKind::Standard { .. } => None,
            AttractionKind::Active(rules) => Some(rules.minimum_age),
            AttractionKind::ImmersiveVr { active, .. } => Some(active.minimum_age),
        }
    }

    /// Price charged for one play. Peak is always the base price.
    pub fn calculate_price(&self, peak: bool) -> Pence {
        if peak {
            return self.base_price;
        }

        let rate = match &self.kind {
            AttractionKind::Standard { pays_reward: true } => twenty_percent_off(),
            AttractionKind::Standard { pays_reward: false } => half_price(),
            AttractionKind::Active(_) => twenty_percent_off(),
            AttractionKind::ImmersiveVr { equipment, .. } => equipment.off_peak_rate(),
        };
        self.base_price.scale(rate)
    }
}

impl fmt::Display for Attraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.id, self.name, self.base_price)?;
        match &self.kind {
            AttractionKind::Standard { pays_reward } => {
                write!(f, ", pays reward: {}", pays_reward)
            }
            AttractionKind::Active(rules) => write!(f, ", minimum age: {}", rules.minimum_age),
            AttractionKind::ImmersiveVr { active, equipment } => write!(
                f,
                ", minimum age: {}, equipment: {}",
                active.minimum_age,
                equipment.as_str()
            ),
        }
    }
}

/// Checks that `id` is exactly ten ASCII letters or digits.
fn validate_id(id: &str) -> Result<()> {
    if id.len() == ID_LENGTH && id.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(EngineError::InvalidIdentifier {
            id: id.to_string(),
            reason: "must be exactly 10 alphanumeric characters",
        })
    }
}
