use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pricing_core::{DomainError, DomainResult, ValueObject};

/// A stored, time-bounded price for one product.
///
/// Records are values: two records with identical fields compare equal, but a
/// price list may legitimately contain both. The resolver therefore never uses
/// `PartialEq` to decide whether a record has already been grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceRecord", into = "RawPriceRecord")]
pub struct PriceRecord {
    price_type: String,
    subtype: String,
    currency: String,
    amount: Decimal,
    valid_from: DateTime<FixedOffset>,
    valid_to: DateTime<FixedOffset>,
}

impl ValueObject for PriceRecord {}

impl PriceRecord {
    /// Build a record, rejecting intervals that end before they start.
    pub fn new(
        price_type: impl Into<String>,
        subtype: impl Into<String>,
        currency: impl Into<String>,
        amount: Decimal,
        valid_from: DateTime<FixedOffset>,
        valid_to: DateTime<FixedOffset>,
    ) -> DomainResult<Self> {
        if valid_from > valid_to {
            return Err(DomainError::invalid_interval(format!(
                "valid_from {} is after valid_to {}",
                valid_from.to_rfc3339(),
                valid_to.to_rfc3339()
            )));
        }

        Ok(Self {
            price_type: price_type.into(),
            subtype: subtype.into(),
            currency: currency.into(),
            amount,
            valid_from,
            valid_to,
        })
    }

    pub fn price_type(&self) -> &str {
        &self.price_type
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn valid_from(&self) -> DateTime<FixedOffset> {
        self.valid_from
    }

    pub fn valid_to(&self) -> DateTime<FixedOffset> {
        self.valid_to
    }

    /// Emit this record unchanged apart from the `overlapped` flag.
    pub fn to_resolved(&self, overlapped: bool) -> ResolvedPrice {
        ResolvedPrice {
            price_type: self.price_type.clone(),
            subtype: self.subtype.clone(),
            currency: self.currency.clone(),
            amount: self.amount,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            overlapped,
        }
    }
}

/// Wire/seed shape of a price record, validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPriceRecord {
    #[serde(rename = "type")]
    price_type: String,
    subtype: String,
    currency: String,
    amount: Decimal,
    valid_from: DateTime<FixedOffset>,
    valid_to: DateTime<FixedOffset>,
}

impl TryFrom<RawPriceRecord> for PriceRecord {
    type Error = DomainError;

    fn try_from(raw: RawPriceRecord) -> Result<Self, Self::Error> {
        PriceRecord::new(
            raw.price_type,
            raw.subtype,
            raw.currency,
            raw.amount,
            raw.valid_from,
            raw.valid_to,
        )
    }
}

impl From<PriceRecord> for RawPriceRecord {
    fn from(record: PriceRecord) -> Self {
        Self {
            price_type: record.price_type,
            subtype: record.subtype,
            currency: record.currency,
            amount: record.amount,
            valid_from: record.valid_from,
            valid_to: record.valid_to,
        }
    }
}

/// One entry of a resolved price timeline.
///
/// Either a stored record passed through, a merge of equal-amount overlapping
/// records, or a stored record flagged as `overlapped` because it conflicts
/// with another record's amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    #[serde(rename = "type")]
    pub price_type: String,
    pub subtype: String,
    pub currency: String,
    pub amount: Decimal,
    pub valid_from: DateTime<FixedOffset>,
    pub valid_to: DateTime<FixedOffset>,
    pub overlapped: bool,
}

impl ValueObject for ResolvedPrice {}

impl From<&ResolvedPrice> for PriceRecord {
    /// Feed a resolved entry back in as a record (the flag is dropped).
    ///
    /// Resolved entries always carry well-formed intervals, so no validation
    /// is needed here.
    fn from(resolved: &ResolvedPrice) -> Self {
        Self {
            price_type: resolved.price_type.clone(),
            subtype: resolved.subtype.clone(),
            currency: resolved.currency.clone(),
            amount: resolved.amount,
            valid_from: resolved.valid_from,
            valid_to: resolved.valid_to,
        }
    }
}
