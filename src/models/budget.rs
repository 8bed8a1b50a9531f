use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier for a budget. Some backends send `_id` strings,
/// others integer ids, so it is kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BudgetId(String);

impl BudgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BudgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for BudgetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "WireBudget")]
pub struct Budget {
    pub id: BudgetId,
    pub category: String,
    /// 1-12
    pub month: u32,
    pub year: i32,
    pub amount: Decimal,
}

/// Mongo backends may send `_id` alone or alongside an `id` virtual.
#[derive(Deserialize)]
struct WireBudget {
    #[serde(rename = "_id")]
    mongo_id: Option<BudgetId>,
    id: Option<BudgetId>,
    category: String,
    month: u32,
    year: i32,
    amount: Decimal,
}

impl TryFrom<WireBudget> for Budget {
    type Error = &'static str;

    fn try_from(wire: WireBudget) -> Result<Self, Self::Error> {
        let id = wire.mongo_id.or(wire.id).ok_or("missing field `id`")?;
        Ok(Self {
            id,
            category: wire.category,
            month: wire.month,
            year: wire.year,
            amount: wire.amount,
        })
    }
}

impl Budget {
    /// Period label, e.g. `6/2024`.
    pub fn period(&self) -> String {
        format!("{}/{}", self.month, self.year)
    }
}

/// Payload for `POST /budgets` and `PUT /budgets/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetForm {
    pub category: String,
    pub month: u32,
    pub year: i32,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
}

impl BudgetForm {
    pub fn new(category: String, month: u32, year: i32, amount: Decimal) -> Self {
        Self {
            category,
            month,
            year,
            amount,
        }
    }
}
