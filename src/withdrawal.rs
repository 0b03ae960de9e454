//! Withdrawal records and the request/response shapes around them.

use crate::catalog::AuthorId;
use crate::money::Money;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Lifecycle state of a withdrawal.
///
/// Every withdrawal is created pending; nothing moves it further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
}

/// A payout request recorded in the ledger. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Withdrawal {
    /// Global sequence number, starting at 1.
    pub id: u64,

    pub author_id: AuthorId,

    pub amount: Money,

    pub status: WithdrawalStatus,

    /// Creation time, serialized as `2025-01-20T09:15:00.000Z`.
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /withdrawals`.
///
/// Fields that are missing or of the wrong JSON type deserialize to `None`
/// instead of rejecting the body, so the ledger's own checks decide the
/// outcome.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WithdrawalRequest {
    #[serde(default, deserialize_with = "lenient_author_id")]
    pub author_id: Option<AuthorId>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<Money>,
}

impl WithdrawalRequest {
    pub fn new(author_id: AuthorId, amount: Money) -> Self {
        WithdrawalRequest {
            author_id: Some(author_id),
            amount: Some(amount),
        }
    }
}

/// A freshly created withdrawal plus the balance left after it.
///
/// `new_balance` is computed for the response only; the ledger derives
/// balances on demand and never stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalReceipt {
    #[serde(flatten)]
    pub withdrawal: Withdrawal,

    pub new_balance: Money,
}

fn serialize_timestamp<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Integral JSON numbers in range name an author; `1.0` counts as `1`.
fn lenient_author_id<'de, D>(deserializer: D) -> Result<Option<AuthorId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    let id = value
        .as_u64()
        .and_then(|n| AuthorId::try_from(n).ok())
        .or_else(|| {
            value
                .as_f64()
                .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(AuthorId::MAX)).contains(n))
                .map(|n| n as AuthorId)
        });
    Ok(id)
}

/// Numbers too large for `Money` saturate so the balance check rejects them.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    let amount = Money::deserialize(&value)
        .ok()
        .or_else(|| value.as_f64().and_then(Money::saturating_from_f64));
    Ok(amount)
}
