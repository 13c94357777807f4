//! # Item Codec
//!
//! Conversion between [`Chargeback`] and DynamoDB attribute maps.
//!
//! Items are flat with snake_case keys. `amount` is a number attribute;
//! timestamps are RFC 3339 strings with nanosecond precision; `description`
//! is omitted when absent.

use std::collections::HashMap;
use std::str::FromStr;

use aws_sdk_dynamodb::types::AttributeValue;
use rust_decimal::Decimal;

use super::schema::*;
use crate::domain::entities::{Chargeback, ChargebackParts};
use crate::domain::value_objects::{
    CardNumber, ChargebackId, ChargebackReason, ChargebackStatus, Timestamp,
};
use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};

/// A DynamoDB item.
pub type Item = HashMap<String, AttributeValue>;

/// Encodes a chargeback as a DynamoDB item.
#[must_use]
pub fn to_item(chargeback: &Chargeback) -> Item {
    let mut item = Item::with_capacity(13);
    let mut put_s = |name: &str, value: String| {
        item.insert(name.to_string(), AttributeValue::S(value));
    };

    put_s(ATTR_ID, chargeback.id().to_string());
    put_s(ATTR_TRANSACTION_ID, chargeback.transaction_id().to_string());
    put_s(ATTR_MERCHANT_ID, chargeback.merchant_id().to_string());
    put_s(ATTR_CURRENCY, chargeback.currency().to_string());
    put_s(ATTR_CARD_NUMBER, chargeback.card_number().to_string());
    put_s(ATTR_REASON, chargeback.reason().to_string());
    put_s(ATTR_STATUS, chargeback.status().to_string());
    put_s(
        ATTR_TRANSACTION_DATE,
        chargeback.transaction_date().to_rfc3339_nanos(),
    );
    put_s(
        ATTR_CHARGEBACK_DATE,
        chargeback.chargeback_date().to_rfc3339_nanos(),
    );
    put_s(ATTR_CREATED_AT, chargeback.created_at().to_rfc3339_nanos());
    put_s(ATTR_UPDATED_AT, chargeback.updated_at().to_rfc3339_nanos());
    if let Some(description) = chargeback.description() {
        put_s(ATTR_DESCRIPTION, description.to_string());
    }

    item.insert(
        ATTR_AMOUNT.to_string(),
        AttributeValue::N(chargeback.amount().to_string()),
    );
    item
}

fn string_attr<'a>(item: &'a Item, name: &str) -> RepositoryResult<&'a str> {
    item.get(name)
        .ok_or_else(|| RepositoryError::serialization(format!("missing attribute {name}")))?
        .as_s()
        .map(String::as_str)
        .map_err(|_| RepositoryError::serialization(format!("attribute {name} is not a string")))
}

fn number_attr<'a>(item: &'a Item, name: &str) -> RepositoryResult<&'a str> {
    item.get(name)
        .ok_or_else(|| RepositoryError::serialization(format!("missing attribute {name}")))?
        .as_n()
        .map(String::as_str)
        .map_err(|_| RepositoryError::serialization(format!("attribute {name} is not a number")))
}

fn timestamp_attr(item: &Item, name: &str) -> RepositoryResult<Timestamp> {
    let text = string_attr(item, name)?;
    Timestamp::parse_rfc3339(text)
        .map_err(|e| RepositoryError::serialization(format!("attribute {name}: {e}")))
}

fn parsed_attr<T>(item: &Item, name: &str) -> RepositoryResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    string_attr(item, name)?
        .parse()
        .map_err(|e: T::Err| RepositoryError::serialization(format!("attribute {name}: {e}")))
}

/// Decodes a DynamoDB item into a chargeback.
///
/// # Errors
///
/// Returns `RepositoryError::Serialization` if a required attribute is
/// missing or malformed.
pub fn from_item(item: &Item) -> RepositoryResult<Chargeback> {
    let amount = number_attr(item, ATTR_AMOUNT)?;
    let amount = Decimal::from_str(amount)
        .map_err(|e| RepositoryError::serialization(format!("attribute {ATTR_AMOUNT}: {e}")))?;

    let description = item
        .get(ATTR_DESCRIPTION)
        .and_then(|v| v.as_s().ok())
        .filter(|d| !d.is_empty())
        .cloned();

    Ok(Chargeback::from_parts(ChargebackParts {
        id: ChargebackId::new(string_attr(item, ATTR_ID)?),
        transaction_id: string_attr(item, ATTR_TRANSACTION_ID)?.to_string(),
        merchant_id: string_attr(item, ATTR_MERCHANT_ID)?.to_string(),
        amount,
        currency: string_attr(item, ATTR_CURRENCY)?.to_string(),
        card_number: CardNumber::from_masked(string_attr(item, ATTR_CARD_NUMBER)?),
        reason: parsed_attr::<ChargebackReason>(item, ATTR_REASON)?,
        status: parsed_attr::<ChargebackStatus>(item, ATTR_STATUS)?,
        description,
        transaction_date: timestamp_attr(item, ATTR_TRANSACTION_DATE)?,
        chargeback_date: timestamp_attr(item, ATTR_CHARGEBACK_DATE)?,
        created_at: timestamp_attr(item, ATTR_CREATED_AT)?,
        updated_at: timestamp_attr(item, ATTR_UPDATED_AT)?,
    }))
}
