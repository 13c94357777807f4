//! # DynamoDB Chargeback Repository
//!
//! [`ChargebackRepository`] backed by a single DynamoDB table.
//!
//! - point reads use `GetItem` on the hash key
//! - lookups by transaction, merchant and status query the matching global
//!   secondary index and follow continuation keys
//! - writes are `PutItem`/`DeleteItem` guarded by condition expressions
//! - `list` sweeps the table with `Scan` pages
//!
//! Index reads are eventually consistent: a record saved a moment ago may
//! not be visible through an index yet.

use std::fmt;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;

use super::item::{from_item, to_item, Item as DynamoItem};
use super::schema::*;
use crate::domain::entities::Chargeback;
use crate::domain::value_objects::{ChargebackId, ChargebackStatus};
use crate::infrastructure::persistence::pagination::{offset_window, PagedSweep, SweepPage};
use crate::infrastructure::persistence::traits::{
    ChargebackRepository, RepositoryError, RepositoryResult, CHARGEBACK_ENTITY,
};

/// Key condition on one secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexKey {
    index: &'static str,
    attribute: &'static str,
    placeholder: &'static str,
}

impl IndexKey {
    const VALUE: &'static str = ":value";

    fn condition(&self) -> String {
        format!("{} = {}", self.placeholder, Self::VALUE)
    }
}

const BY_TRANSACTION: IndexKey = IndexKey {
    index: INDEX_TRANSACTION_ID,
    attribute: ATTR_TRANSACTION_ID,
    placeholder: "#transaction_id",
};

const BY_MERCHANT: IndexKey = IndexKey {
    index: INDEX_MERCHANT_ID,
    attribute: ATTR_MERCHANT_ID,
    placeholder: "#merchant_id",
};

const BY_STATUS: IndexKey = IndexKey {
    index: INDEX_STATUS,
    attribute: ATTR_STATUS,
    placeholder: STATUS_PLACEHOLDER,
};

/// Maps an SDK failure to a repository error for `operation`.
fn map_sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> RepositoryError
where
    E: std::error::Error + 'static,
    R: fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::TimeoutError(_) => RepositoryError::timeout(operation, message),
        SdkError::DispatchFailure(_) => {
            RepositoryError::connection(format!("{operation}: {message}"))
        }
        _ => RepositoryError::store(operation, message),
    }
}

fn page_limit(page_size: usize) -> i32 {
    i32::try_from(page_size).unwrap_or(i32::MAX)
}

/// DynamoDB implementation of [`ChargebackRepository`].
#[derive(Clone)]
pub struct DynamoDbChargebackRepository {
    client: Client,
    table_name: String,
}

impl fmt::Debug for DynamoDbChargebackRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamoDbChargebackRepository")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoDbChargebackRepository {
    /// Creates a repository over `table_name`.
    #[must_use]
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Returns the table name.
    #[inline]
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn id_key(id: &ChargebackId) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }

    async fn put_guarded(
        &self,
        operation: &'static str,
        chargeback: &Chargeback,
        condition: &str,
    ) -> Result<(), SdkError<PutItemError>> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(chargeback)))
            .condition_expression(condition)
            .send()
            .await
            .map(|_| {
                tracing::debug!(
                    operation,
                    chargeback_id = %chargeback.id(),
                    "chargeback written"
                );
            })
    }

    async fn query_index(
        &self,
        operation: &'static str,
        key: IndexKey,
        value: &str,
        max_items: Option<i32>,
    ) -> RepositoryResult<Vec<Chargeback>> {
        let mut results = Vec::new();
        let mut start_key: Option<DynamoItem> = None;

        loop {
            let response = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(key.index)
                .key_condition_expression(key.condition())
                .expression_attribute_names(key.placeholder, key.attribute)
                .expression_attribute_values(IndexKey::VALUE, AttributeValue::S(value.to_string()))
                .set_limit(max_items)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| map_sdk_error(operation, e))?;

            for item in response.items() {
                results.push(from_item(item)?);
            }

            if max_items.is_some() {
                break;
            }
            match response.last_evaluated_key() {
                Some(next) if !next.is_empty() => start_key = Some(next.clone()),
                _ => break,
            }
        }

        tracing::debug!(operation, index = key.index, count = results.len(), "index query");
        Ok(results)
    }
}

#[async_trait]
impl PagedSweep for DynamoDbChargebackRepository {
    type Item = Chargeback;
    type Cursor = DynamoItem;

    async fn fetch_page(
        &self,
        cursor: Option<DynamoItem>,
        page_size: usize,
    ) -> RepositoryResult<SweepPage<Chargeback, DynamoItem>> {
        let response = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(page_limit(page_size))
            .set_exclusive_start_key(cursor)
            .send()
            .await
            .map_err(|e| map_sdk_error("list", e))?;

        let items = response
            .items()
            .iter()
            .map(from_item)
            .collect::<RepositoryResult<Vec<_>>>()?;

        let next = response
            .last_evaluated_key()
            .filter(|key| !key.is_empty())
            .cloned();
        Ok(SweepPage { items, next })
    }
}

#[async_trait]
impl ChargebackRepository for DynamoDbChargebackRepository {
    async fn save(&self, chargeback: &mut Chargeback) -> RepositoryResult<()> {
        if chargeback.id().is_empty() {
            chargeback
                .assign_id(ChargebackId::generate())
                .map_err(|e| RepositoryError::internal(e.to_string()))?;
        }

        self.put_guarded("save", chargeback, CONDITION_ABSENT)
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(PutItemError::is_conditional_check_failed_exception)
                {
                    tracing::warn!(chargeback_id = %chargeback.id(), "identifier collision on save");
                    RepositoryError::duplicate(CHARGEBACK_ENTITY, chargeback.id().as_str())
                } else {
                    map_sdk_error("save", e)
                }
            })
    }

    async fn find_by_id(&self, id: &ChargebackId) -> RepositoryResult<Option<Chargeback>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, Self::id_key(id))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| map_sdk_error("find_by_id", e))?;

        response.item().map(from_item).transpose()
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> RepositoryResult<Option<Chargeback>> {
        let mut found = self
            .query_index("find_by_transaction_id", BY_TRANSACTION, transaction_id, Some(1))
            .await?;
        Ok((!found.is_empty()).then(|| found.swap_remove(0)))
    }

    async fn find_by_merchant_id(&self, merchant_id: &str) -> RepositoryResult<Vec<Chargeback>> {
        self.query_index("find_by_merchant_id", BY_MERCHANT, merchant_id, None)
            .await
    }

    async fn find_by_status(&self, status: ChargebackStatus) -> RepositoryResult<Vec<Chargeback>> {
        self.query_index("find_by_status", BY_STATUS, status.as_str(), None)
            .await
    }

    async fn update(&self, chargeback: &mut Chargeback) -> RepositoryResult<()> {
        chargeback.touch();

        self.put_guarded("update", chargeback, CONDITION_PRESENT)
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(PutItemError::is_conditional_check_failed_exception)
                {
                    RepositoryError::not_found(CHARGEBACK_ENTITY, chargeback.id().as_str())
                } else {
                    map_sdk_error("update", e)
                }
            })
    }

    async fn delete(&self, id: &ChargebackId) -> RepositoryResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, Self::id_key(id))
            .condition_expression(CONDITION_PRESENT)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(DeleteItemError::is_conditional_check_failed_exception)
                {
                    RepositoryError::not_found(CHARGEBACK_ENTITY, id.as_str())
                } else {
                    map_sdk_error("delete", e)
                }
            })?;

        tracing::debug!(chargeback_id = %id, "chargeback deleted");
        Ok(())
    }

    async fn list(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<Chargeback>> {
        offset_window(self, offset, limit).await
    }
}
