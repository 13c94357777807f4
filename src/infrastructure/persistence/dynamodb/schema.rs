//! # Table Schema
//!
//! Attribute names, index names and table provisioning for the chargeback
//! table.
//!
//! One item per chargeback, hash key `id`, plus three global secondary
//! indexes projecting every attribute:
//!
//! | index | hash key |
//! |---|---|
//! | `transaction-id-index` | `transaction_id` |
//! | `merchant-id-index` | `merchant_id` |
//! | `status-index` | `status` |

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ScalarAttributeType, TableStatus,
};
use std::time::Duration;
use tracing::{debug, info};

use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};

/// Hash key.
pub const ATTR_ID: &str = "id";
/// Disputed transaction.
pub const ATTR_TRANSACTION_ID: &str = "transaction_id";
/// Merchant.
pub const ATTR_MERCHANT_ID: &str = "merchant_id";
/// Amount, stored as a number.
pub const ATTR_AMOUNT: &str = "amount";
/// Currency code.
pub const ATTR_CURRENCY: &str = "currency";
/// Masked card number.
pub const ATTR_CARD_NUMBER: &str = "card_number";
/// Dispute reason.
pub const ATTR_REASON: &str = "reason";
/// Review status. Reserved word in expressions.
pub const ATTR_STATUS: &str = "status";
/// Optional description.
pub const ATTR_DESCRIPTION: &str = "description";
/// Transaction time.
pub const ATTR_TRANSACTION_DATE: &str = "transaction_date";
/// Chargeback opening time.
pub const ATTR_CHARGEBACK_DATE: &str = "chargeback_date";
/// Creation time.
pub const ATTR_CREATED_AT: &str = "created_at";
/// Last modification time.
pub const ATTR_UPDATED_AT: &str = "updated_at";

/// Index on `transaction_id`.
pub const INDEX_TRANSACTION_ID: &str = "transaction-id-index";
/// Index on `merchant_id`.
pub const INDEX_MERCHANT_ID: &str = "merchant-id-index";
/// Index on `status`.
pub const INDEX_STATUS: &str = "status-index";

/// Placeholder for the reserved `status` attribute.
pub const STATUS_PLACEHOLDER: &str = "#status";

/// Guard for writes that must create a new item.
pub const CONDITION_ABSENT: &str = "attribute_not_exists(id)";
/// Guard for writes that must hit an existing item.
pub const CONDITION_PRESENT: &str = "attribute_exists(id)";

const TABLE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const TABLE_POLL_ATTEMPTS: u32 = 60;

fn schema_error(err: BuildError) -> RepositoryError {
    RepositoryError::internal(format!("invalid table schema: {err}"))
}

fn hash_key(attribute: &str) -> Result<KeySchemaElement, BuildError> {
    KeySchemaElement::builder()
        .attribute_name(attribute)
        .key_type(KeyType::Hash)
        .build()
}

fn string_attribute(attribute: &str) -> Result<AttributeDefinition, BuildError> {
    AttributeDefinition::builder()
        .attribute_name(attribute)
        .attribute_type(ScalarAttributeType::S)
        .build()
}

fn index_on(index_name: &str, attribute: &str) -> Result<GlobalSecondaryIndex, BuildError> {
    GlobalSecondaryIndex::builder()
        .index_name(index_name)
        .key_schema(hash_key(attribute)?)
        .projection(
            Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
        )
        .build()
}

/// Creates the chargeback table with its indexes and waits until it is
/// active.
///
/// Uses on-demand billing, so no throughput needs to be provisioned.
///
/// # Errors
///
/// Returns a store error if the table cannot be created or does not become
/// active in time.
pub async fn create_table(client: &Client, table_name: &str) -> RepositoryResult<()> {
    let indexed = [
        (INDEX_TRANSACTION_ID, ATTR_TRANSACTION_ID),
        (INDEX_MERCHANT_ID, ATTR_MERCHANT_ID),
        (INDEX_STATUS, ATTR_STATUS),
    ];

    let mut request = client
        .create_table()
        .table_name(table_name)
        .billing_mode(BillingMode::PayPerRequest)
        .key_schema(hash_key(ATTR_ID).map_err(schema_error)?)
        .attribute_definitions(string_attribute(ATTR_ID).map_err(schema_error)?);

    for (index_name, attribute) in indexed {
        request = request
            .attribute_definitions(string_attribute(attribute).map_err(schema_error)?)
            .global_secondary_indexes(index_on(index_name, attribute).map_err(schema_error)?);
    }

    request.send().await.map_err(|e| {
        RepositoryError::store(
            "create_table",
            aws_sdk_dynamodb::error::DisplayErrorContext(&e).to_string(),
        )
    })?;
    info!(table = table_name, "Chargeback table created");

    wait_until_active(client, table_name).await
}

async fn wait_until_active(client: &Client, table_name: &str) -> RepositoryResult<()> {
    for attempt in 1..=TABLE_POLL_ATTEMPTS {
        let status = table_status(client, table_name).await?;
        if status == Some(TableStatus::Active) {
            return Ok(());
        }
        debug!(table = table_name, attempt, ?status, "Waiting for table");
        tokio::time::sleep(TABLE_POLL_INTERVAL).await;
    }
    Err(RepositoryError::timeout(
        "create_table",
        format!("table {table_name} did not become active"),
    ))
}

/// Returns the table status, or an error if the table cannot be described.
///
/// # Errors
///
/// Returns a store error if the table does not exist or is not accessible.
pub async fn table_status(client: &Client, table_name: &str) -> RepositoryResult<Option<TableStatus>> {
    let response = client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| {
            RepositoryError::store(
                "describe_table",
                aws_sdk_dynamodb::error::DisplayErrorContext(&e).to_string(),
            )
        })?;

    Ok(response
        .table()
        .and_then(|table| table.table_status())
        .cloned())
}
