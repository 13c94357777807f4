//! # DynamoDB Client
//!
//! Builds the SDK client from [`DynamoDbConfig`] and checks table access.

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;
use aws_smithy_types::timeout::TimeoutConfig;

use super::schema;
use crate::config::DynamoDbConfig;
use crate::infrastructure::persistence::traits::RepositoryResult;

/// Environment variables that carry explicit AWS credentials.
const CREDENTIAL_VARIABLES: [&str; 3] = [
    "AWS_ACCESS_KEY_ID",
    "AWS_PROFILE",
    "AWS_WEB_IDENTITY_TOKEN_FILE",
];

/// Builds a DynamoDB client.
///
/// Starts from the SDK default provider chain, then applies the region,
/// the optional endpoint override and the per-operation timeout.
pub async fn build_client(config: &DynamoDbConfig) -> Client {
    if !config.is_local() && !has_explicit_credentials() {
        tracing::warn!(
            region = %config.region,
            "no explicit AWS credentials and no local endpoint; relying on the default provider chain"
        );
    }

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

    if let Some(endpoint) = &config.endpoint {
        builder = builder.endpoint_url(endpoint);
    }

    let timeout_config = TimeoutConfig::builder()
        .operation_timeout(config.operation_timeout())
        .build();
    builder = builder.timeout_config(timeout_config);

    tracing::info!(
        region = %config.region,
        endpoint = config.endpoint.as_deref().unwrap_or("aws"),
        table = %config.table_name,
        "DynamoDB client configured"
    );
    Client::from_conf(builder.build())
}

/// Checks that the configured table exists and is reachable.
///
/// # Errors
///
/// Returns a store error if `DescribeTable` fails.
pub async fn verify_table(client: &Client, table_name: &str) -> RepositoryResult<()> {
    let status = schema::table_status(client, table_name).await?;
    tracing::info!(table = table_name, status = ?status, "DynamoDB table reachable");
    Ok(())
}

fn has_explicit_credentials() -> bool {
    CREDENTIAL_VARIABLES
        .iter()
        .any(|name| std::env::var_os(name).is_some_and(|v| !v.is_empty()))
}
