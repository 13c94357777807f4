//! Repository walkthrough against a live DynamoDB table.
//!
//! Exercises every repository operation once. Point `DYNAMODB_ENDPOINT` at
//! DynamoDB Local (`docker run -p 8000:8000 amazon/dynamodb-local`) to try
//! it without AWS.

use anyhow::Context;
use chargeback_api::config::AppConfig;
use chargeback_api::domain::entities::ChargebackBuilder;
use chargeback_api::domain::value_objects::{
    CardNumber, ChargebackId, ChargebackReason, ChargebackStatus, Timestamp,
};
use chargeback_api::infrastructure::persistence::ChargebackRepository;
use chargeback_api::infrastructure::persistence::dynamodb::{
    DynamoDbChargebackRepository, build_client, create_table,
};
use chargeback_api::telemetry;
use clap::Parser;
use rust_decimal::Decimal;

const FIVE_DAYS_SECS: i64 = 5 * 24 * 60 * 60;

#[derive(Parser, Debug)]
#[command(name = "chargeback-demo")]
#[command(about = "Walk through the chargeback repository against DynamoDB", long_about = None)]
struct Args {
    /// Create the table and its indexes before the walkthrough.
    #[arg(long)]
    create_table: bool,

    /// Records to skip in the listing step.
    #[arg(long, default_value_t = 0, value_name = "COUNT")]
    offset: usize,

    /// Maximum records in the listing step.
    #[arg(long, default_value_t = 10, value_name = "COUNT")]
    limit: usize,

    /// Leave the demo record in the table.
    #[arg(long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    telemetry::init(&config.logging);

    let table = config.dynamodb.table_name.clone();
    let client = build_client(&config.dynamodb).await;
    if args.create_table {
        create_table(&client, &table)
            .await
            .with_context(|| format!("failed to create table {table}"))?;
        println!("Created table {table}");
    }
    let repo = DynamoDbChargebackRepository::new(client, table);

    println!("\n=== Creating a new chargeback ===");
    let transaction_id = format!("tx-{}", ChargebackId::generate());
    let mut chargeback = ChargebackBuilder::new(
        transaction_id.clone(),
        "merchant-789",
        Decimal::new(15075, 2),
        "USD",
        CardNumber::mask("4111111111111111")?,
        ChargebackReason::Fraud,
        Timestamp::now().add_secs(-FIVE_DAYS_SECS),
    )
    .description("Suspicious transaction reported by cardholder")
    .build()?;
    repo.save(&mut chargeback).await.context("save failed")?;
    println!("Saved chargeback {}", chargeback.id());

    println!("\n=== Finding chargeback by ID ===");
    match repo.find_by_id(chargeback.id()).await? {
        Some(found) => println!(
            "Found {} ({} {})",
            found.transaction_id(),
            found.amount(),
            found.currency()
        ),
        None => println!("Chargeback not found"),
    }

    println!("\n=== Finding chargeback by transaction ID ===");
    match repo.find_by_transaction_id(&transaction_id).await? {
        Some(found) => println!("Found {} (status: {})", found.id(), found.status()),
        None => println!("Not visible through the index yet"),
    }

    println!("\n=== Finding chargebacks by merchant ID ===");
    let by_merchant = repo.find_by_merchant_id(chargeback.merchant_id()).await?;
    println!(
        "Found {} chargebacks for {}",
        by_merchant.len(),
        chargeback.merchant_id()
    );
    for (i, cb) in by_merchant.iter().enumerate() {
        println!(
            "  {}. {} - {} {} ({})",
            i + 1,
            cb.transaction_id(),
            cb.amount(),
            cb.currency(),
            cb.status()
        );
    }

    println!("\n=== Finding chargebacks by status ===");
    let pending = repo.find_by_status(ChargebackStatus::Pending).await?;
    println!("Found {} pending chargebacks", pending.len());

    println!("\n=== Approving chargeback ===");
    chargeback.approve()?;
    repo.update(&mut chargeback).await.context("update failed")?;
    println!("Chargeback {} approved", chargeback.id());

    println!(
        "\n=== Listing chargebacks (offset {}, limit {}) ===",
        args.offset, args.limit
    );
    let listed = repo.list(args.offset, args.limit).await?;
    println!("Listed {} chargebacks", listed.len());
    for (i, cb) in listed.iter().enumerate() {
        println!(
            "  {}. {} - {} ({})",
            i + 1,
            cb.id(),
            cb.transaction_id(),
            cb.status()
        );
    }

    if args.keep {
        println!("\nKept chargeback {}", chargeback.id());
    } else {
        repo.delete(chargeback.id()).await.context("delete failed")?;
        println!("\nDeleted chargeback {}", chargeback.id());
    }

    println!("\n=== Repository walkthrough completed ===");
    Ok(())
}
