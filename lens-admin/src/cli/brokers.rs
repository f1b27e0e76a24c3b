use anyhow::Result;
use clap::{Args, Subcommand};

use super::fmt_opt;
use crate::resolve::BrokerFields;
use crate::upstream::UpstreamArgs;

#[derive(Debug, Args)]
pub struct Brokers {
    #[command(subcommand)]
    command: BrokersCommands,
}

#[derive(Debug, Subcommand)]
enum BrokersCommands {
    #[command(
        about = "List the brokers of the cluster, sorted by id",
        after_help = "Examples:
  lens-admin brokers list
  lens-admin brokers list --metrics
  lens-admin brokers list --broker-ids 1,2 --output json

Env:
  LENS_ADMIN_URL      (default http://127.0.0.1:8082)
  LENS_PROMETHEUS_URL (default http://localhost:9090)"
    )]
    List {
        #[arg(long, value_delimiter = ',', help = "Only these broker ids")]
        broker_ids: Vec<i32>,
        #[arg(
            long,
            default_value_t = false,
            help = "Include CPU, heap and under-replicated partitions"
        )]
        metrics: bool,
        #[arg(long, value_parser = ["json"], help = "Output format: json (default: table)")]
        output: Option<String>,
    },
}

pub async fn handle(brokers: Brokers, upstream: &UpstreamArgs) -> Result<()> {
    let schema = upstream.connect().await?;

    match brokers.command {
        BrokersCommands::List {
            broker_ids,
            metrics,
            output,
        } => {
            let fields = if metrics {
                BrokerFields {
                    cpu_usage: true,
                    jvm_memory_usage: true,
                    under_replicated_partitions: true,
                    ..Default::default()
                }
            } else {
                BrokerFields::default()
            };
            let ids = (!broker_ids.is_empty()).then_some(broker_ids.as_slice());
            let brokers = schema.query.brokers(None, ids, &fields).await?;

            if matches!(output.as_deref(), Some("json")) {
                println!("{}", serde_json::to_string_pretty(&brokers)?);
            } else if metrics {
                println!(
                    "{:<10} {:<30} {:<8} {:<10} {:<16} {:<10}",
                    "BROKER ID", "HOST", "PORT", "CPU %", "HEAP BYTES", "URP"
                );
                println!("{}", "-".repeat(89));
                for b in brokers {
                    println!(
                        "{:<10} {:<30} {:<8} {:<10} {:<16} {:<10}",
                        b.broker.broker_id,
                        b.broker.host,
                        b.broker.port,
                        fmt_opt(b.cpu_usage.value().map(|s| format!("{:.2}", s.value))),
                        fmt_opt(b.jvm_memory_usage.value().map(|s| s.value)),
                        fmt_opt(b.under_replicated_partitions.value().map(|s| s.value)),
                    );
                }
            } else {
                println!("{:<10} {:<30} {:<8}", "BROKER ID", "HOST", "PORT");
                println!("{}", "-".repeat(50));
                for b in brokers {
                    println!(
                        "{:<10} {:<30} {:<8}",
                        b.broker.broker_id, b.broker.host, b.broker.port
                    );
                }
            }
        }
    }

    Ok(())
}
