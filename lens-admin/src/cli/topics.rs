use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use lens_core::{ConfigEntry, NewTopic};

use super::fmt_opt;
use crate::resolve::TopicFields;
use crate::upstream::UpstreamArgs;

#[derive(Debug, Args)]
pub struct Topics {
    #[command(subcommand)]
    command: TopicsCommands,
}

#[derive(Debug, Subcommand)]
enum TopicsCommands {
    #[command(
        about = "List all topics with their partition count",
        after_help = "Examples:
  lens-admin topics list
  lens-admin topics list --output json"
    )]
    List {
        #[arg(long, value_parser = ["json"], help = "Output format: json (default: table)")]
        output: Option<String>,
    },
    #[command(
        about = "Show partitions, replicas and metrics of a topic",
        after_help = "Examples:
  lens-admin topics describe orders
  lens-admin topics describe orders --output json"
    )]
    Describe {
        topic: String,
        #[arg(long, value_parser = ["json"], help = "Output format: json (default: plain)")]
        output: Option<String>,
    },
    #[command(
        about = "Create a topic",
        after_help = "Examples:
  lens-admin topics create orders
  lens-admin topics create orders --partitions 6 --replication-factor 3
  lens-admin topics create audit --config retention.ms=86400000 --config cleanup.policy=compact

Partitions and replication factor fall back to the cluster defaults when omitted."
    )]
    Create {
        topic: String,
        #[arg(long, help = "Number of partitions (cluster default when omitted)")]
        partitions: Option<i32>,
        #[arg(long, help = "Replication factor (cluster default when omitted)")]
        replication_factor: Option<i32>,
        #[arg(long = "config", value_parser = parse_config_entry, help = "Topic config as key=value (repeatable)")]
        configs: Vec<ConfigEntry>,
    },
    #[command(about = "Delete a topic")]
    Delete { topic: String },
}

fn parse_config_entry(raw: &str) -> Result<ConfigEntry, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if name.trim().is_empty() {
        return Err(format!("missing config name in '{}'", raw));
    }
    Ok(ConfigEntry {
        name: name.trim().to_string(),
        value: value.trim().to_string(),
    })
}

pub async fn handle(topics: Topics, upstream: &UpstreamArgs) -> Result<()> {
    let schema = upstream.connect().await?;

    match topics.command {
        TopicsCommands::List { output } => {
            let fields = TopicFields {
                num_partitions: true,
                ..Default::default()
            };
            let topics = schema.query.topics(&fields).await?;
            if matches!(output.as_deref(), Some("json")) {
                println!("{}", serde_json::to_string_pretty(&topics)?);
            } else {
                println!("{:<50} {:<12}", "TOPIC", "PARTITIONS");
                println!("{}", "-".repeat(63));
                for t in topics {
                    println!("{:<50} {:<12}", t.topic.name, t.topic.num_partitions());
                }
            }
        }
        TopicsCommands::Describe { topic, output } => {
            let view = schema
                .query
                .topic(&topic, &TopicFields::all())
                .await?
                .ok_or_else(|| anyhow!("topic not found: {}", topic))?;
            if matches!(output.as_deref(), Some("json")) {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("Topic: {}", view.topic.name);
                println!("Partitions: {}", view.topic.num_partitions());
                println!("Total replicas: {}", fmt_opt(view.total_replicas.value()));
                println!("In-sync replicas: {}", fmt_opt(view.total_isrs.value()));
                println!("Log size (GB): {}", fmt_opt(view.log_size.value()));
                println!(
                    "Brokers with replicas: {}",
                    fmt_opt(view.brokers_with_replicas.value().map(|ids| format!("{:?}", ids)))
                );
                println!();
                println!(
                    "{:<10} {:<8} {:<20} {:<20} {:<20}",
                    "PARTITION", "LEADER", "REPLICAS", "ISR", "OFFLINE"
                );
                println!("{}", "-".repeat(82));
                for p in &view.topic.partitions {
                    println!(
                        "{:<10} {:<8} {:<20} {:<20} {:<20}",
                        p.partition,
                        fmt_opt(p.leader),
                        format!("{:?}", p.replicas),
                        format!("{:?}", p.isr),
                        format!("{:?}", p.offline_replicas)
                    );
                }
            }
        }
        TopicsCommands::Create {
            topic,
            partitions,
            replication_factor,
            configs,
        } => {
            let new_topic = NewTopic::new(topic, replication_factor, partitions, configs);
            let created = schema.mutation.add_topic(new_topic).await?;
            println!("Topic created: {}", created.name);
        }
        TopicsCommands::Delete { topic } => match schema.mutation.delete_topic(&topic).await? {
            Some(name) => println!("Topic deleted: {}", name),
            None => return Err(anyhow!("topic not found: {}", topic)),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_entries_parse_key_value() {
        let entry = parse_config_entry("retention.ms = 1000").unwrap();
        assert_eq!(entry.name, "retention.ms");
        assert_eq!(entry.value, "1000");
        assert!(parse_config_entry("retention.ms").is_err());
        assert!(parse_config_entry("=1").is_err());
    }
}
