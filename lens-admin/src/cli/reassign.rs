use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use lens_core::TopicAssignment;

use crate::reassign::ReassignMode;
use crate::upstream::UpstreamArgs;

#[derive(Debug, Args)]
#[command(
    about = "Move partition replicas to new brokers",
    after_help = "Examples:
  lens-admin reassign --plan moves.json --dry-run
  lens-admin reassign --plan moves.json
  lens-admin reassign --ongoing

Plan file:
  [
    { \"topic\": \"orders\",
      \"partitionAssignment\": [ { \"partition\": 0, \"replicas\": [3, 4] } ] }
  ]

Workflow:
  1. Preview the replica delta: lens-admin reassign --plan moves.json --dry-run
  2. Submit:                    lens-admin reassign --plan moves.json
  3. Follow progress:           lens-admin reassign --ongoing

Retired replicas stay in the submitted list after the desired ones until the
cluster finishes the move."
)]
pub struct Reassign {
    #[arg(long, required_unless_present = "ongoing", help = "JSON file with the desired assignment")]
    plan: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = false,
        help = "Dry run: compute and print the delta without submitting"
    )]
    dry_run: bool,
    #[arg(long, conflicts_with = "plan", help = "List reassignments in progress")]
    ongoing: bool,
    #[arg(long, value_parser = ["json"], help = "Output format: json (default: table)")]
    output: Option<String>,
}

pub async fn handle(args: Reassign, upstream: &UpstreamArgs) -> Result<()> {
    let schema = upstream.connect().await?;
    let json = matches!(args.output.as_deref(), Some("json"));

    let Some(plan_path) = args.plan else {
        let ongoing = schema.query.ongoing_reassignments().await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&ongoing)?);
        } else {
            println!(
                "{:<40} {:<10} {:<20} {:<15} {:<15}",
                "TOPIC", "PARTITION", "REPLICAS", "ADDING", "REMOVING"
            );
            println!("{}", "-".repeat(104));
            for r in ongoing {
                println!(
                    "{:<40} {:<10} {:<20} {:<15} {:<15}",
                    r.topic,
                    r.partition,
                    format!("{:?}", r.replicas),
                    format!("{:?}", r.adding_replicas),
                    format!("{:?}", r.removing_replicas)
                );
            }
        }
        return Ok(());
    };

    let raw = tokio::fs::read_to_string(&plan_path)
        .await
        .with_context(|| format!("unable to read plan file {}", plan_path.display()))?;
    let requests: Vec<TopicAssignment> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid plan file {}", plan_path.display()))?;

    let mode = if args.dry_run {
        ReassignMode::DryRun
    } else {
        ReassignMode::Submit
    };
    let outcomes = schema.mutation.reassign_partitions(&requests, mode).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        println!(
            "{:<40} {:<10} {:<20} {:<15} {:<15}",
            "TOPIC", "PARTITION", "REPLICAS", "ADDING", "REMOVING"
        );
        println!("{}", "-".repeat(104));
        for outcome in &outcomes {
            match &outcome.result {
                Ok(plan) => {
                    for p in &plan.partitions {
                        println!(
                            "{:<40} {:<10} {:<20} {:<15} {:<15}",
                            plan.name,
                            p.partition,
                            format!("{:?}", p.replicas),
                            format!("{:?}", p.adding_replicas),
                            format!("{:?}", p.removing_replicas)
                        );
                    }
                }
                Err(e) => eprintln!("{:<40} error: {}", outcome.topic, e),
            }
        }
        if mode == ReassignMode::DryRun {
            println!("Dry run, nothing submitted");
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        return Err(anyhow!("{} of {} topics failed", failed, outcomes.len()));
    }
    Ok(())
}
