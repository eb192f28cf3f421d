//! Load generator for the product search service.
//!
//! Fires concurrent debug searches using a name term or a category term
//! with equal odds, then prints a status and latency summary.

use clap::Parser;
use futures_util::stream::{self, StreamExt};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

const NAME_TERMS: &[&str] = &["product"];
const CATEGORY_TERMS: &[&str] = &["electronics", "books", "home", "outdoors", "clothes"];

#[derive(Parser)]
#[command(name = "search-load")]
#[command(about = "Drive concurrent traffic at the product search service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Requests kept in flight at once.
    #[arg(short, long, default_value_t = 100)]
    concurrency: usize,

    /// Total requests to send.
    #[arg(short = 'n', long, default_value_t = 2_000)]
    requests: usize,
}

/// What happened to one request.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Outcome {
    Found { status: u16 },
    Rejected { status: u16, reason: String },
    Transport,
}

fn pick_term() -> &'static str {
    let mut rng = rand::thread_rng();
    let terms = if rng.gen_bool(0.5) { NAME_TERMS } else { CATEGORY_TERMS };
    terms.choose(&mut rng).copied().unwrap_or("product")
}

async fn send_one(client: &reqwest::Client, base: &str) -> (Outcome, Duration) {
    let term = pick_term();
    let start = Instant::now();
    let result = client
        .get(format!("{}/products/search", base))
        .query(&[("q", term), ("debug", "1")])
        .send()
        .await;

    let outcome = match result {
        Ok(res) => {
            let status = res.status().as_u16();
            if res.status().is_success() {
                if let Ok(body) = res.json::<serde_json::Value>().await {
                    tracing::debug!(
                        term,
                        found = %body["total_found"],
                        checked = %body["checked_request"],
                        total_checked = %body["total_checked"],
                        "Search succeeded"
                    );
                }
                Outcome::Found { status }
            } else {
                let reason = res.text().await.unwrap_or_default().trim().to_string();
                Outcome::Rejected { status, reason }
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "Request failed");
            Outcome::Transport
        }
    };
    (outcome, start.elapsed())
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[idx]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "search_load=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(cli.concurrency)
        .build()?;
    let base = cli.url.trim_end_matches('/').to_string();

    tracing::info!(
        url = %base,
        concurrency = cli.concurrency,
        requests = cli.requests,
        "Starting load run"
    );

    let start = Instant::now();
    let results: Vec<(Outcome, Duration)> = stream::iter(0..cli.requests)
        .map(|_| send_one(&client, &base))
        .buffer_unordered(cli.concurrency.max(1))
        .collect()
        .await;
    let elapsed = start.elapsed();

    let mut counts: BTreeMap<Outcome, usize> = BTreeMap::new();
    let mut latencies: Vec<Duration> = Vec::with_capacity(results.len());
    for (outcome, latency) in results {
        if matches!(outcome, Outcome::Found { .. }) {
            latencies.push(latency);
        }
        *counts.entry(outcome).or_default() += 1;
    }
    latencies.sort();

    println!("\n--- Load Run Results ---");
    println!("Total Requests: {}", cli.requests);
    println!("Concurrency:    {}", cli.concurrency);
    println!("Total Duration: {:?}", elapsed);
    println!("Requests/sec:   {:.2}", cli.requests as f64 / elapsed.as_secs_f64());
    for (outcome, count) in &counts {
        match outcome {
            Outcome::Found { status } => println!("{} OK:          {}", status, count),
            Outcome::Rejected { status, reason } => println!("{} {:<32} {}", status, reason, count),
            Outcome::Transport => println!("transport error:  {}", count),
        }
    }
    println!("P50 Latency:    {:?}", percentile(&latencies, 0.50));
    println!("P95 Latency:    {:?}", percentile(&latencies, 0.95));
    println!("P99 Latency:    {:?}", percentile(&latencies, 0.99));
    println!("------------------------\n");

    Ok(())
}
