use std::sync::Arc;

use anyhow::bail;

use mailscreen::classifier::HttpClassifier;
use mailscreen::config::AnalyzerConfig;
use mailscreen::mail::{self, FileSource};
use mailscreen::pipeline::BatchAnalyzer;
use mailscreen::pipeline::view::ViewState;
use mailscreen::senders::ReviewQueue;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AnalyzerConfig::from_env()?;

    let input = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MAILSCREEN_INPUT").ok())
        .unwrap_or_else(|| {
            eprintln!("Usage: mailscreen <messages.json>");
            eprintln!("  (or set MAILSCREEN_INPUT to a JSON dump of raw messages)");
            std::process::exit(1);
        });

    eprintln!("📬 mailscreen v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Classifier: {}", config.classifier_url);
    eprintln!("   Input: {input}");

    let source = FileSource::load(&input)?;
    let raw = mail::fetch_recent(&source, config.max_emails, config.max_in_flight).await?;
    eprintln!("   Messages: {}\n", raw.len());

    let classifier = Arc::new(HttpClassifier::new(&config.classifier_url));
    let analyzer = BatchAnalyzer::new(classifier, &config);

    let Some(batch) = analyzer.analyze(raw).await else {
        // Only reachable if another batch were submitted concurrently.
        bail!("batch was superseded before it settled");
    };

    println!("Email security score: {:.1}/100", batch.risk_score);

    println!("\nActivity by hour:");
    if batch.histogram.is_empty() {
        println!("  (no pattern data available)");
    }
    for (hour, count) in batch.histogram.iter() {
        println!("  {hour:02}:00  {count}");
    }

    let state = ViewState::default();
    let page = state.render(&batch, config.page_size);
    println!(
        "\nShowing {}-{} of {}:",
        page.first_index, page.last_index, page.total_matching
    );
    for entry in &page.entries {
        println!(
            "  [{:>13}] {} — {}",
            entry.label().as_str(),
            entry.email.sender,
            entry.email.subject
        );
    }

    let review = ReviewQueue::from_batch(&batch.emails, &config.trusted_domains);
    if !review.is_empty() {
        println!("\nNew senders needing review: {}", review.len());
    }

    Ok(())
}
