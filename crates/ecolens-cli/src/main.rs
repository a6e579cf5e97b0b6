use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ecolens_core::{
    load_orders, normalize_weights, score_orders, Analysis, AnalysisOptions, CertStatus,
    CertVerifications, OrderScore, ProductRecord, WeightConfig, WeightPreset,
};
use ecolens_runtime::{EnrichmentOrchestrator, ProviderRegistry, RuntimeConfig};

mod cli;

use cli::{BatchFormat, Cli, Commands, OutputFormat, WeightArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Score {
            product,
            weights,
            config,
            enrich,
            verified,
            format,
        } => {
            let product = ProductRecord::from_file(&product)
                .with_context(|| format!("reading product {}", product.display()))?;
            let weights = load_weights(&weights)?;
            let config = load_runtime_config(config.as_deref(), enrich)?;

            let orchestrator =
                EnrichmentOrchestrator::from_registry(&ProviderRegistry::with_defaults(), config)
                    .context("setting up enrichment")?;
            let options = AnalysisOptions {
                cert_verifications: verified_certs(&verified),
                ..Default::default()
            };
            let analysis = orchestrator.analyze(&product, &weights, &options).await;

            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&analysis)?,
                OutputFormat::Yaml => serde_yaml::to_string(&analysis)?,
                OutputFormat::Summary => render_summary(&analysis),
            };
            println!("{}", output.trim_end());
        }

        Commands::Batch {
            orders,
            weights,
            format,
        } => {
            let items = load_orders(&orders)
                .with_context(|| format!("reading orders {}", orders.display()))?;
            let weights = load_weights(&weights)?;
            let scores = score_orders(&items, &weights);
            tracing::debug!(rows = items.len(), scored = scores.len(), "Batch scored");

            match format {
                BatchFormat::Json => println!("{}", serde_json::to_string_pretty(&scores)?),
                BatchFormat::Summary => print!("{}", render_batch(&scores)),
            }
        }

        Commands::Weights { weights } => {
            let normalized = normalize_weights(&load_weights(&weights)?);
            if normalized.is_empty() {
                tracing::warn!("No recognized metric has a positive weight; every score will be 0");
            }
            println!("{}", serde_json::to_string_pretty(&normalized)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries results, logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_weights(args: &WeightArgs) -> Result<WeightConfig> {
    if let Some(path) = &args.weights {
        return WeightConfig::from_file(path)
            .with_context(|| format!("reading weights {}", path.display()));
    }
    let preset = match &args.preset {
        Some(name) => name.parse::<WeightPreset>()?,
        None => WeightPreset::Balanced,
    };
    Ok(WeightConfig::preset(preset))
}

fn load_runtime_config(path: Option<&Path>, enrich: bool) -> Result<RuntimeConfig> {
    let mut config = match path {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    if enrich {
        config.enrichment.enabled = true;
    }
    Ok(config)
}

fn verified_certs(names: &[String]) -> CertVerifications {
    names
        .iter()
        .map(|name| (name.trim().to_lowercase(), CertStatus::Verified))
        .collect()
}

fn render_summary(analysis: &Analysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", analysis.product.title);
    let _ = writeln!(
        out,
        "  overall {} ({})  category {}  confidence {}  engine {:?}",
        analysis.overall, analysis.grade, analysis.category, analysis.confidence, analysis.engine
    );
    let _ = writeln!(
        out,
        "  est. {} kg CO2e, {} L water",
        analysis.estimates.co2_kg, analysis.estimates.water_l
    );

    let _ = writeln!(out, "\nMetrics:");
    for (key, metric) in analysis.metrics.iter() {
        let _ = writeln!(out, "  {:<20} {:>3}  {}", key.as_str(), metric.score, metric.note);
    }

    write_list(&mut out, "Boosted", &analysis.drivers.boosted);
    write_list(&mut out, "Dropped", &analysis.drivers.dropped);
    write_list(&mut out, "Greenwashing", &analysis.greenwashing);

    if !analysis.certifications.is_empty() {
        let _ = writeln!(out, "\nCertifications:");
        for cert in &analysis.certifications {
            let code = cert.code.as_deref().unwrap_or("-");
            let _ = writeln!(out, "  {} [{:?}] {} {}", cert.name, cert.status, code, cert.verify_url);
        }
    }

    if !analysis.alternatives.is_empty() {
        let _ = writeln!(out, "\nAlternatives:");
        for alt in &analysis.alternatives {
            let _ = writeln!(out, "  {}: {} (search: {})", alt.title, alt.reason, alt.query);
        }
    }

    write_list(&mut out, "Notes", &analysis.notes);
    out
}

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}:", heading);
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

fn render_batch(scores: &[OrderScore]) -> String {
    let mut out = String::new();
    for row in scores {
        let _ = writeln!(
            out,
            "{:>3} {}  {:<12} {:>3} kg {:>4} L  {}",
            row.overall, row.grade, row.category, row.co2_kg, row.water_l, row.title
        );
    }
    if !scores.is_empty() {
        let mean = scores.iter().map(|r| f64::from(r.overall)).sum::<f64>() / scores.len() as f64;
        let _ = writeln!(out, "\n{} orders, mean overall {:.0}", scores.len(), mean);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolens_core::analyze;

    #[test]
    fn test_summary_lists_sections() {
        let analysis = analyze(
            &ProductRecord::new("Bamboo Toothbrush")
                .with_bullets(["plastic-free packaging", "FSC certified", "eco-friendly"]),
            &WeightConfig::preset(WeightPreset::Balanced),
        );
        let summary = render_summary(&analysis);

        assert!(summary.starts_with("Bamboo Toothbrush\n"));
        assert!(summary.contains("category personal care"));
        assert!(summary.contains("carbonFootprint"));
        assert!(summary.contains("\nBoosted:\n"));
        assert!(summary.contains("\nCertifications:\n  fsc"));
        assert!(summary.contains("\nNotes:\n"));
    }

    #[test]
    fn test_default_weights_are_balanced() {
        let weights = load_weights(&WeightArgs::default()).unwrap();
        assert_eq!(weights, WeightConfig::preset(WeightPreset::Balanced));
    }

    #[test]
    fn test_unknown_preset_is_error() {
        let args = WeightArgs {
            weights: None,
            preset: Some("cheapest".to_string()),
        };
        assert!(load_weights(&args).is_err());
    }

    #[test]
    fn test_enrich_flag_enables_enrichment() {
        assert!(!load_runtime_config(None, false).unwrap().enrichment.enabled);
        assert!(load_runtime_config(None, true).unwrap().enrichment.enabled);
    }

    #[test]
    fn test_verified_flag_marks_claim_verified() {
        let options = AnalysisOptions {
            cert_verifications: verified_certs(&[" FSC ".to_string()]),
            ..Default::default()
        };
        let analysis = ecolens_core::analyze_with_options(
            &ProductRecord::new("Bamboo Toothbrush").with_bullets(["FSC certified", "GOTS cotton"]),
            &WeightConfig::preset(WeightPreset::Balanced),
            &options,
        );
        let status = |name: &str| {
            analysis
                .certifications
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.status)
        };
        assert_eq!(status("fsc"), Some(CertStatus::Verified));
        assert_eq!(status("gots"), Some(CertStatus::Claimed));
    }

    #[test]
    fn test_batch_summary() {
        let scores = score_orders(
            &[ecolens_core::OrderItem::new("Laundry detergent")],
            &WeightConfig::preset(WeightPreset::Balanced),
        );
        let table = render_batch(&scores);
        assert!(table.contains("Laundry detergent"));
        assert!(table.contains("1 orders"));
    }
}
