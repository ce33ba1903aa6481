use anyhow::{bail, Context, Result};
use clap::Parser;
use route_bench::{
    compare_snapshots, correlate, evaluate_dataset, load_snapshot, prepare_snapshot, unique_names,
    Cli, Config, CorrelationReport, DatasetAssembly, Reporter, SnapshotData, TerminalReporter,
    ThresholdPolicy,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config and apply CLI overrides
    let mut config = Config::load_or_default_at(&cli.config)?;
    cli.apply_to_config(&mut config);

    if cli.verbose {
        eprintln!("Configuration: {:?}", config);
    }

    if cli.snapshot.len() > 2 {
        bail!(
            "at most two snapshots can be compared; got {}",
            cli.snapshot.len()
        );
    }

    // 1. Load and prepare snapshots
    eprintln!("Loading snapshots...");
    let mut snapshots = Vec::new();
    for path in &cli.snapshot {
        let records = load_snapshot(path)
            .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;
        if cli.verbose {
            eprintln!("{}: {} records", path.display(), records.len());
        }
        snapshots.push(prepare_snapshot(&records, &config.engines.names));
    }

    // 2. Evaluate each snapshot's datasets
    eprintln!("Evaluating datasets...");
    let policy = config.analysis.threshold_policy;
    let mut evaluated = Vec::new();
    for (snapshot, path) in snapshots.iter().zip(&cli.snapshot) {
        let assemblies = evaluate_snapshot(snapshot, policy)
            .await
            .with_context(|| format!("Failed to evaluate snapshot: {}", path.display()))?;
        evaluated.push(assemblies);
    }

    // 3. Report
    let reporter = if config.output.color {
        TerminalReporter::new()
    } else {
        TerminalReporter::without_colors()
    };

    for (snapshot, assemblies) in snapshots.iter().zip(&evaluated) {
        reporter.report_snapshot(&snapshot.summaries, assemblies)?;
    }

    if let [first, second] = evaluated.as_slice() {
        eprintln!("Comparing snapshots...");
        let comparison = compare_snapshots(first, second)
            .context("Failed to compare snapshots")?;
        let title = format!(
            "{} vs {}",
            cli.snapshot[0].display(),
            cli.snapshot[1].display()
        );
        reporter.report_comparison(&title, &comparison)?;
    }

    if cli.correlate {
        eprintln!("Computing correlations...");
        for (snapshot, assemblies) in snapshots.iter().zip(&evaluated) {
            let correlations = snapshot_correlations(snapshot, assemblies)?;
            reporter.report_correlations(&correlations)?;
        }
    }

    Ok(())
}

/// Evaluate a snapshot's datasets on blocking worker threads, preserving the
/// dataset order in the result.
async fn evaluate_snapshot(
    snapshot: &SnapshotData,
    policy: ThresholdPolicy,
) -> Result<Vec<DatasetAssembly>> {
    let names = unique_names(&snapshot.datasets).context("Failed to name datasets")?;

    let mut handles = Vec::new();
    for (name, records) in names.into_iter().zip(snapshot.datasets.iter().cloned()) {
        handles.push(tokio::task::spawn_blocking(move || {
            evaluate_dataset(name, &records, policy)
        }));
    }

    let mut assemblies = Vec::new();
    for handle in handles {
        let assembly = handle
            .await
            .context("Evaluation task panicked")?
            .context("Failed to evaluate dataset")?;
        assemblies.push(assembly);
    }
    Ok(assemblies)
}

/// RTT-against-route-metric correlations for every dataset of a snapshot.
fn snapshot_correlations(
    snapshot: &SnapshotData,
    assemblies: &[DatasetAssembly],
) -> Result<Vec<CorrelationReport>> {
    let mut reports = Vec::new();
    for (dataset, assembly) in snapshot.datasets.iter().zip(assemblies) {
        let rtt: Vec<f64> = dataset.iter().map(|r| r.rtt).collect();
        let distance: Vec<f64> = dataset.iter().map(|r| r.distance).collect();
        let duration: Vec<f64> = dataset.iter().map(|r| r.duration_secs()).collect();

        reports.push(CorrelationReport {
            description: format!("{}: RTT vs distance", assembly.name),
            correlation: correlate(&rtt, &distance)
                .with_context(|| format!("Failed to correlate {}", assembly.name))?,
        });
        reports.push(CorrelationReport {
            description: format!("{}: RTT vs duration", assembly.name),
            correlation: correlate(&rtt, &duration)
                .with_context(|| format!("Failed to correlate {}", assembly.name))?,
        });
    }
    Ok(reports)
}
