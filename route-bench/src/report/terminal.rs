use std::io::{self, Write};

use colored::Colorize;

use route_bench_core::{
    DatasetAssembly, Evaluation, GroupedDifference, MetricComparison, SampleStats,
    SnapshotComparison, Strength, Verdict,
};

use super::{CorrelationReport, ReportError, Reporter};
use crate::snapshot::EngineSummary;

/// A reporter that renders evaluation and comparison tables to the terminal.
#[derive(Debug, Clone)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    fn format_evaluation(&self, evaluation: Evaluation) -> String {
        let text = evaluation.to_string();
        if !self.use_colors {
            return text;
        }
        match evaluation {
            Evaluation::Good | Evaluation::Ok => text.green().to_string(),
            Evaluation::Acceptable => text.yellow().to_string(),
            Evaluation::Bad => text.red().to_string(),
        }
    }

    fn format_verdict(&self, verdict: Verdict) -> String {
        let text = verdict.to_string();
        if !self.use_colors {
            return text;
        }
        match verdict {
            Verdict::Snapshot1Better => text.green().to_string(),
            Verdict::Snapshot2Better => text.red().to_string(),
            Verdict::Tie => text.yellow().to_string(),
        }
    }

    fn print_heading(&self, writer: &mut impl Write, heading: &str) -> io::Result<()> {
        writeln!(writer)?;
        if self.use_colors {
            writeln!(writer, "{}", heading.bold())?;
        } else {
            writeln!(writer, "{}", heading)?;
        }
        writeln!(writer, "{}", "-".repeat(heading.len().max(40)))?;
        Ok(())
    }

    fn print_summary(
        &self,
        writer: &mut impl Write,
        summaries: &[EngineSummary],
    ) -> io::Result<()> {
        self.print_heading(writer, "Summary")?;
        writeln!(
            writer,
            "{:<20} {:>14} {:>16}",
            "Routing Engine", "Total Routes", "Filtered Routes"
        )?;
        for summary in summaries {
            writeln!(
                writer,
                "{:<20} {:>14} {:>16}",
                summary.name, summary.total_routes, summary.filtered_routes
            )?;
        }

        self.print_heading(writer, "Distribution by Class")?;
        for summary in summaries {
            if summary.filtered_routes == 0 {
                continue;
            }
            let regions: Vec<String> = summary
                .region_classes
                .iter()
                .map(|(label, count)| format!("{}: {}", label, count))
                .collect();
            let classes: Vec<String> = summary
                .distance_classes
                .iter()
                .map(|(label, count)| format!("{}: {}", label, count))
                .collect();
            writeln!(writer, "{:<20} region  {}", summary.name, regions.join(", "))?;
            writeln!(writer, "{:<20} length  {}", "", classes.join(", "))?;
        }
        Ok(())
    }

    fn print_grouped_rows(
        &self,
        writer: &mut impl Write,
        differences: &[GroupedDifference],
    ) -> io::Result<()> {
        writeln!(
            writer,
            "{:<16} {:>14} {:>12} {:>16} {:>12} {:>14} {:>12}",
            "Group", "Distance", "", "Duration (s)", "", "Speed", ""
        )?;
        for diff in differences {
            writeln!(
                writer,
                "{:<16} {:>14} {:>12} {:>16} {:>12} {:>14} {:>12}",
                diff.group,
                format!("{:.2}", diff.distance.difference),
                self.format_evaluation(diff.distance.evaluation),
                format!("{:.2}", diff.duration.difference),
                self.format_evaluation(diff.duration.evaluation),
                format!("{:.2}", diff.mean_speed.difference),
                self.format_evaluation(diff.mean_speed.evaluation),
            )?;
        }
        Ok(())
    }

    fn print_overall_stats(
        &self,
        writer: &mut impl Write,
        assembly: &DatasetAssembly,
    ) -> io::Result<()> {
        writeln!(
            writer,
            "{:<24} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8}",
            "Metric", "Mean", "Median", "Std Dev", "Q1", "Q3", "Normal"
        )?;
        let rows: [(&str, &SampleStats); 7] = [
            ("distance (km)", &assembly.overall_distance),
            ("duration (s)", &assembly.overall_duration),
            ("mean speed (km/h)", &assembly.overall_mean_speed),
            ("ref distance (km)", &assembly.overall_reference_distance),
            ("ref duration (s)", &assembly.overall_reference_duration),
            ("ref mean speed (km/h)", &assembly.overall_reference_mean_speed),
            ("rtt", &assembly.overall_rtt),
        ];
        for (label, stats) in rows {
            writeln!(
                writer,
                "{:<24} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8}",
                label,
                stats.mean,
                stats.median,
                stats.std_dev,
                stats.q1,
                stats.q3,
                if stats.normal { "yes" } else { "no" },
            )?;
        }
        Ok(())
    }

    fn print_assembly(
        &self,
        writer: &mut impl Write,
        assembly: &DatasetAssembly,
    ) -> io::Result<()> {
        self.print_heading(
            writer,
            &format!("{} ({:?} thresholds)", assembly.name, assembly.policy),
        )?;
        writeln!(writer, "By region class:")?;
        self.print_grouped_rows(writer, &assembly.region_class_differences)?;
        writeln!(writer)?;
        writeln!(writer, "By distance class:")?;
        self.print_grouped_rows(writer, &assembly.distance_class_differences)?;
        writeln!(writer)?;
        writeln!(writer, "Overall:")?;
        self.print_overall_stats(writer, assembly)?;
        Ok(())
    }

    fn print_metric_section(
        &self,
        writer: &mut impl Write,
        heading: &str,
        rows: &[MetricComparison],
    ) -> io::Result<()> {
        self.print_heading(writer, heading)?;
        writeln!(
            writer,
            "{:<20} {:<16} {:>12} {:>12} {:>12}  {}",
            "Name", "Group", "Snapshot 1", "Snapshot 2", "Difference", "Evaluation"
        )?;
        for row in rows {
            writeln!(
                writer,
                "{:<20} {:<16} {:>12.2} {:>12.2} {:>12.2}  {}",
                row.name,
                row.group,
                row.snapshot1,
                row.snapshot2,
                row.difference,
                self.format_verdict(row.verdict),
            )?;
        }
        Ok(())
    }

    fn print_comparison(
        &self,
        writer: &mut impl Write,
        title: &str,
        comparison: &SnapshotComparison,
    ) -> io::Result<()> {
        self.print_heading(writer, title)?;
        self.print_metric_section(
            writer,
            "Distance Differences",
            &comparison.distance_differences,
        )?;
        self.print_metric_section(
            writer,
            "Duration Differences (min)",
            &comparison.duration_differences,
        )?;
        self.print_metric_section(writer, "Speed Differences", &comparison.speed_differences)?;

        let speed_rows: Vec<MetricComparison> = comparison
            .distance_class_differences
            .iter()
            .map(|d| d.speed.clone())
            .collect();
        let duration_rows: Vec<MetricComparison> = comparison
            .distance_class_differences
            .iter()
            .map(|d| d.duration.clone())
            .collect();
        let distance_rows: Vec<MetricComparison> = comparison
            .distance_class_differences
            .iter()
            .map(|d| d.distance.clone())
            .collect();
        self.print_metric_section(writer, "Distance Class: Speed", &speed_rows)?;
        self.print_metric_section(writer, "Distance Class: Duration (min)", &duration_rows)?;
        self.print_metric_section(writer, "Distance Class: Distance", &distance_rows)?;

        self.print_heading(writer, "Overall Statistics Differences")?;
        for overall in &comparison.overall {
            writeln!(writer, "{}", overall.name)?;
            writeln!(
                writer,
                "  {:<10} s1 {:>10.2}  s2 {:>10.2}  diff {:>10.2}  {}",
                "speed",
                overall.snapshot1.mean_speed,
                overall.snapshot2.mean_speed,
                overall.difference.mean_speed,
                self.format_verdict(overall.verdict.mean_speed),
            )?;
            writeln!(
                writer,
                "  {:<10} s1 {:>10.2}  s2 {:>10.2}  diff {:>10.2}  {}",
                "duration",
                overall.snapshot1.duration,
                overall.snapshot2.duration,
                overall.difference.duration,
                self.format_verdict(overall.verdict.duration),
            )?;
            writeln!(
                writer,
                "  {:<10} s1 {:>10.2}  s2 {:>10.2}  diff {:>10.2}  {}",
                "distance",
                overall.snapshot1.distance,
                overall.snapshot2.distance,
                overall.difference.distance,
                self.format_verdict(overall.verdict.distance),
            )?;
        }
        Ok(())
    }

    fn print_correlations(
        &self,
        writer: &mut impl Write,
        correlations: &[CorrelationReport],
    ) -> io::Result<()> {
        self.print_heading(writer, "Correlations")?;
        writeln!(
            writer,
            "{:<40} {:>10} {:<10} {:>10} {:<10}",
            "Dataset", "Pearson", "", "Spearman", ""
        )?;
        for report in correlations {
            writeln!(
                writer,
                "{:<40} {:>10.2} {:<10} {:>10.2} {:<10}",
                report.description,
                report.correlation.pearson,
                Strength::of(report.correlation.pearson),
                report.correlation.spearman,
                Strength::of(report.correlation.spearman),
            )?;
        }
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn report_snapshot(
        &self,
        summaries: &[EngineSummary],
        assemblies: &[DatasetAssembly],
    ) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.print_summary(&mut writer, summaries)?;
        for assembly in assemblies {
            self.print_assembly(&mut writer, assembly)?;
        }
        Ok(())
    }

    fn report_comparison(
        &self,
        title: &str,
        comparison: &SnapshotComparison,
    ) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.print_comparison(&mut writer, title, comparison)?;
        Ok(())
    }

    fn report_correlations(&self, correlations: &[CorrelationReport]) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.print_correlations(&mut writer, correlations)?;
        Ok(())
    }
}
