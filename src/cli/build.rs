use std::path::Path;

use clap::Parser;
use requisites::{BuildOutput, CatalogDirectory, CourseCode, ParseMetrics};
use tracing::instrument;

use super::terminal::{Colorize, count};

#[derive(Debug, Parser, Default)]
#[command(about = "Parse the scraped catalog and write course, department and statistics JSON")]
pub struct Build {
    /// Parse and report without writing any output
    #[arg(long)]
    dry_run: bool,
}

impl Build {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let directory = CatalogDirectory::new(root.to_path_buf());
        let output = directory.build()?;

        Self::print_summary(&output);

        if self.dry_run {
            println!();
            println!("{}", "Dry run: nothing written.".dim());
            return Ok(());
        }

        let statistics = directory.write(&output)?;
        println!();
        println!(
            "{} {} courses to {}",
            "Wrote".success(),
            statistics.course_count,
            directory.output_dir().display()
        );
        Ok(())
    }

    fn print_summary(output: &BuildOutput) {
        let metrics: &ParseMetrics = &output.metrics;

        println!("{}", "Catalog".heading());
        println!("  Departments: {}", metrics.departments);
        println!("  Listings:    {}", metrics.courses);
        println!("  Courses:     {}", output.index.len());
        println!(
            "  With prerequisites: {}, corequisites: {}, successors: {}",
            metrics.with_prerequisites, metrics.with_corequisites, metrics.with_successors
        );

        println!();
        println!("{}", "Diagnostics".heading());
        for (label, value) in [
            ("Unmatched course codes", metrics.code_match_failures),
            ("Ignored crosslistings", metrics.ignored_crosslistings),
            ("Missing units", metrics.missing_units),
            ("Missing anchors", metrics.missing_anchors),
            ("Missing descriptions", metrics.missing_descriptions),
            ("Partially parsed requirements", metrics.unmatched_trailing_expressions),
            ("Empty requirements", metrics.empty_requirements),
        ] {
            println!("  {label}: {}", count(value));
        }
        println!(
            "  {}",
            format!("Sequence listings: {}", metrics.sequence_listings).dim()
        );

        let cycles = output.index.cycles();
        if cycles.is_empty() {
            return;
        }
        println!();
        println!(
            "{} {}",
            "Prerequisite cycles:".warning(),
            cycles.len()
        );
        for cycle in cycles {
            let codes: Vec<&str> = cycle.iter().map(CourseCode::as_str).collect();
            println!("  {}", codes.join(" -> "));
        }
    }
}
