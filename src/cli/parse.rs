use clap::Parser;
use requisites::{ParseMetrics, RequirementParser, parse_course_line};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Parse a course title line into its code, title and units")]
pub struct Line {
    /// The title line, e.g. "CSE 100. Advanced Data Structures (4)"
    title_line: String,
}

impl Line {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let mut metrics = ParseMetrics::default();
        let Some(header) = parse_course_line(&self.title_line, &mut metrics) else {
            anyhow::bail!("No course code found in \"{}\"", self.title_line);
        };

        println!("{} {}", "Subject:".dim(), header.subject());
        println!("{} {}", "Number: ".dim(), header.number());
        println!("{} {}", "Title:  ".dim(), header.title);
        println!("{} {}", "Units:  ".dim(), header.units);
        if metrics.ignored_crosslistings > 0 {
            println!("{}", "Crosslisted codes after the first were ignored.".warning());
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Parse the prerequisites and corequisites of a course description")]
pub struct Parse {
    /// The course description
    description: String,

    /// Output format (json, yaml)
    #[arg(long, value_name = "FORMAT", default_value = "json")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl Parse {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let mut metrics = ParseMetrics::default();
        let requirements = RequirementParser::new().parse_requirements(&self.description, &mut metrics);

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&requirements)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&requirements)?),
        }

        if metrics.unmatched_trailing_expressions > 0 {
            eprintln!("{}", "Some requirement text could not be parsed.".warning());
        }
        Ok(())
    }
}
