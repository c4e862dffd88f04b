use std::path::{Path, PathBuf};

mod build;
mod parse;
mod terminal;

use anyhow::Context;
use build::Build;
use clap::ArgAction;
use parse::{Line, Parse};
use requisites::Config;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the catalog directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Initialize a catalog directory
    ///
    /// Writes a default config.toml and creates the input and output
    /// directories.
    Init,

    /// Parse the scraped catalog and write the JSON output
    Build(Build),

    /// Parse a single course title line
    Line(Line),

    /// Parse the requirements of a single course description
    Parse(Parse),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Init => Init::run(root)?,
            Self::Build(command) => command.run(root)?,
            Self::Line(command) => command.run()?,
            Self::Parse(command) => command.run()?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use std::fs;

        let config_path = root.join(Config::FILE_NAME);
        if config_path.exists() {
            anyhow::bail!(
                "Catalog already initialized (found existing {})",
                config_path.display()
            );
        }

        let config = Config::default();
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create {}", root.display()))?;
        config
            .save(&config_path)
            .context("Failed to create config.toml")?;

        for dir in [config.intermediate_dir(), config.data_dir()] {
            fs::create_dir_all(root.join(dir))
                .with_context(|| format!("Failed to create {} directory", dir.display()))?;
        }

        println!("Initialized catalog in {}", root.display());
        println!("  Created: {}", Config::FILE_NAME);
        println!("  Created: {}/", config.intermediate_dir().display());
        println!("  Created: {}/", config.data_dir().display());
        println!();
        println!("Next steps:");
        println!(
            "  Add departments.jsonl and one <DEPT>.jsonl per department to {}/",
            config.intermediate_dir().display()
        );
        println!("  reqs build");

        Ok(())
    }
}
