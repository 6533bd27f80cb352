use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::fmt::format::FmtSpan;

use namegov_core::NamingInput;
use namegov_policy::{NamingPolicy, PolicyVariant};
use namegov_tf as tf;

#[derive(Parser, Debug)]
#[command(author, version, about="namegov — standardized AWS names and governance tags for Terraform")]
struct Cli {
    /// Naming policy variant
    #[arg(long, value_enum, default_value_t=Policy::TagBased, global = true)]
    policy: Policy,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum Policy { Suffixed, TagBased }

impl Policy {
    fn variant(self) -> PolicyVariant {
        match self {
            Policy::Suffixed => PolicyVariant::Suffixed,
            Policy::TagBased => PolicyVariant::TagBased,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum Format { Json, Yaml }

#[derive(Subcommand, Debug)] enum Cmd {
    /// Evaluate an input file and print the full output
    Eval {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t=Format::Json)]
        output: Format,
        /// Also write namegov.auto.tfvars.json into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Validate an input file; exit non-zero with the failure on stderr
    Check {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Terraform external data source protocol: query on stdin, flat
    /// result map on stdout
    External,
    /// List the resource-type keys, optionally rendered for a prefix
    Resources {
        #[arg(long)]
        prefix: Option<String>,
    },
}

fn load_input(path: &PathBuf) -> Result<NamingInput> {
    let raw = std::fs::read(path)
        .with_context(|| format!("read input file {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str());
    let input = if matches!(ext, Some("yaml") | Some("yml")) {
        serde_yaml::from_slice(&raw).context("parse YAML input")?
    } else {
        serde_json::from_slice(&raw).context("parse JSON input")?
    };
    Ok(input)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().json().with_span_events(FmtSpan::CLOSE).init();
    let cli = Cli::parse();
    let policy = NamingPolicy::new(cli.policy.variant());

    match cli.cmd {
        Cmd::Eval { file, output, out } => {
            let input = load_input(&file)?;
            let result = policy.evaluate(&input)?;
            match output {
                Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                Format::Yaml => print!("{}", serde_yaml::to_string(&result)?),
            }
            if let Some(dir) = out {
                let path = tf::write_tfvars_json(&result, &dir)?;
                tracing::info!(path = %path.display(), "wrote tfvars");
            }
        }
        Cmd::Check { file } => {
            let input = load_input(&file)?;
            let result = policy.evaluate(&input)?;
            tracing::info!(prefix = %result.prefix, "input is valid");
        }
        Cmd::External => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).context("read query from stdin")?;
            let input = tf::parse_query(&buf)?;
            let result = policy.evaluate(&input)?;
            println!("{}", serde_json::to_string(&tf::flatten(&result))?);
        }
        Cmd::Resources { prefix } => {
            match prefix {
                Some(p) => {
                    policy.check_prefix(&p)?;
                    for (key, name) in namegov_aws::name_map(&p) {
                        println!("{key}\t{name}");
                    }
                }
                None => {
                    for (key, _) in namegov_aws::RESOURCE_NAMES {
                        println!("{key}");
                    }
                }
            }
        }
    }
    Ok(())
}
