use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use embedcode::app::range;
use embedcode::domain::model::EmbedRequest;
use embedcode::infra::config::Config;
use embedcode::infra::logging;

#[derive(Parser)]
#[command(author, version, about = "Embed line ranges of local or remote files into markdown", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Directory backing `vault://` locations
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Built-in template (`caption`, `plain`) or path to a custom one
    #[arg(long, global = true)]
    template: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand embed fences in a markdown document
    Render {
        /// Markdown file to render, or `-` for stdin
        input: PathBuf,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Assemble a single embed and print it
    Snippet {
        /// `vault://path` or URL of the source
        location: String,
        /// Line range specification, e.g. `3,7-9`
        #[arg(short, long)]
        lines: Option<String>,
        /// Caption shown above the block
        #[arg(short, long)]
        title: Option<String>,
        /// Language tag for the code fence
        #[arg(long, default_value = "text")]
        lang: String,
        /// Print the embed as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Show how a line range specification expands
    Lines {
        spec: String,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load()?;
    if let Some(root) = cli.root {
        config.embed.set_root(root);
    }
    if let Some(template) = cli.template {
        config.embed.set_template(template);
    }

    match cli.command {
        Commands::Render { input, output } => render(&config, input, output).await,
        Commands::Snippet {
            location,
            lines,
            title,
            lang,
            json,
        } => {
            let request = EmbedRequest {
                location: Some(location),
                lines,
                title,
                language: lang,
            };
            snippet(&config, request, json).await
        }
        Commands::Lines { spec } => {
            let lines =
                range::parse(&spec).with_context(|| format!("invalid line range '{spec}'"))?;
            let indices: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
            println!("{lines}");
            println!("{}", indices.join(" "));
            Ok(())
        }
        Commands::Config => {
            let rendered = toml::to_string_pretty(&config).context("failed to serialize config")?;
            print!("{rendered}");
            Ok(())
        }
    }
}

async fn render(config: &Config, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let markdown = if input.as_os_str() == "-" {
        io::read_to_string(io::stdin()).context("failed to read document from stdin")?
    } else {
        fs::read_to_string(&input)
            .with_context(|| format!("failed to read document {}", input.display()))?
    };

    let renderer = embedcode::renderer_from_config(config)?;
    let rendered = renderer.render(&markdown).await?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
            tracing::info!(path = %path.display(), "rendered document written");
        }
        None => {
            io::stdout()
                .write_all(rendered.as_bytes())
                .context("failed to write rendered document")?;
        }
    }
    Ok(())
}

async fn snippet(config: &Config, request: EmbedRequest, json: bool) -> Result<()> {
    let renderer = embedcode::renderer_from_config(config)?;
    let embed = renderer.assembler().assemble(&request).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&embed).context("failed to serialize embed")?
        );
    } else {
        println!("{}", renderer.render_embed(&embed)?.trim_end_matches('\n'));
    }
    Ok(())
}
