use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the embedcode test suite with cargo nextest
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        /// Accept changed insta snapshots instead of failing
        #[arg(long)]
        accept_snapshots: bool,
    },
    /// Check formatting and run clippy with warnings denied
    Lint,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest {
            profile,
            accept_snapshots,
        } => run_nextest(profile, accept_snapshots),
        Commands::Lint => run_lint(),
    }
}

fn run_nextest(profile: Option<String>, accept_snapshots: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["nextest", "run", "--package", "embedcode"]);
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if accept_snapshots {
        cmd.env("INSTA_UPDATE", "always");
    }
    run(cmd, "cargo nextest run")
}

fn run_lint() -> Result<()> {
    let mut fmt = Command::new("cargo");
    fmt.args(["fmt", "--all", "--", "--check"]);
    run(fmt, "cargo fmt --check")?;

    let mut clippy = Command::new("cargo");
    clippy.args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]);
    run(clippy, "cargo clippy")
}

fn run(mut cmd: Command, label: &str) -> Result<()> {
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}
