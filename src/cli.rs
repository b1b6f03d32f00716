use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Summarize YouTube videos over HTTP",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Address to bind (default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (default: 8000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// LLM model for summarization; the provider follows from the name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Config file (default: ~/.config/ytsum/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Echo startup details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
