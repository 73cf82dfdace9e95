use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "textclf-server")]
#[command(author, version, about = "Text classification prediction server", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TEXTCLF_CONFIG", default_value = "textclf.yaml")]
    pub config: PathBuf,

    /// Artifact directory with config.json, weights and tokenizer files
    #[arg(short, long, env = "TEXTCLF_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Inference device (cpu, cuda[:N], metal[:N])
    #[arg(short, long, env = "TEXTCLF_DEVICE")]
    pub device: Option<String>,

    /// Maximum tokens per input, special tokens included
    #[arg(long, env = "TEXTCLF_MAX_LENGTH")]
    pub max_length: Option<usize>,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
