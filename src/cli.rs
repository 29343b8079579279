//! CLI argument parsing with clap.

use clap::Parser;

/// Turn a selfie into a professional headshot with the Gemini image API.
#[derive(Parser, Debug)]
#[command(name = "headshot", version, about)]
pub struct Cli {
    /// Source photo (JPEG, PNG, WebP, ...) or a `data:image/...;base64,` URL.
    /// Use a clear front-facing photo.
    #[arg(required_unless_present_any = ["list_outfits", "quota"])]
    pub image: Option<String>,

    /// Subject gender: male, female.
    #[arg(short, long)]
    pub gender: Option<String>,

    /// Outfit id (see --list-outfits). Defaults to the first outfit for the gender.
    #[arg(long)]
    pub outfit: Option<String>,

    /// Background: off-white, blue, grey, blurred-office.
    #[arg(short, long)]
    pub background: Option<String>,

    /// Additional free-text instruction appended to the edit request.
    #[arg(short, long)]
    pub instruction: Option<String>,

    /// Model name or short alias.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output format: jpeg, png, webp.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of headshots to generate; each one counts against the daily limit.
    #[arg(short = 'n', long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// List outfits for the selected gender and exit.
    #[arg(long)]
    pub list_outfits: bool,

    /// Show today's usage and exit.
    #[arg(long)]
    pub quota: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}
