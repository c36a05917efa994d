use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tacet::config::{Mode, Outline, Params, ParamsFile, StarProfile};
use tacet::render::{Export, Style};
use tacet::rng::{RandomSource, SeededRandom, ThreadRandom};

/// Tacet - procedural waveform mark generator
#[derive(Parser)]
#[command(name = "tacet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one shape and export it as SVG
    Render {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Output directory
        #[arg(short, long, default_value = "artifacts")]
        out: PathBuf,

        /// Print the SVG to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Render a run of consecutive seeds in parallel
    Batch {
        #[command(flatten)]
        shape: ShapeArgs,

        /// First seed
        #[arg(long, default_value_t = 0)]
        from: u64,

        /// Number of seeds to render
        #[arg(long, default_value_t = 8)]
        count: u64,

        /// Output directory
        #[arg(short, long, default_value = "artifacts")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Wave,
    Star,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Wave => Mode::Wave,
            ModeArg::Star => Mode::Star,
        }
    }
}

#[derive(Args)]
struct ShapeArgs {
    /// Envelope profile (overrides the params file)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// JSON params file; flags below override its fields
    #[arg(long)]
    params: Option<PathBuf>,

    #[arg(long)]
    length: Option<f64>,

    #[arg(long)]
    amplitude: Option<f64>,

    #[arg(long)]
    segments: Option<usize>,

    #[arg(long)]
    sharpness: Option<f64>,

    #[arg(long)]
    noise: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    color: Option<String>,

    /// Hide star guide markers
    #[arg(long)]
    no_guides: bool,

    /// Continuous peak placement with summed falloff
    #[arg(long)]
    classic: bool,

    /// Straight segments from the centerline instead of smoothed curves
    #[arg(long)]
    polyline: bool,

    /// Jitter star peak heights by up to 10%
    #[arg(long)]
    jitter: bool,

    /// Non-reproducible noise
    #[arg(long)]
    unseeded: bool,
}

impl ShapeArgs {
    fn to_params(&self) -> anyhow::Result<Params> {
        // The mode flag picks which defaults fill fields the file leaves out.
        let mut file = match &self.params {
            Some(path) => ParamsFile::read(path)?,
            None => ParamsFile::default(),
        };
        if let Some(mode) = self.mode {
            file.mode = Some(mode.into());
        }
        let mut params = file.into_params();
        if let Some(v) = self.length {
            params.line_length = v;
        }
        if let Some(v) = self.amplitude {
            params.max_amplitude = v;
        }
        if let Some(v) = self.segments {
            params.segments = v;
        }
        if let Some(v) = self.sharpness {
            params.sharpness = v;
        }
        if let Some(v) = self.noise {
            params.noise_amount = v;
        }
        if let Some(v) = self.seed {
            params.seed = v;
        }
        if let Some(v) = &self.color {
            params.color = v.clone();
        }
        if self.no_guides {
            params.show_guides = false;
        }
        if self.classic {
            params.star = StarProfile::classic();
        }
        if self.jitter {
            params.star.jitter = true;
        }
        if self.polyline {
            params.outline = Outline::Polyline;
        }
        Ok(params)
    }

    fn random_source(&self, seed: u64) -> Box<dyn RandomSource> {
        if self.unseeded {
            Box::new(ThreadRandom::new())
        } else {
            Box::new(SeededRandom::new(seed))
        }
    }
}

fn render_one(params: &Params, args: &ShapeArgs) -> anyhow::Result<Export> {
    let style = Style::from_params(params)?;
    let mut rng = args.random_source(params.seed);
    let shape = tacet::compute_shape(params, rng.as_mut());
    Ok(Export::snapshot(&shape, &style))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render { shape, out, stdout } => {
            let params = shape.to_params()?;
            info!(
                "Rendering {} mark: length={}, amplitude={}, segments={}, seed={}",
                params.mode.as_str(),
                params.line_length,
                params.max_amplitude,
                params.segments,
                params.seed
            );
            let export = render_one(&params, &shape)?;
            if stdout {
                std::io::stdout()
                    .write_all(export.body.as_bytes())
                    .context("failed to write SVG to stdout")?;
            } else {
                let path = export.write_to(&out)?;
                info!("Saved {}", path.display());
            }
        }
        Commands::Batch {
            shape,
            from,
            count,
            out,
        } => {
            let base = shape.to_params()?;
            info!(
                "Rendering {} {} marks from seed {}",
                count,
                base.mode.as_str(),
                from
            );
            let written = (from..from.saturating_add(count))
                .into_par_iter()
                .map(|seed| -> anyhow::Result<PathBuf> {
                    let params = Params { seed, ..base.clone() };
                    let name = format!("tacet-{}-{}.svg", params.mode.as_str(), seed);
                    let export = render_one(&params, &shape)?.with_file_name(name);
                    Ok(export.write_to(&out)?)
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            info!("Saved {} files to {}", written.len(), out.display());
        }
    }

    Ok(())
}
