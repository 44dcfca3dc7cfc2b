use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use banner_renderer::{
    AssignmentPolicy, BannerConfig, DEFAULT_EXPORT_NAME, GlyphLibrary, Resolution, Result,
    Surface,
};

/// Render a tiled icon banner to PNG.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON object mapping icon names to inner SVG markup.
    #[arg(long)]
    glyphs: PathBuf,

    /// Banner configuration JSON. Missing keys use the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preset resolution: 1080p, 1440p or 2160p.
    #[arg(long, value_parser = parse_preset, conflicts_with_all = ["width", "height"])]
    resolution: Option<Resolution>,

    /// Custom canvas width in pixels.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Custom canvas height in pixels.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Comma-separated icon names.
    #[arg(long, value_delimiter = ',')]
    icons: Option<Vec<String>>,

    #[arg(long, allow_negative_numbers = true)]
    icon_size: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    spacing: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    padding: Option<i64>,

    /// Rotation in degrees.
    #[arg(long, allow_negative_numbers = true)]
    rotation: Option<i32>,

    /// Icon stroke color, e.g. #d1d5db.
    #[arg(long)]
    color: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    icon_opacity: Option<u8>,

    #[arg(long)]
    bg_color: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    bg_opacity: Option<u8>,

    /// Assign icons randomly with this seed instead of round robin.
    #[arg(long)]
    seed: Option<u64>,

    /// Output PNG path.
    #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
    output: PathBuf,
}

fn parse_preset(value: &str) -> std::result::Result<Resolution, String> {
    Resolution::PRESETS
        .into_iter()
        .find(|preset| preset.label().starts_with(value))
        .ok_or_else(|| format!("unknown preset {value:?}, expected 1080p, 1440p or 2160p"))
}

impl Args {
    fn apply(&self, config: &mut BannerConfig) {
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            config.resolution = Resolution::from_dimensions(width, height);
        }
        if let Some(icons) = &self.icons {
            config.selected_icons = icons.clone();
        }
        if let Some(v) = self.icon_size {
            config.icon_size = v;
        }
        if let Some(v) = self.spacing {
            config.spacing = v;
        }
        if let Some(v) = self.padding {
            config.padding = v;
        }
        if let Some(v) = self.rotation {
            config.rotation = v;
        }
        if let Some(v) = &self.color {
            config.color = v.clone();
        }
        if let Some(v) = self.icon_opacity {
            config.icon_opacity = v;
        }
        if let Some(v) = &self.bg_color {
            config.bg_color = v.clone();
        }
        if let Some(v) = self.bg_opacity {
            config.bg_opacity = v;
        }
        if let Some(seed) = self.seed {
            config.assignment = AssignmentPolicy::Random { seed };
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let glyphs = GlyphLibrary::from_json(&fs::read_to_string(&args.glyphs)?)?;
    info!("loaded {} glyph(s)", glyphs.len());

    let mut config = match &args.config {
        Some(path) => BannerConfig::from_json(&fs::read_to_string(path)?)?,
        None => BannerConfig::default(),
    };
    args.apply(&mut config);

    let advisory = config.advisory();
    if !advisory.can_export() {
        error!("{}", advisory.message());
        return Ok(ExitCode::FAILURE);
    }

    let mut surface = Surface::new();
    let outcome = config.render(&mut surface, &glyphs)?;
    for name in &outcome.skipped {
        warn!("icon {name:?} was not drawn");
    }

    surface.save_png(&args.output)?;
    info!(
        "wrote {} ({} of {} cells)",
        args.output.display(),
        outcome.cells_drawn,
        outcome.plan.map_or(0, |p| p.total)
    );
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
