use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ct_volume::{CT_HEAD_DIM, Contrast, Orientation, ViewState, Views, VolumeLoader};
use log::{LevelFilter, error, info};

/// Render the top, front and side views of a raw CT volume to PNG files.
#[derive(Parser, Debug)]
#[command(author, about, version)]
struct Args {
    /// Headerless file of little-endian 16-bit samples
    #[arg(short, long, default_value = "CThead")]
    input: PathBuf,

    /// Volume shape as depth height width
    #[arg(short, long, num_args = 3, action = clap::ArgAction::Set,
          value_names = ["DEPTH", "HEIGHT", "WIDTH"],
          default_values_t = [CT_HEAD_DIM.0, CT_HEAD_DIM.1, CT_HEAD_DIM.2])]
    dim: Vec<usize>,

    /// Axial (top) slice index, defaults to the middle of the axis
    #[arg(long)]
    axial: Option<usize>,

    /// Coronal (front) slice index, defaults to the middle of the axis
    #[arg(long)]
    coronal: Option<usize>,

    /// Sagittal (side) slice index, defaults to the middle of the axis
    #[arg(long)]
    sagittal: Option<usize>,

    /// Use histogram equalization instead of linear contrast
    #[arg(short, long)]
    equalize: bool,

    /// Render maximum intensity projections instead of slices
    #[arg(short, long)]
    mip: bool,

    /// Directory the top/front/side PNGs are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Shape as `(depth, height, width)`; clap guarantees exactly three values.
    fn shape(&self) -> (usize, usize, usize) {
        match self.dim.as_slice() {
            &[depth, height, width] => (depth, height, width),
            _ => CT_HEAD_DIM,
        }
    }
}

fn file_name(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Axial => "top.png",
        Orientation::Coronal => "front.png",
        Orientation::Sagittal => "side.png",
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let volume = VolumeLoader::load_from_file(&args.input, args.shape())?;

    let centered = ViewState::centered(&volume);
    let contrast = if args.equalize {
        Contrast::Equalized
    } else {
        Contrast::Linear
    };
    let state = ViewState {
        axial: args.axial.unwrap_or(centered.axial),
        coronal: args.coronal.unwrap_or(centered.coronal),
        sagittal: args.sagittal.unwrap_or(centered.sagittal),
        contrast,
        mip: args.mip,
    };

    let mut views = Views::new(&volume);
    views.refresh_all(&volume, &state)?;

    std::fs::create_dir_all(&args.output_dir)?;
    for orientation in Orientation::ALL {
        let path = args.output_dir.join(file_name(orientation));
        views.surface(orientation).save(&path)?;
        info!("Wrote {orientation:?} view to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
