use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use frostpane::{
    AberrationParams, DispersionParams, FastBlurParams, SurfaceMut, SurfaceRef,
};

#[derive(Parser, Debug)]
#[command(name = "frostpane", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blur a PNG with the recursive Gaussian kernel.
    Blur(BlurArgs),
    /// Blur a PNG with the box family (single or triple pass).
    Boxblur(BoxblurArgs),
    /// Blur a PNG with the downsample-accelerated box pipeline.
    Fastblur(FastblurArgs),
    /// Apply chromatic aberration along a displacement map.
    Aberration(AberrationArgs),
    /// Apply chromatic dispersion along an edge-distance field.
    Dispersion(DispersionArgs),
    /// Report whether the vectorized blur kernel can run on this machine.
    Support,
}

#[derive(Parser, Debug)]
struct BlurArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Gaussian sigma in pixels.
    #[arg(long)]
    sigma: f32,

    /// Filter in approximately linear light instead of sRGB.
    #[arg(long)]
    linear: bool,

    /// Use the vectorized kernel (fails if the hardware lacks lanes).
    #[arg(long)]
    lanes: bool,
}

#[derive(Parser, Debug)]
struct BoxblurArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Box radius in pixels.
    #[arg(long)]
    radius: i32,

    /// Apply the box three times (close to a Gaussian of sigma = radius/2).
    #[arg(long)]
    triple: bool,
}

#[derive(Parser, Debug)]
struct FastblurArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Blur radius in source pixels.
    #[arg(long, default_value_t = 8.0)]
    radius: f32,

    /// Downscale factor in [0.01, 1.0]; smaller is faster and rougher.
    #[arg(long, default_value_t = 0.5)]
    downscale: f32,

    /// Resampling method for the down and up legs.
    #[arg(long, value_enum, default_value_t = MethodChoice::Nearest)]
    method: MethodChoice,
}

#[derive(Parser, Debug)]
struct AberrationArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Displacement map PNG (red = X, green = Y, 128 = none).
    #[arg(long)]
    map: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON file of aberration parameters; defaults apply when omitted.
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DispersionArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Edge-distance field PNG (red byte, 0 = edge, 255 = interior).
    #[arg(long)]
    edge: PathBuf,

    /// Optional normal field PNG (red = X, green = Y, 128 = zero);
    /// omitted means radial normals from the image center.
    #[arg(long)]
    normals: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON file of dispersion parameters; defaults apply when omitted.
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodChoice {
    Nearest,
    Bilinear,
}

impl From<MethodChoice> for frostpane::SampleMethod {
    fn from(choice: MethodChoice) -> Self {
        match choice {
            MethodChoice::Nearest => Self::Nearest,
            MethodChoice::Bilinear => Self::Bilinear,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Blur(args) => cmd_blur(args),
        Command::Boxblur(args) => cmd_boxblur(args),
        Command::Fastblur(args) => cmd_fastblur(args),
        Command::Aberration(args) => cmd_aberration(args),
        Command::Dispersion(args) => cmd_dispersion(args),
        Command::Support => cmd_support(),
    }
}

fn load_rgba(path: &Path) -> anyhow::Result<(Vec<u8>, u32, u32)> {
    let img = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    Ok((img.into_raw(), w, h))
}

fn save_rgba(path: &Path, data: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        data,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn read_params<T: serde::de::DeserializeOwned + Default>(
    path: Option<&Path>,
) -> anyhow::Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let f = File::open(path).with_context(|| format!("open params '{}'", path.display()))?;
    let r = BufReader::new(f);
    let params = serde_json::from_reader(r).with_context(|| "parse params JSON")?;
    Ok(params)
}

// PNG files carry straight alpha; the kernels expect premultiplied.
fn premultiply(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for ch in &mut px[..3] {
            *ch = ((u16::from(*ch) * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            continue;
        }
        for ch in &mut px[..3] {
            *ch = ((u16::from(*ch) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn cmd_blur(args: BlurArgs) -> anyhow::Result<()> {
    let (mut data, w, h) = load_rgba(&args.in_path)?;
    premultiply(&mut data);
    let mut surface = SurfaceMut::new(&mut data, w, h)?;
    if args.lanes {
        frostpane::gaussian_iir_lanes(&mut surface, args.sigma, args.linear)?;
    } else {
        frostpane::gaussian_iir(&mut surface, args.sigma, args.linear)?;
    }
    unpremultiply(&mut data);
    save_rgba(&args.out, &data, w, h)
}

fn cmd_boxblur(args: BoxblurArgs) -> anyhow::Result<()> {
    let (mut data, w, h) = load_rgba(&args.in_path)?;
    premultiply(&mut data);
    let mut surface = SurfaceMut::new(&mut data, w, h)?;
    if args.triple {
        frostpane::box_blur3(&mut surface, args.radius)?;
    } else {
        frostpane::box_blur(&mut surface, args.radius)?;
    }
    unpremultiply(&mut data);
    save_rgba(&args.out, &data, w, h)
}

fn cmd_fastblur(args: FastblurArgs) -> anyhow::Result<()> {
    let params = FastBlurParams {
        radius: args.radius,
        downscale: args.downscale,
        method: args.method.into(),
    };
    let (mut data, w, h) = load_rgba(&args.in_path)?;
    premultiply(&mut data);
    let mut surface = SurfaceMut::new(&mut data, w, h)?;
    frostpane::fast_box_blur(&mut surface, &params)?;
    unpremultiply(&mut data);
    save_rgba(&args.out, &data, w, h)
}

fn cmd_aberration(args: AberrationArgs) -> anyhow::Result<()> {
    let params: AberrationParams = read_params(args.params.as_deref())?;
    let (mut src, w, h) = load_rgba(&args.in_path)?;
    premultiply(&mut src);
    let (map, map_w, map_h) = load_rgba(&args.map)?;

    let mut out = vec![0u8; src.len()];
    let src_ref = SurfaceRef::new(&src, w, h)?;
    let map_ref = SurfaceRef::new(&map, map_w, map_h)?;
    let mut dst = SurfaceMut::new(&mut out, w, h)?;
    frostpane::chromatic_aberration(&src_ref, &map_ref, &mut dst, &params)?;

    unpremultiply(&mut out);
    save_rgba(&args.out, &out, w, h)
}

fn cmd_dispersion(args: DispersionArgs) -> anyhow::Result<()> {
    let params: DispersionParams = read_params(args.params.as_deref())?;
    let (mut src, w, h) = load_rgba(&args.in_path)?;
    premultiply(&mut src);
    let (edge, edge_w, edge_h) = load_rgba(&args.edge)?;
    let normals = match &args.normals {
        Some(path) => Some(load_rgba(path)?),
        None => None,
    };

    let mut out = vec![0u8; src.len()];
    let src_ref = SurfaceRef::new(&src, w, h)?;
    let edge_ref = SurfaceRef::new(&edge, edge_w, edge_h)?;
    let normal_ref = match &normals {
        Some((data, nw, nh)) => Some(SurfaceRef::new(data, *nw, *nh)?),
        None => None,
    };
    let mut dst = SurfaceMut::new(&mut out, w, h)?;
    frostpane::chromatic_dispersion(&src_ref, &edge_ref, normal_ref.as_ref(), &mut dst, &params)?;

    unpremultiply(&mut out);
    save_rgba(&args.out, &out, w, h)
}

fn cmd_support() -> anyhow::Result<()> {
    if frostpane::lane_support() {
        println!("vector lanes: available");
    } else {
        println!("vector lanes: unavailable (scalar kernel only)");
    }
    Ok(())
}
