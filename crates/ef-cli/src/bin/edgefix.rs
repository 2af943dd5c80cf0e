use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use ef_core::Image;
use ef_fix::{
    ClipFormat, ColorFamily, ContinuityFixer, FixConfig, FrameMut, FrameRef, PlaneKind,
    ReferenceFixer,
};
use flexi_logger::{Logger, LoggerHandle};
use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "edgefix")]
#[command(about = "Rebuild dirty border lines of gray or RGB images")]
struct Cli {
    /// Log spec, e.g. `info` or `debug,ef_lsq=trace`.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit each border line against its interior neighbour.
    #[command(name = "continuity")]
    Continuity(ContinuityArgs),
    /// Fit each border line against the same line of a clean image.
    #[command(name = "reference")]
    Reference(ReferenceArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    output: PathBuf,
    /// JSON `FixConfig`; border and radius flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a JSON summary of the applied fix here.
    #[arg(long)]
    meta: Option<PathBuf>,
    #[arg(long)]
    left: Option<usize>,
    #[arg(long)]
    top: Option<usize>,
    #[arg(long)]
    right: Option<usize>,
    #[arg(long)]
    bottom: Option<usize>,
    #[arg(long)]
    radius: Option<usize>,
}

#[derive(Args, Debug, Clone)]
struct ContinuityArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
struct ReferenceArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, required = true)]
    reference: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
struct Meta {
    variant: &'static str,
    input: PathBuf,
    reference: Option<PathBuf>,
    width: usize,
    height: usize,
    family: ColorFamily,
    bits_per_sample: u8,
    config: FixConfig,
    planes: Vec<PlaneKind>,
    changed_samples: usize,
}

/// Decoded image split into planes.
#[derive(Debug, Clone, PartialEq)]
enum Planes {
    U8(Vec<Image<u8>>),
    U16(Vec<Image<u16>>),
}

#[derive(Debug, Clone)]
struct HostImage {
    family: ColorFamily,
    width: usize,
    height: usize,
    planes: Planes,
}

impl HostImage {
    fn format(&self) -> ClipFormat {
        let (bytes, bits) = match self.planes {
            Planes::U8(_) => (1, 8),
            Planes::U16(_) => (2, 16),
        };
        ClipFormat::new(self.family, self.width, self.height, bytes, bits)
    }

    fn frame_mut(&mut self) -> FrameMut<'_> {
        match &mut self.planes {
            Planes::U8(planes) => {
                FrameMut::new(planes.iter_mut().map(|p| p.as_view_mut().into()).collect())
            }
            Planes::U16(planes) => {
                FrameMut::new(planes.iter_mut().map(|p| p.as_view_mut().into()).collect())
            }
        }
    }

    fn frame_ref(&self) -> FrameRef<'_> {
        match &self.planes {
            Planes::U8(planes) => {
                FrameRef::new(planes.iter().map(|p| p.as_view().into()).collect())
            }
            Planes::U16(planes) => {
                FrameRef::new(planes.iter().map(|p| p.as_view().into()).collect())
            }
        }
    }

    fn count_changed(&self, before: &HostImage) -> usize {
        fn diff<T: PartialEq>(a: &[Image<T>], b: &[Image<T>]) -> usize {
            a.iter()
                .zip(b)
                .map(|(a, b)| a.data().iter().zip(b.data()).filter(|(x, y)| x != y).count())
                .sum()
        }
        match (&self.planes, &before.planes) {
            (Planes::U8(a), Planes::U8(b)) => diff(a, b),
            (Planes::U16(a), Planes::U16(b)) => diff(a, b),
            _ => 0,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level)?;

    match cli.cmd {
        Command::Continuity(args) => run_continuity(args),
        Command::Reference(args) => run_reference(args),
    }
}

fn setup_logging(spec: &str) -> Result<LoggerHandle> {
    Logger::try_with_str(spec)
        .with_context(|| format!("parsing log spec '{spec}'"))?
        .log_to_stderr()
        .start()
        .context("starting logger")
}

fn run_continuity(args: ContinuityArgs) -> Result<()> {
    let common = &args.common;
    let config = resolve_config(common)?;
    let mut img = load_image(&common.input)?;

    let fixer = ContinuityFixer::new(img.format(), config)
        .with_context(|| format!("configuring continuity fix for {}", common.input.display()))?;
    let before = img.clone();
    fixer
        .process_frame(&mut img.frame_mut())
        .context("fixing borders")?;

    finish(
        common,
        &img,
        &before,
        Meta {
            variant: "continuity",
            input: common.input.clone(),
            reference: None,
            width: img.width,
            height: img.height,
            family: img.family,
            bits_per_sample: img.format().bits_per_sample,
            config,
            planes: fixer.planes().collect(),
            changed_samples: 0,
        },
    )
}

fn run_reference(args: ReferenceArgs) -> Result<()> {
    let common = &args.common;
    let config = resolve_config(common)?;
    let mut img = load_image(&common.input)?;
    let reference = load_image(&args.reference)?;

    let fixer = ReferenceFixer::new(img.format(), reference.format(), config).with_context(|| {
        format!(
            "configuring reference fix for {} against {}",
            common.input.display(),
            args.reference.display()
        )
    })?;
    let before = img.clone();
    fixer
        .process_frame(&mut img.frame_mut(), &reference.frame_ref())
        .context("fixing borders")?;

    finish(
        common,
        &img,
        &before,
        Meta {
            variant: "reference",
            input: common.input.clone(),
            reference: Some(args.reference.clone()),
            width: img.width,
            height: img.height,
            family: img.family,
            bits_per_sample: img.format().bits_per_sample,
            config,
            planes: fixer.planes().collect(),
            changed_samples: 0,
        },
    )
}

fn finish(
    common: &CommonArgs,
    img: &HostImage,
    before: &HostImage,
    mut meta: Meta,
) -> Result<()> {
    meta.changed_samples = img.count_changed(before);
    info!(
        "{} fix: {} samples changed in planes {:?}",
        meta.variant, meta.changed_samples, meta.planes
    );

    save_image(&common.output, img)?;
    if let Some(path) = &common.meta {
        write_json(path, &meta)?;
    }
    Ok(())
}

fn resolve_config(common: &CommonArgs) -> Result<FixConfig> {
    let mut config = match &common.config {
        Some(path) => read_json::<FixConfig>(path)?,
        None => FixConfig::default(),
    };

    let luma = &mut config.luma;
    for (flag, slot) in [
        (common.left, &mut luma.left),
        (common.top, &mut luma.top),
        (common.right, &mut luma.right),
        (common.bottom, &mut luma.bottom),
    ] {
        if let Some(v) = flag {
            *slot = v;
        }
    }
    if let Some(radius) = common.radius {
        config.radius = radius;
    }

    if config.luma.is_empty() && config.chroma.is_empty() {
        bail!("no borders requested; pass --left/--top/--right/--bottom or a --config file");
    }
    Ok(config)
}

fn load_image(path: &Path) -> Result<HostImage> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    decode(&dyn_img, path)
}

/// Splits a decoded image into planes. Alpha is not a fixable plane and is
/// dropped.
fn decode(dyn_img: &DynamicImage, path: &Path) -> Result<HostImage> {
    if dyn_img.color().has_alpha() {
        warn!(
            "{}: alpha channel is dropped, output has no alpha",
            path.display()
        );
    }
    let (w, h) = (dyn_img.width() as usize, dyn_img.height() as usize);

    let gray = ColorFamily::Gray;
    let rgb = ColorFamily::Rgb;
    let (family, planes) = match dyn_img {
        DynamicImage::ImageLuma8(buf) => (gray, Planes::U8(split(buf.as_raw(), 1, w, h)?)),
        DynamicImage::ImageLumaA8(_) => {
            let buf = dyn_img.to_luma8();
            (gray, Planes::U8(split(buf.as_raw(), 1, w, h)?))
        }
        DynamicImage::ImageRgb8(buf) => (rgb, Planes::U8(split(buf.as_raw(), 3, w, h)?)),
        DynamicImage::ImageRgba8(_) => {
            let buf = dyn_img.to_rgb8();
            (rgb, Planes::U8(split(buf.as_raw(), 3, w, h)?))
        }
        DynamicImage::ImageLuma16(buf) => (gray, Planes::U16(split(buf.as_raw(), 1, w, h)?)),
        DynamicImage::ImageLumaA16(_) => {
            let buf = dyn_img.to_luma16();
            (gray, Planes::U16(split(buf.as_raw(), 1, w, h)?))
        }
        DynamicImage::ImageRgb16(buf) => (rgb, Planes::U16(split(buf.as_raw(), 3, w, h)?)),
        DynamicImage::ImageRgba16(_) => {
            let buf = dyn_img.to_rgb16();
            (rgb, Planes::U16(split(buf.as_raw(), 3, w, h)?))
        }
        other => bail!(
            "unsupported pixel type {:?} in {}; expected 8 or 16-bit gray or RGB",
            other.color(),
            path.display()
        ),
    };

    Ok(HostImage {
        family,
        width: w,
        height: h,
        planes,
    })
}

/// Deinterleaves `channels`-sample pixels into one image per channel.
fn split<T: Copy>(
    raw: &[T],
    channels: usize,
    width: usize,
    height: usize,
) -> Result<Vec<Image<T>>> {
    if raw.len() != width * height * channels {
        bail!(
            "decoded buffer holds {} samples, expected {}x{}x{}",
            raw.len(),
            width,
            height,
            channels
        );
    }
    (0..channels)
        .map(|c| {
            let data = raw.iter().skip(c).step_by(channels).copied().collect();
            Image::from_vec(width, height, data).context("constructing plane")
        })
        .collect()
}

fn interleave<T: Copy>(planes: &[Image<T>]) -> Vec<T> {
    let len = planes.first().map_or(0, |p| p.data().len());
    let mut out = Vec::with_capacity(len * planes.len());
    for i in 0..len {
        out.extend(planes.iter().map(|p| p.data()[i]));
    }
    out
}

fn save_image(path: &Path, img: &HostImage) -> Result<()> {
    let (w, h) = (img.width as u32, img.height as u32);
    let saved = match (&img.planes, img.family) {
        (Planes::U8(p), ColorFamily::Rgb) => {
            ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, interleave(p)).map(|b| b.save(path))
        }
        (Planes::U8(p), _) => {
            ImageBuffer::<Luma<u8>, _>::from_raw(w, h, interleave(p)).map(|b| b.save(path))
        }
        (Planes::U16(p), ColorFamily::Rgb) => {
            ImageBuffer::<Rgb<u16>, _>::from_raw(w, h, interleave(p)).map(|b| b.save(path))
        }
        (Planes::U16(p), _) => {
            ImageBuffer::<Luma<u16>, _>::from_raw(w, h, interleave(p)).map(|b| b.save(path))
        }
    };

    saved
        .context("constructing output image from planes")?
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use ef_core::Image;
    use ef_fix::ColorFamily;
    use image::{DynamicImage, RgbaImage};

    use super::{Planes, decode, interleave, split};

    #[test]
    fn split_and_interleave_preserve_pixel_order() {
        let raw: Vec<u16> = (0..2 * 3 * 3).collect();
        let planes = split(&raw, 3, 3, 2).expect("valid buffer");

        assert_eq!(planes.len(), 3);
        assert_eq!(planes[1].data(), &[1, 4, 7, 10, 13, 16]);
        assert_eq!(interleave(&planes), raw);
    }

    #[test]
    fn split_rejects_short_buffers() {
        assert!(split(&[0u8; 5], 3, 2, 1).is_err());
        assert_eq!(interleave::<u8>(&[]), Vec::<u8>::new());
        let gray = vec![Image::new_fill(2, 1, 7u8)];
        assert_eq!(interleave(&gray), vec![7, 7]);
    }

    #[test]
    fn alpha_inputs_keep_their_color_planes() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(1, 0, image::Rgba([10, 20, 30, 0]));
        let host = decode(&DynamicImage::ImageRgba8(rgba), Path::new("in.png")).expect("decode");

        assert_eq!(host.family, ColorFamily::Rgb);
        let Planes::U8(planes) = host.planes else {
            panic!("expected 8-bit planes");
        };
        assert_eq!(planes.len(), 3);
        assert_eq!(planes[2].data(), &[0, 30]);
    }
}
