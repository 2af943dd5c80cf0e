//! Example: repair a synthetic frame with dimmed borders.
//!
//! Builds a smooth 10-bit luma plane, dims the outer lines the way a bad
//! scaler or crop would, then runs both fixers and prints the mean absolute
//! error of the border band before and after.
//!
//! Run from the workspace root:
//!   cargo run -p edgefixer --example synthetic -- --help
//!   cargo run -p edgefixer --example synthetic -- --border 3 --radius 8

use anyhow::{Context, Result};
use clap::Parser;
use edgefixer::{
    Borders, ClipFormat, ColorFamily, ContinuityFixer, FixConfig, FrameMut, FrameRef, Image,
    ReferenceFixer,
};

#[derive(Parser, Debug)]
#[command(about = "Fix dimmed borders of a synthetic 10-bit frame")]
struct Args {
    #[arg(long, default_value_t = 640)]
    width: usize,

    #[arg(long, default_value_t = 360)]
    height: usize,

    /// Lines dimmed on every side
    #[arg(long, default_value_t = 2)]
    border: usize,

    /// Half window of the local fit; 0 fits whole lines
    #[arg(long, default_value_t = 0)]
    radius: usize,
}

fn clean_plane(width: usize, height: usize) -> Result<Image<u16>> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / width as f32;
            let fy = y as f32 / height as f32;
            let v = 200.0 + 500.0 * fx + 200.0 * (6.0 * fy).sin() * fx;
            data.push(v.clamp(0.0, 1023.0) as u16);
        }
    }
    Image::from_vec(width, height, data).context("building clean plane")
}

fn dim_borders(img: &mut Image<u16>, border: usize) {
    let (w, h) = (img.width(), img.height());
    for (i, v) in img.data_mut().iter_mut().enumerate() {
        let (x, y) = (i % w, i / w);
        let depth = x.min(y).min(w - 1 - x).min(h - 1 - y);
        if depth < border {
            // Outermost line is darkest.
            let gain = 0.4 + 0.5 * depth as f32 / border as f32;
            *v = (*v as f32 * gain + 12.0) as u16;
        }
    }
}

fn border_mae(a: &Image<u16>, b: &Image<u16>, border: usize) -> f64 {
    let (w, h) = (a.width(), a.height());
    let mut sum = 0u64;
    let mut count = 0u64;
    for (i, (&x, &y)) in a.data().iter().zip(b.data()).enumerate() {
        let (cx, cy) = (i % w, i / w);
        if cx.min(cy).min(w - 1 - cx).min(h - 1 - cy) < border {
            sum += x.abs_diff(y) as u64;
            count += 1;
        }
    }
    if count == 0 { 0.0 } else { sum as f64 / count as f64 }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let format = ClipFormat::new(ColorFamily::Gray, args.width, args.height, 2, 10);
    let config = FixConfig {
        luma: Borders::new(args.border, args.border, args.border, args.border),
        radius: args.radius,
        ..FixConfig::default()
    };

    let clean = clean_plane(args.width, args.height)?;
    let mut dirty = clean.clone();
    dim_borders(&mut dirty, args.border);
    println!("dirty:      border MAE {:.2}", border_mae(&dirty, &clean, args.border));

    let continuity = ContinuityFixer::new(format, config).context("continuity config")?;
    let mut fixed = dirty.clone();
    continuity
        .process_frame(&mut FrameMut::new(vec![fixed.as_view_mut().into()]))
        .context("continuity fix")?;
    println!("continuity: border MAE {:.2}", border_mae(&fixed, &clean, args.border));

    let reference = ReferenceFixer::new(format, format, config).context("reference config")?;
    let mut fixed = dirty.clone();
    reference
        .process_frame(
            &mut FrameMut::new(vec![fixed.as_view_mut().into()]),
            &FrameRef::new(vec![clean.as_view().into()]),
        )
        .context("reference fix")?;
    println!("reference:  border MAE {:.2}", border_mae(&fixed, &clean, args.border));

    Ok(())
}
