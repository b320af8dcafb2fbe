use std::fs;

use anyhow::anyhow;
use fdstep::d1::GridField1D;
use fdstep::d2::GridField2D;
use image::{Rgb, RgbImage};
use ndarray::Array1;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

const OUT_DIR: &str = "out";

fn frame_path(prefix: &str, index: usize) -> anyhow::Result<String> {
    fs::create_dir_all(OUT_DIR)?;
    Ok(format!("{}/{}_{:08}.png", OUT_DIR, prefix, index))
}

/// Black -> red -> yellow -> white.
fn hot(t: f64) -> Rgb<u8> {
    let channel = |v: f64| (v.max(0.0).min(1.0) * 255.0) as u8;
    Rgb([channel(3.0 * t), channel(3.0 * t - 1.0), channel(3.0 * t - 2.0)])
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

/// Heat map of a 2-D snapshot, one pixel per cell, `y` pointing up.
/// Colours are scaled to the frame's own value range.
pub fn save_heatmap(prefix: &str, index: usize, field: &GridField2D) -> anyhow::Result<()> {
    let u = field.values();
    let (rows, cols) = u.dim();
    let (lo, hi) = value_range(u.iter().cloned());

    let mut img = RgbImage::new(cols as u32, rows as u32);

    for j in 0..rows {
        for i in 0..cols {
            let t = (u[[j, i]] - lo) / (hi - lo);
            img.put_pixel(i as u32, (rows - 1 - j) as u32, hot(t));
        }
    }

    img.save(frame_path(prefix, index)?)?;

    Ok(())
}

/// Line plot of a 1-D snapshot against its sample positions.
pub fn save_line_plot(prefix: &str, index: usize, field: &GridField1D) -> anyhow::Result<()> {
    const WIDTH: u32 = 640;
    const HEIGHT: u32 = 480;
    const MARGIN: f32 = 40.0;

    let x: Array1<f64> = field.coordinates();
    let (x_lo, x_hi) = value_range(x.iter().cloned());
    let (y_lo, y_hi) = value_range(field.values().iter().cloned());

    let to_px = |xv: f64, yv: f64| {
        let px = MARGIN + ((xv - x_lo) / (x_hi - x_lo)) as f32 * (WIDTH as f32 - 2.0 * MARGIN);
        let py = HEIGHT as f32
            - MARGIN
            - ((yv - y_lo) / (y_hi - y_lo)) as f32 * (HEIGHT as f32 - 2.0 * MARGIN);
        (px, py)
    };

    let mut pixmap =
        Pixmap::new(WIDTH, HEIGHT).ok_or_else(|| anyhow!("cannot allocate {}x{}", WIDTH, HEIGHT))?;
    pixmap.fill(Color::WHITE);

    let mut axes = PathBuilder::new();
    axes.move_to(MARGIN, MARGIN);
    axes.line_to(MARGIN, HEIGHT as f32 - MARGIN);
    axes.line_to(WIDTH as f32 - MARGIN, HEIGHT as f32 - MARGIN);
    let axes = axes.finish().ok_or_else(|| anyhow!("empty axes path"))?;

    let mut line = PathBuilder::new();
    let mut pen_down = false;
    for (&xv, &yv) in x.iter().zip(field.values().iter()) {
        if !yv.is_finite() {
            pen_down = false;
            continue;
        }
        let (px, py) = to_px(xv, yv);
        if pen_down {
            line.line_to(px, py);
        } else {
            line.move_to(px, py);
            pen_down = true;
        }
    }

    let mut paint = Paint::default();
    paint.anti_alias = true;
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };

    paint.set_color_rgba8(0, 0, 0, 255);
    pixmap.stroke_path(&axes, &paint, &stroke, Transform::identity(), None);

    if let Some(line) = line.finish() {
        paint.set_color_rgba8(31, 119, 180, 255);
        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&line, &paint, &stroke, Transform::identity(), None);
    }

    pixmap.save_png(frame_path(prefix, index)?)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(vec![1.0, -2.0, 5.0].into_iter()), (-2.0, 5.0));
        assert_eq!(value_range(vec![3.0, 3.0].into_iter()), (2.0, 4.0));
        assert_eq!(value_range(vec![f64::NAN].into_iter()), (0.0, 1.0));
    }

    #[test]
    fn test_hot() {
        assert_eq!(hot(0.0), Rgb([0, 0, 0]));
        assert_eq!(hot(1.0), Rgb([255, 255, 255]));
        assert_eq!(hot(1.0 / 3.0), Rgb([255, 0, 0]));
    }
}
