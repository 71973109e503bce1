// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Whole-frame rendering.
//!
//! The canvas is cut into horizontal bands, one per thread.  Each band
//! is rendered by its own scoped thread into a buffer that only that
//! thread can see; once every thread has been joined the bands are
//! copied, in order, into the final frame.  Nothing is shared mutably
//! while the threads run, so there is nothing to lock.

use crossbeam;
use image::Rgb;
use std::any::Any;
use std::sync::atomic::AtomicBool;

use buffer::PixelBuffer;
use colors::{ColorMapper, BACKGROUND};
use config::RenderConfig;
use error::RenderError;
use planes::{Canvas, Viewport};
use tile::{Tile, TileRenderer};

/// The steps a render passes through.  `Done` and `Failed` are terminal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Stage {
    /// Nothing started yet.
    Idle,
    /// Cutting the canvas into bands.
    Partitioning,
    /// Starting one worker per band.
    Dispatching,
    /// Joining the workers.
    AwaitingCompletion,
    /// Copying band buffers into the frame.
    Compositing,
    /// A complete frame was produced.
    Done,
    /// Some band did not finish; nothing was produced.
    Failed,
}

fn enter(stage: Stage) {
    debug!("render stage: {:?}", stage);
}

/// Cut a canvas into `bands` full-width horizontal strips, top to
/// bottom.  Every strip is `height / bands` rows high, and the first
/// `height % bands` strips get one row more, so the strips never
/// overlap and their heights add up to the canvas height.  Strips are
/// only empty when there are more bands than rows.  Zero bands yields
/// no strips at all.
pub fn partition(canvas: &Canvas, bands: usize) -> Vec<Tile> {
    if bands == 0 {
        return vec![];
    }
    let (base, extra) = (canvas.1 / bands, canvas.1 % bands);
    let mut top = 0;
    (0..bands)
        .map(|i| {
            let height = if i < extra { base + 1 } else { base };
            let tile = Tile {
                left: 0,
                top,
                width: canvas.0,
                height,
            };
            top += height;
            tile
        })
        .collect()
}

/// Render a full frame, using `config.threads` threads.  Blocks until
/// every band is done; either the whole frame comes back or an error
/// does.
pub fn render<C>(
    viewport: &Viewport,
    config: &RenderConfig,
    colors: &C,
) -> Result<PixelBuffer, RenderError>
where
    C: ColorMapper + Sync + ?Sized,
{
    render_cancellable(viewport, config, colors, &AtomicBool::new(false))
}

/// As `render`, but workers check `cancel` at the start of every row
/// and the render fails with `RenderError::Cancelled` if it is set.
pub fn render_cancellable<C>(
    viewport: &Viewport,
    config: &RenderConfig,
    colors: &C,
    cancel: &AtomicBool,
) -> Result<PixelBuffer, RenderError>
where
    C: ColorMapper + Sync + ?Sized,
{
    enter(Stage::Idle);
    viewport.validate()?;
    config.validate()?;
    info!(
        "rendering {}x{} around {} at scale {}, {} iterations, {} bands",
        viewport.canvas.0,
        viewport.canvas.1,
        viewport.center,
        viewport.scale,
        config.max_iterations,
        config.threads
    );

    enter(Stage::Partitioning);
    let bands = partition(&viewport.canvas, config.threads);
    let renderer = TileRenderer::new(viewport, config, colors);

    enter(Stage::Dispatching);
    let rendered = match dispatch(&renderer, &bands, cancel) {
        Ok(rendered) => rendered,
        Err(e) => {
            warn!("render abandoned: {}", e);
            enter(Stage::Failed);
            return Err(e);
        }
    };

    enter(Stage::Compositing);
    let frame = composite(viewport.canvas, &bands, rendered);
    enter(Stage::Done);
    Ok(frame)
}

/// The main function for single-threaded use: the whole canvas as one
/// tile, on the calling thread.
pub fn render_single<C>(
    viewport: &Viewport,
    config: &RenderConfig,
    colors: &C,
) -> Result<PixelBuffer, RenderError>
where
    C: ColorMapper + ?Sized,
{
    viewport.validate()?;
    config.validate()?;
    let whole = Tile {
        left: 0,
        top: 0,
        width: viewport.canvas.0,
        height: viewport.canvas.1,
    };
    let pixels = TileRenderer::new(viewport, config, colors).render(&whole)?;
    Ok(PixelBuffer::from_parts(viewport.canvas, pixels))
}

/// One named scoped thread per band.  Every thread is joined before
/// this returns; the first band (in band order) that failed decides
/// the error.
fn dispatch<C>(
    renderer: &TileRenderer<C>,
    bands: &[Tile],
    cancel: &AtomicBool,
) -> Result<Vec<Vec<Rgb<u8>>>, RenderError>
where
    C: ColorMapper + Sync + ?Sized,
{
    let outcomes = crossbeam::scope(|scope| {
        let handles: Vec<_> = bands
            .iter()
            .enumerate()
            .map(|(index, band)| {
                scope
                    .builder()
                    .name(format!("band-{}", index))
                    .spawn(move |_| renderer.render_until(band, cancel))
            })
            .collect();

        enter(Stage::AwaitingCompletion);
        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| {
                let outcome = match handle {
                    Ok(handle) => handle.join().unwrap_or_else(|payload| {
                        Err(RenderError::WorkerFailure {
                            band: index,
                            reason: panic_reason(&*payload),
                        })
                    }),
                    Err(e) => Err(RenderError::WorkerFailure {
                        band: index,
                        reason: format!("could not start worker: {}", e),
                    }),
                };
                match outcome {
                    Ok(_) => debug!("band {} complete", index),
                    Err(ref e) => warn!("band {} incomplete: {}", index, e),
                }
                outcome
            })
            .collect::<Vec<_>>()
    })
    .map_err(|payload| RenderError::WorkerFailure {
        band: 0,
        reason: panic_reason(&*payload),
    })?;

    outcomes.into_iter().collect()
}

/// Copy each band's private buffer to its rows of the frame.
fn composite(canvas: Canvas, bands: &[Tile], rendered: Vec<Vec<Rgb<u8>>>) -> PixelBuffer {
    let mut pixels = vec![BACKGROUND; canvas.len()];
    for (band, band_pixels) in bands.iter().zip(rendered) {
        debug_assert_eq!(band.len(), band_pixels.len());
        let start = band.top * canvas.0;
        pixels[start..start + band_pixels.len()].copy_from_slice(&band_pixels);
    }
    PixelBuffer::from_parts(canvas, pixels)
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colors::{rgb, Palette};
    use num::Complex;
    use std::sync::atomic::Ordering;
    use std::thread;

    fn heights(bands: &[Tile]) -> Vec<usize> {
        bands.iter().map(|b| b.height).collect()
    }

    #[test]
    fn partition_spreads_the_remainder_over_the_first_bands() {
        assert_eq!(heights(&partition(&Canvas(10, 10), 3)), vec![4, 3, 3]);
        assert_eq!(heights(&partition(&Canvas(10, 11), 3)), vec![4, 4, 3]);
        assert_eq!(heights(&partition(&Canvas(10, 9), 3)), vec![3, 3, 3]);
    }

    #[test]
    fn partition_bands_are_contiguous() {
        let bands = partition(&Canvas(7, 23), 5);
        let mut top = 0;
        for band in &bands {
            assert_eq!(band.top, top);
            assert_eq!(band.left, 0);
            assert_eq!(band.width, 7);
            top += band.height;
        }
        assert_eq!(top, 23);
    }

    #[test]
    fn partition_with_more_bands_than_rows() {
        assert_eq!(heights(&partition(&Canvas(4, 2), 4)), vec![1, 1, 0, 0]);
    }

    #[test]
    fn partition_with_no_bands() {
        assert!(partition(&Canvas(4, 4), 0).is_empty());
    }

    #[test]
    fn render_rejects_bad_parameters() {
        let mut viewport = Viewport::default();
        viewport.scale = 0.0;
        let config = RenderConfig::new(10, 1).unwrap();
        match render(&viewport, &config, &Palette::Grayscale) {
            Err(RenderError::InvalidViewport(_)) => (),
            other => panic!("expected an invalid viewport, got {:?}", other),
        }

        let viewport = Viewport::new(Complex::new(0.0, 0.0), 1.0, 8, 8).unwrap();
        let config = RenderConfig {
            max_iterations: 10,
            threads: 0,
        };
        match render(&viewport, &config, &Palette::Grayscale) {
            Err(RenderError::InvalidConfig(_)) => (),
            other => panic!("expected an invalid config, got {:?}", other),
        }
    }

    #[test]
    fn threaded_and_single_renders_agree() {
        let viewport = Viewport::new(Complex::new(-0.5, 0.0), 2.5, 61, 37).unwrap();
        let config = RenderConfig::new(100, 4).unwrap();
        let threaded = render(&viewport, &config, &Palette::Banded).unwrap();
        let single = render_single(&viewport, &config, &Palette::Banded).unwrap();
        assert_eq!(threaded, single);
    }

    #[test]
    fn a_panicking_mapper_fails_the_frame() {
        let viewport = Viewport::new(Complex::new(0.0, 0.0), 4.0, 8, 8).unwrap();
        let config = RenderConfig::new(20, 2).unwrap();
        let fragile = |f: f64| {
            if f > 0.0 {
                panic!("palette exhausted");
            }
            BACKGROUND
        };
        match render(&viewport, &config, &fragile) {
            Err(RenderError::WorkerFailure { band, reason }) => {
                assert_eq!(band, 0);
                assert_eq!(reason, "palette exhausted");
            }
            other => panic!("expected a worker failure, got {:?}", other),
        }
    }

    #[test]
    fn oversized_canvases_fail_before_any_work() {
        let config = RenderConfig::new(10, 2).unwrap();
        let viewport = Viewport {
            center: Complex::new(0.0, 0.0),
            scale: 1.0,
            canvas: Canvas(::std::usize::MAX / 2 + 1, 4),
        };
        match render(&viewport, &config, &Palette::Grayscale) {
            Err(RenderError::InvalidViewport(_)) => (),
            other => panic!("expected an invalid viewport, got {:?}", other),
        }
        match render_single(&viewport, &config, &Palette::Grayscale) {
            Err(RenderError::InvalidViewport(_)) => (),
            other => panic!("expected an invalid viewport, got {:?}", other),
        }
    }

    #[test]
    fn the_lowest_failing_band_names_the_failure() {
        let viewport = Viewport::new(Complex::new(0.0, 0.0), 4.0, 16, 16).unwrap();
        let config = RenderConfig::new(20, 4).unwrap();
        let picky = |f: f64| {
            if thread::current().name() == Some("band-2") {
                panic!("band two gave up");
            }
            rgb(f, f, f)
        };
        match render(&viewport, &config, &picky) {
            Err(RenderError::WorkerFailure { band, reason }) => {
                assert_eq!(band, 2);
                assert_eq!(reason, "band two gave up");
            }
            other => panic!("expected a worker failure, got {:?}", other),
        }
    }

    #[test]
    fn a_flag_raised_mid_render_cancels_the_frame() {
        // Every band reaches an escaped point in its first row, so the
        // flag goes up while the workers are running and is seen at the
        // start of the next row.
        let viewport = Viewport::new(Complex::new(0.0, 0.0), 4.0, 64, 64).unwrap();
        let config = RenderConfig::new(20, 2).unwrap();
        let cancel = AtomicBool::new(false);
        let raising = |f: f64| {
            cancel.store(true, Ordering::SeqCst);
            rgb(f, f, f)
        };
        assert_eq!(
            render_cancellable(&viewport, &config, &raising, &cancel),
            Err(RenderError::Cancelled)
        );
        assert!(cancel.load(Ordering::SeqCst));
    }

    #[test]
    fn a_raised_flag_cancels_the_frame() {
        let viewport = Viewport::new(Complex::new(0.0, 0.0), 4.0, 8, 8).unwrap();
        let config = RenderConfig::new(20, 2).unwrap();
        let cancel = AtomicBool::new(false);
        cancel.store(true, Ordering::SeqCst);
        assert_eq!(
            render_cancellable(&viewport, &config, &Palette::Grayscale, &cancel),
            Err(RenderError::Cancelled)
        );
    }
}
