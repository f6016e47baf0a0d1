//! Peak thumbnail computation.
//!
//! The decoded stream is first folded into fixed-size blocks (max absolute
//! sample per block) so memory stays proportional to track length / block,
//! then the blocks are reduced to the requested number of columns.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use crate::audio::open_decoder;
use crate::error::AudioError;

/// Interleaved samples folded into one block peak.
const BLOCK_SAMPLES: usize = 1024;

/// Peaks finished on a worker thread, tagged with the deck and load they belong to.
#[derive(Debug)]
pub struct PeaksReady {
    /// 1-based deck index.
    pub deck: usize,
    pub generation: u64,
    pub result: Result<Vec<f32>, AudioError>,
}

/// Compute the thumbnail for `path` off the calling thread and send it on `tx`.
pub fn spawn_compute(
    path: PathBuf,
    columns: usize,
    deck: usize,
    generation: u64,
    tx: Sender<PeaksReady>,
) {
    thread::spawn(move || {
        let result = compute(&path, columns);
        debug!(deck, generation, ok = result.is_ok(), "peaks computed");
        let _ = tx.send(PeaksReady {
            deck,
            generation,
            result,
        });
    });
}

/// Decode `path` and reduce it to `columns` peaks normalized to `[0, 1]`.
pub fn compute(path: &Path, columns: usize) -> Result<Vec<f32>, AudioError> {
    let decoder = open_decoder(path)?;

    let mut blocks: Vec<f32> = Vec::new();
    let mut peak = 0.0f32;
    let mut in_block = 0usize;
    for sample in decoder {
        peak = peak.max(sample.abs());
        in_block += 1;
        if in_block == BLOCK_SAMPLES {
            blocks.push(peak);
            peak = 0.0;
            in_block = 0;
        }
    }
    if in_block > 0 {
        blocks.push(peak);
    }

    if blocks.is_empty() {
        return Err(AudioError::Decode {
            path: path.to_path_buf(),
            reason: "no samples".into(),
        });
    }

    Ok(normalize(reduce(&blocks, columns)))
}

/// Max-reduce `blocks` into `columns` buckets.
///
/// With fewer blocks than columns every block gets its own column.
pub fn reduce(blocks: &[f32], columns: usize) -> Vec<f32> {
    if columns == 0 || blocks.is_empty() {
        return Vec::new();
    }
    if blocks.len() <= columns {
        return blocks.to_vec();
    }

    (0..columns)
        .map(|c| {
            let start = c * blocks.len() / columns;
            let end = ((c + 1) * blocks.len() / columns).max(start + 1);
            blocks[start..end].iter().copied().fold(0.0, f32::max)
        })
        .collect()
}

/// Scale so the loudest column is 1.0. Silence stays silent.
pub fn normalize(mut peaks: Vec<f32>) -> Vec<f32> {
    let max = peaks.iter().copied().fold(0.0, f32::max);
    if max > 0.0 {
        for p in &mut peaks {
            *p /= max;
        }
    }
    peaks
}

/// Sample `peaks` at `width` evenly spaced columns for drawing.
pub fn resample(peaks: &[f32], width: usize) -> Vec<f32> {
    if peaks.is_empty() || width == 0 {
        return vec![0.0; width];
    }
    (0..width)
        .map(|x| {
            let start = x * peaks.len() / width;
            let end = ((x + 1) * peaks.len() / width).max(start + 1);
            peaks[start..end.min(peaks.len())]
                .iter()
                .copied()
                .fold(0.0, f32::max)
        })
        .collect()
}
