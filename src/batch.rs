// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::PathBuf;

use rayon::prelude::*;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::BatchConfig;
use crate::shuffle::{descramble_image, DescrambleError};
use crate::source::{save_jpeg, PageSource, SourceError, DEFAULT_QUALITY};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failure to download - {0}")]
    Fetch(#[source] SourceError),
    #[error("failure to descramble - {0}")]
    Descramble(#[from] DescrambleError),
    #[error("failure to save - {0}")]
    Save(#[source] SourceError),
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory receiving `out_NNN.jpg` files.
    pub out_dir: PathBuf,
    pub quality: u8,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Result for a single page. `number` is 1-based.
#[derive(Debug)]
pub struct PageOutcome {
    pub number: usize,
    pub source: PageSource,
    pub result: Result<PathBuf, PageError>,
}

/// Output file name for page `number` (1-based).
pub fn output_name(number: usize) -> String {
    format!("out_{number:03}.jpg")
}

fn process_page(
    number: usize,
    source: &PageSource,
    seed: u32,
    options: &BatchOptions,
    client: &Client,
) -> Result<PathBuf, PageError> {
    info!("[{number:3}] downloading...");
    let scrambled = source.fetch(client).map_err(PageError::Fetch)?;

    info!("[{number:3}] descrambling...");
    let descrambled = descramble_image(&scrambled, seed)?;

    let path = options.out_dir.join(output_name(number));
    save_jpeg(&descrambled, &path, options.quality).map_err(PageError::Save)?;
    info!("[{number:3}] saved image to {}", path.display());

    Ok(path)
}

/// Descrambles every page of `config` in parallel.
///
/// A failing page is logged and reported in its outcome; other pages
/// are unaffected. Outcomes are in page order.
pub fn run_batch(config: &BatchConfig, options: &BatchOptions) -> Vec<PageOutcome> {
    info!("Scramble Seed: {}", config.scramble_seed);
    info!("Processing {} images", config.page_list.len());

    let client = Client::new();
    let outcomes: Vec<_> = config
        .page_list
        .par_iter()
        .enumerate()
        .map(|(i, location)| {
            let number = i + 1;
            let source = PageSource::parse(location);
            let result = process_page(number, &source, config.scramble_seed, options, &client);
            if let Err(e) = &result {
                warn!("[{number:3}] {e}");
            }

            PageOutcome {
                number,
                source,
                result,
            }
        })
        .collect();

    info!(
        succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count(),
        total = outcomes.len(),
        "batch finished"
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(output_name(1), "out_001.jpg");
        assert_eq!(output_name(42), "out_042.jpg");
        assert_eq!(output_name(1234), "out_1234.jpg");
    }

    #[test]
    fn empty_batch() {
        let cfg = BatchConfig {
            scramble_seed: 0,
            page_list: vec![],
        };
        assert!(run_batch(&cfg, &BatchOptions::default()).is_empty());
    }
}
