//! Main Program for Tiledescramble
//! Run with `--help` for more instruction

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::PathBuf;

use anyhow::{bail, Error};
use clap::{Parser, Subcommand};
use image::save_buffer;
use reqwest::blocking::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tiledescramble::batch::{run_batch, BatchOptions};
use tiledescramble::config::BatchConfig;
use tiledescramble::source::{PageSource, DEFAULT_QUALITY};
use tiledescramble::{transform_image, Direction};

#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Descramble every page listed in a JSON config
    Batch {
        /// Config file (`scramble_seed` and `page_list`)
        config: PathBuf,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        out_dir: PathBuf,

        /// JPEG quality (1-100)
        #[arg(short = 'q', long, default_value_t = DEFAULT_QUALITY,
              value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,
    },

    /// Descramble a single image
    Descramble(Single),

    /// Scramble a single image
    Scramble(Single),
}

#[derive(clap::Args, Debug)]
struct Single {
    /// Input file or URL
    input: String,

    /// Scramble seed
    #[arg(long)]
    seed: u32,

    /// Output file
    #[arg(short = 'o', long)]
    output: PathBuf,
}

fn single(args: Single, direction: Direction) -> Result<(), Error> {
    let im = PageSource::parse(&args.input).fetch(&Client::new())?;
    let out = transform_image(&im, args.seed, direction)?;

    save_buffer(
        &args.output,
        out.as_bytes(),
        out.width(),
        out.height(),
        out.color(),
    )?;
    info!("saved image to {}", args.output.display());

    Ok(())
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Batch {
            config,
            out_dir,
            quality,
        } => {
            info!("Start Descrambler");
            let config = BatchConfig::load(&config)?;
            let outcomes = run_batch(&config, &BatchOptions { out_dir, quality });

            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            if failed > 0 {
                bail!("{failed} of {} pages failed", outcomes.len());
            }
            info!("Completed to Download and Descramble Images");
        }
        Command::Descramble(args) => single(args, Direction::Descramble)?,
        Command::Scramble(args) => single(args, Direction::Scramble)?,
    }

    Ok(())
}
