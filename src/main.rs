//! Main Program for Pixmix
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

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Error};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn, Level};

use pixmix::{io, sample, ArithmeticOp, Direction, Method, Mode, Params, Transform};

#[derive(Parser, Debug)]
#[command(author, version, about = "Reversibly remix image pixels")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt an image
    Encrypt(TransformArgs),

    /// Decrypt an image (use the parameters given to encrypt)
    Decrypt(TransformArgs),

    /// Round-trip every method on a sample image
    Demo {
        /// Input image, a gradient sample is generated if omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory for demo output
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct TransformArgs {
    /// Input file
    input: PathBuf,

    /// Output file
    output: PathBuf,

    /// Method: xor, arithmetic, bit_shift, adjacent_swap, random_swap, block_swap, channel_shift
    #[arg(short = 'm', long, default_value = "xor")]
    method: Method,

    /// XOR key (0-255)
    #[arg(long, default_value_t = 123)]
    key: i64,

    /// Arithmetic operation: add, subtract, multiply, divide
    #[arg(long, default_value = "add")]
    operation: ArithmeticOp,

    /// Arithmetic operand (odd for multiply/divide)
    #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
    value: i64,

    /// Bits to rotate (0-7)
    #[arg(long, default_value_t = 2)]
    shift_amount: i64,

    /// Rotation direction: left, right
    #[arg(long, default_value = "left")]
    direction: Direction,

    /// Fraction of pixels to swap (0.0-1.0)
    #[arg(long, default_value_t = 0.5)]
    swap_percentage: f64,

    /// Block side length for block swap
    #[arg(short = 'b', long, default_value_t = 2)]
    block_size: i64,

    /// Random seed for random_swap and block_swap
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Channel rotation (0-2)
    #[arg(long, default_value_t = 1)]
    channel_shift: i64,
}

impl TransformArgs {
    fn transform(&self) -> Result<Transform, Error> {
        let params = Params {
            key: self.key,
            operation: self.operation,
            value: self.value,
            shift_amount: self.shift_amount,
            direction: self.direction,
            swap_percentage: self.swap_percentage,
            block_size: self.block_size,
            seed: self.seed,
            channel_shift: self.channel_shift,
        };
        Ok(Transform::from_params(self.method, &params)?)
    }
}

fn run_transform(args: &TransformArgs, mode: Mode) -> Result<(), Error> {
    let transform = args.transform()?;

    let mut buffer = io::load_rgb(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    pixmix::apply(&mut buffer, &transform, mode)?;
    io::save_rgb(&args.output, &buffer)
        .with_context(|| format!("Cannot write {}", args.output.display()))?;

    info!(
        method = %transform.method(),
        ?mode,
        output = %args.output.display(),
        "done"
    );
    Ok(())
}

fn demo_params(method: Method) -> Params {
    let mut params = Params::default();
    match method {
        Method::Xor => params.key = 150,
        Method::Arithmetic => params.value = 75,
        Method::BitShift => params.shift_amount = 3,
        Method::RandomSwap => params.swap_percentage = 0.3,
        Method::BlockSwap => params.block_size = 4,
        Method::AdjacentSwap | Method::ChannelShift => (),
    }
    params
}

fn run_demo(input: Option<PathBuf>, output_dir: PathBuf) -> Result<(), Error> {
    fs::create_dir_all(&output_dir)?;

    let original = match input {
        Some(p) => {
            info!(path = %p.display(), "using provided image");
            io::load_rgb(&p).with_context(|| format!("Cannot read {}", p.display()))?
        }
        None => {
            let p = output_dir.join("sample_input.png");
            let im = sample::gradient(200, 200)?;
            io::save_rgb(&p, &im)?;
            info!(path = %p.display(), "created sample image");
            im
        }
    };

    let mut failed = Vec::new();
    for method in Method::ALL {
        let transform = Transform::from_params(method, &demo_params(method))?;

        let mut buffer = original.clone();
        pixmix::encrypt(&mut buffer, &transform)?;
        io::save_rgb(output_dir.join(format!("demo_encrypted_{method}.png")), &buffer)?;

        pixmix::decrypt(&mut buffer, &transform)?;
        io::save_rgb(output_dir.join(format!("demo_decrypted_{method}.png")), &buffer)?;

        if buffer == original {
            println!("{method:>14}: ok      {transform:?}");
        } else {
            warn!(%method, "round trip mismatch");
            println!("{method:>14}: MISMATCH {transform:?}");
            failed.push(method);
        }
    }

    if !failed.is_empty() {
        bail!("Round trip failed for {failed:?}");
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Encrypt(args) => run_transform(&args, Mode::Encrypt),
        Command::Decrypt(args) => run_transform(&args, Mode::Decrypt),
        Command::Demo { input, output_dir } => run_demo(input, output_dir),
    }
}
