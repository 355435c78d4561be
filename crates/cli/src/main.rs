//! Teensy 4.1 machine CLI.
//!
//! This binary builds the machine and reports what it built. It performs:
//! 1. **Boot:** Realize the SoC and load a firmware image into the boot ROM.
//! 2. **Map:** Print the canonical (or configured) region table without booting.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rtsim_core::config::Config;
use rtsim_core::sim;

#[derive(Parser, Debug)]
#[command(
    name = "rtsim",
    author,
    version,
    about = "Teensy 4.1 (i.MX RT1062, Cortex-M7) machine",
    long_about = "Build the Teensy 4.1 machine, load a firmware image into its boot ROM, and report the resulting memory map, clocks and reset state.\n\nExamples:\n  rtsim boot -k firmware.bin\n  rtsim boot -k firmware.bin --cpu cortex-m4 --sysclk-hz 600000000\n  rtsim map --config board.json"
)]
struct Cli {
    /// JSON configuration file; unset fields use the board defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Realize the machine and load a firmware image.
    Boot {
        /// Firmware image copied verbatim to the start of the boot ROM.
        #[arg(short, long)]
        kernel: PathBuf,

        /// Processor variant (overrides the configuration).
        #[arg(long)]
        cpu: Option<String>,

        /// Root oscillator frequency in Hz (overrides the configuration).
        #[arg(long)]
        sysclk_hz: Option<u64>,
    },

    /// Print the region table that would be mapped.
    Map,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Boot {
            kernel,
            cpu,
            sysclk_hz,
        } => {
            if let Some(cpu) = cpu {
                config.soc.cpu_type = cpu;
            }
            if let Some(hz) = sysclk_hz {
                config.clock.sysclk_hz = hz;
            }
            cmd_boot(&config, &kernel);
        }
        Commands::Map => cmd_map(&config),
    }
}

/// Reads the configuration file, or returns the defaults when none is given.
///
/// Exits with code 1 if the file cannot be read or parsed.
fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: Could not read config '{}': {}", path.display(), e);
        process::exit(1);
    });
    Config::from_json(&text).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: Invalid config '{}': {}", path.display(), e);
        process::exit(1);
    })
}

/// Boots the machine and prints its memory map, clocks and reset vector.
///
/// Construction either succeeds completely or the process exits with code 1.
fn cmd_boot(config: &Config, kernel: &Path) {
    let machine = sim::boot_with_config(config, kernel).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    });

    let core = machine.core();
    println!(
        "Core: {}  IRQs: {}  VTOR: {:#010x}  Bit-band: {}",
        core.cpu_type(),
        core.num_irq(),
        core.vector_table_base(),
        if core.bitband_enabled() { "on" } else { "off" }
    );
    println!(
        "Clocks: sysclk={} Hz  refclk={} Hz",
        core.cpuclk().frequency_hz().unwrap_or(0),
        core.refclk().frequency_hz().unwrap_or(0)
    );
    println!();
    println!("{:<8} {:>10} {:>10} {:>10} {:<4}", "region", "base", "end", "size", "kind");
    for region in machine.address_space().regions() {
        println!(
            "{:<8} {:#010x} {:#010x} {:>10} {:?}",
            region.name(),
            region.base(),
            region.end(),
            region.size(),
            region.kind()
        );
    }
    println!();

    let reset = machine.reset_vector();
    println!(
        "Firmware: {} bytes  Reset: SP={:#010x} PC={:#010x}{}",
        machine.firmware_len(),
        reset.initial_sp,
        reset.reset_pc,
        if reset.thumb { " (thumb)" } else { "" }
    );
}

/// Prints the region table from the configuration without allocating anything.
fn cmd_map(config: &Config) {
    println!("{:<8} {:>10} {:>10} {:<4}", "region", "base", "size", "kind");
    for spec in config.region_table() {
        println!(
            "{:<8} {:#010x} {:>10} {:?}",
            spec.name, spec.base, spec.size, spec.kind
        );
    }
    println!("boot region: {}", config.memory.boot_region);
}
