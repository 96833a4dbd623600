use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// More output per occurrence (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub subcommand: Command,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List compiled profiles
    List,
    /// Show what a profile requires
    Describe(ProfileArgs),
    /// Check the loader against a profile
    Instance {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Check the extensions of this layer instead of the loader's
        #[arg(short, long)]
        layer: Option<String>,
    },
    /// Check every physical device against a profile
    Devices(ProfileArgs),
    /// Create and destroy a device with a profile enabled
    CreateDevice {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Index of the physical device, as listed by `devices`
        #[arg(short, long, default_value_t = 0)]
        device: usize,
        /// Turn robustBufferAccess off even when the profile enables it
        #[arg(long)]
        disable_robust_buffer_access: bool,
        /// Turn robustImageAccess off even when the profile enables it
        #[arg(long)]
        disable_robust_image_access: bool,
    },
}

#[derive(clap::Args)]
pub struct ProfileArgs {
    /// Profile name, e.g. VP_EXAMPLE_compute
    pub name: String,
    /// Restrict to one block of the profile
    #[arg(short, long)]
    pub block: Option<String>,
}
