mod args;

use anyhow::{Context, Result, bail};
use args::{Args, Command, ProfileArgs};
use clap::Parser;
use log::{debug, error};
use std::error::Error;
use vk_profiles::profiles::ProfileProperties;
use vk_profiles::version::ApiVersion;
use vk_profiles::vulkan::layers::InstanceLayer;
use vk_profiles::vulkan::{Entry, LoadedFunctions};
use vk_profiles::{
    ApplicationInfo, BlockProperties, Capabilities, DeviceCreateConfig, DeviceCreateFlags,
    InstanceCreateConfig, QueueRequest, SupportReport, info_success, info_warning, logging,
};
use vulkanalia::vk;
use vulkanalia::vk::DeviceV1_0;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_log(args.log_level())?;

    if let Err(err) = run(args) {
        error!("Oops! Something went wrong: {}", err);

        let mut source = err.source();
        while let Some(cause) = source {
            error!("Caused by: {}", cause);
            source = cause.source();
        }

        std::process::exit(1);
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    debug!("Loading Vulkan...");
    let entry = Entry::new()?;
    let mut capabilities = Capabilities::new(LoadedFunctions::new(entry));

    match args.subcommand {
        Command::List => list(&capabilities),
        Command::Describe(profile) => describe(&capabilities, &profile),
        Command::Instance { profile, layer } => instance(&capabilities, &profile, layer.as_deref()),
        Command::Devices(profile) => devices(&mut capabilities, &profile),
        Command::CreateDevice {
            profile,
            device,
            disable_robust_buffer_access,
            disable_robust_image_access,
        } => {
            let mut flags = DeviceCreateFlags::empty();
            flags.set(DeviceCreateFlags::DISABLE_ROBUST_BUFFER_ACCESS, disable_robust_buffer_access);
            flags.set(DeviceCreateFlags::DISABLE_ROBUST_IMAGE_ACCESS, disable_robust_image_access);
            create_device(&mut capabilities, &profile, device, flags)
        }
    }
}

fn resolve(capabilities: &Capabilities<LoadedFunctions>, args: &ProfileArgs) -> Result<ProfileProperties> {
    let desc = capabilities
        .profile_desc(&args.name)
        .with_context(|| format!("Looking up `{}`", args.name))?;
    Ok(desc.props.clone())
}

fn print_report(subject: &str, report: &SupportReport) {
    let verdict = if report.supported { "supported" } else { "NOT supported" };
    println!("{subject}: {verdict}");
    for block in &report.supported_blocks {
        println!("  + {block}");
    }
    for block in &report.unsupported_blocks {
        println!("  - {block}");
    }
}

fn list(capabilities: &Capabilities<LoadedFunctions>) -> Result<()> {
    for desc in capabilities.table().profiles() {
        let blocks = desc.variants().map(|v| v.block_name).collect::<Vec<_>>();
        println!(
            "{} (Vulkan {}) blocks: {}",
            desc.props,
            ApiVersion(desc.min_api_version),
            blocks.join(", ")
        );
    }
    Ok(())
}

fn describe(capabilities: &Capabilities<LoadedFunctions>, args: &ProfileArgs) -> Result<()> {
    let profile = resolve(capabilities, args)?;
    let block = args.block.as_deref();

    println!("{profile}, Vulkan {}", ApiVersion(capabilities.api_version(&profile)?));
    for extension in capabilities.instance_extensions(&profile, block)? {
        println!("  instance extension {}", extension.extension_name.to_string_lossy());
    }
    for extension in capabilities.device_extensions(&profile, block)? {
        println!("  device extension {}", extension.extension_name.to_string_lossy());
    }
    for tag in capabilities.feature_structure_types(&profile, block)? {
        println!("  features {tag:?}");
    }
    for tag in capabilities.property_structure_types(&profile, block)? {
        println!("  properties {tag:?}");
    }
    for format in capabilities.formats(&profile, block)? {
        println!("  format {format:?}");
    }
    Ok(())
}

fn instance(capabilities: &Capabilities<LoadedFunctions>, args: &ProfileArgs, layer: Option<&str>) -> Result<()> {
    let profile = resolve(capabilities, args)?;
    let layer = layer.map(|name| vk::ExtensionName::from_bytes(name.as_bytes()));
    let report = capabilities.instance_profile_variants_support(layer.as_ref(), &profile)?;
    print_report("Instance", &report);
    Ok(())
}

/// Creates an instance with the configured layers that are installed, at the profile's
/// API version, then hands back the physical devices.
fn init_instance(
    capabilities: &mut Capabilities<LoadedFunctions>,
    profile: &ProfileProperties,
) -> Result<Vec<vk::PhysicalDevice>> {
    let wanted = InstanceLayer::configured();
    let layers = capabilities.functions().entry().available_layers(&wanted)?;
    for missing in wanted.iter().filter(|layer| !layers.contains(layer)) {
        info_warning!("Layer {} is not installed, continuing without it", missing);
    }

    let config = InstanceCreateConfig {
        application: Some(ApplicationInfo {
            application_name: env!("CARGO_PKG_NAME").to_owned(),
            api_version: capabilities.api_version(profile)?,
            ..ApplicationInfo::default()
        }),
        layers: layers.iter().map(|layer| *layer.name()).collect(),
        ..InstanceCreateConfig::default()
    };
    capabilities.create_instance(&config).context("Creating the instance")?;
    info_success!("Instance created");
    Ok(capabilities.functions().physical_devices()?)
}

fn devices(capabilities: &mut Capabilities<LoadedFunctions>, args: &ProfileArgs) -> Result<()> {
    let profile = resolve(capabilities, args)?;
    let physical_devices = init_instance(capabilities, &profile)?;
    for (index, &physical_device) in physical_devices.iter().enumerate() {
        let name = capabilities.functions().device_name(physical_device)?;
        let report = capabilities.device_profile_variants_support(physical_device, &profile)?;
        print_report(&format!("[{index}] {name}"), &report);
    }
    capabilities.functions_mut().destroy();
    Ok(())
}

fn create_device(
    capabilities: &mut Capabilities<LoadedFunctions>,
    args: &ProfileArgs,
    index: usize,
    flags: DeviceCreateFlags,
) -> Result<()> {
    let profile = resolve(capabilities, args)?;
    let physical_devices = init_instance(capabilities, &profile)?;
    let Some(&physical_device) = physical_devices.get(index) else {
        capabilities.functions_mut().destroy();
        bail!("No physical device at index {index}, {} available", physical_devices.len());
    };

    let (full_profiles, blocks) = match &args.block {
        Some(block) => (vec![], vec![BlockProperties::block(profile.clone(), block.clone())]),
        None => (vec![profile.clone()], vec![]),
    };
    let config = DeviceCreateConfig {
        full_profiles,
        blocks,
        queues: vec![QueueRequest::single(0)],
        flags,
        ..DeviceCreateConfig::default()
    };
    let result = capabilities.create_device(physical_device, &config);
    if let Ok(device) = &result {
        info_success!("Device created with {}", profile);
        unsafe { device.destroy_device(None) };
    }
    capabilities.functions_mut().destroy();
    result.map(|_| ()).context("Creating the device")
}
