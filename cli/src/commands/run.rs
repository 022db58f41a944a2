use bootmount::{
    ArchiveSources, Automount, AutomountConfig, ConfigError, DEFAULT_CONFIG_PATH, HostVfs,
};
use nix::sys::signal::{SigSet, Signal};
use std::path::{Path, PathBuf};

pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub root: PathBuf,
    pub initrd: Option<PathBuf>,
    pub fstab: Vec<String>,
}

/// Mount everything, hold the mounts until SIGINT or SIGTERM, then unmount
/// them in reverse order.
pub fn run_automount(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_deref())?;
    config.fstab.extend(args.fstab);
    if args.initrd.is_some() {
        config.initrd0 = args.initrd;
    }

    let initrd = config.initrd0.as_ref().map(std::fs::read).transpose()?;

    let mut sources = ArchiveSources::new();
    if let Some(data) = &initrd {
        tracing::info!("Loaded initrd0 from {:?} ({} bytes)", config.initrd0, data.len());
        sources = sources.with_initrd0(data);
    }

    let mut automount =
        Automount::from_config(HostVfs::new(&args.root), &config)?.with_sources(sources);

    // Block the signals up front so one arriving mid-mount is not lost
    let mut signals = SigSet::empty();
    signals.add(Signal::SIGINT);
    signals.add(Signal::SIGTERM);
    signals.thread_block()?;

    if let Err(e) = automount.mount_all() {
        tracing::error!("Automount failed: {}", e);
        automount.unmount_all()?;
        return Err(e.into());
    }

    tracing::info!(
        "Automount complete under {:?}, waiting for SIGINT or SIGTERM",
        args.root
    );
    let signal = signals.wait()?;
    tracing::info!("Received {:?}, unmounting", signal);

    let report = automount.unmount_all()?;
    if !report.is_clean() {
        return Err(format!(
            "{} filesystem(s) could not be unmounted",
            report.failures.len()
        )
        .into());
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AutomountConfig, ConfigError> {
    match path {
        Some(path) => AutomountConfig::load(path),
        None => match AutomountConfig::resolve(None, Path::new(DEFAULT_CONFIG_PATH)) {
            Err(ConfigError::NotFound) => {
                tracing::debug!("No automount configuration found, using defaults");
                Ok(AutomountConfig::default())
            }
            other => other,
        },
    }
}
