use bootmount::{
    ArchiveSources, Automount, AutomountConfig, AutomountError, HostVfs, Phase,
};
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

fn archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, contents.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap()
}

#[test]
fn test_extract_volumes_into_staging_root() {
    let staging = TempDir::new().unwrap();
    let initrd = archive(&[("index.html", "<h1>hi</h1>"), ("css/site.css", "body {}")]);
    let embedded = archive(&[("bin/app", "#!/bin/sh\n")]);

    let config = AutomountConfig::from_json(
        r#"{
            "fstab": [
                "initrd0:/srv/www:extract:::mkmp",
                "embedded:/opt/app:extract:::mkmp"
            ]
        }"#,
    )
    .unwrap();

    let sources = ArchiveSources::new()
        .with_initrd0(&initrd)
        .with_embedded(&embedded);
    let mut automount = Automount::from_config(HostVfs::new(staging.path()), &config)
        .unwrap()
        .with_sources(sources);

    automount.mount_all().unwrap();
    assert_eq!(automount.phase(), Phase::Mounted);

    let root = staging.path();
    let page = std::fs::read_to_string(root.join("srv/www/index.html")).unwrap();
    assert_eq!(page, "<h1>hi</h1>");
    assert!(root.join("srv/www/css/site.css").exists());
    assert!(root.join("opt/app/bin/app").exists());

    let mode = std::fs::metadata(root.join("srv")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o700);

    let report = automount.unmount_all().unwrap();
    assert!(report.unmounted.is_empty());
    assert!(report.is_clean());
}

#[test]
fn test_unsafe_mount_point_creates_nothing() {
    let staging = TempDir::new().unwrap();
    let config = AutomountConfig::from_json(
        r#"{"fstab": ["initrd0:/srv/../../escape:extract:::mkmp"]}"#,
    )
    .unwrap();

    let initrd = archive(&[("file", "x")]);
    let mut automount = Automount::from_config(HostVfs::new(staging.path()), &config)
        .unwrap()
        .with_sources(ArchiveSources::new().with_initrd0(&initrd));

    let err = automount.mount_all().unwrap_err();

    assert!(matches!(err, AutomountError::UnsafePath(_)));
    assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_initrd_is_reported() {
    let staging = TempDir::new().unwrap();
    let config = AutomountConfig::from_json(r#"{"fstab": ["initrd0:/:extract"]}"#).unwrap();

    let mut automount = Automount::from_config(HostVfs::new(staging.path()), &config).unwrap();

    assert!(matches!(
        automount.mount_all(),
        Err(AutomountError::ArchiveSourceNotFound(_))
    ));
}

#[test]
fn test_extract_without_mount_point_fails() {
    let staging = TempDir::new().unwrap();
    let config =
        AutomountConfig::from_json(r#"{"fstab": ["embedded:/opt/app:extract"]}"#).unwrap();

    let embedded = archive(&[("bin/app", "#!/bin/sh\n")]);
    let mut automount = Automount::from_config(HostVfs::new(staging.path()), &config)
        .unwrap()
        .with_sources(ArchiveSources::new().with_embedded(&embedded));

    let err = automount.mount_all().unwrap_err();

    assert!(matches!(err, AutomountError::ExtractionFailed { .. }));
    assert!(!staging.path().join("opt").exists());
}
