use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use downdate_manifest::{encode_manifest_delta, BaseManifest};

use crate::config::parse_config_xml;
use crate::flows;
use crate::Cli;

const BASE_DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<assembly xmlns="urn:schemas-microsoft-com:asm.v3" manifestVersion="1.0">
    <assemblyIdentity name="Microsoft-Windows-Base" version="10.0.19041.1"/>
</assembly>
"#;

#[test]
fn config_marks_missing_sources_for_resolution() {
    let root = test_root();
    let destination = write_file(&root, "destination.dll", b"installed");
    let present_source = write_file(&root, "present-source.dll", b"staged");

    let config = write_file(
        &root,
        "Config.xml",
        format!(
            r#"<Configuration>
    <UpdateFilesList>
        <UpdateFile source="{}" destination="{}"/>
        <UpdateFile source="{}" destination="{}"/>
    </UpdateFilesList>
</Configuration>
"#,
            root.join("absent-source.dll").display(),
            destination.display(),
            present_source.display(),
            destination.display(),
        )
        .as_bytes(),
    );

    let update_files = parse_config_xml(&config).expect("must parse config");
    assert_eq!(update_files.len(), 2);
    assert!(update_files[0].needs_resolution);
    assert!(!update_files[1].needs_resolution);
    assert_eq!(update_files[1].source, present_source);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn config_with_missing_destination_is_fatal() {
    let root = test_root();
    let config = write_file(
        &root,
        "Config.xml",
        format!(
            r#"<Configuration>
    <UpdateFilesList>
        <UpdateFile source="{}" destination="{}"/>
    </UpdateFilesList>
</Configuration>
"#,
            root.join("source.dll").display(),
            root.join("nonexistent-destination.dll").display(),
        )
        .as_bytes(),
    );

    let err = parse_config_xml(&config).expect_err("must refuse missing destination");
    assert!(err.to_string().contains("destination-missing"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn config_entry_without_destination_attribute_is_fatal() {
    let root = test_root();
    let config = write_file(
        &root,
        "Config.xml",
        br#"<Configuration>
    <UpdateFilesList>
        <UpdateFile source="C:\staged\foo.dll"/>
    </UpdateFilesList>
</Configuration>
"#,
    );

    let err = parse_config_xml(&config).expect_err("must refuse partial entry");
    assert!(err.to_string().contains("'destination' attribute"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_requires_exactly_one_input_document() {
    assert!(Cli::try_parse_from(["downdate"]).is_err());
    assert!(Cli::try_parse_from([
        "downdate",
        "--config-xml",
        "Config.xml",
        "--custom-pending-xml",
        "Pending.xml",
    ])
    .is_err());
    assert!(Cli::try_parse_from(["downdate", "--config-xml", "Config.xml"]).is_ok());
    assert!(Cli::try_parse_from(["downdate", "--custom-pending-xml", "Pending.xml"]).is_ok());
}

#[test]
fn restart_timeout_requires_a_forced_restart() {
    assert!(Cli::try_parse_from([
        "downdate",
        "--config-xml",
        "Config.xml",
        "--restart-timeout",
        "5",
    ])
    .is_err());
    assert!(Cli::try_parse_from([
        "downdate",
        "--config-xml",
        "Config.xml",
        "--force-restart",
        "--restart-timeout",
        "5",
    ])
    .is_ok());
}

#[test]
fn reserved_feature_flags_are_refused() {
    for flag in ["--invisible", "--persistent", "--irreversible", "--elevate"] {
        let cli = Cli::try_parse_from(["downdate", "--config-xml", "Config.xml", flag])
            .expect("must parse arguments");
        let err = flows::run(cli).expect_err("must refuse reserved feature");
        assert!(err.to_string().contains("feature-unimplemented"));
        assert!(err.to_string().contains(flag));
    }
}

#[test]
fn crafting_flow_resolves_and_emits_one_operation() {
    let root = test_root();

    // Live file to downgrade.
    let live_dir = root.join("live");
    fs::create_dir_all(&live_dir).expect("must create live directory");
    let destination = live_dir.join("foo.dll");
    fs::write(&destination, b"current version").expect("must write destination");

    // Component archive: one component owning the destination, manifest
    // stored as a differential record, payload holding the older bytes.
    let store_root = root.join("store");
    let component = "example-component_10.0.19041.1";
    let manifest = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<assembly xmlns="urn:schemas-microsoft-com:asm.v3" manifestVersion="1.0">
    <assemblyIdentity name="Microsoft-Windows-Example" version="10.0.19041.1"/>
    <file name="foo.dll" destinationPath="{}"/>
</assembly>
"#,
        live_dir.display()
    );
    let base = BaseManifest::from_bytes(BASE_DOCUMENT.as_bytes().to_vec());
    let delta = encode_manifest_delta(manifest.as_bytes(), &base).expect("must encode delta");
    let manifests_dir = store_root.join("Manifests");
    fs::create_dir_all(&manifests_dir).expect("must create manifest directory");
    fs::write(manifests_dir.join(format!("{component}.manifest")), delta)
        .expect("must write manifest");
    let payload_dir = store_root.join(component);
    fs::create_dir_all(&payload_dir).expect("must create payload directory");
    let archived_source = payload_dir.join("foo.dll");
    fs::write(&archived_source, b"older version").expect("must write payload");

    let base_manifest_path = write_file(&root, "Base.manifest", BASE_DOCUMENT.as_bytes());
    let config = write_file(
        &root,
        "Config.xml",
        format!(
            r#"<Configuration>
    <UpdateFilesList>
        <UpdateFile source="{}" destination="{}"/>
    </UpdateFilesList>
</Configuration>
"#,
            root.join("no-such-source.dll").display(),
            destination.display(),
        )
        .as_bytes(),
    );

    let output = root.join("Downgrade.xml");
    let cli = Cli::try_parse_from([
        "downdate".to_string(),
        "--config-xml".to_string(),
        config.display().to_string(),
        "--store-root".to_string(),
        store_root.display().to_string(),
        "--base-manifest".to_string(),
        base_manifest_path.display().to_string(),
        "--output".to_string(),
        output.display().to_string(),
    ])
    .expect("must parse arguments");

    flows::run(cli).expect("must craft the queue document");

    let document = fs::read_to_string(&output).expect("must read crafted document");
    assert!(document.contains("<POQ postAction=\"reboot\">"));
    assert!(document.contains(&format!("source=\"{}\"", archived_source.display())));
    assert!(document.contains(&format!("destination=\"{}\"", destination.display())));
    assert_eq!(document.matches("<HardlinkFile").count(), 1);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn crafting_flow_without_base_manifest_is_refused() {
    let root = test_root();
    let config = write_file(&root, "Config.xml", b"<Configuration/>");

    let cli = Cli::try_parse_from([
        "downdate".to_string(),
        "--config-xml".to_string(),
        config.display().to_string(),
    ])
    .expect("must parse arguments");
    let err = flows::run(cli).expect_err("must require the base manifest");
    assert!(err.to_string().contains("--base-manifest"));

    let _ = fs::remove_dir_all(&root);
}

fn write_file(root: &Path, name: &str, content: &[u8]) -> PathBuf {
    fs::create_dir_all(root).expect("must create test root");
    let path = root.join(name);
    fs::write(&path, content).expect("must write file");
    path
}

fn test_root() -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    path.push(format!(
        "downdate-cli-tests-{}-{}",
        std::process::id(),
        nanos
    ));
    path
}
