use shaper_core::{Error, ProcessId};
use shaper_netns::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;

/// Check if running as root
fn is_root() -> bool {
    unsafe { libc::getuid() == 0 }
}

/// Config rooted in a temp dir, with a fake `/proc/<pid>/ns/net` for `pid`
fn sandbox(pid: i32) -> (tempfile::TempDir, NetnsConfig) {
    let dir = tempfile::tempdir().unwrap();
    let ns_dir = dir.path().join("proc").join(pid.to_string()).join("ns");
    fs::create_dir_all(&ns_dir).unwrap();
    fs::write(ns_dir.join("net"), b"").unwrap();

    let config = NetnsConfig::new()
        .with_netns_root(dir.path().join("run/netns"))
        .with_proc_root(dir.path().join("proc"));
    (dir, config)
}

#[test]
fn test_acquire_check_release() {
    let (_dir, config) = sandbox(4242);
    let locator = NetnsLocator::new(config.clone());

    let link = locator.acquire("web", ProcessId::from_raw(4242)).unwrap();
    let path = link.path().to_path_buf();
    assert_eq!(path, config.netns_path("web"));

    link.check().unwrap();
    link.release().unwrap();

    assert!(path.symlink_metadata().is_err());
}

#[test]
fn test_acquire_twice_is_idempotent() {
    let (_dir, config) = sandbox(7);
    let locator = NetnsLocator::new(config.clone());

    let first = locator.acquire("web", ProcessId::from_raw(7)).unwrap();
    let second = locator.acquire("web", ProcessId::from_raw(7)).unwrap();
    assert_eq!(first.path(), second.path());

    let entries = fs::read_dir(config.netns_root()).unwrap().count();
    assert_eq!(entries, 1);

    second.release().unwrap();
    // Releasing an already removed link is not an error
    first.release().unwrap();
}

#[test]
fn test_existing_link_is_reused() {
    let (dir, config) = sandbox(7);
    fs::create_dir_all(config.netns_root()).unwrap();
    std::os::unix::fs::symlink(dir.path().join("proc/7/ns/net"), config.netns_path("web")).unwrap();

    let link = NetnsLocator::new(config.clone())
        .acquire("web", ProcessId::from_raw(7))
        .unwrap();
    link.check().unwrap();
    link.release().unwrap();

    assert!(config.netns_path("web").symlink_metadata().is_err());
}

#[test]
fn test_unwritable_root_is_permission_denied() {
    if is_root() {
        eprintln!("Skipping: permission checks are bypassed for root");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let config = NetnsConfig::new().with_netns_root(locked.join("netns"));
    let err = NetnsLocator::new(config)
        .acquire("web", ProcessId::from_raw(1))
        .unwrap_err();

    assert!(matches!(err, Error::PermissionDenied { .. }));
    assert_eq!(err.exit_code(), libc::EPERM);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_link_refused_in_read_only_root() {
    if is_root() {
        eprintln!("Skipping: permission checks are bypassed for root");
        return;
    }

    let (_dir, config) = sandbox(7);
    fs::create_dir_all(config.netns_root()).unwrap();
    fs::set_permissions(config.netns_root(), fs::Permissions::from_mode(0o555)).unwrap();

    let err = NetnsLocator::new(config.clone())
        .acquire("web", ProcessId::from_raw(7))
        .unwrap_err();

    assert!(matches!(err, Error::PermissionDenied { ref operation } if operation.contains("symlink")));
    assert_eq!(err.exit_code(), libc::EPERM);
    assert!(config.netns_path("web").symlink_metadata().is_err());

    fs::set_permissions(config.netns_root(), fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_release_refused_in_read_only_root() {
    if is_root() {
        eprintln!("Skipping: permission checks are bypassed for root");
        return;
    }

    let (_dir, config) = sandbox(7);
    let link = NetnsLocator::new(config.clone())
        .acquire("web", ProcessId::from_raw(7))
        .unwrap();
    fs::set_permissions(config.netns_root(), fs::Permissions::from_mode(0o555)).unwrap();

    let err = link.release().unwrap_err();
    assert!(matches!(err, Error::PermissionDenied { .. }));
    assert_eq!(err.exit_code(), libc::EPERM);

    fs::set_permissions(config.netns_root(), fs::Permissions::from_mode(0o755)).unwrap();
    assert!(config.netns_path("web").symlink_metadata().is_ok());
}

#[test]
fn test_release_fails_when_link_replaced_by_directory() {
    let (_dir, config) = sandbox(7);
    let link = NetnsLocator::new(config.clone())
        .acquire("web", ProcessId::from_raw(7))
        .unwrap();

    let path = config.netns_path("web");
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    fs::write(path.join("pinned"), b"").unwrap();

    let err = link.release().unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(path.is_dir());
}

#[test]
fn test_config_deserialize_with_defaults() {
    let config: NetnsConfig = serde_json::from_str(r#"{"ip_command": "/usr/sbin/ip"}"#).unwrap();

    assert_eq!(config.ip_command, "/usr/sbin/ip");
    assert_eq!(config.netns_root(), std::path::Path::new(DEFAULT_NETNS_ROOT));
}
