use shaper_core::*;

#[test]
fn test_container_record_serialization() {
    let record = ContainerRecord::running("web", "abc123", ProcessId::from_raw(4242), "nginx");

    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"state\":\"running\""));
    assert!(json.contains("\"pid\":4242"));

    let deserialized: ContainerRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record, deserialized);
}

#[test]
fn test_not_running_serialization() {
    let record = ContainerRecord::not_running("db");
    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(json, r#"{"name":"db","status":{"state":"not_running"}}"#);
}

#[test]
fn test_veth_record_serialization() {
    let record = VethRecord::new("hostA", 13, "veth456", 12);

    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(
        json,
        r#"{"scope":"hostA","ifindex":13,"ifname":"veth456","peer_ifindex":12}"#
    );
}

#[test]
fn test_exit_codes() {
    let denied = Error::PermissionDenied {
        operation: "symlink".to_string(),
    };
    assert_eq!(denied.exit_code(), EXIT_PERMISSION_DENIED);

    let not_running = Error::ContainerNotRunning {
        name: "web".to_string(),
    };
    assert_eq!(not_running.exit_code(), EXIT_PERMISSION_DENIED);

    let invalid = Error::InvalidConfig {
        message: "bad".to_string(),
    };
    assert_eq!(invalid.exit_code(), EXIT_FAILURE);
}

#[test]
fn test_container_summary_running() {
    let summary = ContainerSummary {
        name: "web".to_string(),
        state: "running".to_string(),
    };
    assert!(summary.is_running());

    let summary = ContainerSummary {
        name: "db".to_string(),
        state: "exited".to_string(),
    };
    assert!(!summary.is_running());
}
