use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

const LISTING: &str = "\
13: veth456@if12: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc noqueue master docker0
    link/ether 6e:2d:11:22:33:44 brd ff:ff:ff:ff:ff:ff link-netnsid 1
1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536
";

#[test]
fn test_help_command() {
    Command::new(env!("CARGO_BIN_EXE_shaper"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("veth interfaces"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("veth"))
        .stdout(predicate::str::contains("containers"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("parse"));
}

#[test]
fn test_version_command() {
    Command::new(env!("CARGO_BIN_EXE_shaper"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shaper"));
}

#[test]
fn test_invalid_command() {
    Command::new(env!("CARGO_BIN_EXE_shaper"))
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_veth_without_container() {
    Command::new(env!("CARGO_BIN_EXE_shaper"))
        .arg("veth")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_invalid_mode() {
    Command::new(env!("CARGO_BIN_EXE_shaper"))
        .args(["--mode", "bogus", "parse", "hostA"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown execution mode"));
}

#[test]
fn test_parse_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(LISTING.as_bytes()).unwrap();

    Command::new(env!("CARGO_BIN_EXE_shaper"))
        .arg("parse")
        .arg("hostA")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ifname\": \"veth456\""))
        .stdout(predicate::str::contains("\"peer_ifindex\": 12"))
        .stdout(predicate::str::contains("\"scope\": \"hostA\""))
        .stdout(predicate::str::contains("\"ifname\": \"lo\"").not());
}

#[test]
fn test_parse_stdin() {
    Command::new(env!("CARGO_BIN_EXE_shaper"))
        .args(["parse", "web"])
        .write_stdin("2: eth0@if13: <BROADCAST>\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ifname\": \"eth0\""))
        .stdout(predicate::str::contains("\"scope\": \"web\""));
}

#[test]
fn test_parse_missing_file() {
    Command::new(env!("CARGO_BIN_EXE_shaper"))
        .args(["parse", "hostA", "/nonexistent/listing.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
}
