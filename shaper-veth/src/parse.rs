//! Parser for `ip link show type veth` output

use regex::Regex;
use shaper_core::VethRecord;
use std::sync::LazyLock;

/// `<ifindex>: <ifname>@<peer>: `, where `<peer>` is `if<peer_ifindex>`
static VETH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+): ([A-Za-z0-9_.\-]+)@([A-Za-z0-9]+): ")
        .expect("veth line pattern is a valid regex")
});

/// Parse the veth endpoints listed in `output`, tagging each with `scope`.
///
/// Lines that do not look like a link header are ignored, so attribute lines
/// (`link/ether ...`) and other interface types may be intermixed. A header
/// whose indices do not parse is skipped with a warning.
///
/// ```
/// use shaper_veth::parse_veth_links;
///
/// let output = "12: veth123@if13: <BROADCAST,MULTICAST,UP> mtu 1500\n    link/ether 02:42:ac:11:00:02\n";
/// let records = parse_veth_links("abc", output);
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].ifindex, 12);
/// assert_eq!(records[0].ifname, "veth123");
/// assert_eq!(records[0].peer_ifindex, 13);
/// ```
#[must_use]
pub fn parse_veth_links(scope: &str, output: &str) -> Vec<VethRecord> {
    output
        .lines()
        .filter_map(|line| parse_line(scope, line))
        .collect()
}

fn parse_line(scope: &str, line: &str) -> Option<VethRecord> {
    let caps = VETH_LINE.captures(line)?;

    let ifname = &caps[2];
    let peer = caps[3].strip_prefix("if").unwrap_or(&caps[3]);

    let (Ok(ifindex), Ok(peer_ifindex)) = (caps[1].parse::<u32>(), peer.parse::<u32>()) else {
        tracing::warn!(scope, line, "Skipping veth line with unparsable ifindex");
        return None;
    };

    Some(VethRecord::new(scope, ifindex, ifname, peer_ifindex))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST_LISTING: &str = "\
7: vethb1d2e3f@if6: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc noqueue master docker0 state UP mode DEFAULT group default
    link/ether 5a:1c:7e:aa:bb:cc brd ff:ff:ff:ff:ff:ff link-netnsid 0
13: veth456@if12: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc noqueue master docker0 state UP mode DEFAULT group default
    link/ether 6e:2d:11:22:33:44 brd ff:ff:ff:ff:ff:ff link-netnsid 1
";

    #[test]
    fn test_parse_host_listing() {
        let records = parse_veth_links("hostA", HOST_LISTING);

        assert_eq!(
            records,
            vec![
                VethRecord::new("hostA", 7, "vethb1d2e3f", 6),
                VethRecord::new("hostA", 13, "veth456", 12),
            ]
        );
    }

    #[test]
    fn test_ignores_non_matching_lines() {
        let output = "\
1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN
2: eth0@if9: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500
garbage
";
        let records = parse_veth_links("web", output);
        assert_eq!(records, vec![VethRecord::new("web", 2, "eth0", 9)]);
    }

    #[test]
    fn test_skips_peer_without_index() {
        let output = "\
4: veth0@NONE: <BROADCAST,MULTICAST,M-DOWN> mtu 1500
5: veth1@if4: <BROADCAST,MULTICAST> mtu 1500
";
        let records = parse_veth_links("hostA", output);
        assert_eq!(records, vec![VethRecord::new("hostA", 5, "veth1", 4)]);
    }

    #[test]
    fn test_skips_overflowing_index() {
        let output = "99999999999: veth0@if3: <BROADCAST>\n";
        assert!(parse_veth_links("hostA", output).is_empty());
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_veth_links("hostA", "").is_empty());
    }
}
