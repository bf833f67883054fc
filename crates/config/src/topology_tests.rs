use super::*;
use std::io::Write;

const BASE: &str = r#"
[hosts.submit]
cores = 4
ram = 1024.0
flop_rate = 1.0e9

[hosts.worker]
cores = 8
ram = 2048.0
flop_rate = 2.0e9

[disks.worker_disk]
host = "worker"
read_bandwidth = 1.0e9
write_bandwidth = 5.0e8

[[links]]
src = "submit"
dst = "worker"
bandwidth = 1.25e8
latency = 0.001
"#;

#[test]
fn parses_hosts_disks_and_links() {
    let topo = Topology::from_str(BASE).unwrap();
    assert_eq!(topo.hosts().len(), 2);
    assert_eq!(topo.links().len(), 1);
}

#[test]
fn install_assigns_a_host_id_per_named_host_and_wires_disks() {
    let topo = Topology::from_str(BASE).unwrap();
    let (hosts, disks, ids) = topo.install().unwrap();
    let worker = ids["worker"];
    assert_eq!(hosts.cores(worker), Some(8));
    assert_eq!(disks.read_bandwidth(worker), Some(1.0e9));
}

#[test]
fn install_rejects_a_disk_referencing_an_unknown_host() {
    let text = r#"
[hosts.submit]
cores = 1
ram = 1.0
flop_rate = 1.0

[disks.orphan]
host = "nonexistent"
read_bandwidth = 1.0
write_bandwidth = 1.0
"#;
    let topo = Topology::from_str(text).unwrap();
    assert!(matches!(topo.install(), Err(TopologyError::UnknownHost { .. })));
}

#[test]
fn layered_load_lets_an_earlier_layer_win_on_a_name_collision() {
    let mut base_file = tempfile::NamedTempFile::new().unwrap();
    write!(base_file, "{BASE}").unwrap();

    let mut overlay_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        overlay_file,
        r#"
[hosts.worker]
cores = 99
ram = 1.0
flop_rate = 1.0
"#
    )
    .unwrap();

    let (merged, warnings) = Topology::load_layered(&[base_file.path(), overlay_file.path()]).unwrap();
    assert_eq!(merged.hosts()["worker"].cores, 8);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn a_missing_topology_file_reports_a_read_error() {
    let err = Topology::load("/nonexistent/path/topology.toml").unwrap_err();
    assert!(matches!(err, TopologyError::Read { .. }));
}
