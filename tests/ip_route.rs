// Conformance tests for `show ip route`

mod common;

use std::time::Duration;

use nxos_flat::{CommandFamily, IpRoute};
use serde_json::json;

fn decode(payload: &str) -> IpRoute {
    payload.parse().unwrap()
}

#[test]
fn test_paths_flatten_with_prefix_context() {
    let route = decode(&common::fixture("show_ip_route.json"));
    assert!(!route.has_warnings());

    let records = route.flatten();
    assert_eq!(records.len(), 9);
    assert!(records.iter().all(|r| r.vrf_name_out == "default"));
    assert!(records.iter().all(|r| r.addrf == "ipv4"));

    let default_route = &records[0];
    assert_eq!(default_route.ipprefix, "0.0.0.0/0");
    assert_eq!(default_route.clientname, "static");
    assert_eq!(default_route.pref, 1);
    assert_eq!(default_route.uptime, Duration::from_secs(648_125));

    let ecmp: Vec<_> = records
        .iter()
        .filter(|r| r.ipprefix == "19.0.101.0/24")
        .collect();
    assert_eq!(ecmp.len(), 3);
    for record in &ecmp {
        assert_eq!(record.ucast_nhops, 3);
        assert_eq!(record.metric, 41);
        assert_eq!(record.pref, 110);
        assert_eq!(record.attached, "false");
    }
    let hops: Vec<_> = ecmp.iter().map(|r| r.ipnexthop.as_str()).collect();
    assert_eq!(hops, vec!["10.0.0.3", "10.0.0.5", "10.0.0.7"]);
}

#[test]
fn test_empty_path_row_keeps_prefix_context() {
    let records = decode(&common::fixture("show_ip_route.json")).flatten();
    let empty: Vec<_> = records
        .iter()
        .filter(|r| r.ipprefix == "19.0.200.0/24")
        .collect();
    assert_eq!(empty.len(), 1);

    let record = empty[0];
    assert_eq!(record.clientname, "");
    assert_eq!(record.ifname, "");
    assert_eq!(record.ipnexthop, "");
    assert_eq!(record.metric, 0);
    assert_eq!(record.pref, 0);
    assert_eq!(record.ubest, "");
    assert_eq!(record.uptime, Duration::ZERO);
    assert_eq!(record.ucast_nhops, 0);
    assert_eq!(record.addrf, "ipv4");
    assert_eq!(record.vrf_name_out, "default");
}

#[test]
fn test_removing_prefix_table_subtree() {
    let mut doc = common::fixture_value("show_ip_route.json");
    let prefixes = common::body_mut(&mut doc)["TABLE_vrf"]["ROW_vrf"]["TABLE_addrf"]["ROW_addrf"]
        ["TABLE_prefix"]["ROW_prefix"]
        .as_array_mut()
        .unwrap();
    prefixes[3].as_object_mut().unwrap().remove("TABLE_path");

    let original = decode(&common::fixture("show_ip_route.json")).flatten();
    let pruned = decode(&doc.to_string()).flatten();

    let expected: Vec<_> = original
        .into_iter()
        .filter(|r| r.ipprefix != "19.0.101.0/24")
        .collect();
    assert_eq!(pruned, expected);
}

#[test]
fn test_single_path_list_equals_bare_path() {
    let mut doc = common::fixture_value("show_ip_route.json");
    let prefixes = common::body_mut(&mut doc)["TABLE_vrf"]["ROW_vrf"]["TABLE_addrf"]["ROW_addrf"]
        ["TABLE_prefix"]["ROW_prefix"]
        .as_array_mut()
        .unwrap();
    // prefix 0 carries a bare path object; wrap it in a list
    let bare = prefixes[0]["TABLE_path"]["ROW_path"].clone();
    prefixes[0]["TABLE_path"]["ROW_path"] = json!([bare]);

    let original = decode(&common::fixture("show_ip_route.json")).flatten();
    assert_eq!(decode(&doc.to_string()).flatten(), original);
}

#[test]
fn test_every_record_matches_its_tree_path() {
    let route = decode(&common::fixture("show_ip_route.json"));
    let records = route.flatten();

    let mut idx = 0;
    for vrf in &route.body().table_vrf {
        for addrf in &vrf.table_addrf {
            for prefix in &addrf.table_prefix {
                for path in &prefix.table_path {
                    let record = &records[idx];
                    assert_eq!(record.vrf_name_out, vrf.vrf_name_out);
                    assert_eq!(record.addrf, addrf.addrf);
                    assert_eq!(record.ipprefix, prefix.ipprefix);
                    assert_eq!(record.ipnexthop, path.ipnexthop);
                    idx += 1;
                }
            }
        }
    }
    assert_eq!(idx, records.len());
}

#[test]
fn test_unknown_fields_do_not_change_output() {
    let mut doc = common::fixture_value("show_ip_route.json");
    common::insert_everywhere(&mut doc, "future_flag", &json!("x"));
    common::insert_everywhere(&mut doc, "future_table", &json!({"nested": [1, {"a": null}]}));
    common::insert_everywhere(&mut doc, "ROW_future", &json!("x"));

    let original = decode(&common::fixture("show_ip_route.json")).flatten();
    assert_eq!(decode(&doc.to_string()).flatten(), original);
}

#[test]
fn test_error_reply_has_empty_body() {
    let payload = r#"{"ins_api": {"type": "cli_show", "version": "1.0", "sid": "eoc",
        "outputs": {"output": {"input": "show ip route vrf nope", "msg": "Invalid VRF",
        "code": "400", "body": ""}}}}"#;

    let route = decode(payload);
    assert!(!route.is_success());
    assert_eq!(route.msg(), "Invalid VRF");
    assert!(route.flatten().is_empty());
}

#[test]
fn test_registry_decode_matches_direct_decode() {
    let payload = common::fixture("show_ip_route.json");
    let report = CommandFamily::IpRoute.decode(payload.as_bytes()).unwrap();
    let direct = decode(&payload).flatten();

    assert_eq!(report.input, "show ip route");
    assert_eq!(report.records, nxos_flat::FlatRecords::IpRoute(direct));

    let values = report.records.to_json_values().unwrap();
    assert_eq!(values[0]["uptime"], 648_125_000_000_000u64);
    assert_eq!(values[0]["vrf-name-out"], "default");
    assert_eq!(values[0]["ucast-nhops"], 1);
}
