// `show ip arp` - per-VRF adjacency table

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration_nanos;
use crate::normalize::parse_duration;
use crate::schema::{Body, Envelope, LenientInt, RowPath, Table, TableRow, WarningSink, de};

/// Decoded `show ip arp` response
pub type IpArp = Envelope<IpArpBody>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IpArpBody {
    #[serde(rename = "TABLE_vrf")]
    pub table_vrf: Table<ArpVrfRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArpVrfRow {
    #[serde(rename = "cnt-total")]
    pub cnt_total: LenientInt,
    #[serde(rename = "vrf-name-out", deserialize_with = "de::text")]
    pub vrf_name_out: String,
    #[serde(rename = "TABLE_adj")]
    pub table_adj: Table<ArpAdjacencyRow>,
}

impl TableRow for ArpVrfRow {
    const KEY: &'static str = "ROW_vrf";
}

/// One adjacency. Unresolved entries carry no `mac` and `incomplete: "true"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArpAdjacencyRow {
    #[serde(deserialize_with = "de::text")]
    pub flags: String,
    #[serde(rename = "intf-out", deserialize_with = "de::text")]
    pub intf_out: String,
    #[serde(rename = "ip-addr-out", deserialize_with = "de::text")]
    pub ip_addr_out: String,
    #[serde(deserialize_with = "de::text")]
    pub mac: String,
    #[serde(rename = "time-stamp", deserialize_with = "de::text")]
    pub time_stamp: String,
    #[serde(deserialize_with = "de::text")]
    pub incomplete: String,
}

impl TableRow for ArpAdjacencyRow {
    const KEY: &'static str = "ROW_adj";
}

/// Adjacency fields followed by the enclosing VRF's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArpRecord {
    pub flags: String,
    #[serde(rename = "intf-out")]
    pub intf_out: String,
    #[serde(rename = "ip-addr-out")]
    pub ip_addr_out: String,
    pub mac: String,
    #[serde(rename = "time-stamp", serialize_with = "duration_nanos")]
    pub time_stamp: Duration,
    pub incomplete: String,

    #[serde(rename = "cnt-total")]
    pub cnt_total: i64,
    #[serde(rename = "vrf-name-out")]
    pub vrf_name_out: String,
}

impl ArpRecord {
    fn new(vrf: &ArpVrfRow, adj: &ArpAdjacencyRow) -> Self {
        ArpRecord {
            flags: adj.flags.clone(),
            intf_out: adj.intf_out.clone(),
            ip_addr_out: adj.ip_addr_out.clone(),
            mac: adj.mac.clone(),
            time_stamp: parse_duration(&adj.time_stamp),
            incomplete: adj.incomplete.clone(),
            cnt_total: vrf.cnt_total.get(),
            vrf_name_out: vrf.vrf_name_out.clone(),
        }
    }
}

impl Body for IpArpBody {
    type Record = ArpRecord;
    const COMMAND: &'static str = "show ip arp";

    fn flatten(&self) -> Vec<ArpRecord> {
        self.table_vrf
            .iter()
            .flat_map(|vrf| vrf.table_adj.iter().map(move |adj| ArpRecord::new(vrf, adj)))
            .collect()
    }

    fn scan(&self, sink: &mut WarningSink) {
        for (vrf_idx, vrf) in self.table_vrf.iter().enumerate() {
            let vrf_path = RowPath::root().child(ArpVrfRow::KEY, vrf_idx);
            sink.int(&vrf_path, "cnt-total", &vrf.cnt_total);
            for (idx, adj) in vrf.table_adj.iter().enumerate() {
                let path = vrf_path.child(ArpAdjacencyRow::KEY, idx);
                sink.duration(&path, "time-stamp", &adj.time_stamp);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r##"{"ins_api": {"outputs": {"output": {
        "code": "200", "input": "show ip arp", "msg": "Success",
        "body": {"TABLE_vrf": {"ROW_vrf": {
            "vrf-name-out": "management", "cnt-total": "2",
            "TABLE_adj": {"ROW_adj": [
                {"intf-out": "mgmt0", "ip-addr-out": "192.168.0.1", "time-stamp": "PT2M3S",
                 "mac": "0050.56bf.0c31", "flags": ""},
                {"intf-out": "mgmt0", "ip-addr-out": "192.168.0.9", "time-stamp": "PT9S",
                 "incomplete": "true", "flags": "#"}
            ]}
        }}}}}, "sid": "eoc", "type": "cli_show", "version": "1.0"}}"##;

    #[test]
    fn test_flatten_adjacencies() {
        let arp: IpArp = PAYLOAD.parse().unwrap();
        let records = arp.flatten();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].mac, "0050.56bf.0c31");
        assert_eq!(records[0].incomplete, "");
        assert_eq!(records[0].time_stamp, Duration::from_secs(123));
        assert_eq!(records[0].cnt_total, 2);
        assert_eq!(records[0].vrf_name_out, "management");

        assert_eq!(records[1].mac, "");
        assert_eq!(records[1].incomplete, "true");
        assert_eq!(records[1].flags, "#");
    }

    #[test]
    fn test_bad_count_warns_and_zeroes() {
        let payload = PAYLOAD.replace(r#""cnt-total": "2""#, r#""cnt-total": "two""#);
        let arp: IpArp = payload.parse().unwrap();

        assert_eq!(arp.warnings().len(), 1);
        assert_eq!(arp.warnings()[0].field, "cnt-total");
        assert_eq!(arp.warnings()[0].path, "ROW_vrf[0]");
        assert!(arp.flatten().iter().all(|r| r.cnt_total == 0));
    }

    #[test]
    fn test_vrf_without_adjacencies_emits_nothing() {
        let arp: IpArp = r#"{"ins_api": {"outputs": {"output": {"body":
            {"TABLE_vrf": {"ROW_vrf": [{"vrf-name-out": "red", "cnt-total": 0}]}}}}}}"#
            .parse()
            .unwrap();
        assert_eq!(arp.body().table_vrf.len(), 1);
        assert!(arp.flatten().is_empty());
    }
}
