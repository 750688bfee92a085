// `show ip route` - VRF / address family / prefix / path

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration_nanos;
use crate::normalize::parse_duration;
use crate::schema::{Body, Envelope, LenientInt, RowPath, Table, TableRow, WarningSink, de};

/// Decoded `show ip route` response
pub type IpRoute = Envelope<IpRouteBody>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IpRouteBody {
    #[serde(rename = "TABLE_vrf")]
    pub table_vrf: Table<RouteVrfRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteVrfRow {
    #[serde(rename = "vrf-name-out", deserialize_with = "de::text")]
    pub vrf_name_out: String,
    #[serde(rename = "TABLE_addrf")]
    pub table_addrf: Table<RouteAddrfRow>,
}

impl TableRow for RouteVrfRow {
    const KEY: &'static str = "ROW_vrf";
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteAddrfRow {
    #[serde(deserialize_with = "de::text")]
    pub addrf: String,
    #[serde(rename = "TABLE_prefix")]
    pub table_prefix: Table<RoutePrefixRow>,
}

impl TableRow for RouteAddrfRow {
    const KEY: &'static str = "ROW_addrf";
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutePrefixRow {
    #[serde(deserialize_with = "de::text")]
    pub attached: String,
    #[serde(deserialize_with = "de::text")]
    pub ipprefix: String,
    #[serde(rename = "mcast-nhops")]
    pub mcast_nhops: LenientInt,
    #[serde(rename = "ucast-nhops")]
    pub ucast_nhops: LenientInt,
    #[serde(rename = "TABLE_path")]
    pub table_path: Table<RoutePathRow>,
}

impl TableRow for RoutePrefixRow {
    const KEY: &'static str = "ROW_prefix";
}

/// One next hop. A prefix without a usable next hop may list a single
/// path row with every field empty; it still flattens to one record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutePathRow {
    #[serde(deserialize_with = "de::text")]
    pub clientname: String,
    #[serde(deserialize_with = "de::text")]
    pub ifname: String,
    #[serde(deserialize_with = "de::text")]
    pub ipnexthop: String,
    pub metric: LenientInt,
    pub pref: LenientInt,
    #[serde(deserialize_with = "de::text")]
    pub ubest: String,
    #[serde(deserialize_with = "de::text")]
    pub uptime: String,
}

impl TableRow for RoutePathRow {
    const KEY: &'static str = "ROW_path";
}

/// Path fields, then prefix, address family and VRF fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    pub clientname: String,
    pub ifname: String,
    pub ipnexthop: String,
    pub metric: i64,
    pub pref: i64,
    pub ubest: String,
    #[serde(serialize_with = "duration_nanos")]
    pub uptime: Duration,

    pub attached: String,
    pub ipprefix: String,
    #[serde(rename = "mcast-nhops")]
    pub mcast_nhops: i64,
    #[serde(rename = "ucast-nhops")]
    pub ucast_nhops: i64,

    pub addrf: String,

    #[serde(rename = "vrf-name-out")]
    pub vrf_name_out: String,
}

impl RouteRecord {
    fn new(
        vrf: &RouteVrfRow,
        addrf: &RouteAddrfRow,
        prefix: &RoutePrefixRow,
        path: &RoutePathRow,
    ) -> Self {
        RouteRecord {
            clientname: path.clientname.clone(),
            ifname: path.ifname.clone(),
            ipnexthop: path.ipnexthop.clone(),
            metric: path.metric.get(),
            pref: path.pref.get(),
            ubest: path.ubest.clone(),
            uptime: parse_duration(&path.uptime),
            attached: prefix.attached.clone(),
            ipprefix: prefix.ipprefix.clone(),
            mcast_nhops: prefix.mcast_nhops.get(),
            ucast_nhops: prefix.ucast_nhops.get(),
            addrf: addrf.addrf.clone(),
            vrf_name_out: vrf.vrf_name_out.clone(),
        }
    }
}

impl Body for IpRouteBody {
    type Record = RouteRecord;
    const COMMAND: &'static str = "show ip route";

    fn flatten(&self) -> Vec<RouteRecord> {
        let mut records = Vec::new();
        for vrf in &self.table_vrf {
            for addrf in &vrf.table_addrf {
                for prefix in &addrf.table_prefix {
                    for path in &prefix.table_path {
                        records.push(RouteRecord::new(vrf, addrf, prefix, path));
                    }
                }
            }
        }
        records
    }

    fn scan(&self, sink: &mut WarningSink) {
        for (vrf_idx, vrf) in self.table_vrf.iter().enumerate() {
            let vrf_path = RowPath::root().child(RouteVrfRow::KEY, vrf_idx);
            for (addrf_idx, addrf) in vrf.table_addrf.iter().enumerate() {
                let addrf_path = vrf_path.child(RouteAddrfRow::KEY, addrf_idx);
                for (prefix_idx, prefix) in addrf.table_prefix.iter().enumerate() {
                    let prefix_path = addrf_path.child(RoutePrefixRow::KEY, prefix_idx);
                    sink.int(&prefix_path, "mcast-nhops", &prefix.mcast_nhops);
                    sink.int(&prefix_path, "ucast-nhops", &prefix.ucast_nhops);
                    for (idx, path) in prefix.table_path.iter().enumerate() {
                        let row_path = prefix_path.child(RoutePathRow::KEY, idx);
                        sink.int(&row_path, "metric", &path.metric);
                        sink.int(&row_path, "pref", &path.pref);
                        sink.duration(&row_path, "uptime", &path.uptime);
                    }
                }
            }
        }
    }
}
