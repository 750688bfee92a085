// `show bgp sessions` - per-VRF BGP neighbor session state

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration_nanos;
use crate::normalize::{parse_duration, str_int};
use crate::schema::{Body, Envelope, RowPath, Table, TableRow, WarningSink, de};

/// Decoded `show bgp sessions` response
pub type BgpSessions = Envelope<BgpSessionsBody>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BgpSessionsBody {
    #[serde(deserialize_with = "de::text")]
    pub localas: String,
    #[serde(rename = "totalestablishedpeers", deserialize_with = "de::text")]
    pub total_established_peers: String,
    #[serde(rename = "totalpeers", deserialize_with = "de::text")]
    pub total_peers: String,
    #[serde(rename = "TABLE_vrf")]
    pub table_vrf: Table<BgpVrfRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BgpVrfRow {
    #[serde(rename = "local-as", deserialize_with = "de::text")]
    pub local_as: String,
    #[serde(rename = "router-id", deserialize_with = "de::text")]
    pub router_id: String,
    #[serde(rename = "vrf-name-out", deserialize_with = "de::text")]
    pub vrf_name_out: String,
    #[serde(rename = "vrfestablishedpeers", deserialize_with = "de::text")]
    pub vrf_established_peers: String,
    #[serde(rename = "vrfpeers", deserialize_with = "de::text")]
    pub vrf_peers: String,
    #[serde(rename = "TABLE_neighbor")]
    pub table_neighbor: Table<BgpNeighborRow>,
}

impl TableRow for BgpVrfRow {
    const KEY: &'static str = "ROW_vrf";
}

/// One BGP neighbor. Counters arrive as decimal strings, timers as
/// ISO-8601 durations; `lastread`/`lastwrite` are absent for idle peers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BgpNeighborRow {
    #[serde(rename = "connectionsdropped", deserialize_with = "de::text")]
    pub connections_dropped: String,
    #[serde(rename = "lastflap", deserialize_with = "de::text")]
    pub last_flap: String,
    #[serde(rename = "lastread", deserialize_with = "de::text")]
    pub last_read: String,
    #[serde(rename = "lastwrite", deserialize_with = "de::text")]
    pub last_write: String,
    #[serde(rename = "localport", deserialize_with = "de::text")]
    pub local_port: String,
    #[serde(rename = "neighbor-id", deserialize_with = "de::text")]
    pub neighbor_id: String,
    #[serde(rename = "notificationsreceived", deserialize_with = "de::text")]
    pub notifications_received: String,
    #[serde(rename = "notificationssent", deserialize_with = "de::text")]
    pub notifications_sent: String,
    #[serde(rename = "remoteas", deserialize_with = "de::text")]
    pub remote_as: String,
    #[serde(rename = "remoteport", deserialize_with = "de::text")]
    pub remote_port: String,
    #[serde(deserialize_with = "de::text")]
    pub state: String,
}

impl TableRow for BgpNeighborRow {
    const KEY: &'static str = "ROW_neighbor";
}

/// Neighbor fields followed by the enclosing VRF's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BgpSessionRecord {
    #[serde(rename = "connectionsdropped")]
    pub connections_dropped: i64,
    #[serde(rename = "lastflap", serialize_with = "duration_nanos")]
    pub last_flap: Duration,
    #[serde(rename = "lastread", serialize_with = "duration_nanos")]
    pub last_read: Duration,
    #[serde(rename = "lastwrite", serialize_with = "duration_nanos")]
    pub last_write: Duration,
    #[serde(rename = "localport")]
    pub local_port: String,
    #[serde(rename = "neighbor-id")]
    pub neighbor_id: String,
    #[serde(rename = "notificationsreceived")]
    pub notifications_received: i64,
    #[serde(rename = "notificationssent")]
    pub notifications_sent: i64,
    #[serde(rename = "remoteas")]
    pub remote_as: String,
    #[serde(rename = "remoteport")]
    pub remote_port: String,
    pub state: String,

    #[serde(rename = "local-as")]
    pub local_as: String,
    #[serde(rename = "router-id")]
    pub router_id: String,
    #[serde(rename = "vrf-name-out")]
    pub vrf_name_out: String,
    #[serde(rename = "vrfestablishedpeers")]
    pub vrf_established_peers: String,
    #[serde(rename = "vrfpeers")]
    pub vrf_peers: String,
}

impl BgpSessionRecord {
    fn new(vrf: &BgpVrfRow, neighbor: &BgpNeighborRow) -> Self {
        BgpSessionRecord {
            connections_dropped: str_int(&neighbor.connections_dropped),
            last_flap: parse_duration(&neighbor.last_flap),
            last_read: parse_duration(&neighbor.last_read),
            last_write: parse_duration(&neighbor.last_write),
            local_port: neighbor.local_port.clone(),
            neighbor_id: neighbor.neighbor_id.clone(),
            notifications_received: str_int(&neighbor.notifications_received),
            notifications_sent: str_int(&neighbor.notifications_sent),
            remote_as: neighbor.remote_as.clone(),
            remote_port: neighbor.remote_port.clone(),
            state: neighbor.state.clone(),
            local_as: vrf.local_as.clone(),
            router_id: vrf.router_id.clone(),
            vrf_name_out: vrf.vrf_name_out.clone(),
            vrf_established_peers: vrf.vrf_established_peers.clone(),
            vrf_peers: vrf.vrf_peers.clone(),
        }
    }
}

impl Body for BgpSessionsBody {
    type Record = BgpSessionRecord;
    const COMMAND: &'static str = "show bgp sessions";

    fn flatten(&self) -> Vec<BgpSessionRecord> {
        let mut records = Vec::new();
        for vrf in &self.table_vrf {
            for neighbor in &vrf.table_neighbor {
                records.push(BgpSessionRecord::new(vrf, neighbor));
            }
        }
        records
    }

    fn scan(&self, sink: &mut WarningSink) {
        for (vrf_idx, vrf) in self.table_vrf.iter().enumerate() {
            let vrf_path = RowPath::root().child(BgpVrfRow::KEY, vrf_idx);
            for (idx, neighbor) in vrf.table_neighbor.iter().enumerate() {
                let path = vrf_path.child(BgpNeighborRow::KEY, idx);
                sink.str_int(&path, "connectionsdropped", &neighbor.connections_dropped);
                sink.str_int(&path, "notificationsreceived", &neighbor.notifications_received);
                sink.str_int(&path, "notificationssent", &neighbor.notifications_sent);
                sink.duration(&path, "lastflap", &neighbor.last_flap);
                sink.duration(&path, "lastread", &neighbor.last_read);
                sink.duration(&path, "lastwrite", &neighbor.last_write);
            }
        }
    }
}
