// Commands module - one schema and flattener per supported "show" command

pub mod arp;
pub mod bgp;
pub mod route;

pub use arp::{ArpAdjacencyRow, ArpRecord, ArpVrfRow, IpArp, IpArpBody};
pub use bgp::{BgpNeighborRow, BgpSessionRecord, BgpSessions, BgpSessionsBody, BgpVrfRow};
pub use route::{
    IpRoute, IpRouteBody, RouteAddrfRow, RoutePathRow, RoutePrefixRow, RouteRecord, RouteVrfRow,
};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DecodeResult, UnknownFamily};
use crate::schema::{Body, Envelope, ScalarWarning};

/// Durations leave the crate as integer nanoseconds.
pub(crate) fn duration_nanos<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
    serializer.serialize_u64(nanos)
}

/// Supported command families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandFamily {
    BgpSessions,
    IpArp,
    IpRoute,
}

impl CommandFamily {
    pub const ALL: [CommandFamily; 3] = [
        CommandFamily::BgpSessions,
        CommandFamily::IpArp,
        CommandFamily::IpRoute,
    ];

    /// Short name used on the command line and in config files
    pub fn name(self) -> &'static str {
        match self {
            CommandFamily::BgpSessions => "bgp-sessions",
            CommandFamily::IpArp => "ip-arp",
            CommandFamily::IpRoute => "ip-route",
        }
    }

    /// Device command whose response this family decodes
    pub fn command(self) -> &'static str {
        match self {
            CommandFamily::BgpSessions => BgpSessionsBody::COMMAND,
            CommandFamily::IpArp => IpArpBody::COMMAND,
            CommandFamily::IpRoute => IpRouteBody::COMMAND,
        }
    }

    /// Decode `bytes` with this family's schema and flatten the result.
    pub fn decode(self, bytes: &[u8]) -> DecodeResult<FlatReport> {
        let report = match self {
            CommandFamily::BgpSessions => {
                FlatReport::build(self, BgpSessions::from_bytes(bytes)?, FlatRecords::BgpSessions)
            }
            CommandFamily::IpArp => {
                FlatReport::build(self, IpArp::from_bytes(bytes)?, FlatRecords::IpArp)
            }
            CommandFamily::IpRoute => {
                FlatReport::build(self, IpRoute::from_bytes(bytes)?, FlatRecords::IpRoute)
            }
        };
        Ok(report)
    }
}

impl fmt::Display for CommandFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandFamily {
    type Err = UnknownFamily;

    /// Accepts the short name (`ip-route`) or the device command (`show ip route`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let wanted = wanted.split_whitespace().collect::<Vec<_>>().join(" ");
        CommandFamily::ALL
            .into_iter()
            .find(|family| family.name() == wanted || family.command() == wanted)
            .ok_or_else(|| UnknownFamily(s.to_string()))
    }
}

impl Serialize for CommandFamily {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for CommandFamily {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Flat records of one decoded response, whichever family it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatRecords {
    BgpSessions(Vec<BgpSessionRecord>),
    IpArp(Vec<ArpRecord>),
    IpRoute(Vec<RouteRecord>),
}

impl FlatRecords {
    pub fn len(&self) -> usize {
        match self {
            FlatRecords::BgpSessions(records) => records.len(),
            FlatRecords::IpArp(records) => records.len(),
            FlatRecords::IpRoute(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json_values(&self) -> serde_json::Result<Vec<serde_json::Value>> {
        match self {
            FlatRecords::BgpSessions(records) => to_values(records),
            FlatRecords::IpArp(records) => to_values(records),
            FlatRecords::IpRoute(records) => to_values(records),
        }
    }
}

fn to_values<T: Serialize>(records: &[T]) -> serde_json::Result<Vec<serde_json::Value>> {
    records.iter().map(serde_json::to_value).collect()
}

/// Outcome of [`CommandFamily::decode`]
#[derive(Debug, Clone)]
pub struct FlatReport {
    pub family: CommandFamily,
    pub code: String,
    pub input: String,
    pub msg: String,
    pub records: FlatRecords,
    pub warnings: Vec<ScalarWarning>,
}

impl FlatReport {
    fn build<B: Body>(
        family: CommandFamily,
        envelope: Envelope<B>,
        wrap: fn(Vec<B::Record>) -> FlatRecords,
    ) -> Self {
        FlatReport {
            family,
            code: envelope.code().to_string(),
            input: envelope.input().to_string(),
            msg: envelope.msg().to_string(),
            records: wrap(envelope.flatten()),
            warnings: envelope.warnings().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_name_or_command() {
        assert_eq!("ip-route".parse::<CommandFamily>().unwrap(), CommandFamily::IpRoute);
        assert_eq!("show ip arp".parse::<CommandFamily>().unwrap(), CommandFamily::IpArp);
        assert_eq!(
            "  SHOW  bgp   sessions ".parse::<CommandFamily>().unwrap(),
            CommandFamily::BgpSessions
        );
        assert!("show version".parse::<CommandFamily>().is_err());
    }

    #[test]
    fn test_family_round_trips_through_name() {
        for family in CommandFamily::ALL {
            assert_eq!(family.to_string().parse::<CommandFamily>().unwrap(), family);
        }
    }

    #[test]
    fn test_family_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            family: CommandFamily,
        }

        let holder: Holder = toml::from_str(r#"family = "show ip route""#).unwrap();
        assert_eq!(holder.family, CommandFamily::IpRoute);
        assert!(toml::from_str::<Holder>(r#"family = "nope""#).is_err());
    }

    #[test]
    fn test_decode_selects_schema_by_family() {
        let payload = br#"{"ins_api": {"outputs": {"output": {"code": "200", "msg": "Success",
            "input": "show ip arp",
            "body": {"TABLE_vrf": {"ROW_vrf": {"vrf-name-out": "default", "cnt-total": 1,
                "TABLE_adj": {"ROW_adj": {"ip-addr-out": "10.0.0.1", "time-stamp": "PT1S"}}}}}}}}}"#;

        let report = CommandFamily::IpArp.decode(payload).unwrap();
        assert_eq!(report.family, CommandFamily::IpArp);
        assert_eq!(report.code, "200");
        assert_eq!(report.records.len(), 1);
        assert!(report.warnings.is_empty());

        // the route schema finds no route tables in an ARP body
        let report = CommandFamily::IpRoute.decode(payload).unwrap();
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_json_values_use_nanoseconds() {
        let payload = br#"{"ins_api": {"outputs": {"output": {
            "body": {"TABLE_vrf": {"ROW_vrf": {"vrf-name-out": "default", "cnt-total": 1,
                "TABLE_adj": {"ROW_adj": {"ip-addr-out": "10.0.0.1", "time-stamp": "PT1.5S"}}}}}}}}}"#;

        let values = CommandFamily::IpArp
            .decode(payload)
            .unwrap()
            .records
            .to_json_values()
            .unwrap();
        assert_eq!(values[0]["time-stamp"], 1_500_000_000u64);
        assert_eq!(values[0]["ip-addr-out"], "10.0.0.1");
    }
}
