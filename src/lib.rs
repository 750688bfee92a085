//! Decode NX-API "show" command responses and flatten them into records.
//!
//! Each supported command family has a nested schema mirroring the device's
//! `TABLE_x`/`ROW_x` layout and a flattener that denormalizes it into one
//! record per leaf row, carrying the fields of every enclosing row.
//!
//! ```no_run
//! use nxos_flat::IpRoute;
//!
//! # fn main() -> Result<(), nxos_flat::DecodeError> {
//! let payload = std::fs::read("show_ip_route.json")?;
//! let route = IpRoute::from_bytes(&payload)?;
//! for warning in route.warnings() {
//!     eprintln!("{warning}");
//! }
//! for record in route.flatten() {
//!     println!("{} via {} ({:?})", record.ipprefix, record.ipnexthop, record.uptime);
//! }
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod normalize;
pub mod schema;

pub use commands::{
    ArpRecord, BgpSessionRecord, BgpSessions, CommandFamily, FlatRecords, FlatReport, IpArp,
    IpRoute, RouteRecord,
};
pub use error::{DecodeError, DecodeResult, ScalarError, UnknownFamily};
pub use normalize::{parse_duration, str_int, try_parse_duration, try_str_int};
pub use schema::{Body, Envelope, ScalarWarning, Table, TableRow};
