// Copyright the mariadb-rust authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::{Display, Formatter};

use crate::config::{HaMode, SslMode};
use crate::error::MariadbError;
use crate::Result;

pub(crate) const DEFAULT_PORT: u16 = 3306;

/// One entry of the resolved host list.
///
/// An address is either a TCP endpoint (`host` + `port`), a unix socket
/// path, or a windows named pipe. The `primary` role is left unassigned by
/// the parser and filled in during configuration build; it is never `None`
/// on an address reachable through a built [`Configuration`].
///
/// [`Configuration`]: crate::Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAddress {
    pub(crate) host: Option<String>,
    pub(crate) port: u16,
    pub(crate) primary: Option<bool>,
    pub(crate) ssl_mode: Option<SslMode>,
    pub(crate) local_socket: Option<String>,
    pub(crate) pipe: Option<String>,
}

impl HostAddress {
    /// Create a TCP address with an unassigned role.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: Some(host.into()),
            port,
            primary: None,
            ssl_mode: None,
            local_socket: None,
            pipe: None,
        }
    }

    /// Create a TCP address with an explicit primary/replica role.
    pub fn with_role(host: impl Into<String>, port: u16, primary: bool) -> Self {
        Self {
            primary: Some(primary),
            ..Self::new(host, port)
        }
    }

    /// Create a unix-socket pseudo-address.
    pub fn local_socket(path: impl Into<String>) -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            primary: Some(true),
            ssl_mode: None,
            local_socket: Some(path.into()),
            pipe: None,
        }
    }

    /// Create a named-pipe pseudo-address.
    pub fn pipe(path: impl Into<String>) -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            primary: Some(true),
            ssl_mode: None,
            local_socket: None,
            pipe: Some(path.into()),
        }
    }

    /// Copy of this address with the given unix-socket path attached,
    /// unless one is already set.
    pub(crate) fn with_local_socket(&self, path: &str) -> Self {
        let mut copy = self.clone();
        if copy.local_socket.is_none() {
            copy.local_socket = Some(path.into());
        }
        copy
    }

    /// Copy of this address with the given pipe path attached, unless one
    /// is already set.
    pub(crate) fn with_pipe(&self, path: &str) -> Self {
        let mut copy = self.clone();
        if copy.pipe.is_none() {
            copy.pipe = Some(path.into());
        }
        copy
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Role of this address. Defaults to primary when the resolution pass
    /// has not run (a bare address created through [`HostAddress::new`]).
    pub fn is_primary(&self) -> bool {
        self.primary.unwrap_or(true)
    }

    /// Per-host SSL-mode override, taking precedence over the
    /// configuration-wide mode.
    pub fn ssl_mode(&self) -> Option<SslMode> {
        self.ssl_mode
    }

    pub fn local_socket_path(&self) -> Option<&str> {
        self.local_socket.as_deref()
    }

    pub fn pipe_path(&self) -> Option<&str> {
        self.pipe.as_deref()
    }
}

impl Display for HostAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("address=")?;
        if let Some(host) = &self.host {
            write!(f, "(host={})(port={})", host, self.port)?;
        }
        if let Some(socket) = &self.local_socket {
            write!(f, "(localSocket={})", socket)?;
        }
        if let Some(pipe) = &self.pipe {
            write!(f, "(pipe={})", pipe)?;
        }
        if let Some(primary) = self.primary {
            write!(f, "(type={})", if primary { "primary" } else { "replica" })?;
        }
        if let Some(ssl_mode) = self.ssl_mode {
            write!(f, "(sslMode={})", ssl_mode)?;
        }
        Ok(())
    }
}

/// Parse a comma-separated host-address segment.
///
/// Each entry is either `host[:port]` (IPv6 hosts in brackets) or a
/// parenthesized descriptor list `address=(key=value)...`. An empty
/// segment yields an empty list; the build pass substitutes a local
/// transport address when one is configured.
pub(crate) fn parse_host_list(segment: &str, ha_mode: HaMode) -> Result<Vec<HostAddress>> {
    if segment.is_empty() {
        return Ok(Vec::new());
    }
    let mut addresses = Vec::new();
    for entry in segment.split(',').filter(|entry| !entry.is_empty()) {
        if entry.to_ascii_lowercase().starts_with("address=") {
            addresses.push(parse_descriptor(entry)?);
        } else {
            addresses.push(parse_simple(entry)?);
        }
    }
    resolve_roles(&mut addresses, ha_mode);
    Ok(addresses)
}

/// Assign the positional role to every entry that carries no explicit one:
/// first entry is primary; the rest are replicas in replication mode and
/// primaries otherwise.
pub(crate) fn resolve_roles(addresses: &mut [HostAddress], ha_mode: HaMode) {
    let mut first = true;
    for address in addresses.iter_mut() {
        let primary = ha_mode != HaMode::Replication || first;
        if address.primary.is_none() {
            address.primary = Some(primary);
        }
        first = false;
    }
}

fn parse_simple(entry: &str) -> Result<HostAddress> {
    let (host, port) = if let Some(rest) = entry.strip_prefix('[') {
        // IPv6, bracketed
        let closing = rest.find(']').ok_or_else(|| {
            MariadbError::url_format(format!("missing ']' in IPv6 host '{}'", entry))
        })?;
        let host = &rest[..closing];
        match rest[closing + 1..].strip_prefix(':') {
            Some(port) => (host, Some(port)),
            None if rest[closing + 1..].is_empty() => (host, None),
            None => {
                return Err(MariadbError::url_format(format!(
                    "invalid host '{}'",
                    entry
                )))
            }
        }
    } else {
        match entry.find(':') {
            Some(colon) => (&entry[..colon], Some(&entry[colon + 1..])),
            None => (entry, None),
        }
    };
    let port = match port {
        Some(port) => port.parse().map_err(|_| {
            MariadbError::url_format(format!("invalid port '{}' in host '{}'", port, entry))
        })?,
        None => DEFAULT_PORT,
    };
    Ok(HostAddress::new(host, port))
}

fn parse_descriptor(entry: &str) -> Result<HostAddress> {
    let mut rest = &entry[entry.find('=').map(|p| p + 1).unwrap_or(0)..];
    let mut host = None;
    let mut port = DEFAULT_PORT;
    let mut primary = None;
    let mut ssl_mode = None;
    let mut local_socket = None;
    let mut pipe = None;

    while !rest.is_empty() {
        let inner = rest.strip_prefix('(').ok_or_else(|| {
            MariadbError::url_format(format!("invalid host descriptor '{}'", entry))
        })?;
        let closing = inner.find(')').ok_or_else(|| {
            MariadbError::url_format(format!("missing ')' in host descriptor '{}'", entry))
        })?;
        let group = &inner[..closing];
        rest = &inner[closing + 1..];

        let (key, value) = group.split_once('=').ok_or_else(|| {
            MariadbError::url_format(format!(
                "invalid key=value pair '{}' in host descriptor '{}'",
                group, entry
            ))
        })?;
        let (key, value) = (key.trim(), value.trim());
        match key.to_ascii_lowercase().as_str() {
            "host" => host = Some(value.trim_matches(|c| c == '[' || c == ']').to_string()),
            "port" => {
                port = value.parse().map_err(|_| {
                    MariadbError::url_format(format!(
                        "invalid port '{}' in host descriptor '{}'",
                        value, entry
                    ))
                })?
            }
            "type" => match value.to_ascii_lowercase().as_str() {
                "master" | "primary" => primary = Some(true),
                "slave" | "replica" => primary = Some(false),
                _ => {
                    return Err(MariadbError::url_format(format!(
                        "wrong type value '{}' in host descriptor '{}' (possible values primary/replica)",
                        value, entry
                    )))
                }
            },
            "sslmode" => ssl_mode = Some(SslMode::from_value(value)?),
            "localsocket" => local_socket = Some(value.to_string()),
            "pipe" => pipe = Some(value.to_string()),
            _ => {
                return Err(MariadbError::url_format(format!(
                    "invalid parameter '{}' in host descriptor '{}'",
                    key, entry
                )))
            }
        }
    }

    if host.is_none() && local_socket.is_none() && pipe.is_none() {
        return Err(MariadbError::url_format(format!(
            "host descriptor '{}' declares no host, localSocket or pipe",
            entry
        )));
    }
    Ok(HostAddress {
        host,
        port,
        primary,
        ssl_mode,
        local_socket,
        pipe,
    })
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case("localhost", "localhost", 3306)]
    #[case("localhost:3307", "localhost", 3307)]
    #[case("example.com:1337", "example.com", 1337)]
    #[case("127.0.0.1", "127.0.0.1", 3306)]
    #[case("[2001:660:7401:200::edf:bdd7]", "2001:660:7401:200::edf:bdd7", 3306)]
    #[case("[::1]:3307", "::1", 3307)]
    fn test_simple_host(#[case] entry: &str, #[case] host: &str, #[case] port: u16) {
        let parsed = parse_simple(entry).unwrap();
        assert_eq!(parsed.host(), Some(host));
        assert_eq!(parsed.port(), port);
        assert_eq!(parsed.primary, None);
    }

    #[rstest]
    #[case("localhost:abc")]
    #[case("localhost:")]
    #[case("[::1]:99999")]
    #[case("[::1")]
    fn test_invalid_simple_host(#[case] entry: &str) {
        assert!(parse_simple(entry).is_err());
    }

    #[rstest]
    #[case("address=(host=h1)", Some("h1"), 3306, None)]
    #[case("address=(host=h1)(port=3307)", Some("h1"), 3307, None)]
    #[case("address=(type=replica)(port=3307)(host=h2)", Some("h2"), 3307, Some(false))]
    #[case("address=(host=h1)(type=master)", Some("h1"), 3306, Some(true))]
    #[case("address=(host=h1)(type=primary)", Some("h1"), 3306, Some(true))]
    #[case("address=(host=h1)(type=slave)", Some("h1"), 3306, Some(false))]
    #[case("address=(host=[::1])(port=3307)", Some("::1"), 3307, None)]
    fn test_descriptor_host(
        #[case] entry: &str,
        #[case] host: Option<&str>,
        #[case] port: u16,
        #[case] primary: Option<bool>,
    ) {
        let parsed = parse_descriptor(entry).unwrap();
        assert_eq!(parsed.host(), host);
        assert_eq!(parsed.port(), port);
        assert_eq!(parsed.primary, primary);
    }

    #[rstest]
    #[case("address=(host=h1)(type=backup)")]
    #[case("address=(host=h1)(weight=2)")]
    #[case("address=(host=h1")]
    #[case("address=(host)")]
    #[case("address=(port=3307)")]
    fn test_invalid_descriptor(#[case] entry: &str) {
        assert!(parse_descriptor(entry).is_err());
    }

    #[test]
    fn test_descriptor_ssl_mode_override() {
        let parsed = parse_descriptor("address=(host=h1)(sslMode=verify-full)").unwrap();
        assert_eq!(parsed.ssl_mode(), Some(SslMode::VerifyFull));
    }

    #[rstest]
    #[case(HaMode::None, &[None, None], &[true, true])]
    #[case(HaMode::Loadbalance, &[None, None], &[true, true])]
    #[case(HaMode::Replication, &[None, None, None], &[true, false, false])]
    #[case(HaMode::Replication, &[Some(true), Some(true)], &[true, true])]
    #[case(HaMode::None, &[Some(false), None], &[false, true])]
    fn test_role_resolution(
        #[case] ha_mode: HaMode,
        #[case] explicit: &[Option<bool>],
        #[case] expected: &[bool],
    ) {
        let mut addresses: Vec<_> = explicit
            .iter()
            .enumerate()
            .map(|(i, primary)| HostAddress {
                primary: *primary,
                ..HostAddress::new(format!("host{}", i), DEFAULT_PORT)
            })
            .collect();
        resolve_roles(&mut addresses, ha_mode);
        let roles: Vec<_> = addresses.iter().map(|a| a.is_primary()).collect();
        assert_eq!(roles, expected);
    }

    #[test]
    fn test_host_list_mixed_forms() {
        let addresses = parse_host_list(
            "host1,address=(type=replica)(port=3307)(host=host2)",
            HaMode::None,
        )
        .unwrap();
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[0].host(), Some("host1"));
        assert_eq!(addresses[0].port(), 3306);
        assert!(addresses[0].is_primary());
        assert_eq!(addresses[1].host(), Some("host2"));
        assert_eq!(addresses[1].port(), 3307);
        assert!(!addresses[1].is_primary());
    }

    #[test]
    fn test_display_round_trips_through_descriptor_parse() {
        let address = HostAddress {
            host: Some("replica1".into()),
            port: 3310,
            primary: Some(false),
            ssl_mode: Some(SslMode::Trust),
            local_socket: None,
            pipe: None,
        };
        let rendered = address.to_string();
        assert_eq!(rendered, "address=(host=replica1)(port=3310)(type=replica)(sslMode=TRUST)");
        assert_eq!(parse_descriptor(&rendered).unwrap(), address);
    }

    #[test]
    fn test_local_socket_propagation() {
        let address = HostAddress::new("localhost", 3306).with_local_socket("/tmp/mysql.sock");
        assert_eq!(address.local_socket_path(), Some("/tmp/mysql.sock"));
        // an explicit path is not overwritten
        let address = address.with_local_socket("/other.sock");
        assert_eq!(address.local_socket_path(), Some("/tmp/mysql.sock"));
    }
}
