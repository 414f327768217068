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

//! Canonical URL serialization and the diagnostic configuration dump.

use std::fmt::Write;

use itertools::Itertools;

use crate::address::HostAddress;
use crate::Result;

use super::{options, Configuration, HaMode};

const REDACTED: &str = "***";

/// Serialize a resolved configuration back into its canonical URL:
/// deterministic, default-omitting, secret-redacting. The result is the
/// configuration's identity key.
pub(crate) fn build_url(conf: &Configuration) -> String {
    let mut url = String::from("jdbc:mariadb:");
    if conf.ha_mode != HaMode::None {
        url.push_str(conf.ha_mode.url_token());
        url.push(':');
    }
    url.push_str("//");
    for (index, address) in conf.addresses.iter().enumerate() {
        if index > 0 {
            url.push(',');
        }
        append_host_address(&mut url, conf, address, index);
    }
    url.push('/');
    if let Some(database) = &conf.database {
        url.push_str(database);
    }
    append_parameters(&mut url, conf);
    url
}

/// The short `host[:port]` form only serializes addresses whose role is
/// the positional default of the HA mode; everything else keeps the full
/// descriptor form so the role survives a re-parse.
fn use_simple_format(conf: &Configuration, address: &HostAddress, index: usize) -> bool {
    if address.host.is_none() || address.ssl_mode.is_some() {
        return false;
    }
    let primary = address.is_primary();
    (conf.ha_mode == HaMode::None && primary)
        || (conf.ha_mode == HaMode::Replication
            && ((index == 0 && primary) || (index != 0 && !primary)))
}

fn append_host_address(
    url: &mut String,
    conf: &Configuration,
    address: &HostAddress,
    index: usize,
) {
    if use_simple_format(conf, address, index) {
        url.push_str(address.host.as_deref().unwrap_or_default());
        if address.port != 3306 {
            let _ = write!(url, ":{}", address.port);
        }
    } else {
        let _ = write!(url, "{}", address);
    }
}

struct ParameterAppender<'a> {
    url: &'a mut String,
    first: bool,
}

impl<'a> ParameterAppender<'a> {
    fn new(url: &'a mut String) -> Self {
        Self { url, first: true }
    }

    fn append(&mut self, name: &str, value: &str) {
        self.url.push(if self.first { '?' } else { '&' });
        self.url.push_str(name);
        self.url.push('=');
        self.url.push_str(value);
        self.first = false;
    }
}

fn append_parameters(url: &mut String, conf: &Configuration) {
    let defaults = Configuration::bare_defaults();
    let mut appender = ParameterAppender::new(url);
    for def in options::option_defs() {
        // the database is the path segment; the non-mapped bag sits at its
        // declared position in the field order
        if def.name == "database" {
            for (key, value) in &conf.non_mapped_options {
                appender.append(key, value);
            }
            continue;
        }
        let Some(value) = def.display_value(conf) else {
            continue;
        };
        if def.secret {
            appender.append(def.name, REDACTED);
        } else if def.display_value(&defaults).as_deref() != Some(value.as_str()) {
            appender.append(def.name, &value);
        }
    }
}

/// Describe how a connection string resolves: the canonical URL, unknown
/// options, and first-class options split into non-default and default,
/// each list alphabetical and secret-redacted.
pub(crate) fn to_conf(url: &str) -> Result<String> {
    let conf = Configuration::parse(url)?;
    let default_conf = Configuration::parse("jdbc:mariadb://localhost/")?;

    let mut result = format!("Configuration:\n * resulting Url : {}", conf.initial_url);

    result.push_str("\nUnknown options : ");
    if conf.non_mapped_options.is_empty() {
        result.push_str("None\n");
    } else {
        for (key, value) in &conf.non_mapped_options {
            let _ = write!(result, "\n * {} : {}", key, value);
        }
        result.push('\n');
    }

    let mut diff_opts = String::new();
    let mut default_opts = String::new();
    for (name, value, is_default) in dump_entries(&conf, &default_conf) {
        let target = if is_default {
            &mut default_opts
        } else {
            &mut diff_opts
        };
        let _ = write!(target, "\n * {} : {}", name, value);
    }

    result.push_str("\nNon default options : ");
    if diff_opts.is_empty() {
        result.push_str("None\n");
    } else {
        result.push_str(&diff_opts);
    }

    result.push_str("\n\ndefault options :");
    if default_opts.is_empty() {
        result.push_str("None\n");
    } else {
        result.push_str(&default_opts);
    }

    Ok(result)
}

/// (name, display value, equals-default) for every dumped field, sorted by
/// name. Secrets are redacted after the default comparison.
fn dump_entries(
    conf: &Configuration,
    default_conf: &Configuration,
) -> Vec<(String, String, bool)> {
    let mut entries: Vec<(String, String, bool)> = options::option_defs()
        .iter()
        .map(|def| {
            let value = def.display_value(conf);
            let default_value = def.display_value(default_conf);
            let is_default = value == default_value;
            let display = match value {
                Some(_) if def.secret => REDACTED.to_string(),
                Some(value) => value,
                None => "null".to_string(),
            };
            (def.name.to_string(), display, is_default)
        })
        .collect();

    let addresses = format_addresses(conf);
    entries.push((
        "addresses".to_string(),
        addresses.clone(),
        addresses == format_addresses(default_conf),
    ));
    entries.push((
        "haMode".to_string(),
        conf.ha_mode.to_string(),
        conf.ha_mode == default_conf.ha_mode,
    ));

    entries.sort();
    entries
}

fn format_addresses(conf: &Configuration) -> String {
    format!("[{}]", conf.addresses.iter().join(", "))
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    fn canonical(url: &str) -> String {
        Configuration::parse(url).unwrap().initial_url().to_string()
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/test", "jdbc:mariadb://localhost/test")]
    #[case("jdbc:mariadb://localhost:3306/test", "jdbc:mariadb://localhost/test")]
    #[case("jdbc:mariadb://localhost:3307/test", "jdbc:mariadb://localhost:3307/test")]
    #[case("jdbc:mariadb://localhost/", "jdbc:mariadb://localhost/")]
    #[case(
        "jdbc:mariadb://localhost/test?user=greg&password=pass",
        "jdbc:mariadb://localhost/test?user=greg&password=***"
    )]
    #[case(
        "jdbc:mariadb:failover://h1,h2/test",
        "jdbc:mariadb:loadbalance://address=(host=h1)(port=3306)(type=primary),address=(host=h2)(port=3306)(type=primary)/test"
    )]
    #[case(
        "jdbc:mariadb:replication://h1,h2:3310/db",
        "jdbc:mariadb:replication://h1,h2:3310/db"
    )]
    #[case(
        "jdbc:mariadb://host1,address=(type=replica)(port=3307)(host=host2)/db",
        "jdbc:mariadb://host1,address=(host=host2)(port=3307)(type=replica)/db"
    )]
    fn test_canonical_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(canonical(url), expected);
    }

    #[test]
    fn test_default_options_are_omitted() {
        // tcpKeepAlive=true and sslMode=disable are the defaults
        let url = canonical(
            "jdbc:mariadb://localhost/test?tcpKeepAlive=true&sslMode=disable&socketTimeout=0",
        );
        assert_eq!(url, "jdbc:mariadb://localhost/test");
    }

    #[test]
    fn test_non_default_options_are_serialized_in_field_order() {
        let url = canonical(
            "jdbc:mariadb://localhost/test?maxPoolSize=3&socketTimeout=5000&user=app",
        );
        assert_eq!(
            url,
            "jdbc:mariadb://localhost/test?user=app&socketTimeout=5000&maxPoolSize=3&minPoolSize=3"
        );
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/test?password=secret123")]
    #[case("jdbc:mariadb://localhost/test?keyStorePassword=secret123")]
    #[case("jdbc:mariadb://localhost/test?trustStorePassword=secret123")]
    #[case("jdbc:mariadb://localhost/test?keyPassword=secret123")]
    fn test_secrets_never_leak(#[case] url: &str) {
        let conf = Configuration::parse(url).unwrap();
        assert!(!conf.initial_url().contains("secret123"));
        assert!(conf.initial_url().contains(REDACTED));
        let dump = Configuration::to_conf(url).unwrap();
        assert!(!dump.contains("secret123"));
        assert!(dump.contains(REDACTED));
    }

    #[test]
    fn test_unknown_options_are_appended() {
        let url = canonical("jdbc:mariadb://localhost/test?aaa=1&zzz=2&user=app");
        assert_eq!(url, "jdbc:mariadb://localhost/test?user=app&aaa=1&zzz=2");
    }

    #[test]
    fn test_local_socket_pseudo_address_serializes_in_descriptor_form() {
        let conf = Configuration::builder()
            .with_local_socket("/tmp/m.sock")
            .build()
            .unwrap();
        assert!(conf
            .initial_url()
            .starts_with("jdbc:mariadb://address=(localSocket=/tmp/m.sock)(type=primary)/"));
    }

    #[test]
    fn test_to_conf_sections() {
        let dump =
            Configuration::to_conf("jdbc:mariadb://localhost/test?user=app&custom=1").unwrap();
        assert!(dump.starts_with("Configuration:\n * resulting Url : jdbc:mariadb://localhost"));
        assert!(dump.contains("Unknown options : \n * custom : 1"));
        assert!(dump.contains("Non default options : "));
        assert!(dump.contains("\n * user : app"));
        assert!(dump.contains("\ndefault options :"));
        assert!(dump.contains("\n * tcpKeepAlive : true"));
    }

    #[test]
    fn test_to_conf_no_unknown_options() {
        let dump = Configuration::to_conf("jdbc:mariadb://localhost/test").unwrap();
        assert!(dump.contains("Unknown options : None\n"));
    }
}
