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

//! Option registry: one descriptor per first-class option, declared in the
//! field order the canonical URL serializes, plus the alias table mapping
//! alternate spellings onto canonical names.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use crate::error::MariadbError;
use crate::Result;

use super::{Configuration, ConfigurationBuilder};

pub(crate) enum Setter {
    Str(fn(&mut ConfigurationBuilder, String)),
    Bool(fn(&mut ConfigurationBuilder, bool)),
    Int(fn(&mut ConfigurationBuilder, i32)),
}

pub(crate) enum Getter {
    Str(fn(&Configuration) -> Option<String>),
    Bool(fn(&Configuration) -> Option<bool>),
    Int(fn(&Configuration) -> Option<i32>),
}

pub(crate) struct OptionDef {
    pub(crate) name: &'static str,
    pub(crate) secret: bool,
    pub(crate) setter: Setter,
    pub(crate) getter: Getter,
}

impl OptionDef {
    /// Display value of this option on a resolved configuration; `None`
    /// when unset.
    pub(crate) fn display_value(&self, conf: &Configuration) -> Option<String> {
        match self.getter {
            Getter::Str(get) => get(conf),
            Getter::Bool(get) => get(conf).map(|v| v.to_string()),
            Getter::Int(get) => get(conf).map(|v| v.to_string()),
        }
    }
}

macro_rules! opt {
    (str $name:literal, $field:ident) => {
        OptionDef {
            name: $name,
            secret: false,
            setter: Setter::Str(|b, v| b.$field = Some(v)),
            getter: Getter::Str(|c| c.$field.clone()),
        }
    };
    (secret $name:literal, $field:ident) => {
        OptionDef {
            name: $name,
            secret: true,
            setter: Setter::Str(|b, v| b.$field = Some(v)),
            getter: Getter::Str(|c| c.$field.clone()),
        }
    };
    (bool $name:literal, $field:ident) => {
        OptionDef {
            name: $name,
            secret: false,
            setter: Setter::Bool(|b, v| b.$field = Some(v)),
            getter: Getter::Bool(|c| Some(c.$field)),
        }
    };
    (bool_opt $name:literal, $field:ident) => {
        OptionDef {
            name: $name,
            secret: false,
            setter: Setter::Bool(|b, v| b.$field = Some(v)),
            getter: Getter::Bool(|c| c.$field),
        }
    };
    (int $name:literal, $field:ident) => {
        OptionDef {
            name: $name,
            secret: false,
            setter: Setter::Int(|b, v| b.$field = Some(v)),
            getter: Getter::Int(|c| Some(c.$field)),
        }
    };
    (int_opt $name:literal, $field:ident) => {
        OptionDef {
            name: $name,
            secret: false,
            setter: Setter::Int(|b, v| b.$field = Some(v)),
            getter: Getter::Int(|c| c.$field),
        }
    };
}

/// Every first-class option, in canonical serialization order. `database`
/// is registered for coercion but serialized as the URL path segment, not
/// as a parameter.
static OPTIONS: &[OptionDef] = &[
    opt!(str "user", user),
    opt!(secret "password", password),
    opt!(str "database", database),
    opt!(str "timezone", timezone),
    opt!(str "connectionCollation", connection_collation),
    opt!(str "connectionTimeZone", connection_time_zone),
    opt!(bool_opt "forceConnectionTimeZoneToSession", force_connection_time_zone_to_session),
    opt!(bool "preserveInstants", preserve_instants),
    opt!(bool_opt "autocommit", autocommit),
    opt!(bool "useMysqlMetadata", use_mysql_metadata),
    opt!(bool "nullDatabaseMeansCurrent", null_database_means_current),
    OptionDef {
        name: "useCatalogTerm",
        secret: false,
        setter: Setter::Str(|b, v| b.use_catalog_term = Some(v)),
        getter: Getter::Str(|c| Some(c.use_catalog_term.name().to_string())),
    },
    opt!(bool "createDatabaseIfNotExist", create_database_if_not_exist),
    opt!(bool "useLocalSessionState", use_local_session_state),
    opt!(bool "returnMultiValuesGeneratedIds", return_multi_values_generated_ids),
    opt!(bool "jdbcCompliantTruncation", jdbc_compliant_truncation),
    opt!(bool "permitRedirect", permit_redirect),
    OptionDef {
        name: "transactionIsolation",
        secret: false,
        setter: Setter::Str(|b, v| b.transaction_isolation = Some(v)),
        getter: Getter::Str(|c| c.transaction_isolation.map(|v| v.name().to_string())),
    },
    opt!(int "defaultFetchSize", default_fetch_size),
    opt!(int "maxQuerySizeToLog", max_query_size_to_log),
    opt!(int_opt "maxAllowedPacket", max_allowed_packet),
    opt!(str "geometryDefaultType", geometry_default_type),
    opt!(str "restrictedAuth", restricted_auth),
    opt!(str "initSql", init_sql),
    opt!(bool "pinGlobalTxToPhysicalConnection", pin_global_tx_to_physical_connection),
    opt!(str "socketFactory", socket_factory),
    opt!(int "connectTimeout", connect_timeout),
    opt!(str "pipe", pipe),
    opt!(str "localSocket", local_socket),
    opt!(bool "uuidAsString", uuid_as_string),
    opt!(bool "tcpKeepAlive", tcp_keep_alive),
    opt!(int "tcpKeepIdle", tcp_keep_idle),
    opt!(int "tcpKeepCount", tcp_keep_count),
    opt!(int "tcpKeepInterval", tcp_keep_interval),
    opt!(bool "tcpAbortiveClose", tcp_abortive_close),
    opt!(str "localSocketAddress", local_socket_address),
    opt!(int "socketTimeout", socket_timeout),
    opt!(bool "useReadAheadInput", use_read_ahead_input),
    opt!(str "tlsSocketType", tls_socket_type),
    OptionDef {
        name: "sslMode",
        secret: false,
        setter: Setter::Str(|b, v| b.ssl_mode = Some(v)),
        getter: Getter::Str(|c| Some(c.ssl_mode.name().to_string())),
    },
    opt!(str "serverSslCert", server_ssl_cert),
    opt!(str "keyStore", key_store),
    opt!(str "trustStore", trust_store),
    opt!(secret "keyStorePassword", key_store_password),
    opt!(secret "trustStorePassword", trust_store_password),
    opt!(secret "keyPassword", key_password),
    opt!(str "keyStoreType", key_store_type),
    opt!(str "trustStoreType", trust_store_type),
    opt!(str "enabledSslCipherSuites", enabled_ssl_cipher_suites),
    opt!(str "enabledSslProtocolSuites", enabled_ssl_protocol_suites),
    opt!(bool "fallbackToSystemKeyStore", fallback_to_system_key_store),
    opt!(bool "fallbackToSystemTrustStore", fallback_to_system_trust_store),
    opt!(bool "allowMultiQueries", allow_multi_queries),
    opt!(bool "allowLocalInfile", allow_local_infile),
    opt!(bool "useCompression", use_compression),
    opt!(bool "useAffectedRows", use_affected_rows),
    opt!(bool "useBulkStmts", use_bulk_stmts),
    opt!(bool "useBulkStmtsForInserts", use_bulk_stmts_for_inserts),
    opt!(bool "disablePipeline", disable_pipeline),
    opt!(bool "cachePrepStmts", cache_prep_stmts),
    opt!(int "prepStmtCacheSize", prep_stmt_cache_size),
    opt!(bool "useServerPrepStmts", use_server_prep_stmts),
    OptionDef {
        name: "credentialType",
        secret: false,
        setter: Setter::Str(|b, v| b.credential_type = Some(v)),
        getter: Getter::Str(|c| c.credential_type.map(|p| p.type_name().to_string())),
    },
    opt!(str "sessionVariables", session_variables),
    opt!(str "connectionAttributes", connection_attributes),
    opt!(str "servicePrincipalName", service_principal_name),
    opt!(bool "blankTableNameMeta", blank_table_name_meta),
    opt!(bool "tinyInt1isBit", tiny_int1_is_bit),
    opt!(bool "transformedBitIsBoolean", transformed_bit_is_boolean),
    opt!(bool "yearIsDateType", year_is_date_type),
    opt!(bool "dumpQueriesOnException", dump_queries_on_exception),
    opt!(bool "includeInnodbStatusInDeadlockExceptions", include_innodb_status_in_deadlock_exceptions),
    opt!(bool "includeThreadDumpInDeadlockExceptions", include_thread_dump_in_deadlock_exceptions),
    opt!(int "retriesAllDown", retries_all_down),
    opt!(str "galeraAllowedState", galera_allowed_state),
    opt!(bool "transactionReplay", transaction_replay),
    opt!(int "transactionReplaySize", transaction_replay_size),
    opt!(bool "pool", pool),
    opt!(str "poolName", pool_name),
    opt!(int "maxPoolSize", max_pool_size),
    opt!(int "minPoolSize", min_pool_size),
    opt!(int "maxIdleTime", max_idle_time),
    opt!(bool "registerJmxPool", register_jmx_pool),
    opt!(int "poolValidMinDelay", pool_valid_min_delay),
    opt!(bool "useResetConnection", use_reset_connection),
    opt!(str "serverRsaPublicKeyFile", server_rsa_public_key_file),
    opt!(bool "allowPublicKeyRetrieval", allow_public_key_retrieval),
];

/// Alternate option spellings (lower-cased) and their canonical names.
static ALIASES: &[(&str, &str)] = &[
    ("enabledsslciphersuites", "enabledSslCipherSuites"),
    ("enabledsslprotocolsuites", "enabledSslProtocolSuites"),
    ("servertimezone", "timezone"),
    ("nullcatalogmeanscurrent", "nullDatabaseMeansCurrent"),
    ("clientcertificatekeystoreurl", "keyStore"),
    ("clientcertificatekeystorepassword", "keyStorePassword"),
    ("clientcertificatekeystoretype", "keyStoreType"),
    ("trustcertificatekeystoreurl", "trustStore"),
    ("trustcertificatekeystorepassword", "trustStorePassword"),
    ("trustcertificatekeystoretype", "trustStoreType"),
];

pub(crate) fn option_defs() -> &'static [OptionDef] {
    OPTIONS
}

fn option_index() -> &'static HashMap<String, &'static OptionDef> {
    static INDEX: OnceLock<HashMap<String, &'static OptionDef>> = OnceLock::new();
    INDEX.get_or_init(|| {
        OPTIONS
            .iter()
            .map(|def| (def.name.to_lowercase(), def))
            .collect()
    })
}

/// Coerce every property onto the builder: resolve aliases, match option
/// names case-insensitively, parse values by declared kind, keep unknown
/// keys verbatim, and apply the deprecated `useSsl` compatibility shim.
pub(crate) fn apply_properties(
    builder: &mut ConfigurationBuilder,
    properties: BTreeMap<String, String>,
) -> Result<()> {
    let index = option_index();
    for (key, value) in properties {
        let lower = key.to_lowercase();
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, canonical)| *canonical);
        let (retained_key, def) = match canonical {
            Some(canonical) => (
                canonical.to_string(),
                index.get(canonical.to_lowercase().as_str()).copied(),
            ),
            None => (key.clone(), index.get(lower.as_str()).copied()),
        };
        match def {
            Some(def) => apply_value(builder, def, &key, &value)?,
            None => {
                builder.non_mapped_options.insert(retained_key, value);
            }
        }
    }
    apply_legacy_ssl(builder);
    Ok(())
}

fn apply_value(
    builder: &mut ConfigurationBuilder,
    def: &OptionDef,
    key: &str,
    value: &str,
) -> Result<()> {
    match def.setter {
        Setter::Str(set) => {
            // an empty string is treated as absent
            if !value.is_empty() {
                set(builder, value.to_string());
            }
        }
        Setter::Bool(set) => match value.to_lowercase().as_str() {
            "" | "1" | "true" => set(builder, true),
            "0" | "false" => set(builder, false),
            _ => {
                return Err(MariadbError::OptionType {
                    key: key.to_string(),
                    value: value.to_string(),
                    expected: "boolean (true/false or 0/1)",
                })
            }
        },
        Setter::Int(set) => match value.parse::<i32>() {
            Ok(parsed) => set(builder, parsed),
            Err(_) => {
                return Err(MariadbError::OptionType {
                    key: key.to_string(),
                    value: value.to_string(),
                    expected: "Integer",
                })
            }
        },
    }
    Ok(())
}

fn is_set(key: &str, bag: &BTreeMap<String, String>) -> bool {
    matches!(
        bag.get(key).map(String::as_str),
        Some("") | Some("1") | Some("true")
    )
}

/// Compatibility with 2.x connection strings: a truthy deprecated `useSsl`
/// escalates the SSL mode. Fires only for keys that fell into the
/// non-mapped bag, warns, and leaves the deprecated keys visible there.
fn apply_legacy_ssl(builder: &mut ConfigurationBuilder) {
    if !is_set("useSsl", &builder.non_mapped_options)
        && !is_set("useSSL", &builder.non_mapped_options)
    {
        return;
    }
    log::warn!("option 'useSsl' is deprecated, use 'sslMode' instead");
    if is_set("trustServerCertificate", &builder.non_mapped_options) {
        log::warn!("option 'trustServerCertificate' is deprecated, use 'sslMode=trust' instead");
        builder.ssl_mode = Some("trust".into());
    } else if is_set("disableSslHostnameVerification", &builder.non_mapped_options) {
        log::warn!(
            "option 'disableSslHostnameVerification' is deprecated, use 'sslMode=verify-ca' instead"
        );
        builder.ssl_mode = Some("verify-ca".into());
    } else {
        builder.ssl_mode = Some("verify-full".into());
    }
}

/// Generic invariant over every integer-kind option: values must be >= 0.
pub(crate) fn check_non_negative(conf: &Configuration) -> Result<()> {
    for def in OPTIONS {
        if let Getter::Int(get) = def.getter {
            if let Some(value) = get(conf) {
                if value < 0 {
                    return Err(MariadbError::invalid_config(format!(
                        "value for {} must be >= 0 (value is {})",
                        def.name, value
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_no_duplicate_names() {
        let mut names: Vec<_> = OPTIONS.iter().map(|def| def.name.to_lowercase()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), OPTIONS.len());
    }

    #[test]
    fn test_every_alias_targets_a_registered_option() {
        for (alias, canonical) in ALIASES {
            assert!(
                option_index().contains_key(canonical.to_lowercase().as_str()),
                "alias '{}' targets unknown option '{}'",
                alias,
                canonical
            );
        }
    }

    #[test]
    fn test_secret_set() {
        let secrets: Vec<_> = OPTIONS
            .iter()
            .filter(|def| def.secret)
            .map(|def| def.name)
            .collect();
        assert_eq!(
            secrets,
            ["password", "keyStorePassword", "trustStorePassword", "keyPassword"]
        );
    }

    #[test]
    fn test_setters_and_getters_are_paired_by_kind() {
        for def in OPTIONS {
            let paired = matches!(
                (&def.setter, &def.getter),
                (Setter::Str(_), Getter::Str(_))
                    | (Setter::Bool(_), Getter::Bool(_))
                    | (Setter::Int(_), Getter::Int(_))
            );
            assert!(paired, "kind mismatch for option '{}'", def.name);
        }
    }
}
