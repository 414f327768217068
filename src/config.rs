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

pub(crate) mod options;
pub(crate) mod url;

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::address::{self, HostAddress};
use crate::error::MariadbError;
use crate::plugin::{self, codec, codec::Codec, CredentialPlugin};
use crate::Result;

pub(crate) const DEFAULT_CONNECT_TIMEOUT: i32 = 30_000;

/// High-availability topology declared by the connection string prefix.
///
/// Drives how primary/replica roles are assigned to the host list and which
/// prefix the canonical URL carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HaMode {
    /// Single host, no replicas.
    #[default]
    None,
    /// Hosts are tried in order until one connects.
    Sequential,
    /// Connections are spread over the host list.
    Loadbalance,
    /// First host is the primary, the others are replicas.
    Replication,
}

impl HaMode {
    pub fn from_value(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "NONE" => Some(Self::None),
            "SEQUENTIAL" => Some(Self::Sequential),
            "LOADBALANCE" => Some(Self::Loadbalance),
            "REPLICATION" => Some(Self::Replication),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Sequential => "SEQUENTIAL",
            Self::Loadbalance => "LOADBALANCE",
            Self::Replication => "REPLICATION",
        }
    }

    /// Lower-case token used as canonical URL prefix.
    pub(crate) fn url_token(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sequential => "sequential",
            Self::Loadbalance => "loadbalance",
            Self::Replication => "replication",
        }
    }
}

impl Display for HaMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// TLS requirement and server-certificate verification level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SslMode {
    /// Plain transport.
    #[default]
    Disable,
    /// Encrypt, trusting any server certificate.
    Trust,
    /// Encrypt, verify the certificate chain but not the host name.
    VerifyCa,
    /// Encrypt with full certificate and host-name verification.
    VerifyFull,
}

impl SslMode {
    pub fn from_value(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "disable" | "disabled" | "0" | "false" => Ok(Self::Disable),
            "trust" | "required" | "1" | "true" => Ok(Self::Trust),
            "verify-ca" | "verify_ca" => Ok(Self::VerifyCa),
            "verify-full" | "verify_full" | "verify_identity" => Ok(Self::VerifyFull),
            _ => Err(MariadbError::url_format(format!(
                "wrong argument value '{}' for SslMode",
                value
            ))),
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Disable => "DISABLE",
            Self::Trust => "TRUST",
            Self::VerifyCa => "VERIFY_CA",
            Self::VerifyFull => "VERIFY_FULL",
        }
    }
}

impl Display for SslMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Isolation level requested for new connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionIsolation {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl TransactionIsolation {
    pub fn from_value(value: &str) -> Result<Self> {
        match value.to_ascii_uppercase().as_str() {
            "READ-UNCOMMITTED" | "READ_UNCOMMITTED" => Ok(Self::ReadUncommitted),
            "READ-COMMITTED" | "READ_COMMITTED" => Ok(Self::ReadCommitted),
            "REPEATABLE-READ" | "REPEATABLE_READ" => Ok(Self::RepeatableRead),
            "SERIALIZABLE" => Ok(Self::Serializable),
            _ => Err(MariadbError::url_format(format!(
                "wrong argument value '{}' for TransactionIsolation",
                value
            ))),
        }
    }

    /// SQL literal, as used in `SET SESSION TRANSACTION ISOLATION LEVEL`.
    pub fn value(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ-UNCOMMITTED",
            Self::ReadCommitted => "READ-COMMITTED",
            Self::RepeatableRead => "REPEATABLE-READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ_UNCOMMITTED",
            Self::ReadCommitted => "READ_COMMITTED",
            Self::RepeatableRead => "REPEATABLE_READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

impl Display for TransactionIsolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether metadata "catalog" operations address catalogs or schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CatalogTerm {
    #[default]
    UseCatalog,
    UseSchema,
}

impl CatalogTerm {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::UseCatalog => "CATALOG",
            Self::UseSchema => "SCHEMA",
        }
    }
}

impl Display for CatalogTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable, fully-resolved connection configuration.
///
/// Built from a connection string (see [`Configuration::parse`]) or
/// programmatically through [`ConfigurationBuilder`]. Once built, a
/// configuration never changes; deriving a variant goes through
/// [`Configuration::to_builder`] and a fresh build.
///
/// ## From a URL
/// ```text
/// jdbc:mariadb:[sequential:|loadbalance:|replication:]//<hostDescription>[,<hostDescription>...]/[database]
/// [?<key1>=<value1>[&<key2>=<value2>]]
/// ```
/// A host description is either `host[:port]` (IPv6 addresses in brackets)
/// or a parenthesized descriptor list such as
/// `address=(host=master1)(port=3307)(type=primary)`.
///
/// ```
/// use mariadb::Configuration;
///
/// let conf = Configuration::parse(
///     "jdbc:mariadb://localhost:3307/shop?user=app&socketTimeout=5000",
/// )
/// .unwrap();
/// assert_eq!(conf.database(), Some("shop"));
/// assert_eq!(conf.socket_timeout(), 5000);
/// ```
///
/// Two configurations are equal when their canonical URL and password
/// match; the canonical URL (with secrets redacted) is available through
/// [`Configuration::initial_url`] and doubles as the identity/cache key.
#[derive(Debug, Clone)]
pub struct Configuration {
    // standard options
    pub(crate) user: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) database: Option<String>,
    pub(crate) addresses: Vec<HostAddress>,
    pub(crate) ha_mode: HaMode,
    pub(crate) initial_url: String,
    pub(crate) non_mapped_options: BTreeMap<String, String>,

    // various
    pub(crate) timezone: Option<String>,
    pub(crate) connection_collation: Option<String>,
    pub(crate) connection_time_zone: Option<String>,
    pub(crate) force_connection_time_zone_to_session: Option<bool>,
    pub(crate) preserve_instants: bool,
    pub(crate) autocommit: Option<bool>,
    pub(crate) use_mysql_metadata: bool,
    pub(crate) null_database_means_current: bool,
    pub(crate) use_catalog_term: CatalogTerm,
    pub(crate) create_database_if_not_exist: bool,
    pub(crate) use_local_session_state: bool,
    pub(crate) return_multi_values_generated_ids: bool,
    pub(crate) jdbc_compliant_truncation: bool,
    pub(crate) permit_redirect: bool,
    pub(crate) transaction_isolation: Option<TransactionIsolation>,
    pub(crate) default_fetch_size: i32,
    pub(crate) max_query_size_to_log: i32,
    pub(crate) max_allowed_packet: Option<i32>,
    pub(crate) geometry_default_type: Option<String>,
    pub(crate) restricted_auth: Option<String>,
    pub(crate) init_sql: Option<String>,
    pub(crate) pin_global_tx_to_physical_connection: bool,

    // socket
    pub(crate) socket_factory: Option<String>,
    pub(crate) connect_timeout: i32,
    pub(crate) pipe: Option<String>,
    pub(crate) local_socket: Option<String>,
    pub(crate) uuid_as_string: bool,
    pub(crate) tcp_keep_alive: bool,
    pub(crate) tcp_keep_idle: i32,
    pub(crate) tcp_keep_count: i32,
    pub(crate) tcp_keep_interval: i32,
    pub(crate) tcp_abortive_close: bool,
    pub(crate) local_socket_address: Option<String>,
    pub(crate) socket_timeout: i32,
    pub(crate) use_read_ahead_input: bool,
    pub(crate) tls_socket_type: Option<String>,

    // SSL
    pub(crate) ssl_mode: SslMode,
    pub(crate) server_ssl_cert: Option<String>,
    pub(crate) key_store: Option<String>,
    pub(crate) trust_store: Option<String>,
    pub(crate) key_store_password: Option<String>,
    pub(crate) trust_store_password: Option<String>,
    pub(crate) key_password: Option<String>,
    pub(crate) key_store_type: Option<String>,
    pub(crate) trust_store_type: Option<String>,
    pub(crate) enabled_ssl_cipher_suites: Option<String>,
    pub(crate) enabled_ssl_protocol_suites: Option<String>,
    pub(crate) fallback_to_system_key_store: bool,
    pub(crate) fallback_to_system_trust_store: bool,

    // protocol
    pub(crate) allow_multi_queries: bool,
    pub(crate) allow_local_infile: bool,
    pub(crate) use_compression: bool,
    pub(crate) use_affected_rows: bool,
    pub(crate) use_bulk_stmts: bool,
    pub(crate) use_bulk_stmts_for_inserts: bool,
    pub(crate) disable_pipeline: bool,

    // prepare
    pub(crate) cache_prep_stmts: bool,
    pub(crate) prep_stmt_cache_size: i32,
    pub(crate) use_server_prep_stmts: bool,

    // authentication
    pub(crate) credential_type: Option<&'static CredentialPlugin>,
    pub(crate) session_variables: Option<String>,
    pub(crate) connection_attributes: Option<String>,
    pub(crate) service_principal_name: Option<String>,

    // meta
    pub(crate) blank_table_name_meta: bool,
    pub(crate) tiny_int1_is_bit: bool,
    pub(crate) transformed_bit_is_boolean: bool,
    pub(crate) year_is_date_type: bool,
    pub(crate) dump_queries_on_exception: bool,
    pub(crate) include_innodb_status_in_deadlock_exceptions: bool,
    pub(crate) include_thread_dump_in_deadlock_exceptions: bool,

    // HA
    pub(crate) retries_all_down: i32,
    pub(crate) galera_allowed_state: Option<String>,
    pub(crate) transaction_replay: bool,
    pub(crate) transaction_replay_size: i32,

    // pool
    pub(crate) pool: bool,
    pub(crate) pool_name: Option<String>,
    pub(crate) max_pool_size: i32,
    pub(crate) min_pool_size: i32,
    pub(crate) max_idle_time: i32,
    pub(crate) register_jmx_pool: bool,
    pub(crate) pool_valid_min_delay: i32,
    pub(crate) use_reset_connection: bool,

    // caching_sha2_password key retrieval
    pub(crate) server_rsa_public_key_file: Option<String>,
    pub(crate) allow_public_key_retrieval: bool,

    pub(crate) codecs: &'static [&'static dyn Codec],
}

impl Configuration {
    /// All-defaults configuration, used as the reference when omitting
    /// default-valued parameters from the canonical URL.
    pub(crate) fn bare_defaults() -> Self {
        Self {
            user: None,
            password: None,
            database: None,
            addresses: Vec::new(),
            ha_mode: HaMode::None,
            initial_url: String::new(),
            non_mapped_options: BTreeMap::new(),
            timezone: None,
            connection_collation: None,
            connection_time_zone: None,
            force_connection_time_zone_to_session: None,
            preserve_instants: false,
            autocommit: None,
            use_mysql_metadata: false,
            null_database_means_current: false,
            use_catalog_term: CatalogTerm::UseCatalog,
            create_database_if_not_exist: false,
            use_local_session_state: false,
            return_multi_values_generated_ids: false,
            jdbc_compliant_truncation: true,
            permit_redirect: true,
            transaction_isolation: None,
            default_fetch_size: 0,
            max_query_size_to_log: 1024,
            max_allowed_packet: None,
            geometry_default_type: None,
            restricted_auth: None,
            init_sql: None,
            pin_global_tx_to_physical_connection: false,
            socket_factory: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pipe: None,
            local_socket: None,
            uuid_as_string: false,
            tcp_keep_alive: true,
            tcp_keep_idle: 0,
            tcp_keep_count: 0,
            tcp_keep_interval: 0,
            tcp_abortive_close: false,
            local_socket_address: None,
            socket_timeout: 0,
            use_read_ahead_input: false,
            tls_socket_type: None,
            ssl_mode: SslMode::Disable,
            server_ssl_cert: None,
            key_store: None,
            trust_store: None,
            key_store_password: None,
            trust_store_password: None,
            key_password: None,
            key_store_type: None,
            trust_store_type: None,
            enabled_ssl_cipher_suites: None,
            enabled_ssl_protocol_suites: None,
            fallback_to_system_key_store: true,
            fallback_to_system_trust_store: true,
            allow_multi_queries: false,
            allow_local_infile: true,
            use_compression: false,
            use_affected_rows: false,
            use_bulk_stmts: false,
            use_bulk_stmts_for_inserts: true,
            disable_pipeline: false,
            cache_prep_stmts: true,
            prep_stmt_cache_size: 250,
            use_server_prep_stmts: false,
            credential_type: None,
            session_variables: None,
            connection_attributes: None,
            service_principal_name: None,
            blank_table_name_meta: false,
            tiny_int1_is_bit: true,
            transformed_bit_is_boolean: true,
            year_is_date_type: true,
            dump_queries_on_exception: false,
            include_innodb_status_in_deadlock_exceptions: false,
            include_thread_dump_in_deadlock_exceptions: false,
            retries_all_down: 120,
            galera_allowed_state: None,
            transaction_replay: false,
            transaction_replay_size: 64,
            pool: false,
            pool_name: None,
            max_pool_size: 8,
            min_pool_size: 8,
            max_idle_time: 600_000,
            register_jmx_pool: true,
            pool_valid_min_delay: 1000,
            use_reset_connection: false,
            server_rsa_public_key_file: None,
            allow_public_key_retrieval: false,
            codecs: &[],
        }
    }

    /// Tell whether this driver accepts the given connection string.
    ///
    /// The `jdbc:mysql:` scheme is only accepted when the string opts in
    /// through the `permitMysqlScheme` parameter.
    pub fn accepts_url(url: &str) -> bool {
        url.starts_with("jdbc:mariadb:")
            || (url.starts_with("jdbc:mysql:") && url.contains("permitMysqlScheme"))
    }

    /// Parse a connection string.
    pub fn parse(url: &str) -> Result<Self> {
        Self::parse_with_properties(url, &HashMap::new())
    }

    /// Parse a connection string with an overlay of additional properties.
    ///
    /// Overlay entries and URL query parameters are coerced in one pass;
    /// when both define the same (canonical) key, the URL parameter wins.
    pub fn parse_with_properties(url: &str, properties: &HashMap<String, String>) -> Result<Self> {
        if !Self::accepts_url(url) {
            return Err(MariadbError::url_format(format!(
                "url scheme not supported in url '{}'",
                url
            )));
        }
        parse_internal(url, properties)
    }

    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Copy every resolved field into a fresh builder.
    ///
    /// The returned builder owns deep copies (host list included); editing
    /// it cannot perturb this configuration.
    pub fn to_builder(&self) -> ConfigurationBuilder {
        ConfigurationBuilder {
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            addresses: self.addresses.clone(),
            ha_mode: Some(self.ha_mode),
            non_mapped_options: self.non_mapped_options.clone(),
            timezone: self.timezone.clone(),
            connection_collation: self.connection_collation.clone(),
            connection_time_zone: self.connection_time_zone.clone(),
            force_connection_time_zone_to_session: self.force_connection_time_zone_to_session,
            preserve_instants: Some(self.preserve_instants),
            autocommit: self.autocommit,
            use_mysql_metadata: Some(self.use_mysql_metadata),
            null_database_means_current: Some(self.null_database_means_current),
            use_catalog_term: Some(self.use_catalog_term.name().into()),
            create_database_if_not_exist: Some(self.create_database_if_not_exist),
            use_local_session_state: Some(self.use_local_session_state),
            return_multi_values_generated_ids: Some(self.return_multi_values_generated_ids),
            jdbc_compliant_truncation: Some(self.jdbc_compliant_truncation),
            permit_redirect: Some(self.permit_redirect),
            transaction_isolation: self.transaction_isolation.map(|v| v.name().into()),
            default_fetch_size: Some(self.default_fetch_size),
            max_query_size_to_log: Some(self.max_query_size_to_log),
            max_allowed_packet: self.max_allowed_packet,
            geometry_default_type: self.geometry_default_type.clone(),
            restricted_auth: self.restricted_auth.clone(),
            init_sql: self.init_sql.clone(),
            pin_global_tx_to_physical_connection: Some(self.pin_global_tx_to_physical_connection),
            socket_factory: self.socket_factory.clone(),
            connect_timeout: Some(self.connect_timeout),
            pipe: self.pipe.clone(),
            local_socket: self.local_socket.clone(),
            uuid_as_string: Some(self.uuid_as_string),
            tcp_keep_alive: Some(self.tcp_keep_alive),
            tcp_keep_idle: Some(self.tcp_keep_idle),
            tcp_keep_count: Some(self.tcp_keep_count),
            tcp_keep_interval: Some(self.tcp_keep_interval),
            tcp_abortive_close: Some(self.tcp_abortive_close),
            local_socket_address: self.local_socket_address.clone(),
            socket_timeout: Some(self.socket_timeout),
            use_read_ahead_input: Some(self.use_read_ahead_input),
            tls_socket_type: self.tls_socket_type.clone(),
            ssl_mode: Some(self.ssl_mode.name().into()),
            server_ssl_cert: self.server_ssl_cert.clone(),
            key_store: self.key_store.clone(),
            trust_store: self.trust_store.clone(),
            key_store_password: self.key_store_password.clone(),
            trust_store_password: self.trust_store_password.clone(),
            key_password: self.key_password.clone(),
            key_store_type: self.key_store_type.clone(),
            trust_store_type: self.trust_store_type.clone(),
            enabled_ssl_cipher_suites: self.enabled_ssl_cipher_suites.clone(),
            enabled_ssl_protocol_suites: self.enabled_ssl_protocol_suites.clone(),
            fallback_to_system_key_store: Some(self.fallback_to_system_key_store),
            fallback_to_system_trust_store: Some(self.fallback_to_system_trust_store),
            allow_multi_queries: Some(self.allow_multi_queries),
            allow_local_infile: Some(self.allow_local_infile),
            use_compression: Some(self.use_compression),
            use_affected_rows: Some(self.use_affected_rows),
            use_bulk_stmts: Some(self.use_bulk_stmts),
            use_bulk_stmts_for_inserts: Some(self.use_bulk_stmts_for_inserts),
            disable_pipeline: Some(self.disable_pipeline),
            cache_prep_stmts: Some(self.cache_prep_stmts),
            prep_stmt_cache_size: Some(self.prep_stmt_cache_size),
            use_server_prep_stmts: Some(self.use_server_prep_stmts),
            credential_type: self.credential_type.map(|p| p.type_name().into()),
            session_variables: self.session_variables.clone(),
            connection_attributes: self.connection_attributes.clone(),
            service_principal_name: self.service_principal_name.clone(),
            blank_table_name_meta: Some(self.blank_table_name_meta),
            tiny_int1_is_bit: Some(self.tiny_int1_is_bit),
            transformed_bit_is_boolean: Some(self.transformed_bit_is_boolean),
            year_is_date_type: Some(self.year_is_date_type),
            dump_queries_on_exception: Some(self.dump_queries_on_exception),
            include_innodb_status_in_deadlock_exceptions: Some(
                self.include_innodb_status_in_deadlock_exceptions,
            ),
            include_thread_dump_in_deadlock_exceptions: Some(
                self.include_thread_dump_in_deadlock_exceptions,
            ),
            retries_all_down: Some(self.retries_all_down),
            galera_allowed_state: self.galera_allowed_state.clone(),
            transaction_replay: Some(self.transaction_replay),
            transaction_replay_size: Some(self.transaction_replay_size),
            pool: Some(self.pool),
            pool_name: self.pool_name.clone(),
            max_pool_size: Some(self.max_pool_size),
            min_pool_size: Some(self.min_pool_size),
            max_idle_time: Some(self.max_idle_time),
            register_jmx_pool: Some(self.register_jmx_pool),
            pool_valid_min_delay: Some(self.pool_valid_min_delay),
            use_reset_connection: Some(self.use_reset_connection),
            server_rsa_public_key_file: self.server_rsa_public_key_file.clone(),
            allow_public_key_retrieval: Some(self.allow_public_key_retrieval),
        }
    }

    /// New configuration identical to this one, authenticating as another
    /// principal. Does not re-parse the URL; empty strings unset the field.
    pub fn clone_with_credentials(
        &self,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self> {
        let mut builder = self.to_builder();
        builder.user = user.filter(|v| !v.is_empty()).map(Into::into);
        builder.password = password.filter(|v| !v.is_empty()).map(Into::into);
        builder.build()
    }

    /// Human-readable description of how a connection string resolves:
    /// canonical URL, unknown options, and which options differ from their
    /// defaults. Secrets are redacted.
    pub fn to_conf(url: &str) -> Result<String> {
        url::to_conf(url)
    }

    pub fn have_primary_host_only(&self) -> bool {
        self.addresses.iter().all(|a| a.is_primary())
    }

    // standard options

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Connection default database.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Resolved host list, in connection-attempt order.
    pub fn addresses(&self) -> &[HostAddress] {
        &self.addresses
    }

    pub fn ha_mode(&self) -> HaMode {
        self.ha_mode
    }

    /// Canonical URL generated from this configuration. Secrets are
    /// replaced by `***`; the string doubles as the identity key.
    pub fn initial_url(&self) -> &str {
        &self.initial_url
    }

    /// Options that matched no known name, kept verbatim.
    pub fn non_mapped_options(&self) -> &BTreeMap<String, String> {
        &self.non_mapped_options
    }

    // various

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn connection_collation(&self) -> Option<&str> {
        self.connection_collation.as_deref()
    }

    pub fn connection_time_zone(&self) -> Option<&str> {
        self.connection_time_zone.as_deref()
    }

    pub fn force_connection_time_zone_to_session(&self) -> Option<bool> {
        self.force_connection_time_zone_to_session
    }

    pub fn preserve_instants(&self) -> bool {
        self.preserve_instants
    }

    pub fn autocommit(&self) -> Option<bool> {
        self.autocommit
    }

    pub fn use_mysql_metadata(&self) -> bool {
        self.use_mysql_metadata
    }

    pub fn null_database_means_current(&self) -> bool {
        self.null_database_means_current
    }

    pub fn use_catalog_term(&self) -> CatalogTerm {
        self.use_catalog_term
    }

    pub fn create_database_if_not_exist(&self) -> bool {
        self.create_database_if_not_exist
    }

    pub fn use_local_session_state(&self) -> bool {
        self.use_local_session_state
    }

    pub fn return_multi_values_generated_ids(&self) -> bool {
        self.return_multi_values_generated_ids
    }

    pub fn jdbc_compliant_truncation(&self) -> bool {
        self.jdbc_compliant_truncation
    }

    pub fn permit_redirect(&self) -> bool {
        self.permit_redirect
    }

    pub fn transaction_isolation(&self) -> Option<TransactionIsolation> {
        self.transaction_isolation
    }

    pub fn default_fetch_size(&self) -> i32 {
        self.default_fetch_size
    }

    pub fn max_query_size_to_log(&self) -> i32 {
        self.max_query_size_to_log
    }

    pub fn max_allowed_packet(&self) -> Option<i32> {
        self.max_allowed_packet
    }

    pub fn geometry_default_type(&self) -> Option<&str> {
        self.geometry_default_type.as_deref()
    }

    /// Comma-separated allow-list of authentication plugins.
    pub fn restricted_auth(&self) -> Option<&str> {
        self.restricted_auth.as_deref()
    }

    pub fn init_sql(&self) -> Option<&str> {
        self.init_sql.as_deref()
    }

    pub fn pin_global_tx_to_physical_connection(&self) -> bool {
        self.pin_global_tx_to_physical_connection
    }

    // socket

    pub fn socket_factory(&self) -> Option<&str> {
        self.socket_factory.as_deref()
    }

    /// Socket connect timeout, in milliseconds.
    pub fn connect_timeout(&self) -> i32 {
        self.connect_timeout
    }

    pub fn pipe(&self) -> Option<&str> {
        self.pipe.as_deref()
    }

    pub fn local_socket(&self) -> Option<&str> {
        self.local_socket.as_deref()
    }

    pub fn uuid_as_string(&self) -> bool {
        self.uuid_as_string
    }

    pub fn tcp_keep_alive(&self) -> bool {
        self.tcp_keep_alive
    }

    pub fn tcp_keep_idle(&self) -> i32 {
        self.tcp_keep_idle
    }

    pub fn tcp_keep_count(&self) -> i32 {
        self.tcp_keep_count
    }

    pub fn tcp_keep_interval(&self) -> i32 {
        self.tcp_keep_interval
    }

    pub fn tcp_abortive_close(&self) -> bool {
        self.tcp_abortive_close
    }

    pub fn local_socket_address(&self) -> Option<&str> {
        self.local_socket_address.as_deref()
    }

    /// Socket read timeout, in milliseconds. `0` means no timeout.
    pub fn socket_timeout(&self) -> i32 {
        self.socket_timeout
    }

    pub fn use_read_ahead_input(&self) -> bool {
        self.use_read_ahead_input
    }

    pub fn tls_socket_type(&self) -> Option<&str> {
        self.tls_socket_type.as_deref()
    }

    // SSL

    pub fn ssl_mode(&self) -> SslMode {
        self.ssl_mode
    }

    /// Server certificate (file path or inline PEM content).
    pub fn server_ssl_cert(&self) -> Option<&str> {
        self.server_ssl_cert.as_deref()
    }

    pub fn key_store(&self) -> Option<&str> {
        self.key_store.as_deref()
    }

    pub fn trust_store(&self) -> Option<&str> {
        self.trust_store.as_deref()
    }

    pub fn key_store_password(&self) -> Option<&str> {
        self.key_store_password.as_deref()
    }

    pub fn trust_store_password(&self) -> Option<&str> {
        self.trust_store_password.as_deref()
    }

    /// Passphrase of the private key inside the key store.
    pub fn key_password(&self) -> Option<&str> {
        self.key_password.as_deref()
    }

    pub fn key_store_type(&self) -> Option<&str> {
        self.key_store_type.as_deref()
    }

    pub fn trust_store_type(&self) -> Option<&str> {
        self.trust_store_type.as_deref()
    }

    pub fn enabled_ssl_cipher_suites(&self) -> Option<&str> {
        self.enabled_ssl_cipher_suites.as_deref()
    }

    pub fn enabled_ssl_protocol_suites(&self) -> Option<&str> {
        self.enabled_ssl_protocol_suites.as_deref()
    }

    pub fn fallback_to_system_key_store(&self) -> bool {
        self.fallback_to_system_key_store
    }

    pub fn fallback_to_system_trust_store(&self) -> bool {
        self.fallback_to_system_trust_store
    }

    // protocol

    pub fn allow_multi_queries(&self) -> bool {
        self.allow_multi_queries
    }

    pub fn allow_local_infile(&self) -> bool {
        self.allow_local_infile
    }

    pub fn use_compression(&self) -> bool {
        self.use_compression
    }

    pub fn use_affected_rows(&self) -> bool {
        self.use_affected_rows
    }

    pub fn use_bulk_stmts(&self) -> bool {
        self.use_bulk_stmts
    }

    pub fn use_bulk_stmts_for_inserts(&self) -> bool {
        self.use_bulk_stmts_for_inserts
    }

    pub fn disable_pipeline(&self) -> bool {
        self.disable_pipeline
    }

    // prepare

    pub fn cache_prep_stmts(&self) -> bool {
        self.cache_prep_stmts
    }

    pub fn prep_stmt_cache_size(&self) -> i32 {
        self.prep_stmt_cache_size
    }

    pub fn use_server_prep_stmts(&self) -> bool {
        self.use_server_prep_stmts
    }

    // authentication

    /// Resolved credential plugin, when one was requested.
    pub fn credential_plugin(&self) -> Option<&'static CredentialPlugin> {
        self.credential_type
    }

    pub fn credential_type(&self) -> Option<&'static str> {
        self.credential_type.map(|p| p.type_name())
    }

    pub fn session_variables(&self) -> Option<&str> {
        self.session_variables.as_deref()
    }

    pub fn connection_attributes(&self) -> Option<&str> {
        self.connection_attributes.as_deref()
    }

    pub fn service_principal_name(&self) -> Option<&str> {
        self.service_principal_name.as_deref()
    }

    // meta

    pub fn blank_table_name_meta(&self) -> bool {
        self.blank_table_name_meta
    }

    pub fn tiny_int1_is_bit(&self) -> bool {
        self.tiny_int1_is_bit
    }

    pub fn transformed_bit_is_boolean(&self) -> bool {
        self.transformed_bit_is_boolean
    }

    pub fn year_is_date_type(&self) -> bool {
        self.year_is_date_type
    }

    pub fn dump_queries_on_exception(&self) -> bool {
        self.dump_queries_on_exception
    }

    pub fn include_innodb_status_in_deadlock_exceptions(&self) -> bool {
        self.include_innodb_status_in_deadlock_exceptions
    }

    pub fn include_thread_dump_in_deadlock_exceptions(&self) -> bool {
        self.include_thread_dump_in_deadlock_exceptions
    }

    // HA

    pub fn retries_all_down(&self) -> i32 {
        self.retries_all_down
    }

    pub fn galera_allowed_state(&self) -> Option<&str> {
        self.galera_allowed_state.as_deref()
    }

    pub fn transaction_replay(&self) -> bool {
        self.transaction_replay
    }

    pub fn transaction_replay_size(&self) -> i32 {
        self.transaction_replay_size
    }

    // pool

    pub fn pool(&self) -> bool {
        self.pool
    }

    pub fn pool_name(&self) -> Option<&str> {
        self.pool_name.as_deref()
    }

    pub fn max_pool_size(&self) -> i32 {
        self.max_pool_size
    }

    /// Minimum number of pooled connections; defaults to
    /// [`Configuration::max_pool_size`] when not set explicitly.
    pub fn min_pool_size(&self) -> i32 {
        self.min_pool_size
    }

    pub fn max_idle_time(&self) -> i32 {
        self.max_idle_time
    }

    pub fn register_jmx_pool(&self) -> bool {
        self.register_jmx_pool
    }

    pub fn pool_valid_min_delay(&self) -> i32 {
        self.pool_valid_min_delay
    }

    pub fn use_reset_connection(&self) -> bool {
        self.use_reset_connection
    }

    // caching_sha2_password key retrieval

    pub fn server_rsa_public_key_file(&self) -> Option<&str> {
        self.server_rsa_public_key_file.as_deref()
    }

    pub fn allow_public_key_retrieval(&self) -> bool {
        self.allow_public_key_retrieval
    }

    /// Value codecs discovered at build time.
    pub fn codecs(&self) -> &'static [&'static dyn Codec] {
        self.codecs
    }
}

impl PartialEq for Configuration {
    /// Identity is (canonical URL, password): same canonical URL with a
    /// different password is a different configuration, and a missing
    /// password only matches another missing password.
    fn eq(&self, other: &Self) -> bool {
        self.initial_url == other.initial_url && self.password == other.password
    }
}

impl Eq for Configuration {}

impl Hash for Configuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.initial_url.hash(state);
    }
}

impl Display for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.initial_url)
    }
}

impl FromStr for Configuration {
    type Err = MariadbError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_internal(url: &str, overlay: &HashMap<String, String>) -> Result<Configuration> {
    let separator = url.find("//").ok_or_else(|| {
        MariadbError::url_format(format!("'//' is not present in the url '{}'", url))
    })?;
    let mut builder = Configuration::builder();
    let ha_mode = parse_ha_mode(url, separator)?;
    builder.ha_mode = Some(ha_mode);

    let second_part = &url[separator + 2..];

    // find where the host segment ends, skipping over parenthesized
    // descriptor groups so their contents cannot be mistaken for the
    // database or query separators
    let mut pos_to_skip = 0;
    while let Some(found) = second_part[pos_to_skip..].find("address=(") {
        let skip_pos = pos_to_skip + found;
        match second_part[skip_pos..].find(')') {
            Some(close) => pos_to_skip = skip_pos + close + 1,
            None => break,
        }
        while second_part[pos_to_skip..].starts_with('(') {
            match second_part[pos_to_skip..].find(')') {
                Some(close) => pos_to_skip += close + 1,
                None => break,
            }
        }
    }
    let db_index = second_part[pos_to_skip..]
        .find('/')
        .map(|p| (p + pos_to_skip) as i64)
        .unwrap_or(-1);
    let param_index = second_part.find('?').map(|p| p as i64).unwrap_or(-1);

    let (host_part, additional) = if (db_index < param_index && db_index < 0)
        || (db_index > param_index && param_index > -1)
    {
        (
            &second_part[..param_index as usize],
            Some(&second_part[param_index as usize..]),
        )
    } else if db_index != param_index {
        (
            &second_part[..db_index as usize],
            Some(&second_part[db_index as usize..]),
        )
    } else {
        (second_part, None)
    };

    let mut properties: BTreeMap<String, String> = overlay
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if let Some(additional) = additional {
        let opt_index = additional.find('?');
        builder.database = match opt_index {
            None => (additional.len() > 1).then(|| additional[1..].to_string()),
            Some(0) => None,
            Some(opt_index) => {
                let database = &additional[1..opt_index];
                (!database.is_empty()).then(|| database.to_string())
            }
        };
        if let Some(opt_index) = opt_index {
            let url_parameters = &additional[opt_index + 1..];
            if !url_parameters.is_empty() {
                for parameter in url_parameters.split('&') {
                    match parameter.split_once('=') {
                        Some((key, value)) => {
                            properties.insert(key.to_string(), value.to_string())
                        }
                        None => properties.insert(parameter.to_string(), String::new()),
                    };
                }
            }
        }
    }

    options::apply_properties(&mut builder, properties)?;
    builder.addresses = address::parse_host_list(host_part, ha_mode)?;
    builder.build()
}

fn parse_ha_mode(url: &str, separator: usize) -> Result<HaMode> {
    // the scheme gate guarantees at least two colons before `//`
    let first = url.find(':').unwrap_or(0);
    let second = url[first + 1..]
        .find(':')
        .map(|p| p + first + 1)
        .unwrap_or(0);
    let mut third = url[second + 1..]
        .find(':')
        .map(|p| (p + second + 1) as i64)
        .unwrap_or(-1);

    if third > separator as i64 || third == -1 {
        if second + 1 == separator {
            return Ok(HaMode::None);
        }
        third = separator as i64;
    }

    let token = &url[second + 1..third as usize];
    let token = if token.eq_ignore_ascii_case("FAILOVER") {
        "LOADBALANCE"
    } else {
        token
    };
    HaMode::from_value(token).ok_or_else(|| {
        MariadbError::url_format(format!(
            "wrong failover parameter format in connection String '{}'",
            url
        ))
    })
}

macro_rules! string_setters {
    ($($setter:ident => $field:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $setter(mut self, $field: impl Into<String>) -> Self {
                self.$field = Some($field.into());
                self
            }
        )*
    };
}

macro_rules! bool_setters {
    ($($setter:ident => $field:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $setter(mut self, $field: bool) -> Self {
                self.$field = Some($field);
                self
            }
        )*
    };
}

macro_rules! int_setters {
    ($($setter:ident => $field:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $setter(mut self, $field: i32) -> Self {
                self.$field = Some($field);
                self
            }
        )*
    };
}

/// Mutable staging counterpart of [`Configuration`].
///
/// Every field is optional; [`ConfigurationBuilder::build`] applies
/// defaults, runs the cross-field resolution rules, validates, and
/// computes the canonical URL. Building is the only transition into a
/// [`Configuration`] and may be repeated.
///
/// ```
/// use mariadb::{Configuration, HaMode};
///
/// let conf = Configuration::builder()
///     .add_host("db1.example.com", 3306)
///     .add_host("db2.example.com", 3306)
///     .with_ha_mode(HaMode::Replication)
///     .with_user("app")
///     .with_max_pool_size(12)
///     .build()
///     .unwrap();
/// assert_eq!(conf.min_pool_size(), 12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBuilder {
    pub(crate) non_mapped_options: BTreeMap<String, String>,
    pub(crate) ha_mode: Option<HaMode>,
    pub(crate) addresses: Vec<HostAddress>,

    pub(crate) user: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) database: Option<String>,

    pub(crate) timezone: Option<String>,
    pub(crate) connection_collation: Option<String>,
    pub(crate) connection_time_zone: Option<String>,
    pub(crate) force_connection_time_zone_to_session: Option<bool>,
    pub(crate) preserve_instants: Option<bool>,
    pub(crate) autocommit: Option<bool>,
    pub(crate) use_mysql_metadata: Option<bool>,
    pub(crate) null_database_means_current: Option<bool>,
    pub(crate) use_catalog_term: Option<String>,
    pub(crate) create_database_if_not_exist: Option<bool>,
    pub(crate) use_local_session_state: Option<bool>,
    pub(crate) return_multi_values_generated_ids: Option<bool>,
    pub(crate) jdbc_compliant_truncation: Option<bool>,
    pub(crate) permit_redirect: Option<bool>,
    pub(crate) transaction_isolation: Option<String>,
    pub(crate) default_fetch_size: Option<i32>,
    pub(crate) max_query_size_to_log: Option<i32>,
    pub(crate) max_allowed_packet: Option<i32>,
    pub(crate) geometry_default_type: Option<String>,
    pub(crate) restricted_auth: Option<String>,
    pub(crate) init_sql: Option<String>,
    pub(crate) pin_global_tx_to_physical_connection: Option<bool>,

    pub(crate) socket_factory: Option<String>,
    pub(crate) connect_timeout: Option<i32>,
    pub(crate) pipe: Option<String>,
    pub(crate) local_socket: Option<String>,
    pub(crate) uuid_as_string: Option<bool>,
    pub(crate) tcp_keep_alive: Option<bool>,
    pub(crate) tcp_keep_idle: Option<i32>,
    pub(crate) tcp_keep_count: Option<i32>,
    pub(crate) tcp_keep_interval: Option<i32>,
    pub(crate) tcp_abortive_close: Option<bool>,
    pub(crate) local_socket_address: Option<String>,
    pub(crate) socket_timeout: Option<i32>,
    pub(crate) use_read_ahead_input: Option<bool>,
    pub(crate) tls_socket_type: Option<String>,

    pub(crate) ssl_mode: Option<String>,
    pub(crate) server_ssl_cert: Option<String>,
    pub(crate) key_store: Option<String>,
    pub(crate) trust_store: Option<String>,
    pub(crate) key_store_password: Option<String>,
    pub(crate) trust_store_password: Option<String>,
    pub(crate) key_password: Option<String>,
    pub(crate) key_store_type: Option<String>,
    pub(crate) trust_store_type: Option<String>,
    pub(crate) enabled_ssl_cipher_suites: Option<String>,
    pub(crate) enabled_ssl_protocol_suites: Option<String>,
    pub(crate) fallback_to_system_key_store: Option<bool>,
    pub(crate) fallback_to_system_trust_store: Option<bool>,

    pub(crate) allow_multi_queries: Option<bool>,
    pub(crate) allow_local_infile: Option<bool>,
    pub(crate) use_compression: Option<bool>,
    pub(crate) use_affected_rows: Option<bool>,
    pub(crate) use_bulk_stmts: Option<bool>,
    pub(crate) use_bulk_stmts_for_inserts: Option<bool>,
    pub(crate) disable_pipeline: Option<bool>,

    pub(crate) cache_prep_stmts: Option<bool>,
    pub(crate) prep_stmt_cache_size: Option<i32>,
    pub(crate) use_server_prep_stmts: Option<bool>,

    pub(crate) credential_type: Option<String>,
    pub(crate) session_variables: Option<String>,
    pub(crate) connection_attributes: Option<String>,
    pub(crate) service_principal_name: Option<String>,

    pub(crate) blank_table_name_meta: Option<bool>,
    pub(crate) tiny_int1_is_bit: Option<bool>,
    pub(crate) transformed_bit_is_boolean: Option<bool>,
    pub(crate) year_is_date_type: Option<bool>,
    pub(crate) dump_queries_on_exception: Option<bool>,
    pub(crate) include_innodb_status_in_deadlock_exceptions: Option<bool>,
    pub(crate) include_thread_dump_in_deadlock_exceptions: Option<bool>,

    pub(crate) retries_all_down: Option<i32>,
    pub(crate) galera_allowed_state: Option<String>,
    pub(crate) transaction_replay: Option<bool>,
    pub(crate) transaction_replay_size: Option<i32>,

    pub(crate) pool: Option<bool>,
    pub(crate) pool_name: Option<String>,
    pub(crate) max_pool_size: Option<i32>,
    pub(crate) min_pool_size: Option<i32>,
    pub(crate) max_idle_time: Option<i32>,
    pub(crate) register_jmx_pool: Option<bool>,
    pub(crate) pool_valid_min_delay: Option<i32>,
    pub(crate) use_reset_connection: Option<bool>,

    pub(crate) server_rsa_public_key_file: Option<String>,
    pub(crate) allow_public_key_retrieval: Option<bool>,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_ha_mode(mut self, ha_mode: HaMode) -> Self {
        self.ha_mode = Some(ha_mode);
        self
    }

    /// Replace the staged host list.
    #[inline]
    pub fn with_addresses(mut self, addresses: Vec<HostAddress>) -> Self {
        self.addresses = addresses;
        self
    }

    /// Append a host; its role is assigned positionally at build time.
    #[inline]
    pub fn add_host(mut self, host: impl Into<String>, port: u16) -> Self {
        self.addresses.push(HostAddress::new(host, port));
        self
    }

    /// Append a host with an explicit primary/replica role.
    #[inline]
    pub fn add_host_with_role(
        mut self,
        host: impl Into<String>,
        port: u16,
        primary: bool,
    ) -> Self {
        self.addresses.push(HostAddress::with_role(host, port, primary));
        self
    }

    #[inline]
    pub fn add_local_socket_host(mut self, path: impl Into<String>) -> Self {
        self.addresses.push(HostAddress::local_socket(path));
        self
    }

    #[inline]
    pub fn add_pipe_host(mut self, path: impl Into<String>) -> Self {
        self.addresses.push(HostAddress::pipe(path));
        self
    }

    /// Stage an explicit SSL mode. An explicit [`SslMode::Disable`] can
    /// still be escalated at build time by a credential plugin that
    /// mandates encryption.
    #[inline]
    pub fn with_ssl_mode(mut self, ssl_mode: SslMode) -> Self {
        self.ssl_mode = Some(ssl_mode.name().into());
        self
    }

    #[inline]
    pub fn with_transaction_isolation(mut self, isolation: TransactionIsolation) -> Self {
        self.transaction_isolation = Some(isolation.name().into());
        self
    }

    #[inline]
    pub fn with_catalog_term(mut self, term: CatalogTerm) -> Self {
        self.use_catalog_term = Some(term.name().into());
        self
    }

    string_setters! {
        with_user => user,
        with_password => password,
        with_database => database,
        with_timezone => timezone,
        with_connection_collation => connection_collation,
        with_connection_time_zone => connection_time_zone,
        with_geometry_default_type => geometry_default_type,
        with_restricted_auth => restricted_auth,
        with_init_sql => init_sql,
        with_socket_factory => socket_factory,
        with_pipe => pipe,
        with_local_socket => local_socket,
        with_local_socket_address => local_socket_address,
        with_tls_socket_type => tls_socket_type,
        with_server_ssl_cert => server_ssl_cert,
        with_key_store => key_store,
        with_trust_store => trust_store,
        with_key_store_password => key_store_password,
        with_trust_store_password => trust_store_password,
        with_key_password => key_password,
        with_key_store_type => key_store_type,
        with_trust_store_type => trust_store_type,
        with_enabled_ssl_cipher_suites => enabled_ssl_cipher_suites,
        with_enabled_ssl_protocol_suites => enabled_ssl_protocol_suites,
        with_credential_type => credential_type,
        with_session_variables => session_variables,
        with_connection_attributes => connection_attributes,
        with_service_principal_name => service_principal_name,
        with_galera_allowed_state => galera_allowed_state,
        with_pool_name => pool_name,
        with_server_rsa_public_key_file => server_rsa_public_key_file,
    }

    bool_setters! {
        with_force_connection_time_zone_to_session => force_connection_time_zone_to_session,
        with_preserve_instants => preserve_instants,
        with_autocommit => autocommit,
        with_use_mysql_metadata => use_mysql_metadata,
        with_null_database_means_current => null_database_means_current,
        with_create_database_if_not_exist => create_database_if_not_exist,
        with_use_local_session_state => use_local_session_state,
        with_return_multi_values_generated_ids => return_multi_values_generated_ids,
        with_jdbc_compliant_truncation => jdbc_compliant_truncation,
        with_permit_redirect => permit_redirect,
        with_pin_global_tx_to_physical_connection => pin_global_tx_to_physical_connection,
        with_uuid_as_string => uuid_as_string,
        with_tcp_keep_alive => tcp_keep_alive,
        with_tcp_abortive_close => tcp_abortive_close,
        with_use_read_ahead_input => use_read_ahead_input,
        with_fallback_to_system_key_store => fallback_to_system_key_store,
        with_fallback_to_system_trust_store => fallback_to_system_trust_store,
        with_allow_multi_queries => allow_multi_queries,
        with_allow_local_infile => allow_local_infile,
        with_use_compression => use_compression,
        with_use_affected_rows => use_affected_rows,
        with_use_bulk_stmts => use_bulk_stmts,
        with_use_bulk_stmts_for_inserts => use_bulk_stmts_for_inserts,
        with_disable_pipeline => disable_pipeline,
        with_cache_prep_stmts => cache_prep_stmts,
        with_use_server_prep_stmts => use_server_prep_stmts,
        with_blank_table_name_meta => blank_table_name_meta,
        with_tiny_int1_is_bit => tiny_int1_is_bit,
        with_transformed_bit_is_boolean => transformed_bit_is_boolean,
        with_year_is_date_type => year_is_date_type,
        with_dump_queries_on_exception => dump_queries_on_exception,
        with_include_innodb_status_in_deadlock_exceptions => include_innodb_status_in_deadlock_exceptions,
        with_include_thread_dump_in_deadlock_exceptions => include_thread_dump_in_deadlock_exceptions,
        with_transaction_replay => transaction_replay,
        with_pool => pool,
        with_register_jmx_pool => register_jmx_pool,
        with_use_reset_connection => use_reset_connection,
        with_allow_public_key_retrieval => allow_public_key_retrieval,
    }

    int_setters! {
        with_default_fetch_size => default_fetch_size,
        with_max_query_size_to_log => max_query_size_to_log,
        with_max_allowed_packet => max_allowed_packet,
        with_connect_timeout => connect_timeout,
        with_tcp_keep_idle => tcp_keep_idle,
        with_tcp_keep_count => tcp_keep_count,
        with_tcp_keep_interval => tcp_keep_interval,
        with_socket_timeout => socket_timeout,
        with_prep_stmt_cache_size => prep_stmt_cache_size,
        with_retries_all_down => retries_all_down,
        with_transaction_replay_size => transaction_replay_size,
        with_max_pool_size => max_pool_size,
        with_min_pool_size => min_pool_size,
        with_max_idle_time => max_idle_time,
        with_pool_valid_min_delay => pool_valid_min_delay,
    }

    /// Validate the staged values and freeze them into a
    /// [`Configuration`].
    ///
    /// This runs the full resolution pass every time it is called:
    /// credential-plugin lookup, SSL-mode escalation, timezone and
    /// collation rules, pool-size defaulting, the non-negative invariant,
    /// codec discovery, and canonical URL computation.
    pub fn build(&self) -> Result<Configuration> {
        let ha_mode = self.ha_mode.unwrap_or_default();
        let credential_type = plugin::get(self.credential_type.as_deref())?;

        let explicit_ssl = self
            .ssl_mode
            .as_deref()
            .map(SslMode::from_value)
            .transpose()?;
        let mandates_ssl = credential_type.is_some_and(|p| p.must_use_ssl());
        let ssl_mode = if mandates_ssl && matches!(explicit_ssl, None | Some(SslMode::Disable)) {
            SslMode::VerifyFull
        } else {
            explicit_ssl.unwrap_or_default()
        };

        let mut conf = Configuration::bare_defaults();
        conf.user = self.user.clone();
        conf.password = self.password.clone();
        conf.database = self.database.clone();
        conf.ha_mode = ha_mode;
        conf.non_mapped_options = self.non_mapped_options.clone();
        conf.credential_type = credential_type;
        conf.ssl_mode = ssl_mode;

        conf.timezone = self.timezone.clone();
        conf.connection_time_zone = self.connection_time_zone.clone();
        conf.force_connection_time_zone_to_session = self.force_connection_time_zone_to_session;
        if let Some(v) = self.preserve_instants {
            conf.preserve_instants = v;
        }
        conf.autocommit = self.autocommit;
        if let Some(v) = self.use_mysql_metadata {
            conf.use_mysql_metadata = v;
        }
        if let Some(v) = self.null_database_means_current {
            conf.null_database_means_current = v;
        }
        if let Some(term) = &self.use_catalog_term {
            conf.use_catalog_term = if term.eq_ignore_ascii_case("CATALOG") {
                CatalogTerm::UseCatalog
            } else if term.eq_ignore_ascii_case("SCHEMA") {
                CatalogTerm::UseSchema
            } else {
                return Err(MariadbError::invalid_config(format!(
                    "useCatalogTerm can only have CATALOG/SCHEMA value, current set value is {}",
                    term
                )));
            };
        }
        if let Some(v) = self.create_database_if_not_exist {
            conf.create_database_if_not_exist = v;
        }
        if let Some(v) = self.use_local_session_state {
            conf.use_local_session_state = v;
        }
        if let Some(v) = self.return_multi_values_generated_ids {
            conf.return_multi_values_generated_ids = v;
        }
        if let Some(v) = self.jdbc_compliant_truncation {
            conf.jdbc_compliant_truncation = v;
        }
        if let Some(v) = self.permit_redirect {
            conf.permit_redirect = v;
        }
        conf.transaction_isolation = self
            .transaction_isolation
            .as_deref()
            .map(TransactionIsolation::from_value)
            .transpose()?;
        if let Some(v) = self.default_fetch_size {
            conf.default_fetch_size = v;
        }
        if let Some(v) = self.max_query_size_to_log {
            conf.max_query_size_to_log = v;
        }
        conf.max_allowed_packet = self.max_allowed_packet;
        conf.geometry_default_type = self.geometry_default_type.clone();
        conf.restricted_auth = self.restricted_auth.clone();
        conf.init_sql = self.init_sql.clone();
        if let Some(v) = self.pin_global_tx_to_physical_connection {
            conf.pin_global_tx_to_physical_connection = v;
        }

        conf.socket_factory = self.socket_factory.clone();
        if let Some(v) = self.connect_timeout {
            conf.connect_timeout = v;
        }
        conf.pipe = self.pipe.clone();
        conf.local_socket = self.local_socket.clone();
        if let Some(v) = self.uuid_as_string {
            conf.uuid_as_string = v;
        }
        if let Some(v) = self.tcp_keep_alive {
            conf.tcp_keep_alive = v;
        }
        if let Some(v) = self.tcp_keep_idle {
            conf.tcp_keep_idle = v;
        }
        if let Some(v) = self.tcp_keep_count {
            conf.tcp_keep_count = v;
        }
        if let Some(v) = self.tcp_keep_interval {
            conf.tcp_keep_interval = v;
        }
        if let Some(v) = self.tcp_abortive_close {
            conf.tcp_abortive_close = v;
        }
        conf.local_socket_address = self.local_socket_address.clone();
        if let Some(v) = self.socket_timeout {
            conf.socket_timeout = v;
        }
        if let Some(v) = self.use_read_ahead_input {
            conf.use_read_ahead_input = v;
        }
        conf.tls_socket_type = self.tls_socket_type.clone();

        conf.server_ssl_cert = self.server_ssl_cert.clone();
        conf.key_store = self.key_store.clone();
        conf.trust_store = self.trust_store.clone();
        conf.key_store_password = self.key_store_password.clone();
        conf.trust_store_password = self.trust_store_password.clone();
        conf.key_password = self.key_password.clone();
        conf.key_store_type = self.key_store_type.clone();
        conf.trust_store_type = self.trust_store_type.clone();
        conf.enabled_ssl_cipher_suites = self.enabled_ssl_cipher_suites.clone();
        conf.enabled_ssl_protocol_suites = self.enabled_ssl_protocol_suites.clone();
        if let Some(v) = self.fallback_to_system_key_store {
            conf.fallback_to_system_key_store = v;
        }
        if let Some(v) = self.fallback_to_system_trust_store {
            conf.fallback_to_system_trust_store = v;
        }

        if let Some(v) = self.allow_multi_queries {
            conf.allow_multi_queries = v;
        }
        if let Some(v) = self.allow_local_infile {
            conf.allow_local_infile = v;
        }
        if let Some(v) = self.use_compression {
            conf.use_compression = v;
        }
        if let Some(v) = self.use_affected_rows {
            conf.use_affected_rows = v;
        }
        if let Some(v) = self.use_bulk_stmts {
            conf.use_bulk_stmts = v;
        }
        // the insert-specific flag inherits the general bulk flag when it
        // was not set explicitly
        if let Some(v) = self.use_bulk_stmts_for_inserts.or(self.use_bulk_stmts) {
            conf.use_bulk_stmts_for_inserts = v;
        }
        if let Some(v) = self.disable_pipeline {
            conf.disable_pipeline = v;
        }

        if let Some(v) = self.cache_prep_stmts {
            conf.cache_prep_stmts = v;
        }
        if let Some(v) = self.prep_stmt_cache_size {
            conf.prep_stmt_cache_size = v;
        }
        if let Some(v) = self.use_server_prep_stmts {
            conf.use_server_prep_stmts = v;
        }

        conf.session_variables = self.session_variables.clone();
        conf.connection_attributes = self.connection_attributes.clone();
        conf.service_principal_name = self.service_principal_name.clone();

        if let Some(v) = self.blank_table_name_meta {
            conf.blank_table_name_meta = v;
        }
        if let Some(v) = self.tiny_int1_is_bit {
            conf.tiny_int1_is_bit = v;
        }
        if let Some(v) = self.transformed_bit_is_boolean {
            conf.transformed_bit_is_boolean = v;
        }
        if let Some(v) = self.year_is_date_type {
            conf.year_is_date_type = v;
        }
        if let Some(v) = self.dump_queries_on_exception {
            conf.dump_queries_on_exception = v;
        }
        if let Some(v) = self.include_innodb_status_in_deadlock_exceptions {
            conf.include_innodb_status_in_deadlock_exceptions = v;
        }
        if let Some(v) = self.include_thread_dump_in_deadlock_exceptions {
            conf.include_thread_dump_in_deadlock_exceptions = v;
        }

        if let Some(v) = self.retries_all_down {
            conf.retries_all_down = v;
        }
        conf.galera_allowed_state = self.galera_allowed_state.clone();
        if let Some(v) = self.transaction_replay {
            conf.transaction_replay = v;
        }
        if let Some(v) = self.transaction_replay_size {
            conf.transaction_replay_size = v;
        }

        if let Some(v) = self.pool {
            conf.pool = v;
        }
        conf.pool_name = self.pool_name.clone();
        if let Some(v) = self.max_pool_size {
            conf.max_pool_size = v;
        }
        // min pool size defaults to the maximum pool size when not set
        conf.min_pool_size = self.min_pool_size.unwrap_or(conf.max_pool_size);
        if let Some(v) = self.max_idle_time {
            conf.max_idle_time = v;
        }
        if let Some(v) = self.register_jmx_pool {
            conf.register_jmx_pool = v;
        }
        if let Some(v) = self.pool_valid_min_delay {
            conf.pool_valid_min_delay = v;
        }
        if let Some(v) = self.use_reset_connection {
            conf.use_reset_connection = v;
        }

        conf.server_rsa_public_key_file = self
            .server_rsa_public_key_file
            .clone()
            .filter(|v| !v.is_empty());
        if let Some(v) = self.allow_public_key_retrieval {
            conf.allow_public_key_retrieval = v;
        }

        // hosts: substitute or propagate the local transport
        let mut addresses = self.addresses.clone();
        if addresses.is_empty() {
            if let Some(path) = &conf.local_socket {
                addresses.push(HostAddress::local_socket(path));
            } else if let Some(path) = &conf.pipe {
                addresses.push(HostAddress::pipe(path));
            }
        } else {
            if let Some(path) = &conf.local_socket {
                addresses = addresses.iter().map(|a| a.with_local_socket(path)).collect();
            }
            if let Some(path) = &conf.pipe {
                addresses = addresses.iter().map(|a| a.with_pipe(path)).collect();
            }
        }
        address::resolve_roles(&mut addresses, ha_mode);
        conf.addresses = addresses;

        // timezone convenience option
        if let Some(timezone) = &conf.timezone {
            if conf.connection_time_zone.is_none() {
                if timezone.eq_ignore_ascii_case("disable") {
                    conf.force_connection_time_zone_to_session = Some(false);
                } else {
                    conf.force_connection_time_zone_to_session = Some(true);
                    if !timezone.eq_ignore_ascii_case("auto") {
                        conf.connection_time_zone = Some(timezone.clone());
                    }
                }
            }
        }

        // connection collation must be a well-formed utf8mb4 collation
        conf.connection_collation = match self.connection_collation.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(collation) => {
                if !collation.to_ascii_lowercase().starts_with("utf8mb4_") {
                    return Err(MariadbError::url_format(format!(
                        "wrong connection collation '{}' only utf8mb4 collation are accepted",
                        collation
                    )));
                }
                if !collation
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(MariadbError::url_format(format!(
                        "wrong connection collation '{}' name",
                        collation
                    )));
                }
                Some(collation.to_string())
            }
        };

        options::check_non_negative(&conf)?;

        conf.codecs = codec::discover();
        conf.initial_url = url::build_url(&conf);
        Ok(conf)
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    fn parse(url: &str) -> Configuration {
        Configuration::parse(url).unwrap()
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/test", true)]
    #[case("jdbc:mariadb:replication://h1,h2/test", true)]
    #[case("jdbc:mysql://localhost/test", false)]
    #[case("jdbc:mysql://localhost/test?permitMysqlScheme", true)]
    #[case("mariadb://localhost/test", false)]
    #[case("jdbc:postgresql://localhost/test", false)]
    fn test_accepts_url(#[case] url: &str, #[case] accepted: bool) {
        assert_eq!(Configuration::accepts_url(url), accepted);
    }

    #[test]
    fn test_missing_separator_is_fatal() {
        let err = Configuration::parse("jdbc:mariadb:localhost/test").unwrap_err();
        assert!(err.to_string().contains("'//' is not present"));
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/test", HaMode::None)]
    #[case("jdbc:mariadb:sequential://h1,h2/test", HaMode::Sequential)]
    #[case("jdbc:mariadb:loadbalance://h1,h2/test", HaMode::Loadbalance)]
    #[case("jdbc:mariadb:LOADBALANCE://h1,h2/test", HaMode::Loadbalance)]
    #[case("jdbc:mariadb:failover://h1,h2/test", HaMode::Loadbalance)]
    #[case("jdbc:mariadb:FAILOVER://h1,h2/test", HaMode::Loadbalance)]
    #[case("jdbc:mariadb:replication://h1,h2/test", HaMode::Replication)]
    fn test_ha_mode(#[case] url: &str, #[case] ha_mode: HaMode) {
        assert_eq!(parse(url).ha_mode(), ha_mode);
    }

    #[test]
    fn test_unknown_ha_mode_is_fatal() {
        let err = Configuration::parse("jdbc:mariadb:cluster://h1,h2/test").unwrap_err();
        assert!(err.to_string().contains("wrong failover parameter"));
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/db", Some("db"))]
    #[case("jdbc:mariadb://localhost/", None)]
    #[case("jdbc:mariadb://localhost", None)]
    #[case("jdbc:mariadb://localhost/db?user=a", Some("db"))]
    #[case("jdbc:mariadb://localhost/?user=a", None)]
    #[case("jdbc:mariadb://localhost?user=a", None)]
    fn test_database_disambiguation(#[case] url: &str, #[case] database: Option<&str>) {
        assert_eq!(parse(url).database(), database);
    }

    #[test]
    fn test_reference_two_host_url() {
        let conf = parse(
            "jdbc:mariadb://host1,address=(type=replica)(port=3307)(host=host2)/db?user=a&password=b",
        );
        assert_eq!(conf.database(), Some("db"));
        assert_eq!(conf.user(), Some("a"));
        assert_eq!(conf.password(), Some("b"));
        let addresses = conf.addresses();
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[0].host(), Some("host1"));
        assert_eq!(addresses[0].port(), 3306);
        assert!(addresses[0].is_primary());
        assert_eq!(addresses[1].host(), Some("host2"));
        assert_eq!(addresses[1].port(), 3307);
        assert!(!addresses[1].is_primary());
    }

    #[test]
    fn test_replication_roles() {
        let conf = parse("jdbc:mariadb:replication://h1,h2,h3/db");
        let roles: Vec<_> = conf.addresses().iter().map(|a| a.is_primary()).collect();
        assert_eq!(roles, [true, false, false]);
        assert!(!conf.have_primary_host_only());
    }

    #[test]
    fn test_query_key_without_value_and_duplicates() {
        let conf = parse("jdbc:mariadb://localhost/db?permitMysqlScheme&user=a&user=b");
        // key without '=' is accepted with an empty value, landing in the
        // non-mapped bag; duplicate keys keep the last occurrence
        assert_eq!(
            conf.non_mapped_options().get("permitMysqlScheme"),
            Some(&String::new())
        );
        assert_eq!(conf.user(), Some("b"));
    }

    #[test]
    fn test_overlay_properties_lose_to_url_parameters() {
        let mut overlay = HashMap::new();
        overlay.insert("user".to_string(), "overlay".to_string());
        overlay.insert("socketTimeout".to_string(), "1000".to_string());
        let conf =
            Configuration::parse_with_properties("jdbc:mariadb://localhost/db?user=url", &overlay)
                .unwrap();
        assert_eq!(conf.user(), Some("url"));
        assert_eq!(conf.socket_timeout(), 1000);
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/db?socketTimeout=abc")]
    #[case("jdbc:mariadb://localhost/db?maxPoolSize=10.5")]
    #[case("jdbc:mariadb://localhost/db?maxPoolSize=99999999999")]
    fn test_integer_coercion_failure(#[case] url: &str) {
        let err = Configuration::parse(url).unwrap_err();
        assert!(matches!(
            err,
            MariadbError::OptionType {
                expected: "Integer",
                ..
            }
        ));
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/db?pool=yes")]
    #[case("jdbc:mariadb://localhost/db?tcpKeepAlive=2")]
    fn test_boolean_coercion_failure(#[case] url: &str) {
        let err = Configuration::parse(url).unwrap_err();
        assert!(matches!(
            err,
            MariadbError::OptionType {
                expected: "boolean (true/false or 0/1)",
                ..
            }
        ));
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/db?pool=", true)]
    #[case("jdbc:mariadb://localhost/db?pool=1", true)]
    #[case("jdbc:mariadb://localhost/db?pool=true", true)]
    #[case("jdbc:mariadb://localhost/db?pool=TRUE", true)]
    #[case("jdbc:mariadb://localhost/db?pool=0", false)]
    #[case("jdbc:mariadb://localhost/db?pool=false", false)]
    fn test_boolean_coercion(#[case] url: &str, #[case] value: bool) {
        assert_eq!(parse(url).pool(), value);
    }

    #[test]
    fn test_empty_string_option_is_ignored() {
        let conf = parse("jdbc:mariadb://localhost/db?user=");
        assert_eq!(conf.user(), None);
    }

    #[test]
    fn test_unknown_options_are_retained() {
        let conf = parse("jdbc:mariadb://localhost/db?myCustomOption=42&user=a");
        assert_eq!(
            conf.non_mapped_options().get("myCustomOption"),
            Some(&"42".to_string())
        );
    }

    #[rstest]
    #[case("serverTimezone=UTC")]
    #[case("SERVERTIMEZONE=UTC")]
    fn test_alias_resolution(#[case] param: &str) {
        let conf = parse(&format!("jdbc:mariadb://localhost/db?{}", param));
        assert_eq!(conf.timezone(), Some("UTC"));
        assert!(conf.non_mapped_options().is_empty());
    }

    #[test]
    fn test_option_names_are_case_insensitive() {
        let conf = parse("jdbc:mariadb://localhost/db?SOCKETTIMEOUT=200&User=a");
        assert_eq!(conf.socket_timeout(), 200);
        assert_eq!(conf.user(), Some("a"));
    }

    #[test]
    fn test_min_pool_size_defaults_to_max_pool_size() {
        let conf = parse("jdbc:mariadb://localhost/db?maxPoolSize=12");
        assert_eq!(conf.max_pool_size(), 12);
        assert_eq!(conf.min_pool_size(), 12);

        let conf = parse("jdbc:mariadb://localhost/db?maxPoolSize=12&minPoolSize=3");
        assert_eq!(conf.min_pool_size(), 3);
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/db?connectTimeout=-1")]
    #[case("jdbc:mariadb://localhost/db?maxPoolSize=-5")]
    #[case("jdbc:mariadb://localhost/db?maxAllowedPacket=-1")]
    fn test_negative_integer_is_fatal(#[case] url: &str) {
        let err = Configuration::parse(url).unwrap_err();
        assert!(err.to_string().contains("must be >= 0"));
    }

    #[rstest]
    #[case(None, None, SslMode::Disable)]
    #[case(None, Some(SslMode::Trust), SslMode::Trust)]
    #[case(Some("PARSEC"), None, SslMode::VerifyFull)]
    #[case(Some("PARSEC"), Some(SslMode::Disable), SslMode::VerifyFull)]
    #[case(Some("PARSEC"), Some(SslMode::Trust), SslMode::Trust)]
    #[case(Some("ENV"), None, SslMode::Disable)]
    #[case(Some("ENV"), Some(SslMode::Disable), SslMode::Disable)]
    fn test_ssl_escalation(
        #[case] credential_type: Option<&str>,
        #[case] explicit: Option<SslMode>,
        #[case] resolved: SslMode,
    ) {
        let mut builder = Configuration::builder().add_host("localhost", 3306);
        if let Some(credential_type) = credential_type {
            builder = builder.with_credential_type(credential_type);
        }
        if let Some(explicit) = explicit {
            builder = builder.with_ssl_mode(explicit);
        }
        assert_eq!(builder.build().unwrap().ssl_mode(), resolved);
    }

    #[test]
    fn test_unknown_credential_plugin_is_fatal() {
        let err = Configuration::parse("jdbc:mariadb://localhost/db?credentialType=VAULT")
            .unwrap_err();
        assert!(matches!(
            err,
            MariadbError::UnknownCredentialPlugin { name } if name == "VAULT"
        ));
    }

    #[rstest]
    #[case("disable", Some(false), None)]
    #[case("DISABLE", Some(false), None)]
    #[case("auto", Some(true), None)]
    #[case("America/New_York", Some(true), Some("America/New_York"))]
    fn test_timezone_resolution(
        #[case] timezone: &str,
        #[case] force: Option<bool>,
        #[case] connection_time_zone: Option<&str>,
    ) {
        let conf = parse(&format!("jdbc:mariadb://localhost/db?timezone={}", timezone));
        assert_eq!(conf.force_connection_time_zone_to_session(), force);
        assert_eq!(conf.connection_time_zone(), connection_time_zone);
    }

    #[test]
    fn test_timezone_does_not_override_explicit_connection_time_zone() {
        let conf =
            parse("jdbc:mariadb://localhost/db?timezone=America/New_York&connectionTimeZone=UTC");
        assert_eq!(conf.connection_time_zone(), Some("UTC"));
    }

    #[rstest]
    #[case("utf8mb4_general_ci", Some("utf8mb4_general_ci"))]
    #[case("Utf8mb4_general_ci ", Some("Utf8mb4_general_ci"))]
    #[case("UTF8MB4_UNICODE_CI", Some("UTF8MB4_UNICODE_CI"))]
    #[case("  ", None)]
    fn test_collation_accepted(#[case] collation: &str, #[case] stored: Option<&str>) {
        let conf = Configuration::builder()
            .add_host("localhost", 3306)
            .with_connection_collation(collation)
            .build()
            .unwrap();
        assert_eq!(conf.connection_collation(), stored);
    }

    #[rstest]
    #[case("latin1_swedish_ci")]
    #[case("utf8mb4_general ci")]
    #[case("utf8mb4_general-ci")]
    fn test_collation_rejected(#[case] collation: &str) {
        let err = Configuration::builder()
            .add_host("localhost", 3306)
            .with_connection_collation(collation)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("wrong connection collation"));
        assert!(err.to_string().contains(collation.trim()));
    }

    #[rstest]
    #[case("CATALOG", CatalogTerm::UseCatalog)]
    #[case("catalog", CatalogTerm::UseCatalog)]
    #[case("SCHEMA", CatalogTerm::UseSchema)]
    #[case("schema", CatalogTerm::UseSchema)]
    fn test_catalog_term(#[case] term: &str, #[case] resolved: CatalogTerm) {
        let conf = parse(&format!(
            "jdbc:mariadb://localhost/db?useCatalogTerm={}",
            term
        ));
        assert_eq!(conf.use_catalog_term(), resolved);
    }

    #[test]
    fn test_invalid_catalog_term_is_fatal() {
        let err =
            Configuration::parse("jdbc:mariadb://localhost/db?useCatalogTerm=TABLE").unwrap_err();
        assert!(err.to_string().contains("CATALOG/SCHEMA"));
    }

    #[rstest]
    #[case(None, None, true)] // both defaults
    #[case(Some(true), None, true)]
    #[case(Some(true), Some(false), false)]
    #[case(Some(false), None, false)]
    fn test_bulk_insert_inheritance(
        #[case] bulk: Option<bool>,
        #[case] bulk_for_inserts: Option<bool>,
        #[case] resolved: bool,
    ) {
        let mut builder = Configuration::builder().add_host("localhost", 3306);
        if let Some(bulk) = bulk {
            builder = builder.with_use_bulk_stmts(bulk);
        }
        if let Some(bulk_for_inserts) = bulk_for_inserts {
            builder = builder.with_use_bulk_stmts_for_inserts(bulk_for_inserts);
        }
        assert_eq!(builder.build().unwrap().use_bulk_stmts_for_inserts(), resolved);
    }

    #[test]
    fn test_local_socket_substitutes_empty_host_list() {
        let conf = Configuration::builder()
            .with_local_socket("/var/run/mysqld/mysqld.sock")
            .build()
            .unwrap();
        assert_eq!(conf.addresses().len(), 1);
        assert_eq!(
            conf.addresses()[0].local_socket_path(),
            Some("/var/run/mysqld/mysqld.sock")
        );
        assert!(conf.addresses()[0].is_primary());
    }

    #[test]
    fn test_local_socket_propagates_to_hosts() {
        let conf = parse("jdbc:mariadb://h1,h2/db?localSocket=/tmp/m.sock");
        assert!(conf
            .addresses()
            .iter()
            .all(|a| a.local_socket_path() == Some("/tmp/m.sock")));
    }

    #[test]
    fn test_legacy_use_ssl_shim() {
        let _ = env_logger::builder().is_test(true).try_init();
        let conf = parse("jdbc:mariadb://localhost/db?useSsl=true");
        assert_eq!(conf.ssl_mode(), SslMode::VerifyFull);
        // the deprecated key stays visible in the bag
        assert_eq!(
            conf.non_mapped_options().get("useSsl"),
            Some(&"true".to_string())
        );

        let conf = parse("jdbc:mariadb://localhost/db?useSsl=1&trustServerCertificate=true");
        assert_eq!(conf.ssl_mode(), SslMode::Trust);

        let conf =
            parse("jdbc:mariadb://localhost/db?useSSL=1&disableSslHostnameVerification=true");
        assert_eq!(conf.ssl_mode(), SslMode::VerifyCa);

        let conf = parse("jdbc:mariadb://localhost/db?useSsl=false");
        assert_eq!(conf.ssl_mode(), SslMode::Disable);
    }

    #[rstest]
    #[case("disable", SslMode::Disable)]
    #[case("trust", SslMode::Trust)]
    #[case("verify-ca", SslMode::VerifyCa)]
    #[case("VERIFY_CA", SslMode::VerifyCa)]
    #[case("verify-full", SslMode::VerifyFull)]
    #[case("1", SslMode::Trust)]
    #[case("0", SslMode::Disable)]
    fn test_ssl_mode_values(#[case] value: &str, #[case] mode: SslMode) {
        let conf = parse(&format!("jdbc:mariadb://localhost/db?sslMode={}", value));
        assert_eq!(conf.ssl_mode(), mode);
    }

    #[test]
    fn test_transaction_isolation_values() {
        let conf = parse("jdbc:mariadb://localhost/db?transactionIsolation=READ-COMMITTED");
        assert_eq!(
            conf.transaction_isolation(),
            Some(TransactionIsolation::ReadCommitted)
        );
        assert!(
            Configuration::parse("jdbc:mariadb://localhost/db?transactionIsolation=NONE").is_err()
        );
    }

    #[test]
    fn test_server_rsa_public_key_file_empty_is_unset() {
        let conf = Configuration::builder()
            .add_host("localhost", 3306)
            .with_server_rsa_public_key_file("")
            .build()
            .unwrap();
        assert_eq!(conf.server_rsa_public_key_file(), None);
    }

    #[test]
    fn test_equality_is_canonical_url_plus_password() {
        let a = parse("jdbc:mariadb://localhost/db?user=a&password=one");
        let b = parse("jdbc:mariadb://localhost/db?user=a&password=one");
        let c = parse("jdbc:mariadb://localhost/db?user=a&password=two");
        let d = parse("jdbc:mariadb://localhost/db?user=a");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(d, parse("jdbc:mariadb://localhost/db?user=a"));
    }

    #[test]
    fn test_clone_with_credentials() {
        let conf = parse("jdbc:mariadb://localhost/db?user=a&password=one&socketTimeout=5");
        let derived = conf.clone_with_credentials(Some("b"), Some("two")).unwrap();
        assert_eq!(derived.user(), Some("b"));
        assert_eq!(derived.password(), Some("two"));
        assert_eq!(derived.socket_timeout(), 5);
        assert_eq!(derived.database(), Some("db"));
        // empty strings unset the credentials
        let anonymous = conf.clone_with_credentials(Some(""), Some("")).unwrap();
        assert_eq!(anonymous.user(), None);
        assert_eq!(anonymous.password(), None);
    }

    #[test]
    fn test_to_builder_is_deep() {
        let conf = parse("jdbc:mariadb://h1,h2/db?user=a");
        let rebuilt = conf.to_builder().build().unwrap();
        assert_eq!(conf, rebuilt);
        // editing the derived builder leaves the original untouched
        let edited = conf.to_builder().with_database("other").build().unwrap();
        assert_eq!(conf.database(), Some("db"));
        assert_eq!(edited.database(), Some("other"));
    }

    #[test]
    fn test_codecs_are_discovered_at_build() {
        let conf = parse("jdbc:mariadb://localhost/db");
        assert!(!conf.codecs().is_empty());
    }

    #[rstest]
    #[case("jdbc:mariadb://localhost/db?user=greg")]
    #[case("jdbc:mariadb://localhost:3307/db")]
    #[case("jdbc:mariadb:replication://h1,h2:3310/db?user=a")]
    #[case("jdbc:mariadb:loadbalance://h1,h2/db")]
    #[case("jdbc:mariadb://host1,address=(type=replica)(port=3307)(host=host2)/db?user=a")]
    #[case("jdbc:mariadb://localhost/db?socketTimeout=5000&pool=true&maxPoolSize=3")]
    #[case("jdbc:mariadb://localhost/db?unknownOpt=1&anotherOne=x")]
    #[case("jdbc:mariadb://localhost/db?timezone=disable")]
    #[case("jdbc:mariadb://localhost/db?sslMode=verify-ca&useCatalogTerm=SCHEMA")]
    fn test_canonical_round_trip(#[case] url: &str) {
        let first = parse(url);
        let second = parse(first.initial_url());
        assert_eq!(first, second);
        assert_eq!(first.initial_url(), second.initial_url());
    }
}
