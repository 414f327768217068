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

//! # MariaDB connection configuration
//!
//! This crate resolves a MariaDB/MySQL connection string plus an optional
//! overlay of key/value properties into a single immutable, fully-validated
//! [`Configuration`]. Every other layer of a client (socket transport, TLS,
//! authentication, statement execution, pooling) treats that object as
//! ground truth; none of those layers live here.
//!
//! ## Parsing a connection string
//! ```
//! use mariadb::{Configuration, SslMode};
//!
//! let conf = Configuration::parse(
//!     "jdbc:mariadb://host1,address=(type=replica)(port=3307)(host=host2)/db\
//!      ?user=greg&sslMode=verify-full",
//! )
//! .unwrap();
//!
//! assert_eq!(conf.database(), Some("db"));
//! assert_eq!(conf.ssl_mode(), SslMode::VerifyFull);
//! assert_eq!(conf.addresses().len(), 2);
//! assert!(conf.addresses()[0].is_primary());
//! assert!(!conf.addresses()[1].is_primary());
//! ```
//!
//! ## Building programmatically
//! ```
//! use mariadb::Configuration;
//!
//! let conf = Configuration::builder()
//!     .add_host("localhost", 3306)
//!     .with_user("app")
//!     .with_database("shop")
//!     .build()
//!     .unwrap();
//! assert_eq!(conf.initial_url(), "jdbc:mariadb://localhost/shop?user=app");
//! ```
//!
//! The canonical URL ([`Configuration::initial_url`]) is deterministic,
//! omits default values, redacts secrets, and doubles as the
//! configuration's identity: two configurations are equal when their
//! canonical URL and password match.
//!
//! Configurations are immutable and safe to share across threads. To vary
//! one, derive a builder with [`Configuration::to_builder`] (or swap
//! credentials directly with [`Configuration::clone_with_credentials`])
//! and build again; building re-runs the whole validation pass.

pub mod address;
pub mod config;
pub mod error;
pub mod plugin;

pub use address::HostAddress;
pub use config::{
    CatalogTerm, Configuration, ConfigurationBuilder, HaMode, SslMode, TransactionIsolation,
};
pub use error::{MariadbError, Result};
