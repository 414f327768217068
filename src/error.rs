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

use thiserror::Error;

/// Errors raised while parsing and validating a connection configuration.
///
/// No variant is recoverable into a partial configuration: every failure
/// aborts the build and nothing is returned to the caller.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MariadbError {
    /// used when
    ///  * the connection string violates the URL grammar
    ///    (missing `//`, unknown HA-mode token, malformed host descriptor)
    ///  * a cross-field rule rejects a literal
    ///    (collation, catalog term, SSL mode)
    ///
    /// The message carries the offending fragment and, where it helps,
    /// the full original input.
    #[error("error parsing url: {message}")]
    UrlFormat { message: String },
    /// used when a supplied option value does not match the declared kind
    /// of its option (boolean or integer).
    #[error("optional parameter {key} must be {expected}, was '{value}'")]
    OptionType {
        key: String,
        value: String,
        expected: &'static str,
    },
    /// used when a resolved configuration violates an invariant,
    /// e.g., a negative integer option.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
    /// used when a non-empty credential plugin type matches no registered
    /// plugin.
    #[error("no credential plugin registered with type '{name}'")]
    UnknownCredentialPlugin { name: String },
}

impl MariadbError {
    pub(crate) fn url_format<S: Into<String>>(message: S) -> Self {
        Self::UrlFormat {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MariadbError>;
