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

pub mod codec;
pub mod parsec;

use crate::error::MariadbError;
use crate::Result;

/// Descriptor of a registered credential mechanism.
///
/// A credential plugin names a strategy for sourcing the principal's
/// credentials (environment, properties, derived keys). The configuration
/// engine only consumes its identity and its transport requirement; the
/// authentication exchange itself happens in the protocol layer.
#[derive(Debug)]
pub struct CredentialPlugin {
    type_name: &'static str,
    must_use_ssl: bool,
    derive_public_key: Option<fn(&[u8; 32]) -> [u8; 32]>,
}

impl CredentialPlugin {
    /// Short type name, as referenced by the `credentialType` option.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether this mechanism refuses to run over an unencrypted
    /// transport. Consulted by the SSL-mode resolution during build.
    pub fn must_use_ssl(&self) -> bool {
        self.must_use_ssl
    }

    /// Raw private-key to raw public-key transform for key-based
    /// mechanisms; `None` for password-carrying plugins.
    pub fn derive_public_key(&self) -> Option<fn(&[u8; 32]) -> [u8; 32]> {
        self.derive_public_key
    }
}

static PLUGINS: &[CredentialPlugin] = &[
    CredentialPlugin {
        type_name: "ENV",
        must_use_ssl: false,
        derive_public_key: None,
    },
    CredentialPlugin {
        type_name: "PROPERTY",
        must_use_ssl: false,
        derive_public_key: None,
    },
    CredentialPlugin {
        type_name: "PARSEC",
        must_use_ssl: true,
        derive_public_key: Some(parsec::derive_public_key),
    },
];

/// Look up a credential plugin by its exact type name.
///
/// `None` and the empty string resolve to no plugin; any other unmatched
/// name is an error.
pub fn get(type_name: Option<&str>) -> Result<Option<&'static CredentialPlugin>> {
    let type_name = match type_name {
        None | Some("") => return Ok(None),
        Some(type_name) => type_name,
    };
    PLUGINS
        .iter()
        .find(|plugin| plugin.type_name == type_name)
        .map(Some)
        .ok_or_else(|| MariadbError::UnknownCredentialPlugin {
            name: type_name.into(),
        })
}
