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

//! Key material helper for the `PARSEC` credential mechanism.

use ed25519_dalek::SigningKey;

/// Derive the raw Ed25519 public key belonging to a raw private key.
///
/// Scalar clamping, base-point multiplication, and the RFC 8032 point
/// encoding are delegated to [`ed25519_dalek`]. Invoked once when the
/// authentication mechanism is instantiated, never on a per-packet path.
pub fn derive_public_key(raw_private_key: &[u8; 32]) -> [u8; 32] {
    SigningKey::from_bytes(raw_private_key)
        .verifying_key()
        .to_bytes()
}
