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

//! Value-codec discovery.
//!
//! Codecs translate between wire column values and client types. The
//! configuration engine only enumerates them once per build and stores the
//! result opaquely; encoding/decoding lives in the statement layer.

use std::fmt::Debug;

pub trait Codec: Debug + Send + Sync {
    /// Codec identifier, unique within the registry.
    fn name(&self) -> &'static str;
}

macro_rules! marker_codec {
    ($struct_name:ident, $name:literal) => {
        #[derive(Debug)]
        pub(crate) struct $struct_name;

        impl Codec for $struct_name {
            fn name(&self) -> &'static str {
                $name
            }
        }
    };
}

marker_codec!(TextCodec, "text");
marker_codec!(IntCodec, "int");
marker_codec!(FloatCodec, "float");
marker_codec!(BinaryCodec, "binary");
marker_codec!(TemporalCodec, "temporal");

static CODECS: &[&dyn Codec] = &[
    &TextCodec,
    &IntCodec,
    &FloatCodec,
    &BinaryCodec,
    &TemporalCodec,
];

/// Enumerate the available codecs. Called once per configuration build.
pub fn discover() -> &'static [&'static dyn Codec] {
    CODECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_is_stable() {
        let names: Vec<_> = discover().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["text", "int", "float", "binary", "temporal"]);
    }
}
