use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// Identifiers are interpolated into request paths, so every pattern excludes
// characters that would need percent-encoding.
macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                static PATTERN: OnceLock<Regex> = OnceLock::new();
                let s = value.into();
                if s.is_empty() {
                    return Err(ValidationError::Empty {
                        kind: stringify!($name),
                    });
                }
                let pattern = PATTERN.get_or_init(|| Regex::new($pattern).expect("invalid regex"));
                if !pattern.is_match(&s) {
                    return Err(ValidationError::Malformed {
                        kind: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    PackageName,
    "Android application id such as `com.example.app` (at least two dot-separated segments).",
    r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$"
);
newtype!(
    ProductId,
    "In-app product SKU: lowercase letters, digits, `_` and `.`, starting with a letter or digit.",
    r"^[a-z0-9][a-z0-9_.]{0,138}$"
);
newtype!(
    SubscriptionId,
    "Subscription product id, same alphabet as [`ProductId`].",
    r"^[a-z0-9][a-z0-9_.]{0,138}$"
);
newtype!(
    PurchaseToken,
    "Opaque purchase token issued by Play Billing on the device.",
    r"^[A-Za-z0-9._-]{1,4096}$"
);
