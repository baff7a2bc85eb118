use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines a string-backed identifier newtype.
///
/// The marketplace uses opaque document ids (e.g. `"kd93LqPz0aV1"`) for every
/// entity, so all identifiers share the same shape and conversions.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// The consultant offering the service.
    ProviderId
);
string_id!(
    /// The student booking the service.
    ConsumerId
);
string_id!(ServiceId);
string_id!(BookingId);
string_id!(
    /// Identifier of a cart line, derived from its provider/service pair.
    CartLineId
);

impl CartLineId {
    /// `"{provider length}:{provider}-{service}"`. The length prefix keeps ids
    /// distinct for pairs whose ids contain the separator themselves.
    pub fn for_pair(provider_id: &ProviderId, service_id: &ServiceId) -> Self {
        Self(format!(
            "{}:{}-{}",
            provider_id.as_str().len(),
            provider_id,
            service_id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_line_id_joins_pair() {
        let id = CartLineId::for_pair(&ProviderId::new("c1"), &ServiceId::new("svc"));
        assert_eq!(id.as_str(), "2:c1-svc");
    }

    #[test]
    fn cart_line_ids_do_not_collide_on_separator() {
        let left = CartLineId::for_pair(&ProviderId::new("a-b"), &ServiceId::new("c"));
        let right = CartLineId::for_pair(&ProviderId::new("a"), &ServiceId::new("b-c"));
        assert_ne!(left, right);
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = BookingId::from("b-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"b-42\"");
    }
}
