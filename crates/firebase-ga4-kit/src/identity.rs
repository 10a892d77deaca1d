//! User id resolution.

use crate::types::{IdentityType, User};
use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Which user identity is forwarded as the Firebase user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalIdentityType {
    CustomerId,
    /// The host's numeric user id.
    Mpid,
    Other,
    Other2,
    Other3,
    Other4,
    Other5,
    Other6,
    Other7,
    Other8,
    Other9,
    Other10,
}

impl ExternalIdentityType {
    pub const ALL: [ExternalIdentityType; 12] = [
        Self::CustomerId,
        Self::Mpid,
        Self::Other,
        Self::Other2,
        Self::Other3,
        Self::Other4,
        Self::Other5,
        Self::Other6,
        Self::Other7,
        Self::Other8,
        Self::Other9,
        Self::Other10,
    ];

    /// Setting value for this selector.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CustomerId => "CustomerId",
            Self::Mpid => "mpid",
            Self::Other => "Other",
            Self::Other2 => "Other2",
            Self::Other3 => "Other3",
            Self::Other4 => "Other4",
            Self::Other5 => "Other5",
            Self::Other6 => "Other6",
            Self::Other7 => "Other7",
            Self::Other8 => "Other8",
            Self::Other9 => "Other9",
            Self::Other10 => "Other10",
        }
    }

    /// Identity looked up in the user's identity map; `None` for [`Mpid`](Self::Mpid).
    pub fn identity_type(self) -> Option<IdentityType> {
        match self {
            Self::CustomerId => Some(IdentityType::CustomerId),
            Self::Mpid => None,
            Self::Other => Some(IdentityType::Other),
            Self::Other2 => Some(IdentityType::Other2),
            Self::Other3 => Some(IdentityType::Other3),
            Self::Other4 => Some(IdentityType::Other4),
            Self::Other5 => Some(IdentityType::Other5),
            Self::Other6 => Some(IdentityType::Other6),
            Self::Other7 => Some(IdentityType::Other7),
            Self::Other8 => Some(IdentityType::Other8),
            Self::Other9 => Some(IdentityType::Other9),
            Self::Other10 => Some(IdentityType::Other10),
        }
    }
}

impl fmt::Display for ExternalIdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExternalIdentityType {
    type Err = Error;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config(format!("unknown external user identity type: {s}")))
    }
}

/// 32-bit FNV-1a hash.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(PRIME)
    })
}

/// Resolve the outbound user id.
///
/// Returns `None` when no selector is configured or the selected identity
/// is missing or empty. With `hash` set the id is replaced by the decimal
/// FNV-1a hash of its UTF-8 bytes.
pub fn resolve_user_id(
    selector: Option<ExternalIdentityType>,
    user: &User,
    hash: bool,
) -> Option<String> {
    let user_id = match selector?.identity_type() {
        Some(identity_type) => user.identity(identity_type)?.to_string(),
        None => user.mpid.to_string(),
    };

    if user_id.is_empty() {
        return None;
    }

    if hash {
        Some(fnv1a_32(user_id.as_bytes()).to_string())
    } else {
        Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::UserBuilder;

    fn user_with_every_identity() -> User {
        UserBuilder::new(123456789)
            .identity(IdentityType::CustomerId, "customer")
            .identity(IdentityType::Other, "other1")
            .identity(IdentityType::Other2, "other2")
            .identity(IdentityType::Other3, "other3")
            .identity(IdentityType::Other4, "other4")
            .identity(IdentityType::Other5, "other5")
            .identity(IdentityType::Other6, "other6")
            .identity(IdentityType::Other7, "other7")
            .identity(IdentityType::Other8, "other8")
            .identity(IdentityType::Other9, "other9")
            .identity(IdentityType::Other10, "other10")
            .identity(IdentityType::Email, "user@example.com")
            .build()
    }

    #[test]
    fn test_fnv1a_known_vectors() {
        assert_eq!(fnv1a_32(b""), 0x811c9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9cf968);
    }

    #[test]
    fn test_every_selector_resolves() {
        let user = user_with_every_identity();
        let expected = [
            (ExternalIdentityType::CustomerId, "customer"),
            (ExternalIdentityType::Mpid, "123456789"),
            (ExternalIdentityType::Other, "other1"),
            (ExternalIdentityType::Other2, "other2"),
            (ExternalIdentityType::Other3, "other3"),
            (ExternalIdentityType::Other4, "other4"),
            (ExternalIdentityType::Other5, "other5"),
            (ExternalIdentityType::Other6, "other6"),
            (ExternalIdentityType::Other7, "other7"),
            (ExternalIdentityType::Other8, "other8"),
            (ExternalIdentityType::Other9, "other9"),
            (ExternalIdentityType::Other10, "other10"),
        ];
        assert_eq!(expected.len(), ExternalIdentityType::ALL.len());

        for (selector, id) in expected {
            assert_eq!(
                resolve_user_id(Some(selector), &user, false).as_deref(),
                Some(id),
                "selector: {selector}"
            );
            assert_eq!(
                resolve_user_id(Some(selector), &user, true),
                Some(fnv1a_32(id.as_bytes()).to_string()),
                "hashed selector: {selector}"
            );
        }
    }

    #[test]
    fn test_hashed_id_is_decimal() {
        let user = UserBuilder::new(1).identity(IdentityType::CustomerId, "a").build();

        let hashed = resolve_user_id(Some(ExternalIdentityType::CustomerId), &user, true);

        assert_eq!(hashed.as_deref(), Some("3826002220"));
    }

    #[test]
    fn test_missing_or_empty_identity_resolves_nothing() {
        let user = UserBuilder::new(1).identity(IdentityType::Other, "").build();

        assert_eq!(resolve_user_id(Some(ExternalIdentityType::Other), &user, false), None);
        assert_eq!(resolve_user_id(Some(ExternalIdentityType::Other), &user, true), None);
        assert_eq!(resolve_user_id(Some(ExternalIdentityType::CustomerId), &user, false), None);
        assert_eq!(resolve_user_id(None, &user, false), None);
    }

    #[test]
    fn test_selector_parsing_ignores_case() {
        assert_eq!("customerid".parse::<ExternalIdentityType>().unwrap(), ExternalIdentityType::CustomerId);
        assert_eq!("MPID".parse::<ExternalIdentityType>().unwrap(), ExternalIdentityType::Mpid);
        assert_eq!("other10".parse::<ExternalIdentityType>().unwrap(), ExternalIdentityType::Other10);
        for selector in ExternalIdentityType::ALL {
            assert_eq!(selector.as_str().parse::<ExternalIdentityType>().unwrap(), selector);
        }
    }

    #[test]
    fn test_selector_parsing_rejects_unknown() {
        assert!("Email".parse::<ExternalIdentityType>().is_err());
        assert!("Other11".parse::<ExternalIdentityType>().is_err());
        assert!("".parse::<ExternalIdentityType>().is_err());
    }
}
