//! Boundary to the platform credential store. Resolving the handle (bundle
//! lookup, entitlement checks) happens outside this crate.

/// Access-control handle for keychain-backed secrets, if the platform
/// provides one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SecurityAccess<H> {
    Present(H),
    Absent,
}

impl<H> SecurityAccess<H> {
    pub fn is_present(&self) -> bool {
        matches!(self, SecurityAccess::Present(_))
    }

    pub fn as_ref(&self) -> SecurityAccess<&H> {
        match self {
            SecurityAccess::Present(handle) => SecurityAccess::Present(handle),
            SecurityAccess::Absent => SecurityAccess::Absent,
        }
    }

    pub fn into_option(self) -> Option<H> {
        match self {
            SecurityAccess::Present(handle) => Some(handle),
            SecurityAccess::Absent => None,
        }
    }
}

impl<H> From<Option<H>> for SecurityAccess<H> {
    fn from(handle: Option<H>) -> Self {
        match handle {
            Some(handle) => SecurityAccess::Present(handle),
            None => SecurityAccess::Absent,
        }
    }
}

pub trait SecurityAccessSource {
    type Handle;

    fn security_access(&self) -> SecurityAccess<Self::Handle>;
}

#[cfg(test)]
mod tests {
    use super::{SecurityAccess, SecurityAccessSource};

    struct FixedSource(Option<&'static str>);

    impl SecurityAccessSource for FixedSource {
        type Handle = &'static str;

        fn security_access(&self) -> SecurityAccess<Self::Handle> {
            self.0.into()
        }
    }

    #[test]
    fn maps_optional_handles() {
        let present = FixedSource(Some("team.keychain")).security_access();
        assert!(present.is_present());
        assert_eq!(present.as_ref().into_option(), Some(&"team.keychain"));
        assert_eq!(FixedSource(None).security_access(), SecurityAccess::Absent);
    }
}
