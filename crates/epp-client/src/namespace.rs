//! Namespace URIs of the EPP core, the object mappings and the registry
//! extensions this client understands.

pub const EPP: &str = "urn:ietf:params:xml:ns:epp-1.0";

pub const OBJ_DOMAIN: &str = "urn:ietf:params:xml:ns:domain-1.0";
pub const OBJ_CONTACT: &str = "urn:ietf:params:xml:ns:contact-1.0";
pub const OBJ_HOST: &str = "urn:ietf:params:xml:ns:host-1.0";
pub const OBJ_FINANCE: &str = "http://www.unitedtld.com/epp/finance-1.0";

pub const EXT_CHARGE: &str = "http://www.unitedtld.com/epp/charge-1.0";
pub const EXT_FEE_05: &str = "urn:ietf:params:xml:ns:fee-0.5";
pub const EXT_FEE_06: &str = "urn:ietf:params:xml:ns:fee-0.6";
pub const EXT_FEE_10: &str = "urn:ietf:params:xml:ns:epp:fee-1.0";
pub const EXT_IDN: &str = "urn:ietf:params:xml:ns:idn-1.0";
pub const EXT_LAUNCH: &str = "urn:ietf:params:xml:ns:launch-1.0";
pub const EXT_NAMESTORE: &str = "http://www.verisign-grs.com/epp/namestoreExt-1.1";
pub const EXT_RGP: &str = "urn:ietf:params:xml:ns:rgp-1.0";
pub const EXT_SECDNS: &str = "urn:ietf:params:xml:ns:secDNS-1.1";

/// Object mappings offered at login when the server advertises them.
pub const OBJECTS: &[&str] = &[OBJ_CONTACT, OBJ_DOMAIN, OBJ_FINANCE, OBJ_HOST];

/// Extensions offered at login when the server advertises them.
pub const EXTENSIONS: &[&str] = &[
    EXT_CHARGE,
    EXT_FEE_05,
    EXT_FEE_06,
    EXT_FEE_10,
    EXT_IDN,
    EXT_LAUNCH,
    EXT_NAMESTORE,
    EXT_RGP,
    EXT_SECDNS,
];

/// Fee revisions in order of preference.
pub const FEE_REVISIONS: &[&str] = &[EXT_FEE_10, EXT_FEE_06, EXT_FEE_05];

/// Canonical prefix used in decoder paths for each namespace.
pub(crate) const PREFIXES: &[(&str, &str)] = &[
    ("epp", EPP),
    ("domain", OBJ_DOMAIN),
    ("contact", OBJ_CONTACT),
    ("host", OBJ_HOST),
    ("finance", OBJ_FINANCE),
    ("charge", EXT_CHARGE),
    ("fee05", EXT_FEE_05),
    ("fee06", EXT_FEE_06),
    ("fee", EXT_FEE_10),
    ("idn", EXT_IDN),
    ("launch", EXT_LAUNCH),
    ("namestoreExt", EXT_NAMESTORE),
    ("rgp", EXT_RGP),
    ("secDNS", EXT_SECDNS),
];

/// Resolve a canonical prefix to its namespace URI.
pub(crate) fn resolve_prefix(prefix: &str) -> Option<&'static str> {
    PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefix() {
        assert_eq!(resolve_prefix("domain"), Some(OBJ_DOMAIN));
        assert_eq!(resolve_prefix("fee"), Some(EXT_FEE_10));
        assert_eq!(resolve_prefix("nope"), None);
    }

    #[test]
    fn test_fee_revisions_are_offered_at_login() {
        for rev in FEE_REVISIONS {
            assert!(EXTENSIONS.contains(rev));
        }
    }
}
