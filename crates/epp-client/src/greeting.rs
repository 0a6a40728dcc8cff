//! Decoding of the server `<greeting>`.

use std::sync::LazyLock;

use epp_types::Greeting;

use crate::decoder::{DecodeError, Scanner, ScannerBuilder};
use crate::namespace;
use crate::response::parse_time;

#[derive(Default)]
struct GreetingDoc {
    greeting: Greeting,
    seen: bool,
}

static SCANNER: LazyLock<Scanner<GreetingDoc>> = LazyLock::new(|| {
    let g = "epp > greeting";
    let mut b: ScannerBuilder<GreetingDoc> = Scanner::builder();
    b.on_start(g, |d, _| {
        d.seen = true;
        Ok(())
    })
    .on_text(&format!("{g} > svID"), |d, s| {
        s.clone_into(&mut d.greeting.server_name);
        Ok(())
    })
    .on_text(&format!("{g} > svDate"), |d, s| {
        d.greeting.server_date = Some(parse_time(s)?);
        Ok(())
    })
    .on_text(&format!("{g} > svcMenu > version"), |d, s| {
        d.greeting.versions.push(s.to_string());
        Ok(())
    })
    .on_text(&format!("{g} > svcMenu > lang"), |d, s| {
        d.greeting.languages.push(s.to_string());
        Ok(())
    })
    .on_text(&format!("{g} > svcMenu > objURI"), |d, s| {
        d.greeting.objects.push(s.to_string());
        Ok(())
    })
    .on_text(&format!("{g} > svcMenu > svcExtension > extURI"), |d, s| {
        d.greeting.extensions.push(s.to_string());
        Ok(())
    });
    b.build().expect("greeting handler paths use known namespace prefixes")
});

/// Decode a `<greeting>` document.
///
/// # Errors
///
/// Returns a `DecodeError` for malformed XML or when the document is not a
/// greeting.
pub fn decode_greeting(input: &[u8]) -> Result<Greeting, DecodeError> {
    let mut doc = GreetingDoc::default();
    SCANNER.scan(input, &mut doc)?;
    if !doc.seen {
        return Err(DecodeError::Missing("greeting"));
    }
    Ok(doc.greeting)
}

/// Fee revision to speak with this server, most recent first.
#[must_use]
pub fn fee_revision(greeting: &Greeting) -> Option<&'static str> {
    namespace::FEE_REVISIONS
        .iter()
        .copied()
        .find(|uri| greeting.supports_extension(uri))
}

/// Services to request at login: everything the server offers that this
/// client understands, in the client's order.
#[must_use]
pub fn negotiate_services(greeting: &Greeting) -> (Vec<&'static str>, Vec<&'static str>) {
    let objects = namespace::OBJECTS
        .iter()
        .copied()
        .filter(|uri| greeting.supports_object(uri))
        .collect();
    let extensions = namespace::EXTENSIONS
        .iter()
        .copied()
        .filter(|uri| greeting.supports_extension(uri))
        .collect();
    (objects, extensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <greeting>
    <svID>Example EPP server epp.example.com</svID>
    <svDate>2000-06-08T22:00:00.0Z</svDate>
    <svcMenu>
      <version>1.0</version>
      <lang>en</lang>
      <lang>fr</lang>
      <objURI>urn:ietf:params:xml:ns:domain-1.0</objURI>
      <objURI>urn:ietf:params:xml:ns:contact-1.0</objURI>
      <objURI>urn:example:unknown-1.0</objURI>
      <svcExtension>
        <extURI>urn:ietf:params:xml:ns:fee-0.6</extURI>
        <extURI>urn:ietf:params:xml:ns:rgp-1.0</extURI>
      </svcExtension>
    </svcMenu>
    <dcp><access><all/></access><statement><purpose><admin/></purpose><recipient><ours/></recipient><retention><stated/></retention></statement></dcp>
  </greeting>
</epp>"#;

    #[test]
    fn test_decode_greeting() {
        let greeting = decode_greeting(GREETING.as_bytes()).unwrap();
        assert_eq!(greeting.server_name, "Example EPP server epp.example.com");
        assert!(greeting.server_date.is_some());
        assert_eq!(greeting.versions, vec!["1.0"]);
        assert_eq!(greeting.languages, vec!["en", "fr"]);
        assert_eq!(greeting.objects.len(), 3);
        assert!(greeting.supports_extension(namespace::EXT_RGP));
    }

    #[test]
    fn test_response_is_not_a_greeting() {
        let xml = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0"><response><result code="1000"><msg>ok</msg></result></response></epp>"#;
        assert!(matches!(
            decode_greeting(xml.as_bytes()),
            Err(DecodeError::Missing("greeting"))
        ));
    }

    #[test]
    fn test_fee_revision_preference() {
        let greeting = decode_greeting(GREETING.as_bytes()).unwrap();
        assert_eq!(fee_revision(&greeting), Some(namespace::EXT_FEE_06));
        assert_eq!(fee_revision(&Greeting::default()), None);

        let both = Greeting {
            extensions: vec![
                namespace::EXT_FEE_05.to_string(),
                namespace::EXT_FEE_10.to_string(),
            ],
            ..Greeting::default()
        };
        assert_eq!(fee_revision(&both), Some(namespace::EXT_FEE_10));
    }

    #[test]
    fn test_negotiate_services_drops_unknown() {
        let greeting = decode_greeting(GREETING.as_bytes()).unwrap();
        let (objects, extensions) = negotiate_services(&greeting);
        assert_eq!(objects, vec![namespace::OBJ_CONTACT, namespace::OBJ_DOMAIN]);
        assert_eq!(extensions, vec![namespace::EXT_FEE_06, namespace::EXT_RGP]);
    }
}
