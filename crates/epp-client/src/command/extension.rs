//! The `<extension>` block shared by object commands.

use epp_types::{Extension, Greeting};

use super::xml::XmlWriter;
use crate::greeting::fee_revision;
use crate::namespace;

/// Command verb an extension block is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verb {
    Check,
    Create,
    Info,
    Renew,
    Transfer,
    Update,
    Delete,
}

impl Verb {
    fn as_str(self) -> &'static str {
        match self {
            Verb::Check => "check",
            Verb::Create => "create",
            Verb::Info => "info",
            Verb::Renew => "renew",
            Verb::Transfer => "transfer",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }

    fn accepts_fee(self) -> bool {
        matches!(
            self,
            Verb::Create | Verb::Renew | Verb::Transfer | Verb::Update
        )
    }
}

/// Lazily opened `<extension>` element: written only if something goes in.
pub(crate) struct ExtensionBlock<'w> {
    w: &'w mut XmlWriter,
    opened: bool,
}

impl<'w> ExtensionBlock<'w> {
    pub(crate) fn new(w: &'w mut XmlWriter) -> Self {
        Self { w, opened: false }
    }

    /// Writer positioned inside `<extension>`.
    pub(crate) fn writer(&mut self) -> &mut XmlWriter {
        if !self.opened {
            self.w.open("extension");
            self.opened = true;
        }
        &mut *self.w
    }

    /// Add the domain extensions that apply to `verb` and that the server
    /// advertises. Blank values are skipped.
    pub(crate) fn domain(&mut self, greeting: &Greeting, verb: Verb, extensions: &[Extension]) {
        if let Some(uri) = fee_revision(greeting).filter(|_| verb.accepts_fee()) {
            for ext in extensions {
                if let Extension::Fee { amount, currency } = ext
                    && !amount.is_empty()
                {
                    let tag = format!("fee:{}", verb.as_str());
                    self.writer()
                        .open_ns(&tag, "fee", uri)
                        .optional("fee:currency", currency.as_deref())
                        .element("fee:fee", amount)
                        .close(&tag);
                }
            }
        }

        let launch = verb == Verb::Create && greeting.supports_extension(namespace::EXT_LAUNCH);
        for ext in extensions {
            if let Extension::LaunchPhase { phase } = ext
                && launch
                && !phase.is_empty()
            {
                self.writer()
                    .open_ns("launch:create", "launch", namespace::EXT_LAUNCH)
                    .element("launch:phase", phase)
                    .close("launch:create");
            }
        }

        if greeting.supports_extension(namespace::EXT_NAMESTORE) {
            for ext in extensions {
                if let Extension::Namestore { sub_product } = ext
                    && !sub_product.is_empty()
                {
                    self.writer()
                        .open_ns("namestoreExt:namestoreExt", "namestoreExt", namespace::EXT_NAMESTORE)
                        .element("namestoreExt:subProduct", sub_product)
                        .close("namestoreExt:namestoreExt");
                }
            }
        }
    }

    pub(crate) fn finish(self) {
        if self.opened {
            self.w.close("extension");
        }
    }
}

/// Write the domain extensions that apply to `verb`, if any.
pub(crate) fn write_domain_extensions(
    w: &mut XmlWriter,
    greeting: &Greeting,
    verb: Verb,
    extensions: &[Extension],
) {
    let mut block = ExtensionBlock::new(w);
    block.domain(greeting, verb, extensions);
    block.finish();
}
