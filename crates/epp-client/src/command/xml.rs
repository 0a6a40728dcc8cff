//! Minimal writer for outgoing documents.
//!
//! Commands are small and their shape is fixed, so they are assembled as text.
//! Every caller-supplied value goes through [`XmlWriter::text`] or an
//! attribute helper, which escape markup.

use quick_xml::escape::escape;

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const EPP_OPEN: &str = "<epp xmlns=\"urn:ietf:params:xml:ns:epp-1.0\">";
const EPP_CLOSE: &str = "</epp>";

pub(crate) struct XmlWriter {
    buf: String,
}

impl XmlWriter {
    /// Start a document inside `<epp>`.
    pub(crate) fn document() -> Self {
        let mut buf = String::with_capacity(512);
        buf.push_str(XML_DECL);
        buf.push_str(EPP_OPEN);
        Self { buf }
    }

    /// Start a document inside `<epp><command>`.
    pub(crate) fn command() -> Self {
        let mut w = Self::document();
        w.raw("<command>");
        w
    }

    /// Append markup verbatim.
    pub(crate) fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Append escaped character data.
    pub(crate) fn text(&mut self, value: &str) -> &mut Self {
        self.buf.push_str(&escape(value));
        self
    }

    pub(crate) fn open(&mut self, tag: &str) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Open an element that declares its own namespace prefix.
    pub(crate) fn open_ns(&mut self, tag: &str, prefix: &str, uri: &str) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push_str(" xmlns:");
        self.buf.push_str(prefix);
        self.buf.push_str("=\"");
        self.buf.push_str(&escape(uri));
        self.buf.push_str("\">");
        self
    }

    /// Open an element with one attribute.
    pub(crate) fn open_attr(&mut self, tag: &str, name: &str, value: &str) -> &mut Self {
        self.start_attr(tag, name, value);
        self.buf.push('>');
        self
    }

    /// Self-closing element with one attribute.
    pub(crate) fn empty_attr(&mut self, tag: &str, name: &str, value: &str) -> &mut Self {
        self.start_attr(tag, name, value);
        self.buf.push_str("/>");
        self
    }

    pub(crate) fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// `<tag>value</tag>`
    pub(crate) fn element(&mut self, tag: &str, value: &str) -> &mut Self {
        self.open(tag).text(value).close(tag)
    }

    /// `<tag>value</tag>`, or nothing when the value is absent or empty.
    pub(crate) fn optional(&mut self, tag: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.is_empty() => self.element(tag, v),
            _ => self,
        }
    }

    /// `<tag name="attr">value</tag>`
    pub(crate) fn element_attr(&mut self, tag: &str, name: &str, attr: &str, value: &str) -> &mut Self {
        self.open_attr(tag, name, attr).text(value).close(tag)
    }

    fn start_attr(&mut self, tag: &str, name: &str, value: &str) {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        self.buf.push_str(&escape(value));
        self.buf.push('"');
    }

    /// Close `<command>` (after an optional `<clTRID>`) and the document.
    pub(crate) fn finish_command(mut self, cl_trid: Option<&str>) -> Vec<u8> {
        self.optional("clTRID", cl_trid);
        self.raw("</command>");
        self.finish()
    }

    /// Close the document.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.raw(EPP_CLOSE);
        self.buf.into_bytes()
    }
}
