use super::EncodeContext;
use super::xml::XmlWriter;
use crate::greeting::negotiate_services;

/// `<hello/>`: asks the server for a fresh greeting.
#[must_use]
pub fn encode_hello() -> Vec<u8> {
    let mut w = XmlWriter::document();
    w.raw("<hello/>");
    w.finish()
}

/// `<login>`, offering every object and extension both sides support.
#[must_use]
pub fn encode_login(
    ctx: &EncodeContext<'_>,
    user: &str,
    password: &str,
    new_password: Option<&str>,
) -> Vec<u8> {
    let (objects, extensions) = negotiate_services(ctx.greeting);

    let mut w = XmlWriter::command();
    w.open("login")
        .element("clID", user)
        .element("pw", password)
        .optional("newPW", new_password)
        .raw("<options><version>1.0</version><lang>en</lang></options>")
        .open("svcs");
    for uri in objects {
        w.element("objURI", uri);
    }
    if !extensions.is_empty() {
        w.open("svcExtension");
        for uri in extensions {
            w.element("extURI", uri);
        }
        w.close("svcExtension");
    }
    w.close("svcs").close("login");
    w.finish_command(ctx.cl_trid)
}

#[must_use]
pub fn encode_logout(ctx: &EncodeContext<'_>) -> Vec<u8> {
    let mut w = XmlWriter::command();
    w.raw("<logout/>");
    w.finish_command(ctx.cl_trid)
}
