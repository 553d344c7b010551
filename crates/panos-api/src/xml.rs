// Minimal XML element tree used for both directions of the XML API:
// building `cmd=` payloads and walking `<response>` envelopes.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use crate::error::Error;

/// A generic XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub tag: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// `<tag>text</tag>`
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// `<entry name="..."/>`
    pub fn entry(name: impl Into<String>) -> Self {
        Self::new("entry").attr("name", name)
    }

    /// `<tag><member>a</member><member>b</member></tag>`
    pub fn members<I, S>(tag: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut el = Self::new(tag);
        el.children = members
            .into_iter()
            .map(|m| Self::with_text("member", m))
            .collect();
        el
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// First direct child with `tag`.
    pub fn find(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All direct children with `tag`.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Walk a `/`-separated path of child tags.
    pub fn path(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |el, tag| el.find(tag))
    }

    /// Trimmed text of the element at `path`, if present and non-empty.
    pub fn text_at(&self, path: &str) -> Option<&str> {
        self.path(path)
            .and_then(|el| el.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of this element and every descendant, one
    /// fragment per non-empty text node, joined with `sep`.
    ///
    /// PAN-OS messages come either as bare text or as `<line>` children
    /// (sometimes nested), so callers flatten them with this.
    pub fn flatten_text(&self, sep: &str) -> String {
        let mut parts = Vec::new();
        collect_text(self, &mut parts);
        parts.join(sep)
    }

    // ── Serialization ────────────────────────────────────────────────

    /// Serialize to a compact XML string.
    pub fn to_xml(&self) -> Result<String, Error> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self).map_err(|e| Error::Encoding(e.to_string()))?;
        String::from_utf8(writer.into_inner()).map_err(|e| Error::Encoding(e.to_string()))
    }
}

fn collect_text<'a>(el: &'a XmlElement, out: &mut Vec<&'a str>) {
    if let Some(text) = el.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        out.push(text);
    }
    for child in &el.children {
        collect_text(child, out);
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &XmlElement) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(el.tag.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() && el.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &el.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &el.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(el.tag.as_str())))?;
    Ok(())
}

/// Parse an XML document into its root element.
pub fn parse(body: &str) -> Result<XmlElement, Error> {
    let malformed = |message: String| Error::Deserialization {
        message,
        body: body.to_owned(),
    };

    let mut reader = Reader::from_str(body);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(format!("invalid XML: {e}")))?;
        match event {
            Event::Start(e) => {
                stack.push(start_element(&e, &reader).map_err(&malformed)?);
            }
            Event::Empty(e) => {
                let el = start_element(&e, &reader).map_err(&malformed)?;
                attach(&mut stack, &mut root, el).map_err(&malformed)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| malformed(format!("invalid text: {e}")))?;
                    append_text(current, &text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = std::str::from_utf8(e.as_ref())
                        .map_err(|e| malformed(format!("invalid UTF-8 in CDATA: {e}")))?;
                    append_text(current, text);
                }
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| malformed("closing tag without open tag".into()))?;
                attach(&mut stack, &mut root, el).map_err(&malformed)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed("unclosed element(s) at end of document".into()));
    }
    root.ok_or_else(|| malformed("no root element found".into()))
}

fn append_text(el: &mut XmlElement, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    match &mut el.text {
        Some(existing) => existing.push_str(text),
        None => el.text = Some(text.to_owned()),
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    el: XmlElement,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        Ok(())
    } else if root.is_none() {
        *root = Some(el);
        Ok(())
    } else {
        Err("multiple top-level elements found".into())
    }
}

fn start_element(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<XmlElement, String> {
    let mut el = XmlElement::new(qname_to_string(e.name())?);
    for attr in e.attributes() {
        let attr = attr.map_err(|e| format!("invalid attribute: {e}"))?;
        let key = qname_to_string(attr.key)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| format!("invalid attribute value: {e}"))?
            .into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn qname_to_string(name: QName<'_>) -> Result<String, String> {
    std::str::from_utf8(name.as_ref())
        .map(str::to_owned)
        .map_err(|e| format!("invalid UTF-8 in name: {e}"))
}
