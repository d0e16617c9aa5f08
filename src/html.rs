//! Rendering of `<time>` elements.

use core::fmt;

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

/// A `<time>` element with a machine readable `datetime` attribute.
///
/// The attribute values and the text content are escaped on write.
#[derive(Debug, Clone, Copy)]
pub struct TimeElement<'a> {
    pub datetime: &'a str,
    /// The `data-format` attribute, written when set.
    pub format: Option<char>,
    /// The `title` attribute, written when set.
    pub title: Option<&'a str>,
    pub text: &'a str,
}

impl<'a> TimeElement<'a> {
    pub fn new(datetime: &'a str, text: &'a str) -> Self {
        Self {
            datetime,
            format: None,
            title: None,
            text,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: char) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }
}

impl Writeable for TimeElement<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        sink.write_str("<time datetime=\"")?;
        Escaped(self.datetime).write_to(sink)?;
        sink.write_char('"')?;
        if let Some(format) = self.format {
            sink.write_str(" data-format=\"")?;
            let mut buffer = [0; 4];
            Escaped(format.encode_utf8(&mut buffer)).write_to(sink)?;
            sink.write_char('"')?;
        }
        if let Some(title) = self.title {
            sink.write_str(" title=\"")?;
            Escaped(title).write_to(sink)?;
            sink.write_char('"')?;
        }
        sink.write_char('>')?;
        Escaped(self.text).write_to(sink)?;
        sink.write_str("</time>")
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let mut hint = LengthHint::exact(25)
            + Escaped(self.datetime).writeable_length_hint()
            + Escaped(self.text).writeable_length_hint();
        if self.format.is_some() {
            hint += LengthHint::between(15, 20);
        }
        if let Some(title) = self.title {
            hint += 9;
            hint += Escaped(title).writeable_length_hint();
        }
        hint
    }
}

impl_display_with_writeable!(TimeElement<'_>);

/// Text escaped for use in HTML content and double quoted attributes.
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'a>(pub &'a str);

impl Writeable for Escaped<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let mut rest = self.0;
        while let Some(index) = rest.find(['&', '<', '>', '"', '\'']) {
            sink.write_str(&rest[..index])?;
            sink.write_str(match rest.as_bytes()[index] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#39;",
            })?;
            rest = &rest[index + 1..];
        }
        sink.write_str(rest)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::between(self.0.len(), self.0.len() * 6)
    }
}

impl_display_with_writeable!(Escaped<'_>);
