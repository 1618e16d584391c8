//! Conversion between yw7 scene markup and novx paragraph markup.
//!
//! yw7 stores scene text as plain lines with shortcodes (`[i]`, `[b]`,
//! `[lang=xx]`, `/*comments*/`, `> ` quotations). novx stores the same
//! text as an XML fragment of `<p>` elements with inline `<em>`,
//! `<strong>`, `<span xml:lang>`, `<comment>` and `<note>` children.

use chrono::Local;
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::{Captures, Regex};

use super::error::Yw7Error;

static FORMAT_CODES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[/?[hcrsu]\d*\]").unwrap());
static SPECIAL_CODES: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["HTM", "TEX", "RTF", "epub", "mobi", "rtfimg"]
        .iter()
        .map(|code| Regex::new(&format!(r"<{code} .+?/{code}>")).unwrap())
        .collect()
});
static NOTE_SHORTCODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\* *@([ef]n\**) (.*?)\*/").unwrap());
static COMMENT_SHORTCODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*(.*?)\*/").unwrap());
static QUOTATION_PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"<p>&gt; (.*?)</p>").unwrap());

/// Converts yw7 scene markup to novx content fragments.
///
/// Footnote/endnote numbering is continuous over a whole project, so one
/// converter instance is used for all scenes of a file read.
pub struct MarkupConverter {
    languages: Vec<String>,
    author: Option<String>,
    note_counter: usize,
    note_number: usize,
}

impl MarkupConverter {
    pub fn new(languages: &[String], author: Option<&str>) -> Self {
        Self {
            languages: languages.to_vec(),
            author: author.map(|a| a.to_string()),
            note_counter: 0,
            note_number: 0,
        }
    }

    /// yw7 scene text -> novx `<p>…</p>` fragment.
    pub fn to_novx(&mut self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let text = text.replace("<RTFBRK>", "");
        let mut text = FORMAT_CODES.replace_all(&text, "").into_owned();
        for code in SPECIAL_CODES.iter() {
            text = code.replace_all(&text, "").into_owned();
        }

        let text = self.balance_emphasis(&text);
        let mut text = self.apply_replacements(&text);

        // Comments and notes; a comment at position zero would be scene
        // metadata yWriter never produces.
        if text.find("/*").map_or(false, |pos| pos > 0) {
            let mut counter = self.note_counter;
            let mut number = self.note_number;
            text = NOTE_SHORTCODE
                .replace_all(&text, |caps: &Captures| {
                    replace_note(caps, &mut counter, &mut number)
                })
                .into_owned();
            self.note_counter = counter;
            self.note_number = number;

            let creator = self
                .author
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            text = COMMENT_SHORTCODE
                .replace_all(&text, |caps: &Captures| {
                    format!(
                        "<comment><creator>{}</creator><date>{}</date><p>{}</p></comment>",
                        creator,
                        Local::now().format("%Y-%m-%dT%H:%M:%S"),
                        &caps[1]
                    )
                })
                .into_owned();
        }

        let text = format!("<p>{text}</p>");
        QUOTATION_PARAGRAPH
            .replace_all(&text, "<p style=\"quotations\">$1</p>")
            .into_owned()
    }

    /// Emphasis and language shortcodes must not span line breaks in the
    /// paragraph model: open tags are closed at the end of the line and
    /// reopened on the next one.
    fn balance_emphasis(&self, text: &str) -> String {
        let mut tags: Vec<String> = vec!["i".to_string(), "b".to_string()];
        for language in &self.languages {
            tags.push(format!("lang={language}"));
        }
        let mut is_open = vec![false; tags.len()];
        let mut newlines: Vec<String> = Vec::new();
        for line in text.split('\n') {
            let mut line = line.to_string();
            for (idx, tag) in tags.iter().enumerate() {
                let opening = format!("[{tag}]");
                let closing = format!("[/{tag}]");
                if is_open[idx] {
                    if let Some(rest) = line.strip_prefix("&gt; ") {
                        line = format!("&gt; {opening}{rest}");
                    } else {
                        line = format!("{opening}{line}");
                    }
                    is_open[idx] = false;
                }
                while line.matches(&opening).count() > line.matches(&closing).count() {
                    line.push_str(&closing);
                    is_open[idx] = true;
                }
                while line.matches(&closing).count() > line.matches(&opening).count() {
                    line = format!("{opening}{line}");
                }
                line = line.replace(&format!("{opening}{closing}"), "");
            }
            newlines.push(line);
        }
        newlines.join("\n").trim_end().to_string()
    }

    fn apply_replacements(&self, text: &str) -> String {
        let mut replacements: Vec<(String, String)> = vec![
            ("&".into(), "&amp;".into()),
            (">".into(), "&gt;".into()),
            ("<".into(), "&lt;".into()),
            ("'".into(), "&apos;".into()),
            ("\"".into(), "&quot;".into()),
            ("\n".into(), "</p><p>".into()),
            ("[i]".into(), "<em>".into()),
            ("[/i]".into(), "</em>".into()),
            ("[b]".into(), "<strong>".into()),
            ("[/b]".into(), "</strong>".into()),
        ];
        for language in &self.languages {
            replacements.push((
                format!("[lang={language}]"),
                format!("<span xml:lang=\"{language}\">"),
            ));
            replacements.push((format!("[/lang={language}]"), "</span>".into()));
        }
        let mut text = text.to_string();
        for (from, to) in &replacements {
            text = text.replace(from, to);
        }
        text
    }
}

fn replace_note(caps: &Captures, counter: &mut usize, number: &mut usize) -> String {
    let note_type = &caps[1];
    *counter += 1;
    *number += 1;
    let mut label = number.to_string();
    let class = if note_type.starts_with("fn") {
        if note_type.ends_with('*') {
            *number -= 1;
            label = "*".to_string();
        }
        "footnote"
    } else {
        "endnote"
    };
    format!(
        "<note id=\"ftn{counter}\" class=\"{class}\"><note-citation>{label}</note-citation><p>{}</p></note>",
        &caps[2]
    )
}

/// novx content fragment -> yw7 scene text with shortcodes.
///
/// Streams over the fragment; the element vocabulary mirrors what
/// [`MarkupConverter::to_novx`] produces.
pub fn novx_to_shortcode(fragment: &str) -> Result<String, Yw7Error> {
    let mut reader = Reader::from_str(fragment);
    let mut out = String::new();
    let mut span_stack: Vec<String> = Vec::new();
    let mut in_paragraph = false;
    let mut in_comment = false;
    loop {
        let event = reader.read_event().map_err(|e| Yw7Error::Malformed {
            message: format!("bad section content: {e}"),
        })?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                start_element(&e, &mut out, &mut span_stack, &mut in_paragraph, &mut in_comment)
                    .map_err(malformed)?;
            }
            Event::Empty(e) => {
                start_element(&e, &mut out, &mut span_stack, &mut in_paragraph, &mut in_comment)
                    .map_err(malformed)?;
                end_element(
                    e.name().as_ref(),
                    &mut out,
                    &mut span_stack,
                    &mut in_paragraph,
                    &mut in_comment,
                );
            }
            Event::End(e) => {
                end_element(
                    e.name().as_ref(),
                    &mut out,
                    &mut span_stack,
                    &mut in_paragraph,
                    &mut in_comment,
                );
            }
            Event::Text(t) => {
                if in_paragraph {
                    let text = t.unescape().map_err(malformed)?;
                    out.push_str(&text);
                }
            }
            _ => {}
        }
    }
    Ok(out)
}

fn malformed(err: quick_xml::Error) -> Yw7Error {
    Yw7Error::Malformed {
        message: format!("bad section content: {err}"),
    }
}

fn start_element(
    e: &quick_xml::events::BytesStart,
    out: &mut String,
    span_stack: &mut Vec<String>,
    in_paragraph: &mut bool,
    in_comment: &mut bool,
) -> Result<(), quick_xml::Error> {
    match e.name().as_ref() {
        b"p" => {
            *in_paragraph = true;
            if let Some(attr) = e.try_get_attribute("style")? {
                if attr.unescape_value()?.as_ref() == "quotations" {
                    out.push_str("> ");
                }
            }
        }
        b"em" => out.push_str("[i]"),
        b"strong" => out.push_str("[b]"),
        b"span" => {
            if let Some(attr) = e.try_get_attribute("xml:lang")? {
                let locale = attr.unescape_value()?;
                span_stack.push(format!("[/lang={locale}]"));
                out.push_str(&format!("[lang={locale}]"));
            }
        }
        b"comment" | b"note" => {
            *in_comment = true;
            out.push_str("/*");
            if e.name().as_ref() == b"note" {
                let class = e
                    .try_get_attribute("class")?
                    .map(|a| a.unescape_value().map(|v| v.into_owned()))
                    .transpose()?
                    .unwrap_or_else(|| "footnote".to_string());
                let marker = if class == "endnote" { "@en" } else { "@fn" };
                out.push_str(&format!("{marker} "));
            }
        }
        b"creator" | b"date" | b"note-citation" => *in_paragraph = false,
        _ => {}
    }
    Ok(())
}

fn end_element(
    name: &[u8],
    out: &mut String,
    span_stack: &mut Vec<String>,
    in_paragraph: &mut bool,
    in_comment: &mut bool,
) {
    match name {
        b"p" => {
            while let Some(closing) = span_stack.pop() {
                out.push_str(&closing);
            }
            if *in_comment {
                out.push(' ');
            } else {
                out.push('\n');
            }
            *in_paragraph = false;
        }
        b"em" => out.push_str("[/i]"),
        b"strong" => out.push_str("[/b]"),
        b"span" => {
            if let Some(closing) = span_stack.pop() {
                out.push_str(&closing);
            }
        }
        b"comment" | b"note" => {
            *in_comment = false;
            out.push_str("*/");
            // Comments sit inside a paragraph; keep capturing its tail.
            *in_paragraph = true;
        }
        b"creator" | b"date" | b"note-citation" => *in_paragraph = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> MarkupConverter {
        MarkupConverter::new(&[], None)
    }

    #[test]
    fn test_to_novx_plain_lines() {
        let mut c = converter();
        assert_eq!(c.to_novx("one\ntwo"), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_to_novx_emphasis() {
        let mut c = converter();
        assert_eq!(
            c.to_novx("a [i]slanted[/i] and [b]bold[/b] word"),
            "<p>a <em>slanted</em> and <strong>bold</strong> word</p>"
        );
    }

    #[test]
    fn test_to_novx_emphasis_across_lines() {
        let mut c = converter();
        assert_eq!(
            c.to_novx("[i]first\nsecond[/i]"),
            "<p><em>first</em></p><p><em>second</em></p>"
        );
    }

    #[test]
    fn test_to_novx_strips_format_codes() {
        let mut c = converter();
        assert_eq!(c.to_novx("[u1]under[/u1] [h3]high[/h]"), "<p>under high</p>");
    }

    #[test]
    fn test_to_novx_escapes_xml() {
        let mut c = converter();
        assert_eq!(
            c.to_novx("Tom & \"Jerry\" <here>"),
            "<p>Tom &amp; &quot;Jerry&quot; &lt;here&gt;</p>"
        );
    }

    #[test]
    fn test_to_novx_language_spans() {
        let mut c = MarkupConverter::new(&["fr".to_string()], None);
        assert_eq!(
            c.to_novx("say [lang=fr]oui[/lang=fr] now"),
            "<p>say <span xml:lang=\"fr\">oui</span> now</p>"
        );
    }

    #[test]
    fn test_to_novx_quotation() {
        let mut c = converter();
        assert_eq!(
            c.to_novx("> quoted line"),
            "<p style=\"quotations\">quoted line</p>"
        );
    }

    #[test]
    fn test_to_novx_comment() {
        let mut c = MarkupConverter::new(&[], Some("A. Author"));
        let result = c.to_novx("text /*remark*/ more");
        assert!(result.starts_with("<p>text <comment><creator>A. Author</creator><date>"));
        assert!(result.ends_with("</date><p>remark</p></comment> more</p>"));
    }

    #[test]
    fn test_to_novx_footnotes_numbered() {
        let mut c = converter();
        let result = c.to_novx("a/* @fn first */b/* @fn second */");
        assert!(result.contains("<note id=\"ftn1\" class=\"footnote\"><note-citation>1</note-citation><p>first </p></note>"));
        assert!(result.contains("<note id=\"ftn2\" class=\"footnote\"><note-citation>2</note-citation><p>second </p></note>"));
    }

    #[test]
    fn test_to_novx_endnote() {
        let mut c = converter();
        let result = c.to_novx("a/* @en closing */");
        assert!(result.contains("class=\"endnote\""));
    }

    #[test]
    fn test_to_novx_empty() {
        let mut c = converter();
        assert_eq!(c.to_novx(""), "");
    }

    #[test]
    fn test_shortcode_paragraphs() {
        let text = novx_to_shortcode("<p>one</p><p>two</p>").unwrap();
        assert_eq!(text, "one\ntwo\n");
    }

    #[test]
    fn test_shortcode_emphasis_and_span() {
        let text = novx_to_shortcode(
            "<p><em>it</em> and <strong>bold</strong> and <span xml:lang=\"de\">ja</span></p>",
        )
        .unwrap();
        assert_eq!(text, "[i]it[/i] and [b]bold[/b] and [lang=de]ja[/lang=de]\n");
    }

    #[test]
    fn test_shortcode_quotation() {
        let text = novx_to_shortcode("<p style=\"quotations\">quoted</p>").unwrap();
        assert_eq!(text, "> quoted\n");
    }

    #[test]
    fn test_shortcode_comment_drops_metadata() {
        let text = novx_to_shortcode(
            "<p>a <comment><creator>me</creator><date>2024-01-01T00:00:00</date><p>remark</p></comment>b</p>",
        )
        .unwrap();
        assert_eq!(text, "a /*remark */b\n");
    }

    #[test]
    fn test_shortcode_note_marker() {
        let text = novx_to_shortcode(
            "<p>a<note id=\"ftn1\" class=\"endnote\"><note-citation>1</note-citation><p>n</p></note></p>",
        )
        .unwrap();
        assert_eq!(text, "a/*@en n */\n");
    }

    #[test]
    fn test_shortcode_bad_entity_is_error() {
        let text = novx_to_shortcode("<p>&nosuch;</p>");
        assert!(text.is_err());
    }

    #[test]
    fn test_roundtrip_stabilizes() {
        let mut c = MarkupConverter::new(&["fr".to_string()], None);
        let novx = c.to_novx("plain [i]it[/i]\n> quote [lang=fr]mot[/lang=fr]");
        let shortcode = novx_to_shortcode(&novx).unwrap();
        let mut c2 = MarkupConverter::new(&["fr".to_string()], None);
        assert_eq!(c2.to_novx(shortcode.trim_end()), novx);
    }
}
