/*
Wristwatch - Wrist Watch HUD
*/
use bevy::prelude::*;

/// Style in Effect for One Run of Text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpanStyle {
    pub size: Option<f32>,
    pub bold: bool,
    pub underline: bool,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkupSpan {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tag {
    Size(f32),
    Bold,
    Underline,
    Color(Color),
}

#[derive(Default)]
struct StyleStack {
    sizes: Vec<f32>,
    colors: Vec<Color>,
    bold: u32,
    underline: u32,
}

impl StyleStack {
    fn current(&self) -> SpanStyle {
        SpanStyle {
            size: self.sizes.last().copied(),
            bold: self.bold > 0,
            underline: self.underline > 0,
            color: self.colors.last().copied(),
        }
    }

    fn open(&mut self, tag: Tag) {
        match tag {
            Tag::Size(s) => self.sizes.push(s),
            Tag::Bold => self.bold += 1,
            Tag::Underline => self.underline += 1,
            Tag::Color(c) => self.colors.push(c),
        }
    }

    /// Unbalanced Closers are Ignored
    fn close(&mut self, name: &str) -> bool {
        match name {
            "size" => self.sizes.pop().is_some(),
            "color" => self.colors.pop().is_some(),
            "b" => {
                self.bold = self.bold.saturating_sub(1);
                true
            }
            "u" => {
                self.underline = self.underline.saturating_sub(1);
                true
            }
            _ => false,
        }
    }
}

fn parse_open(body: &str) -> Option<Tag> {
    match body {
        "b" => return Some(Tag::Bold),
        "u" => return Some(Tag::Underline),
        _ => {}
    }
    let (name, value) = body.split_once('=')?;
    match name {
        "size" => value.parse::<f32>().ok().filter(|s| *s > 0.0).map(Tag::Size),
        "color" => Srgba::hex(value).ok().map(|c| Tag::Color(c.into())),
        _ => None,
    }
}

fn push_text(spans: &mut Vec<MarkupSpan>, text: &str, style: SpanStyle) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => spans.push(MarkupSpan { text: text.to_string(), style }),
    }
}

/// Splits the Watch's Rich Text Subset Into Styled Runs
/// Anything That Isn't a Known Tag Stays as Literal Text
pub fn parse_markup(src: &str) -> Vec<MarkupSpan> {
    let mut spans = Vec::new();
    let mut stack = StyleStack::default();
    let mut rest = src;

    while let Some(start) = rest.find('<') {
        push_text(&mut spans, &rest[..start], stack.current());
        let after = &rest[start..];

        let Some(end) = after.find('>') else {
            push_text(&mut spans, after, stack.current());
            return spans;
        };
        let body = &after[1..end];

        let handled = if body == "br" {
            push_text(&mut spans, "\n", stack.current());
            true
        } else if let Some(name) = body.strip_prefix('/') {
            stack.close(name)
        } else if let Some(tag) = parse_open(body) {
            stack.open(tag);
            true
        } else {
            false
        };

        if handled {
            rest = &after[end + 1..];
        } else {
            // Keep the '<' and Carry on Right After It
            push_text(&mut spans, "<", stack.current());
            rest = &after[1..];
        }
    }
    push_text(&mut spans, rest, stack.current());
    spans
}

/// Text With Every Tag Removed, Handy for Logs and Tests
pub fn plain_text(src: &str) -> String {
    parse_markup(src).into_iter().map(|s| s.text).collect()
}
