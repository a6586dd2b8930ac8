//! Single-pass placeholder scanner.
//!
//! A placeholder is an opening `{` not preceded by `{`, at least one
//! character that is not `}`, and a closing `}` not followed by `}`. The body
//! may contain `{`; there is no nesting. Doubled braces never delimit a
//! placeholder and pass through as literal text.

/// A `{key}` or `{key:spec}` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// The full span including braces.
    pub raw: &'a str,
    pub key: &'a str,
    /// Text after the first `:`, if any.
    pub spec: Option<&'a str>,
}

impl<'a> Placeholder<'a> {
    fn from_raw(raw: &'a str) -> Self {
        let body = &raw[1..raw.len() - 1];
        let (key, spec) = match body.split_once(':') {
            Some((key, spec)) => (key, Some(spec)),
            None => (body, None),
        };
        Self { raw, key, spec }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Placeholder(Placeholder<'a>),
}

/// Iterator splitting a template into literal and placeholder segments.
pub struct Scanner<'a> {
    template: &'a str,
    pos: usize,
    pending: Option<(usize, usize)>,
}

impl<'a> Scanner<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            pos: 0,
            pending: None,
        }
    }

    /// Byte range (inclusive of both braces) of the next placeholder at or
    /// after `from`.
    fn find_placeholder(&self, from: usize) -> Option<(usize, usize)> {
        let bytes = self.template.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            if bytes[i] != b'{' || (i > 0 && bytes[i - 1] == b'{') {
                i += 1;
                continue;
            }
            let close = i + 1 + bytes[i + 1..].iter().position(|b| *b == b'}')?;
            let followed_by_brace = bytes.get(close + 1) == Some(&b'}');
            if close > i + 1 && !followed_by_brace {
                return Some((i, close));
            }
            // Every opening brace before `close` shares the same closing
            // brace and fails the same way.
            i = close + 1;
        }
        None
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((start, end)) = self.pending.take() {
            self.pos = end + 1;
            return Some(Segment::Placeholder(Placeholder::from_raw(
                &self.template[start..=end],
            )));
        }
        if self.pos >= self.template.len() {
            return None;
        }

        match self.find_placeholder(self.pos) {
            Some((start, end)) if start > self.pos => {
                let literal = &self.template[self.pos..start];
                self.pending = Some((start, end));
                self.pos = start;
                Some(Segment::Literal(literal))
            }
            Some((start, end)) => {
                self.pos = end + 1;
                Some(Segment::Placeholder(Placeholder::from_raw(
                    &self.template[start..=end],
                )))
            }
            None => {
                let literal = &self.template[self.pos..];
                self.pos = self.template.len();
                Some(Segment::Literal(literal))
            }
        }
    }
}

/// All placeholders in `template`, in order.
pub fn placeholders(template: &str) -> Vec<Placeholder<'_>> {
    Scanner::new(template)
        .filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            Segment::Literal(_) => None,
        })
        .collect()
}
