use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, space0, space1},
    combinator::{eof, map, opt, peek, rest},
    sequence::{preceded, terminated, tuple},
    IResult,
};

/// A single line of annotation text, classified by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Sentence boundary.
    Blank,
    /// `# newdoc [id = X]`
    NewDoc(Option<&'a str>),
    /// `# newpar [id = X]`; the paragraph id itself is not kept.
    NewPar,
    /// `# sent_id = X`
    SentId(&'a str),
    /// `# text = X`
    Text(&'a str),
    /// Any other `#` line.
    Comment(&'a str),
    /// A token line, not yet split into fields.
    Data(&'a str),
}

impl Line<'_> {
    pub fn is_data(&self) -> bool {
        matches!(self, Line::Data(_))
    }
}

/// Classifies one line (without its line terminator).
///
/// Markers are checked in the order blank, `newdoc`, `newpar`, `sent_id`,
/// `text`; any other `#` line is a comment and everything else is data.
/// Only empty or space-only lines are blank: a tab makes a line data, so a
/// line of empty fields is still checked for its field count.
pub fn classify(line: &str) -> Line<'_> {
    if line.bytes().all(|b| b == b' ') {
        return Line::Blank;
    }
    if !line.starts_with('#') {
        return Line::Data(line);
    }

    match marker(line) {
        Ok((_, classified)) => classified,
        Err(_) => Line::Comment(line),
    }
}

fn marker(input: &str) -> IResult<&str, Line<'_>> {
    alt((
        map(preceded(keyword("newdoc"), document_id), Line::NewDoc),
        map(keyword("newpar"), |_| Line::NewPar),
        map(preceded(keyword("sent_id"), assignment), |id| Line::SentId(id.trim())),
        map(preceded(keyword("text"), assignment), Line::Text),
    ))(input)
}

/// `#`, optional spaces, then `name` as a whole word (so `# text_en` is not `# text`).
fn keyword<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(
        tuple((char('#'), space0)),
        terminated(tag(name), peek(alt((space1, tag("="), eof)))),
    )
}

/// Everything after an optional `=`, leading spaces removed.
fn assignment(input: &str) -> IResult<&str, &str> {
    preceded(tuple((space0, opt(char('=')), space0)), rest)(input)
}

/// `id = X`, `= X` or bare `X` after `# newdoc`; an empty remainder means no id.
fn document_id(input: &str) -> IResult<&str, Option<&str>> {
    let id_key = terminated(tag("id"), peek(alt((space1, tag("="), eof))));

    map(
        preceded(tuple((space0, opt(id_key))), assignment),
        |id: &str| {
            let id = id.trim();
            (!id.is_empty()).then_some(id)
        },
    )(input)
}
