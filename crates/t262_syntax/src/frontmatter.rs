//! Fixture header parsing.
//!
//! A fixture starts with a comment region. Lines inside it of the form `@tag value` carry metadata:
//!
//! ```text
//! /// Copyright (c) 2012 Ecma International.  All rights reserved.
//! /**
//!  * @path ch15/15.2/15.2.3/15.2.3.3/15.2.3.3-4-12.js
//!  * @description Object.getOwnPropertyDescriptor returns data desc for functions on built-ins (Global.escape)
//!  */
//! ```
//!
//! ## Notes
//! - Only the leading comments are scanned; the first token of code ends the header.
//! - A non-tag line directly after a valued tag continues that tag's value.
//! - Parsing never fails. Unknown tags are kept so tooling can report them.

use t262_core::lang::harness::{self, FixtureTagId};

/// Metadata read from a fixture's leading comment block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureMetadata {
    /// `@path`: the fixture's location inside the conformance suite.
    pub path: Option<String>,
    pub description: Option<String>,
    pub negative: Option<Negative>,
    pub flags: FixtureFlags,
    /// Tags not in the registry, without the `@`.
    pub unknown_tags: Vec<String>,
}

/// `@negative [Name]`: the fixture must end with an uncaught error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negative {
    /// Substring the error's `Name: message` rendering must contain, if given.
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureFlags {
    pub only_strict: bool,
    pub no_strict: bool,
}

/// Parse the header of `source`.
///
/// ## Examples
/// ```rust
/// use t262_syntax::frontmatter::parse_header;
///
/// let meta = parse_header("/**\n * @description adds\n * two numbers\n * @negative TypeError\n */\nvar x;");
/// assert_eq!(meta.description.as_deref(), Some("adds two numbers"));
/// assert_eq!(meta.negative.unwrap().pattern.as_deref(), Some("TypeError"));
/// ```
pub fn parse_header(source: &str) -> FixtureMetadata {
    let mut meta = FixtureMetadata::default();
    // Tag whose value the next plain line continues.
    let mut open_tag: Option<FixtureTagId> = None;

    for line in header_lines(source) {
        let line = line.trim();
        if let Some(tagged) = line.strip_prefix('@') {
            let (name, value) = match tagged.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim()),
                None => (tagged, ""),
            };
            open_tag = apply_tag(&mut meta, name, value);
        } else if line.is_empty() {
            open_tag = None;
        } else if let Some(tag) = open_tag {
            continue_tag(&mut meta, tag, line);
        }
    }

    meta
}

/// Record one tag; returns the tag if later lines may continue its value.
fn apply_tag(meta: &mut FixtureMetadata, name: &str, value: &str) -> Option<FixtureTagId> {
    let Some(id) = harness::tag_from_str(name) else {
        meta.unknown_tags.push(name.to_string());
        return None;
    };
    let value = (!value.is_empty()).then(|| value.to_string());
    match id {
        FixtureTagId::Path => meta.path = value,
        FixtureTagId::Description => meta.description = value,
        FixtureTagId::Negative => meta.negative = Some(Negative { pattern: value }),
        FixtureTagId::OnlyStrict => meta.flags.only_strict = true,
        FixtureTagId::NoStrict => meta.flags.no_strict = true,
    }
    harness::TAGS[id as usize].takes_value.then_some(id)
}

fn continue_tag(meta: &mut FixtureMetadata, tag: FixtureTagId, line: &str) {
    let slot = match tag {
        FixtureTagId::Path => &mut meta.path,
        FixtureTagId::Description => &mut meta.description,
        FixtureTagId::Negative => match meta.negative.as_mut() {
            Some(negative) => &mut negative.pattern,
            None => return,
        },
        FixtureTagId::OnlyStrict | FixtureTagId::NoStrict => return,
    };
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(line);
        }
        None => *slot = Some(line.to_string()),
    }
}

/// Text of every line in the leading comment region, with comment markers stripped.
fn header_lines(source: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = source.trim_start_matches('\u{feff}');

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("//") {
            let end = after.find('\n').unwrap_or(after.len());
            lines.push(after[..end].trim_start_matches('/'));
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix("/*") {
            let (body, next) = match after.find("*/") {
                Some(end) => (&after[..end], &after[end + 2..]),
                None => (after, ""),
            };
            for line in body.lines() {
                lines.push(line.trim_start().trim_start_matches('*'));
            }
            rest = next;
        } else {
            return lines;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESCAPE_FIXTURE_HEADER: &str = r#"/// Copyright (c) 2012 Ecma International.  All rights reserved.
/// Ecma International makes this code available under the terms and conditions set
/// forth on http://hg.ecmascript.org/tests/test262/raw-file/tip/LICENSE (the
/// "Use Terms").
/**
 * @path ch15/15.2/15.2.3/15.2.3.3/15.2.3.3-4-12.js
 * @description Object.getOwnPropertyDescriptor returns data desc for functions on built-ins (Global.escape)
 */


function testcase() {
  return true;
}
runTestCase(testcase);
"#;

    #[test]
    fn test_escape_fixture_header() {
        let meta = parse_header(ESCAPE_FIXTURE_HEADER);
        assert_eq!(meta.path.as_deref(), Some("ch15/15.2/15.2.3/15.2.3.3/15.2.3.3-4-12.js"));
        assert_eq!(
            meta.description.as_deref(),
            Some("Object.getOwnPropertyDescriptor returns data desc for functions on built-ins (Global.escape)")
        );
        assert!(meta.negative.is_none());
        assert_eq!(meta.flags, FixtureFlags::default());
        assert!(meta.unknown_tags.is_empty());
    }

    #[test]
    fn test_flags_and_bare_negative() {
        let meta = parse_header("// @onlyStrict\n// @negative\n// @author someone\nvar x;");
        assert!(meta.flags.only_strict);
        assert_eq!(meta.negative, Some(Negative { pattern: None }));
        assert_eq!(meta.unknown_tags, vec!["author".to_string()]);
    }

    #[test]
    fn test_tags_after_code_are_ignored() {
        let meta = parse_header("var x;\n/* @description not a header */");
        assert!(meta.description.is_none());
    }

    #[test]
    fn test_no_header() {
        assert_eq!(parse_header("runTestCase(function () { return true; });"), FixtureMetadata::default());
    }

    #[test]
    fn test_unterminated_block_comment_header() {
        let meta = parse_header("/*\n * @description half open");
        assert_eq!(meta.description.as_deref(), Some("half open"));
    }
}
