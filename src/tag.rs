//! Tag parser - `{{ name[:args] [| processor[:args]] }}`
//!
//! Single regex scan, left to right. Tags are not deduplicated: every
//! occurrence is reported with its own byte span. Anything that does not
//! match the grammar (e.g. a missing closing `}}`) is simply not a tag and
//! stays in the template verbatim.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Pre-compiled tag grammar.
///
/// Groups: 1 = name, 2 = variable args, 3 = processor name, 4 = processor args.
/// An argument suffix is either `"quoted"` or a run without `|`, `}` or
/// whitespace.
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\{\{\s*([^:|}\s]+)\s*(?::\s*("[^"]*"|[^|}\s]+)\s*)?(?:\|\s*([^:|}\s]+)\s*(?::\s*("[^"]*"|[^|}\s]+)\s*)?)?\}\}"#,
    )
    .expect("tag grammar is a valid regex")
});

/// One tag occurrence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Exact matched text, used as the substitution key
    pub raw: String,
    /// Byte range of `raw` in the template
    pub span: Range<usize>,
    pub name: String,
    /// `None` when there was no `:` suffix
    pub args: Option<Vec<String>>,
    pub processor: Option<String>,
    pub processor_args: Option<Vec<String>>,
}

impl Tag {
    fn from_captures(cap: &Captures<'_>) -> Option<Self> {
        let whole = cap.get(0)?;
        let name = cap.get(1)?.as_str().trim();
        if name.is_empty() {
            return None;
        }
        let processor = cap.get(3).map(|m| m.as_str().trim().to_string());
        let processor_args = if processor.is_some() {
            cap.get(4).and_then(|m| split_args(m.as_str()))
        } else {
            None
        };

        Some(Self {
            raw: whole.as_str().to_string(),
            span: whole.range(),
            name: name.to_string(),
            args: cap.get(2).and_then(|m| split_args(m.as_str())),
            processor,
            processor_args,
        })
    }
}

/// Cheap pre-check before running the regex
#[inline]
pub fn may_contain_tags(template: &str) -> bool {
    template.contains("{{")
}

/// Extract all tags, in occurrence order.
pub fn parse(template: &str) -> Vec<Tag> {
    if !may_contain_tags(template) {
        return Vec::new();
    }
    TAG_RE
        .captures_iter(template)
        .filter_map(|cap| Tag::from_captures(&cap))
        .collect()
}

/// Turn a raw `:` suffix into an argument list.
///
/// Surrounding quotes are stripped (no unescaping), the rest is trimmed and
/// split on `,`. An empty suffix counts as "no arguments".
fn split_args(raw: &str) -> Option<Vec<String>> {
    let unquoted = match raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => raw,
    };
    let trimmed = unquoted.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.split(',').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn parse_plain_name() {
        let tags = parse("Hello {{name}}!");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].raw, "{{name}}");
        assert_eq!(tags[0].name, "name");
        assert_eq!(tags[0].span, 6..14);
        assert_eq!(tags[0].args, None);
        assert_eq!(tags[0].processor, None);
    }

    #[test]
    fn parse_args_split_on_comma() {
        let tags = parse("{{x:a,b,c}}");
        assert_eq!(tags[0].args, args(&["a", "b", "c"]));
    }

    #[test]
    fn parse_quoted_args_keep_spaces() {
        let tags = parse(r#"{{when:"%d %B %Y"}}"#);
        assert_eq!(tags[0].args, args(&["%d %B %Y"]));
    }

    #[test]
    fn parse_quoted_args_are_not_unescaped() {
        let tags = parse(r#"{{x:"a\n,b"}}"#);
        assert_eq!(tags[0].args, args(&[r"a\n", "b"]));
    }

    #[test]
    fn parse_processor_with_args() {
        let tags = parse("{{ price : 10 | number : 2,.,_ }}");
        assert_eq!(tags.len(), 1);
        let tag = &tags[0];
        assert_eq!(tag.name, "price");
        assert_eq!(tag.args, args(&["10"]));
        assert_eq!(tag.processor.as_deref(), Some("number"));
        assert_eq!(tag.processor_args, args(&["2", ".", "_"]));
        assert_eq!(tag.raw, "{{ price : 10 | number : 2,.,_ }}");
    }

    #[test]
    fn parse_processor_without_args() {
        let tags = parse("{{title|upper}}");
        assert_eq!(tags[0].processor.as_deref(), Some("upper"));
        assert_eq!(tags[0].processor_args, None);
    }

    #[test]
    fn parse_processor_args_may_contain_colons() {
        let tags = parse("{{at|date:%H:%M}}");
        assert_eq!(tags[0].processor_args, args(&["%H:%M"]));
    }

    #[test]
    fn parse_keeps_every_occurrence() {
        let tags = parse("{{a}} {{b:1}} {{a}}");
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
    }

    #[test]
    fn parse_unterminated_is_not_a_tag() {
        assert!(parse("{{x").is_empty());
        assert!(parse("{{x}").is_empty());
        assert!(parse("no tags at all").is_empty());
    }

    #[test]
    fn parse_stops_at_first_closing_braces() {
        let tags = parse("{{a}}}}");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].raw, "{{a}}");
    }

    #[test]
    fn parse_empty_suffix_is_not_a_tag() {
        assert!(parse("{{x:}}").is_empty());
        assert!(parse("{{}}").is_empty());
    }

    #[test]
    fn parse_empty_quoted_suffix_means_no_args() {
        let tags = parse(r#"{{x:""}}"#);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].args, None);
    }

    #[test]
    fn parse_multibyte_names_and_spans() {
        let template = "→ {{имя}} ←";
        let tags = parse(template);
        assert_eq!(tags[0].name, "имя");
        assert_eq!(&template[tags[0].span.clone()], "{{имя}}");
    }
}
