//! Minimal JSDoc reader used to decide whether a symbol is documented.

/// A single `@tag` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// Tag name without the `@`.
    pub name: String,
    /// `{type}` payload, if present.
    pub type_hint: Option<String>,
    /// Remaining text on the tag line (and continuation lines).
    pub description: Option<String>,
}

/// Structured view of a `/** ... */` block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// Text before the first tag, whitespace-collapsed.
    pub summary: Option<String>,
    /// Every tag in source order.
    pub tags: Vec<DocTag>,
}

impl DocComment {
    /// Parse the inside of a doc block (without the `/**` and `*/` delimiters).
    pub fn parse(raw: &str) -> Self {
        let mut summary_lines = Vec::new();
        let mut tags: Vec<DocTag> = Vec::new();

        for line in normalize_lines(raw) {
            if let Some(rest) = line.strip_prefix('@') {
                let (name, payload) = split_tag_payload(rest);
                if name.is_empty() {
                    continue;
                }
                let (type_hint, description) = parse_type_and_rest(payload);
                tags.push(DocTag {
                    name: name.to_string(),
                    type_hint,
                    description,
                });
            } else if let Some(last) = tags.last_mut() {
                // continuation of the previous tag (e.g. an @example body)
                if !line.is_empty() {
                    let description = last.description.get_or_insert_with(String::new);
                    if !description.is_empty() {
                        description.push('\n');
                    }
                    description.push_str(&line);
                }
            } else {
                summary_lines.push(line);
            }
        }

        Self {
            summary: compose_summary(summary_lines),
            tags,
        }
    }

    /// A comment counts as documentation if it has a non-empty summary or
    /// at least one tag.
    pub fn is_valid(&self) -> bool {
        self.summary
            .as_deref()
            .is_some_and(|summary| !summary.trim().is_empty())
            || !self.tags.is_empty()
    }
}

/// Shorthand for `DocComment::parse(raw).is_valid()`.
pub fn is_valid_doc(raw: &str) -> bool {
    DocComment::parse(raw).is_valid()
}

fn normalize_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.trim().to_string()
        })
        .collect()
}

fn compose_summary(lines: Vec<String>) -> Option<String> {
    let summary = lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!summary.is_empty()).then_some(summary)
}

fn split_tag_payload(input: &str) -> (&str, &str) {
    let mut parts = input.splitn(2, char::is_whitespace);
    let tag = parts.next().unwrap_or("");
    let payload = parts.next().unwrap_or("").trim();
    (tag, payload)
}

fn parse_type_and_rest(payload: &str) -> (Option<String>, Option<String>) {
    let trimmed = payload.trim();
    if let Some(stripped) = trimmed.strip_prefix('{') {
        if let Some((ty, rest)) = stripped.split_once('}') {
            let ty = ty.trim();
            let rest = rest.trim();
            return (
                (!ty.is_empty()).then(|| ty.to_string()),
                (!rest.is_empty()).then(|| rest.to_string()),
            );
        }
    }
    (None, (!trimmed.is_empty()).then(|| trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_only_is_valid() {
        let doc = DocComment::parse("*\n * Adds two numbers.\n ");
        assert_eq!(doc.summary.as_deref(), Some("Adds two numbers."));
        assert!(doc.is_valid());
    }

    #[test]
    fn test_tag_only_is_valid() {
        assert!(is_valid_doc("* @internal "));
        assert!(is_valid_doc("*\n * @deprecated\n "));
    }

    #[test]
    fn test_empty_block_is_not_documentation() {
        assert!(!is_valid_doc("*"));
        assert!(!is_valid_doc("*\n *\n *\n "));
        assert!(!is_valid_doc(""));
    }

    #[test]
    fn test_tags_with_types_and_continuations() {
        let doc = DocComment::parse(
            "*\n * Sum.\n * @param {number} a first\n * @example\n * add(1, 2)\n ",
        );
        assert_eq!(doc.tags.len(), 2);
        assert_eq!(doc.tags[0].name, "param");
        assert_eq!(doc.tags[0].type_hint.as_deref(), Some("number"));
        assert_eq!(doc.tags[0].description.as_deref(), Some("a first"));
        assert_eq!(doc.tags[1].name, "example");
        assert_eq!(doc.tags[1].description.as_deref(), Some("add(1, 2)"));
    }

    #[test]
    fn test_bare_at_sign_is_not_a_tag() {
        assert!(!is_valid_doc("* @ "));
    }
}
