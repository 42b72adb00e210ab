//! The ambiguity notation used to encode "one of several surface strings".
//!
//! Autocorrect and the sound-change tables emit fragments in a tiny textual
//! grammar: `(a|b|...)` marks mutually exclusive alternatives, and a `!`
//! directly after a character or group makes that unit optional. Fragments
//! are plain values spliced into syllable strings; nothing ever references
//! into them.
//!
//! Internally a fragment is parsed into a small tree and unfolded
//! recursively. The public [`unfold`] contract still rejects fragments with
//! more than one group or more than one marker: search-side callers rely on
//! the rejection to tell "exhaustively unfoldable" apart from "verifiable
//! only by regex".

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmbigError {
    #[error("fragment contains more than one alternative group")]
    MultipleGroups,
    #[error("fragment contains more than one optional marker")]
    MultipleMarkers,
    #[error("unbalanced group delimiters in fragment")]
    Unbalanced,
}

pub fn is_dsl_char(c: char) -> bool {
    matches!(c, '(' | ')' | '|' | '!')
}

pub fn contains_dsl(s: &str) -> bool {
    s.chars().any(is_dsl_char)
}

enum Node {
    Literal(char),
    OneOf(Vec<Vec<Node>>),
    Optional(Box<Node>),
}

/// Expand a fragment into the finite set of concrete strings it denotes.
///
/// A group produces one variant per alternative; an optional unit doubles
/// every variant it appears in (unit removed first, then unit kept).
/// Duplicates are not collapsed, so `(ng|m)!` yields four variants.
pub fn unfold(fragment: &str) -> Result<Vec<String>, AmbigError> {
    let mut groups = 0usize;
    let mut markers = 0usize;
    let mut depth = 0i32;
    for c in fragment.chars() {
        match c {
            '(' => {
                groups += 1;
                depth += 1;
            }
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(AmbigError::Unbalanced);
                }
            }
            '!' => markers += 1,
            _ => {}
        }
    }
    if depth != 0 {
        return Err(AmbigError::Unbalanced);
    }
    if groups > 1 {
        return Err(AmbigError::MultipleGroups);
    }
    if markers > 1 {
        return Err(AmbigError::MultipleMarkers);
    }

    Ok(expand(&parse(fragment)?))
}

fn parse(fragment: &str) -> Result<Vec<Node>, AmbigError> {
    let chars: Vec<char> = fragment.chars().collect();
    let mut nodes: Vec<Node> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '(' => {
                let mut alternatives: Vec<Vec<Node>> = Vec::new();
                let mut current: Vec<Node> = Vec::new();
                i += 1;
                loop {
                    if i >= chars.len() {
                        return Err(AmbigError::Unbalanced);
                    }
                    match chars[i] {
                        ')' => {
                            alternatives.push(current);
                            break;
                        }
                        '|' => alternatives.push(std::mem::take(&mut current)),
                        '!' => {
                            if let Some(last) = current.pop() {
                                current.push(Node::Optional(Box::new(last)));
                            }
                        }
                        '(' => return Err(AmbigError::MultipleGroups),
                        c => current.push(Node::Literal(c)),
                    }
                    i += 1;
                }
                nodes.push(Node::OneOf(alternatives));
            }
            ')' => return Err(AmbigError::Unbalanced),
            // A dangling marker with nothing before it is dropped.
            '!' => {
                if let Some(last) = nodes.pop() {
                    nodes.push(Node::Optional(Box::new(last)));
                }
            }
            c => nodes.push(Node::Literal(c)),
        }
        i += 1;
    }
    Ok(nodes)
}

fn expand(nodes: &[Node]) -> Vec<String> {
    let mut variants = vec![String::new()];
    for node in nodes {
        let choices = expand_node(node);
        let mut next = Vec::with_capacity(variants.len() * choices.len());
        for variant in &variants {
            for choice in &choices {
                next.push(format!("{variant}{choice}"));
            }
        }
        variants = next;
    }
    variants
}

fn expand_node(node: &Node) -> Vec<String> {
    match node {
        Node::Literal(c) => vec![c.to_string()],
        Node::OneOf(alternatives) => alternatives.iter().flat_map(|a| expand(a)).collect(),
        Node::Optional(inner) => expand_node(inner)
            .into_iter()
            .flat_map(|v| [String::new(), v])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fragment_unfolds_to_itself() {
        assert_eq!(unfold("geoi").unwrap(), vec!["geoi"]);
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(unfold("").unwrap(), vec![""]);
    }

    #[test]
    fn test_group() {
        assert_eq!(unfold("g(eo|u)i").unwrap(), vec!["geoi", "gui"]);
    }

    #[test]
    fn test_marker_on_char() {
        assert_eq!(unfold("aa!").unwrap(), vec!["a", "aa"]);
    }

    #[test]
    fn test_marker_inside_group() {
        assert_eq!(unfold("(y!u)").unwrap(), vec!["u", "yu"]);
    }

    #[test]
    fn test_marker_inside_group_with_alternatives() {
        let variants = unfold("(y!u|a|eo)n").unwrap();
        assert_eq!(variants, vec!["un", "yun", "an", "eon"]);
    }

    #[test]
    fn test_marker_on_group() {
        let variants = unfold("(ng|m)!").unwrap();
        assert_eq!(variants.len(), 4);
        assert!(variants.contains(&"ng".to_string()));
        assert!(variants.contains(&"m".to_string()));
        assert!(variants.contains(&String::new()));
    }

    #[test]
    fn test_group_and_marker() {
        let variants = unfold("(g|k)w!u").unwrap();
        assert_eq!(variants, vec!["gu", "gwu", "ku", "kwu"]);
    }

    #[test]
    fn test_two_groups_rejected() {
        assert_eq!(unfold("(a|b)(c|d)"), Err(AmbigError::MultipleGroups));
    }

    #[test]
    fn test_two_markers_rejected() {
        assert_eq!(unfold("a!b!"), Err(AmbigError::MultipleMarkers));
    }

    #[test]
    fn test_unbalanced_rejected() {
        assert_eq!(unfold("(a|b"), Err(AmbigError::Unbalanced));
        assert_eq!(unfold("a|b)"), Err(AmbigError::Unbalanced));
    }

    #[test]
    fn test_dangling_marker_dropped() {
        assert_eq!(unfold("!a").unwrap(), vec!["a"]);
    }
}
