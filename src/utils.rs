use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Splits a text blob into trimmed paragraphs on blank-line boundaries.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    BLANK_LINE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercase ASCII slug used when a feed entry has no id of its own.
pub fn slugify(text: &str) -> String {
    let decomposed: String = text.nfkd().collect();
    let mut slug = String::with_capacity(decomposed.len());
    let mut pending_dash = false;

    for c in decomposed.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}

/// Makes a supplied id usable as a URL fragment: no `#`, no whitespace runs.
pub fn fragment_safe(id: &str) -> String {
    let id = id.trim().trim_start_matches('#');
    WHITESPACE.replace_all(id, "-").into_owned()
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_split_on_blank_lines_only() {
        let text = "First line\nstill first\n\n\n  Second  \n \nThird\r\n\r\n";
        assert_eq!(
            split_paragraphs(text),
            ["First line\nstill first", "Second", "Third"]
        );
    }

    #[test]
    fn blank_text_has_no_paragraphs() {
        assert!(split_paragraphs("  \n\n \n").is_empty());
    }

    #[test]
    fn slugify_strips_accents_and_punctuation() {
        assert_eq!(slugify("Pokémon: Crystal Edition!"), "pokemon-crystal-edition");
        assert_eq!(slugify("  --Space   Game__2 "), "space-game-2");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn fragment_safe_ids() {
        assert_eq!(fragment_safe("#patch 1.2 notes"), "patch-1.2-notes");
        assert_eq!(fragment_safe("u1"), "u1");
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("v1.0/hot fix"), "v1.0_hot_fix");
    }
}
