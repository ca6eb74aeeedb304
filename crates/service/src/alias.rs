//! URL-safe alias generation for titled content.
//!
//! `slugify` is idempotent on already-normalized input; collision handling
//! appends a numeric suffix and is otherwise deterministic.

/// Derive a URL-safe slug from a title: lowercase alphanumeric runs joined
/// by single hyphens, no leading/trailing hyphen.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    if out.is_empty() {
        out.push_str("untitled");
    }
    out
}

/// Pick the first free alias: `base`, then `base-2`, `base-3`, ...
pub fn disambiguate<F>(base: &str, mut is_taken: F) -> String
where
    F: FnMut(&str) -> bool,
{
    if !is_taken(base) {
        return base.to_string();
    }
    let mut n: u32 = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Rust for Beginners"), "rust-for-beginners");
        assert_eq!(slugify("  Week #1: Intro!  "), "week-1-intro");
    }

    #[test]
    fn slugify_is_idempotent_on_normalized_input() {
        for input in ["rust-101", "a", "week-1-intro", "untitled"] {
            assert_eq!(slugify(input), input);
        }
        // And a full round: slugify(slugify(x)) == slugify(x)
        let once = slugify("Crème Brûlée / Course");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn slugify_never_empty() {
        assert_eq!(slugify("???"), "untitled");
        assert_eq!(slugify(""), "untitled");
    }

    #[test]
    fn disambiguate_skips_taken_aliases() {
        let taken = ["rust-101", "rust-101-2"];
        let got = disambiguate("rust-101", |c| taken.contains(&c));
        assert_eq!(got, "rust-101-3");
    }

    #[test]
    fn disambiguate_returns_base_when_free() {
        assert_eq!(disambiguate("fresh", |_| false), "fresh");
    }
}
