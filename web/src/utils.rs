// derive the url slug for a post: lowercase, runs of whitespace become a
// single hyphen, anything outside [a-z0-9-] is dropped
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            if c.is_ascii_alphanumeric() || c == '-' {
                slug.push(c);
            }
        }
    }

    slug
}

// form fields come in as Option<String>; treat blank the same as absent
pub fn nonempty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
