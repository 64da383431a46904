/// Resolve backslash escapes: `\X` becomes `X` for any character `X`.
///
/// A trailing backslash with nothing after it is kept. Input without any
/// backslash comes back unchanged.
pub fn unescape(input: &str) -> String {
    if !input.contains('\\') {
        return input.to_string();
    }

    let mut text = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => text.push(escaped),
                None => text.push(c),
            }
        } else {
            text.push(c);
        }
    }

    text
}
