/// Suffix for archive entries
pub const HTML_SUFFIX: &str = ".html";

/// Suffix for the document-mode output file derived from the seed URL
pub const JSON_SUFFIX: &str = ".json";

/// Derives a file-system-safe name from a URL
///
/// Every `:`, `/`, `.` and `|` becomes `_`, runs of `_` collapse into one,
/// and `suffix` is appended. Distinct URLs may map to the same name
/// (`a.b` and `a/b`); callers that store by name see last writer win.
///
/// # Examples
///
/// ```
/// use tinytrip::url::to_file_name;
///
/// assert_eq!(
///     to_file_name("https://a.com/x/y.html", ".html"),
///     "https_a_com_x_y_html.html"
/// );
/// ```
pub fn to_file_name(url: &str, suffix: &str) -> String {
    let mut name = String::with_capacity(url.len() + suffix.len());

    for c in url.chars() {
        let c = match c {
            ':' | '/' | '.' | '|' => '_',
            other => other,
        };
        if c == '_' && name.ends_with('_') {
            continue;
        }
        name.push(c);
    }

    name.push_str(suffix);
    name
}
