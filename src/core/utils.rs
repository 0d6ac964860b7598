/// Restricts a media title to filesystem-safe characters for use as a file name.
///
/// Alphanumerics (any script) and a small set of punctuation survive; every
/// other character becomes `_`. Runs of whitespace collapse to one space and
/// leading/trailing dots and spaces are stripped so the result is valid on
/// every platform we run on.
///
/// # Example
///
/// ```
/// use vidgrab::core::utils::sanitize_title;
///
/// assert_eq!(sanitize_title("some/title: part 2"), "some_title_ part 2");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || " -_.()[]".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(['.', ' ']).to_string();

    if trimmed.is_empty() {
        "media".to_string()
    } else {
        trimmed
    }
}
