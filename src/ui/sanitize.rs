/// Escapes the HTML-significant characters and turns line breaks into
/// `<br />`.
///
/// `&` is escaped first so entities produced by later rules stay intact.
/// `\r\n` counts as a single break.
#[must_use]
pub fn sanitize(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;");
    escaped
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "<br />")
}

/// Makes server text safe for a terminal. Line breaks and tabs survive;
/// every other control character is written as its escape, so escape
/// sequences in a response body cannot drive the terminal.
#[must_use]
pub fn escape_controls(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.replace("\r\n", "\n").chars() {
        if ch.is_control() && ch != '\n' && ch != '\t' {
            escaped.extend(ch.escape_default());
        } else {
            escaped.push(ch);
        }
    }
    escaped
}
