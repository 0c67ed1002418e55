use std::fs;
use std::io;
use std::path::Path;

/// The character a directive line starts with (a beebasm comment).
const MARKER: char = '\\';

/// The first word of a directive line.
const KEYWORD: &str = "beebasm";

/// Split `text` into whitespace separated parameters.
/// Double quotes group characters, whitespace included, up to the next
/// double quote or the end of the text. The quotes themselves are dropped.
pub fn parse_quoted(text: &str) -> Vec<String> {
    let mut params = Vec::new();

    let mut chars = text.chars().peekable();

    while let Some(c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }

            _ => {
                let mut param = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    chars.next();
                    if c == '"' {
                        // an unterminated quote runs to the end
                        param.extend(chars.by_ref().take_while(|c| *c != '"'));
                    } else {
                        param.push(c);
                    }
                }
                if !param.is_empty() {
                    params.push(param);
                }
            }
        }
    }

    params
}

/// Extract the extra switches from the first line of a source file,
/// i.e. a line of the form `\ beebasm <switches>`.
pub fn switches_from_line(line: &str) -> Vec<String> {
    let line = line.trim_end_matches('\n').trim_end_matches('\r');

    let Some(rest) = line.strip_prefix(MARKER) else {
        return Vec::new();
    };

    let mut params = parse_quoted(rest);
    if params.first().map(String::as_str) != Some(KEYWORD) {
        return Vec::new();
    }
    params.remove(0);

    params
}

/// Read the directive switches of the source file at `path`.
pub fn read_switches(path: &Path) -> io::Result<Vec<String>> {
    let src = fs::read(path)?;
    let src = String::from_utf8_lossy(&src);

    Ok(match src.lines().next() {
        Some(line) => switches_from_line(line),
        None => Vec::new(),
    })
}
