use std::env;

/// Symbolic path variables a component manifest may embed in its
/// `destinationPath` attributes, mapped to environment-style expressions.
/// Looked up case-insensitively, never mutated at runtime.
const PACKAGE_PATH_VARIABLES: &[(&str, &str)] = &[
    ("runtime.programfilesx86", "%ProgramFiles(x86)%"),
    ("runtime.help", "%SystemRoot%\\Help"),
    ("runtime.bootdrive", "%SystemDrive%"),
    ("runtime.systemroot", "%SystemRoot%"),
    ("runtime.inf", "%SystemRoot%\\INF"),
    ("runtime.commonfiles", "%CommonProgramFiles%"),
    ("runtime.windows", "%SystemRoot%"),
    ("runtime.public", "%Public%"),
    ("runtime.system", "%SystemRoot%\\System"),
    ("runtime.programdata", "%ProgramData%"),
    ("runtime.wbem", "%SystemRoot%\\System32\\wbem"),
    ("runtime.startmenu", "%ProgramData%\\Microsoft\\Windows\\Start Menu"),
    ("runtime.fonts", "%SystemRoot%\\Fonts"),
    ("runtime.windir", "%SystemRoot%"),
    ("runtime.system32", "%SystemRoot%\\System32"),
    ("runtime.programfiles", "%ProgramFiles%"),
    ("runtime.drivers", "%SystemRoot%\\System32\\Drivers"),
];

fn package_path_variable(name: &str) -> Option<&'static str> {
    PACKAGE_PATH_VARIABLES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| *value)
}

/// Expands `$(name)` tokens against the symbolic variable table, then
/// expands `%NAME%` tokens against the live environment. Unknown tokens of
/// either grammar are left untouched, as are unterminated ones.
pub fn expand_path_variables(input: &str) -> String {
    let mut expanded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("$(") {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find(')') else {
            expanded.push_str("$(");
            rest = after;
            continue;
        };

        let name = &after[..end];
        match package_path_variable(name) {
            Some(value) => expanded.push_str(value),
            None => {
                expanded.push_str("$(");
                expanded.push_str(name);
                expanded.push(')');
            }
        }
        rest = &after[end + 1..];
    }
    expanded.push_str(rest);

    expand_environment_strings(&expanded)
}

/// Expands `%NAME%` tokens against the process environment. Tokens naming
/// an unset variable, empty tokens, and stray `%` characters pass through
/// unchanged.
pub fn expand_environment_strings(input: &str) -> String {
    let mut expanded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match env::var(name) {
                    Ok(value) => expanded.push_str(&value),
                    Err(_) => {
                        expanded.push('%');
                        expanded.push_str(name);
                        expanded.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                expanded.push('%');
                rest = after;
            }
        }
    }
    expanded.push_str(rest);
    expanded
}

/// Lexically normalizes a Windows-style path: unifies separators to
/// backslashes, collapses repeated separators and `.` segments, and
/// resolves `..` segments where possible. Purely textual, no filesystem
/// access.
pub fn normalize_windows_path(input: &str) -> String {
    let unified = input.replace('/', "\\");
    let (prefix, rest) = split_path_prefix(&unified);
    let rooted = rest.starts_with('\\');

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('\\') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&"..") => segments.push(".."),
                Some(_) => {
                    segments.pop();
                }
                None => {
                    if !rooted && prefix.is_empty() {
                        segments.push("..");
                    }
                }
            },
            other => segments.push(other),
        }
    }

    let mut normalized = String::from(prefix);
    if rooted {
        normalized.push('\\');
    }
    normalized.push_str(&segments.join("\\"));
    if normalized.is_empty() {
        normalized.push('.');
    }
    normalized
}

fn split_path_prefix(path: &str) -> (&str, &str) {
    if path.starts_with("\\\\") {
        return (&path[..2], &path[2..]);
    }
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return (&path[..2], &path[2..]);
    }
    ("", path)
}

/// Case-insensitive equality of two paths after normalization.
pub fn paths_equal_ignore_case(left: &str, right: &str) -> bool {
    normalize_windows_path(left).eq_ignore_ascii_case(&normalize_windows_path(right))
}

/// Last path segment, honoring both separator styles.
pub fn file_name_component(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}
