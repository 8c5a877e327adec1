/// Clamp an untrusted redirect target to a same-origin path.
///
/// Anything that is not an absolute path on this origin (absolute URLs,
/// scheme-relative `//host` forms, backslash variants) falls back to the
/// supplied default.
pub fn safe_redirect(target: &str, fallback: &str) -> String {
    let safe = target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.contains('\n')
        && !target.contains('\r');

    if safe {
        target.to_string()
    } else {
        fallback.to_string()
    }
}
