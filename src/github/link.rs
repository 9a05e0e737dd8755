/// Extract the `rel="next"` target from a `Link` header such as
/// `<https://api.github.com/...&page=2>; rel="next", <...&page=4>; rel="last"`.
pub fn parse_next_link(header: &str) -> Option<String> {
    for part in header.split(',') {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            continue;
        }
        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        if url.is_empty() {
            return None;
        }
        return Some(url.to_string());
    }
    None
}
