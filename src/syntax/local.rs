/// Pas de '.' initial/terminal dans la partie locale.
pub(crate) fn has_edge_dot(local: &str) -> bool {
    local.starts_with('.') || local.ends_with('.')
}

pub(crate) fn has_consecutive_dots(s: &str) -> bool {
    s.contains("..")
}
