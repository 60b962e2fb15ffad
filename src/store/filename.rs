//! Filename sanitization.

/// Longest stored name accepted, in bytes. Matches `NAME_MAX` on common
/// filesystems.
pub const MAX_NAME_LEN: usize = 255;

/// Reduce a user-supplied name to its final path component.
///
/// Both `/` and `\` are treated as separators. Returns `None` when nothing
/// usable remains (empty names, trailing separators, `.` and `..`) or when
/// the remaining name is longer than [`MAX_NAME_LEN`] bytes.
///
/// ```
/// use image_transformer::store::sanitize_filename;
///
/// assert_eq!(sanitize_filename("photo.jpg").as_deref(), Some("photo.jpg"));
/// assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
/// assert_eq!(sanitize_filename("uploads/"), None);
/// ```
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    match base {
        "" | "." | ".." => None,
        _ if base.contains('\0') || base.len() > MAX_NAME_LEN => None,
        _ => Some(base.to_string()),
    }
}
