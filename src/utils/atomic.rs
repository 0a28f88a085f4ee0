use std::io;
use std::path::{Path, PathBuf};

/// Sibling path the content is staged in before it replaces `path`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace the file at `path` with `content`.
///
/// The content goes to a sibling temp file that is then renamed over the
/// target, so on any failure the previous file is left as it was.
pub fn write_atomic(path: &Path, content: impl AsRef<[u8]>) -> io::Result<()> {
    let temp = temp_path(path);
    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&temp);
    })
}
