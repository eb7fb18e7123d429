//! Utility helpers for procwatch.

use std::path::Path;

/// Returns the file name of the running program.
///
/// Taken from `argv[0]` so a renamed or symlinked binary excludes the name it
/// was invoked as; falls back to the resolved executable path.
pub fn program_name() -> Option<String> {
    std::env::args_os()
        .next()
        .and_then(|arg0| file_name(Path::new(&arg0)))
        .or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| file_name(&exe))
        })
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}
