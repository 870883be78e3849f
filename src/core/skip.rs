use std::path::Path;

/// Directory basenames skipped when `skip_common_dirs` is enabled.
/// These are build output, dependency caches and OS trees that are
/// rarely worth searching and often enormous.
const SKIP_DIRECTORIES: &[&str] = &[
    "$RECYCLE.BIN",
    "System Volume Information",
    "Windows",
    "Program Files",
    "Program Files (x86)",
    "ProgramData",
    "Recovery",
    "Intel",
    "AMD",
    "NVIDIA",
    "node_modules",
    ".git",
    ".svn",
    "__pycache__",
    "obj",
    "bin",
    "Debug",
    "Release",
    ".vs",
    "packages",
    "bower_components",
    "dist",
    "build",
];

/// Path components that always mark a system location, independent of
/// `skip_common_dirs`
const SYSTEM_COMPONENTS: &[&str] = &[
    "$recycle.bin",
    "system volume information",
    "program files",
    "program files (x86)",
    "programdata",
    "recovery",
    "intel",
    "amd",
    "nvidia",
    "hiberfil.sys",
    "pagefile.sys",
    "swapfile.sys",
];

/// Per-directory name rule: should this basename be skipped entirely?
pub fn should_skip_directory(name: &str, skip_common_dirs: bool) -> bool {
    skip_common_dirs
        && SKIP_DIRECTORIES
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

/// System-path rule, applied to every directory before it is expanded.
///
/// The path is tokenised on both separator styles after stripping a drive
/// prefix. Any component matching the system list skips the directory, as
/// does a `windows` component immediately followed by `system32` or
/// `syswow64`. A lone `windows` component skips only when it is terminal.
pub fn is_system_path(path: &Path) -> bool {
    let text = path.to_string_lossy();
    let mut rest: &str = &text;

    let bytes = rest.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' {
        rest = &rest[2..];
    }

    let mut saw_windows = false;
    for component in rest.split(['/', '\\']).filter(|c| !c.is_empty()) {
        if component.eq_ignore_ascii_case("windows") {
            saw_windows = true;
        } else {
            if saw_windows
                && (component.eq_ignore_ascii_case("system32")
                    || component.eq_ignore_ascii_case("syswow64"))
            {
                return true;
            }
            saw_windows = false;
        }

        if SYSTEM_COMPONENTS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(component))
        {
            return true;
        }
    }

    // a path ending in "windows" counts as the system tree itself
    saw_windows
}
