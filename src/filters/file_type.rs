/// Coarse file classification driven by extension alone. The table is
/// static so a given tree always classifies the same way across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTypeClass {
    Text,
    Image,
    Video,
    Audio,
    Archive,
}

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "rst", "c", "h", "cc", "cpp", "hpp", "rs", "go", "py", "js", "ts",
    "jsx", "tsx", "java", "kt", "rb", "php", "lua", "sh", "bat", "ps1", "json", "yaml", "yml",
    "toml", "xml", "html", "htm", "css", "ini", "cfg", "conf", "log", "csv", "sql", "tex",
];

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "tif", "tiff", "heic", "avif",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "mov", "avi", "webm", "wmv", "flv", "m4v", "mpg", "mpeg",
];

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "ogg", "m4a", "aac", "wma", "opus", "mid",
];

const ARCHIVE_EXTENSIONS: &[&str] = &[
    "zip", "tar", "gz", "tgz", "bz2", "7z", "rar", "xz", "zst", "iso", "cab",
];

/// Map an extension (without the leading dot) to its class, if it has one
pub fn classify(extension: &str) -> Option<FileTypeClass> {
    let ext = extension.to_ascii_lowercase();
    let ext = ext.as_str();

    if TEXT_EXTENSIONS.contains(&ext) {
        Some(FileTypeClass::Text)
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        Some(FileTypeClass::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        Some(FileTypeClass::Video)
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        Some(FileTypeClass::Audio)
    } else if ARCHIVE_EXTENSIONS.contains(&ext) {
        Some(FileTypeClass::Archive)
    } else {
        None
    }
}

/// A basename matches a wanted class only when its extension classifies
/// to exactly that class; an unclassifiable name fails the filter
pub(crate) fn matches(file_name: &str, wanted: FileTypeClass) -> bool {
    match super::extension_of(file_name) {
        Some(ext) => classify(ext) == Some(wanted),
        None => false,
    }
}
