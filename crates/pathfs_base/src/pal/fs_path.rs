use std::fmt;
use std::ops::Div;

/* 📖 # Why does FsPath carry a PathStyle?

The textual algebra (parent, filename, stem, root name) depends on which character separates
segments and whether drive prefixes like `C:` exist. Windows paths use `\` and drive letters,
POSIX paths use `/` and have no root name. Storing the style with the text makes
decomposition independent of the host the code happens to run on, so Windows-style paths can be
taken apart on Linux and vice versa. Host calls resolve paths in the native style.
*/

/// Separator convention of an [`FsPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStyle {
    /// `\` separator, optional `X:` drive prefix.
    Windows,
    /// `/` separator, no root name.
    Posix,
}

impl PathStyle {
    /// The style used by the host operating system.
    pub const fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    pub const fn separator(self) -> char {
        match self {
            PathStyle::Windows => '\\',
            PathStyle::Posix => '/',
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::native()
    }
}

/* 📖 # What does "not found" mean for decomposition?

Every decomposition is a search for the last separator or the last dot.
When the search finds nothing, the whole string is the filename (and the stem), while the parent
and the extension are empty. A filename whose only dot is its first character (`.gitignore`)
has no extension. The same rule applies to every operation, so no operation ever slices with a
sentinel index.
*/

/// A filesystem location as separator-delimited text.
///
/// An `FsPath` is a plain value: it does not guarantee that the location exists, and two paths
/// with the same text and style are equal. All methods here are lexical and never touch the
/// filesystem.
///
/// # Examples
///
/// ```
/// use pathfs_base::{FsPath, PathStyle};
///
/// let path = FsPath::with_style(r"C:\docs\report.txt", PathStyle::Windows);
/// assert_eq!(path.root_name(), "C:");
/// assert_eq!(path.parent_path().as_str(), r"C:\docs");
/// assert_eq!(path.filename(), "report.txt");
/// assert_eq!(path.stem(), "report");
/// assert_eq!(path.extension(), ".txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FsPath {
    text: String,
    style: PathStyle,
}

impl FsPath {
    /// Creates a path in the host's native style.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_style(text, PathStyle::native())
    }

    pub fn with_style(text: impl Into<String>, style: PathStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Text before the last separator; empty when there is no separator.
    pub fn parent_path(&self) -> FsPath {
        match self.last_separator() {
            Some(index) => self.derive(&self.text[..index]),
            None => self.derive(""),
        }
    }

    /// Text after the last separator; the whole text when there is no separator.
    pub fn filename(&self) -> &str {
        match self.last_separator() {
            Some(index) => &self.text[index + self.separator_len()..],
            None => &self.text,
        }
    }

    /// The filename without its extension. Dotfiles are returned unchanged.
    pub fn stem(&self) -> &str {
        let filename = self.filename();
        match extension_start(filename) {
            Some(index) => &filename[..index],
            None => filename,
        }
    }

    /// The extension including its leading dot, or empty.
    pub fn extension(&self) -> &str {
        let filename = self.filename();
        match extension_start(filename) {
            Some(index) => &filename[index..],
            None => "",
        }
    }

    /// Replaces the extension with `new_extension`, which is appended verbatim.
    ///
    /// A path without an extension keeps its full text. Pass `""` to strip the extension.
    pub fn replace_extension(&mut self, new_extension: &str) -> &mut Self {
        let keep = self.text.len() - self.extension().len();
        self.text.truncate(keep);
        self.text.push_str(new_extension);
        self
    }

    /// Appends `segment` with exactly one separator in between.
    ///
    /// No separator is inserted when this path is empty, already ends with a separator, or
    /// `segment` starts with one. Purely lexical; see `pathfs_ops::query::join_resolved` for
    /// the variant that asks the filesystem whether this path is a directory.
    pub fn join(&self, segment: impl AsRef<str>) -> FsPath {
        let segment = segment.as_ref();
        let separator = self.style.separator();
        let mut text = String::with_capacity(self.text.len() + segment.len() + 1);
        text.push_str(&self.text);
        if !self.text.is_empty() && !self.text.ends_with(separator) && !segment.starts_with(separator)
        {
            text.push(separator);
        }
        text.push_str(segment);
        self.derive(text)
    }

    /// Appends `segment` directly, without any separator.
    pub fn concat(&self, segment: impl AsRef<str>) -> FsPath {
        let mut text = self.text.clone();
        text.push_str(segment.as_ref());
        self.derive(text)
    }

    /// The drive prefix including its colon (`C:`), or empty.
    ///
    /// Only a colon that appears before the first separator counts. POSIX paths have no root
    /// name.
    pub fn root_name(&self) -> &str {
        if self.style != PathStyle::Windows {
            return "";
        }
        let head_end = self.text.find(self.style.separator()).unwrap_or(self.text.len());
        match self.text[..head_end].find(':') {
            Some(index) => &self.text[..=index],
            None => "",
        }
    }

    /// The separator if the text after the root name starts with one, else empty.
    pub fn root_directory(&self) -> &str {
        let root_name_len = self.root_name().len();
        let rest = &self.text[root_name_len..];
        if rest.starts_with(self.style.separator()) {
            &rest[..self.separator_len()]
        } else {
            ""
        }
    }

    /// The root name followed by one separator.
    pub fn root_path(&self) -> FsPath {
        let mut text = self.root_name().to_string();
        text.push(self.style.separator());
        self.derive(text)
    }

    pub fn is_absolute(&self) -> bool {
        !self.root_directory().is_empty()
    }

    fn last_separator(&self) -> Option<usize> {
        self.text.rfind(self.style.separator())
    }

    fn separator_len(&self) -> usize {
        self.style.separator().len_utf8()
    }

    fn derive(&self, text: impl Into<String>) -> FsPath {
        FsPath::with_style(text, self.style)
    }
}

/// Start index of the extension dot within `filename`, if it has an extension.
fn extension_start(filename: &str) -> Option<usize> {
    if filename == ".." {
        return None;
    }
    match filename.rfind('.') {
        Some(0) | None => None,
        Some(index) => Some(index),
    }
}

impl From<&str> for FsPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FsPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Lossy: bytes that are not valid UTF-8 are replaced with U+FFFD, so the result may name a
/// different location than `p`.
impl From<&std::path::Path> for FsPath {
    fn from(p: &std::path::Path) -> Self {
        Self::new(p.to_string_lossy().into_owned())
    }
}

impl AsRef<str> for FsPath {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl<S: AsRef<str>> Div<S> for &FsPath {
    type Output = FsPath;

    fn div(self, segment: S) -> FsPath {
        self.join(segment)
    }
}

impl<S: AsRef<str>> Div<S> for FsPath {
    type Output = FsPath;

    fn div(self, segment: S) -> FsPath {
        self.join(segment)
    }
}
