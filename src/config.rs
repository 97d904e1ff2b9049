use std::path::PathBuf;

/// Settings for an [Engine](crate::Engine) instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name given to a freshly created database. A loaded document keeps
    /// its own name.
    pub name: String,
    /// Location of the durable document.
    pub path: PathBuf,
    /// Start empty when `path` does not exist instead of failing.
    pub create_if_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "main".to_string(),
            path: PathBuf::from("quill.json"),
            create_if_missing: true,
        }
    }
}

impl Config {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }
}
