use std::fs;
use std::path::{Path, PathBuf};

/// Write `contents` to `dir/name` and return the path.
pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture file");
    path
}

/// Protected schedule document fixing A-B and C-D in slot 1.
pub const PROTECTED_SLOT_ONE: &str = r#"{
  "slots": {
    "1": [
      { "host": "A", "visitor": "B", "network": "national" },
      { "host": "C", "visitor": "D" }
    ]
  }
}"#;
