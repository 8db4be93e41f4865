use std::path::Path;

/// File name suffixes that get merged. Matching is case-sensitive.
pub const SOURCE_EXTENSIONS: [&str; 2] = [".h", ".cpp"];

pub fn is_source_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| {
        let name = name.as_encoded_bytes();
        SOURCE_EXTENSIONS
            .iter()
            .any(|ext| name.ends_with(ext.as_bytes()))
    })
}

/// Reports whether `output` sits somewhere under `root`. Both paths must exist.
pub fn is_inside(output: &Path, root: &Path) -> bool {
    match (output.canonicalize(), root.canonicalize()) {
        (Ok(output), Ok(root)) => output.starts_with(root),
        _ => false,
    }
}
