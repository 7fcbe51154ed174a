use spirit_match::matching::Catalog;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Files in `dir` with extension `ext` (case-insensitive), sorted by name.
pub(crate) fn list_files(dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches_ext = path
            .extension()
            .and_then(|found| found.to_str())
            .is_some_and(|found| found.eq_ignore_ascii_case(ext));
        if path.is_file() && matches_ext {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn load_catalog(dir: &Path, ext: &str) -> io::Result<Catalog> {
    let names = list_files(dir, ext)?
        .into_iter()
        .filter_map(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
        });
    Ok(Catalog::from_file_names(names))
}
