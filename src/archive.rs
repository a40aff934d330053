use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

/// Write a zip snapshot of `source` to `dest`, replacing any existing file.
///
/// The archive's top level contains a single folder named after `source`'s
/// base name, so extracting it anywhere reproduces the repository under its
/// own name instead of spilling raw contents. Directory entries carry a
/// trailing slash; file bytes are copied verbatim.
///
/// Entries are walked depth-first in pre-order with children in sorted name
/// order, so archiving the same tree twice produces identical output.
/// Symlinks are followed: a link to a file stores the target's bytes, a link
/// to a directory stores the target's tree under the link's name.
///
/// The zip is first written to a temporary file next to `dest` and renamed
/// over it on success. A failure mid-write therefore leaves the previous
/// archive (if any) untouched.
///
/// # Errors
/// Returns an error if `source` is missing or unreadable, if any entry
/// cannot be read, or if the destination cannot be written.
pub fn archive_dir(source: &Path, dest: &Path) -> Result<()> {
    let root_name = source
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("source has no usable base name: {}", source.display()))?
        .to_string();

    let dest_dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let tmp = tempfile::Builder::new()
        .suffix(".zip")
        .tempfile_in(dest_dir)
        .with_context(|| format!("cannot create archive in {}", dest_dir.display()))?;

    let mut zip = ZipWriter::new(tmp.as_file());
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    // Pre-order walk with an explicit stack; directory children are pushed
    // in reverse sorted order so they pop sorted.
    let mut stack: Vec<(PathBuf, String)> = vec![(source.to_path_buf(), root_name)];
    let mut buf = [0u8; 8192];

    while let Some((path, rel)) = stack.pop() {
        // metadata() follows symlinks, so a link to a directory archives the
        // target's tree under the link's name.
        let is_dir = path
            .metadata()
            .with_context(|| format!("cannot stat {}", path.display()))?
            .is_dir();

        if is_dir {
            zip.add_directory(rel.as_str(), options)?;

            let mut children: Vec<_> = fs::read_dir(&path)
                .with_context(|| format!("cannot read directory {}", path.display()))?
                .collect::<std::io::Result<Vec<_>>>()?;
            children.sort_by_key(|e| e.file_name());
            for child in children.into_iter().rev() {
                let name = child.file_name().to_string_lossy().into_owned();
                stack.push((child.path(), format!("{}/{}", rel, name)));
            }
        } else {
            zip.start_file(rel.as_str(), options)?;
            let mut f = fs::File::open(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            loop {
                let n = f.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                zip.write_all(&buf[..n])?;
            }
        }
    }

    zip.finish()?;
    drop(zip);
    tmp.persist(dest)
        .with_context(|| format!("cannot replace archive {}", dest.display()))?;
    Ok(())
}
