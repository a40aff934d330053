use std::fs;
use std::path::{Path, PathBuf};

/// Total byte size of all regular files under `root`.
///
/// This is the change signature used to decide whether a mirror's content
/// moved between two points in time: the value is only ever compared for
/// equality, never persisted. Directories contribute nothing themselves;
/// a missing or empty directory measures 0.
///
/// The walk is total by construction. Entries that cannot be read (missing
/// permissions, files racing with deletion) count as 0 instead of failing,
/// so a before/after comparison around a pull always completes.
///
/// Known limitation, kept on purpose: a size sum is a cheap change proxy and
/// cannot see an edit that leaves the total byte count untouched. The skip
/// decision downstream depends on exactly this behavior; replacing it with a
/// content hash would change which runs rewrite archives.
///
/// `.git` control directories are excluded from the sum. Fetching rewrites
/// bookkeeping files under `.git` even when no commit arrived, which would
/// otherwise flag every pull as a change.
///
/// The traversal uses an explicit stack rather than recursion, so deeply
/// nested trees cannot exhaust the call stack.
pub fn dir_size(root: &Path) -> u64 {
    let mut total: u64 = 0;
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let rd = match fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(_) => continue,
        };
        for ent in rd.flatten() {
            let ft = match ent.file_type() {
                Ok(ft) => ft,
                Err(_) => continue,
            };
            if ft.is_dir() {
                if ent.file_name() == ".git" {
                    continue;
                }
                stack.push(ent.path());
            } else if ft.is_file() {
                total += ent.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_directory_measures_zero() {
        let td = tempdir().unwrap();
        assert_eq!(dir_size(&td.path().join("no_such_dir")), 0);
    }

    #[test]
    fn empty_directory_measures_zero() {
        let td = tempdir().unwrap();
        assert_eq!(dir_size(td.path()), 0);
    }

    #[test]
    fn sums_nested_regular_files() {
        let td = tempdir().unwrap();
        let base = td.path();

        fs::write(base.join("a.txt"), b"12345").unwrap();
        fs::create_dir_all(base.join("sub").join("deeper")).unwrap();
        fs::write(base.join("sub").join("b.txt"), b"123").unwrap();
        fs::write(base.join("sub").join("deeper").join("c.txt"), b"12").unwrap();
        fs::create_dir(base.join("empty")).unwrap();

        assert_eq!(dir_size(base), 10);
    }

    #[test]
    fn measure_is_additive_over_children() {
        let td = tempdir().unwrap();
        let base = td.path();

        let left = base.join("left");
        let right = base.join("right");
        fs::create_dir(&left).unwrap();
        fs::create_dir(&right).unwrap();
        fs::write(left.join("x"), vec![0u8; 700]).unwrap();
        fs::write(right.join("y"), vec![0u8; 42]).unwrap();
        fs::write(base.join("top"), vec![0u8; 8]).unwrap();

        assert_eq!(dir_size(base), dir_size(&left) + dir_size(&right) + 8);
    }

    #[test]
    fn git_control_directory_is_ignored() {
        let td = tempdir().unwrap();
        let base = td.path();
        fs::write(base.join("tracked"), b"12345678").unwrap();
        fs::create_dir(base.join(".git")).unwrap();
        fs::write(base.join(".git").join("FETCH_HEAD"), b"noise").unwrap();

        assert_eq!(dir_size(base), 8);
    }

    #[test]
    fn same_total_size_is_indistinguishable() {
        // The documented false negative of the size signature.
        let td = tempdir().unwrap();
        fs::write(td.path().join("f"), b"aaaa").unwrap();
        let before = dir_size(td.path());
        fs::write(td.path().join("f"), b"bbbb").unwrap();
        assert_eq!(before, dir_size(td.path()));
    }
}
