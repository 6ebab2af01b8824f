//! Advisory lock over a store directory.
//!
//! Every registry read-check-write runs while holding an exclusive `flock`
//! on a lock file in the store directory. Separate handles and separate
//! processes on the same directory therefore serialise their mutations.

use std::fs::File;
use std::io;

use cap_std::fs::{Dir, OpenOptions};
use fs2::FileExt;

pub(crate) const LOCK_FILE: &str = ".registry.lock";

/// Exclusive lock released on drop.
#[derive(Debug)]
pub(crate) struct DirectoryLock {
    file: File,
}

impl DirectoryLock {
    /// Block until the exclusive lock on `dir` is held.
    pub(crate) fn acquire(dir: &Dir) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true).write(true);
        let file = dir.open_with(LOCK_FILE, &options)?.into_std();
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for DirectoryLock {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock as well.
        drop(FileExt::unlock(&self.file));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;
    use rstest::rstest;

    fn temp_dir() -> (tempfile::TempDir, Dir) {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open dir");
        (tmp, dir)
    }

    #[rstest]
    fn lock_is_exclusive_until_dropped() {
        let (_tmp, dir) = temp_dir();
        let held = DirectoryLock::acquire(&dir).expect("first lock");

        let contender = dir.open(LOCK_FILE).expect("lock file exists").into_std();
        assert!(contender.try_lock_exclusive().is_err());

        drop(held);
        assert!(contender.try_lock_exclusive().is_ok());
    }
}
