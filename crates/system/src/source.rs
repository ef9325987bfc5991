//! Counter and sensor files.
//!
//! Samplers never touch the filesystem directly; they go through
//! [`CounterSource`] (an open handle that can be re-read) and
//! [`SourceOpener`] (which discovers handles by path). The [`mock`] module
//! provides scripted stand-ins that count every open and read.

use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

/// An open kernel counter that can be re-read without reopening.
pub trait CounterSource {
    /// Returns the current contents, read from the start.
    fn read(&mut self) -> io::Result<String>;

    /// Path the source was opened from, for diagnostics.
    fn path(&self) -> &Path;
}

/// Opens [`CounterSource`]s by path.
pub trait SourceOpener {
    type Source: CounterSource;

    fn open(&self, path: &Path) -> io::Result<Self::Source>;
}

/// A counter backed by a file kept open for the process lifetime.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: File,
}

/// Opens [`FileSource`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileOpener;

// === impl FileSource ===

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self { path, file })
    }
}

impl CounterSource for FileSource {
    fn read(&mut self) -> io::Result<String> {
        let mut contents = String::new();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_string(&mut contents)?;
        Ok(contents)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

// === impl FileOpener ===

impl SourceOpener for FileOpener {
    type Source = FileSource;

    fn open(&self, path: &Path) -> io::Result<FileSource> {
        FileSource::open(path)
    }
}

/// Scripted sources for tests.
pub mod mock {
    use super::*;
    use std::{
        cell::RefCell,
        collections::{HashMap, VecDeque},
        rc::Rc,
    };

    /// A scripted filesystem.
    ///
    /// Each path holds a queue of readings; a read pops the front, except
    /// that the last reading is sticky. `None` in the queue is a read error.
    /// Opening a path with no script fails with `NotFound`. Clones share
    /// the same script and counters.
    #[derive(Clone, Default)]
    pub struct MockOpener {
        inner: Rc<RefCell<Inner>>,
    }

    #[derive(Default)]
    struct Inner {
        files: HashMap<PathBuf, VecDeque<Option<String>>>,
        opens: HashMap<PathBuf, usize>,
        reads: HashMap<PathBuf, usize>,
    }

    /// A handle returned by [`MockOpener::open`].
    pub struct MockSource {
        path:  PathBuf,
        inner: Rc<RefCell<Inner>>,
    }

    // === impl MockOpener ===

    impl MockOpener {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script successive readings for `path`.
        #[must_use]
        pub fn with<I, T>(self, path: impl AsRef<Path>, readings: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Into<String>,
        {
            for reading in readings {
                self.push(&path, Some(reading.into()));
            }
            self
        }

        /// Append one reading (`None` = read error) to `path`'s script.
        pub fn push(&self, path: impl AsRef<Path>, reading: Option<String>) {
            self.inner
                .borrow_mut()
                .files
                .entry(path.as_ref().to_path_buf())
                .or_default()
                .push_back(reading);
        }

        /// Replace `path`'s script so every further read fails.
        pub fn break_reads(&self, path: impl AsRef<Path>) {
            let mut inner = self.inner.borrow_mut();
            let script = inner.files.entry(path.as_ref().to_path_buf()).or_default();
            script.clear();
            script.push_back(None);
        }

        /// Forget `path`, so opening it fails from now on.
        pub fn remove(&self, path: impl AsRef<Path>) {
            self.inner.borrow_mut().files.remove(path.as_ref());
        }

        /// Open attempts on `path`, including failed ones.
        pub fn opens(&self, path: impl AsRef<Path>) -> usize {
            self.inner.borrow().opens.get(path.as_ref()).copied().unwrap_or(0)
        }

        /// Read attempts on `path`, including failed ones.
        pub fn reads(&self, path: impl AsRef<Path>) -> usize {
            self.inner.borrow().reads.get(path.as_ref()).copied().unwrap_or(0)
        }

        /// Open and read attempts across every path.
        pub fn total_io(&self) -> usize {
            let inner = self.inner.borrow();
            inner.opens.values().chain(inner.reads.values()).sum()
        }
    }

    impl SourceOpener for MockOpener {
        type Source = MockSource;

        fn open(&self, path: &Path) -> io::Result<MockSource> {
            let mut inner = self.inner.borrow_mut();
            *inner.opens.entry(path.to_path_buf()).or_default() += 1;

            if !inner.files.contains_key(path) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such mock file"));
            }
            Ok(MockSource {
                path:  path.to_path_buf(),
                inner: Rc::clone(&self.inner),
            })
        }
    }

    // === impl MockSource ===

    impl CounterSource for MockSource {
        fn read(&mut self) -> io::Result<String> {
            let Self { path, inner } = self;
            let mut inner = inner.borrow_mut();
            *inner.reads.entry(path.clone()).or_default() += 1;

            let script = inner
                .files
                .get_mut(path.as_path())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "mock file removed"))?;
            let reading = if script.len() > 1 {
                script.pop_front().flatten()
            } else {
                script.front().cloned().flatten()
            };
            reading.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "mock read error"))
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{mock::MockOpener, *};

    #[test]
    fn file_source_rereads_from_start() {
        let path = std::env::temp_dir().join(format!("cputray-source-{}", std::process::id()));
        std::fs::write(&path, "1000\n").unwrap();

        let mut source = FileOpener.open(&path).unwrap();
        assert_eq!(source.read().unwrap(), "1000\n");
        std::fs::write(&path, "2000\n").unwrap();
        assert_eq!(source.read().unwrap(), "2000\n");
        assert_eq!(source.path(), path.as_path());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_opener_reports_missing_files() {
        let err = FileOpener.open(Path::new("/nonexistent/cputray")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn mock_last_reading_is_sticky() {
        let opener = MockOpener::new().with("/a", ["1", "2"]);
        let mut source = opener.open(Path::new("/a")).unwrap();
        assert_eq!(source.read().unwrap(), "1");
        assert_eq!(source.read().unwrap(), "2");
        assert_eq!(source.read().unwrap(), "2");
        assert_eq!(opener.opens("/a"), 1);
        assert_eq!(opener.reads("/a"), 3);
    }

    #[test]
    fn mock_counts_failed_opens() {
        let opener = MockOpener::new();
        assert!(opener.open(Path::new("/missing")).is_err());
        assert_eq!(opener.opens("/missing"), 1);
        assert_eq!(opener.total_io(), 1);
    }

    #[test]
    fn mock_break_reads_fails_open_handles() {
        let opener = MockOpener::new().with("/a", ["1"]);
        let mut source = opener.open(Path::new("/a")).unwrap();
        opener.break_reads("/a");
        assert!(source.read().is_err());
    }
}
