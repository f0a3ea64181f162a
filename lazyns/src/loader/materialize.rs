//!
//! Materializers run the defining source of a symbol the first time it is
//! referenced and hand back its payload.
//!

use std::fs;
use std::io;
use std::path::Path;

pub trait Materializer: Send {
    fn materialize(&mut self, path: &Path, cpath: &str) -> io::Result<String>;
}

/// Default materializer: the payload of a symbol is the contents of the
/// file that defines it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadSource;

impl Materializer for ReadSource {
    fn materialize(&mut self, path: &Path, _cpath: &str) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

impl<F> Materializer for F
where
    F: FnMut(&Path, &str) -> io::Result<String> + Send,
{
    fn materialize(&mut self, path: &Path, cpath: &str) -> io::Result<String> {
        self(path, cpath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("foo.rb");
        fs::write(&path, "Foo = true").unwrap();

        let payload = ReadSource.materialize(&path, "Foo").unwrap();
        assert_eq!(payload, "Foo = true");
    }

    #[test]
    fn test_read_source_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ReadSource.materialize(&temp_dir.path().join("nope.rb"), "Nope");
        assert!(result.is_err());
    }

    #[test]
    fn test_closure_materializer() {
        let mut calls = 0;
        let mut materializer = |_: &Path, cpath: &str| {
            calls += 1;
            Ok(format!("payload for {}", cpath))
        };

        let payload = materializer.materialize(Path::new("/x.rb"), "X").unwrap();
        assert_eq!(payload, "payload for X");
        assert_eq!(calls, 1);
    }
}
