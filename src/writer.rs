use anyhow::{Context, Result};
use content_inspector::inspect;
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

/// Bytes peeked at the start of each file to decide whether it looks binary.
const SNIFF_LEN: u64 = 8192;

/// Append-only sink for the merged output.
pub struct SourceWriter<W: Write> {
    writer: W,
}

impl<W: Write> SourceWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes the `===== <path> =====` separator that precedes a file's bytes.
    pub fn write_delimiter(&mut self, path: &Path) -> Result<()> {
        // Raw bytes, so names that are not valid UTF-8 survive unchanged.
        [
            b"\n\n===== ".as_slice(),
            path.as_os_str().as_encoded_bytes(),
            b" =====\n\n".as_slice(),
        ]
        .iter()
        .try_for_each(|part| self.writer.write_all(part))
        .with_context(|| format!("Failed to write delimiter for {}", path.display()))
    }

    /// Copies the file at `path` into the sink byte for byte.
    ///
    /// On failure whatever was read before the error stays in the sink.
    pub fn append_contents(&mut self, path: &Path) -> Result<u64> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        self.copy_from(BufReader::new(file), path)
    }

    fn copy_from<R: Read>(&mut self, mut reader: R, path: &Path) -> Result<u64> {
        let mut head = Vec::new();
        let sniffed = reader.by_ref().take(SNIFF_LEN).read_to_end(&mut head);

        self.writer
            .write_all(&head)
            .with_context(|| format!("Failed to copy {}", path.display()))?;
        sniffed.with_context(|| format!("Failed to read {}", path.display()))?;

        if inspect(&head).is_binary() {
            debug!("{} looks binary, copying it unchanged", path.display());
        }

        let rest = io::copy(&mut reader, &mut self.writer)
            .with_context(|| format!("Failed to copy {}", path.display()))?;

        let copied = head.len() as u64 + rest;
        debug!("Copied {} bytes from {}", copied, path.display());
        Ok(copied)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn delimiter_has_exact_shape() -> Result<()> {
        let mut writer = SourceWriter::new(Vec::new());
        writer.write_delimiter(Path::new("src/a.cpp"))?;
        assert_eq!(writer.into_inner(), b"\n\n===== src/a.cpp =====\n\n");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn delimiter_keeps_non_utf8_names() -> Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"src/caf\xe9.cpp"));
        let mut writer = SourceWriter::new(Vec::new());
        writer.write_delimiter(path)?;

        assert_eq!(writer.into_inner(), b"\n\n===== src/caf\xe9.cpp =====\n\n");
        Ok(())
    }

    /// Hands out its bytes on the first read, then fails.
    struct FailsAfter {
        data: &'static [u8],
        served: bool,
    }

    impl Read for FailsAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::other("device went away"));
            }
            self.served = true;
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            Ok(n)
        }
    }

    #[test]
    fn bytes_read_before_an_error_are_kept() {
        let reader = FailsAfter {
            data: b"int partial",
            served: false,
        };
        let mut writer = SourceWriter::new(Vec::new());

        let err = writer
            .copy_from(reader, Path::new("partial.cpp"))
            .unwrap_err();

        assert!(format!("{err:#}").contains("device went away"));
        assert_eq!(writer.into_inner(), b"int partial");
    }

    #[test]
    fn contents_are_copied_verbatim() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("blob.h");
        // Larger than the sniff window, with NULs and invalid UTF-8.
        let mut bytes: Vec<u8> = (0..=255u8).cycle().take(SNIFF_LEN as usize * 3 + 17).collect();
        bytes.extend_from_slice(&[0xff, 0xfe, 0x00, b'\r', b'\n']);
        fs::write(&path, &bytes)?;

        let mut writer = SourceWriter::new(Vec::new());
        let copied = writer.append_contents(&path)?;

        assert_eq!(copied, bytes.len() as u64);
        assert_eq!(writer.into_inner(), bytes);
        Ok(())
    }

    #[test]
    fn empty_file_copies_nothing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.cpp");
        fs::write(&path, "")?;

        let mut writer = SourceWriter::new(Vec::new());
        assert_eq!(writer.append_contents(&path)?, 0);
        assert!(writer.into_inner().is_empty());
        Ok(())
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.cpp");

        let mut writer = SourceWriter::new(Vec::new());
        let err = writer.append_contents(&path).unwrap_err();

        assert!(format!("{err:#}").contains("gone.cpp"));
        assert!(writer.into_inner().is_empty());
    }
}
