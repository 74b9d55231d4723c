use std::{fs::File, io::{BufWriter, Write}, path::Path};
use anyhow::{Context, Result};

pub use readset::utils::Compression;

/// Create a file for writing, possibly compressed. When `compression` is not
/// given it is guessed from the file extension.
pub fn open_file_for_write<P: AsRef<Path>>(
    filename: P,
    compression: Option<Compression>,
    compression_level: Option<u32>,
) -> Result<Box<dyn Write + Send>> {
    let compression = compression.or_else(|| Compression::from_extension(filename.as_ref()));
    let buffer = BufWriter::new(
        File::create(&filename).with_context(|| format!("cannot create file: {}", filename.as_ref().display()))?
    );
    let writer: Box<dyn Write + Send> = match compression {
        None => Box::new(buffer),
        Some(Compression::Gzip) => Box::new(flate2::write::GzEncoder::new(buffer, flate2::Compression::new(compression_level.unwrap_or(6)))),
        Some(Compression::Zstd) => {
            let zstd = zstd::stream::Encoder::new(buffer, compression_level.unwrap_or(9) as i32)?;
            Box::new(zstd.auto_finish())
        },
    };
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn round_trip(name: &str, compression: Option<Compression>) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        {
            let mut writer = open_file_for_write(&path, compression, None).unwrap();
            writeln!(writer, "0\t134").unwrap();
        }
        let mut content = String::new();
        readset::utils::open_file(&path).unwrap().read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_write_compressed() {
        assert_eq!(round_trip("out.tsv", None), "0\t134\n");
        assert_eq!(round_trip("out.tsv.gz", None), "0\t134\n");
        assert_eq!(round_trip("out.tsv.zst", None), "0\t134\n");
        assert_eq!(round_trip("out.gz", Some(Compression::Gzip)), "0\t134\n");
    }

    #[test]
    fn test_create_in_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_file_for_write(dir.path().join("a/b/out.txt"), None, None).is_err());
    }
}
