// Record encoder: newline-delimited JSON, optionally through a gzip stream.
// The buffer is only reachable through `finish`, so compressed bytes are never read before the
// gzip trailer has been written.

use crate::error::EncodeError;
use bytes::Bytes;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{BufRead, BufReader, Read, Write};

pub const DEFAULT_GZIP_LEVEL: u32 = 6;
const MAX_GZIP_LEVEL: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip { level: u32 },
    Plain,
}

impl Encoding {
    pub fn gzip() -> Self {
        Encoding::Gzip {
            level: DEFAULT_GZIP_LEVEL,
        }
    }

    /// File extension carried by the archive key.
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::Gzip { .. } => ".json.gz",
            Encoding::Plain => ".json",
        }
    }
}

enum Sink {
    Plain(Vec<u8>),
    Gzip(GzEncoder<Vec<u8>>),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Sink::Plain(v) => v.write(buf),
            Sink::Gzip(g) => g.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Sink::Plain(v) => v.flush(),
            Sink::Gzip(g) => g.flush(),
        }
    }
}

/// Accumulates one combination's responses.
pub struct RecordEncoder {
    sink: Sink,
    encoding: Encoding,
    records: usize,
}

impl RecordEncoder {
    pub fn new(encoding: Encoding) -> Self {
        let sink = match encoding {
            Encoding::Gzip { level } => Sink::Gzip(GzEncoder::new(
                Vec::with_capacity(4096),
                Compression::new(level.min(MAX_GZIP_LEVEL)),
            )),
            Encoding::Plain => Sink::Plain(Vec::with_capacity(4096)),
        };
        Self {
            sink,
            encoding,
            records: 0,
        }
    }

    /// Serialize one response as a single JSON line.
    pub fn push<T: Serialize>(&mut self, record: &T) -> Result<(), EncodeError> {
        serde_json::to_writer(&mut self.sink, record)?;
        self.sink.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    pub fn records(&self) -> usize {
        self.records
    }

    /// Finalize the stream (gzip trailer included) and hand out the bytes.
    pub fn finish(self) -> Result<EncodedArchive, EncodeError> {
        let bytes = match self.sink {
            Sink::Plain(v) => v,
            Sink::Gzip(g) => g.finish()?,
        };
        Ok(EncodedArchive {
            bytes: Bytes::from(bytes),
            encoding: self.encoding,
            records: self.records,
        })
    }
}

/// Finalized output of one combination, ready for upload.
#[derive(Debug, Clone)]
pub struct EncodedArchive {
    pub bytes: Bytes,
    pub encoding: Encoding,
    pub records: usize,
}

/// Reverse of `RecordEncoder`: decompress if needed and parse every line.
pub fn decode_records<T: DeserializeOwned>(
    bytes: &[u8],
    encoding: Encoding,
) -> Result<Vec<T>, EncodeError> {
    let reader: Box<dyn Read + '_> = match encoding {
        Encoding::Gzip { .. } => Box::new(GzDecoder::new(bytes)),
        Encoding::Plain => Box::new(bytes),
    };
    let mut out = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(out)
}
