use std::fmt;
use std::io::{self, Read};

use crate::Error;

/// Container classification assigned to one input path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    NotAnArchive,
    Tar(TarCompress),
    Zip,
    Gzip,
    Bzip2,
}

impl ArchiveKind {
    pub fn is_archive(self) -> bool { self != Self::NotAnArchive }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnArchive => f.write_str("plain"),
            Self::Tar(TarCompress::None) => f.write_str("tar"),
            Self::Tar(codec) => write!(f, "tar+{codec}"),
            Self::Zip => f.write_str("zip"),
            Self::Gzip => f.write_str("gzip"),
            Self::Bzip2 => f.write_str("bzip2"),
        }
    }
}

/// Transparent compression wrapped around a tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TarCompress {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl fmt::Display for TarCompress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        })
    }
}

impl TarCompress {
    /// Create a decoder for this compression codec.
    pub fn decoder<R: Read>(self, reader: R) -> Result<Decoder<R>, Error> {
        match self {
            Self::None => Ok(Decoder::Passthrough(reader)),
            Self::Gzip => Ok(Decoder::Gzip(Box::new(flate2::read::MultiGzDecoder::new(
                reader,
            )))),
            Self::Bzip2 => Ok(Decoder::Bzip2(Box::new(bzip2::read::MultiBzDecoder::new(
                reader,
            )))),
            #[cfg(feature = "xz")]
            Self::Xz => Ok(Decoder::Xz(Box::new(xz2::read::XzDecoder::new_multi_decoder(
                reader,
            )))),
            #[cfg(not(feature = "xz"))]
            Self::Xz => Err(Error::UnsupportedFormat),
            #[cfg(feature = "zstd")]
            Self::Zstd => {
                let decoder = zstd::stream::read::Decoder::new(reader)
                    .map_err(|e| Error::corrupted(ArchiveKind::Tar(self), e))?;
                Ok(Decoder::Zstd(Box::new(decoder)))
            }
            #[cfg(not(feature = "zstd"))]
            Self::Zstd => Err(Error::UnsupportedFormat),
        }
    }
}

/// Decoder wrapper for tar decompression.
pub enum Decoder<R: Read> {
    Passthrough(R),
    Gzip(Box<flate2::read::MultiGzDecoder<R>>),
    Bzip2(Box<bzip2::read::MultiBzDecoder<R>>),
    #[cfg(feature = "xz")]
    Xz(Box<xz2::read::XzDecoder<R>>),
    #[cfg(feature = "zstd")]
    Zstd(Box<zstd::stream::read::Decoder<'static, io::BufReader<R>>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            Self::Bzip2(d) => d.read(buf),
            #[cfg(feature = "xz")]
            Self::Xz(d) => d.read(buf),
            #[cfg(feature = "zstd")]
            Self::Zstd(d) => d.read(buf),
        }
    }
}

pub const TAR_BLOCK: usize = 512;

const CHECKSUM_RANGE: std::ops::Range<usize> = 148..156;

/// Pick the decompressor a tar stream would need from its leading bytes.
pub fn detect_compression(magic: &[u8]) -> TarCompress {
    match magic {
        [0x1F, 0x8B, ..] => TarCompress::Gzip,
        [b'B', b'Z', b'h', ..] => TarCompress::Bzip2,
        [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => TarCompress::Xz,
        [0x28, 0xB5, 0x2F, 0xFD, ..] => TarCompress::Zstd,
        _ => TarCompress::None,
    }
}

/// True when `block` is a tar header whose checksum verifies.
///
/// The ustar magic is not required, so v7 archives qualify as well. Both the
/// unsigned and the historical signed checksum are accepted.
pub fn is_tar_header(block: &[u8]) -> bool {
    if block.len() < TAR_BLOCK {
        return false;
    }
    let block = &block[..TAR_BLOCK];
    if block.iter().all(|&b| b == 0) {
        return false;
    }

    let Some(stored) = parse_octal(&block[CHECKSUM_RANGE]) else {
        return false;
    };

    let mut unsigned = 0u64;
    let mut signed = 0i64;
    for (i, &b) in block.iter().enumerate() {
        let b = if CHECKSUM_RANGE.contains(&i) { b' ' } else { b };
        unsigned += u64::from(b);
        signed += i64::from(b as i8);
    }

    stored == unsigned || i64::try_from(stored).is_ok_and(|s| s == signed)
}

fn parse_octal(field: &[u8]) -> Option<u64> {
    let digits: &[u8] = {
        let start = field.iter().position(|&b| b != b' ' && b != 0)?;
        let rest = &field[start..];
        let end = rest
            .iter()
            .position(|&b| b == b' ' || b == 0)
            .unwrap_or(rest.len());
        &rest[..end]
    };
    digits.iter().try_fold(0u64, |acc, &d| match d {
        b'0'..=b'7' => Some(acc * 8 + u64::from(d - b'0')),
        _ => None,
    })
}

/// Read the first tar block of a possibly compressed stream.
///
/// Returns the compression in use when that block is a valid tar header.
pub fn probe_tar<R: Read>(magic: &[u8], reader: R) -> Option<TarCompress> {
    let codec = detect_compression(magic);
    let mut decoder = codec.decoder(reader).ok()?;
    let mut block = [0u8; TAR_BLOCK];
    decoder.read_exact(&mut block).ok()?;
    is_tar_header(&block).then_some(codec)
}
