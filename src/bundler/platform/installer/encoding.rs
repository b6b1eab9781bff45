//! EULA text encoding detection.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::EulaEncoding,
};
use std::{fmt, path::Path};
use tokio::io::AsyncReadExt;

/// Encoding found from the byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    Utf32Be,
    Utf32Le,
    Utf8,
    Utf16Be,
    Utf16Le,
    /// No byte-order mark.
    Ascii,
}

impl fmt::Display for DetectedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DetectedEncoding::Utf32Be => "UTF-32BE",
            DetectedEncoding::Utf32Le => "UTF-32LE",
            DetectedEncoding::Utf8 => "UTF-8",
            DetectedEncoding::Utf16Be => "UTF-16BE",
            DetectedEncoding::Utf16Le => "UTF-16LE",
            DetectedEncoding::Ascii => "US-ASCII",
        })
    }
}

/// Classify the first bytes of a file. Longer marks are checked first since
/// `FF FE 00 00` also starts with the UTF-16LE mark.
pub fn detect(head: &[u8]) -> DetectedEncoding {
    match head {
        [0x00, 0x00, 0xFE, 0xFF, ..] => DetectedEncoding::Utf32Be,
        [0xFF, 0xFE, 0x00, 0x00, ..] => DetectedEncoding::Utf32Le,
        [0xEF, 0xBB, 0xBF, ..] => DetectedEncoding::Utf8,
        [0xFE, 0xFF, ..] => DetectedEncoding::Utf16Be,
        [0xFF, 0xFE, ..] => DetectedEncoding::Utf16Le,
        _ => DetectedEncoding::Ascii,
    }
}

/// Read the first four bytes of `path` and classify them.
pub async fn detect_file(path: &Path) -> Result<DetectedEncoding> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening EULA", path)?;
    let mut head = [0u8; 4];
    let mut filled = 0;
    while filled < head.len() {
        let n = file
            .read(&mut head[filled..])
            .await
            .fs_context("reading EULA", path)?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(detect(&head[..filled]))
}

/// xpack option for a EULA in the given encoding, checked against the declared one.
///
/// UTF-8 with a byte-order mark goes through the plain `-eula` path like ASCII.
pub fn eula_flag(declared: EulaEncoding, detected: DetectedEncoding) -> Result<&'static str> {
    let flag = match detected {
        DetectedEncoding::Ascii | DetectedEncoding::Utf8 => "-eula",
        DetectedEncoding::Utf16Le => "-unicode-eula",
        unsupported => {
            return Err(Error::Config(format!(
                "EULA encoding {unsupported} is not supported, use US-ASCII or UTF-16LE"
            )));
        }
    };

    let matches = match declared {
        EulaEncoding::Autodetect => true,
        EulaEncoding::UsAscii => flag == "-eula",
        EulaEncoding::Utf16Le => flag == "-unicode-eula",
    };
    if !matches {
        return Err(Error::Config(format!(
            "EULA is declared as {} but its byte-order mark says {detected}",
            declared.as_str()
        )));
    }
    Ok(flag)
}
