use flate2::read::MultiGzDecoder;
use log::debug;
use std::io::{self, Cursor, Read};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression detected at the start of a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    None,
}

impl Compression {
    fn detect(head: &[u8]) -> Self {
        if head.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }
}

/// Sniff the first bytes of `reader` and wrap it in a gzip decoder when they
/// carry the gzip magic. Anything else passes through untouched.
///
/// Returns `Ok(None)` when the stream has no bytes at all.
pub fn decompress<R>(mut reader: R) -> io::Result<Option<(Compression, Box<dyn Read + Send>)>>
where
    R: Read + Send + 'static,
{
    let mut head = [0u8; GZIP_MAGIC.len()];
    let mut filled = 0;
    while filled < head.len() {
        match reader.read(&mut head[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    if filled == 0 {
        return Ok(None);
    }

    let compression = Compression::detect(&head[..filled]);
    debug!("Detected compression: {:?}", compression);

    // Put the sniffed bytes back in front of the remaining stream
    let stream = Cursor::new(head[..filled].to_vec()).chain(reader);
    let stream: Box<dyn Read + Send> = match compression {
        Compression::Gzip => Box::new(MultiGzDecoder::new(stream)),
        Compression::None => Box::new(stream),
    };

    Ok(Some((compression, stream)))
}
