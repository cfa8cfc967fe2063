//! Lazy PEM block scanning
//!
//! Walks a byte buffer one `-----BEGIN ...-----` frame at a time. Decoding of
//! the frame (RFC 1421 headers, base64 body) is left to the `pem` crate.

const BEGIN_MARKER: &[u8] = b"-----BEGIN ";
const END_MARKER: &[u8] = b"-----END ";
const DASHES: &[u8] = b"-----";

/// Iterator over the PEM blocks of a buffer, in order of appearance.
///
/// Each step consumes one block and keeps the unconsumed remainder. Frames that
/// fail to decode are skipped and scanning resumes after their BEGIN line, so
/// stray text and broken blocks never end the iteration early. Once no further
/// BEGIN marker exists the iterator is exhausted for good.
#[derive(Debug, Clone)]
pub struct PemBlocks<'a> {
    rest: &'a [u8],
}

impl<'a> PemBlocks<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }

    /// Bytes not yet consumed
    pub fn remainder(&self) -> &'a [u8] {
        self.rest
    }
}

/// Scan `data` for PEM blocks
pub fn pem_blocks(data: &[u8]) -> PemBlocks<'_> {
    PemBlocks::new(data)
}

impl Iterator for PemBlocks<'_> {
    type Item = ::pem::Pem;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(start) = find(self.rest, BEGIN_MARKER) else {
                self.rest = &[];
                return None;
            };
            let candidate = &self.rest[start..];

            if let Some(len) = frame_len(candidate) {
                if let Ok(block) = ::pem::parse(&candidate[..len]) {
                    self.rest = &candidate[len..];
                    return Some(block);
                }
            }

            self.rest = &candidate[BEGIN_MARKER.len()..];
        }
    }
}

impl std::iter::FusedIterator for PemBlocks<'_> {}

/// Length of the frame starting at `data`, through the end of its END line.
fn frame_len(data: &[u8]) -> Option<usize> {
    let label_start = BEGIN_MARKER.len();
    let label_len = find(&data[label_start..], DASHES)?;
    let label = &data[label_start..label_start + label_len];
    if label.contains(&b'\n') {
        return None;
    }

    let mut end_line = END_MARKER.to_vec();
    end_line.extend_from_slice(label);
    end_line.extend_from_slice(DASHES);

    let body_start = label_start + label_len + DASHES.len();
    let end_at = body_start + find(&data[body_start..], &end_line)? + end_line.len();

    let line_end = data[end_at..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| end_at + i + 1)
        .unwrap_or(data.len());

    Some(line_end)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
