//! Outbound helper that splits a message into wire segments.
//!
//! A message that fits one segment together with the `Finish` header travels
//! as a single `Finish`. Longer messages open with a `Start` declaring the
//! total size, continue with `Part` segments filled to the ceiling, and close
//! with a `Finish` carrying the receipt id.

use super::{Segment, SegmentKind};
use crate::ReceiptId;

/// Smallest segment ceiling that lets a `Start` carry at least one byte.
pub const MIN_SEGMENT_SIZE: usize = SegmentKind::Start.header_len() + 1;

/// Segment ceiling known to be at least [`MIN_SEGMENT_SIZE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentSize(usize);

impl SegmentSize {
    /// Validate a host-provided ceiling.
    ///
    /// Returns `None` when `segment_size` is below [`MIN_SEGMENT_SIZE`].
    #[must_use]
    pub const fn new(segment_size: usize) -> Option<Self> {
        if segment_size < MIN_SEGMENT_SIZE {
            None
        } else {
            Some(Self(segment_size))
        }
    }

    /// Ceiling in bytes.
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

/// Iterator over the segments of one outbound message.
///
/// # Examples
///
/// ```
/// use toxext_messages::{
///     ReceiptId,
///     segment::{Chunker, SegmentKind, SegmentSize},
/// };
///
/// let ceiling = SegmentSize::new(16).expect("ceiling is large enough");
/// // 7 bytes ride the `Start`, 15 a full `Part`, and the last 8 are one byte
/// // too many for a `Finish`.
/// let payload = [7_u8; 30];
/// let kinds: Vec<_> = Chunker::new(&payload, ReceiptId::new(1), ceiling)
///     .map(|segment| segment.kind())
///     .collect();
/// assert_eq!(
///     kinds,
///     [
///         SegmentKind::Start,
///         SegmentKind::Part,
///         SegmentKind::Part,
///         SegmentKind::Finish,
///     ]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Chunker<'a> {
    remaining: &'a [u8],
    total_size: u64,
    receipt: ReceiptId,
    segment_size: usize,
    started: bool,
    finished: bool,
}

impl<'a> Chunker<'a> {
    /// Prepare to split `payload` into segments of at most `segment_size` bytes.
    #[must_use]
    pub fn new(payload: &'a [u8], receipt: ReceiptId, segment_size: SegmentSize) -> Self {
        Self {
            remaining: payload,
            total_size: u64::try_from(payload.len()).unwrap_or(u64::MAX),
            receipt,
            segment_size: segment_size.get(),
            started: false,
            finished: false,
        }
    }

    fn fits_in_finish(&self) -> bool {
        self.remaining.len() + SegmentKind::Finish.header_len() <= self.segment_size
    }

    fn take(&mut self, limit: usize) -> &'a [u8] {
        let (chunk, rest) = self.remaining.split_at(limit.min(self.remaining.len()));
        self.remaining = rest;
        chunk
    }
}

impl<'a> Iterator for Chunker<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.fits_in_finish() {
            self.finished = true;
            return Some(Segment::Finish {
                receipt: self.receipt,
                chunk: self.take(usize::MAX),
            });
        }

        if self.started {
            let chunk = self.take(self.segment_size - SegmentKind::Part.header_len());
            return Some(Segment::Part { chunk });
        }

        self.started = true;
        let chunk = self.take(self.segment_size - SegmentKind::Start.header_len());
        Some(Segment::Start {
            total_size: self.total_size,
            chunk,
        })
    }
}

/// Number of segments a `len`-byte message occupies at `segment_size`.
///
/// Returns `None` when `segment_size` is below [`MIN_SEGMENT_SIZE`].
#[must_use]
pub fn segment_count(len: usize, segment_size: usize) -> Option<usize> {
    if segment_size < MIN_SEGMENT_SIZE {
        return None;
    }
    let finish_payload = segment_size - SegmentKind::Finish.header_len();
    if len <= finish_payload {
        return Some(1);
    }
    let start_payload = segment_size - SegmentKind::Start.header_len();
    let part_payload = segment_size - SegmentKind::Part.header_len();
    // Parts fill to the ceiling until the tail fits a `Finish`; a tail that
    // needs a part of its own is followed by an empty `Finish`.
    let mut remaining = len - start_payload;
    let mut count = 2;
    while remaining > finish_payload {
        remaining = remaining.saturating_sub(part_payload);
        count += 1;
    }
    Some(count)
}
