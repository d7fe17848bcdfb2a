//! Page splitting for program operations

use core::ops::Range;

/// One program command worth of data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChunk {
    /// Flash address the chunk is programmed at
    pub address: u32,
    /// Offset of the chunk within the caller's buffer
    pub offset: usize,
    /// Number of bytes in the chunk
    pub len: usize,
}

impl PageChunk {
    /// Range of the caller's buffer covered by this chunk
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Iterator over the page-bounded chunks of a write
///
/// The first chunk runs from the start address to the end of its page (or
/// the end of the data, whichever comes first); every following chunk
/// starts page-aligned and covers at most one page. No chunk ever crosses
/// a page boundary.
#[derive(Debug, Clone)]
pub struct PageChunks {
    current: u64,
    end: u64,
    start: u64,
    page_size: u64,
    max_len: u64,
}

/// Split `[address, address + len)` into page-bounded chunks
///
/// `page_size` must be a non-zero power of two.
pub fn page_chunks(address: u32, len: usize, page_size: usize) -> PageChunks {
    PageChunks {
        current: address as u64,
        end: address as u64 + len as u64,
        start: address as u64,
        page_size: page_size as u64,
        max_len: page_size as u64,
    }
}

impl PageChunks {
    /// Additionally cap every chunk at `max_len` bytes
    ///
    /// Used when the transport cannot move a whole page in one command.
    /// A zero cap is ignored.
    pub fn with_limit(mut self, max_len: usize) -> Self {
        if max_len > 0 {
            self.max_len = core::cmp::min(self.page_size, max_len as u64);
        }
        self
    }
}

impl Iterator for PageChunks {
    type Item = PageChunk;

    fn next(&mut self) -> Option<PageChunk> {
        if self.current >= self.end {
            return None;
        }
        let to_page_end = self.page_size - (self.current % self.page_size);
        let len = to_page_end.min(self.end - self.current).min(self.max_len);
        let chunk = PageChunk {
            address: self.current as u32,
            offset: (self.current - self.start) as usize,
            len: len as usize,
        };
        self.current += len;
        Some(chunk)
    }
}
