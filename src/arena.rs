// Copyright 2024 nodearc Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Default page size multiple in bytes. Pages larger than this are
/// allocated when a single request exceeds it.
const DEFAULT_PAGE_SIZE: usize = 4096;

/// A handle to a byte range allocated from a [`BufferArena`].
///
/// Handles stay valid until the arena is released or reset; individual
/// allocations are never freed. A handle is an index pair rather than a
/// pointer, so growing the arena never invalidates outstanding handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaRef {
    page: u32,
    offset: u32,
    len: u32,
}

impl ArenaRef {
    /// The length in bytes of the allocation this handle refers to.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

struct Page {
    buf: Vec<u8>,
}

impl Page {
    /// Allocates a page with a fixed capacity. Returns `None` if the
    /// upstream allocator fails; this never aborts.
    fn with_capacity(cap: usize) -> Option<Page> {
        let mut buf = Vec::new();
        if buf.try_reserve_exact(cap).is_err() {
            return None;
        }
        Some(Page { buf })
    }

    fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    fn used(&self) -> usize {
        self.buf.len()
    }

    fn remaining(&self) -> usize {
        self.buf.capacity() - self.buf.len()
    }
}

/// A page-based bump allocator for short-lived byte ranges.
///
/// Many small allocations are carved out of a few large pages; nothing is
/// freed individually, and [`release`](BufferArena::release) returns every
/// page at once. The most recent allocation of the current page can be
/// grown in place, which keeps repeated appends to the newest buffer
/// (string interning, container growth) amortized O(1) without copies.
pub struct BufferArena {
    pages: Vec<Page>,
    page_size: usize,
}

impl Default for BufferArena {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferArena {
    pub fn new() -> BufferArena {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates an arena whose pages are sized in multiples of `page_size`.
    pub fn with_page_size(page_size: usize) -> BufferArena {
        BufferArena {
            pages: Vec::new(),
            page_size: page_size.max(1),
        }
    }

    /// Allocates `n` zeroed bytes and returns a handle to them, or `None`
    /// if the upstream allocator fails.
    pub fn allocate(&mut self, n: usize) -> Option<ArenaRef> {
        if self
            .pages
            .last()
            .map(|page| page.remaining() < n)
            .unwrap_or(true)
        {
            self.push_page(n)?;
        }
        let page_index = self.pages.len() - 1;
        let page = &mut self.pages[page_index];
        let offset = page.used();
        page.buf.resize(offset + n, 0);
        Some(ArenaRef {
            page: page_index as u32,
            offset: offset as u32,
            len: n as u32,
        })
    }

    /// Allocates a copy of `data` inside the arena.
    pub fn alloc_bytes(&mut self, data: &[u8]) -> Option<ArenaRef> {
        let handle = self.allocate(data.len())?;
        self.get_mut(handle).copy_from_slice(data);
        Some(handle)
    }

    /// Resizes the allocation behind `handle` to `new_len` bytes.
    ///
    /// Returns the new handle and whether the bytes moved. Shrinking never
    /// moves. Growing extends in place when `handle` is the most recent
    /// allocation of the current page and the page has room; otherwise the
    /// old bytes are copied into fresh space. Returns `None` only if a
    /// required fresh allocation fails.
    pub fn grow(&mut self, handle: ArenaRef, new_len: usize) -> Option<(ArenaRef, bool)> {
        if new_len <= handle.len() {
            return Some((
                ArenaRef {
                    len: new_len as u32,
                    ..handle
                },
                false,
            ));
        }
        if self.is_top_allocation(handle) {
            let page = &mut self.pages[handle.page as usize];
            if handle.offset as usize + new_len <= page.capacity() {
                page.buf.resize(handle.offset as usize + new_len, 0);
                return Some((
                    ArenaRef {
                        len: new_len as u32,
                        ..handle
                    },
                    false,
                ));
            }
        }
        let new_handle = self.allocate(new_len)?;
        // Old and new ranges can share a page, so split at the page level
        // to copy without aliasing.
        if handle.page == new_handle.page {
            let page = &mut self.pages[handle.page as usize];
            page.buf.copy_within(
                handle.offset as usize..handle.offset as usize + handle.len(),
                new_handle.offset as usize,
            );
        } else {
            let (old_pages, new_pages) = self.pages.split_at_mut(new_handle.page as usize);
            let src = &old_pages[handle.page as usize].buf
                [handle.offset as usize..handle.offset as usize + handle.len()];
            let dst = &mut new_pages[0].buf
                [new_handle.offset as usize..new_handle.offset as usize + handle.len()];
            dst.copy_from_slice(src);
        }
        Some((new_handle, true))
    }

    /// Returns the bytes behind a handle.
    pub fn get(&self, handle: ArenaRef) -> &[u8] {
        &self.pages[handle.page as usize].buf
            [handle.offset as usize..handle.offset as usize + handle.len()]
    }

    pub fn get_mut(&mut self, handle: ArenaRef) -> &mut [u8] {
        &mut self.pages[handle.page as usize].buf
            [handle.offset as usize..handle.offset as usize + handle.len()]
    }

    /// Returns every page to the upstream allocator, newest first, and
    /// resets the arena to its freshly constructed state. Idempotent; all
    /// outstanding handles are invalidated.
    pub fn release(&mut self) {
        while self.pages.pop().is_some() {}
    }

    /// Total bytes handed out across all pages.
    pub fn used_bytes(&self) -> usize {
        self.pages.iter().map(Page::used).sum()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn is_top_allocation(&self, handle: ArenaRef) -> bool {
        handle.page as usize + 1 == self.pages.len()
            && handle.offset as usize + handle.len() == self.pages[handle.page as usize].used()
    }

    /// Appends a page large enough for an `n`-byte allocation. A current
    /// page that never served an allocation is returned to the upstream
    /// allocator first, so wildly varying request sizes cannot accumulate
    /// unused pages.
    fn push_page(&mut self, n: usize) -> Option<()> {
        let cap = n.div_ceil(self.page_size).max(1) * self.page_size;
        let page = Page::with_capacity(cap)?;
        if self.pages.last().map(|p| p.used() == 0).unwrap_or(false) {
            self.pages.pop();
        }
        self.pages.push(page);
        Some(())
    }
}

impl Drop for BufferArena {
    fn drop(&mut self) {
        self.release();
    }
}
