//! The single binary buffer shared by every accessor of an export

use crate::document::BufferView;

/// Views start on a 4-byte boundary so any component type is aligned
const VIEW_ALIGNMENT: usize = 4;

/// Append-only byte buffer plus the views carved out of it
#[derive(Debug, Default)]
pub struct BufferManager {
    bytes: Vec<u8>,
    views: Vec<BufferView>,
}

impl BufferManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` as a new view and return the view index
    pub fn append(&mut self, data: &[u8], target: Option<u32>) -> usize {
        let padding = (VIEW_ALIGNMENT - self.bytes.len() % VIEW_ALIGNMENT) % VIEW_ALIGNMENT;
        self.bytes.resize(self.bytes.len() + padding, 0);

        let offset = self.bytes.len();
        self.bytes.extend_from_slice(data);
        self.append_view(offset, data.len(), target)
    }

    /// Record a view over bytes that were already written
    pub fn append_view(&mut self, byte_offset: usize, byte_length: usize, target: Option<u32>) -> usize {
        debug_assert!(
            self.views
                .last()
                .is_none_or(|v| v.byte_offset + v.byte_length <= byte_offset),
            "buffer views must not overlap"
        );
        debug_assert!(byte_offset + byte_length <= self.bytes.len());

        self.views.push(BufferView {
            buffer: 0,
            byte_offset,
            byte_length,
            target,
        });
        self.views.len() - 1
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<BufferView>) {
        (self.bytes, self.views)
    }
}
