//! Constant-speed horizontal marquee over a list rendered twice back to back.
//!
//! Scrolling through one full copy looks identical to the starting position,
//! so wrapping the offset to zero at half the width is seamless.

use crate::config::MARQUEE_STEP;

/// The list concatenated with itself once.
pub fn display_list<T: Clone>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() * 2);
    out.extend_from_slice(items);
    out.extend_from_slice(items);
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marquee {
    offset: usize,
    step: usize,
    /// Width of the duplicated list, in columns.
    total_width: usize,
}

impl Marquee {
    pub fn new(total_width: usize) -> Self {
        Self::with_step(total_width, MARQUEE_STEP as usize)
    }

    pub fn with_step(total_width: usize, step: usize) -> Self {
        Self {
            offset: 0,
            step: step.max(1),
            total_width,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total_width(&self) -> usize {
        self.total_width
    }

    /// Wrap point: one full copy of the list.
    pub fn half_width(&self) -> usize {
        self.total_width / 2
    }

    /// Advance one frame. An offset sitting at the wrap point goes back to 0.
    pub fn tick(&mut self) -> usize {
        let half = self.half_width();
        if half == 0 || self.offset >= half {
            self.offset = 0;
        } else {
            self.offset = (self.offset + self.step).min(half);
        }
        self.offset
    }

    /// New list published: restart from the beginning.
    pub fn reset(&mut self, total_width: usize) {
        self.total_width = total_width;
        self.offset = 0;
    }
}
