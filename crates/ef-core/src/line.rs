//! Strided 1-D views over plane storage.
//!
//! A row is a line with `step == 1`; a column is a line with
//! `step == stride`. Border passes use the same code for both.

/// Direction in which a plane is cut into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Lines are rows; `index` selects `y`.
    Row,
    /// Lines are columns; `index` selects `x`.
    Col,
}

#[derive(Debug, Clone, Copy)]
pub struct Line<'a, T> {
    data: &'a [T],
    start: usize,
    step: usize,
    len: usize,
}

impl<'a, T: Copy> Line<'a, T> {
    /// Builds a line of `len` elements starting at `start`, `step` apart.
    ///
    /// Panics if the last element lies outside `data`.
    pub fn new(data: &'a [T], start: usize, step: usize, len: usize) -> Self {
        assert!(
            line_fits(data.len(), start, step, len),
            "line exceeds backing storage"
        );
        Self {
            data,
            start,
            step,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn get(&self, i: usize) -> Option<T> {
        if i >= self.len {
            return None;
        }
        self.data.get(self.start + i * self.step).copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + use<'a, T> {
        let data = self.data;
        let start = self.start;
        let step = self.step;
        (0..self.len).map(move |i| {
            let idx = start + i * step;
            debug_assert!(idx < data.len());
            // SAFETY: `Line::new` checked that `start + (len-1)*step` is in
            // bounds and `i < len`.
            unsafe { *data.get_unchecked(idx) }
        })
    }
}

#[derive(Debug)]
pub struct LineMut<'a, T> {
    data: &'a mut [T],
    start: usize,
    step: usize,
    len: usize,
}

impl<'a, T: Copy> LineMut<'a, T> {
    /// Mutable counterpart of [`Line::new`].
    pub fn new(data: &'a mut [T], start: usize, step: usize, len: usize) -> Self {
        assert!(
            line_fits(data.len(), start, step, len),
            "line exceeds backing storage"
        );
        Self {
            data,
            start,
            step,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, i: usize) -> Option<T> {
        if i >= self.len {
            return None;
        }
        self.data.get(self.start + i * self.step).copied()
    }

    pub fn set(&mut self, i: usize, value: T) {
        assert!(i < self.len, "line index out of bounds");
        self.data[self.start + i * self.step] = value;
    }

    pub fn as_line(&self) -> Line<'_, T> {
        Line {
            data: &*self.data,
            start: self.start,
            step: self.step,
            len: self.len,
        }
    }

    /// Overwrites the line with `values`, which must yield exactly `len()`
    /// items.
    pub fn fill_from<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut written = 0usize;
        for (i, v) in values.into_iter().take(self.len).enumerate() {
            let idx = self.start + i * self.step;
            debug_assert!(idx < self.data.len());
            // SAFETY: `LineMut::new` checked that `start + (len-1)*step` is in
            // bounds and `take(len)` keeps `i < len`.
            unsafe {
                *self.data.get_unchecked_mut(idx) = v;
            }
            written += 1;
        }
        debug_assert_eq!(written, self.len, "fill_from got too few values");
    }
}

fn line_fits(data_len: usize, start: usize, step: usize, len: usize) -> bool {
    if len == 0 {
        return start <= data_len;
    }
    (len - 1)
        .checked_mul(step)
        .and_then(|off| off.checked_add(start))
        .is_some_and(|last| last < data_len)
}

#[cfg(test)]
mod tests {
    use super::{Line, LineMut};

    #[test]
    fn strided_read_and_write() {
        let mut data = vec![0u8, 1, 2, 3, 4, 5, 6, 7, 8];
        let col = Line::new(&data, 1, 3, 3);
        assert_eq!(col.iter().collect::<Vec<_>>(), vec![1, 4, 7]);
        assert_eq!(col.get(2), Some(7));
        assert_eq!(col.get(3), None);

        let mut col = LineMut::new(&mut data, 2, 3, 3);
        col.fill_from([20u8, 50, 80]);
        col.set(0, 21);
        assert_eq!(col.as_line().iter().collect::<Vec<_>>(), vec![21, 50, 80]);
        assert_eq!(data, vec![0, 1, 21, 3, 4, 50, 6, 7, 80]);
    }

    #[test]
    #[should_panic(expected = "line exceeds backing storage")]
    fn rejects_line_past_end() {
        let data = [0u16; 8];
        let _ = Line::new(&data, 2, 3, 3);
    }

    #[test]
    fn empty_line_is_allowed_at_end() {
        let data = [0u8; 4];
        let line = Line::new(&data, 4, 1, 0);
        assert!(line.is_empty());
        assert_eq!(line.iter().count(), 0);
    }
}
