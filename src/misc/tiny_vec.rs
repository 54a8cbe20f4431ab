/// Fixed capacity vector stored inline, so move sequences and dice stay `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TinyVec<T, const N: usize> {
    data: [Option<T>; N],
    len: u8,
}

impl<T, const N: usize> TinyVec<T, N>
where
    T: Copy + PartialEq,
{
    pub const fn new() -> Self {
        const { assert!(N <= 255, "TinyVec supports up to 255 elements") }
        TinyVec {
            data: [None; N],
            len: 0,
        }
    }

    /// Builds a vector from the first `N` elements of `values`.
    pub fn from_slice(values: &[T]) -> Self {
        let mut vec = Self::new();
        for &value in values.iter().take(N) {
            vec.push(value);
        }
        vec
    }

    /// Panics when full; callers size `N` to the largest turn (four dice).
    pub fn push(&mut self, value: T) {
        if (self.len as usize) < N {
            self.data[self.len as usize] = Some(value);
            self.len += 1;
        } else {
            panic!("TinyVec is full");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data[..self.len as usize].iter().flatten()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len as usize {
            self.data[index].as_ref()
        } else {
            None
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i as usize))
    }

    pub fn contains(&self, element: &T) -> bool {
        self.iter().any(|x| x == element)
    }

    /// Removes the first element equal to `element`, keeping order. Returns
    /// whether anything was removed.
    pub fn remove(&mut self, element: &T) -> bool {
        let len = self.len as usize;
        match self.data[..len].iter().position(|x| x.as_ref() == Some(element)) {
            Some(pos) => {
                self.data[pos] = None;
                self.len -= 1;
                for i in pos..(self.len as usize) {
                    self.data[i] = self.data[i + 1].take();
                }
                true
            }
            None => false,
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().copied().collect()
    }
}

impl<T: Copy + PartialEq, const N: usize> Default for TinyVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
