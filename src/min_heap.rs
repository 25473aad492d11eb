/// Array-backed binary min-heap.
///
/// Ordering is entirely up to `T: Ord`; callers that need a stable order for
/// equal priorities encode a tie-breaker in `T` itself.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { elements: vec![] }
    }

    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

impl<T: Ord> MinHeap<T> {
    pub fn build(source: Vec<T>) -> Self {
        let mut heap = MinHeap { elements: source };
        let n = heap.heap_size();
        for i in (0..n / 2).rev() {
            heap.min_heapify(i);
        }
        heap
    }

    fn min_heapify(&mut self, mut i: usize) {
        let n = self.heap_size();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < n && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < n && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        let mut i = self.heap_size() - 1;
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i] >= self.elements[p] {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
    }

    pub fn extract_min(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let result = self.elements.swap_remove(0);
        if !self.is_empty() {
            self.min_heapify(0);
        }
        Some(result)
    }

    #[cfg(test)]
    fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_build_and_drain_sorted() {
        let mut heap = MinHeap::build(vec![9, 4, 7, 1, 8, 2, 2, 6, 3, 5, 0]);
        assert!(heap.valid_min_heap());
        assert_eq!(heap.heap_size(), 11);

        let mut drained = Vec::new();
        while let Some(v) = heap.extract_min() {
            assert!(heap.valid_min_heap());
            drained.push(v);
        }
        assert_eq!(drained, vec![0, 1, 2, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_insert_interleaved() {
        let mut heap = MinHeap::new();
        for v in [5, 3, 8] {
            heap.insert(v);
        }
        assert_eq!(heap.extract_min(), Some(3));
        heap.insert(1);
        heap.insert(9);
        assert!(heap.valid_min_heap());
        assert_eq!(heap.heap_size(), 4);
        assert_eq!(heap.extract_min(), Some(1));
        assert_eq!(heap.extract_min(), Some(5));
        assert_eq!(heap.extract_min(), Some(8));
        assert_eq!(heap.extract_min(), Some(9));
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn test_ties_follow_secondary_key() {
        // (priority, sequence): equal priorities come out in sequence order
        let mut heap = MinHeap::build(vec![(2, 0), (1, 1), (2, 2), (1, 3)]);
        heap.insert((1, 4));
        let order: Vec<_> = std::iter::from_fn(|| heap.extract_min()).collect();
        assert_eq!(order, vec![(1, 1), (1, 3), (1, 4), (2, 0), (2, 2)]);
    }
}
