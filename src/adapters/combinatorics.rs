//! Cartesian products, permutations and combinations.
//!
//! These follow the textbook enumeration orders (the same ones Python's
//! `itertools` uses): lexicographic by input position, rightmost index
//! advancing fastest. Every adapter here materializes its input on the first
//! pull, since later outputs need random access to earlier elements. Memory
//! therefore grows with the input, and an infinite input never yields.

/// A source that is collected into a `Vec` on first use.
#[derive(Debug, Clone)]
enum Pool<I, T> {
    Pending(I),
    Ready(Vec<T>),
}

impl<I: Iterator> Pool<I, I::Item> {
    fn items(&mut self) -> &[I::Item] {
        if let Pool::Pending(source) = self {
            let items = source.by_ref().collect();
            *self = Pool::Ready(items);
        }
        match self {
            Pool::Ready(items) => items.as_slice(),
            Pool::Pending(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

fn pick<T: Clone>(pool: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| pool[i].clone()).collect()
}

/// Cartesian product of two sequences, yielding pairs.
///
/// The right-hand sequence is buffered on the first pull; the left-hand one
/// is streamed.
#[derive(Debug, Clone)]
pub struct Product<I: Iterator, J: Iterator> {
    outer: I,
    inner: Pool<J, J::Item>,
    current: Option<I::Item>,
    position: usize,
}

impl<I: Iterator, J: Iterator> Product<I, J> {
    pub fn new(outer: I, inner: J) -> Self {
        Self {
            outer,
            inner: Pool::Pending(inner),
            current: None,
            position: 0,
        }
    }
}

impl<I, J> Iterator for Product<I, J>
where
    I: Iterator,
    I::Item: Clone,
    J: Iterator,
    J::Item: Clone,
{
    type Item = (I::Item, J::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let pool = self.inner.items();
        if pool.is_empty() {
            return None;
        }

        if self.current.is_none() || self.position == pool.len() {
            match self.outer.next() {
                Some(item) => self.current = Some(item),
                None => {
                    self.current = None;
                    return None;
                }
            }
            self.position = 0;
        }

        let left = self.current.clone()?;
        let right = pool[self.position].clone();
        self.position += 1;
        Some((left, right))
    }
}

/// Cartesian product of a sequence with itself `repeat` times.
#[derive(Debug, Clone)]
pub struct ProductRepeat<I: Iterator> {
    pool: Pool<I, I::Item>,
    indices: Vec<usize>,
    state: State,
}

impl<I: Iterator> ProductRepeat<I> {
    pub fn new(source: I, repeat: usize) -> Self {
        Self {
            pool: Pool::Pending(source),
            indices: vec![0; repeat],
            state: State::Fresh,
        }
    }
}

impl<I> Iterator for ProductRepeat<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let pool = self.pool.items();
        match self.state {
            State::Done => return None,
            State::Fresh => {
                if pool.is_empty() && !self.indices.is_empty() {
                    self.state = State::Done;
                    return None;
                }
                self.state = State::Running;
                return Some(pick(pool, &self.indices));
            }
            State::Running => {}
        }

        // Odometer: bump the rightmost index, carrying leftwards.
        for i in (0..self.indices.len()).rev() {
            self.indices[i] += 1;
            if self.indices[i] < pool.len() {
                return Some(pick(pool, &self.indices));
            }
            self.indices[i] = 0;
        }

        self.state = State::Done;
        None
    }
}

/// Cartesian product of a sequence with several others, the whole group
/// repeated `repeat` times, yielding one `Vec` per combination.
///
/// Every input is buffered on the first pull. With `repeat == 0` the product
/// is a single empty combination.
#[derive(Debug, Clone)]
pub struct ProductAll<I: Iterator, J> {
    pending: Option<(I, Vec<J>)>,
    repeat: usize,
    pools: Vec<Vec<I::Item>>,
    indices: Vec<usize>,
    state: State,
}

impl<I: Iterator, J> ProductAll<I, J> {
    pub fn new(first: I, others: Vec<J>, repeat: usize) -> Self {
        Self {
            pending: Some((first, others)),
            repeat,
            pools: Vec::new(),
            indices: Vec::new(),
            state: State::Fresh,
        }
    }
}

impl<I, J> Iterator for ProductAll<I, J>
where
    I: Iterator,
    I::Item: Clone,
    J: Iterator<Item = I::Item>,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((first, others)) = self.pending.take() {
            let mut group: Vec<Vec<I::Item>> = vec![first.collect()];
            group.extend(others.into_iter().map(Iterator::collect));
            self.pools = (0..self.repeat).flat_map(|_| group.iter().cloned()).collect();
            self.indices = vec![0; self.pools.len()];
        }

        match self.state {
            State::Done => return None,
            State::Fresh => {
                if self.pools.iter().any(Vec::is_empty) {
                    self.state = State::Done;
                    return None;
                }
                self.state = State::Running;
                return Some(self.current());
            }
            State::Running => {}
        }

        for i in (0..self.indices.len()).rev() {
            self.indices[i] += 1;
            if self.indices[i] < self.pools[i].len() {
                return Some(self.current());
            }
            self.indices[i] = 0;
        }

        self.state = State::Done;
        None
    }
}

impl<I, J> ProductAll<I, J>
where
    I: Iterator,
    I::Item: Clone,
{
    fn current(&self) -> Vec<I::Item> {
        self.indices
            .iter()
            .zip(&self.pools)
            .map(|(&i, pool)| pool[i].clone())
            .collect()
    }
}

/// All `r`-length orderings of the input.
#[derive(Debug, Clone)]
pub struct Permutations<I: Iterator> {
    pool: Pool<I, I::Item>,
    r: usize,
    indices: Vec<usize>,
    cycles: Vec<usize>,
    state: State,
}

impl<I: Iterator> Permutations<I> {
    pub fn new(source: I, r: usize) -> Self {
        Self {
            pool: Pool::Pending(source),
            r,
            indices: Vec::new(),
            cycles: Vec::new(),
            state: State::Fresh,
        }
    }
}

impl<I> Iterator for Permutations<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let r = self.r;
        let pool = self.pool.items();
        let n = pool.len();
        match self.state {
            State::Done => return None,
            State::Fresh => {
                if r > n {
                    self.state = State::Done;
                    return None;
                }
                self.indices = (0..n).collect();
                self.cycles = (n - r + 1..=n).rev().collect();
                self.state = State::Running;
                return Some(pick(pool, &self.indices[..r]));
            }
            State::Running => {}
        }

        for i in (0..r).rev() {
            self.cycles[i] -= 1;
            if self.cycles[i] == 0 {
                self.indices[i..].rotate_left(1);
                self.cycles[i] = n - i;
            } else {
                let j = self.cycles[i];
                self.indices.swap(i, n - j);
                return Some(pick(pool, &self.indices[..r]));
            }
        }

        self.state = State::Done;
        None
    }
}

/// All `r`-length subsequences of the input, in input order.
#[derive(Debug, Clone)]
pub struct Combinations<I: Iterator> {
    pool: Pool<I, I::Item>,
    indices: Vec<usize>,
    state: State,
}

impl<I: Iterator> Combinations<I> {
    pub fn new(source: I, r: usize) -> Self {
        Self {
            pool: Pool::Pending(source),
            indices: (0..r).collect(),
            state: State::Fresh,
        }
    }
}

impl<I> Iterator for Combinations<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let pool = self.pool.items();
        let n = pool.len();
        let r = self.indices.len();
        match self.state {
            State::Done => return None,
            State::Fresh => {
                if r > n {
                    self.state = State::Done;
                    return None;
                }
                self.state = State::Running;
                return Some(pick(pool, &self.indices));
            }
            State::Running => {}
        }

        // Rightmost index that has not reached its maximum.
        let Some(i) = (0..r).rev().find(|&i| self.indices[i] != i + n - r) else {
            self.state = State::Done;
            return None;
        };

        self.indices[i] += 1;
        for j in i + 1..r {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(pick(pool, &self.indices))
    }
}

/// All `r`-length subsequences where an element may be picked repeatedly.
#[derive(Debug, Clone)]
pub struct CombinationsWithReplacement<I: Iterator> {
    pool: Pool<I, I::Item>,
    indices: Vec<usize>,
    state: State,
}

impl<I: Iterator> CombinationsWithReplacement<I> {
    pub fn new(source: I, r: usize) -> Self {
        Self {
            pool: Pool::Pending(source),
            indices: vec![0; r],
            state: State::Fresh,
        }
    }
}

impl<I> Iterator for CombinationsWithReplacement<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let pool = self.pool.items();
        let n = pool.len();
        let r = self.indices.len();
        match self.state {
            State::Done => return None,
            State::Fresh => {
                if n == 0 && r > 0 {
                    self.state = State::Done;
                    return None;
                }
                self.state = State::Running;
                return Some(pick(pool, &self.indices));
            }
            State::Running => {}
        }

        let Some(i) = (0..r).rev().find(|&i| self.indices[i] != n - 1) else {
            self.state = State::Done;
            return None;
        };

        let bumped = self.indices[i] + 1;
        self.indices[i..].fill(bumped);
        Some(pick(pool, &self.indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn all<T: Iterator>(iter: T) -> Vec<T::Item> {
        iter.collect()
    }

    #[test]
    fn test_product_all_repeats_the_whole_group() {
        let rows = all(ProductAll::new(vec![0, 1].into_iter(), vec![vec![7, 8].into_iter()], 2));
        assert_eq!(rows.len(), 16);
        assert_eq!(
            rows[..5],
            [
                vec![0, 7, 0, 7],
                vec![0, 7, 0, 8],
                vec![0, 7, 1, 7],
                vec![0, 7, 1, 8],
                vec![0, 8, 0, 7],
            ]
        );
        assert_eq!(rows[15], vec![1, 8, 1, 8]);
    }

    #[test]
    fn test_product_all_over_several_sequences() {
        let others = vec![vec!['x'].into_iter(), vec!['y', 'z'].into_iter()];
        let rows = all(ProductAll::new(vec!['a', 'b'].into_iter(), others, 1));
        assert_eq!(
            rows,
            vec![
                vec!['a', 'x', 'y'],
                vec!['a', 'x', 'z'],
                vec!['b', 'x', 'y'],
                vec!['b', 'x', 'z'],
            ]
        );
    }

    #[test]
    fn test_product_all_edge_cases() {
        let none: Vec<std::vec::IntoIter<i32>> = Vec::new();
        assert_eq!(all(ProductAll::new(1..3, none.clone(), 1)), vec![vec![1], vec![2]]);
        assert_eq!(all(ProductAll::new(1..3, none, 0)), vec![Vec::<i32>::new()]);

        let rows = all(ProductAll::new(1..3, vec![Vec::<i32>::new().into_iter()], 1));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_product_pairs() {
        let pairs = all(Product::new(1..3, vec!['a', 'b'].into_iter()));
        assert_eq!(pairs, vec![(1, 'a'), (1, 'b'), (2, 'a'), (2, 'b')]);
    }

    #[test]
    fn test_product_with_empty_side() {
        assert!(all(Product::new(1..3, std::iter::empty::<u8>())).is_empty());
        assert!(all(Product::new(std::iter::empty::<u8>(), 1..3)).is_empty());
    }

    #[test]
    fn test_product_with_empty_inner_does_not_pull_outer() {
        let mut product = Product::new(0.., std::iter::empty::<u8>());
        assert_eq!(product.next(), None);
    }

    #[test]
    fn test_product_repeat() {
        let items = all(ProductRepeat::new(0..2, 3));
        assert_eq!(
            items,
            vec![
                vec![0, 0, 0],
                vec![0, 0, 1],
                vec![0, 1, 0],
                vec![0, 1, 1],
                vec![1, 0, 0],
                vec![1, 0, 1],
                vec![1, 1, 0],
                vec![1, 1, 1],
            ]
        );
    }

    #[test]
    fn test_product_repeat_zero_yields_one_empty() {
        assert_eq!(all(ProductRepeat::new(0..2, 0)), vec![Vec::<i32>::new()]);
    }

    #[test]
    fn test_permutations_order() {
        let items = all(Permutations::new(vec!['a', 'b', 'c'].into_iter(), 2));
        assert_eq!(
            items,
            vec![
                vec!['a', 'b'],
                vec!['a', 'c'],
                vec!['b', 'a'],
                vec!['b', 'c'],
                vec!['c', 'a'],
                vec!['c', 'b'],
            ]
        );
    }

    #[test]
    fn test_full_permutations_count() {
        assert_eq!(Permutations::new(0..4, 4).count(), 24);
        assert_eq!(
            all(Permutations::new(0..3, 3)),
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn test_permutations_edge_lengths() {
        assert!(all(Permutations::new(0..2, 3)).is_empty());
        assert_eq!(all(Permutations::new(0..2, 0)), vec![Vec::<i32>::new()]);
        assert_eq!(all(Permutations::new(0..0, 0)), vec![Vec::<i32>::new()]);
    }

    #[test]
    fn test_combinations_order() {
        let items = all(Combinations::new(0..4, 2));
        assert_eq!(
            items,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn test_combinations_edge_lengths() {
        assert!(all(Combinations::new(0..2, 3)).is_empty());
        assert_eq!(all(Combinations::new(0..2, 0)), vec![Vec::<i32>::new()]);
        assert_eq!(all(Combinations::new(0..3, 3)), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_combinations_with_replacement_order() {
        let items = all(CombinationsWithReplacement::new(vec!['a', 'b', 'c'].into_iter(), 2));
        assert_eq!(
            items,
            vec![
                vec!['a', 'a'],
                vec!['a', 'b'],
                vec!['a', 'c'],
                vec!['b', 'b'],
                vec!['b', 'c'],
                vec!['c', 'c'],
            ]
        );
    }

    #[test]
    fn test_combinations_with_replacement_empty_pool() {
        assert!(all(CombinationsWithReplacement::new(0..0, 2)).is_empty());
        assert_eq!(
            all(CombinationsWithReplacement::new(0..0, 0)),
            vec![Vec::<i32>::new()]
        );
    }

    #[test]
    fn test_nothing_is_pulled_before_first_next() {
        let mut pulled = 0;
        let combinations = Combinations::new((0..3).inspect(|_| pulled += 1), 2);
        drop(combinations);
        assert_eq!(pulled, 0);
    }
}
