//! Lazy combinatorial enumerators.
//!
//! Neither iterator materializes its output ahead of time. The product walks
//! its factors as iterators and restarts a factor from a pristine clone once
//! it runs out; the permutations keep a small index vector.

/// Cartesian product of a list of factors, as an odometer.
///
/// Factors are iterators that can be restarted by cloning; at most one item
/// per factor is held at a time. The product of zero factors has exactly one
/// (empty) element; a product with an empty factor has none.
#[derive(Debug, Clone)]
pub struct CartesianProduct<I: Iterator> {
    pristine: Vec<I>,
    cursors: Vec<I>,
    current: Vec<I::Item>,
    done: bool,
}

impl<I> CartesianProduct<I>
where
    I: Iterator + Clone,
    I::Item: Clone,
{
    pub fn new(factors: Vec<I>) -> Self {
        let mut cursors = factors.clone();
        let mut current = Vec::with_capacity(cursors.len());
        let mut done = false;
        for cursor in &mut cursors {
            match cursor.next() {
                Some(item) => current.push(item),
                None => {
                    done = true;
                    break;
                }
            }
        }

        Self {
            pristine: factors,
            cursors,
            current,
            done,
        }
    }

    /// Size of the whole product according to the factors' size hints,
    /// saturating at `u128::MAX`. A factor without an upper bound saturates.
    pub fn len_hint(&self) -> u128 {
        if self.done && !self.pristine.is_empty() {
            return 0;
        }
        self.pristine
            .iter()
            .map(|factor| factor.size_hint().1.map_or(u128::MAX, |len| len as u128))
            .fold(1u128, u128::saturating_mul)
    }
}

impl<I> Iterator for CartesianProduct<I>
where
    I: Iterator + Clone,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.current.clone();

        // Advance the odometer, rightmost digit first
        self.done = true;
        for position in (0..self.cursors.len()).rev() {
            if let Some(value) = self.cursors[position].next() {
                self.current[position] = value;
                self.done = false;
                break;
            }

            self.cursors[position] = self.pristine[position].clone();
            match self.cursors[position].next() {
                Some(value) => self.current[position] = value,
                None => break,
            }
        }

        Some(item)
    }
}

/// Ordered selections of `k` distinct items, in lexicographic order of indices.
#[derive(Debug, Clone)]
pub struct KPermutations<T> {
    items: Vec<T>,
    indices: Vec<usize>,
    used: Vec<bool>,
    done: bool,
}

impl<T: Clone> KPermutations<T> {
    pub fn new(items: Vec<T>, k: usize) -> Self {
        let n = items.len();
        let mut used = vec![false; n];
        let indices: Vec<usize> = (0..k.min(n)).collect();
        for &index in &indices {
            used[index] = true;
        }
        Self {
            items,
            indices,
            used,
            done: k > n,
        }
    }

    fn smallest_unused(&self, above: Option<usize>) -> Option<usize> {
        let start = above.map_or(0, |index| index + 1);
        (start..self.items.len()).find(|&index| !self.used[index])
    }

    fn advance(&mut self) -> bool {
        for position in (0..self.indices.len()).rev() {
            let current = self.indices[position];
            self.used[current] = false;

            if let Some(next) = self.smallest_unused(Some(current)) {
                self.indices[position] = next;
                self.used[next] = true;

                for refill in position + 1..self.indices.len() {
                    let Some(index) = self.smallest_unused(None) else {
                        return false;
                    };
                    self.indices[refill] = index;
                    self.used[index] = true;
                }
                return true;
            }
        }
        false
    }
}

impl<T: Clone> Iterator for KPermutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self
            .indices
            .iter()
            .map(|&index| self.items[index].clone())
            .collect();
        self.done = !self.advance();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product<T: Clone>(factors: Vec<Vec<T>>) -> CartesianProduct<std::vec::IntoIter<T>> {
        CartesianProduct::new(factors.into_iter().map(Vec::into_iter).collect())
    }

    #[test]
    fn product_enumerates_every_combination() {
        let product: Vec<_> = product(vec![vec![1, 2], vec![10, 20, 30]]).collect();
        assert_eq!(product.len(), 6);
        assert_eq!(product[0], vec![1, 10]);
        assert_eq!(product[1], vec![1, 20]);
        assert_eq!(product[5], vec![2, 30]);
    }

    #[test]
    fn product_edge_cases() {
        let empty: Vec<Vec<i32>> = product(vec![]).collect();
        assert_eq!(empty, vec![Vec::<i32>::new()]);

        let none: Vec<_> = product(vec![vec![1], vec![]]).collect();
        assert!(none.is_empty());

        assert_eq!(product(vec![vec![1, 2]; 3]).len_hint(), 8);
        assert_eq!(product(vec![vec![1], vec![]]).len_hint(), 0);
    }

    #[test]
    fn product_pulls_factors_lazily() {
        // Unbounded factors: only the items actually yielded are ever produced
        let mut product = CartesianProduct::new(vec![0u64.., 0u64..]);
        assert_eq!(product.len_hint(), u128::MAX);
        assert_eq!(product.next(), Some(vec![0, 0]));
        assert_eq!(product.next(), Some(vec![0, 1]));
        assert_eq!(product.nth(997), Some(vec![0, 999]));

        let mut finite = CartesianProduct::new(vec![0..2, 0..u64::MAX]);
        assert_eq!(finite.nth(4), Some(vec![0, 4]));
    }

    #[test]
    fn permutations_are_injective_and_complete() {
        let perms: Vec<_> = KPermutations::new(vec!['a', 'b', 'c'], 2).collect();
        assert_eq!(perms.len(), 6);
        assert!(perms.iter().all(|p| p[0] != p[1]));
        assert_eq!(perms[0], vec!['a', 'b']);
        assert_eq!(perms[5], vec!['c', 'b']);

        let all: Vec<_> = KPermutations::new(vec![1, 2, 3, 4], 4).collect();
        assert_eq!(all.len(), 24);
    }

    #[test]
    fn permutation_edge_cases() {
        let zero: Vec<_> = KPermutations::new(vec![1, 2], 0).collect();
        assert_eq!(zero, vec![Vec::<i32>::new()]);

        let too_many: Vec<_> = KPermutations::new(vec![1], 2).collect();
        assert!(too_many.is_empty());
    }
}
