use itertools::Itertools;

/// Row count of the standard base fixture (the `ten` table).
pub const DEFAULT_BASE: u64 = 10;

/// A `levels`-way self cross-join of a `base`-row fixture.
///
/// The fixture holds the values `0..base` in one column. Joining `k` aliased
/// copies of it yields `base^k` rows, and reading each copy's column as one
/// base-`base` digit gives the positional encoding
///
/// ```text
/// value = d_1 + d_2 * base + d_3 * base^2 + ...
/// ```
///
/// which maps the join output onto the integers `[0, base^k)` with no
/// duplicates and no gaps. This is how scenarios get `n` logically distinct
/// rows out of O(log n) join stages instead of O(n) literal statement text,
/// which is what keeps counts of 10^8 and beyond tractable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfJoin {
    base: u64,
    levels: u32,
}

impl SelfJoin {
    /// The smallest self-join of a `base`-row fixture covering `n` rows, i.e.
    /// with `base^levels >= n`. `n <= base` needs no join at all and yields a
    /// single level.
    ///
    /// Panics if `base < 2` or `n == 0`; both are nonsense a scenario cannot
    /// express through the sizing layer.
    pub fn covering(base: u64, n: u64) -> Self {
        assert!(base >= 2, "a base fixture needs at least two rows");
        assert!(n >= 1, "cannot synthesize an empty row set");

        let mut levels = 1u32;
        let mut span = base;
        while span < n {
            span = span
                .checked_mul(base)
                .expect("join span overflows u64");
            levels += 1;
        }

        Self { base, levels }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Total rows produced by the unfiltered join, `base^levels`.
    pub fn span(&self) -> u64 {
        self.base.pow(self.levels)
    }

    /// Whether the unfiltered join already has exactly `n` rows.
    pub fn is_exact(&self, n: u64) -> bool {
        self.span() == n
    }

    /// The FROM-list of aliased fixture copies: `ten AS ten1, ten AS ten2, ...`.
    pub fn join_clause(&self, table: &str) -> String {
        (1..=self.levels)
            .map(|level| format!("{table} AS {table}{level}"))
            .join(", ")
    }

    /// The positional value expression over the joined copies:
    /// `ten1.f1 + ten2.f1 * 10 + ten3.f1 * 100 + ...`.
    pub fn value_expr(&self, table: &str, column: &str) -> String {
        (1..=self.levels)
            .map(|level| {
                let weight = self.base.pow(level - 1);
                if weight == 1 {
                    format!("{table}{level}.{column}")
                } else {
                    format!("{table}{level}.{column} * {weight}")
                }
            })
            .join(" + ")
    }

    /// The predicate bounding the join output to exactly `n` rows, or `None`
    /// when the join is already exact. Callers that cannot tolerate the up to
    /// `base - 1` factor of intermediate overproduction must apply this.
    pub fn bound_predicate(&self, table: &str, column: &str, n: u64) -> Option<String> {
        if self.is_exact(n) {
            None
        } else {
            Some(format!("({}) < {n}", self.value_expr(table, column)))
        }
    }

    /// Enumerate the synthesized values in-process by walking the digit
    /// cross-product, exactly as the joined SQL would. Intended for small
    /// fixtures and for tests of the encoding itself.
    pub fn values(&self) -> impl Iterator<Item = u64> {
        let base = self.base;
        (0..self.levels)
            .map(|_| 0..base)
            .multi_cartesian_product()
            .map(move |digits| {
                digits
                    .iter()
                    .enumerate()
                    .map(|(position, digit)| digit * base.pow(position as u32))
                    .sum()
            })
    }

    /// [SelfJoin::values] bounded to `value < n`, the in-process counterpart
    /// of [SelfJoin::bound_predicate].
    pub fn bounded_values(&self, n: u64) -> impl Iterator<Item = u64> {
        self.values().filter(move |value| *value < n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn exact_power_of_ten_needs_no_bound() {
        let join = SelfJoin::covering(10, 1_000);
        assert_eq!(join.levels(), 3);
        assert_eq!(join.span(), 1_000);
        assert!(join.is_exact(1_000));
        assert_eq!(join.bound_predicate("ten", "f1", 1_000), None);

        let values: BTreeSet<u64> = join.values().collect();
        assert_eq!(values.len(), 1_000);
        assert_eq!(values, (0..1_000).collect());
    }

    #[test]
    fn inexact_counts_overproduce_and_filter_down() {
        let join = SelfJoin::covering(10, 137);
        assert_eq!(join.levels(), 3);
        assert_eq!(join.span(), 1_000);
        assert!(!join.is_exact(137));
        assert_eq!(
            join.bound_predicate("ten", "f1", 137).unwrap(),
            "(ten1.f1 + ten2.f1 * 10 + ten3.f1 * 100) < 137"
        );

        let values: BTreeSet<u64> = join.bounded_values(137).collect();
        assert_eq!(values.len(), 137);
        assert_eq!(values, (0..137).collect());
    }

    #[test]
    fn counts_within_the_base_need_a_single_level() {
        let join = SelfJoin::covering(10, 7);
        assert_eq!(join.levels(), 1);
        assert_eq!(join.join_clause("ten"), "ten AS ten1");
        assert_eq!(join.value_expr("ten", "f1"), "ten1.f1");
        assert_eq!(
            join.bounded_values(7).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn encoding_is_a_bijection_for_small_bases() {
        for (base, n) in [(2u64, 16u64), (2, 11), (3, 27), (3, 20)] {
            let join = SelfJoin::covering(base, n);
            let values: BTreeSet<u64> = join.values().collect();
            assert_eq!(
                values.len() as u64,
                join.span(),
                "base {base} join must not collide"
            );
            assert_eq!(
                join.bounded_values(n).collect::<BTreeSet<_>>(),
                (0..n).collect(),
                "base {base} filtered to n {n}"
            );
        }
    }

    #[test]
    fn sql_rendering_matches_the_digit_weights() {
        let join = SelfJoin::covering(10, 1_000_000);
        assert_eq!(join.levels(), 6);
        assert_eq!(
            join.join_clause("ten"),
            "ten AS ten1, ten AS ten2, ten AS ten3, ten AS ten4, ten AS ten5, ten AS ten6"
        );
        assert_eq!(
            join.value_expr("ten", "f1"),
            "ten1.f1 + ten2.f1 * 10 + ten3.f1 * 100 + ten4.f1 * 1000 \
             + ten5.f1 * 10000 + ten6.f1 * 100000"
        );
    }
}
