use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// One step of walking two key-sorted maps side by side.
pub enum AlignedPair<'a, K, V> {
    HasBoth((&'a K, &'a V), (&'a K, &'a V)),
    HasLeft((&'a K, &'a V)),
    HasRight((&'a K, &'a V)),
}

/// Visits both maps in key order, pairing up entries with equal keys.
/// Both maps must already be sorted by key.
pub fn align_sorted_maps<'a, K, V, M>(m1: &'a FxIndexMap<K, V>, m2: &'a FxIndexMap<K, V>, visit: &mut M)
where
    K: Ord,
    M: FnMut(AlignedPair<'a, K, V>),
{
    let mut left = m1.iter().peekable();
    let mut right = m2.iter().peekable();

    loop {
        let pair = match (left.peek(), right.peek()) {
            (Some(&x1), Some(&x2)) => {
                if x1.0 == x2.0 {
                    left.next();
                    right.next();
                    AlignedPair::HasBoth(x1, x2)
                } else if x1.0 < x2.0 {
                    left.next();
                    AlignedPair::HasLeft(x1)
                } else {
                    right.next();
                    AlignedPair::HasRight(x2)
                }
            }
            //finished with m2
            (Some(&x1), None) => {
                left.next();
                AlignedPair::HasLeft(x1)
            }
            //finished with m1
            (None, Some(&x2)) => {
                right.next();
                AlignedPair::HasRight(x2)
            }
            (None, None) => break,
        };
        visit(pair);
    }
}
