use crate::witness::memo::{Memo, DEFAULT_MEMO_CAPACITY};
use std::sync::Arc;

#[test]
fn test_memo_reuses_computed_values() {
    let memo: Memo<String, usize> = Memo::new();
    let first = memo.get_or_compute(&"abc".to_string(), || 3);
    let second = memo.get_or_compute(&"abc".to_string(), || unreachable!("cached"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!((memo.hits(), memo.misses()), (1, 1));
    assert_eq!(memo.capacity(), DEFAULT_MEMO_CAPACITY);
}

#[test]
fn test_memo_never_exceeds_capacity() {
    let memo: Memo<usize, usize> = Memo::with_capacity(8);
    for key in 0..1_000 {
        memo.get_or_compute(&key, || key * 2);
        assert!(memo.len() <= 8);
    }
    assert_eq!(memo.misses(), 1_000);

    // The newest key survives the reset that made room for it.
    let value = memo.get_or_compute(&999, || unreachable!("cached"));
    assert_eq!(*value, 1_998);
}

#[test]
fn test_memo_capacity_is_at_least_one() {
    let memo: Memo<u8, u8> = Memo::with_capacity(0);
    memo.get_or_compute(&1, || 1);
    memo.get_or_compute(&2, || 2);
    assert_eq!(memo.len(), 1);
}
