use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static UNIQUE_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Prefix of the synthetic keys given to tree nodes.
pub const TREE_KEY_PREFIX: &str = "tree-view";

pub fn unique_id(prefix: &str) -> String {
    let id = UNIQUE_ID_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}{}", prefix, id)
}

pub fn tree_key() -> Arc<str> {
    Arc::from(unique_id(TREE_KEY_PREFIX))
}

// Helper function to convert &str to Arc<str>
#[inline]
pub fn arc_str(s: &str) -> Arc<str> {
    Arc::from(s)
}

/// Largest x and y over a set of points, `(0, 0)` when empty.
pub fn max_extent<I>(points: I) -> (f64, f64)
where
    I: IntoIterator<Item = (f64, f64)>,
{
    points
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(mx, my), (x, y)| (mx.max(x), my.max(y)))
}
