use crate::foundation::error::{FrostpaneError, FrostpaneResult};

// Fallible scratch allocation. Kernels allocate all scratch up front through
// this, so an allocation failure surfaces as `Resource` before any pixel of
// the destination has been written.
pub(crate) fn alloc_scratch<T: Clone>(len: usize, fill: T) -> FrostpaneResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| FrostpaneError::resource(format!("scratch allocation of {len} elements failed")))?;
    v.resize(len, fill);
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/scratch.rs"]
mod tests;
