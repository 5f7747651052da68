// From: https://github.com/mbhall88/psdm/blob/0c8c4be5e4a6d566193b688824197fac2d233108/src/lib.rs#L13-L41
// MIT licensed
// Split in two so values that are not `Ord` (scores) can follow
// the permutation computed over the coordinates.
pub trait ArgSortExt<T> {
    fn argsort(&self) -> Vec<usize>;
}

pub trait PermuteExt<T> {
    fn sort_by_indices(
        &mut self,
        indices: &mut [usize],
    );
}

impl<T: Ord> ArgSortExt<T> for [T] {
    fn argsort(&self) -> Vec<usize> {
        let mut indices = (0..self.len()).collect::<Vec<_>>();
        indices.sort_by_key(|&i| &self[i]);
        indices
    }
}

impl<T> PermuteExt<T> for Vec<T> {
    /// Reorders in place so that `self[k]` becomes the old `self[indices[k]]`.
    /// `indices` is consumed (every entry is overwritten with `usize::MAX`).
    fn sort_by_indices(
        &mut self,
        indices: &mut [usize],
    ) {
        debug_assert_eq!(self.len(), indices.len());
        for idx in 0..self.len() {
            if indices[idx] != usize::MAX {
                let mut current_idx = idx;
                loop {
                    let target_idx = indices[current_idx];
                    indices[current_idx] = usize::MAX;
                    if indices[target_idx] == usize::MAX {
                        break;
                    }
                    self.swap(current_idx, target_idx);
                    current_idx = target_idx;
                }
            }
        }
    }
}
