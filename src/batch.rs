// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use std::ops::Index;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{Error, Result};

/// The number of lanes processed together by a single decryption call.
pub const BATCH_SIZE: usize = 8;

/// A group of exactly [`BATCH_SIZE`] independent lanes.
///
/// Lanes are processed together but never mixed: lane `i` of any batch computed from another is
/// a function of lane `i` of its source (and read-only shared state) alone, and lane order is
/// always preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Batch<T>([T; BATCH_SIZE]);

impl<T> Batch<T> {
    pub fn new(lanes: [T; BATCH_SIZE]) -> Self {
        Batch(lanes)
    }

    pub fn lanes(&self) -> &[T; BATCH_SIZE] {
        &self.0
    }

    pub fn into_lanes(self) -> [T; BATCH_SIZE] {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Applies `f` to every lane, given the lane's index and value, writing each result to the
    /// same lane of the output. With the `parallel` feature lanes are spread over the `rayon`
    /// thread pool.
    pub fn map_lanes<U, F>(&self, f: F) -> Result<Batch<U>>
    where
        T: Sync,
        U: Send,
        F: Fn(usize, &T) -> U + Sync + Send,
    {
        #[cfg(not(feature = "parallel"))]
        let iter = self.0.iter().enumerate();
        #[cfg(feature = "parallel")]
        let iter = self.0.as_slice().par_iter().enumerate();

        let lanes: Vec<U> = iter.map(|(lane, value)| f(lane, value)).collect();

        lanes.try_into().map(Batch).map_err(|_| Error::InternalError)
    }
}

impl<T> Batch<Result<T>> {
    /// All lanes' values if every lane succeeded, or the error of the first lane that failed.
    pub fn transpose(self) -> Result<Batch<T>> {
        let lanes: Vec<T> = self.0.into_iter().collect::<Result<_>>()?;

        lanes.try_into().map(Batch).map_err(|_| Error::InternalError)
    }

    /// The indices and errors of the lanes that failed, in lane order.
    pub fn failed_lanes(&self) -> impl Iterator<Item = (usize, &Error)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(lane, result)| result.as_ref().err().map(|error| (lane, error)))
    }
}

impl<T> From<[T; BATCH_SIZE]> for Batch<T> {
    fn from(lanes: [T; BATCH_SIZE]) -> Self {
        Batch(lanes)
    }
}

impl<T> Index<usize> for Batch<T> {
    type Output = T;

    fn index(&self, lane: usize) -> &Self::Output {
        &self.0[lane]
    }
}

impl<T> IntoIterator for Batch<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, BATCH_SIZE>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Batch<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
