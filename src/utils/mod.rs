//! Utilities to implement the merge combinator.

mod pin;
mod wakers;

pub(crate) use pin::{get_pin_mut_from_vec, iter_pin_mut_vec};
pub(crate) use wakers::WakerVec;

#[cfg(test)]
pub(crate) mod channel;
