mod vec;

pub(crate) use vec::*;
