mod lazy;

pub(crate) use lazy::Lazy;
