#![allow(unused_macros)]

/// Helper macro for reading locked items, propagating poisoning as [`crate::Error::LockError`]
///
/// ```rust, ignore
///  let specs = read_lock!(self.specs);
///  println!("{}", specs.len());
/// ```
macro_rules! read_lock {
    ($rwlock:expr) => {
        $rwlock.read().map_err(|_| crate::Error::LockError)?
    };
}

/// Helper macro for writing to locked items, propagating poisoning as [`crate::Error::LockError`]
///
/// ```rust, ignore
///  let mut specs = write_lock!(self.specs);
///  specs.clear();
/// ```
macro_rules! write_lock {
    ($rwlock:expr) => {
        $rwlock.write().map_err(|_| crate::Error::LockError)?
    };
}
