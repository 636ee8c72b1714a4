//! Cross-crate tests. Nothing here is built outside `cargo test`.

#[cfg(test)]
mod discovery;
#[cfg(test)]
mod net;
