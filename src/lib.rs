//! `tectools` is a semi-modular toolkit of fast and reliable libraries for
//! binary plot file exchange
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use tectools_utils as utils;

#[cfg(feature = "plt")]
#[cfg_attr(docsrs, doc(cfg(feature = "plt")))]
#[doc(inline)]
pub use tectools_plt as plt;
