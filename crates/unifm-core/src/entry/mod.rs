//! Entries: the canonical record, its normalizer, the cache holding every
//! observed record, and the sweep that keeps that cache bounded.

pub mod cache;
pub mod category;
pub mod collector;
pub mod icon;
pub mod normalize;
pub mod record;
