// src/lib.rs

//! wordcrawl: concurrent article crawler that ranks vocabulary words by frequency.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
