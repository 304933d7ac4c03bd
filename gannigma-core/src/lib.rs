//! Gannigma Core: candles, ATR, level sequences, range intersection, model pipeline.
//!
//! This crate contains the calculation heart of Gannigma:
//! - Domain types (candles, candle series, search mode, volatility tiers)
//! - ATR indicator over daily candles
//! - Extreme-candle selection, volatility range building
//! - Lazy level sequences (fixed 360° grid and prior-period ladders)
//! - Range intersection with grid-member and stepped expansions
//! - One model pipeline parameterized by a ladder strategy
//! - Market data providers (Yahoo Finance, CSV files, synthetic, in-memory)

pub mod data;
pub mod domain;
pub mod indicators;
pub mod levels;
pub mod models;
