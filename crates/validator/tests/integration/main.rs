//! Integration tests for composed validators.

mod contract;
mod pipe;
mod scenarios;
mod sum;
mod tuple;
