//! Lingosub - Translated, Profanity-Filtered Subtitle Generation
//!
//! An automated pipeline that extracts audio from a video with ffmpeg,
//! transcribes it with whisper, translates the segments, rewrites
//! disallowed terms, and serializes the result to an SRT file.

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod lang;
pub mod media;
pub mod subtitle;
pub mod transcribe;
pub mod transcript;
pub mod translate;
pub mod workflow;
