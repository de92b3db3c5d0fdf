use serde::{Deserialize, Serialize};

/// One timed unit of transcribed (later translated) text.
///
/// `start` and `end` are offsets in seconds from the beginning of the audio
/// track, `0 <= start < end`. Segments are kept in `start` order; consecutive
/// segments may overlap since speech engines legitimately produce overlapping
/// timings. The subtitle record number is assigned by the serializer from the
/// sequence position and is deliberately not stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// An ordered sequence of segments produced by the transcriber.
///
/// The translator and the term filter rewrite `text` in place, per segment;
/// neither is allowed to reorder, drop, split, or merge segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<Segment>,
    pub language: String,
}

impl Transcript {
    pub fn new(segments: Vec<Segment>, language: impl Into<String>) -> Self {
        Self {
            segments,
            language: language.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}
