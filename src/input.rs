//! Input normalization: combines raw capture primitives (typed text, a
//! captured image plus its media type, a recorded audio clip) into exactly
//! one [`AnalysisRequest`], or refuses when no modality is present.
//!
//! Construction only; nothing here starts a network interaction.

use serde::{Deserialize, Serialize};

/// Fixed preview label for image-origin queries without accompanying text.
pub const IMAGE_QUERY_PREVIEW: &str = "Fridge Scan";
/// Fixed preview label for voice-origin queries.
pub const AUDIO_QUERY_PREVIEW: &str = "Voice Query";

/// A captured or selected image. The media type is whatever the capture
/// device reported; it is never assumed.
#[derive(Debug, Clone)]
pub struct ImageCapture {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

/// A recorded voice clip. The clip type is fixed by the external contract,
/// so only the bytes are carried.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
}

impl AudioClip {
    /// Media type every clip is encoded as, per the classifier contract.
    pub const MEDIA_TYPE: &'static str = "audio/wav";
}

/// Raw capture state accumulated by the UI before submission.
///
/// Image and audio are mutually exclusive by construction: attaching one
/// clears the other. Text may accompany an image but is ignored for audio
/// (a recording submits on its own in the source interaction model).
#[derive(Debug, Clone, Default)]
pub struct CaptureState {
    text: Option<String>,
    image: Option<ImageCapture>,
    audio: Option<AudioClip>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn attach_image(&mut self, image: ImageCapture) {
        self.audio = None;
        self.image = Some(image);
    }

    pub fn attach_audio(&mut self, audio: AudioClip) {
        self.image = None;
        self.audio = Some(audio);
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Produce exactly one analysis request, or `None` when no modality is
    /// present (whitespace-only text counts as absent).
    pub fn into_request(self) -> Option<AnalysisRequest> {
        if let Some(clip) = self.audio {
            return Some(AnalysisRequest::Audio { bytes: clip.bytes });
        }

        let text = self
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        match (self.image, text) {
            (Some(image), text) => Some(AnalysisRequest::Image {
                text,
                bytes: image.bytes,
                media_type: image.media_type,
            }),
            (None, Some(text)) => Some(AnalysisRequest::Text { text }),
            (None, None) => None,
        }
    }
}

/// One normalized multimodal request. Immutable once constructed; its
/// lifetime is a single classifier round trip.
#[derive(Debug, Clone)]
pub enum AnalysisRequest {
    Text {
        text: String,
    },
    Image {
        text: Option<String>,
        bytes: Vec<u8>,
        media_type: String,
    },
    Audio {
        bytes: Vec<u8>,
    },
}

impl AnalysisRequest {
    pub fn query_type(&self) -> QueryType {
        match self {
            AnalysisRequest::Text { .. } => QueryType::Text,
            AnalysisRequest::Image { .. } => QueryType::Image,
            AnalysisRequest::Audio { .. } => QueryType::Audio,
        }
    }

    /// Descriptor used when minting a history entry from this request's
    /// outcome: the original text when present, else a fixed label
    /// identifying the image or voice origin.
    pub fn descriptor(&self) -> RequestDescriptor {
        let query_preview = match self {
            AnalysisRequest::Text { text } => text.clone(),
            AnalysisRequest::Image { text: Some(text), .. } => text.clone(),
            AnalysisRequest::Image { text: None, .. } => IMAGE_QUERY_PREVIEW.to_string(),
            AnalysisRequest::Audio { .. } => AUDIO_QUERY_PREVIEW.to_string(),
        };
        RequestDescriptor {
            query_type: self.query_type(),
            query_preview,
        }
    }
}

/// Which modality a request originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Text,
    Image,
    Audio,
}

/// Everything a history entry needs to know about the request that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub query_type: QueryType,
    pub query_preview: String,
}
