/// WAV audio guaranteed to be mono at 16 kHz.
///
/// Only audio normalizers construct this type; downstream consumers can rely on
/// the channel count and sample rate without inspecting the bytes.
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    data: Vec<u8>,
}

impl NormalizedAudio {
    pub const SAMPLE_RATE: u32 = 16_000;
    pub const CHANNELS: u16 = 1;
    pub const FILE_NAME: &'static str = "call.wav";
    pub const MIME_TYPE: &'static str = "audio/wav";

    pub fn from_wav_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
